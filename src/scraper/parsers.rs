use crate::error::StandingsError;
use crate::models::{Contest, Party, ProblemDescriptor};
use crate::scraper::cleaner::{absolute_link, handle_from_title, strip};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static SEL_STANDINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".standings").expect("standings selector"));
static SEL_CONTEST_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".contest-name").expect("contest-name selector"));
static SEL_TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("tr selector"));
static SEL_TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("td selector"));
static SEL_A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("a selector"));
static SEL_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("span selector"));

/// Marker in a party link's href that identifies a team page.
const TEAM_HREF_MARKER: &str = "team";

// ── Standings table ───────────────────────────────────────────────────────────

pub fn locate_standings(doc: &Html) -> Result<ElementRef<'_>, StandingsError> {
    doc.select(&SEL_STANDINGS)
        .next()
        .ok_or(StandingsError::StandingsMissing)
}

/// All rows of the standings table: header first, summary last.
pub fn table_rows<'a>(standings: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    standings.select(&SEL_TR).collect()
}

pub fn row_cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.select(&SEL_TD).collect()
}

// ── Header ────────────────────────────────────────────────────────────────────

/// Problem columns from the header row, in document order.
pub fn parse_problems(
    header: Option<ElementRef<'_>>,
    base_url: &str,
) -> Result<Vec<ProblemDescriptor>, StandingsError> {
    let header =
        header.ok_or_else(|| StandingsError::structural("standings table has no header row"))?;

    Ok(header
        .select(&SEL_A)
        .map(|a| ProblemDescriptor {
            name: a.value().attr("title").unwrap_or_default().to_string(),
            link: absolute_link(base_url, a.value().attr("href").unwrap_or_default()),
        })
        .collect())
}

// ── Contest metadata ──────────────────────────────────────────────────────────

pub fn parse_contest_meta(
    doc: &Html,
    base_url: &str,
    problems: Vec<ProblemDescriptor>,
) -> Result<Contest, StandingsError> {
    let header = doc
        .select(&SEL_CONTEST_NAME)
        .next()
        .ok_or_else(|| StandingsError::structural("contest name element not found"))?;

    let link = header
        .select(&SEL_A)
        .next()
        .ok_or_else(|| StandingsError::structural("contest name link not found"))?;

    Ok(Contest {
        name: strip(&link.text().collect::<String>()).to_string(),
        link: absolute_link(base_url, link.value().attr("href").unwrap_or_default()),
        problems,
    })
}

// ── Party cell ────────────────────────────────────────────────────────────────

/// Links inside the party cell's grouping span, if the cell has that shape.
fn party_links<'a>(cells: &[ElementRef<'a>]) -> Option<Vec<ElementRef<'a>>> {
    let span = cells.get(1)?.select(&SEL_SPAN).next()?;
    let links: Vec<_> = span.select(&SEL_A).collect();
    if links.is_empty() { None } else { Some(links) }
}

fn title_of<'a>(el: &ElementRef<'a>) -> &'a str {
    el.value().attr("title").unwrap_or_default()
}

/// Decide whether a row belongs to a team or a single contestant.
///
/// A party cell without the span/link shape silently falls back to
/// individual parsing. Only a row with no linked contestant at all fails.
pub fn classify_row(cells: &[ElementRef<'_>]) -> Result<Party, StandingsError> {
    if let Some(links) = party_links(cells) {
        let is_team = links[0]
            .value()
            .attr("href")
            .is_some_and(|h| h.contains(TEAM_HREF_MARKER));

        if is_team {
            let members = links[1..]
                .iter()
                .filter_map(|a| handle_from_title(title_of(a)))
                .collect();
            return Ok(Party::Team {
                name: title_of(&links[0]).to_string(),
                members,
            });
        }
    } else {
        debug!("Party cell without grouped links, treating row as individual");
    }

    let link = cells
        .get(1)
        .and_then(|td| td.select(&SEL_A).next())
        .ok_or_else(|| StandingsError::structural("party cell has no contestant link"))?;

    // An empty title credits nobody; the row is still well-formed.
    Ok(match handle_from_title(title_of(&link)) {
        Some(handle) => Party::Individual(handle),
        None => Party::Anonymous,
    })
}

// ── Scored cells ──────────────────────────────────────────────────────────────

/// Normalized text of a scored cell's span; `-` when there is nothing to read.
pub fn cell_result(cell: ElementRef<'_>) -> String {
    let text = cell
        .select(&SEL_SPAN)
        .next()
        .map(|span| strip(&span.text().collect::<String>()).to_string())
        .unwrap_or_default();

    if text.is_empty() { "-".to_string() } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://codeforces.com";

    fn row_html(party: &str) -> Html {
        Html::parse_document(&format!(
            "<table class=\"standings\"><tr><td>1</td><td>{}</td><td>1</td><td>0</td></tr></table>",
            party
        ))
    }

    fn classify(doc: &Html) -> Result<Party, StandingsError> {
        let standings = locate_standings(doc).unwrap();
        let rows = table_rows(standings);
        classify_row(&row_cells(rows[0]))
    }

    #[test]
    fn test_missing_standings() {
        let doc = Html::parse_document("<html><body><table></table></body></html>");
        assert_eq!(locate_standings(&doc).unwrap_err(), StandingsError::StandingsMissing);
    }

    #[test]
    fn test_parse_problems_in_order() {
        let doc = Html::parse_document(
            r#"<table class="standings"><tr>
                <th>#</th><th>Who</th><th>=</th><th>Penalty</th>
                <th><a href="/group/g/contest/1/problem/A" title="A - Sum">A</a></th>
                <th><a href="/group/g/contest/1/problem/B" title="B - Max">B</a></th>
            </tr></table>"#,
        );
        let rows = table_rows(locate_standings(&doc).unwrap());
        let problems = parse_problems(rows.first().copied(), BASE).unwrap();
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].name, "A - Sum");
        assert_eq!(problems[1].link, "https://codeforces.com/group/g/contest/1/problem/B");
    }

    #[test]
    fn test_parse_problems_without_header() {
        assert_eq!(
            parse_problems(None, BASE).unwrap_err(),
            StandingsError::structural("standings table has no header row")
        );
    }

    #[test]
    fn test_contest_meta() {
        let doc = Html::parse_document(
            r#"<div class="contest-name"><a href="/group/g/contest/1"> Round 1 </a></div>"#,
        );
        let contest = parse_contest_meta(&doc, BASE, vec![]).unwrap();
        assert_eq!(contest.name, "Round 1");
        assert_eq!(contest.link, "https://codeforces.com/group/g/contest/1");
    }

    #[test]
    fn test_contest_meta_missing_link_is_structural() {
        let doc = Html::parse_document(r#"<div class="contest-name">Round 1</div>"#);
        assert!(matches!(
            parse_contest_meta(&doc, BASE, vec![]),
            Err(StandingsError::Structural(_))
        ));
    }

    #[test]
    fn test_classify_team() {
        let doc = row_html(
            r#"<span><a href="/group/g/contest/1/team/7" title="Team Alpha">Team Alpha</a>:
               <a href="/profile/bob" title="Expert bob">bob</a>,
               <a href="/profile/carol" title="Specialist carol">carol</a></span>"#,
        );
        assert_eq!(
            classify(&doc).unwrap(),
            Party::Team {
                name: "Team Alpha".into(),
                members: vec!["bob".into(), "carol".into()],
            }
        );
    }

    #[test]
    fn test_classify_individual_in_span() {
        let doc = row_html(r#"<span><a href="/profile/alice" title="Pupil alice">alice</a></span>"#);
        assert_eq!(classify(&doc).unwrap(), Party::Individual("alice".into()));
    }

    #[test]
    fn test_classify_malformed_party_falls_back() {
        // No grouping span at all: degrade to individual parsing.
        let doc = row_html(r#"<a href="/profile/dave" title="Newbie dave">dave</a>"#);
        assert_eq!(classify(&doc).unwrap(), Party::Individual("dave".into()));

        let doc = row_html(r#"<span>*</span><a href="/profile/erin" title="erin">erin</a>"#);
        assert_eq!(classify(&doc).unwrap(), Party::Individual("erin".into()));
    }

    #[test]
    fn test_classify_without_any_link_is_structural() {
        let doc = row_html("<span>ghost</span>");
        assert!(matches!(classify(&doc), Err(StandingsError::Structural(_))));
    }

    #[test]
    fn test_cell_result() {
        let doc = Html::parse_document(
            r#"<table><tr>
                <td><span> +2 </span></td>
                <td><span>  </span></td>
                <td>no span</td>
            </tr></table>"#,
        );
        let tr = doc.select(&SEL_TR).next().unwrap();
        let cells = row_cells(tr);
        assert_eq!(cell_result(cells[0]), "+2");
        assert_eq!(cell_result(cells[1]), "-");
        assert_eq!(cell_result(cells[2]), "-");
    }
}
