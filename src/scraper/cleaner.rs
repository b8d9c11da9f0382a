// ── Text helpers ──────────────────────────────────────────────────────────────

/// Strip leading/trailing whitespace; inner whitespace is left alone.
pub fn strip(s: &str) -> &str {
    s.trim()
}

/// Handle from a member link title: the last whitespace-separated token.
/// "Grandmaster tourist" → "tourist"
///
/// Deliberately stricter than splitting on single spaces: a blank title gives
/// no handle at all instead of an empty-string contestant.
pub fn handle_from_title(title: &str) -> Option<String> {
    title.split_whitespace().next_back().map(|s| s.to_string())
}

/// Problem identifier from a header title.
/// "A - Sum of Two" → "A"
pub fn problem_id(name: &str) -> &str {
    name.split(" - ").next().unwrap_or(name)
}

/// Prefix the judge origin to a site-relative href.
pub fn absolute_link(base_url: &str, href: &str) -> String {
    format!("{}{}", base_url, href)
}

/// First character `-` (or nothing at all) means "not accepted".
pub fn is_unsolved(cell_text: &str) -> bool {
    let text = strip(cell_text);
    text.is_empty() || text.starts_with('-')
}

// ── Tests ─────────────────────────────────────────────────────────────────────
