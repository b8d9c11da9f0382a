use crate::error::StandingsError;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// ── Contest ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDescriptor {
    pub name: String, // "A - Sum"
    pub link: String, // absolute
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contest {
    pub name: String,
    pub link: String,
    pub problems: Vec<ProblemDescriptor>,
}

// ── Rows ──────────────────────────────────────────────────────────────────────

/// Who a standings row belongs to, as read from its party cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Party {
    Individual(String),
    Team { name: String, members: Vec<String> },
    /// Linked contestant whose title carries no handle.
    Anonymous,
}

impl Party {
    /// Contestant ids credited for this row.
    pub fn contestants(&self) -> &[String] {
        match self {
            Party::Individual(handle) => std::slice::from_ref(handle),
            Party::Team { members, .. } => members,
            Party::Anonymous => &[],
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContestantSummary {
    pub ac: String, // "A-C-D"
}

/// Finalized contestants, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contestants(pub Vec<(String, ContestantSummary)>);

impl Contestants {
    pub fn get(&self, handle: &str) -> Option<&ContestantSummary> {
        self.0.iter().find(|(h, _)| h == handle).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Contestants {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (handle, summary) in &self.0 {
            map.serialize_entry(handle, summary)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StandingsReport {
    pub contest: Contest,
    pub contestants: Contestants,
}

// ── Response envelope ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Failed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResponseBody {
    Report(StandingsReport),
    Message(String),
}

/// JSON shape returned to callers for every extraction, success or not.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: Status,
    pub result: ResponseBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

pub const MSG_FETCH_FAILED: &str = "Error fetching page";
pub const MSG_NO_STANDINGS: &str = "No standings found";
pub const MSG_GENERIC_FAILURE: &str = "There is something wrong :(";

impl ApiResponse {
    pub fn ok(report: StandingsReport) -> Self {
        Self {
            status: Status::Ok,
            result: ResponseBody::Report(report),
            err: None,
        }
    }

    pub fn failed(message: &str, err: Option<String>) -> Self {
        Self {
            status: Status::Failed,
            result: ResponseBody::Message(message.to_string()),
            err,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    pub fn report(&self) -> Option<&StandingsReport> {
        match &self.result {
            ResponseBody::Report(r) => Some(r),
            ResponseBody::Message(_) => None,
        }
    }
}

impl From<Result<StandingsReport, StandingsError>> for ApiResponse {
    fn from(res: Result<StandingsReport, StandingsError>) -> Self {
        match res {
            Ok(report) => ApiResponse::ok(report),
            Err(StandingsError::FetchUnavailable(_)) => ApiResponse::failed(MSG_FETCH_FAILED, None),
            Err(StandingsError::StandingsMissing) => ApiResponse::failed(MSG_NO_STANDINGS, None),
            Err(StandingsError::Structural(msg)) => {
                ApiResponse::failed(MSG_GENERIC_FAILURE, Some(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> StandingsReport {
        StandingsReport {
            contest: Contest {
                name: "Round 1".into(),
                link: "https://codeforces.com/group/g/contest/1".into(),
                problems: vec![ProblemDescriptor {
                    name: "A - Sum".into(),
                    link: "https://codeforces.com/group/g/contest/1/problem/A".into(),
                }],
            },
            contestants: Contestants(vec![
                ("zed".into(), ContestantSummary { ac: "A".into() }),
                ("alice".into(), ContestantSummary { ac: "A".into() }),
            ]),
        }
    }

    #[test]
    fn test_ok_shape() {
        let value = serde_json::to_value(ApiResponse::ok(sample_report())).unwrap();
        assert_eq!(value["status"], "OK");
        assert_eq!(value["result"]["contest"]["problems"][0]["name"], "A - Sum");
        assert_eq!(value["result"]["contestants"]["alice"]["ac"], "A");
        assert!(value.get("err").is_none());
    }

    #[test]
    fn test_contestants_keep_first_seen_order() {
        let text = serde_json::to_string(&sample_report().contestants).unwrap();
        assert_eq!(text, r#"{"zed":{"ac":"A"},"alice":{"ac":"A"}}"#);
    }

    #[test]
    fn test_failure_shapes() {
        let fetch: ApiResponse = Err(StandingsError::FetchUnavailable("timeout".into())).into();
        assert_eq!(
            serde_json::to_value(fetch).unwrap(),
            json!({"status": "FAILED", "result": "Error fetching page"})
        );

        let missing: ApiResponse = Err(StandingsError::StandingsMissing).into();
        assert_eq!(
            serde_json::to_value(missing).unwrap(),
            json!({"status": "FAILED", "result": "No standings found"})
        );

        let broken: ApiResponse = Err(StandingsError::structural("contest name not found")).into();
        assert_eq!(
            serde_json::to_value(broken).unwrap(),
            json!({
                "status": "FAILED",
                "result": "There is something wrong :(",
                "err": "contest name not found"
            })
        );
    }

    #[test]
    fn test_party_contestants() {
        let solo = Party::Individual("alice".into());
        assert_eq!(solo.contestants(), ["alice".to_string()]);

        let team = Party::Team {
            name: "Team Alpha".into(),
            members: vec!["bob".into(), "carol".into()],
        };
        assert_eq!(team.contestants().len(), 2);
    }
}
