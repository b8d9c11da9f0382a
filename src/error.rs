use thiserror::Error;

/// Page-level failures of one standings extraction.
///
/// Row-level party cell problems never show up here; they degrade to
/// individual classification inside the row classifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StandingsError {
    #[error("Error fetching page")]
    FetchUnavailable(String),

    #[error("No standings found")]
    StandingsMissing,

    #[error("{0}")]
    Structural(String),
}

impl StandingsError {
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }
}
