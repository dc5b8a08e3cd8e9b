use thiserror::Error;

/// The response body did not have the expected shape.
///
/// Any missing key, wrong type, empty `weather` array or out-of-range
/// timestamp produces this single error; there is no partial report.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed weather payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("weather payload has an empty `weather` array")]
    NoConditions,

    #[error("`sys.{field}` timestamp {value} is out of range")]
    Timestamp { field: &'static str, value: i64 },
}

/// Failure of a single lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// DNS, connect, timeout, or a non-2xx status.
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(#[from] ParseError),

    /// A newer lookup was issued before this one resolved; its result is dropped.
    #[error("lookup superseded by a newer query")]
    Superseded,
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Network(err.to_string())
    }
}

/// What the user is told when a lookup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
}

pub const LOOKUP_FAILED: Notice = Notice {
    title: "Try Again!",
    message: "There was an error with the city name.",
};

impl LookupError {
    /// User-facing notice, or `None` when the failure is a silent discard.
    ///
    /// Network and parse failures deliberately share one message.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            LookupError::Network(_) | LookupError::InvalidResponse(_) => Some(LOOKUP_FAILED),
            LookupError::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, LookupError::Superseded)
    }
}
