use serde::{Deserialize, Serialize};

/// QC issue status codes as stored in the persistent QC layer.
///
/// Manually curated records may carry codes outside the automation's three;
/// those are preserved verbatim via `Other` and never rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QcStatus {
    Open,
    Resolved,
    /// Newly created, or updated while errors remain unresolved.
    Flagged,
    Other(i32),
}

impl QcStatus {
    pub fn code(&self) -> i32 {
        match self {
            QcStatus::Open => 1,
            QcStatus::Resolved => 3,
            QcStatus::Flagged => 5,
            QcStatus::Other(c) => *c,
        }
    }

    pub fn from_code(code: i32) -> QcStatus {
        match code {
            1 => QcStatus::Open,
            3 => QcStatus::Resolved,
            5 => QcStatus::Flagged,
            other => QcStatus::Other(other),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, QcStatus::Resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in [1, 3, 5, 2, 9] {
            assert_eq!(QcStatus::from_code(code).code(), code);
        }
        assert!(QcStatus::from_code(3).is_resolved());
        assert!(!QcStatus::from_code(5).is_resolved());
    }
}
