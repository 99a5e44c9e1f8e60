//! User-facing batch status messages

use std::fmt;

use crate::backfill::BackfillMode;
use crate::error::CiteKeyError;

/// State of a batch operation as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Running,
    Done { count: usize, mode: BackfillMode },
    Failed(String),
}

impl BatchStatus {
    /// Terminal status for a finished backfill
    pub fn from_result(result: &Result<usize, CiteKeyError>, mode: BackfillMode) -> Self {
        match result {
            Ok(count) => BatchStatus::Done { count: *count, mode },
            Err(e) => BatchStatus::Failed(e.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BatchStatus::Running)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Running => write!(f, "Running\u{2026}"),
            BatchStatus::Done { count, mode } => {
                let noun = if *count == 1 { "key" } else { "keys" };
                let verb = match mode {
                    BackfillMode::FillMissing => "generated",
                    BackfillMode::Overwrite => "updated",
                };
                write!(f, "Done \u{2014} {} {} {}.", count, noun, verb)
            }
            BatchStatus::Failed(message) => write!(f, "Error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use rstest::rstest;

    #[rstest]
    #[case(0, BackfillMode::FillMissing, "Done \u{2014} 0 keys generated.")]
    #[case(1, BackfillMode::FillMissing, "Done \u{2014} 1 key generated.")]
    #[case(6, BackfillMode::FillMissing, "Done \u{2014} 6 keys generated.")]
    #[case(1, BackfillMode::Overwrite, "Done \u{2014} 1 key updated.")]
    #[case(10, BackfillMode::Overwrite, "Done \u{2014} 10 keys updated.")]
    fn test_done_message(#[case] count: usize, #[case] mode: BackfillMode, #[case] expected: &str) {
        assert_eq!(BatchStatus::Done { count, mode }.to_string(), expected);
    }

    #[test]
    fn test_running_message() {
        assert_eq!(BatchStatus::Running.to_string(), "Running\u{2026}");
        assert!(!BatchStatus::Running.is_terminal());
    }

    #[test]
    fn test_from_error() {
        let result = Err(CiteKeyError::Store(StoreError::Storage("library locked".into())));
        let status = BatchStatus::from_result(&result, BackfillMode::FillMissing);
        assert!(status.is_terminal());
        assert_eq!(status.to_string(), "Error: Store error: Storage error: library locked");
    }
}
