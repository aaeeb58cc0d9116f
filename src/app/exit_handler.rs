//! Exit code logic for the pastpapers process.

use crate::ProcessExit;

/// Maps included and skipped file counts of a bundle to the exit outcome.
pub(crate) fn determine_exit_outcome(included: usize, skipped: usize) -> ProcessExit {
    if skipped == 0 {
        ProcessExit::Success
    } else if included > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::determine_exit_outcome;
    use crate::ProcessExit;

    #[test]
    fn test_exit_outcome_success_when_nothing_skipped() {
        assert_eq!(determine_exit_outcome(3, 0), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_success_for_empty_year() {
        assert_eq!(determine_exit_outcome(0, 0), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_partial_when_mixed() {
        assert_eq!(determine_exit_outcome(2, 1), ProcessExit::Partial);
    }

    #[test]
    fn test_exit_outcome_failure_when_all_skipped() {
        assert_eq!(determine_exit_outcome(0, 2), ProcessExit::Failure);
    }
}
