//! Check result and suite report types.
//!
//! Pure domain types: the runner produces them, the CLI presents them.
//! Result order is significant - it is the human-readable narrative of the
//! run - and the derived counts are computed once when the suite finishes.

use serde::Serialize;

/// Verdict of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Skip,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Pass => "[PASS]",
            Self::Fail => "[FAIL]",
            Self::Warn => "[WARN]",
            Self::Skip => "[SKIP]",
        };
        f.write_str(tag)
    }
}

/// Result of one named check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub details: Vec<String>,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Ordered results of a full self-test run plus derived counts.
#[derive(Debug, Serialize)]
pub struct SuiteReport {
    pub results: Vec<CheckResult>,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub skipped: usize,
}

impl SuiteReport {
    /// Seal a run: take the results in execution order and derive the counts.
    pub fn new(results: Vec<CheckResult>) -> Self {
        let mut report = Self {
            results,
            passed: 0,
            failed: 0,
            warned: 0,
            skipped: 0,
        };
        for result in &report.results {
            match result.status {
                CheckStatus::Pass => report.passed += 1,
                CheckStatus::Fail => report.failed += 1,
                CheckStatus::Warn => report.warned += 1,
                CheckStatus::Skip => report.skipped += 1,
            }
        }
        report
    }

    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.warned + self.skipped
    }

    /// The aggregate verdict: no failures, and at least 80% of all checks
    /// passed outright (warns and skips count toward the total but not
    /// toward the passes).
    pub const fn overall_pass(&self) -> bool {
        self.failed == 0 && self.passed * 5 >= self.total() * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(pass: usize, warn: usize, fail: usize) -> Vec<CheckResult> {
        let mut out = Vec::new();
        for i in 0..pass {
            out.push(CheckResult::new(format!("p{i}"), CheckStatus::Pass, ""));
        }
        for i in 0..warn {
            out.push(CheckResult::new(format!("w{i}"), CheckStatus::Warn, ""));
        }
        for i in 0..fail {
            out.push(CheckResult::new(format!("f{i}"), CheckStatus::Fail, ""));
        }
        out
    }

    #[test]
    fn counts_are_derived_once_in_order() {
        let report = SuiteReport::new(results(2, 1, 1));
        assert_eq!(report.passed, 2);
        assert_eq!(report.warned, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn any_failure_blocks_overall_pass() {
        let report = SuiteReport::new(results(9, 0, 1));
        assert!(!report.overall_pass());
    }

    #[test]
    fn warns_do_not_block_when_pass_ratio_holds() {
        // 9 passes, 1 warn, 0 failures -> pass
        let report = SuiteReport::new(results(9, 1, 0));
        assert!(report.overall_pass());
    }

    #[test]
    fn pass_ratio_boundary_is_inclusive_at_eighty_percent() {
        // Exactly 8/10 passes with 2 warns -> still a pass
        let report = SuiteReport::new(results(8, 2, 0));
        assert!(report.overall_pass());

        // 7/10 passes with 3 warns -> ratio broken, suite fails
        let report = SuiteReport::new(results(7, 3, 0));
        assert!(!report.overall_pass());
    }

    #[test]
    fn empty_suite_passes_vacuously() {
        let report = SuiteReport::new(Vec::new());
        assert!(report.overall_pass());
    }
}
