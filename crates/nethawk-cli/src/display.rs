//! Terminal presentation of self-test reports.

use nethawk_core::selftest::{CheckStatus, PROTOCOLS, SuiteReport};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn paint(status: CheckStatus) -> String {
    let color = match status {
        CheckStatus::Pass => GREEN,
        CheckStatus::Fail => RED,
        CheckStatus::Warn | CheckStatus::Skip => YELLOW,
    };
    format!("{color}{status}{RESET}")
}

/// Print the full report: every check in execution order, the protocol
/// summary, grouped problem lists and the final verdict.
pub fn print_report(report: &SuiteReport) {
    println!("\n{}", "=".repeat(60));
    println!("{BOLD}Self-Test Results{RESET}");
    println!("{}", "=".repeat(60));

    for result in &report.results {
        println!("{} {}: {}", paint(result.status), result.name, result.message);
        for detail in &result.details {
            println!("    {detail}");
        }
    }

    let protocols_up = report
        .results
        .iter()
        .filter(|r| r.name.starts_with("protocol_") && r.status == CheckStatus::Pass)
        .count();
    println!("\nProtocols available: {protocols_up}/{}", PROTOCOLS.len());

    if report.failed > 0 {
        println!("\n{RED}{BOLD}Failed checks:{RESET}");
        for result in &report.results {
            if result.status == CheckStatus::Fail {
                println!("  {} - {}", result.name, result.message);
            }
        }
    }
    if report.warned > 0 {
        println!("\n{YELLOW}{BOLD}Warnings:{RESET}");
        for result in &report.results {
            if result.status == CheckStatus::Warn {
                println!("  {} - {}", result.name, result.message);
            }
        }
    }

    println!("\n{}", "-".repeat(60));
    println!(
        "Results: {} passed, {} warnings, {} failed ({} total)",
        report.passed,
        report.warned,
        report.failed,
        report.total()
    );

    if report.overall_pass() {
        println!("{GREEN}{BOLD}[SUCCESS]{RESET} Self-test passed - the binary is functional");
    } else if report.failed == 0 {
        println!("{YELLOW}{BOLD}[WARNING]{RESET} Too many checks fell short of an outright pass");
    } else {
        println!("{RED}{BOLD}[FAILED]{RESET} Self-test failed - see the checks above");
    }
}
