//! Wrapper entry point.
//!
//! Zero arguments means self-test mode; anything else is passed through to
//! the bundled tool unchanged, with the tool's captured streams mirrored to
//! the real ones and its exit code becoming the process exit code.

use std::io::Write as _;
use std::process;

use nethawk_cli::{bootstrap, display};
use nethawk_core::selftest::SelfTestRunner;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ctx = bootstrap::bootstrap()?;

    if args.is_empty() {
        println!("No arguments provided. Running self-test mode...");
        let runner = SelfTestRunner::new(&ctx.harness, &ctx.resources);
        let report = runner.run_all()?;
        display::print_report(&report);
        process::exit(i32::from(!report.overall_pass()));
    }

    let result = ctx.harness.invoke(&args)?;
    print!("{}", result.stdout);
    eprint!("{}", result.stderr);
    std::io::stdout().flush()?;
    std::io::stderr().flush()?;
    process::exit(result.returncode);
}
