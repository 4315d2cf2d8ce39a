//! Command-line surface of the bundled tool.
//!
//! One subcommand per protocol, built from the loaded registry. Global
//! options sit on the top-level command so they can appear before the
//! protocol name.

use clap::{Arg, ArgAction, Command, value_parser};

use nethawk_core::harness::TOOL_NAME;

use crate::loader::{ProtocolLoader, ProtocolSpec};

/// Version banner, release codename included.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " - \"Kestrel\"");

/// Build the full command tree for the given registry.
pub fn command(loader: &ProtocolLoader) -> Command {
    let mut cmd = Command::new(TOOL_NAME)
        .version(VERSION)
        .about("Network service auditing toolkit")
        .arg_required_else_help(true)
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_name("COUNT")
                .value_parser(value_parser!(usize))
                .default_value("100")
                .global(true)
                .help("Number of concurrent scan threads"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose output"),
        );

    for spec in loader.protocols() {
        cmd = cmd.subcommand(protocol_command(spec));
    }
    cmd
}

fn protocol_command(spec: &ProtocolSpec) -> Command {
    Command::new(spec.name.clone())
        .about(spec.description.clone())
        .arg(
            Arg::new("target")
                .value_name("TARGET")
                .help("Target host, CIDR range or hostname"),
        )
        .arg(
            Arg::new("username")
                .short('u')
                .long("username")
                .value_name("USER")
                .help("Username to authenticate with"),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .value_name("PASS")
                .help("Password to authenticate with"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .value_parser(value_parser!(u16))
                .default_value(spec.default_port.to_string())
                .help("Service port"),
        )
        .arg(
            Arg::new("list-modules")
                .short('L')
                .long("list-modules")
                .action(ArgAction::SetTrue)
                .help("List available modules for this protocol"),
        )
        .arg(
            Arg::new("module")
                .short('M')
                .long("module")
                .value_name("MODULE")
                .help("Run the named module against the target"),
        )
}
