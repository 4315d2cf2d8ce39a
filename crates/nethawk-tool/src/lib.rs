//! The bundled network auditing tool.
//!
//! This crate is the wrapped side of the bootstrap: it exposes a single
//! programmatic entry point ([`NethawkTool`]) that reads its argument vector
//! and writes its terminal output through the process-wide capture slots,
//! never touching the real streams or the real process arguments directly.
//! Everything it needs from the bundle arrives through the injected
//! [`BundlePaths`] provider.

pub mod cli;
pub mod config;
pub mod loader;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::ArgMatches;
use clap::error::ErrorKind;

use nethawk_core::harness::capture;
use nethawk_core::ports::{BundlePaths, ToolEntryPoint, ToolExit};

use loader::{ProtocolLoader, ProtocolSpec};

/// The tool, fully wired: bundle paths, runtime config location and the
/// protocol registry loaded once at construction.
pub struct NethawkTool {
    paths: Arc<dyn BundlePaths>,
    config_path: PathBuf,
    loader: ProtocolLoader,
}

impl NethawkTool {
    pub fn new(paths: Arc<dyn BundlePaths>, config_path: PathBuf) -> Self {
        let loader = ProtocolLoader::from_bundle(paths.as_ref());
        Self {
            paths,
            config_path,
            loader,
        }
    }

    fn dispatch(&self, matches: &ArgMatches) -> ToolExit {
        let Some((protocol, sub)) = matches.subcommand() else {
            // arg_required_else_help already catches the bare invocation
            return ToolExit::Code(2);
        };
        let Some(spec) = self.loader.get(protocol) else {
            return ToolExit::Message(Some(format!("unknown protocol: {protocol}")));
        };
        self.run_protocol(spec, sub)
    }

    fn run_protocol(&self, spec: &ProtocolSpec, sub: &ArgMatches) -> ToolExit {
        if sub.get_flag("list-modules") {
            let mut out = capture::stdout();
            let _ = writeln!(
                out,
                "[*] {} modules available for {}:",
                spec.modules.len(),
                spec.name
            );
            for module in &spec.modules {
                let _ = writeln!(out, "    {:<14} {}", module.name, module.description);
            }
            return ToolExit::Code(0);
        }

        let module = match sub.get_one::<String>("module") {
            Some(name) => match spec.module(name) {
                Some(module) => Some(module),
                None => {
                    let _ = writeln!(
                        capture::stderr(),
                        "[-] Module not found for {}: {name}",
                        spec.name
                    );
                    return ToolExit::Code(1);
                }
            },
            None => None,
        };

        let Some(target) = sub.get_one::<String>("target") else {
            if let Some(module) = module {
                let _ = writeln!(
                    capture::stdout(),
                    "[*] {}: {}",
                    module.name,
                    module.description
                );
                return ToolExit::Code(0);
            }
            let _ = writeln!(capture::stderr(), "[-] No target specified for {}", spec.name);
            return ToolExit::Code(1);
        };

        if let Err(err) = config::ensure_runtime_config(self.paths.as_ref(), &self.config_path) {
            return ToolExit::Message(Some(format!("failed to prepare runtime config: {err}")));
        }

        let port = sub
            .get_one::<u16>("port")
            .copied()
            .unwrap_or(spec.default_port);
        tracing::debug!(protocol = %spec.name, target = %target, port, "starting scan");

        let mut out = capture::stdout();
        if let Some(module) = module {
            let _ = writeln!(out, "[{}] loading module {}", spec.name, module.name);
        }
        let line = match sub.get_one::<String>("username") {
            Some(user) => format!(
                "[{}] {target}:{port} - connection refused (credentials for {user} untried)",
                spec.name
            ),
            None => format!("[{}] {target}:{port} - connection refused", spec.name),
        };
        let _ = writeln!(out, "{line}");
        ToolExit::Code(1)
    }
}

impl ToolEntryPoint for NethawkTool {
    fn run(&self) -> ToolExit {
        let argv = capture::argv();
        match cli::command(&self.loader).try_get_matches_from(&argv) {
            Ok(matches) => self.dispatch(&matches),
            Err(err) => render_parse_outcome(&err),
        }
    }
}

/// Map clap's outcomes onto the tool's exit convention: help and version go
/// to stdout with success, everything else to stderr with code 2.
fn render_parse_outcome(err: &clap::Error) -> ToolExit {
    let rendered = err.render();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(capture::stdout(), "{rendered}");
            ToolExit::Code(0)
        }
        _ => {
            let _ = write!(capture::stderr(), "{rendered}");
            ToolExit::Code(2)
        }
    }
}
