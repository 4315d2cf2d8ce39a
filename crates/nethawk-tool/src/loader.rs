//! Protocol registry loaded from the bundled data.
//!
//! The registry normally comes from `protocols.json` under the bundle's data
//! root. A compiled-in fallback covers bundles where the data directory was
//! packaged differently, so the tool always knows its protocol set.

use std::fs;

use serde::Deserialize;

use nethawk_core::ports::BundlePaths;

/// Registry file name under the data root.
pub const PROTOCOLS_FILE: &str = "protocols.json";

/// One runnable module of a protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    pub description: String,
}

/// One supported protocol and its modules.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolSpec {
    pub name: String,
    pub description: String,
    pub default_port: u16,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

impl ProtocolSpec {
    pub fn module(&self, name: &str) -> Option<&ModuleSpec> {
        self.modules.iter().find(|module| module.name == name)
    }
}

#[derive(Debug, Deserialize)]
struct Registry {
    protocols: Vec<ProtocolSpec>,
}

/// The full protocol registry for this process.
#[derive(Debug)]
pub struct ProtocolLoader {
    protocols: Vec<ProtocolSpec>,
}

impl ProtocolLoader {
    /// Load the registry from the bundle, falling back to the compiled-in
    /// set when the data file is missing or unreadable.
    pub fn from_bundle(paths: &dyn BundlePaths) -> Self {
        let file = paths.data_root().join(PROTOCOLS_FILE);
        match fs::read_to_string(&file) {
            Ok(text) => match serde_json::from_str::<Registry>(&text) {
                Ok(registry) => {
                    tracing::debug!(
                        path = %file.display(),
                        count = registry.protocols.len(),
                        "protocol registry loaded"
                    );
                    Self {
                        protocols: registry.protocols,
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        path = %file.display(),
                        error = %err,
                        "malformed protocol registry, using built-in set"
                    );
                    Self {
                        protocols: builtin_registry(),
                    }
                }
            },
            Err(err) => {
                tracing::warn!(
                    path = %file.display(),
                    error = %err,
                    "protocol registry not readable, using built-in set"
                );
                Self {
                    protocols: builtin_registry(),
                }
            }
        }
    }

    pub fn protocols(&self) -> &[ProtocolSpec] {
        &self.protocols
    }

    pub fn get(&self, name: &str) -> Option<&ProtocolSpec> {
        self.protocols.iter().find(|spec| spec.name == name)
    }
}

fn builtin_registry() -> Vec<ProtocolSpec> {
    let entries: [(&str, &str, u16); 10] = [
        ("ftp", "Audit FTP services for weak or anonymous credentials", 21),
        ("ldap", "Enumerate and audit LDAP directory services", 389),
        ("mssql", "Audit Microsoft SQL Server instances", 1433),
        ("nfs", "Enumerate NFS exports and mount permissions", 2049),
        ("rdp", "Audit Remote Desktop services", 3389),
        ("smb", "Audit SMB shares, sessions and credentials", 445),
        ("ssh", "Audit SSH services for weak credentials", 22),
        ("vnc", "Audit VNC services for unauthenticated access", 5900),
        ("winrm", "Audit Windows Remote Management endpoints", 5985),
        ("wmi", "Audit WMI remote query and execution access", 135),
    ];

    entries
        .into_iter()
        .map(|(name, description, default_port)| ProtocolSpec {
            name: name.to_string(),
            description: description.to_string(),
            default_port,
            modules: if name == "smb" {
                vec![ModuleSpec {
                    name: "spider_plus".to_string(),
                    description: "Crawl readable shares and inventory files".to_string(),
                }]
            } else {
                Vec::new()
            },
        })
        .collect()
}
