//! End-to-end tests: the real bundled tool behind the real harness, over a
//! seeded on-disk bundle.

use std::fs;
use std::sync::{Arc, Mutex, MutexGuard};

use nethawk_core::harness::Harness;
use nethawk_core::paths::{CONFIG_FILE, DeploymentMode, Detection, Resources, STATE_DIR_ENV};
use nethawk_core::selftest::{CheckStatus, SelfTestRunner};
use nethawk_tool::NethawkTool;
use tempfile::TempDir;

// The capture slots and the environment are process-global, so every test
// here runs under one lock.
static LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

struct EnvGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvGuard {
    #[allow(unsafe_code)]
    fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, previous }
    }
}

impl Drop for EnvGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        unsafe {
            match self.previous.take() {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }
}

/// Lay out a source-checkout-shaped bundle with the real data files.
fn seeded_checkout(temp: &TempDir) -> Resources {
    let data = temp.path().join("nethawk").join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("nethawk.conf"),
        include_str!("../../../nethawk/data/nethawk.conf"),
    )
    .unwrap();
    fs::write(
        data.join("protocols.json"),
        include_str!("../../../nethawk/data/protocols.json"),
    )
    .unwrap();
    Resources::from_detection(Detection {
        mode: DeploymentMode::SourceCheckout,
        base: temp.path().to_path_buf(),
    })
}

fn harness_for(resources: &Resources) -> Harness {
    let config_path = resources.writable_state_root().unwrap().join(CONFIG_FILE);
    let tool = NethawkTool::new(Arc::new(resources.clone()), config_path);
    Harness::new(Arc::new(tool))
}

#[test]
fn full_self_test_passes_over_a_seeded_checkout() {
    let _lock = lock();
    let temp = TempDir::new().unwrap();
    let resources = seeded_checkout(&temp);
    let state = resources.writable_state_root().unwrap();
    let _env = EnvGuard::set(STATE_DIR_ENV, state.to_string_lossy().as_ref());

    let harness = harness_for(&resources);
    let report = SelfTestRunner::new(&harness, &resources)
        .run_all()
        .unwrap();

    assert_eq!(report.total(), 19);
    assert_eq!(report.failed, 0, "failed checks: {:?}", report.results);
    assert!(report.overall_pass());

    let protocols_up = report
        .results
        .iter()
        .filter(|r| r.name.starts_with("protocol_") && r.status == CheckStatus::Pass)
        .count();
    assert_eq!(protocols_up, 10);
}

#[test]
fn invalid_protocol_is_captured_not_fatal() {
    let _lock = lock();
    let temp = TempDir::new().unwrap();
    let resources = seeded_checkout(&temp);
    let harness = harness_for(&resources);

    let result = harness
        .invoke(&["http".to_string(), "--help".to_string()])
        .unwrap();

    assert_eq!(result.returncode, 2);
    assert!(!result.stderr.is_empty());
    assert!(result.stdout.is_empty());
}

#[test]
fn help_invocation_yields_a_three_field_result() {
    let _lock = lock();
    let temp = TempDir::new().unwrap();
    let resources = seeded_checkout(&temp);
    let harness = harness_for(&resources);

    let result = harness.invoke(&["--help".to_string()]).unwrap();

    let value = serde_json::to_value(&result).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert!(!result.stdout.is_empty());
    assert_eq!(result.returncode, 0);
}

#[test]
fn scan_leaves_a_runtime_config_in_the_state_root() {
    let _lock = lock();
    let temp = TempDir::new().unwrap();
    let resources = seeded_checkout(&temp);
    let harness = harness_for(&resources);

    let args: Vec<String> = ["smb", "192.0.2.1", "-u", "auditor", "-p", "hunter2"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let result = harness.invoke(&args).unwrap();

    assert_eq!(result.returncode, 1);
    assert!(result.stdout.contains("192.0.2.1:445"));

    let config = resources.writable_state_root().unwrap().join(CONFIG_FILE);
    let contents = fs::read_to_string(config).unwrap();
    assert!(contents.contains("[nethawk]"));
}
