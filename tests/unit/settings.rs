//! Settings resolution against real and synthetic environments.

use serial_test::serial;

use presto_bootstrap::cli::NodeArgs;
use presto_bootstrap::settings::{EnvSnapshot, FixedId, IdProvider, Settings, UuidProvider};
use presto_bootstrap::test_utils::TestLayout;

#[test]
#[serial]
fn test_snapshot_reads_process_environment() {
    // SAFETY: serialized with every other test that touches the process environment
    unsafe {
        std::env::set_var("USER_SNAPSHOT_PROBE", "present");
    }

    let snapshot = EnvSnapshot::from_process();

    unsafe {
        std::env::remove_var("USER_SNAPSHOT_PROBE");
    }

    assert_eq!(snapshot.get("USER_SNAPSHOT_PROBE"), Some("present"));
    assert_eq!(
        snapshot.with_prefixes(&["USER_SNAPSHOT_"]).get("USER_SNAPSHOT_PROBE").map(String::as_str),
        Some("present")
    );
}

#[test]
fn test_uuid_provider_generates_distinct_ids() {
    let first = UuidProvider.generate();
    let second = UuidProvider.generate();

    assert_ne!(first, second);
    assert_eq!(first.len(), 36);
    assert!(uuid::Uuid::parse_str(&first).is_ok());
}

#[test]
fn test_resolve_from_layout_fixture() {
    let layout = TestLayout::new().unwrap();
    let env = layout.env(&[("USER_TEAM", "analytics"), ("HOME", "/root")]);

    let settings = Settings::resolve(
        &env,
        &NodeArgs {
            coordinator: true,
            ..NodeArgs::default()
        },
        &FixedId("node-a".to_string()),
    )
    .unwrap();

    assert_eq!(&settings.layout, layout.layout());
    assert_eq!(settings.node_id, "node-a");
    assert!(settings.coordinator);
    assert_eq!(settings.captured_env.get("USER_TEAM").map(String::as_str), Some("analytics"));
    assert!(!settings.captured_env.contains_key("HOME"));
    // Location variables are captured too, so templates can reference them
    assert!(settings.captured_env.contains_key("PRESTO_DATA_DIR"));
}
