//! The `presto-entrypoint` binary end to end.

use anyhow::Result;
use predicates::prelude::*;

use crate::common::TestNode;

#[test]
fn test_dry_run_renders_and_skips_launch() -> Result<()> {
    let node = TestNode::standard()?;

    node.command()?
        .args(["--dry-run", "--node-id", "presto-0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("============== SETTINGS =============="))
        .stdout(predicate::str::contains("  * node_id: presto-0"))
        .stdout(predicate::str::contains("============== BOOTSTRAPPING =============="))
        .stdout(predicate::str::contains("[ADDED]: jvm.config from "))
        .stdout(predicate::str::contains("--- Bootstrapping Configuration Files ---"))
        .stdout(predicate::str::contains("--- Bootstrapping Catalog Files ---"))
        .stdout(predicate::str::contains("[RENDERED]: "))
        .stdout(predicate::str::contains("  com.facebook.presto=INFO"))
        .stdout(predicate::str::contains("============== LAUNCHING =============="))
        .stdout(predicate::str::contains("[LAUNCH]: Starting Presto"))
        .stdout(predicate::str::contains("  launcher"))
        .stdout(predicate::str::contains("[DRY-RUN]: Skipped launch call"));

    for name in ["jvm.config", "node.properties", "config.properties", "log.properties"] {
        assert!(node.configs_dir().join(name).is_file(), "{name} was not written");
    }
    assert!(node.catalog_dir().join("tpch.properties").is_file());
    Ok(())
}

#[test]
fn test_secrets_are_masked_in_settings() -> Result<()> {
    let node = TestNode::standard()?;

    node.command()?
        .env("SECRET_S3_KEY", "hunter2")
        .env("USER_REGION", "eu-west-1")
        .env("UNRELATED_VARIABLE", "not captured")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("  * SECRET_S3_KEY: ********"))
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("  * USER_REGION: eu-west-1"))
        .stdout(predicate::str::contains("UNRELATED_VARIABLE").not());
    Ok(())
}

#[test]
fn test_settings_banner_booleans() -> Result<()> {
    let node = TestNode::standard()?;

    node.command()?
        .args(["--dry-run", "--coordinator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  * coordinator: true"))
        .stdout(predicate::str::contains("  * dry_run: true"))
        .stdout(predicate::str::contains("* coordinator: True").not());
    Ok(())
}

#[test]
fn test_missing_environment_exits_with_error() -> Result<()> {
    let node = TestNode::standard()?;

    node.command()?
        .env_remove("TEMPLATE_DIR")
        .arg("--dry-run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TEMPLATE_DIR"));

    assert!(!node.configs_dir().exists());
    Ok(())
}

#[test]
fn test_render_failure_exits_with_error() -> Result<()> {
    let node = TestNode::standard()?;
    node.layout.write_default("broken.properties.jinja2", "a={{ unclosed\n")?;

    node.command()?
        .arg("--dry-run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("broken.properties.jinja2"));
    Ok(())
}

#[test]
fn test_help_lists_flags() -> Result<()> {
    let node = TestNode::empty()?;

    node.command()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--coordinator"))
        .stdout(predicate::str::contains("--discovery-port"))
        .stdout(predicate::str::contains("--dry-run"));
    Ok(())
}

#[cfg(unix)]
mod launch {
    use super::*;
    use crate::common::FakeLauncher;

    #[test]
    fn test_launcher_receives_rendered_paths() -> Result<()> {
        let node = TestNode::standard()?;
        let launcher = FakeLauncher::new(0)?;

        node.command()?.env("PATH", launcher.path_env()).assert().success();

        let configs = node.configs_dir().display().to_string();
        assert_eq!(
            launcher.recorded_args()?,
            vec![
                "run".to_string(),
                format!("--node-config={configs}/node.properties"),
                format!("--jvm-config={configs}/jvm.config"),
                format!("--config={configs}/config.properties"),
                format!("--log-levels-file={configs}/log.properties"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_exit_code_mirrors_launcher() -> Result<()> {
        let node = TestNode::standard()?;
        let launcher = FakeLauncher::new(3)?;

        node.command()?.env("PATH", launcher.path_env()).assert().code(3);
        Ok(())
    }

    #[test]
    fn test_dry_run_never_invokes_launcher() -> Result<()> {
        let node = TestNode::standard()?;
        let launcher = FakeLauncher::new(0)?;

        node.command()?
            .env("PATH", launcher.path_env())
            .arg("--dry-run")
            .assert()
            .success();

        assert!(!launcher.args_file().exists());
        Ok(())
    }
}
