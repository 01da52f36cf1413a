//! Full bootstrap runs through [`Cli::execute_with`], always with `--dry-run`.

use anyhow::Result;
use clap::Parser;

use presto_bootstrap::cli::Cli;
use presto_bootstrap::core::{BootstrapError, user_friendly_error};
use presto_bootstrap::settings::{EnvSnapshot, FixedId};

use crate::common::TestNode;

async fn run(node: &TestNode, args: &[&str], extra_env: &[(&str, &str)]) -> Result<i32> {
    presto_bootstrap::test_utils::init_test_logging(None);

    let argv = std::iter::once("presto-entrypoint").chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv)?;
    cli.execute_with(&node.layout.env(extra_env), &FixedId("generated-id".to_string())).await
}

#[tokio::test]
async fn test_overrides_are_merged_and_sorted() -> Result<()> {
    let node = TestNode::empty()?;
    node.layout.write_default("jvm.config", "-server")?;
    node.layout.write_default("config.properties.jinja2", "a=1\nb=2\n")?;
    node.layout.write_custom("config.properties", "b=3\nc=4\n")?;

    let code = run(&node, &["--dry-run"], &[]).await?;

    assert_eq!(code, 0);
    assert_eq!(node.layout.read_config("config.properties")?, "a=1\nb=3\nc=4");
    Ok(())
}

#[tokio::test]
async fn test_standard_templates_render() -> Result<()> {
    let node = TestNode::standard()?;

    run(&node, &["--dry-run", "--discovery-uri", "coordinator.svc"], &[]).await?;

    let data_dir = node.layout.layout().data_dir.display().to_string();
    assert_eq!(
        node.layout.read_config("node.properties")?,
        format!(
            "node.data-dir={data_dir}\nnode.environment=production\nnode.id=generated-id"
        )
    );
    assert_eq!(
        node.layout.read_config("config.properties")?,
        "coordinator=false\ndiscovery.uri=http://coordinator.svc:80\nhttp-server.http.port=8080"
    );
    assert_eq!(node.layout.read_config("log.properties")?, "com.facebook.presto=INFO");
    assert_eq!(node.layout.read_catalog("tpch.properties")?, "connector.name=tpch");
    Ok(())
}

#[tokio::test]
async fn test_coordinator_flag_reaches_templates() -> Result<()> {
    let node = TestNode::standard()?;

    run(&node, &["--dry-run", "--coordinator", "--discovery-port", "8080"], &[]).await?;

    assert_eq!(
        node.layout.read_config("config.properties")?,
        "coordinator=true\n\
         discovery-server.enabled=true\n\
         discovery.uri=http://127.0.0.1:8080\n\
         http-server.http.port=8080\n\
         node-scheduler.include-coordinator=false"
    );
    Ok(())
}

#[tokio::test]
async fn test_jvm_config_copied_verbatim() -> Result<()> {
    let node = TestNode::standard()?;

    run(&node, &["--dry-run"], &[]).await?;

    let copied = node.configs_dir().join("jvm.config");
    assert_eq!(std::fs::read_to_string(&copied)?, crate::common::JVM_CONFIG);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&copied)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
    Ok(())
}

#[tokio::test]
async fn test_node_id_precedence() -> Result<()> {
    let node = TestNode::standard()?;

    run(&node, &["--dry-run"], &[("POD_NAME", "presto-worker-3")]).await?;
    let rendered = node.layout.read_config("node.properties")?;
    assert!(rendered.contains("node.id=presto-worker-3"));

    run(&node, &["--dry-run", "--node-id", "explicit"], &[("POD_NAME", "presto-worker-3")])
        .await?;
    let rendered = node.layout.read_config("node.properties")?;
    assert!(rendered.contains("node.id=explicit"));

    run(&node, &["--dry-run"], &[("POD_NAME", "")]).await?;
    let rendered = node.layout.read_config("node.properties")?;
    assert!(rendered.contains("node.id=generated-id"));
    Ok(())
}

#[tokio::test]
async fn test_user_variables_reach_templates() -> Result<()> {
    let node = TestNode::empty()?;
    node.layout.write_default("jvm.config", "-server")?;
    node.layout.write_catalog(
        "hive.properties",
        "connector.name=hive-hadoop2\nhive.metastore.uri={{ USER_METASTORE_URI }}\n",
    )?;

    run(&node, &["--dry-run"], &[("USER_METASTORE_URI", "thrift://metastore:9083")]).await?;

    assert_eq!(
        node.layout.read_catalog("hive.properties")?,
        "connector.name=hive-hadoop2\nhive.metastore.uri=thrift://metastore:9083"
    );
    Ok(())
}

#[tokio::test]
async fn test_catalogs_ignore_custom_overrides() -> Result<()> {
    let node = TestNode::standard()?;
    node.layout.write_custom("tpch.properties", "connector.name=memory\n")?;

    run(&node, &["--dry-run"], &[]).await?;

    assert_eq!(node.layout.read_catalog("tpch.properties")?, "connector.name=tpch");
    Ok(())
}

#[tokio::test]
async fn test_missing_environment_touches_nothing() -> Result<()> {
    let node = TestNode::standard()?;
    let env: EnvSnapshot = node
        .layout
        .env_vars()
        .into_iter()
        .filter(|(name, _)| name != "PRESTO_CATALOG_DIR")
        .collect();

    let cli = Cli::try_parse_from(["presto-entrypoint", "--dry-run"])?;
    let error = cli.execute_with(&env, &FixedId("id".to_string())).await.unwrap_err();

    let cause = error.chain().find_map(|cause| cause.downcast_ref::<BootstrapError>());
    match cause {
        Some(BootstrapError::MissingEnvironment {
            name,
        }) => assert_eq!(name, "PRESTO_CATALOG_DIR"),
        other => panic!("Expected MissingEnvironment, got {other:?}"),
    }
    assert!(!node.configs_dir().exists());
    Ok(())
}

#[tokio::test]
async fn test_undefined_variable_names_it() -> Result<()> {
    let node = TestNode::empty()?;
    node.layout.write_default("jvm.config", "-server")?;
    node.layout.write_default("node.properties.jinja2", "node.id={{ node_idd }}\n")?;

    let error = run(&node, &["--dry-run"], &[]).await.unwrap_err();

    let context = user_friendly_error(error);
    let rendered = context.to_string();
    assert!(rendered.contains("node_idd"), "unexpected message: {rendered}");
    assert!(rendered.contains("node_id"), "expected a suggestion: {rendered}");
    assert!(!node.configs_dir().join("node.properties").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_jvm_config_fails() -> Result<()> {
    let node = TestNode::empty()?;
    node.layout.write_default("log.properties.jinja2", "com.facebook.presto=INFO")?;

    let error = run(&node, &["--dry-run"], &[]).await.unwrap_err();

    assert!(matches!(
        error.chain().find_map(|cause| cause.downcast_ref::<BootstrapError>()),
        Some(BootstrapError::TemplateNotFound { .. })
    ));
    Ok(())
}
