//! Host-side tests: client round-trips against the real builtin plugin
//! binary, capability routing, and config validation.

use std::time::Duration;

use serde_json::json;

use plugrpc::client::{ClientError, PluginClient};
use plugrpc::config::{ConfigError, HostConfig};
use plugrpc::host::{HostError, PluginHost};

fn basic_bin() -> String {
    env!("CARGO_BIN_EXE_plugrpc-basic").to_string()
}

fn serve_args() -> Vec<String> {
    vec!["--serve".to_string()]
}

async fn spawn_basic(id: &str) -> PluginClient {
    PluginClient::spawn(&basic_bin(), &serve_args(), id, Duration::from_secs(10))
        .await
        .expect("builtin plugin must spawn")
}

// ---------------------------------------------------------------------------
// client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_fetches_metadata() {
    let mut client = spawn_basic("basic").await;
    let meta = client.get_meta().await.unwrap();
    assert_eq!(meta.name, "plugrpc-basic");
    assert_eq!(meta.language, "rust");
    assert!(meta.provides("string.reverse"));
    client.shutdown().await;
}

#[tokio::test]
async fn client_invoke_round_trip() {
    let mut client = spawn_basic("basic").await;
    let result = client
        .invoke("string.reverse", json!({"text": "plugin"}))
        .await
        .unwrap();
    assert_eq!(result, json!("nigulp"));
    client.shutdown().await;
}

#[tokio::test]
async fn client_surfaces_rpc_errors() {
    let mut client = spawn_basic("basic").await;
    let err = client.invoke("no.such.tool", json!({})).await.unwrap_err();
    match err {
        ClientError::Rpc { message, .. } => {
            assert!(message.contains("no.such.tool"), "got: {message}");
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
    client.shutdown().await;
}

#[tokio::test]
async fn client_sequential_calls_reuse_the_process() {
    let mut client = spawn_basic("basic").await;
    for s in ["one", "two", "three"] {
        let reversed = client.invoke("string.reverse", json!({"text": s})).await.unwrap();
        let rev: String = s.chars().rev().collect();
        assert_eq!(reversed, json!(rev));
    }
    client.shutdown().await;
}

#[tokio::test]
async fn client_times_out_on_unresponsive_plugin() {
    let mut client = PluginClient::spawn(
        "sleep",
        &["5".to_string()],
        "sleeper",
        Duration::from_millis(200),
    )
    .await
    .expect("sleep must spawn");
    let err = client.get_meta().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_, _)), "got {err:?}");
    client.shutdown().await;
}

// ---------------------------------------------------------------------------
// host
// ---------------------------------------------------------------------------

fn process_config(entries: &[(&str, &str, bool)], timeout_secs: u64) -> HostConfig {
    let plugins = entries
        .iter()
        .map(|(id, program, optional)| {
            format!(
                "  - id: {id}\n    kind: process\n    command: [\"{program}\", \"--serve\"]\n    optional: {optional}\n"
            )
        })
        .collect::<String>();
    let yaml = format!("version: 1\nplugins:\n{plugins}timeout_secs: {timeout_secs}\n");
    HostConfig::from_yaml(&yaml).expect("test config must validate")
}

#[tokio::test]
async fn host_routes_to_capable_plugin() {
    let bin = basic_bin();
    let config = process_config(&[("basic", &bin, false)], 10);
    let mut host = PluginHost::start(&config).await.unwrap();

    let result = host.invoke("string.reverse", json!({"text": "host"})).await.unwrap();
    assert_eq!(result, json!("tsoh"));
    host.shutdown().await;
}

#[tokio::test]
async fn host_reports_missing_capability() {
    let bin = basic_bin();
    let config = process_config(&[("basic", &bin, false)], 10);
    let mut host = PluginHost::start(&config).await.unwrap();

    let err = host.invoke("string.upper", json!({})).await.unwrap_err();
    match err {
        HostError::NoProvider(tool) => assert_eq!(tool, "string.upper"),
        other => panic!("expected NoProvider, got {other:?}"),
    }
    host.shutdown().await;
}

#[tokio::test]
async fn host_preserves_configuration_order() {
    let bin = basic_bin();
    let config = process_config(&[("first", &bin, false), ("second", &bin, false)], 10);
    let host = PluginHost::start(&config).await.unwrap();

    let names: Vec<_> = host.plugins().map(|m| m.name.clone()).collect();
    // Both plugins advertise the same metadata name; the count and order of
    // registration is what matters here.
    assert_eq!(names.len(), 2);
    host.shutdown().await;
}

#[tokio::test]
async fn host_skips_failed_optional_plugins() {
    let bin = basic_bin();
    let config = process_config(
        &[("broken", "/nonexistent/plugin-binary", true), ("basic", &bin, false)],
        10,
    );
    let mut host = PluginHost::start(&config).await.unwrap();

    assert_eq!(host.plugins().count(), 1);
    let result = host.invoke("string.reverse", json!({"text": "ab"})).await.unwrap();
    assert_eq!(result, json!("ba"));
    host.shutdown().await;
}

#[tokio::test]
async fn host_fails_on_required_plugin_failure() {
    let config = process_config(&[("broken", "/nonexistent/plugin-binary", false)], 10);
    // Match rather than unwrap_err: PluginHost owns live child processes
    // and carries no Debug impl.
    let Err(err) = PluginHost::start(&config).await else {
        panic!("start must fail when a required plugin cannot spawn");
    };
    match err {
        HostError::PluginStart { id, .. } => assert_eq!(id, "broken"),
        other => panic!("expected PluginStart, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_default_is_one_required_builtin() {
    let config = HostConfig::default_builtin();
    assert_eq!(config.plugins.len(), 1);
    assert_eq!(config.plugins[0].id, "basic");
    assert!(!config.plugins[0].optional);
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn config_parses_full_document() {
    let config = HostConfig::from_yaml(
        r#"
version: 1
plugins:
  - id: basic
    kind: builtin
  - id: reverse-js
    kind: process
    command: ["node", "plugins/basic.js", "--serve"]
    optional: true
timeout_secs: 5
"#,
    )
    .unwrap();
    assert_eq!(config.plugins.len(), 2);
    assert!(config.plugins[1].optional);
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn config_rejects_unknown_version() {
    let err = HostConfig::from_yaml("version: 2\nplugins: []\n").unwrap_err();
    assert!(matches!(err, ConfigError::Version(2)));
}

#[test]
fn config_rejects_duplicate_ids() {
    let err = HostConfig::from_yaml(
        r#"
version: 1
plugins:
  - id: dup
    kind: builtin
  - id: dup
    kind: builtin
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateId(id) if id == "dup"));
}

#[test]
fn config_rejects_process_without_command() {
    let err = HostConfig::from_yaml(
        r#"
version: 1
plugins:
  - id: empty
    kind: process
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingCommand(id) if id == "empty"));
}

#[test]
fn config_rejects_unknown_kind() {
    // kind is a closed enum; unknown values fail at parse time.
    let err = HostConfig::from_yaml(
        r#"
version: 1
plugins:
  - id: weird
    kind: carrier-pigeon
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
