//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and the
//! environment.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use opsview_domain::OpsviewError;
use opsview_infra::config;
use tempfile::NamedTempFile;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const CONNECTION_VARS: [&str; 4] =
    ["OPSVIEW_URL", "OPSVIEW_USERNAME", "OPSVIEW_PASSWORD", "OPSVIEW_TIMEOUT"];

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_puppet_style_yaml_file() {
    // Same layout as /etc/puppet/opsview.conf
    let yaml = r#"---
url: "https://opsview.example.com/rest/"
username: "puppet"
password: "s3cr3t"
timeout: 120
"#;
    let path = write_config(yaml, "conf");

    let config = config::load_from_file(Some(path.clone())).expect("YAML config");

    assert_eq!(config.url, "https://opsview.example.com/rest");
    assert_eq!(config.username, "puppet");
    assert_eq!(config.timeout, 120);
    assert_eq!(config.endpoint("login"), "https://opsview.example.com/rest/login");

    // Password never shows up in debug output
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("s3cr3t"));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_rejects_non_http_url() {
    let yaml = "url: ftp://opsview.example.com\nusername: a\npassword: b\ntimeout: 5\n";
    let path = write_config(yaml, "yml");

    let result = config::load_from_file(Some(path.clone()));
    match result {
        Err(OpsviewError::Config(msg)) => assert!(msg.contains("scheme")),
        other => panic!("expected config error, got {:?}", other),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_falls_back_to_config_file() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

    let json = r#"{"url": "http://127.0.0.1:9/rest", "username": "u", "password": "p", "timeout": 3}"#;
    let path = write_config(json, "json");

    for key in CONNECTION_VARS {
        std::env::remove_var(key);
    }
    std::env::set_var("OPSVIEW_CONFIG", &path);

    let result = config::load();
    std::env::remove_var("OPSVIEW_CONFIG");

    let config = result.expect("config from OPSVIEW_CONFIG file");
    assert_eq!(config.url, "http://127.0.0.1:9/rest");
    assert_eq!(config.timeout, 3);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_environment_takes_precedence_over_file() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

    let yaml = "url: http://file.example.com\nusername: file\npassword: file\ntimeout: 9\n";
    let path = write_config(yaml, "conf");

    std::env::set_var("OPSVIEW_CONFIG", &path);
    std::env::set_var("OPSVIEW_URL", "http://env.example.com/rest");
    std::env::set_var("OPSVIEW_USERNAME", "env");
    std::env::set_var("OPSVIEW_PASSWORD", "env");
    std::env::set_var("OPSVIEW_TIMEOUT", "4");

    let result = config::load();

    std::env::remove_var("OPSVIEW_CONFIG");
    for key in CONNECTION_VARS {
        std::env::remove_var(key);
    }

    let config = result.expect("config from environment");
    assert_eq!(config.url, "http://env.example.com/rest");
    assert_eq!(config.username, "env");
    assert_eq!(config.timeout, 4);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_config_file_is_fatal() {
    let result = config::load_from_file(Some(PathBuf::from("/nonexistent/opsview.conf")));
    assert!(matches!(result, Err(OpsviewError::Config(_))));
}
