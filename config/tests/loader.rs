use std::fs;

use cmdroute_config::{ApplicationDefinition, ConfigError};
use cmdroute_core::{RawArgs, Value};
use tempfile::TempDir;

const YAML: &str = r#"
name: stash-app
default_command: stash
options:
  - { name: quiet, short: q }
commands:
  - name: stash
    commands:
      - name: save
        default: true
        arguments:
          - { name: message, description: Stash message }
      - name: pop
        arguments:
          - { name: index, type: integer, default: 0 }
"#;

const JSON: &str = r#"{
  "name": "server-app",
  "commands": [
    {
      "name": "server",
      "option_commands": [
        { "name": "list", "short": "l", "default": true },
        { "name": "delete", "short": "d", "arguments": [{ "name": "host", "required": true }] }
      ]
    }
  ]
}"#;

fn write(dir: &TempDir, file: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_yaml_and_resolve() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.yml", YAML);

    let definition = ApplicationDefinition::load(&path).unwrap();
    let app = definition.build().unwrap();
    let resolver = definition.resolver();

    let raw = RawArgs::parse("-q");
    let resolved = resolver.resolve(&raw, &app, false).unwrap();
    assert_eq!(resolved.command().path(), ["stash", "save"]);
    assert_eq!(resolved.args().option("quiet").unwrap(), &Value::Bool(true));

    let raw = RawArgs::parse("stash pop");
    let resolved = resolver.resolve(&raw, &app, false).unwrap();
    assert_eq!(resolved.args().argument("index").unwrap(), &Value::Int(0));
}

#[test]
fn test_load_json_and_resolve() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.json", JSON);

    let definition = ApplicationDefinition::load(&path).unwrap();
    let app = definition.build().unwrap();
    let resolver = definition.resolver();

    let raw = RawArgs::parse("server");
    assert_eq!(resolver.resolve(&raw, &app, false).unwrap().command().name(), "list");

    let raw = RawArgs::parse("server -d example.org");
    let resolved = resolver.resolve(&raw, &app, false).unwrap();
    assert_eq!(resolved.command().name(), "delete");
    assert_eq!(resolved.args().argument("host").unwrap(), &Value::from("example.org"));
}

#[test]
fn test_yaml_and_json_agree() {
    let dir = TempDir::new().unwrap();
    let yaml_path = write(&dir, "app.yaml", YAML);
    let from_yaml = ApplicationDefinition::load(&yaml_path).unwrap();

    let json = serde_json::to_string_pretty(&from_yaml).unwrap();
    let json_path = write(&dir, "app.json", &json);
    let from_json = ApplicationDefinition::load(&json_path).unwrap();

    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.toml", "name = 'app'");
    assert!(matches!(
        ApplicationDefinition::load(&path),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.yml");
    assert!(matches!(ApplicationDefinition::load(&path), Err(ConfigError::IoError(_))));
}

#[test]
fn test_malformed_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "app.yml", "commands: [{ name: run");
    assert!(matches!(ApplicationDefinition::load(&path), Err(ConfigError::YamlError(_))));
}

#[test]
fn test_invalid_tree_is_reported() {
    let definition = ApplicationDefinition::from_yaml_str(
        "commands:\n  - name: pack\n    aliases: [p]\n  - name: p\n",
    )
    .unwrap();
    let err = definition.build().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDefinition(_)));
    assert!(err.to_string().starts_with("invalid definition: "));
}
