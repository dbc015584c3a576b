// Copyright 2025 metalstack.cloud Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use metal_cli::cli::commands::context::ContextCommand;
use metal_cli::cli::commands::Commands;
use metal_cli::domain::config::{CliConfig, Context, Settings};
use metal_cli::infrastructure::kubernetes::kubeconfig;
use metal_cli::CliArgs;
use std::fs;

#[test]
fn test_config_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = CliConfig::default();
    let mut prod = Context::new("prod");
    prod.api_token = Some("secret".to_string());
    prod.default_project = Some("p-1".to_string());
    config.add(prod, true).unwrap();
    config.add(Context::new("dev"), false).unwrap();
    config.save(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("current-context = \"prod\""));
    assert!(content.contains("default-project = \"p-1\""));

    let loaded = CliConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_missing_config_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert!(config.contexts.is_empty());
    assert!(config.current_context.is_none());
}

#[test]
fn test_flags_override_context() {
    let mut config = CliConfig::default();
    let mut prod = Context::new("prod");
    prod.api_url = Some("https://api.prod.example".to_string());
    prod.default_project = Some("p-ctx".to_string());
    config.add(prod, true).unwrap();

    let args = CliArgs::try_parse_from([
        "metal",
        "--api-url",
        "https://override.example/",
        "-p",
        "p-flag",
        "--timeout",
        "5",
        "ip",
        "list",
    ])
    .unwrap();
    let settings = Settings::resolve(&config, &args.global.overrides()).unwrap();

    assert_eq!(settings.api_url, "https://override.example");
    assert_eq!(settings.project.as_deref(), Some("p-flag"));
    assert_eq!(settings.timeout.as_secs(), 5);
    assert_eq!(settings.context_name.as_deref(), Some("prod"));
}

#[test]
fn test_unknown_context_flag_fails() {
    let config = CliConfig::default();
    let args = CliArgs::try_parse_from(["metal", "--context", "nope", "health"]).unwrap();
    assert!(Settings::resolve(&config, &args.global.overrides()).is_err());
}

#[test]
fn test_context_commands_parse_and_apply() {
    let mut config = CliConfig::default();
    for argv in [
        vec!["metal", "context", "add", "prod", "--url", "https://api.example", "--activate"],
        vec!["metal", "context", "add", "dev"],
        vec!["metal", "context", "switch", "dev"],
        vec!["metal", "context", "set-project", "p-7"],
        vec!["metal", "context", "switch", "-"],
    ] {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let Commands::Context { command: Some(cmd) } = args.command else {
            panic!("not a context command");
        };
        cmd.apply(&mut config).unwrap();
    }

    assert!(config.is_current("prod"));
    assert_eq!(config.previous_context.as_deref(), Some("dev"));
    assert_eq!(
        config.get("dev").unwrap().default_project.as_deref(),
        Some("p-7")
    );
    assert_eq!(
        config.get("prod").unwrap().api_url.as_deref(),
        Some("https://api.example")
    );
    assert!(!ContextCommand::ShowCurrent.apply(&mut config).unwrap());
}

#[test]
fn test_kubeconfig_merge_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kube").join("config");
    let credentials = r#"
apiVersion: v1
kind: Config
clusters:
- name: shoot
  cluster:
    server: https://api.shoot.example
contexts:
- name: shoot
  context:
    cluster: shoot
    user: shoot
current-context: shoot
users:
- name: shoot
  user:
    token: abc
"#;

    let context = kubeconfig::context_name("p-1", "prod");
    kubeconfig::merge_into_file(&path, credentials, &context, true).unwrap();
    // merging the same credentials again must not duplicate entries
    let merged = kubeconfig::merge_into_file(&path, credentials, &context, true).unwrap();

    assert_eq!(merged.current_context.as_deref(), Some("metal-p-1-prod"));
    assert_eq!(merged.contexts.len(), 1);
    assert!(fs::read_to_string(&path).unwrap().contains("metal-p-1-prod"));
}
