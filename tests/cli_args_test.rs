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
use metal_cli::cli::commands::cluster::ClusterCommand;
use metal_cli::cli::commands::ip::IpCommand;
use metal_cli::cli::commands::storage::{StorageCommand, VolumeCommand};
use metal_cli::cli::commands::token::TokenCommand;
use metal_cli::cli::commands::Commands;
use metal_cli::cli::display::{ColorMode, OutputFormat, Printer};
use metal_cli::domain::api::IpType;
use metal_cli::CliArgs;

fn parse(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(argv).unwrap_or_else(|e| panic!("{:?} failed: {}", argv, e))
}

#[test]
fn test_cluster_kubeconfig_defaults() {
    let args = parse(&["metal", "cluster", "kubeconfig", "c-1", "--merge"]);
    let Commands::Cluster(ClusterCommand::Kubeconfig(cmd)) = args.command else {
        panic!("unexpected command");
    };
    assert_eq!(cmd.id, "c-1");
    assert_eq!(cmd.expiration, "8h");
    assert!(cmd.merge);
    assert!(!cmd.no_activate);
}

#[test]
fn test_cluster_list_sort_keys() {
    let args = parse(&["metal", "cluster", "list", "--sort-by", "name,-age", "--sort-by", "id"]);
    let Commands::Cluster(ClusterCommand::List(cmd)) = args.command else {
        panic!("unexpected command");
    };
    assert_eq!(cmd.sort.sort_by, vec!["name,-age", "id"]);
}

#[test]
fn test_ip_list_type_filter() {
    let args = parse(&["metal", "ip", "list", "--type", "static"]);
    let Commands::Ip(IpCommand::List(cmd)) = args.command else {
        panic!("unexpected command");
    };
    assert_eq!(cmd.ip_type, Some(IpType::Static));

    assert!(CliArgs::try_parse_from(["metal", "ip", "list", "--type", "floating"]).is_err());
}

#[test]
fn test_delete_requires_ids_or_file() {
    assert!(CliArgs::try_parse_from(["metal", "ip", "delete"]).is_err());
    assert!(CliArgs::try_parse_from(["metal", "ip", "delete", "a", "-f", "ips.yaml"]).is_err());

    let args = parse(&["metal", "ip", "delete", "-f", "ips.yaml", "--yes"]);
    let Commands::Ip(IpCommand::Delete(cmd)) = args.command else {
        panic!("unexpected command");
    };
    assert!(cmd.yes);
    assert!(cmd.ids.is_empty());
}

#[test]
fn test_volume_manifest_namespace() {
    let args = parse(&["metal", "storage", "volume", "manifest", "v-1", "-n", "apps"]);
    let Commands::Storage(StorageCommand::Volume(VolumeCommand::Manifest(cmd))) = args.command
    else {
        panic!("unexpected command");
    };
    assert_eq!(cmd.namespace, "apps");
    assert_eq!(cmd.name, None);
}

#[test]
fn test_token_create_flags() {
    let args = parse(&[
        "metal",
        "token",
        "create",
        "--description",
        "ci",
        "--expires",
        "30d",
        "--project-roles",
        "p-1=editor",
        "--permissions",
        "p-1=/metalstackcloud.api.v1.IPService/List",
    ]);
    let Commands::Token(TokenCommand::Create(cmd)) = args.command else {
        panic!("unexpected command");
    };
    let rq = cmd.to_request().unwrap();
    assert_eq!(rq.expires, "2592000s");
    assert_eq!(rq.project_roles["p-1"], "PROJECT_ROLE_EDITOR");
    assert_eq!(rq.permissions[0].methods.len(), 1);
}

#[test]
fn test_template_implies_template_format() {
    let args = parse(&["metal", "ip", "list", "--template", "{{ .ip }}"]);
    let printer = Printer::new(
        args.global.output_format,
        args.global.template.as_deref(),
        ColorMode::Never,
    )
    .unwrap();
    assert_eq!(printer.list_format(), OutputFormat::Template);
    assert_eq!(printer.describe_format(), OutputFormat::Template);
}

#[test]
fn test_template_format_without_template_fails() {
    let args = parse(&["metal", "ip", "list", "-o", "template"]);
    assert!(Printer::new(args.global.output_format, None, ColorMode::Never).is_err());
}

#[test]
fn test_unknown_command_fails() {
    assert!(CliArgs::try_parse_from(["metal", "machine", "list"]).is_err());
}
