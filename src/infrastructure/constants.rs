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

/// API endpoint
pub const DEFAULT_API_URL: &str = "https://api.metalstack.cloud";
pub const API_PACKAGE: &str = "metalstackcloud.api.v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connect protocol
pub const CONNECT_PROTOCOL_VERSION_HEADER: &str = "Connect-Protocol-Version";
pub const CONNECT_PROTOCOL_VERSION: &str = "1";
pub const CONNECT_TIMEOUT_HEADER: &str = "Connect-Timeout-Ms";

/// Services
pub const SERVICE_CLUSTER: &str = "ClusterService";
pub const SERVICE_VOLUME: &str = "VolumeService";
pub const SERVICE_SNAPSHOT: &str = "SnapshotService";
pub const SERVICE_IP: &str = "IPService";
pub const SERVICE_TENANT: &str = "TenantService";
pub const SERVICE_PROJECT: &str = "ProjectService";
pub const SERVICE_TOKEN: &str = "TokenService";
pub const SERVICE_PAYMENT: &str = "PaymentService";
pub const SERVICE_HEALTH: &str = "HealthService";
pub const SERVICE_VERSION: &str = "VersionService";
pub const SERVICE_METHOD: &str = "MethodService";

/// Environment variables
pub const ENV_CONFIG: &str = "METAL_STACK_CLOUD_CONFIG";
pub const ENV_API_URL: &str = "METAL_STACK_CLOUD_API_URL";
pub const ENV_API_TOKEN: &str = "METAL_STACK_CLOUD_API_TOKEN";
pub const ENV_PROJECT: &str = "METAL_STACK_CLOUD_PROJECT";
pub const ENV_CONTEXT: &str = "METAL_STACK_CLOUD_CONTEXT";
pub const ENV_EDITOR: &str = "EDITOR";
pub const ENV_KUBECONFIG: &str = "KUBECONFIG";

/// Configuration file
pub const CONFIG_DIR_NAME: &str = ".metal-stack-cloud";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_CONTEXT_NAME: &str = "default";

/// Login
pub const DEFAULT_LOGIN_PROVIDER: &str = "github";
pub const LOGIN_CALLBACK_PATH: &str = "/callback";
pub const LOGIN_TIMEOUT_SECS: u64 = 300;

/// Tokens
pub const DEFAULT_TOKEN_EXPIRATION: &str = "8h";

/// Kubeconfig
pub const DEFAULT_KUBECONFIG_EXPIRATION: &str = "8h";
pub const KUBECONFIG_CONTEXT_PREFIX: &str = "metal";

/// Volume manifests
pub const CSI_DRIVER_LIGHTBITS: &str = "csi.lightbitslabs.com";
pub const VOLUME_HANDLE_SCHEME: &str = "grpcs";
pub const DEFAULT_MANIFEST_NAMESPACE: &str = "default";
pub const DEFAULT_ACCESS_MODE: &str = "ReadWriteOnce";
pub const DEFAULT_FS_TYPE: &str = "ext4";

/// Editor fallback when $EDITOR is unset
pub const DEFAULT_EDITOR: &str = "vi";
