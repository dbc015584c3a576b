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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag prefix set by the cloud controller when an IP is bound to a service
pub const TAG_SERVICE: &str = "cluster.metal-stack.io/id/namespace/service";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum IpType {
    #[serde(rename = "IP_TYPE_UNSPECIFIED")]
    #[default]
    Unspecified,
    #[serde(rename = "IP_TYPE_EPHEMERAL")]
    Ephemeral,
    #[serde(rename = "IP_TYPE_STATIC")]
    Static,
}

impl fmt::Display for IpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IpType::Unspecified => "",
            IpType::Ephemeral => "ephemeral",
            IpType::Static => "static",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for IpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ephemeral" | "ip_type_ephemeral" => Ok(IpType::Ephemeral),
            "static" | "ip_type_static" => Ok(IpType::Static),
            _ => Err(format!(
                "invalid ip type '{}', expected one of: ephemeral, static",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Ip {
    pub uuid: String,
    pub ip: String,
    pub name: String,
    pub description: String,
    pub network: String,
    pub project: String,
    #[serde(rename = "type")]
    pub ip_type: IpType,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ip {
    /// The `namespace/service` this IP is attached to, taken from its tags.
    pub fn attached_service(&self) -> Option<&str> {
        self.tags
            .iter()
            .find_map(|t| t.strip_prefix(TAG_SERVICE).and_then(|s| s.strip_prefix('=')))
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpServiceAllocateRequest {
    pub project: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
}

/// The API updates IPs by sending the full desired entity.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpServiceUpdateRequest {
    pub project: String,
    pub ip: Ip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpResponse {
    pub ip: Ip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpListResponse {
    pub ips: Vec<Ip>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_type_parsing() {
        assert_eq!("static".parse::<IpType>().unwrap(), IpType::Static);
        assert_eq!("IP_TYPE_EPHEMERAL".parse::<IpType>().unwrap(), IpType::Ephemeral);
        assert!("floating".parse::<IpType>().is_err());
    }

    #[test]
    fn test_ip_type_wire_format() {
        let ip: Ip = serde_json::from_str(r#"{"ip":"1.2.3.4","type":"IP_TYPE_STATIC"}"#).unwrap();
        assert_eq!(ip.ip_type, IpType::Static);
        assert_eq!(ip.ip_type.to_string(), "static");
    }

    #[test]
    fn test_attached_service() {
        let ip = Ip {
            tags: vec![
                "foo=bar".to_string(),
                format!("{}=ingress/nginx", TAG_SERVICE),
            ],
            ..Default::default()
        };
        assert_eq!(ip.attached_service(), Some("ingress/nginx"));
        assert_eq!(Ip::default().attached_service(), None);
    }
}
