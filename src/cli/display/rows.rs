//! Table columns of every printable entity

use super::format::{age, bytes, timestamp, truncate};
use super::{ColorTheme, StatusIcon};
use crate::domain::api::{
    Cluster, ClusterMonitoring, ClientServerVersion, Coupon, Ip, MethodPermission, Project,
    ServiceHealth, Snapshot, Tenant, Token, Volume,
};
use crate::shared::duration::{from_proto_duration, humanize};
use comfy_table::Cell;

const DESCRIPTION_WIDTH: usize = 40;

/// An entity that can be rendered as one line of a table.
pub trait TableRow {
    fn header(wide: bool) -> Vec<&'static str>;

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell>;
}

fn proto_duration(value: &str) -> String {
    from_proto_duration(value).map(humanize).unwrap_or_default()
}

impl TableRow for Cluster {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec![
            "", "ID", "TENANT", "PROJECT", "NAME", "PARTITION", "VERSION", "SIZE", "AGE",
        ];
        if wide {
            header.extend(["OPERATION", "PROGRESS", "API", "CONTROL", "NODES", "SYSTEM"]);
        }
        header
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let state = self.status.as_ref().map(|s| s.state.as_str()).unwrap_or("");
        let (min, max) = self.size_range();

        let mut row = vec![
            Cell::new(StatusIcon::cluster(self)).fg(theme.state_color(state)),
            Cell::new(&self.uuid),
            Cell::new(&self.tenant),
            Cell::new(&self.project),
            Cell::new(&self.name),
            Cell::new(&self.partition),
            Cell::new(&self.kubernetes.version),
            Cell::new(format!("{} - {}", min, max)),
            Cell::new(age(self.created_at)),
        ];

        if wide {
            let status = self.status.clone().unwrap_or_default();
            let ready = |value: &str| Cell::new(value).fg(theme.state_color(value));
            row.extend([
                Cell::new(format!("{} {}", status.operation_type, status.state).trim())
                    .fg(theme.state_color(&status.state)),
                Cell::new(format!("{}%", status.progress))
                    .fg(theme.ratio_color(status.progress, 100)),
                ready(status.api_server_ready.as_str()),
                ready(status.control_plane_ready.as_str()),
                ready(status.nodes_ready.as_str()),
                ready(status.system_components_ready.as_str()),
            ]);
        }
        row
    }
}

impl TableRow for Volume {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec![
            "ID", "NAME", "SIZE", "USAGE", "REPLICAS", "CLUSTER", "PROJECT", "PARTITION", "STATE",
        ];
        if wide {
            header.extend(["STORAGE CLASS", "NODES", "ATTACHED TO", "SOURCE SNAPSHOT"]);
        }
        header
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let mut row = vec![
            Cell::new(&self.uuid),
            Cell::new(&self.name),
            Cell::new(bytes(self.size)),
            Cell::new(bytes(self.usage)),
            Cell::new(self.replica_count),
            Cell::new(&self.cluster_name),
            Cell::new(&self.project),
            Cell::new(&self.partition),
            Cell::new(&self.state).fg(theme.state_color(&self.state)),
        ];
        if wide {
            row.extend([
                Cell::new(&self.storage_class),
                Cell::new(self.node_ips.join("\n")),
                Cell::new(self.attached_to.join("\n")),
                Cell::new(&self.source_snapshot_name),
            ]);
        }
        row
    }
}

impl TableRow for Snapshot {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec![
            "ID", "NAME", "SIZE", "USAGE", "PROJECT", "PARTITION", "STATE", "AGE",
        ];
        if wide {
            header.extend(["SOURCE VOLUME", "STORAGE CLASS", "RETENTION"]);
        }
        header
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let mut row = vec![
            Cell::new(&self.uuid),
            Cell::new(&self.name),
            Cell::new(bytes(self.size)),
            Cell::new(bytes(self.usage)),
            Cell::new(&self.project),
            Cell::new(&self.partition),
            Cell::new(&self.state).fg(theme.state_color(&self.state)),
            Cell::new(age(self.created_at)),
        ];
        if wide {
            let source = if self.source_volume_name.is_empty() {
                &self.source_volume_uuid
            } else {
                &self.source_volume_name
            };
            row.extend([
                Cell::new(source),
                Cell::new(&self.storage_class),
                Cell::new(proto_duration(&self.retention)),
            ]);
        }
        row
    }
}

impl TableRow for Ip {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec!["IP", "ID", "PROJECT", "NAME", "TYPE", "ATTACHED SERVICE"];
        if wide {
            header.extend(["NETWORK", "DESCRIPTION", "TAGS", "AGE"]);
        }
        header
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let mut row = vec![
            Cell::new(&self.ip),
            Cell::new(&self.uuid),
            Cell::new(&self.project),
            Cell::new(&self.name),
            Cell::new(self.ip_type.to_string()).fg(theme.info),
            Cell::new(self.attached_service().unwrap_or_default()),
        ];
        if wide {
            row.extend([
                Cell::new(&self.network),
                Cell::new(&self.description),
                Cell::new(self.tags.join("\n")),
                Cell::new(age(self.created_at)),
            ]);
        }
        row
    }
}

impl TableRow for Tenant {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec!["LOGIN", "NAME", "EMAIL", "PROVIDER", "ADMITTED"];
        if wide {
            header.extend(["DESCRIPTION", "SINCE"]);
        }
        header
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let mut row = vec![
            Cell::new(&self.login),
            Cell::new(&self.name),
            Cell::new(&self.email),
            Cell::new(&self.oauth_provider),
            Cell::new(StatusIcon::flag(self.admitted)).fg(theme.bool_color(self.admitted)),
        ];
        if wide {
            row.extend([
                Cell::new(&self.description),
                Cell::new(timestamp(self.created_at)),
            ]);
        }
        row
    }
}

impl TableRow for Project {
    fn header(_wide: bool) -> Vec<&'static str> {
        vec!["ID", "TENANT", "NAME", "DESCRIPTION", "DEFAULT", "AGE"]
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let description = if wide {
            self.description.clone()
        } else {
            truncate(&self.description, DESCRIPTION_WIDTH)
        };
        vec![
            Cell::new(&self.uuid),
            Cell::new(&self.tenant),
            Cell::new(&self.name),
            Cell::new(description),
            Cell::new(StatusIcon::flag(self.is_default_project))
                .fg(theme.bool_color(self.is_default_project)),
            Cell::new(age(self.created_at)),
        ]
    }
}

impl TableRow for Token {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec![
            "TYPE", "ID", "ADMIN", "USER", "DESCRIPTION", "ROLES", "PERMS", "EXPIRES",
        ];
        if wide {
            header.push("ISSUED");
        }
        header
    }

    fn row(&self, wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let token_type = self
            .token_type
            .strip_prefix("TOKEN_TYPE_")
            .unwrap_or(&self.token_type)
            .to_ascii_lowercase();
        let description = if wide {
            self.description.clone()
        } else {
            truncate(&self.description, DESCRIPTION_WIDTH)
        };
        let expired = self.expires.is_some_and(|at| at < chrono::Utc::now());

        let mut row = vec![
            Cell::new(token_type),
            Cell::new(&self.uuid),
            Cell::new(StatusIcon::flag(self.is_admin())).fg(theme.bool_color(self.is_admin())),
            Cell::new(&self.user),
            Cell::new(description),
            Cell::new(self.role_count()),
            Cell::new(self.method_count()),
            Cell::new(timestamp(self.expires)).fg(if expired { theme.error } else { theme.info }),
        ];
        if wide {
            row.push(Cell::new(timestamp(self.issued_at)));
        }
        row
    }
}

impl TableRow for Coupon {
    fn header(wide: bool) -> Vec<&'static str> {
        let mut header = vec![
            "ID", "NAME", "AMOUNT", "DURATION", "REDEEMED", "MAX", "LEFT", "REDEEM BY",
        ];
        if wide {
            header.push("CREATED");
        }
        header
    }

    fn row(&self, wide: bool, _theme: &ColorTheme) -> Vec<Cell> {
        let mut row = vec![
            Cell::new(&self.id),
            Cell::new(&self.name),
            Cell::new(self.amount()),
            Cell::new(format!("{} months", self.duration_in_month)),
            Cell::new(self.times_redeemed),
            Cell::new(self.max_redemptions),
            Cell::new(self.left()),
            Cell::new(timestamp(self.redeem_by)),
        ];
        if wide {
            row.push(Cell::new(timestamp(self.created_at)));
        }
        row
    }
}

impl TableRow for ServiceHealth {
    fn header(_wide: bool) -> Vec<&'static str> {
        vec!["", "SERVICE", "STATUS", "MESSAGE"]
    }

    fn row(&self, _wide: bool, theme: &ColorTheme) -> Vec<Cell> {
        let status = self
            .status
            .strip_prefix("SERVICE_STATUS_")
            .unwrap_or(&self.status)
            .to_ascii_lowercase();
        vec![
            Cell::new(StatusIcon::health(self)).fg(theme.state_color(&status)),
            Cell::new(&self.name),
            Cell::new(&status).fg(theme.state_color(&status)),
            Cell::new(&self.message),
        ]
    }
}

impl TableRow for MethodPermission {
    fn header(_wide: bool) -> Vec<&'static str> {
        vec!["SUBJECT", "METHODS"]
    }

    fn row(&self, _wide: bool, _theme: &ColorTheme) -> Vec<Cell> {
        vec![Cell::new(&self.subject), Cell::new(self.methods.join("\n"))]
    }
}

impl TableRow for ClusterMonitoring {
    fn header(_wide: bool) -> Vec<&'static str> {
        vec!["ENDPOINT", "USERNAME", "PASSWORD"]
    }

    fn row(&self, _wide: bool, _theme: &ColorTheme) -> Vec<Cell> {
        vec![
            Cell::new(&self.grafana.endpoint),
            Cell::new(&self.grafana.username),
            Cell::new(&self.grafana.password),
        ]
    }
}

impl TableRow for ClientServerVersion {
    fn header(_wide: bool) -> Vec<&'static str> {
        vec!["CLIENT", "SERVER", "REVISION", "BUILD DATE"]
    }

    fn row(&self, _wide: bool, _theme: &ColorTheme) -> Vec<Cell> {
        let server = self.server.clone().unwrap_or_default();
        vec![
            Cell::new(&self.client),
            Cell::new(&server.version),
            Cell::new(&server.revision),
            Cell::new(&server.build_date),
        ]
    }
}
