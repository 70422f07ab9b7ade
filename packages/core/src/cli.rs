use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::provider::ResourceKind;

/// Baselime provider CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "baselime-provider",
    version,
    about = "Manage Baselime queries, alerts and dashboards as declarative resources"
)]
pub struct Cli {
    /// Baselime API key (falls back to BASELIME_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API host, e.g. go.baselime.io
    #[arg(long)]
    pub api_host: Option<String>,

    /// API scheme (https or http)
    #[arg(long)]
    pub api_scheme: Option<String>,

    /// Path of the local state file
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Log the body of rejected API responses (also BASELIME_DEBUG)
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the resource types this provider manages
    Resources,

    /// Create a resource from a JSON plan file
    Create {
        kind: ResourceKind,
        plan: PathBuf,
    },

    /// Refresh a managed resource from the API (`<name>` for queries,
    /// `<service>/<name>` for alerts and dashboards)
    Read { kind: ResourceKind, id: String },

    /// Replace a managed resource with a JSON plan file
    Update {
        kind: ResourceKind,
        plan: PathBuf,
    },

    /// Delete a managed resource (same identifier as `read`)
    Delete { kind: ResourceKind, id: String },

    /// Adopt an existing remote object (`<id>` for queries,
    /// `<service>/<id>` for alerts and dashboards)
    Import { kind: ResourceKind, id: String },
}

impl Command {
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Command::Resources => None,
            Command::Create { kind, .. }
            | Command::Read { kind, .. }
            | Command::Update { kind, .. }
            | Command::Delete { kind, .. }
            | Command::Import { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_kind_and_plan() {
        let cli = Cli::try_parse_from([
            "baselime-provider",
            "--api-host",
            "localhost:3000",
            "create",
            "dashboard",
            "plan.json",
        ])
        .unwrap();

        assert_eq!(cli.api_host.as_deref(), Some("localhost:3000"));
        assert_eq!(cli.command.kind(), Some(ResourceKind::Dashboard));
        match cli.command {
            Command::Create { plan, .. } => assert_eq!(plan, PathBuf::from("plan.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let result = Cli::try_parse_from(["baselime-provider", "read", "monitor", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_service_scoped_delete_and_debug_flag() {
        let cli = Cli::try_parse_from([
            "baselime-provider",
            "--debug",
            "delete",
            "alert",
            "checkout/too-many-errors",
        ])
        .unwrap();

        assert!(cli.debug);
        match cli.command {
            Command::Delete { kind, id } => {
                assert_eq!(kind, ResourceKind::Alert);
                assert_eq!(id, "checkout/too-many-errors");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn resources_has_no_kind() {
        let cli = Cli::try_parse_from(["baselime-provider", "resources"]).unwrap();
        assert_eq!(cli.command.kind(), None);
    }
}
