use crate::domain::model::ReferenceKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cortex-links")]
#[command(about = "Resolve cortex.yaml references to Cortex catalog links")]
pub struct CliConfig {
    #[arg(long, short, default_value = "cortex-links.toml")]
    pub config: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check connectivity to the Cortex UI and API base URLs
    Health,
    /// List every Cortex reference in a cortex.yaml file
    Scan {
        file: PathBuf,
        #[arg(long, help = "Also resolve the navigation URL of each reference")]
        resolve: bool,
    },
    /// Print the navigation URL for a single value
    Resolve { kind: KindArg, value: String },
    /// Find cortex.yaml files and print their x-cortex-tag
    Detect {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    ServiceId,
    Tag,
    Owner,
}

impl From<KindArg> for ReferenceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::ServiceId => ReferenceKind::ServiceId,
            KindArg::Tag => ReferenceKind::CrossReferenceTag,
            KindArg::Owner => ReferenceKind::OwnerReference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_command() {
        let cli = CliConfig::parse_from(["cortex-links", "--verbose", "scan", "cortex.yaml", "--resolve"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("cortex-links.toml"));
        match cli.command {
            Command::Scan { file, resolve } => {
                assert_eq!(file, PathBuf::from("cortex.yaml"));
                assert!(resolve);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_resolve_kind() {
        let cli = CliConfig::parse_from(["cortex-links", "resolve", "owner", "platform"]);
        match cli.command {
            Command::Resolve { kind, value } => {
                assert_eq!(ReferenceKind::from(kind), ReferenceKind::OwnerReference);
                assert_eq!(value, "platform");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
