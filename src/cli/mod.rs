//! CLI command parsing and execution.

pub mod generate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::build_info;
use crate::core::header::OutputFormat;
use crate::core::version::Version;

/// verstamp - generate version-information sources at build time.
#[derive(Parser)]
#[command(name = "verstamp")]
#[command(about = "Generate version-information sources at build time")]
#[command(version = build_info::VERSION, long_version = build_info::LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Substitute explicitly given values into a template.
    Render {
        /// Project name (drives the include guard).
        #[arg(long)]
        project: String,

        /// Namespace the constants are declared in.
        #[arg(long)]
        namespace: String,

        /// Version as major.minor.point.build.
        #[arg(long, value_name = "MAJOR.MINOR.POINT.BUILD")]
        version_number: Version,

        /// Commit hash to embed.
        #[arg(long)]
        hash: String,

        /// Whether the working tree had uncommitted changes.
        #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
        modified: bool,

        /// Output language.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Cpp)]
        format: OutputFormat,

        /// C++ type constructed from the four version parts.
        #[arg(long, default_value = "Version")]
        version_type: String,

        /// Header included for the C++ version type.
        #[arg(long, default_value = "version.h")]
        version_include: String,

        /// Custom template file.
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file (stdout if not specified).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate version info from configuration, the release file and git.
    #[command(visible_alias = "gen")]
    Generate {
        /// Project config file (defaults to ./verstamp.toml).
        #[arg(short, long, env = "VERSTAMP_CONFIG")]
        config: Option<PathBuf>,

        /// Output file, overriding the configured one.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if the output is stale instead of writing it.
        #[arg(long)]
        check: bool,
    },

    /// Show the resolved version information.
    Show {
        /// Project config file (defaults to ./verstamp.toml).
        #[arg(short, long, env = "VERSTAMP_CONFIG")]
        config: Option<PathBuf>,

        /// Output format (text or json).
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the placeholders a template uses.
    Placeholders {
        /// Template file.
        template: PathBuf,
    },

    /// Manage configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        /// Project config file (defaults to ./verstamp.toml).
        #[arg(short, long, env = "VERSTAMP_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show the global configuration file path.
    Path,
}
