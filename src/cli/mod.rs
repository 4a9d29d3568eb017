//! Command-line interface for kanban
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::loader::DataSource;
use crate::output::OutputOptions;
use crate::prefs::{FilePreferenceStore, PreferenceStore};

mod prefs;
mod show;
mod view;

/// kanban - board view for tickets
///
/// Fetches tickets and users, groups them into columns by status, user or
/// priority, and orders each column by priority or title.
#[derive(Parser, Debug)]
#[command(name = "kanban")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to kanban.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "KANBAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Board data URL, overriding endpoint.url
    #[arg(long, global = true, env = "KANBAN_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Read board data from a local JSON file instead of the endpoint
    #[arg(long, global = true, conflicts_with = "endpoint")]
    pub data: Option<PathBuf>,

    /// Preference file, overriding preferences.path
    #[arg(long, global = true, env = "KANBAN_PREFS")]
    pub prefs: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive board (default)
    View,

    /// Print the board once and exit
    Show {
        /// Grouping for this run only: status, user, priority
        #[arg(short, long)]
        group: Option<String>,

        /// Ordering for this run only: priority, title
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Remembered grouping and ordering
    #[command(subcommand)]
    Prefs(PrefsCommands),
}

/// Preference subcommands
#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show the active grouping and ordering
    Show,

    /// Remember a grouping: status, user, priority
    Group {
        /// Grouping value
        value: String,
    },

    /// Remember an ordering: priority, title
    Sort {
        /// Ordering value
        value: String,
    },

    /// Forget both values
    Reset,
}

/// Resolved configuration shared by every command
pub(crate) struct Context {
    pub(crate) config: Config,
    pub(crate) source: DataSource,
    pub(crate) store: Arc<dyn PreferenceStore>,
    pub(crate) prefs_path: PathBuf,
    pub(crate) output: OutputOptions,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let context = self.context()?;
        match self.command.unwrap_or(Commands::View) {
            Commands::View => view::run(context),
            Commands::Show { group, sort } => show::run(context, show::ShowOptions { group, sort }),
            Commands::Prefs(cmd) => match cmd {
                PrefsCommands::Show => prefs::run_show(context),
                PrefsCommands::Group { value } => prefs::run_group(context, &value),
                PrefsCommands::Sort { value } => prefs::run_sort(context, &value),
                PrefsCommands::Reset => prefs::run_reset(context),
            },
        }
    }

    fn context(&self) -> Result<Context> {
        let mut config = Config::resolve(self.config.as_deref())?;
        if let Some(url) = &self.endpoint {
            config.endpoint.url = url.clone();
            config.validate()?;
        }
        if let Some(path) = &self.prefs {
            config.preferences.path = Some(path.clone());
        }

        let source = match &self.data {
            Some(path) => DataSource::File(path.clone()),
            None => DataSource::from_endpoint(&config.endpoint),
        };
        let prefs_path = config.preferences_path()?;
        debug!(
            source = %source.origin(),
            prefs = %prefs_path.display(),
            "resolved context"
        );

        Ok(Context {
            store: Arc::new(FilePreferenceStore::new(prefs_path.clone())),
            config,
            source,
            prefs_path,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["kanban"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn data_conflicts_with_endpoint() {
        let result = Cli::try_parse_from([
            "kanban",
            "--data",
            "board.json",
            "--endpoint",
            "http://localhost/board",
            "show",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn show_accepts_overrides() {
        let cli = Cli::try_parse_from(["kanban", "show", "--group", "user", "-s", "title"])
            .expect("parse");
        match cli.command {
            Some(Commands::Show { group, sort }) => {
                assert_eq!(group.as_deref(), Some("user"));
                assert_eq!(sort.as_deref(), Some("title"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
