//! Command-line surface of the hook binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "youtrack-hook")]
#[command(version)]
#[command(about = "Report crash events as YouTrack issues")]
pub struct Args {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the configured credentials and project are valid
    Verify,

    /// Create an issue from an issue impact change payload
    Submit {
        /// JSON payload file; reads stdin when omitted
        #[arg(long)]
        payload: Option<PathBuf>,
    },

    /// Dispatch a raw hook event by name
    Receive {
        /// Event name, e.g. `verification` or `issue_impact_change`
        event: String,

        /// JSON payload file; reads stdin when omitted
        #[arg(long)]
        payload: Option<PathBuf>,
    },

    /// Store project settings in the config file
    Configure {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        project_id: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Args, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_submit_with_payload_and_global_config() {
        let args = Args::parse_from([
            "youtrack-hook",
            "submit",
            "--payload",
            "event.json",
            "--config",
            "hook.json",
        ]);
        assert_eq!(args.config.as_deref().and_then(|p| p.to_str()), Some("hook.json"));
        match args.command {
            Commands::Submit { payload } => {
                assert_eq!(payload.as_deref().and_then(|p| p.to_str()), Some("event.json"))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_receive_event_name() {
        let args = Args::parse_from(["youtrack-hook", "receive", "verification"]);
        assert!(matches!(
            args.command,
            Commands::Receive { ref event, payload: None } if event == "verification"
        ));
    }
}
