//! CLI argument parsing for the tripplan-worker binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::TravelMode;

#[derive(Parser)]
#[command(name = "tripplan-worker", about = "Trip itinerary planning worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Plan a trip from a JSON request file and print the itinerary
    Plan {
        /// Trip request JSON (places, lodgings, days)
        #[arg(long, short)]
        input: PathBuf,
        /// Override the travel mode of the request (driving, transit)
        #[arg(long)]
        mode: Option<TravelMode>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["tripplan-worker"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_serve_command_parses() {
        let cli = Cli::parse_from(["tripplan-worker", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_cli_plan_command_parses() {
        let cli = Cli::parse_from(["tripplan-worker", "plan", "--input", "trip.json", "--mode", "driving", "--pretty"]);
        match cli.command {
            Some(Command::Plan { input, mode, pretty }) => {
                assert_eq!(input, PathBuf::from("trip.json"));
                assert_eq!(mode, Some(TravelMode::Driving));
                assert!(pretty);
            }
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_cli_plan_requires_input() {
        assert!(Cli::try_parse_from(["tripplan-worker", "plan"]).is_err());
    }

    #[test]
    fn test_cli_plan_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["tripplan-worker", "plan", "-i", "t.json", "--mode", "walking"]).is_err());
    }
}
