//! CLI command definitions

use clap::{Parser, ValueEnum};
use mdt_domain::AgentRole;
use std::path::PathBuf;

/// Output format for the final board
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Agents, structured info, current round, archive and transcript
    Full,
    /// Only the Moderator's conclusion and conflicts
    Summary,
    /// Machine-readable JSON
    Json,
}

/// CLI arguments for mdt-consult
#[derive(Parser, Debug)]
#[command(name = "mdt-consult")]
#[command(author, version, about = "Live client for multi-agent case consultations")]
#[command(long_about = r#"
mdt-consult submits a clinical case to a consultation server and follows the
multi-agent discussion live: agent statuses, streamed opinions, structured
findings, conflicts and the Moderator's conclusion.

Press Ctrl-C during a round to stop it; the board is rolled back to the start
of that round.

Configuration files are loaded from (in priority order):
1. MDT_* environment variables
2. --config <path>     Explicit config file
3. ./mdt.toml          Project-level config
4. ~/.config/mdt-consult/config.toml   Global config

Example:
  mdt-consult "62F, 2 years progressive dyspnea, bibasilar crackles"
  mdt-consult -a "Case Organizer" -a Radiologist -a Moderator --model Moderator=gpt-5.1 "..."
  mdt-consult --interactive
"#)]
pub struct Cli {
    /// Case text to submit (read from stdin in interactive mode if omitted)
    pub case: Option<String>,

    /// Keep the session open and read follow-up questions from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Agents taking part (can be specified multiple times)
    #[arg(short, long = "agent", value_name = "ROLE", value_parser = parse_role)]
    pub agents: Vec<AgentRole>,

    /// Model override for one agent (can be specified multiple times)
    #[arg(short, long = "model", value_name = "ROLE=MODEL", value_parser = parse_model_override)]
    pub models: Vec<(AgentRole, String)>,

    /// Consultation API base URL
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Event stream address (host:port)
    #[arg(long, value_name = "ADDR")]
    pub stream_addr: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Record every inbound event to a JSONL file
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print the raw `[role] token` stream after each round
    #[arg(long)]
    pub diagnostics: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

fn parse_role(s: &str) -> Result<AgentRole, String> {
    s.parse::<AgentRole>().map_err(|e| e.to_string())
}

/// Parse `ROLE=MODEL`; the role may contain spaces ("Case Organizer=gpt-5.1").
fn parse_model_override(s: &str) -> Result<(AgentRole, String), String> {
    let (role, model) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=MODEL, got '{}'", s))?;
    let model = model.trim();
    if model.is_empty() {
        return Err(format!("empty model name for '{}'", role.trim()));
    }
    Ok((parse_role(role.trim())?, model.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["mdt-consult", "45M, cough"]).unwrap();
        assert_eq!(cli.case.as_deref(), Some("45M, cough"));
        assert!(cli.agents.is_empty());
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_parse_agents_and_models() {
        let cli = Cli::try_parse_from([
            "mdt-consult",
            "-a",
            "Case Organizer",
            "--agent",
            "Moderator",
            "--model",
            "Moderator=gpt-5.1",
            "-vv",
            "case",
        ])
        .unwrap();
        assert_eq!(cli.agents, vec![AgentRole::CaseOrganizer, AgentRole::Moderator]);
        assert_eq!(cli.models, vec![(AgentRole::Moderator, "gpt-5.1".to_string())]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_agent_is_rejected() {
        assert!(Cli::try_parse_from(["mdt-consult", "-a", "Cardiologist", "x"]).is_err());
    }

    #[test]
    fn test_model_override_parsing() {
        assert_eq!(
            parse_model_override("Case Organizer = claude-haiku-4-5").unwrap(),
            (AgentRole::CaseOrganizer, "claude-haiku-4-5".to_string())
        );
        assert!(parse_model_override("Moderator").is_err());
        assert!(parse_model_override("Moderator=").is_err());
        assert!(parse_model_override("Nobody=m1").is_err());
    }
}
