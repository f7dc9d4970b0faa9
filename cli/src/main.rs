//! CLI entrypoint for mdt-consult
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use mdt_application::{
    ConsultationController, ConsultationObserver, EventRecorder, NoEventRecorder, NoObserver,
    SessionParams,
};
use mdt_domain::{AgentRole, ConfigIssue, ConfigIssueCode, ConsultationConfig};
use mdt_infrastructure::{
    ConfigLoader, FileConfig, HttpConsultationApi, JsonlEventRecorder, TcpEventTransport,
};
use mdt_presentation::{
    Cli, ConsoleFormatter, OutputConfig, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

type Controller = ConsultationController<TcpEventTransport, HttpConsultationApi>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting mdt-consult");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    match file_config.check() {
        Ok(warnings) => {
            for issue in &warnings {
                eprintln!("{}", ConsoleFormatter::format_issue(issue));
            }
        }
        Err(e) => {
            for issue in &e.issues {
                eprintln!("{}", ConsoleFormatter::format_issue(issue));
            }
            bail!("Invalid configuration");
        }
    }

    let (consultation, cli_issues) = build_consultation_config(&file_config, &cli);
    for issue in &cli_issues {
        eprintln!("{}", ConsoleFormatter::format_issue(issue));
    }
    if consultation.selected_agents.is_empty() {
        bail!("No agents selected");
    }

    let output = OutputConfig {
        format: cli.output,
        color: file_config.output.color,
        show_archive: file_config.output.show_archive,
        show_diagnostics: cli.diagnostics || file_config.output.show_diagnostics,
        show_progress: !cli.quiet,
    };
    output.apply_color();

    // === Dependency Injection ===
    let api_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| file_config.server.api_base_url.clone());
    let stream_addr = cli
        .stream_addr
        .clone()
        .unwrap_or_else(|| file_config.server.stream_addr.clone());

    let transport = Arc::new(TcpEventTransport::new(stream_addr));
    let api = Arc::new(HttpConsultationApi::new(
        api_url,
        file_config.server.request_timeout(),
    )?);

    let observer: Arc<dyn ConsultationObserver> = if !output.show_progress {
        Arc::new(NoObserver)
    } else if output.format == OutputFormat::Json {
        Arc::new(SimpleProgress)
    } else {
        Arc::new(ProgressReporter::new())
    };

    let recorder: Arc<dyn EventRecorder> = match cli
        .record
        .as_deref()
        .or(file_config.output.record_path.as_deref())
    {
        Some(path) => Arc::new(
            JsonlEventRecorder::open(path)
                .with_context(|| format!("Cannot open record file {}", path.display()))?,
        ),
        None => Arc::new(NoEventRecorder),
    };

    let mut controller = ConsultationController::new(transport, api)
        .with_params(
            SessionParams::default().with_connect_timeout(file_config.server.connect_timeout()),
        )
        .with_observer(observer)
        .with_recorder(recorder);

    // === Rounds ===
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let mut case = match cli.case.clone() {
        Some(case) => case,
        None if cli.interactive => match prompt(&mut stdin, "Case").await? {
            Some(case) => case,
            None => return Ok(()),
        },
        None => bail!("Case text is required. Use --interactive to enter it on stdin."),
    };

    if output.show_progress && output.format != OutputFormat::Json {
        println!();
        println!("Agents: {}", role_list(&consultation.selected_agents));
        println!();
    }

    loop {
        let result = run_round(&mut controller, &case, &consultation).await;
        if settle_round(result, cli.interactive)? {
            print_board(&controller, &output);
        }

        if !cli.interactive {
            break;
        }
        match prompt(&mut stdin, "Follow-up").await? {
            Some(next) => case = next,
            None => break,
        }
    }

    Ok(())
}

/// Submit one case and follow the round until it ends or Ctrl-C stops it.
async fn run_round(
    controller: &mut Controller,
    case: &str,
    consultation: &ConsultationConfig,
) -> Result<()> {
    controller.consult(case, consultation).await?;

    let interrupted = tokio::select! {
        _ = controller.run_round() => false,
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        warn!("Interrupted, stopping session");
        controller.stop().await;
    }
    Ok(())
}

/// Decide what a round result means for the program.
///
/// Returns whether the round ran. In interactive mode a failed round is
/// reported and the prompt comes back; otherwise the error ends the run.
fn settle_round(result: Result<()>, interactive: bool) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if interactive => {
            warn!("Round failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn print_board(controller: &Controller, output: &OutputConfig) {
    let state = controller.state();
    let board = match output.format {
        OutputFormat::Full => ConsoleFormatter::format(state, output.show_archive),
        OutputFormat::Summary => ConsoleFormatter::format_summary(state),
        OutputFormat::Json => ConsoleFormatter::format_json(state),
    };
    println!("{}", board);

    // Without an observer nobody printed the execution log live
    if !output.show_progress && output.format != OutputFormat::Json {
        print!("{}", ConsoleFormatter::format_logs(&state.logs));
    }
    if output.show_diagnostics {
        print!("{}", ConsoleFormatter::format_diagnostics(&state.stream));
    }
}

/// Read the next non-empty line; `None` on end of input or `exit`/`quit`.
async fn prompt(stdin: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    loop {
        print!("{}> ", label);
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else {
            return Ok(None);
        };
        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => return Ok(None),
            _ => return Ok(Some(line.to_string())),
        }
    }
}

/// Merge the `[agents]` config with `--agent` / `--model` flags.
fn build_consultation_config(file: &FileConfig, cli: &Cli) -> (ConsultationConfig, Vec<ConfigIssue>) {
    let (mut config, _) = file.agents.to_consultation_config();
    let mut issues = Vec::new();

    if !cli.agents.is_empty() {
        let mut selected: Vec<AgentRole> = Vec::new();
        for role in &cli.agents {
            if !selected.contains(role) {
                selected.push(*role);
            }
        }
        config.model_configs.retain(|role, _| selected.contains(role));
        config.selected_agents = selected;
    }

    for (role, model) in &cli.models {
        if !config.is_selected(*role) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnusedModelOverride {
                    role: role.to_string(),
                },
                format!("--model {}: agent is not selected, override ignored", role),
            ));
            continue;
        }
        config.model_configs.insert(*role, model.clone());
    }

    (config, issues)
}

fn role_list(roles: &[AgentRole]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "mdt-consult.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["mdt-consult"];
        argv.extend_from_slice(args);
        argv.push("case");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_failed_round_keeps_interactive_session_alive() {
        assert!(!settle_round(Err(anyhow!("connection refused")), true).unwrap());
        assert!(settle_round(Ok(()), true).unwrap());
    }

    #[test]
    fn test_failed_round_ends_one_shot_run() {
        let err = settle_round(Err(anyhow!("connection refused")), false).unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
        assert!(settle_round(Ok(()), false).unwrap());
    }

    #[test]
    fn test_file_config_used_without_flags() {
        let mut file = FileConfig::default();
        file.agents
            .models
            .insert("Moderator".to_string(), "gpt-5.1".to_string());

        let (config, issues) = build_consultation_config(&file, &cli(&[]));

        assert!(issues.is_empty());
        assert_eq!(config.selected_agents, AgentRole::default_selection());
        assert_eq!(config.model_for(AgentRole::Moderator), Some("gpt-5.1"));
    }

    #[test]
    fn test_agent_flags_replace_selection() {
        let mut file = FileConfig::default();
        file.agents
            .models
            .insert("Radiologist".to_string(), "m-rad".to_string());

        let (config, _) = build_consultation_config(
            &file,
            &cli(&["-a", "Moderator", "-a", "Case Organizer", "-a", "Moderator"]),
        );

        assert_eq!(
            config.selected_agents,
            vec![AgentRole::Moderator, AgentRole::CaseOrganizer]
        );
        assert!(config.model_for(AgentRole::Radiologist).is_none());
    }

    #[test]
    fn test_model_flag_for_unselected_agent_warns() {
        let (config, issues) = build_consultation_config(
            &FileConfig::default(),
            &cli(&["-a", "Moderator", "--model", "Radiologist=m1", "--model", "Moderator=m2"]),
        );

        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(config.model_for(AgentRole::Moderator), Some("m2"));
        assert!(config.model_for(AgentRole::Radiologist).is_none());
    }
}
