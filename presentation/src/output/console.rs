//! Console output formatter for the consultation board

use colored::Colorize;
use mdt_application::{ConsultationState, ExecutionLog, LogEntry};
use mdt_domain::{
    AgentRole, AgentRoster, AgentStatus, ChatRole, ConfigIssue, Round, RoundLedger, Severity,
    StreamAccumulator, Transcript,
};
use serde_json::{Value, json};

/// Formats consultation state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete board
    pub fn format(state: &ConsultationState, show_archive: bool) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Consultation Board"));
        output.push('\n');

        if let Some(id) = &state.session.id {
            output.push_str(&format!(
                "{} {} ({})\n",
                "Session:".cyan().bold(),
                id,
                state.session.connection
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Round:".cyan().bold(),
            state.ledger.round_number()
        ));

        output.push_str(&Self::section_header("Agents"));
        output.push_str(&Self::format_agents(&state.agents));

        output.push_str(&Self::section_header("Structured Case"));
        output.push_str(&Self::format_structured_info(&state.ledger));

        let title = format!("Round {} (current)", state.ledger.round_number());
        output.push_str(&Self::section_header(&title));
        output.push_str(&Self::format_round(state.ledger.current()));

        if show_archive && !state.ledger.archive().is_empty() {
            for round in state.ledger.archive().iter().rev() {
                output.push_str(&Self::section_header(&format!("Round {} (archived)", round.round)));
                output.push_str(&Self::format_round(round));
            }
        }

        if !state.transcript.is_empty() {
            output.push_str(&Self::section_header("Conversation"));
            output.push_str(&Self::format_transcript(&state.transcript));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the Moderator conclusion only (concise output)
    pub fn format_summary(state: &ConsultationState) -> String {
        let mut output = String::new();
        let round = state.ledger.current();

        output.push_str(&format!(
            "{}\n\n",
            format!("=== Round {} Conclusion ===", state.ledger.round_number())
                .cyan()
                .bold()
        ));

        if round.summary.is_empty() {
            output.push_str(&format!("{}\n", "(no conclusion yet)".dimmed()));
        } else {
            output.push_str(&round.summary);
            output.push('\n');
        }

        if !round.conflicts.is_empty() {
            output.push_str(&format!("\n{}\n", "Conflicts:".yellow().bold()));
            output.push_str(&Self::format_conflicts(round));
        }

        output
    }

    /// Format as JSON
    pub fn format_json(state: &ConsultationState) -> String {
        let value = json!({
            "session": state.session,
            "agents": state
                .agents
                .iter()
                .map(|(role, status)| (role.as_str().to_string(), json!(status)))
                .collect::<serde_json::Map<_, _>>(),
            "structured_info": state.ledger.structured_info(),
            "round": state.ledger.current(),
            "archive": state.ledger.archive(),
            "transcript": state.transcript.messages(),
            "logs": state
                .logs
                .entries()
                .iter()
                .map(|e| json!({
                    "at": e.at.to_rfc3339(),
                    "error": e.is_error(),
                    "message": e.message,
                }))
                .collect::<Vec<_>>(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_agents(roster: &AgentRoster) -> String {
        let mut output = String::new();
        for (role, status) in roster.iter() {
            let label = match status {
                AgentStatus::Working => status.as_str().yellow().bold(),
                AgentStatus::Idle => status.as_str().dimmed(),
                AgentStatus::Offline => status.as_str().red(),
            };
            output.push_str(&format!("  {:<18} {}\n", role.as_str(), label));
        }
        output
    }

    pub fn format_structured_info(ledger: &RoundLedger) -> String {
        let info = ledger.structured_info();
        if info.is_empty() {
            let streaming = ledger.structured_text();
            if streaming.is_empty() {
                return format!("  {}\n", "(empty)".dimmed());
            }
            return format!("  {} {}\n", "(streaming)".dimmed(), streaming);
        }

        let mut output = String::new();
        for (key, value) in info.as_map() {
            output.push_str(&format!("  {}: {}\n", key.bold(), Self::display_value(value)));
        }
        output
    }

    pub fn format_round(round: &Round) -> String {
        let mut output = String::new();

        for (role, opinion) in &round.opinions {
            if opinion.is_empty() {
                continue;
            }
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", role).yellow().bold(),
                opinion
            ));
            let summary = round.specialist_summary(*role);
            if !summary.is_empty() {
                output.push_str(&format!("{} {}\n", "Summary:".dimmed(), summary));
            }
        }

        // Summaries without a matching opinion (e.g. streamed before the opinion)
        for (role, summary) in &round.summaries {
            if !summary.is_empty() && round.opinion(*role).is_empty() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    format!("── {} (summary) ──", role).yellow(),
                    summary
                ));
            }
        }

        if !round.discussion_notes.is_empty() {
            output.push_str(&format!(
                "\n{}\n{}\n",
                AgentRole::TeamDiscussion.as_str().cyan().bold(),
                round.discussion_notes
            ));
        }

        if !round.conflicts.is_empty() {
            output.push_str(&format!("\n{}\n", "Conflicts:".yellow().bold()));
            output.push_str(&Self::format_conflicts(round));
        }

        if !round.summary.is_empty() {
            output.push_str(&format!(
                "\n{}\n{}\n",
                "Moderator conclusion:".green().bold(),
                round.summary
            ));
        }

        if output.is_empty() {
            output.push_str(&format!("  {}\n", "(nothing yet)".dimmed()));
        }
        output
    }

    fn format_conflicts(round: &Round) -> String {
        round
            .conflicts
            .iter()
            .map(|c| {
                let severity = match c.severity.to_lowercase().as_str() {
                    "high" => c.severity.red().bold(),
                    "medium" => c.severity.yellow(),
                    _ => c.severity.normal(),
                };
                format!("  * [{}] {}\n", severity, c.issue)
            })
            .collect()
    }

    pub fn format_transcript(transcript: &Transcript) -> String {
        let mut output = String::new();
        for message in transcript.messages() {
            let speaker = match message.role {
                ChatRole::User => "You".blue().bold(),
                ChatRole::Moderator if message.model.is_empty() => "Moderator".green().bold(),
                ChatRole::Moderator => format!("Moderator ({})", message.model).green().bold(),
            };
            let cursor = if message.is_open() { " ..." } else { "" };
            output.push_str(&format!("{}: {}{}\n", speaker, message.content, cursor));
        }
        output
    }

    pub fn format_log_entry(entry: &LogEntry) -> String {
        if entry.is_error() {
            entry.to_string().red().to_string()
        } else {
            entry.to_string().dimmed().to_string()
        }
    }

    pub fn format_logs(logs: &ExecutionLog) -> String {
        logs.entries()
            .iter()
            .map(|e| format!("{}\n", Self::format_log_entry(e)))
            .collect()
    }

    pub fn format_diagnostics(stream: &StreamAccumulator) -> String {
        let mut output = Self::section_header("Token stream");
        for line in stream.diagnostics() {
            output.push_str(line);
            output.push('\n');
        }
        output
    }

    pub fn format_issue(issue: &ConfigIssue) -> String {
        match issue.severity {
            Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
            Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
        }
    }

    fn display_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
