//! Live progress reporting while a round runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mdt_application::{ConsultationObserver, LogEntry};
use mdt_domain::{AgentRole, AgentStatus, Destination, MergeReport};
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Activity {
    working: BTreeSet<AgentRole>,
    tokens: usize,
}

impl Activity {
    fn message(&self) -> String {
        let who = if self.working.is_empty() {
            "waiting".to_string()
        } else {
            self.working
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{} · {} tokens", who, self.tokens)
    }
}

/// Spinner showing which agents are working, with log lines printed above it
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    activity: Mutex<Activity>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            activity: Mutex::new(Activity::default()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn refresh(&self) {
        let message = match self.activity.lock() {
            Ok(activity) => activity.message(),
            Err(_) => return,
        };
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(message);
        }
    }

    /// Print above the spinner, or plainly when there is none.
    fn println(&self, line: String) {
        match self.spinner.lock() {
            Ok(guard) if guard.is_some() => {
                if let Some(pb) = guard.as_ref() {
                    pb.println(line);
                }
            }
            _ => println!("{}", line),
        }
    }

    fn finish(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsultationObserver for ProgressReporter {
    fn on_connection_change(&self, connected: bool) {
        if !connected {
            self.finish();
            return;
        }
        if let Ok(mut activity) = self.activity.lock() {
            *activity = Activity::default();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Consulting");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish_and_clear();
            }
        }
        self.refresh();
    }

    fn on_status_change(&self, role: AgentRole, status: AgentStatus) {
        if let Ok(mut activity) = self.activity.lock() {
            if status.is_working() {
                activity.working.insert(role);
            } else {
                activity.working.remove(&role);
            }
        }
        self.refresh();
    }

    fn on_token(&self, _role: AgentRole, _destination: Destination, _content: &str) {
        if let Ok(mut activity) = self.activity.lock() {
            activity.tokens += 1;
        }
        self.refresh();
    }

    fn on_node_finished(&self, node: Option<&str>, report: &MergeReport) {
        if report.is_empty() {
            return;
        }
        self.println(format!(
            "  {} {} finished",
            "v".green(),
            node.unwrap_or("node")
        ));
    }

    fn on_log(&self, entry: &LogEntry) {
        self.println(ConsoleFormatter::format_log_entry(entry));
    }

    fn on_round_finished(&self, success: bool) {
        self.finish();
        if success {
            println!("{} {}", "v".green(), "Round finished".bold());
        } else {
            println!("{} {}", "x".red(), "Round failed".bold());
        }
    }
}

/// Simple text-based progress (no spinner)
pub struct SimpleProgress;

impl ConsultationObserver for SimpleProgress {
    fn on_status_change(&self, role: AgentRole, status: AgentStatus) {
        if status.is_working() {
            println!("{} {}", "->".cyan(), format!("{} working", role).bold());
        }
    }

    fn on_log(&self, entry: &LogEntry) {
        println!("{}", ConsoleFormatter::format_log_entry(entry));
    }

    fn on_round_finished(&self, success: bool) {
        if success {
            println!("  {} Round finished\n", "v".green());
        } else {
            println!("  {} Round failed\n", "x".red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_message() {
        let mut activity = Activity::default();
        assert_eq!(activity.message(), "waiting · 0 tokens");

        activity.working.insert(AgentRole::Pathologist);
        activity.working.insert(AgentRole::Radiologist);
        activity.tokens = 12;
        assert_eq!(activity.message(), "Radiologist, Pathologist · 12 tokens");
    }

    #[test]
    fn test_reporter_tracks_working_agents() {
        let reporter = ProgressReporter::new();
        reporter.on_status_change(AgentRole::Moderator, AgentStatus::Working);
        reporter.on_token(AgentRole::Moderator, Destination::Chat, "Hi");
        reporter.on_status_change(AgentRole::Radiologist, AgentStatus::Working);
        reporter.on_status_change(AgentRole::Moderator, AgentStatus::Idle);

        let activity = reporter.activity.lock().unwrap();
        assert_eq!(
            activity.working.iter().copied().collect::<Vec<_>>(),
            vec![AgentRole::Radiologist]
        );
        assert_eq!(activity.tokens, 1);
    }
}
