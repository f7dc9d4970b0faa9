//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Print archived rounds in the final board
    pub show_archive: bool,
    /// Print the raw `[role] token` diagnostic stream
    pub show_diagnostics: bool,
    /// Enable colored terminal output
    pub color: bool,
    /// Record every inbound frame to this JSONL file
    pub record_path: Option<PathBuf>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            show_archive: true,
            show_diagnostics: false,
            color: true,
            record_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_section_deserialize() {
        let toml_str = r#"
[output]
show_diagnostics = true
record_path = "logs/session.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.output.show_diagnostics);
        assert!(config.output.show_archive);
        assert_eq!(
            config.output.record_path,
            Some(PathBuf::from("logs/session.jsonl"))
        );
    }
}
