//! JSONL file writer for recorded session events.
//!
//! One line per [`RecordedEvent`]:
//!
//! ```json
//! {"seq":3,"at":"2026-01-05T09:14:02.118Z","kind":"frame","payload":{"type":"token",...}}
//! ```
//!
//! The payload is kept verbatim under `payload` so a recording of inbound
//! frames can be replayed through the dispatcher unchanged.

use mdt_application::ports::event_recorder::{EventRecorder, RecordedEvent};
use serde_json::json;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

pub struct JsonlEventRecorder {
    state: Mutex<RecorderState>,
    path: PathBuf,
}

struct RecorderState {
    writer: BufWriter<File>,
    seq: u64,
}

impl JsonlEventRecorder {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            state: Mutex::new(RecorderState {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventRecorder for JsonlEventRecorder {
    fn record(&self, event: RecordedEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.seq += 1;

        let line = json!({
            "seq": state.seq,
            "at": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "kind": event.kind,
            "payload": event.payload,
        });

        // Flushed per line so a crash loses at most the current record.
        let result = writeln!(state.writer, "{}", line).and_then(|_| state.writer.flush());
        if let Err(e) = result {
            warn!("Failed to record event to {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlEventRecorder {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.writer.flush();
        }
    }
}
