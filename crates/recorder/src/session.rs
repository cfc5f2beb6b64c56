//! One recording session: a frozen client set and an open CSV artifact

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use patchbay_protocol::{ClientId, CHANNELS_PER_CLIENT};

use crate::error::{RecorderError, Result};

/// An open CSV recording
///
/// The client list is frozen at creation: clients connecting later are
/// not added, and clients disconnecting mid-recording keep their columns,
/// which continue to carry the last value the session saw for them.
#[derive(Debug)]
pub struct RecordingSession {
    path: PathBuf,
    writer: BufWriter<File>,
    frozen: Vec<ClientId>,
    last: Vec<[String; CHANNELS_PER_CLIENT]>,
}

impl RecordingSession {
    /// Create a new artifact and freeze the column set
    ///
    /// The file lands in `logs_dir` (created if missing) as
    /// `monitor_<YYYYmmdd_HHMMSS>.csv`, and the header row is written
    /// immediately.
    pub fn start(logs_dir: &Path, clients: &[ClientId]) -> Result<Self> {
        fs::create_dir_all(logs_dir).map_err(|e| RecorderError::Create {
            path: logs_dir.display().to_string(),
            source: e,
        })?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = logs_dir.join(format!("monitor_{stamp}.csv"));
        let file = File::create(&path).map_err(|e| RecorderError::Create {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut session = Self {
            path,
            writer: BufWriter::new(file),
            frozen: clients.to_vec(),
            last: vec![Default::default(); clients.len()],
        };
        session.write_header()?;

        tracing::info!(
            path = %session.path.display(),
            clients = session.frozen.len(),
            "recording started"
        );
        Ok(session)
    }

    /// Artifact path
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The frozen client column set
    #[inline]
    pub fn frozen(&self) -> &[ClientId] {
        &self.frozen
    }

    /// Append one row
    ///
    /// `snapshots` must align with the frozen client list; `None` marks a
    /// client that is no longer live, whose columns repeat the last value
    /// this session saw for it.
    pub fn append(
        &mut self,
        elapsed: Duration,
        snapshots: &[Option<[String; CHANNELS_PER_CLIENT]>],
    ) -> Result<()> {
        debug_assert_eq!(snapshots.len(), self.frozen.len());

        for (cached, snapshot) in self.last.iter_mut().zip(snapshots) {
            if let Some(values) = snapshot {
                cached.clone_from(values);
            }
        }

        let mut row = format!(
            "\"{}.{:06}\"",
            elapsed.as_secs(),
            elapsed.subsec_micros()
        );
        for values in &self.last {
            for value in values {
                row.push(',');
                push_csv_field(&mut row, value);
            }
        }
        row.push('\n');

        self.write_all(row.as_bytes())
    }

    fn write_header(&mut self) -> Result<()> {
        let mut header = String::from("timestamp");
        for id in &self.frozen {
            for ch in 0..CHANNELS_PER_CLIENT {
                header.push_str(&format!(",client{}_ch{}", id.as_u32(), ch));
            }
        }
        header.push('\n');
        self.write_all(header.as_bytes())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .and_then(|()| self.writer.flush())
            .map_err(|e| RecorderError::Write {
                path: self.path.display().to_string(),
                source: e,
            })
    }
}

/// Quote a value, flattening line breaks and doubling embedded quotes
fn push_csv_field(row: &mut String, value: &str) {
    row.push('"');
    for c in value.chars() {
        match c {
            '\n' | '\r' => row.push(' '),
            '"' => row.push_str("\"\""),
            other => row.push(other),
        }
    }
    row.push('"');
}
