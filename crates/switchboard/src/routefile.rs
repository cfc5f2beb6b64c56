//! Startup routing-file loader
//!
//! The file is plain text, one command per line; only lines whose first
//! token is the `route` keyword are interpreted. Parsing reuses the
//! console command parser, but application skips the liveness check so
//! wiring can be laid down before any client connects.

use std::fs;
use std::path::{Path, PathBuf};

use patchbay_protocol::{ChannelId, ClientId};
use patchbay_routing::RouteTarget;

use crate::command::{Command, CommandError};
use crate::engine::Switchboard;

/// Result of reading the routing file at startup
#[derive(Debug)]
pub enum RouteFileOutcome {
    /// File does not exist (or could not be opened)
    Missing,
    /// File was read; see the report for per-line results
    Processed(RouteFileReport),
}

/// Per-line results of processing a routing file
#[derive(Debug)]
pub struct RouteFileReport {
    /// Path the file was read from
    pub path: PathBuf,
    /// Number of `route` lines encountered
    pub commands: usize,
    /// Routes applied, in file order (wildcards already expanded)
    pub applied: Vec<(ClientId, ChannelId, RouteTarget)>,
    /// Malformed lines: (1-based line number, error message)
    pub errors: Vec<(usize, String)>,
    /// Raw file contents, echoed on full success
    pub contents: String,
}

impl RouteFileReport {
    /// True if the file held at least one valid command and no malformed
    /// ones
    pub fn succeeded(&self) -> bool {
        self.commands > 0 && self.errors.is_empty()
    }
}

/// Read the routing file and apply every valid `route` line
///
/// Malformed lines are collected rather than aborting: a single bad line
/// marks the whole file as failed, but valid lines before and after it
/// still take effect.
pub fn apply_route_file(path: &Path, switchboard: &mut Switchboard) -> RouteFileOutcome {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "routing file not read");
            return RouteFileOutcome::Missing;
        }
    };

    let mut report = RouteFileReport {
        path: path.to_path_buf(),
        commands: 0,
        applied: Vec::new(),
        errors: Vec::new(),
        contents: contents.clone(),
    };

    for (index, line) in contents.lines().enumerate() {
        if line.split_whitespace().next() != Some("route") {
            continue;
        }
        report.commands += 1;

        match Command::parse(line) {
            Ok(Some(Command::Route {
                src,
                src_sel,
                dst,
                dst_sel,
            })) => {
                for (src_ch, dst_ch) in switchboard.route_preconfigured(src, src_sel, dst, dst_sel)
                {
                    report
                        .applied
                        .push((src, src_ch, RouteTarget::new(dst, dst_ch)));
                }
            }
            Ok(_) => unreachable!("first token checked above"),
            Err(e) => {
                let message = match e {
                    CommandError::Usage(usage) => format!("incomplete route command ({usage})"),
                    other => other.to_string(),
                };
                report.errors.push((index + 1, message));
            }
        }
    }

    RouteFileOutcome::Processed(report)
}
