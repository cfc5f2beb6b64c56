//! Patchbay - Recorder
//!
//! Timestamped CSV recording of channel output values, driven by the
//! monitor view. Each toggle of recording opens a brand-new artifact with
//! a freshly frozen client column set.
//!
//! # Artifact format
//!
//! ```text
//! timestamp,client1_ch0,...,client1_ch4,client2_ch0,...
//! "3.014512","hello","","","","","ping",...
//! ```
//!
//! The timestamp is relative to when the *monitor view* was entered (not
//! to when recording started), with microsecond precision. Every field is
//! quoted; embedded line breaks are flattened to spaces.

mod error;
mod session;

#[cfg(test)]
mod session_test;

pub use error::{RecorderError, Result};
pub use session::RecordingSession;
