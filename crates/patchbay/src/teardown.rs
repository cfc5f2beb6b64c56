//! Session teardown for the `exit` command
//!
//! The server is normally launched inside a tmux session alongside the
//! client programs it serves. `exit` takes the whole session down, not
//! just this process. Outside tmux there is nothing external to tear
//! down and the server simply stops.

use tokio::process::Command;

/// Attempt to kill the enclosing tmux session
///
/// Best effort: failures are logged and the server still exits cleanly.
pub async fn shutdown_session() {
    if std::env::var_os("TMUX").is_none() {
        tracing::info!("not running inside tmux, skipping session teardown");
        return;
    }

    let output = match Command::new("tmux")
        .args(["display-message", "-p", "#S"])
        .output()
        .await
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::warn!(status = %output.status, "could not resolve tmux session name");
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not run tmux");
            return;
        }
    };

    let session = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if session.is_empty() {
        tracing::warn!("tmux reported an empty session name");
        return;
    }

    println!("Shutting down tmux session '{session}'.");
    match Command::new("tmux")
        .args(["kill-session", "-t", &session])
        .status()
        .await
    {
        Ok(status) if status.success() => {}
        Ok(status) => tracing::warn!(%status, "tmux kill-session failed"),
        Err(e) => tracing::warn!(error = %e, "tmux kill-session failed"),
    }
}
