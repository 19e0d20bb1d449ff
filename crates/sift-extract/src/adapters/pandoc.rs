//! Pandoc conversion helper shared by the document and presentation adapters.

use std::io::Write;

use tokio::process::Command;
use tracing::debug;

use sift_core::defaults::EXTRACTION_CMD_TIMEOUT_SECS;
use sift_core::{Error, Result};

/// Run a command with a timeout, returning stdout as a string.
///
/// The child is killed when the timeout drops the pending `output()`.
async fn run_cmd_with_timeout(cmd: &mut Command, timeout_secs: u64) -> Result<String> {
    cmd.kill_on_drop(true);
    let output = tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| {
            Error::Extraction(format!(
                "External command timed out after {}s",
                timeout_secs
            ))
        })?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::UnsupportedFormat("pandoc is not installed on this system".to_string())
            } else {
                Error::Extraction(format!("Failed to execute command: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Extraction(format!(
            "Command failed (exit {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Convert `data` from pandoc input `format` to plain text.
pub async fn to_plain_text(data: &[u8], format: &str, extension: &str) -> Result<String> {
    let mut tmpfile = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()?;
    tmpfile.write_all(data)?;
    let tmp_path = tmpfile.path().to_string_lossy().to_string();

    debug!(format, "Converting with pandoc");

    // pandoc -f FORMAT -t plain --wrap=none INPUT
    run_cmd_with_timeout(
        Command::new("pandoc")
            .arg("-f")
            .arg(format)
            .arg("-t")
            .arg("plain")
            .arg("--wrap=none")
            .arg(&tmp_path),
        EXTRACTION_CMD_TIMEOUT_SECS,
    )
    .await
}

/// Whether a working `pandoc` binary is on the PATH.
pub async fn is_available() -> bool {
    match Command::new("pandoc").arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_unsupported() {
        let err = run_cmd_with_timeout(&mut Command::new("sift-no-such-binary-xyz"), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    /// Pids of live (non-zombie) processes whose command line contains `needle`.
    #[cfg(target_os = "linux")]
    fn live_processes_matching(needle: &str) -> Vec<String> {
        let mut pids = Vec::new();
        for entry in std::fs::read_dir("/proc").unwrap().flatten() {
            let pid = entry.file_name().to_string_lossy().into_owned();
            if !pid.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            // Exited-but-unreaped processes have an empty cmdline.
            let cmdline = std::fs::read(entry.path().join("cmdline")).unwrap_or_default();
            let cmdline = String::from_utf8_lossy(&cmdline).replace('\0', " ");
            if cmdline.contains(needle) {
                pids.push(pid);
            }
        }
        pids
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_child() {
        let err = run_cmd_with_timeout(Command::new("sleep").arg("9.4321"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(ref m) if m.contains("timed out after 1s")));

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert!(
            live_processes_matching("sleep 9.4321").is_empty(),
            "timed-out child is still running"
        );
    }

    #[tokio::test]
    async fn test_is_available_does_not_error() {
        // Result depends on the host; only check it completes.
        let _ = is_available().await;
    }
}
