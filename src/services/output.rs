use crate::config::Config;
use crate::error::ExtractionError;
use std::backtrace::Backtrace;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn parent_dir_or_dot(path: &Path) -> &Path {
    // `Path::parent` is `Some("")` for a bare file name.
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Writes through a temp file in the destination directory so a failed write
/// never leaves a partial file behind.
fn write_atomic(dest: &Path, contents: &str) -> Result<(), ExtractionError> {
    let write_error = |source| ExtractionError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(parent_dir_or_dot(dest)).map_err(write_error)?;
    tmp.write_all(contents.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(dest).map_err(|e| write_error(e.error))?;
    Ok(())
}

fn remove_stale(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed stale {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Could not remove stale {}: {}", path.display(), e),
    }
}

/// Success artifact. Any trace left by an earlier failed run is removed.
pub fn write_report(config: &Config, text: &str) -> Result<(), ExtractionError> {
    write_atomic(&config.report_path, text)?;
    remove_stale(&config.trace_path);
    tracing::info!("Report written to {}", config.report_path.display());
    Ok(())
}

/// Failure artifact. Any report left by an earlier run is removed.
pub fn write_trace(config: &Config, trace: &str) -> Result<(), ExtractionError> {
    remove_stale(&config.report_path);
    write_atomic(&config.trace_path, trace)?;
    tracing::info!("Trace written to {}", config.trace_path.display());
    Ok(())
}

/// Kind, message, the chain of steps and causes, then the captured call stack.
pub fn format_trace(err: &anyhow::Error, backtrace: &Backtrace) -> String {
    let kind = err
        .downcast_ref::<ExtractionError>()
        .map(ExtractionError::kind)
        .unwrap_or("Error");

    let mut trace = format!("{}: {}\n", kind, err);
    let causes: Vec<String> = err.chain().skip(1).map(|cause| cause.to_string()).collect();
    if !causes.is_empty() {
        trace.push_str("\nCaused by:\n");
        for (idx, cause) in causes.iter().enumerate() {
            trace.push_str(&format!("    {}: {}\n", idx, cause));
        }
    }
    trace.push_str(&format!("\nStack backtrace:\n{}\n", backtrace));
    trace
}
