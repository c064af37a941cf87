//! Analytics report download.

use anyhow::{Context as _, Result};
use lectern_client::DEFAULT_REPORT_FILE_NAME;
use std::path::{Path, PathBuf};

use super::ReportArgs;
use crate::context::Context;
use crate::output::format_bytes;

/// Download the report and save it.
pub async fn run(args: ReportArgs, ctx: &mut Context) -> Result<()> {
    let output = ctx.output.clone();
    let session = ctx.session()?;

    let pb = output.spinner("Downloading report...");
    let result = session.download_report().await;
    pb.finish_and_clear();
    let report = result?;

    let path = match args.out {
        Some(out) => ctx.resolve_path(&out),
        None => suggested_path(&ctx.cwd, &report.file_name),
    };
    std::fs::write(&path, &report.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if output.is_json() {
        output.json(&serde_json::json!({
            "path": path.display().to_string(),
            "size": report.bytes.len(),
        }));
    } else {
        output.success(&format!(
            "Saved {} ({})",
            path.display(),
            format_bytes(report.bytes.len() as u64)
        ));
    }
    Ok(())
}

/// Where a report lands when no `--out` is given: always inside `cwd`.
fn suggested_path(cwd: &Path, file_name: &str) -> PathBuf {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.starts_with('.'))
        .unwrap_or(DEFAULT_REPORT_FILE_NAME);
    cwd.join(name)
}
