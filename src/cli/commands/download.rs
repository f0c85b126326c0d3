//! Download report CLI command
//!
//! Writes the rendered report to a file, or to stdout when no output path
//! is given. Status lines go to stderr so piped output stays clean.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::config::AppConfig;
use crate::export::ReportDownload;
use crate::service::ReportService;

use super::{build_service, runtime};

/// Download command arguments
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub id: i64,
    /// Overrides the stored format when set
    pub format: Option<String>,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// Overwrite an existing output file
    pub force: bool,
}

pub async fn run_download(
    service: &ReportService,
    args: &DownloadArgs,
) -> Result<ReportDownload, CliError> {
    Ok(service.download(args.id, args.format.as_deref()).await?)
}

/// Write `download` to `path`, refusing to clobber unless `force`
pub fn write_download(download: &ReportDownload, path: &Path, force: bool) -> Result<usize, CliError> {
    if path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let file = std::fs::File::create(path)
        .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))?;
    download
        .write_to(std::io::BufWriter::new(file))
        .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))
}

pub fn handle_download(config: &AppConfig, args: &DownloadArgs) -> Result<(), CliError> {
    let service = build_service(config)?;
    let download = runtime()?.block_on(run_download(&service, args))?;

    match &args.output {
        Some(path) => {
            let bytes = write_download(&download, path, args.force)?;
            eprintln!(
                "Wrote {} ({} bytes, {}) to {}",
                download.filename,
                bytes,
                download.content_type,
                path.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            download
                .write_to(&mut lock)
                .map_err(|e| CliError::IoError(e.to_string()))?;
            lock.flush().map_err(|e| CliError::IoError(e.to_string()))?;
        }
    }
    Ok(())
}
