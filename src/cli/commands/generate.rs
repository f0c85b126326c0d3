//! Generate report CLI command

use crate::cli::error::CliError;
use crate::config::AppConfig;
use crate::service::{GenerateReportRequest, ReportService};

use super::{build_service, runtime};

/// Generate command arguments
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub report_type: String,
    pub date_range: String,
    pub format: String,
    pub title: Option<String>,
}

/// Store a report request and describe the result
pub async fn run_generate(service: &ReportService, args: &GenerateArgs) -> Result<String, CliError> {
    let generated = service
        .generate(&GenerateReportRequest {
            report_type: args.report_type.clone(),
            date_range: args.date_range.clone(),
            format: args.format.clone(),
            title: args.title.clone(),
        })
        .await?;

    Ok(format!(
        "Created report #{}: {}\n  category:   {}\n  date range: {}\n  format:     {}",
        generated.report.id,
        generated.report.title,
        generated.report.category,
        generated.date_range,
        generated.format
    ))
}

pub fn handle_generate(config: &AppConfig, args: &GenerateArgs) -> Result<(), CliError> {
    let service = build_service(config)?;
    let output = runtime()?.block_on(run_generate(&service, args))?;
    println!("{}", output);
    Ok(())
}
