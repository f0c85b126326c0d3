//! List reports CLI command

use crate::cli::error::CliError;
use crate::config::AppConfig;
use crate::service::ReportService;

use super::{build_service, runtime};

/// List command arguments
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub page: i64,
    pub page_size: i64,
    /// Print the page as JSON instead of a table
    pub json: bool,
}

pub async fn run_list(service: &ReportService, args: &ListArgs) -> Result<String, CliError> {
    let page = service.list(Some(args.page), Some(args.page_size)).await?;

    if args.json {
        return serde_json::to_string_pretty(&page)
            .map_err(|e| CliError::IoError(format!("Failed to serialize listing: {}", e)));
    }

    let mut out = String::new();
    for item in &page.items {
        out.push_str(&format!(
            "{:>6}  {:<14}  {:<10}  {}\n        {}\n",
            item.id,
            item.generated,
            item.category.as_str(),
            item.title,
            item.detail
        ));
    }
    out.push_str(&format!(
        "Page {} of {} ({} reports)",
        page.page,
        page.total_pages.max(1),
        page.total
    ));
    Ok(out)
}

pub fn handle_list(config: &AppConfig, args: &ListArgs) -> Result<(), CliError> {
    let service = build_service(config)?;
    let output = runtime()?.block_on(run_list(&service, args))?;
    println!("{}", output);
    Ok(())
}
