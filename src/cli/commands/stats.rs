//! Month-to-date stats CLI command

use crate::cli::error::CliError;
use crate::config::AppConfig;
use crate::format::format_currency;
use crate::service::ReportService;

use super::{build_service, runtime};

pub async fn run_stats(service: &ReportService) -> Result<String, CliError> {
    let stats = service.stats().await?;
    Ok(format!(
        "Gross revenue:     {}\n\
         Net revenue:       {}\n\
         VAT collected:     {}\n\
         Operating costs:   {}\n\
         Monthly profit:    {}\n\
         Productivity rate: {}%\n\
         Active animals:    {}",
        format_currency(stats.gross_revenue),
        format_currency(stats.net_revenue),
        format_currency(stats.vat_collected),
        format_currency(stats.operating_costs),
        format_currency(stats.monthly_profit),
        stats.productivity_rate,
        stats.total_animals
    ))
}

pub fn handle_stats(config: &AppConfig) -> Result<(), CliError> {
    let service = build_service(config)?;
    let output = runtime()?.block_on(run_stats(&service))?;
    println!("{}", output);
    Ok(())
}
