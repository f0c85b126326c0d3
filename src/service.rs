//! Report service
//!
//! Orchestrates the reporting pipeline for a front end (HTTP handler, CLI):
//!
//! - `generate`: normalize a request and persist it as a stored report
//! - `list`: page through stored reports with their decoded metadata
//! - `stats`: month-to-date headline figures
//! - `download` / `stream`: decode, resolve, aggregate and render one report

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::{Aggregator, DEFAULT_QUERY_TIMEOUT};
use crate::clock::Clock;
use crate::database::ReportStore;
use crate::error::{ReportError, ReportResult};
use crate::export::{self, ReportDownload};
use crate::metadata::{self, ReportMetadata};
use crate::models::{
    DateRange, NewReport, ReportCategory, ReportContent, ReportFormat, ReportRecord,
};

/// Default page size for report listings
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Request to create a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_type: String,
    pub date_range: String,
    pub format: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A freshly stored report and its normalized metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub report: ReportRecord,
    pub date_range: DateRange,
    pub format: ReportFormat,
}

/// One row of a report listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListing {
    pub id: i64,
    pub title: String,
    pub detail: String,
    pub category: ReportCategory,
    pub date_range: DateRange,
    pub format: ReportFormat,
    /// Long form date, e.g. `07 June 2025`
    pub generated: String,
}

/// A page of report listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub items: Vec<ReportListing>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Month-to-date headline figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub gross_revenue: f64,
    pub net_revenue: f64,
    pub vat_collected: f64,
    pub monthly_profit: f64,
    pub total_animals: i64,
    pub operating_costs: f64,
    /// Profit as a whole percentage of net revenue, 0 without revenue
    pub productivity_rate: i64,
}

/// Report pipeline over a store and a clock
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
    query_timeout: Duration,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the aggregation timeout
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Normalize and persist a report request
    pub async fn generate(&self, request: &GenerateReportRequest) -> ReportResult<GeneratedReport> {
        let category = ReportCategory::normalize(&request.report_type);
        let date_range = DateRange::normalize(&request.date_range);
        let format = ReportFormat::normalize(&request.format);

        let title = match request.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("{} Report ({})", category, date_range),
        };

        let report = self
            .store
            .insert_report(&NewReport {
                title,
                description: metadata::encode(category, date_range, format),
                category,
                generated_on: self.clock.today(),
            })
            .await?;

        info!(
            id = report.id,
            %category,
            %date_range,
            %format,
            "Generated report request"
        );

        Ok(GeneratedReport {
            report,
            date_range,
            format,
        })
    }

    /// Page through stored reports, most recently generated first
    pub async fn list(&self, page: Option<i64>, page_size: Option<i64>) -> ReportResult<ReportPage> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page < 1 {
            return Err(ReportError::InvalidInput(format!(
                "page must be at least 1 (got {})",
                page
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ReportError::InvalidInput(format!(
                "page size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, page_size
            )));
        }

        let offset = (page - 1).saturating_mul(page_size);
        let (records, total) = tokio::try_join!(
            self.store.list_reports(page_size, offset),
            self.store.count_reports(),
        )?;

        let items = records.into_iter().map(listing).collect();
        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };

        Ok(ReportPage {
            items,
            page,
            page_size,
            total,
            total_pages,
        })
    }

    /// Month-to-date revenue, costs and herd size
    pub async fn stats(&self) -> ReportResult<ReportStats> {
        let window = metadata::resolve(DateRange::ThisMonth, &self.clock.now());
        let store = self.store.as_ref();

        let queries = async {
            tokio::try_join!(
                store.sales_totals(&window),
                store.expense_total(&window),
                store.active_animal_count(),
            )
        };
        let (totals, expenses, animals) = tokio::time::timeout(self.query_timeout, queries)
            .await
            .map_err(|_| ReportError::AggregationTimeout(self.query_timeout))??;

        let profit = totals.net_revenue - expenses;
        let productivity_rate = if totals.net_revenue > 0.0 {
            (profit / totals.net_revenue * 100.0).round() as i64
        } else {
            0
        };

        Ok(ReportStats {
            gross_revenue: totals.gross_revenue,
            net_revenue: totals.net_revenue,
            vat_collected: totals.vat_collected,
            monthly_profit: profit,
            total_animals: animals,
            operating_costs: expenses,
            productivity_rate,
        })
    }

    /// Build the content of report `id`
    ///
    /// A blank or missing `format` falls back to the format stored with the
    /// report.
    pub async fn content(&self, id: i64, format: Option<&str>) -> ReportResult<ReportContent> {
        let record = self
            .store
            .find_report(id)
            .await?
            .ok_or(ReportError::NotFound(id))?;

        let stored = metadata::decode(&record.description);
        let format = match format.map(str::trim) {
            Some(requested) if !requested.is_empty() => ReportFormat::normalize(requested),
            _ => stored.format,
        };

        let now = self.clock.now();
        let window = metadata::resolve(stored.date_range, &now);
        let aggregate = Aggregator::new(self.store.as_ref())
            .with_timeout(self.query_timeout)
            .aggregate(record.category, &window)
            .await?;

        Ok(ReportContent {
            id: record.id,
            title: record.title,
            category: record.category,
            date_range: stored.date_range,
            format,
            generated_on: record.last_generated.format("%Y-%m-%d").to_string(),
            summary: aggregate.summary,
            records: aggregate.records,
        })
    }

    /// Render report `id` into memory
    pub async fn download(&self, id: i64, format: Option<&str>) -> ReportResult<ReportDownload> {
        let content = self.content(id, format).await?;
        let download = export::render(&content)?;

        info!(
            id,
            category = %content.category,
            format = %download.format,
            records = content.records.len(),
            bytes = download.body.len(),
            "Rendered report download"
        );
        Ok(download)
    }

    /// Render report `id` straight into `writer`
    ///
    /// Bytes already written when a write fails stay written; the call still
    /// reports the failure.
    pub async fn stream<W: Write>(
        &self,
        id: i64,
        format: Option<&str>,
        writer: W,
    ) -> ReportResult<ReportFormat> {
        let content = self.content(id, format).await?;
        if let Err(e) = export::write_report(&content, writer) {
            warn!(id, format = %content.format, error = %e, "Report stream failed");
            return Err(e.into());
        }
        info!(id, format = %content.format, records = content.records.len(), "Streamed report");
        Ok(content.format)
    }
}

fn listing(record: ReportRecord) -> ReportListing {
    let meta: ReportMetadata = metadata::decode(&record.description);
    ReportListing {
        id: record.id,
        title: record.title,
        detail: metadata::describe(record.category, &meta),
        category: record.category,
        date_range: meta.date_range,
        format: meta.format,
        generated: record.last_generated.format("%d %B %Y").to_string(),
    }
}
