//! Category aggregation
//!
//! Runs the category's summary and row queries against a [`ReportStore`]
//! under one request-scoped timeout. Any store error aborts the whole call;
//! partial results are never returned.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::database::{DatabaseResult, ReportStore};
use crate::error::{ReportError, ReportResult};
use crate::metadata::DateWindow;
use crate::models::{MetricValue, Renderable, ReportCategory, ReportRow, Summary};

/// Maximum number of rows an aggregation returns
pub const RECORD_LIMIT: usize = 250;

/// Default timeout for one aggregation call
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Summary metrics and newest-first rows for one category and window
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregate {
    pub summary: Summary,
    pub records: Vec<ReportRow>,
}

/// Category aggregator over a report store
pub struct Aggregator<'a> {
    store: &'a dyn ReportStore,
    timeout: Duration,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a dyn ReportStore) -> Self {
        Self {
            store,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Aggregate `category` over `window`
    pub async fn aggregate(
        &self,
        category: ReportCategory,
        window: &DateWindow,
    ) -> ReportResult<Aggregate> {
        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.collect(category, window)).await;

        let aggregate = match result {
            Ok(Ok(aggregate)) => aggregate,
            Ok(Err(e)) => {
                warn!(%category, %window, error = %e, "Report aggregation failed");
                return Err(ReportError::AggregationFailed(e));
            }
            Err(_) => {
                warn!(%category, %window, timeout_ms = self.timeout.as_millis() as u64, "Report aggregation timed out");
                return Err(ReportError::AggregationTimeout(self.timeout));
            }
        };

        debug!(
            %category,
            %window,
            backend = self.store.backend_type(),
            records = aggregate.records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated report data"
        );
        Ok(aggregate)
    }

    async fn collect(
        &self,
        category: ReportCategory,
        window: &DateWindow,
    ) -> DatabaseResult<Aggregate> {
        let store = self.store;
        match category {
            ReportCategory::Financial => {
                let (totals, expenses, rows) = tokio::try_join!(
                    store.sales_totals(window),
                    store.expense_total(window),
                    store.ledger_entries(window, RECORD_LIMIT),
                )?;
                let profit = totals.net_revenue - expenses;
                let summary = summary([
                    ("grossRevenue", totals.gross_revenue.into()),
                    ("netRevenue", totals.net_revenue.into()),
                    ("vatCollected", totals.vat_collected.into()),
                    ("totalExpenses", expenses.into()),
                    ("profit", profit.into()),
                    ("totalRevenue", totals.gross_revenue.into()),
                ]);
                Ok(Aggregate {
                    summary,
                    records: newest_first(rows),
                })
            }
            ReportCategory::Health => {
                let (counts, rows) = tokio::try_join!(
                    store.health_status_counts(),
                    store.health_events(window, RECORD_LIMIT),
                )?;
                let summary = summary([
                    ("healthy", counts.healthy.into()),
                    ("attention", counts.attention.into()),
                    ("sick", counts.sick.into()),
                ]);
                Ok(Aggregate {
                    summary,
                    records: newest_first(rows),
                })
            }
            ReportCategory::Resources => {
                let (totals, rows) = tokio::try_join!(
                    store.production_totals(window),
                    store.production_logs(window, RECORD_LIMIT),
                )?;
                let summary = summary([
                    ("milkLiters", totals.milk_liters.into()),
                    ("eggsCount", totals.eggs_count.into()),
                    ("woolKg", totals.wool_kg.into()),
                    ("totalValue", totals.total_value.into()),
                ]);
                Ok(Aggregate {
                    summary,
                    records: newest_first(rows),
                })
            }
            ReportCategory::Sales => {
                let (totals, rows) = tokio::try_join!(
                    store.sales_totals(window),
                    store.sales(window, RECORD_LIMIT),
                )?;
                let summary = summary([
                    ("grossRevenue", totals.gross_revenue.into()),
                    ("netRevenue", totals.net_revenue.into()),
                    ("vatCollected", totals.vat_collected.into()),
                    ("transactions", totals.transactions.into()),
                    ("totalRevenue", totals.gross_revenue.into()),
                ]);
                Ok(Aggregate {
                    summary,
                    records: newest_first(rows),
                })
            }
        }
    }
}

fn summary<const N: usize>(entries: [(&str, MetricValue); N]) -> Summary {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Wrap rows as [`ReportRow`]s, newest first (ties by descending id), capped
/// at [`RECORD_LIMIT`]
pub fn newest_first<T>(rows: Vec<T>) -> Vec<ReportRow>
where
    T: Into<ReportRow>,
{
    let mut rows: Vec<ReportRow> = rows.into_iter().map(Into::into).collect();
    rows.sort_by(|a, b| {
        b.date()
            .cmp(&a.date())
            .then_with(|| b.row_id().cmp(&a.row_id()))
    });
    rows.truncate(RECORD_LIMIT);
    rows
}
