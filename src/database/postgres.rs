//! PostgreSQL report store
//!
//! Reads the back office tables through a deadpool-postgres connection pool.
//! Each call checks a client out of the pool, so the store can be shared
//! across concurrent downloads.

use async_trait::async_trait;
use deadpool_postgres::{ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tokio_postgres::types::ToSql;
use tracing::debug;

use super::schema::{expense_sql, health_sql, ledger_sql, production_sql, report_sql, sales_sql};
use super::{
    DatabaseError, DatabaseResult, HealthCounts, ProductionTotals, ReportStore, SalesTotals,
};
use crate::config::AppConfig;
use crate::metadata::DateWindow;
use crate::models::{
    FinancialRecord, HealthRecord, LedgerKind, NewReport, ReportCategory, ReportRecord,
    ResourcesRecord, SalesRecord,
};

/// PostgreSQL report store
pub struct PostgresStore {
    /// Connection string
    connection_string: String,
    /// Connection pool
    pool: Pool,
}

impl PostgresStore {
    /// Create a pooled store
    ///
    /// # Arguments
    /// * `connection_string` - PostgreSQL connection string
    /// * `pool_size` - Maximum number of pooled connections
    ///
    /// Connections are opened lazily on first use.
    pub fn new(connection_string: &str, pool_size: usize) -> DatabaseResult<Self> {
        let mut config = deadpool_postgres::Config::new();
        config.url = Some(connection_string.to_string());
        config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        config.pool = Some(PoolConfig::new(pool_size.max(1)));

        let pool = config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| {
                DatabaseError::ConnectionFailed(format!("Failed to create pool: {}", e))
            })?;

        Ok(Self {
            connection_string: connection_string.to_string(),
            pool,
        })
    }

    /// Create a store from application configuration
    pub fn from_config(config: &AppConfig) -> DatabaseResult<Self> {
        let url = config.database.url.as_deref().ok_or_else(|| {
            DatabaseError::ConfigError("database url is not configured".to_string())
        })?;
        Self::new(url, config.database.pool_size)
    }

    /// Get the connection string (masked for security)
    pub fn connection_string_masked(&self) -> String {
        if let Some(at_pos) = self.connection_string.find('@')
            && let Some(colon_pos) = self.connection_string[..at_pos].rfind(':')
        {
            let prefix = &self.connection_string[..colon_pos + 1];
            let suffix = &self.connection_string[at_pos..];
            return format!("{}****{}", prefix, suffix);
        }
        self.connection_string.clone()
    }

    async fn client(&self) -> DatabaseResult<deadpool_postgres::Client> {
        self.pool.get().await.map_err(|e| {
            DatabaseError::ConnectionFailed(format!("Failed to get pooled connection: {}", e))
        })
    }

    async fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DatabaseResult<Vec<tokio_postgres::Row>> {
        let client = self.client().await?;
        client
            .query(sql, params)
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    async fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> DatabaseResult<tokio_postgres::Row> {
        let client = self.client().await?;
        client
            .query_one(sql, params)
            .await
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    fn row_to_report(row: &tokio_postgres::Row) -> DatabaseResult<ReportRecord> {
        let category: String = get(row, 3)?;
        Ok(ReportRecord {
            id: get(row, 0)?,
            title: get(row, 1)?,
            description: get::<Option<String>>(row, 2)?.unwrap_or_default(),
            category: ReportCategory::normalize(&category),
            last_generated: get(row, 4)?,
        })
    }
}

fn get<'a, T: tokio_postgres::types::FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    idx: usize,
) -> DatabaseResult<T> {
    row.try_get(idx)
        .map_err(|e| DatabaseError::QueryFailed(format!("Failed to decode column {}: {}", idx, e)))
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ReportStore for PostgresStore {
    async fn find_report(&self, id: i64) -> DatabaseResult<Option<ReportRecord>> {
        let rows = self.query(report_sql::SELECT_BY_ID, &[&id]).await?;
        rows.first().map(Self::row_to_report).transpose()
    }

    async fn insert_report(&self, report: &NewReport) -> DatabaseResult<ReportRecord> {
        let category = report.category.as_str();
        let row = self
            .query_one(
                report_sql::INSERT,
                &[
                    &report.title,
                    &report.description,
                    &category,
                    &report.generated_on,
                ],
            )
            .await?;
        let id: i64 = get(&row, 0)?;
        debug!(id, category, "Inserted report request");

        Ok(ReportRecord {
            id,
            title: report.title.clone(),
            description: report.description.clone(),
            category: report.category,
            last_generated: report.generated_on,
        })
    }

    async fn list_reports(&self, limit: i64, offset: i64) -> DatabaseResult<Vec<ReportRecord>> {
        let rows = self
            .query(report_sql::SELECT_PAGE, &[&limit, &offset])
            .await?;
        rows.iter().map(Self::row_to_report).collect()
    }

    async fn count_reports(&self) -> DatabaseResult<i64> {
        let row = self.query_one(report_sql::COUNT, &[]).await?;
        get(&row, 0)
    }

    async fn sales_totals(&self, window: &DateWindow) -> DatabaseResult<SalesTotals> {
        let row = self
            .query_one(sales_sql::TOTALS, &[&window.start, &window.end])
            .await?;
        Ok(SalesTotals {
            gross_revenue: get(&row, 0)?,
            net_revenue: get(&row, 1)?,
            vat_collected: get(&row, 2)?,
            transactions: get(&row, 3)?,
        })
    }

    async fn expense_total(&self, window: &DateWindow) -> DatabaseResult<f64> {
        let row = self
            .query_one(expense_sql::TOTAL, &[&window.start, &window.end])
            .await?;
        get(&row, 0)
    }

    async fn ledger_entries(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<FinancialRecord>> {
        let rows = self
            .query(
                ledger_sql::ROWS,
                &[&window.start, &window.end, &limit_param(limit)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                let kind: String = get(row, 2)?;
                Ok(FinancialRecord {
                    id: get(row, 0)?,
                    date: get(row, 1)?,
                    kind: if kind == "expense" {
                        LedgerKind::Expense
                    } else {
                        LedgerKind::Sale
                    },
                    item: get(row, 3)?,
                    amount: get(row, 4)?,
                })
            })
            .collect()
    }

    async fn health_status_counts(&self) -> DatabaseResult<HealthCounts> {
        let row = self.query_one(health_sql::STATUS_COUNTS, &[]).await?;
        Ok(HealthCounts {
            healthy: get(&row, 0)?,
            attention: get(&row, 1)?,
            sick: get(&row, 2)?,
        })
    }

    async fn active_animal_count(&self) -> DatabaseResult<i64> {
        let row = self.query_one(health_sql::ACTIVE_ANIMALS, &[]).await?;
        get(&row, 0)
    }

    async fn health_events(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<HealthRecord>> {
        let rows = self
            .query(
                health_sql::ROWS,
                &[&window.start, &window.end, &limit_param(limit)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(HealthRecord {
                    id: get(row, 0)?,
                    date: get(row, 1)?,
                    animal_tag_id: get(row, 2)?,
                    action: get(row, 3)?,
                    treatment: get(row, 4)?,
                    veterinarian: get(row, 5)?,
                })
            })
            .collect()
    }

    async fn production_totals(&self, window: &DateWindow) -> DatabaseResult<ProductionTotals> {
        let row = self
            .query_one(production_sql::TOTALS, &[&window.start, &window.end])
            .await?;
        Ok(ProductionTotals {
            milk_liters: get(&row, 0)?,
            eggs_count: get(&row, 1)?,
            wool_kg: get(&row, 2)?,
            total_value: get(&row, 3)?,
        })
    }

    async fn production_logs(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<ResourcesRecord>> {
        let rows = self
            .query(
                production_sql::ROWS,
                &[&window.start, &window.end, &limit_param(limit)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ResourcesRecord {
                    id: get(row, 0)?,
                    date: get(row, 1)?,
                    milk_liters: get(row, 2)?,
                    eggs_count: get(row, 3)?,
                    wool_kg: get(row, 4)?,
                    total_value: get(row, 5)?,
                })
            })
            .collect()
    }

    async fn sales(&self, window: &DateWindow, limit: usize) -> DatabaseResult<Vec<SalesRecord>> {
        let rows = self
            .query(
                sales_sql::ROWS,
                &[&window.start, &window.end, &limit_param(limit)],
            )
            .await?;

        rows.iter()
            .map(|row| {
                Ok(SalesRecord {
                    id: get(row, 0)?,
                    date: get(row, 1)?,
                    product: get(row, 2)?,
                    quantity_value: get(row, 3)?,
                    quantity_unit: get(row, 4)?,
                    buyer: get(row, 5)?,
                    buyer_pin: get(row, 6)?,
                    vat_applicable: get(row, 7)?,
                    vat_rate: get(row, 8)?,
                    vat_amount: get(row, 9)?,
                    net_amount: get(row, 10)?,
                    price_per_unit: get(row, 11)?,
                    total_amount: get(row, 12)?,
                })
            })
            .collect()
    }

    fn backend_type(&self) -> &'static str {
        "postgres"
    }
}
