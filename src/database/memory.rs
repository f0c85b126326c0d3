//! In-memory report store
//!
//! Holds farm data in plain vectors and computes the same aggregates as the
//! PostgreSQL store. Useful for tests, demos and embedding the pipeline
//! without a database.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    DatabaseError, DatabaseResult, HealthCounts, ProductionTotals, ReportStore, SalesTotals,
};
use crate::metadata::DateWindow;
use crate::models::{
    FinancialRecord, HealthRecord, LedgerKind, NewReport, Renderable, ReportRecord,
    ResourcesRecord, SalesRecord,
};

/// Animal as far as the health snapshot is concerned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalStatus {
    pub tag_id: String,
    /// "healthy", "attention" or "sick"
    pub health_status: String,
    pub is_active: bool,
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub item: String,
    pub amount: f64,
}

#[derive(Debug, Default)]
struct MemoryData {
    animals: Vec<AnimalStatus>,
    sales: Vec<SalesRecord>,
    expenses: Vec<Expense>,
    health: Vec<HealthRecord>,
    production: Vec<ResourcesRecord>,
    reports: Vec<ReportRecord>,
}

/// In-memory report store
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_animal(&self, animal: AnimalStatus) {
        self.write().animals.push(animal);
    }

    pub fn add_sale(&self, sale: SalesRecord) {
        self.write().sales.push(sale);
    }

    pub fn add_expense(&self, expense: Expense) {
        self.write().expenses.push(expense);
    }

    pub fn add_health_record(&self, record: HealthRecord) {
        self.write().health.push(record);
    }

    pub fn add_production_log(&self, log: ResourcesRecord) {
        self.write().production.push(log);
    }

    /// Insert a report with a caller-chosen id
    pub fn add_report(&self, report: ReportRecord) {
        self.write().reports.push(report);
    }
}

/// Sort newest-first (date, then id, descending) and cap at `limit`
fn newest_first<T: Renderable>(mut rows: Vec<T>, limit: usize) -> Vec<T> {
    rows.sort_by(|a, b| {
        b.date()
            .cmp(&a.date())
            .then_with(|| b.row_id().cmp(&a.row_id()))
    });
    rows.truncate(limit);
    rows
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn find_report(&self, id: i64) -> DatabaseResult<Option<ReportRecord>> {
        Ok(self.read().reports.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_report(&self, report: &NewReport) -> DatabaseResult<ReportRecord> {
        let mut data = self.write();
        let id = data.reports.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = ReportRecord {
            id,
            title: report.title.clone(),
            description: report.description.clone(),
            category: report.category,
            last_generated: report.generated_on,
        };
        data.reports.push(record.clone());
        Ok(record)
    }

    async fn list_reports(&self, limit: i64, offset: i64) -> DatabaseResult<Vec<ReportRecord>> {
        if limit < 0 || offset < 0 {
            return Err(DatabaseError::InvalidInput(format!(
                "limit and offset must be non-negative (got {} / {})",
                limit, offset
            )));
        }
        let mut reports = self.read().reports.clone();
        reports.sort_by(|a, b| {
            b.last_generated
                .cmp(&a.last_generated)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(reports
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_reports(&self) -> DatabaseResult<i64> {
        Ok(self.read().reports.len() as i64)
    }

    async fn sales_totals(&self, window: &DateWindow) -> DatabaseResult<SalesTotals> {
        let data = self.read();
        Ok(data
            .sales
            .iter()
            .filter(|s| window.contains(s.date))
            .fold(SalesTotals::default(), |mut acc, s| {
                acc.gross_revenue += s.total_amount;
                acc.net_revenue += s.net_amount;
                acc.vat_collected += s.vat_amount;
                acc.transactions += 1;
                acc
            }))
    }

    async fn expense_total(&self, window: &DateWindow) -> DatabaseResult<f64> {
        let data = self.read();
        Ok(data
            .expenses
            .iter()
            .filter(|e| window.contains(e.date))
            .map(|e| e.amount)
            .sum())
    }

    async fn ledger_entries(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<FinancialRecord>> {
        let data = self.read();
        let sales = data
            .sales
            .iter()
            .filter(|s| window.contains(s.date))
            .map(|s| FinancialRecord {
                id: s.id,
                date: s.date,
                kind: LedgerKind::Sale,
                item: s.product.clone(),
                amount: s.total_amount,
            });
        let expenses = data
            .expenses
            .iter()
            .filter(|e| window.contains(e.date))
            .map(|e| FinancialRecord {
                id: e.id,
                date: e.date,
                kind: LedgerKind::Expense,
                item: e.item.clone(),
                amount: -e.amount,
            });
        Ok(newest_first(sales.chain(expenses).collect(), limit))
    }

    async fn health_status_counts(&self) -> DatabaseResult<HealthCounts> {
        let data = self.read();
        let mut counts = HealthCounts::default();
        for animal in data.animals.iter().filter(|a| a.is_active) {
            match animal.health_status.as_str() {
                "healthy" => counts.healthy += 1,
                "attention" => counts.attention += 1,
                "sick" => counts.sick += 1,
                _ => {}
            }
        }
        Ok(counts)
    }

    async fn active_animal_count(&self) -> DatabaseResult<i64> {
        Ok(self.read().animals.iter().filter(|a| a.is_active).count() as i64)
    }

    async fn health_events(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<HealthRecord>> {
        let rows = self
            .read()
            .health
            .iter()
            .filter(|h| window.contains(h.date))
            .cloned()
            .collect();
        Ok(newest_first(rows, limit))
    }

    async fn production_totals(&self, window: &DateWindow) -> DatabaseResult<ProductionTotals> {
        let data = self.read();
        Ok(data
            .production
            .iter()
            .filter(|p| window.contains(p.date))
            .fold(ProductionTotals::default(), |mut acc, p| {
                acc.milk_liters += p.milk_liters;
                acc.eggs_count += p.eggs_count;
                acc.wool_kg += p.wool_kg;
                acc.total_value += p.total_value;
                acc
            }))
    }

    async fn production_logs(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<ResourcesRecord>> {
        let rows = self
            .read()
            .production
            .iter()
            .filter(|p| window.contains(p.date))
            .cloned()
            .collect();
        Ok(newest_first(rows, limit))
    }

    async fn sales(&self, window: &DateWindow, limit: usize) -> DatabaseResult<Vec<SalesRecord>> {
        let rows = self
            .read()
            .sales
            .iter()
            .filter(|s| window.contains(s.date))
            .cloned()
            .collect();
        Ok(newest_first(rows, limit))
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
