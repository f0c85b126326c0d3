//! End-to-end report pipeline tests over the in-memory store

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, TimeZone};
use farmpro_reports::database::memory::{AnimalStatus, Expense};
use farmpro_reports::database::{HealthCounts, ProductionTotals, SalesTotals};
use farmpro_reports::export::ExportError;
use farmpro_reports::format::ReportValue;
use farmpro_reports::metadata::DateWindow;
use farmpro_reports::{
    DatabaseError, DatabaseResult, FinancialRecord, FixedClock, GenerateReportRequest,
    HealthRecord, MemoryStore, NewReport, ReportContent, ReportError, ReportFormat, ReportRecord,
    ReportRow, ReportService, ReportStore, ResourcesRecord, SalesRecord,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn clock() -> Arc<FixedClock> {
    let eat = FixedOffset::east_opt(3 * 3600).unwrap();
    Arc::new(FixedClock(eat.with_ymd_and_hms(2025, 6, 7, 9, 0, 0).unwrap()))
}

fn sale(id: i64, date: NaiveDate, product: &str, net: f64, vat: f64) -> SalesRecord {
    SalesRecord {
        id,
        date,
        product: product.to_string(),
        quantity_value: 10.0,
        quantity_unit: "L".to_string(),
        buyer: "Brookside Dairy".to_string(),
        buyer_pin: "P051234567X".to_string(),
        vat_applicable: vat > 0.0,
        vat_rate: if vat > 0.0 { 16.0 } else { 0.0 },
        vat_amount: vat,
        net_amount: net,
        price_per_unit: (net + vat) / 10.0,
        total_amount: net + vat,
    }
}

/// Two sales and one expense inside the week, one sale outside it
fn farm() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.add_sale(sale(1, day(2), "Milk", 100.0, 16.0));
    store.add_sale(sale(2, day(5), "Eggs", 50.0, 0.0));
    store.add_sale(sale(3, NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(), "Wool", 900.0, 0.0));
    store.add_expense(Expense {
        id: 1,
        date: day(4),
        item: "Dairy meal".to_string(),
        amount: 30.0,
    });
    for (tag, status, active) in [
        ("KE-001", "healthy", true),
        ("KE-002", "healthy", true),
        ("KE-003", "sick", true),
        ("KE-004", "healthy", false),
    ] {
        store.add_animal(AnimalStatus {
            tag_id: tag.to_string(),
            health_status: status.to_string(),
            is_active: active,
        });
    }
    store
}

fn request(report_type: &str, format: &str) -> GenerateReportRequest {
    GenerateReportRequest {
        report_type: report_type.to_string(),
        date_range: "Last 7 days".to_string(),
        format: format.to_string(),
        title: None,
    }
}

#[tokio::test]
async fn test_financial_report_end_to_end() {
    let service = ReportService::new(farm(), clock());
    let generated = service.generate(&request("Financial", "CSV")).await.unwrap();
    assert_eq!(generated.report.id, 1);
    assert_eq!(generated.report.title, "Financial Report (Last 7 days)");

    let content = service.content(1, None).await.unwrap();
    assert_eq!(content.format, ReportFormat::Csv);
    assert_eq!(content.generated_on, "2025-06-07");

    let amount = |key: &str| content.summary[key].as_number().unwrap();
    assert_eq!(amount("grossRevenue"), 166.0);
    assert_eq!(amount("netRevenue"), 150.0);
    assert_eq!(amount("vatCollected"), 16.0);
    assert_eq!(amount("totalExpenses"), 30.0);
    assert_eq!(amount("profit"), amount("netRevenue") - 30.0);

    let feed: Vec<(NaiveDate, f64)> = content
        .records
        .iter()
        .map(|row| match row {
            ReportRow::Financial(FinancialRecord { date, amount, .. }) => (*date, *amount),
            other => panic!("unexpected row {:?}", other),
        })
        .collect();
    assert_eq!(feed, vec![(day(5), 50.0), (day(4), -30.0), (day(2), 116.0)]);

    let download = service.download(1, None).await.unwrap();
    assert_eq!(download.filename, "financial-report-last-7-days.csv");
    assert_eq!(
        download.content_disposition(),
        "attachment; filename=\"financial-report-last-7-days.csv\""
    );
    let text = String::from_utf8(download.body).unwrap();
    let lines: Vec<&str> = text.lines().take(5).collect();
    assert_eq!(
        lines,
        vec![
            "report_id,1",
            "title,Financial Report (Last 7 days)",
            "category,Financial",
            "date_range,Last 7 days",
            "generated_on,2025-06-07",
        ]
    );
}

#[tokio::test]
async fn test_generated_on_comes_from_stored_report() {
    let store = farm();
    store.add_report(ReportRecord {
        id: 1,
        title: "Weekly ledger".to_string(),
        description: "Generated financial report | range=Last 7 days | format=CSV".to_string(),
        category: farmpro_reports::ReportCategory::Financial,
        last_generated: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
    });
    let service = ReportService::new(store, clock());

    let content = service.content(1, None).await.unwrap();
    assert_eq!(content.generated_on, "2025-05-31");
    // The window still follows the clock, not the stored date
    assert_eq!(content.records.len(), 3);

    let text = String::from_utf8(service.download(1, None).await.unwrap().body).unwrap();
    assert!(text.lines().any(|line| line == "generated_on,2025-05-31"));

    let pdf = service.download(1, Some("pdf")).await.unwrap();
    let body = String::from_utf8_lossy(&pdf.body);
    assert!(body.contains("(Generated On: 2025-05-31) Tj"));
    assert!(body.contains("430 11 Td\n(2025-05-31) Tj"));
}

#[tokio::test]
async fn test_format_override_and_blank_fallback() {
    let service = ReportService::new(farm(), clock());
    service.generate(&request("sales", "pdf")).await.unwrap();

    let stored = service.download(1, Some("   ")).await.unwrap();
    assert_eq!(stored.format, ReportFormat::Pdf);
    assert!(stored.body.starts_with(b"%PDF-1.4\n"));

    let json = service.download(1, Some("json")).await.unwrap();
    assert_eq!(json.content_type, "application/json");
    let parsed: ReportContent = serde_json::from_slice(&json.body).unwrap();
    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.summary["transactions"].as_number(), Some(2.0));
}

#[tokio::test]
async fn test_health_snapshot_ignores_inactive_animals() {
    let service = ReportService::new(farm(), clock());
    service.generate(&request("Health", "JSON")).await.unwrap();

    let content = service.content(1, None).await.unwrap();
    assert_eq!(content.summary["healthy"].as_number(), Some(2.0));
    assert_eq!(content.summary["sick"].as_number(), Some(1.0));
    assert_eq!(content.summary["attention"].as_number(), Some(0.0));
    assert!(content.records.is_empty());
}

#[tokio::test]
async fn test_unknown_report() {
    let service = ReportService::new(farm(), clock());
    let err = service.download(99, Some("pdf")).await.unwrap_err();
    assert!(matches!(err, ReportError::NotFound(99)));
    assert_eq!(err.to_string(), "Report 99 not found");
}

#[tokio::test]
async fn test_stats_month_to_date() {
    let service = ReportService::new(farm(), clock());
    let stats = service.stats().await.unwrap();

    assert_eq!(stats.gross_revenue, 166.0);
    assert_eq!(stats.net_revenue, 150.0);
    assert_eq!(stats.operating_costs, 30.0);
    assert_eq!(stats.monthly_profit, 120.0);
    assert_eq!(stats.total_animals, 3);
    assert_eq!(stats.productivity_rate, 80);

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["productivityRate"], 80);
}

#[tokio::test]
async fn test_stats_without_revenue() {
    let service = ReportService::new(Arc::new(MemoryStore::new()), clock());
    let stats = service.stats().await.unwrap();
    assert_eq!(stats.productivity_rate, 0);
    assert_eq!(stats.monthly_profit, 0.0);
}

#[tokio::test]
async fn test_list_pages_newest_first() {
    let store = farm();
    store.add_report(ReportRecord {
        id: 1,
        title: "May wool".to_string(),
        description: "Generated resources report for This month (pdf)".to_string(),
        category: farmpro_reports::ReportCategory::Resources,
        last_generated: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
    });
    let service = ReportService::new(store, clock());
    service.generate(&request("Sales", "CSV")).await.unwrap();
    service.generate(&request("Health", "JSON")).await.unwrap();

    let first = service.list(Some(1), Some(2)).await.unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.total_pages, 2);
    let ids: Vec<i64> = first.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![3, 2]);
    assert_eq!(
        first.items[0].detail,
        "Generated health report for Last 7 days (JSON)"
    );
    assert_eq!(first.items[0].generated, "07 June 2025");

    let second = service.list(Some(2), Some(2)).await.unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].title, "May wool");
    assert_eq!(second.items[0].format, ReportFormat::Pdf);
    assert_eq!(second.items[0].detail, "Generated resources report for This month (PDF)");

    let past_end = service.list(Some(5), Some(2)).await.unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 3);
}

#[tokio::test]
async fn test_stream_into_failing_writer() {
    struct Closed;
    impl std::io::Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "client went away"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let service = ReportService::new(farm(), clock());
    service.generate(&request("Financial", "PDF")).await.unwrap();

    let err = service.stream(1, None, Closed).await.unwrap_err();
    assert!(matches!(
        err,
        ReportError::RenderFailed(ExportError::WriteFailed(_))
    ));

    let mut sink = Vec::new();
    let format = service.stream(1, Some("csv"), &mut sink).await.unwrap();
    assert_eq!(format, ReportFormat::Csv);
    assert!(sink.starts_with(b"report_id,1\n"));
}

/// How the wrapped store misbehaves on the sales totals query
#[derive(Clone, Copy)]
enum Fault {
    Stall(Duration),
    Fail,
}

/// Delegates to a [`MemoryStore`] but injects a fault into `sales_totals`
struct FaultyStore {
    inner: MemoryStore,
    fault: Fault,
}

#[async_trait]
impl ReportStore for FaultyStore {
    async fn find_report(&self, id: i64) -> DatabaseResult<Option<ReportRecord>> {
        self.inner.find_report(id).await
    }

    async fn insert_report(&self, report: &NewReport) -> DatabaseResult<ReportRecord> {
        self.inner.insert_report(report).await
    }

    async fn list_reports(&self, limit: i64, offset: i64) -> DatabaseResult<Vec<ReportRecord>> {
        self.inner.list_reports(limit, offset).await
    }

    async fn count_reports(&self) -> DatabaseResult<i64> {
        self.inner.count_reports().await
    }

    async fn sales_totals(&self, window: &DateWindow) -> DatabaseResult<SalesTotals> {
        match self.fault {
            Fault::Stall(delay) => {
                tokio::time::sleep(delay).await;
                self.inner.sales_totals(window).await
            }
            Fault::Fail => Err(DatabaseError::QueryFailed(
                "relation \"sales\" does not exist".to_string(),
            )),
        }
    }

    async fn expense_total(&self, window: &DateWindow) -> DatabaseResult<f64> {
        self.inner.expense_total(window).await
    }

    async fn ledger_entries(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<FinancialRecord>> {
        self.inner.ledger_entries(window, limit).await
    }

    async fn health_status_counts(&self) -> DatabaseResult<HealthCounts> {
        self.inner.health_status_counts().await
    }

    async fn active_animal_count(&self) -> DatabaseResult<i64> {
        self.inner.active_animal_count().await
    }

    async fn health_events(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<HealthRecord>> {
        self.inner.health_events(window, limit).await
    }

    async fn production_totals(&self, window: &DateWindow) -> DatabaseResult<ProductionTotals> {
        self.inner.production_totals(window).await
    }

    async fn production_logs(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> DatabaseResult<Vec<ResourcesRecord>> {
        self.inner.production_logs(window, limit).await
    }

    async fn sales(&self, window: &DateWindow, limit: usize) -> DatabaseResult<Vec<SalesRecord>> {
        self.inner.sales(window, limit).await
    }

    fn backend_type(&self) -> &'static str {
        "faulty"
    }
}

fn faulty_service(fault: Fault) -> ReportService {
    let store = FaultyStore {
        inner: MemoryStore::new(),
        fault,
    };
    ReportService::new(Arc::new(store), clock()).with_query_timeout(Duration::from_millis(50))
}

#[tokio::test]
async fn test_slow_query_times_out() {
    let service = faulty_service(Fault::Stall(Duration::from_secs(2)));
    service.generate(&request("Sales", "JSON")).await.unwrap();

    let err = service.download(1, None).await.unwrap_err();
    assert!(matches!(err, ReportError::AggregationTimeout(_)), "{:?}", err);

    let err = service.stats().await.unwrap_err();
    assert!(matches!(err, ReportError::AggregationTimeout(_)), "{:?}", err);
}

#[tokio::test]
async fn test_failed_query_is_reported() {
    let service = faulty_service(Fault::Fail);
    service.generate(&request("Financial", "PDF")).await.unwrap();

    let err = service.download(1, None).await.unwrap_err();
    assert!(
        matches!(err, ReportError::AggregationFailed(DatabaseError::QueryFailed(_))),
        "{:?}",
        err
    );

    // Categories that never touch sales totals still render
    service.generate(&request("Health", "JSON")).await.unwrap();
    assert!(service.download(2, None).await.is_ok());
}
