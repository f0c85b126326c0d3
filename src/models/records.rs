//! Typed aggregation rows
//!
//! Each report category yields its own row shape. [`ReportRow`] is the
//! tagged union the aggregator produces; it serializes untagged so JSON and
//! CSV output carry the flat camelCase keys of the underlying record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::{format_currency, title_word, trim_zero};

/// Behaviour shared by every row shape: ordering keys and the human-readable
/// columns used by the highlight table (without the leading `#` column).
pub trait Renderable {
    /// Calendar date of the entry
    fn date(&self) -> NaiveDate;

    /// Source row id, used to break ties between entries on the same date
    fn row_id(&self) -> i64;

    /// Display strings for the category's highlight columns
    fn display_columns(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Sale,
    Expense,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Sale => "sale",
            LedgerKind::Expense => "expense",
        }
    }
}

/// Merged sales/expenses ledger entry. Expenses carry a negative amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(skip)]
    pub id: i64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: LedgerKind,
    pub item: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    #[serde(skip)]
    pub id: i64,
    pub date: NaiveDate,
    pub animal_tag_id: String,
    pub action: String,
    pub treatment: String,
    pub veterinarian: String,
}

/// One day of production output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesRecord {
    #[serde(skip)]
    pub id: i64,
    pub date: NaiveDate,
    pub milk_liters: f64,
    pub eggs_count: i64,
    pub wool_kg: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    #[serde(skip)]
    pub id: i64,
    pub date: NaiveDate,
    pub product: String,
    pub quantity_value: f64,
    pub quantity_unit: String,
    pub buyer: String,
    #[serde(rename = "buyerPIN")]
    pub buyer_pin: String,
    pub vat_applicable: bool,
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub net_amount: f64,
    pub price_per_unit: f64,
    pub total_amount: f64,
}

impl Renderable for FinancialRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn row_id(&self) -> i64 {
        self.id
    }

    fn display_columns(&self) -> Vec<String> {
        vec![
            iso_date(self.date),
            title_word(self.kind.as_str()),
            self.item.clone(),
            format_currency(self.amount),
        ]
    }
}

impl Renderable for HealthRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn row_id(&self) -> i64 {
        self.id
    }

    fn display_columns(&self) -> Vec<String> {
        vec![
            iso_date(self.date),
            self.animal_tag_id.clone(),
            self.action.clone(),
            self.treatment.clone(),
            self.veterinarian.clone(),
        ]
    }
}

impl Renderable for ResourcesRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn row_id(&self) -> i64 {
        self.id
    }

    fn display_columns(&self) -> Vec<String> {
        vec![
            iso_date(self.date),
            trim_zero(self.milk_liters),
            self.eggs_count.to_string(),
            trim_zero(self.wool_kg),
            format_currency(self.total_value),
        ]
    }
}

impl Renderable for SalesRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn row_id(&self) -> i64 {
        self.id
    }

    fn display_columns(&self) -> Vec<String> {
        let quantity = format!("{} {}", trim_zero(self.quantity_value), self.quantity_unit);
        vec![
            iso_date(self.date),
            self.product.clone(),
            quantity.trim().to_string(),
            self.buyer.clone(),
            format_currency(self.total_amount),
        ]
    }
}

/// One aggregated row of any category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportRow {
    Financial(FinancialRecord),
    Health(HealthRecord),
    Resources(ResourcesRecord),
    Sales(SalesRecord),
}

impl ReportRow {
    fn inner(&self) -> &dyn Renderable {
        match self {
            ReportRow::Financial(r) => r,
            ReportRow::Health(r) => r,
            ReportRow::Resources(r) => r,
            ReportRow::Sales(r) => r,
        }
    }
}

impl Renderable for ReportRow {
    fn date(&self) -> NaiveDate {
        self.inner().date()
    }

    fn row_id(&self) -> i64 {
        self.inner().row_id()
    }

    fn display_columns(&self) -> Vec<String> {
        self.inner().display_columns()
    }
}

impl From<FinancialRecord> for ReportRow {
    fn from(record: FinancialRecord) -> Self {
        ReportRow::Financial(record)
    }
}

impl From<HealthRecord> for ReportRow {
    fn from(record: HealthRecord) -> Self {
        ReportRow::Health(record)
    }
}

impl From<ResourcesRecord> for ReportRow {
    fn from(record: ResourcesRecord) -> Self {
        ReportRow::Resources(record)
    }
}

impl From<SalesRecord> for ReportRow {
    fn from(record: SalesRecord) -> Self {
        ReportRow::Sales(record)
    }
}

pub(crate) fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_financial_columns() {
        let record = FinancialRecord {
            id: 4,
            date: day(2),
            kind: LedgerKind::Expense,
            item: "Dairy meal".to_string(),
            amount: -1250.5,
        };
        assert_eq!(
            record.display_columns(),
            vec!["2025-03-02", "Expense", "Dairy meal", "KSh -1250.50"]
        );
    }

    #[test]
    fn test_sales_quantity_column_trims_missing_unit() {
        let record = SalesRecord {
            id: 1,
            date: day(9),
            product: "Milk".to_string(),
            quantity_value: 40.0,
            quantity_unit: String::new(),
            buyer: "Brookside".to_string(),
            buyer_pin: String::new(),
            vat_applicable: false,
            vat_rate: 0.0,
            vat_amount: 0.0,
            net_amount: 2000.0,
            price_per_unit: 50.0,
            total_amount: 2000.0,
        };
        assert_eq!(record.display_columns()[2], "40");
    }

    #[test]
    fn test_row_serializes_flat() {
        let row = ReportRow::from(HealthRecord {
            id: 11,
            date: day(5),
            animal_tag_id: "KE-0042".to_string(),
            action: "Vaccination".to_string(),
            treatment: "FMD booster".to_string(),
            veterinarian: "Dr. Wanjiru".to_string(),
        });
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["animalTagId"], "KE-0042");
        assert_eq!(json["date"], "2025-03-05");
        assert!(json.get("id").is_none());
        assert_eq!(row.row_id(), 11);
    }
}
