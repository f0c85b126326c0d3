//! Display formatting for report values
//!
//! PDF cards, highlight cells and the CLI all render numbers through this
//! module so the same metric reads identically everywhere. Any numeric
//! representation is first coerced through [`ReportValue::as_number`]
//! before the key's formatting class is applied.

/// Currency prefix for monetary values
pub const CURRENCY_PREFIX: &str = "KSh";

/// A value that may appear in a summary or record cell
pub trait ReportValue {
    /// Numeric view of the value, if it has one
    fn as_number(&self) -> Option<f64>;

    /// Default string form used when no formatting class applies
    fn to_plain_string(&self) -> String;
}

macro_rules! numeric_report_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReportValue for $ty {
                fn as_number(&self) -> Option<f64> {
                    Some(*self as f64)
                }

                fn to_plain_string(&self) -> String {
                    plain_number(*self as f64)
                }
            }
        )*
    };
}

numeric_report_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl ReportValue for bool {
    fn as_number(&self) -> Option<f64> {
        None
    }

    fn to_plain_string(&self) -> String {
        self.to_string()
    }
}

impl ReportValue for str {
    fn as_number(&self) -> Option<f64> {
        None
    }

    fn to_plain_string(&self) -> String {
        self.to_string()
    }
}

impl ReportValue for String {
    fn as_number(&self) -> Option<f64> {
        None
    }

    fn to_plain_string(&self) -> String {
        self.clone()
    }
}

impl ReportValue for serde_json::Value {
    fn as_number(&self) -> Option<f64> {
        match self {
            serde_json::Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    fn to_plain_string(&self) -> String {
        match self {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => i.to_string(),
                None => n.as_f64().map(plain_number).unwrap_or_else(|| n.to_string()),
            },
            other => other.to_string(),
        }
    }
}

impl<T: ReportValue + ?Sized> ReportValue for &T {
    fn as_number(&self) -> Option<f64> {
        (**self).as_number()
    }

    fn to_plain_string(&self) -> String {
        (**self).to_plain_string()
    }
}

/// Formatting class of a summary or record key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    Currency,
    Count,
    Number,
    Plain,
}

impl ValueClass {
    /// Classify a key, case-insensitively
    pub fn of(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "grossrevenue" | "netrevenue" | "profit" | "totalexpenses" | "totalrevenue"
            | "vatcollected" | "totalvalue" | "amount" | "totalamount" | "netamount"
            | "vatamount" | "priceperunit" => ValueClass::Currency,
            "transactions" | "healthy" | "attention" | "sick" | "eggscount" => ValueClass::Count,
            "milkliters" | "woolkg" | "quantityvalue" => ValueClass::Number,
            _ => ValueClass::Plain,
        }
    }
}

/// Format `value` according to the class of `key`
pub fn format_value<V: ReportValue + ?Sized>(key: &str, value: &V) -> String {
    let number = value.as_number();
    match (ValueClass::of(key), number) {
        (ValueClass::Currency, Some(n)) => format_currency(n),
        (ValueClass::Count, Some(n)) => format!("{}", n.round() as i64),
        (ValueClass::Number, Some(n)) => trim_zero(n),
        _ => value.to_plain_string(),
    }
}

/// `KSh 150` for integral amounts, `KSh 150.50` otherwise
pub fn format_currency(amount: f64) -> String {
    format!("{} {}", CURRENCY_PREFIX, trim_zero(amount))
}

/// Integral values print without decimals, everything else with exactly two
pub fn trim_zero(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Default textual form of a raw number: integral floats lose their `.0`
pub fn plain_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Capitalize the first letter, lowercase the rest
pub fn title_word(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human-readable label for a summary key
pub fn metric_label(key: &str) -> String {
    let label = match key {
        "grossRevenue" => "Gross Revenue",
        "netRevenue" => "Net Revenue",
        "profit" => "Profit",
        "totalExpenses" => "Total Expenses",
        "totalRevenue" => "Total Revenue",
        "vatCollected" => "VAT Collected",
        "transactions" => "Transactions",
        "milkLiters" => "Milk (Liters)",
        "eggsCount" => "Eggs Count",
        "woolKg" => "Wool (Kg)",
        "totalValue" => "Total Value",
        "healthy" => "Healthy Animals",
        "attention" => "Needs Attention",
        "sick" => "Sick Animals",
        "" => "Metric",
        other => other,
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_currency() {
        assert_eq!(format_value("grossRevenue", &150.0), "KSh 150");
        assert_eq!(format_value("grossRevenue", &150.5), "KSh 150.50");
        assert_eq!(format_value("PROFIT", &-30_i64), "KSh -30");
        assert_eq!(format_currency(1200.75), "KSh 1200.75");
    }

    #[test]
    fn test_counts_round() {
        assert_eq!(format_value("transactions", &3.6_f32), "4");
        assert_eq!(format_value("sick", &2_u8), "2");
        assert_eq!(format_value("eggsCount", &json!(120)), "120");
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(format_value("milkLiters", &42.0), "42");
        assert_eq!(format_value("woolKg", &3.25), "3.25");
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(format_value("county", "Nakuru"), "Nakuru");
        assert_eq!(format_value("vatApplicable", &true), "true");
        assert_eq!(format_value("ratio", &json!(2.5)), "2.5");
        assert_eq!(format_value("grossRevenue", &json!("n/a")), "n/a");
    }

    #[test]
    fn test_every_numeric_width_agrees() {
        let expected = "KSh 7";
        assert_eq!(format_value("netRevenue", &7_i8), expected);
        assert_eq!(format_value("netRevenue", &7_u16), expected);
        assert_eq!(format_value("netRevenue", &7_i32), expected);
        assert_eq!(format_value("netRevenue", &7_u64), expected);
        assert_eq!(format_value("netRevenue", &7.0_f32), expected);
        assert_eq!(format_value("netRevenue", &json!(7.0)), expected);
    }

    #[test]
    fn test_title_word() {
        assert_eq!(title_word("EXPENSE"), "Expense");
        assert_eq!(title_word(""), "");
    }

    #[test]
    fn test_metric_label() {
        assert_eq!(metric_label("vatCollected"), "VAT Collected");
        assert_eq!(metric_label("custom"), "custom");
        assert_eq!(metric_label(""), "Metric");
    }
}
