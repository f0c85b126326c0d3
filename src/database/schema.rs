//! SQL used by the PostgreSQL report store
//!
//! The back office schema itself is owned by the main application's
//! migration runner; these statements only read it (and insert report
//! requests). Numeric columns are cast so they decode as `f64`/`i64`
//! regardless of the declared `NUMERIC` precision.
//!
//! Windowed statements take `$1`/`$2` as inclusive dates and `$3` as the
//! row limit.

/// SQL for stored report requests
pub mod report_sql {
    pub const SELECT_BY_ID: &str = r#"
SELECT id, title, description, category, last_generated
FROM reports
WHERE id = $1
"#;

    pub const INSERT: &str = r#"
INSERT INTO reports (title, description, category, last_generated)
VALUES ($1, $2, $3, $4)
RETURNING id
"#;

    pub const SELECT_PAGE: &str = r#"
SELECT id, title, description, category, last_generated
FROM reports
ORDER BY last_generated DESC, id DESC
LIMIT $1 OFFSET $2
"#;

    pub const COUNT: &str = "SELECT COUNT(*) FROM reports";
}

/// SQL for sales aggregates and rows
pub mod sales_sql {
    pub const TOTALS: &str = r#"
SELECT COALESCE(SUM(total_amount), 0)::float8,
       COALESCE(SUM(net_amount), 0)::float8,
       COALESCE(SUM(vat_amount), 0)::float8,
       COUNT(*)
FROM sales
WHERE sale_date BETWEEN $1 AND $2
"#;

    pub const ROWS: &str = r#"
SELECT id, sale_date, product, quantity_value::float8, quantity_unit,
       COALESCE(buyer, ''), COALESCE(buyer_pin, ''), vat_applicable,
       vat_rate::float8, vat_amount::float8, net_amount::float8,
       price_per_unit::float8, total_amount::float8
FROM sales
WHERE sale_date BETWEEN $1 AND $2
ORDER BY sale_date DESC, id DESC
LIMIT $3
"#;
}

/// SQL for expenses
pub mod expense_sql {
    pub const TOTAL: &str = r#"
SELECT COALESCE(SUM(amount), 0)::float8
FROM expenses
WHERE expense_date BETWEEN $1 AND $2
"#;
}

/// SQL for the merged sales/expenses ledger
pub mod ledger_sql {
    pub const ROWS: &str = r#"
SELECT entry_id, entry_date, entry_type, item, amount
FROM (
    SELECT id AS entry_id, sale_date AS entry_date, 'sale' AS entry_type,
           product AS item, total_amount::float8 AS amount
    FROM sales
    WHERE sale_date BETWEEN $1 AND $2
    UNION ALL
    SELECT id AS entry_id, expense_date AS entry_date, 'expense' AS entry_type,
           item, (amount * -1)::float8 AS amount
    FROM expenses
    WHERE expense_date BETWEEN $1 AND $2
) t
ORDER BY entry_date DESC, entry_id DESC
LIMIT $3
"#;
}

/// SQL for animal health
pub mod health_sql {
    pub const STATUS_COUNTS: &str = r#"
SELECT COUNT(*) FILTER (WHERE health_status = 'healthy'),
       COUNT(*) FILTER (WHERE health_status = 'attention'),
       COUNT(*) FILTER (WHERE health_status = 'sick')
FROM animals
WHERE is_active = true
"#;

    pub const ACTIVE_ANIMALS: &str = "SELECT COUNT(*) FROM animals WHERE is_active = true";

    pub const ROWS: &str = r#"
SELECT h.id, h.record_date, a.tag_id, h.action,
       COALESCE(h.treatment, ''), COALESCE(h.veterinarian, '')
FROM health_records h
JOIN animals a ON a.id = h.animal_id
WHERE h.record_date BETWEEN $1 AND $2
ORDER BY h.record_date DESC, h.id DESC
LIMIT $3
"#;
}

/// SQL for production logs
pub mod production_sql {
    pub const TOTALS: &str = r#"
SELECT COALESCE(SUM(milk_liters), 0)::float8,
       COALESCE(SUM(eggs_count), 0)::bigint,
       COALESCE(SUM(wool_kg), 0)::float8,
       COALESCE(SUM(total_value), 0)::float8
FROM production_logs
WHERE log_date BETWEEN $1 AND $2
"#;

    pub const ROWS: &str = r#"
SELECT id, log_date, milk_liters::float8, eggs_count::bigint,
       wool_kg::float8, total_value::float8
FROM production_logs
WHERE log_date BETWEEN $1 AND $2
ORDER BY log_date DESC, id DESC
LIMIT $3
"#;
}
