//! Demo result rows.
//!
//! Nothing is executed. Each group-by column has a fixed set of rows; the
//! query's sort and limit are applied, and a fuzzy filter on the grouped column
//! narrows the labels.

use serde::Serialize;

use crate::ast::*;
use crate::schema::Schema;

const OEM_ROWS: &[(&str, u64)] = &[
    ("Mindray", 245),
    ("Philips", 315),
    ("GE Healthcare", 289),
    ("Siemens Healthineers", 204),
    ("Medtronic", 172),
];

const STATE_ROWS: &[(&str, u64)] = &[
    ("Texas", 412),
    ("California", 388),
    ("New York", 301),
    ("Florida", 254),
    ("Ohio", 143),
];

const CITY_ROWS: &[(&str, u64)] = &[
    ("Houston", 167),
    ("Los Angeles", 159),
    ("Chicago", 134),
    ("Phoenix", 98),
    ("Columbus", 61),
];

const LOB_ROWS: &[(&str, u64)] = &[
    ("Imaging", 520),
    ("Patient Monitoring", 347),
    ("Ultrasound", 212),
];

/// One aggregated row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockRow {
    pub label: String,
    pub quantity: u64,
}

/// Result set shaped like the generated SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockResult {
    /// Grouped column name
    pub group_column: String,
    /// Metric alias
    pub metric: String,
    pub rows: Vec<MockRow>,
}

impl MockResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Static rows for the query's group-by column.
pub fn lookup(spec: &QuerySpec, schema: &Schema) -> MockResult {
    let table = match spec.group_by {
        GroupBy::Oem => OEM_ROWS,
        GroupBy::State => STATE_ROWS,
        GroupBy::City => CITY_ROWS,
        GroupBy::Lob => LOB_ROWS,
    };

    let needles: Vec<&str> = spec
        .filters
        .iter()
        .filter(|f| f.field == spec.group_by.field())
        .filter_map(|f| match &f.predicate {
            Predicate::Contains { value } => Some(value.as_str()),
            Predicate::WithinMonths { .. } => None,
        })
        .collect();

    let mut rows: Vec<MockRow> = table
        .iter()
        .filter(|(label, _)| {
            let upper = label.to_uppercase();
            needles.iter().all(|n| upper.contains(n))
        })
        .map(|(label, quantity)| MockRow {
            label: label.to_string(),
            quantity: *quantity,
        })
        .collect();

    match spec.order {
        Some(SortOrder::Desc) => rows.sort_by(|a, b| b.quantity.cmp(&a.quantity)),
        Some(SortOrder::Asc) => rows.sort_by(|a, b| a.quantity.cmp(&b.quantity)),
        None => {}
    }
    rows.truncate(spec.limit as usize);

    MockResult {
        group_column: schema.group_column(spec.group_by).to_string(),
        metric: schema.metric_alias.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn labels(result: &MockResult) -> Vec<&str> {
        result.rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_keyed_by_group() {
        let schema = Schema::default();
        let result = lookup(&parse("totals by lob"), &schema);
        assert_eq!(result.group_column, "LOB");
        assert_eq!(result.metric, "TOTAL_QUANTITY");
        assert_eq!(labels(&result), vec!["Imaging", "Patient Monitoring", "Ultrasound"]);
    }

    #[test]
    fn test_top_sorts_and_limits() {
        let result = lookup(&parse("top 2 oems"), &Schema::default());
        assert_eq!(labels(&result), vec!["Philips", "GE Healthcare"]);
    }

    #[test]
    fn test_unsorted_keeps_table_order() {
        let result = lookup(&parse("oem totals"), &Schema::default());
        assert_eq!(result.len(), 5);
        assert_eq!(result.rows[0].label, "Mindray");
    }

    #[test]
    fn test_group_filter_narrows_rows() {
        let result = lookup(&parse("for mindray"), &Schema::default());
        assert_eq!(labels(&result), vec!["Mindray"]);

        let result = lookup(&parse("for nobody"), &Schema::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_other_filters_do_not_narrow() {
        let result = lookup(&parse("by state for mindray"), &Schema::default());
        assert_eq!(result.len(), 5);
    }
}
