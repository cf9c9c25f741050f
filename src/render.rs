//! Terminal rendering for the demo.
//!
//! Every function returns a `String`; printing is left to the caller.

use colored::*;
use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::mock::MockResult;
use crate::schema::Schema;
use crate::transpiler::ToSql;

/// How to show the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Table,
    Chart,
    Sql,
}

const BAR_WIDTH: usize = 40;

pub fn banner() -> String {
    format!(
        "{}\n{}\n{}",
        "🤖 ATA — Analytics Team Agent".cyan().bold(),
        "Helping you query, explore, and understand OEM Socket Tracing Data faster.".dimmed(),
        "─".repeat(72).dimmed()
    )
}

pub fn tip() -> String {
    format!(
        "{} Try asking: {}",
        "💡 Tip:".yellow().bold(),
        "Show total quantities by OEM for the last 3 months".italic()
    )
}

pub fn sql_block(sql: &str) -> String {
    format!("{}\n  {}", "ATA-Generated SQL Query".green().bold(), sql.white())
}

/// Column-aligned table.
pub fn table(result: &MockResult) -> String {
    if result.is_empty() {
        return "(no results)".dimmed().to_string();
    }

    let values: Vec<String> = result.rows.iter().map(|r| r.quantity.to_string()).collect();
    let label_width = result
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .chain(std::iter::once(result.group_column.chars().count()))
        .max()
        .unwrap_or(0);
    let value_width = values
        .iter()
        .map(|v| v.len())
        .chain(std::iter::once(result.metric.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = Vec::with_capacity(result.len() + 4);
    let header = format!(
        "{:lw$} │ {:>vw$}",
        result.group_column,
        result.metric,
        lw = label_width,
        vw = value_width
    );
    out.push(header.white().bold().to_string());
    out.push(
        format!("{}─┼─{}", "─".repeat(label_width), "─".repeat(value_width))
            .dimmed()
            .to_string(),
    );
    for (row, value) in result.rows.iter().zip(&values) {
        out.push(format!(
            "{:lw$} │ {:>vw$}",
            row.label,
            value,
            lw = label_width,
            vw = value_width
        ));
    }
    out.push(String::new());
    out.push(format!("{} row(s) returned", result.len().to_string().cyan()));
    out.join("\n")
}

/// Horizontal bar chart scaled to the largest value.
pub fn bar_chart(result: &MockResult) -> String {
    if result.is_empty() {
        return "(no results)".dimmed().to_string();
    }

    let max = result.rows.iter().map(|r| r.quantity).max().unwrap_or(0).max(1);
    let label_width = result
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = vec![format!("{} by {}", result.metric, result.group_column)
        .white()
        .bold()
        .to_string()];
    for row in &result.rows {
        let len = ((row.quantity as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
        out.push(format!(
            "{:lw$} │ {} {}",
            row.label,
            "█".repeat(len.max(1)).cyan(),
            row.quantity,
            lw = label_width
        ));
    }
    out.join("\n")
}

/// Breakdown of a parsed question.
pub fn explain(question: &str, spec: &QuerySpec, schema: &Schema) -> String {
    let mut out = vec![
        "🤖 ATA Question Breakdown".cyan().bold().to_string(),
        String::new(),
        format!("{} {}", "Question:".dimmed(), question.yellow()),
        String::new(),
        "Parsed Structure:".green().bold().to_string(),
        format!("  {} {}", "Table:".dimmed(), spec.table.white()),
        format!(
            "  {} {} ({})",
            "Group by:".dimmed(),
            spec.group_by.to_string().cyan(),
            schema.group_column(spec.group_by)
        ),
    ];

    if spec.filters.is_empty() {
        out.push(format!("  {} {}", "Filters:".dimmed(), "none".dimmed()));
    } else {
        out.push(format!("  {}", "Filters:".dimmed()));
        for filter in &spec.filters {
            let what = match &filter.predicate {
                Predicate::Contains { value } => format!("contains {}", value.yellow()),
                Predicate::WithinMonths { months } => format!("within last {} month(s)", months),
            };
            out.push(format!("    • {} {}", filter.field.to_string().white(), what));
        }
    }

    let sort = match spec.order {
        Some(SortOrder::Desc) => "descending",
        Some(SortOrder::Asc) => "ascending",
        None => "none",
    };
    out.push(format!("  {} {}", "Sort:".dimmed(), sort));
    out.push(format!("  {} {}", "Limit:".dimmed(), spec.limit));
    out.push(String::new());
    out.push(sql_block(&spec.to_sql(schema)));
    out.join("\n")
}

/// Effective schema, one setting per line.
pub fn schema(schema: &Schema) -> String {
    let as_of = schema
        .as_of
        .map(|d| d.to_string())
        .unwrap_or_else(|| "CURRENT_DATE".to_string());
    let rows = [
        ("table", schema.table.as_str()),
        ("oem", schema.oem_column.as_str()),
        ("state", schema.state_column.as_str()),
        ("city", schema.city_column.as_str()),
        ("lob", schema.lob_column.as_str()),
        ("date", schema.date_column.as_str()),
        ("quantity", schema.quantity_column.as_str()),
        ("metric alias", schema.metric_alias.as_str()),
        ("as of", as_of.as_str()),
    ];
    let mut out: Vec<String> = rows
        .iter()
        .map(|(k, v)| format!("{:14} {}", k.dimmed(), v.white()))
        .collect();
    out.push(format!("{:14} {}", "default limit".dimmed(), schema.default_limit));
    out.push(format!("{:14} {}", "dialect".dimmed(), schema.dialect));
    out.join("\n")
}
