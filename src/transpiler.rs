//! SQL Transpiler for parsed questions.
//!
//! Renders a [`QuerySpec`] into a single aggregate SELECT:
//!
//! ```text
//! SELECT <group>, SUM(<qty>) AS <alias> FROM <table>
//!   [WHERE <f1> AND <f2> ...] GROUP BY <group> [ORDER BY <alias> DESC] LIMIT <n>;
//! ```

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::schema::Schema;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string, resolving column names via `schema`.
    fn to_sql(&self, schema: &Schema) -> String;
}

/// SQL dialects with a distinct date arithmetic syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Snowflake,
    Postgres,
}

impl Dialect {
    /// Expression for "today minus `months` months".
    pub fn months_ago(&self, months: u32) -> String {
        match self {
            Dialect::Snowflake => format!("DATEADD(MONTH, -{}, CURRENT_DATE)", months),
            Dialect::Postgres => format!("CURRENT_DATE - INTERVAL '{} months'", months),
        }
    }

    /// Date literal.
    pub fn date_literal(&self, date: NaiveDate) -> String {
        match self {
            Dialect::Snowflake => format!("'{}'::DATE", date.format("%Y-%m-%d")),
            Dialect::Postgres => format!("DATE '{}'", date.format("%Y-%m-%d")),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Snowflake => write!(f, "snowflake"),
            Dialect::Postgres => write!(f, "postgres"),
        }
    }
}

impl ToSql for QuerySpec {
    fn to_sql(&self, schema: &Schema) -> String {
        let group = schema.group_column(self.group_by);
        let alias = &schema.metric_alias;

        let mut sql = format!(
            "SELECT {}, SUM({}) AS {} FROM {}",
            group,
            schema.column(Field::Quantity),
            alias,
            self.table
        );

        // WHERE
        if !self.filters.is_empty() {
            let conditions: Vec<String> = self.filters.iter().map(|f| f.to_sql(schema)).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        // GROUP BY
        sql.push_str(" GROUP BY ");
        sql.push_str(group);

        // ORDER BY
        if let Some(order) = self.order {
            let dir = match order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            };
            sql.push_str(&format!(" ORDER BY {} {}", alias, dir));
        }

        // LIMIT
        sql.push_str(&format!(" LIMIT {};", self.limit));

        sql
    }
}

impl ToSql for Filter {
    fn to_sql(&self, schema: &Schema) -> String {
        let column = schema.column(self.field);
        match &self.predicate {
            Predicate::Contains { value } => {
                format!("{} ILIKE '%{}%'", column, value.replace('\'', "''"))
            }
            Predicate::WithinMonths { months } => {
                format!("{} >= {}", column, lower_bound(schema, *months))
            }
        }
    }
}

/// Anchor date minus `months` when an anchor is configured, otherwise a
/// `CURRENT_DATE` expression.
fn lower_bound(schema: &Schema, months: u32) -> String {
    match schema
        .as_of
        .and_then(|d| d.checked_sub_months(Months::new(months)))
    {
        Some(date) => schema.dialect.date_literal(date),
        None => schema.dialect.months_ago(months),
    }
}
