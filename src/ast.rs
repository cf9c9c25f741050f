//! Structured form of a question.
//!
//! A [`QuerySpec`] sits between the parsed question and the rendered SQL.
//! Columns are referenced by [`Field`], a logical name; the physical column
//! names come from the [`Schema`](crate::schema::Schema) at render time.

use serde::{Deserialize, Serialize};

/// Logical columns of the tracing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Oem,
    State,
    City,
    Lob,
    Date,
    Quantity,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Oem => write!(f, "oem"),
            Field::State => write!(f, "state"),
            Field::City => write!(f, "city"),
            Field::Lob => write!(f, "lob"),
            Field::Date => write!(f, "date"),
            Field::Quantity => write!(f, "quantity"),
        }
    }
}

/// Categorical column the quantity metric is aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Oem,
    State,
    City,
    Lob,
}

impl GroupBy {
    pub fn field(self) -> Field {
        match self {
            GroupBy::Oem => Field::Oem,
            GroupBy::State => Field::State,
            GroupBy::City => Field::City,
            GroupBy::Lob => Field::Lob,
        }
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.field().fmt(f)
    }
}

/// A filter predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive substring match (`ILIKE '%value%'`).
    Contains { value: String },
    /// Lower bound of N months before the current (or anchor) date.
    WithinMonths { months: u32 },
}

/// A single `column predicate` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: Field,
    pub predicate: Predicate,
}

impl Filter {
    /// Fuzzy filter on `field`.
    pub fn contains(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            predicate: Predicate::Contains {
                value: value.into(),
            },
        }
    }

    /// Recency filter on the date column.
    pub fn within_months(months: u32) -> Self {
        Self {
            field: Field::Date,
            predicate: Predicate::WithinMonths { months },
        }
    }
}

/// Sort direction on the aggregate metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// The parsed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Target table
    pub table: String,
    /// Column the metric is grouped by
    pub group_by: GroupBy,
    /// Filters, in the order they were extracted
    pub filters: Vec<Filter>,
    /// Row limit
    pub limit: u32,
    /// Sort on the aggregate metric, if any
    pub order: Option<SortOrder>,
}

impl QuerySpec {
    /// Create an unfiltered spec grouped by OEM.
    pub fn new(table: impl Into<String>, limit: u32) -> Self {
        Self {
            table: table.into(),
            group_by: GroupBy::default(),
            filters: vec![],
            limit,
            order: None,
        }
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = n;
        self
    }

    pub fn sort_desc(mut self) -> Self {
        self.order = Some(SortOrder::Desc);
        self
    }
}
