//! The table the questions are asked against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ast::{Field, GroupBy};
use crate::error::{AtaError, AtaResult};
use crate::transpiler::Dialect;

/// Physical names for the tracing table and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub table: String,
    pub oem_column: String,
    pub state_column: String,
    pub city_column: String,
    pub lob_column: String,
    pub date_column: String,
    pub quantity_column: String,
    /// Alias of the `SUM(quantity)` metric
    pub metric_alias: String,
    pub default_limit: u32,
    pub dialect: Dialect,
    /// Fixed "today" for recency filters. When unset the SQL is relative to
    /// `CURRENT_DATE`.
    pub as_of: Option<NaiveDate>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            table: "TRACING_ST_SMALL_NEW".to_string(),
            oem_column: "OEM".to_string(),
            state_column: "STATE".to_string(),
            city_column: "CITY".to_string(),
            lob_column: "LOB".to_string(),
            date_column: "TRANSACTION_DATE".to_string(),
            quantity_column: "QUANTITIES".to_string(),
            metric_alias: "TOTAL_QUANTITY".to_string(),
            default_limit: 10,
            dialect: Dialect::default(),
            as_of: None,
        }
    }
}

impl Schema {
    /// Physical column name for a logical field.
    pub fn column(&self, field: Field) -> &str {
        match field {
            Field::Oem => &self.oem_column,
            Field::State => &self.state_column,
            Field::City => &self.city_column,
            Field::Lob => &self.lob_column,
            Field::Date => &self.date_column,
            Field::Quantity => &self.quantity_column,
        }
    }

    pub fn group_column(&self, group_by: GroupBy) -> &str {
        self.column(group_by.field())
    }

    /// Check that every name is a plain SQL identifier and the limit is usable.
    pub fn validate(&self) -> AtaResult<()> {
        let names = [
            ("table", &self.table),
            ("oem_column", &self.oem_column),
            ("state_column", &self.state_column),
            ("city_column", &self.city_column),
            ("lob_column", &self.lob_column),
            ("date_column", &self.date_column),
            ("quantity_column", &self.quantity_column),
            ("metric_alias", &self.metric_alias),
        ];
        for (key, name) in names {
            if !is_identifier(name) {
                return Err(AtaError::invalid(key, name));
            }
        }
        if self.default_limit == 0 {
            return Err(AtaError::invalid("default_limit", "0"));
        }
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, optionally dotted (`DB.SCHEMA.TABLE`).
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Schema::default().validate().is_ok());
    }

    #[test]
    fn test_column_lookup() {
        let schema = Schema::default();
        assert_eq!(schema.column(Field::Quantity), "QUANTITIES");
        assert_eq!(schema.group_column(GroupBy::Lob), "LOB");
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        let schema = Schema {
            table: "TRACING; DROP TABLE x".to_string(),
            ..Schema::default()
        };
        assert!(matches!(
            schema.validate(),
            Err(AtaError::InvalidValue { key: "table", .. })
        ));

        let schema = Schema {
            date_column: String::new(),
            ..Schema::default()
        };
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_accepts_qualified_table() {
        let schema = Schema {
            table: "ANALYTICS.PUBLIC.TRACING_ST_SMALL_NEW".to_string(),
            ..Schema::default()
        };
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_limit() {
        let schema = Schema {
            default_limit: 0,
            ..Schema::default()
        };
        assert!(schema.validate().is_err());
    }
}
