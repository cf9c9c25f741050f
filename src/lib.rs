//! # ATA — Analytics Team Agent
//!
//! Turns a plain-English question about OEM tracing data into a single
//! aggregate SQL query.
//!
//! ## Quick Example
//!
//! ```
//! let sql = ata::generate_sql("top 5 oems in Texas for the last 3 months");
//! assert_eq!(
//!     sql,
//!     "SELECT OEM, SUM(QUANTITIES) AS TOTAL_QUANTITY FROM TRACING_ST_SMALL_NEW \
//!      WHERE STATE ILIKE '%TEXAS%' AND TRANSACTION_DATE >= DATEADD(MONTH, -3, CURRENT_DATE) \
//!      GROUP BY OEM ORDER BY TOTAL_QUANTITY DESC LIMIT 5;"
//! );
//! ```
//!
//! ## Recognized phrases
//!
//! | Phrase              | Effect                                  |
//! |---------------------|-----------------------------------------|
//! | `for <name>`        | `OEM ILIKE '%NAME%'`                    |
//! | `in [state ]<name>` | `STATE ILIKE '%NAME%'`                  |
//! | `last N months`     | date lower bound N months back          |
//! | `by state/city/lob` | group column (default OEM)              |
//! | `top [N]`           | `ORDER BY ... DESC`, `LIMIT N`          |
//!
//! Anything else is ignored; every input yields a valid query.

pub mod ast;
pub mod config;
pub mod error;
pub mod mock;
pub mod parser;
pub mod render;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::Templater;
    pub use crate::ast::*;
    pub use crate::config::{AtaConfig, DisplayConfig};
    pub use crate::error::*;
    pub use crate::mock::{MockResult, MockRow};
    pub use crate::parser::parse;
    pub use crate::render::View;
    pub use crate::schema::Schema;
    pub use crate::transpiler::{Dialect, ToSql};
}

use ast::QuerySpec;
use schema::Schema;
use transpiler::ToSql;

/// Generate SQL for a question against the default schema.
///
/// Never fails: unrecognized input falls back to an unfiltered query.
///
/// ```
/// assert_eq!(
///     ata::generate_sql("for Mindray"),
///     "SELECT OEM, SUM(QUANTITIES) AS TOTAL_QUANTITY FROM TRACING_ST_SMALL_NEW \
///      WHERE OEM ILIKE '%MINDRAY%' GROUP BY OEM LIMIT 10;"
/// );
/// ```
pub fn generate_sql(question: &str) -> String {
    Templater::default().generate(question)
}

/// Parse a question against the default schema.
pub fn parse(question: &str) -> QuerySpec {
    parser::parse(question)
}

/// Question-to-SQL templater bound to a schema.
#[derive(Debug, Clone, Default)]
pub struct Templater {
    schema: Schema,
}

impl Templater {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Structured form of `question`.
    pub fn spec(&self, question: &str) -> QuerySpec {
        parser::parse_with(question, &self.schema)
    }

    /// SQL for `question`.
    pub fn generate(&self, question: &str) -> String {
        self.spec(question).to_sql(&self.schema)
    }
}
