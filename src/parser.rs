//! Question parser.
//!
//! Turns a free-text question into a [`QuerySpec`]. Each pattern has its own
//! extraction function returning `Option`; a miss leaves the default in place.
//!
//! ```text
//! top 5 oems by quantities in texas for the last 3 months
//! ──┬──              ──┬─ ────┬─── ──────────┬─────────
//!   │                  │      │              └── recency  (date >= today - 3 months)
//!   │                  │      └── state       (STATE ILIKE '%TEXAS%')
//!   │                  └── "for" starts an OEM value, but "the last" leaves it empty
//!   └── top N          (ORDER BY metric DESC LIMIT 5)
//! ```
//!
//! Extraction order is OEM, state, recency, grouping, top N. A value captured
//! after `for` stops at the first reserved word; a state after `in` is a single
//! word unless it is a known two-word state name. The first occurrence that
//! yields a value wins.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::ast::*;
use crate::schema::Schema;

static OEM_KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bfor\s+").unwrap());
static OEM_VALUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9 _-]+").unwrap());
static STATE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+(?:state\s+)?").unwrap());
static STATE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,}(?: [a-z]+)*").unwrap());
static RECENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:last|past)\s+(\d+)\s+months?\b").unwrap());
static TOP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\btop\b").unwrap());
static TOP_N: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\btop\s+(\d+)\b").unwrap());
static GROUPINGS: LazyLock<[(Regex, GroupBy); 4]> = LazyLock::new(|| {
    [
        (Regex::new(r"\bby\s+states?\b").unwrap(), GroupBy::State),
        (Regex::new(r"\bby\s+(?:city|cities)\b").unwrap(), GroupBy::City),
        (Regex::new(r"\bby\s+lobs?\b").unwrap(), GroupBy::Lob),
        (Regex::new(r"\bby\s+oems?\b").unwrap(), GroupBy::Oem),
    ]
});

/// Second words of two-word state names (`new york`, `north carolina`).
const STATE_CONTINUATIONS: &[&str] = &[
    "york", "jersey", "carolina", "dakota", "hampshire", "mexico", "virginia", "island",
];

/// Words that end a captured `for` value and cannot start a state.
const RESERVED: &[&str] = &[
    "in", "by", "for", "last", "past", "top", "from", "during", "over", "since", "with", "per",
    "where",
];

/// What `top` asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN {
    /// Explicit N, if one followed `top` and was non-zero
    pub limit: Option<u32>,
}

/// Parse a question against the default schema.
pub fn parse(question: &str) -> QuerySpec {
    parse_with(question, &Schema::default())
}

/// Parse a question against `schema`.
pub fn parse_with(question: &str, schema: &Schema) -> QuerySpec {
    let text = normalize(question);
    trace!(%text, "normalized question");

    let mut spec = QuerySpec::new(schema.table.clone(), schema.default_limit);

    if let Some(oem) = extract_oem(&text) {
        debug!(%oem, "oem filter");
        spec = spec.filter(Filter::contains(Field::Oem, oem));
    }
    if let Some(state) = extract_state(&text) {
        debug!(%state, "state filter");
        spec = spec.filter(Filter::contains(Field::State, state));
    }
    if let Some(months) = extract_recency_months(&text) {
        debug!(months, "recency filter");
        spec = spec.filter(Filter::within_months(months));
    }
    if let Some(group_by) = extract_group_by(&text) {
        debug!(%group_by, "grouping");
        spec = spec.group_by(group_by);
    }
    if let Some(top) = extract_top(&text) {
        debug!(limit = ?top.limit, "top");
        spec = spec.sort_desc();
        if let Some(n) = top.limit {
            spec = spec.limit(n);
        }
    }

    spec
}

/// Lowercase, trim and collapse runs of whitespace to one space.
pub fn normalize(question: &str) -> String {
    question
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `for <value>`, uppercased.
pub fn extract_oem(text: &str) -> Option<String> {
    keyword_value(text, &OEM_KEYWORD, |rest| {
        OEM_VALUE.find(rest).and_then(|v| trim_value(v.as_str()))
    })
}

/// `in [state ]<value>`, uppercased. One word of two or more letters,
/// extended only by a known second word of a state name.
pub fn extract_state(text: &str) -> Option<String> {
    keyword_value(text, &STATE_KEYWORD, state_value)
}

/// `last <N> month(s)` / `past <N> month(s)`. N = 0 is no filter.
pub fn extract_recency_months(text: &str) -> Option<u32> {
    RECENCY
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|&n| n > 0)
}

/// First of `by state`, `by city`, `by lob`, `by oem` present, in that priority.
pub fn extract_group_by(text: &str) -> Option<GroupBy> {
    GROUPINGS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, group_by)| *group_by)
}

/// The word `top`, and the N after it when there is one.
pub fn extract_top(text: &str) -> Option<TopN> {
    if !TOP.is_match(text) {
        return None;
    }
    let limit = TOP_N
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|&n| n > 0);
    Some(TopN { limit })
}

/// Scan every `keyword` occurrence and return the first value `value` accepts
/// from the text after it.
fn keyword_value(
    text: &str,
    keyword: &Regex,
    value: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    keyword
        .find_iter(text)
        .find_map(|m| value(&text[m.end()..]))
        .map(|v| v.to_uppercase())
}

/// State name at the start of `rest`, skipping a leading `the`.
fn state_value(rest: &str) -> Option<String> {
    let run = STATE_VALUE.find(rest)?;
    let mut words = run.as_str().split(' ').peekable();
    if words.peek() == Some(&"the") {
        words.next();
    }
    let first = words.next().filter(|w| w.len() >= 2 && !RESERVED.contains(w))?;
    match words.next() {
        Some(next) if STATE_CONTINUATIONS.contains(&next) => Some(format!("{} {}", first, next)),
        _ => Some(first.to_string()),
    }
}

/// Drop a leading `the` and cut at the first reserved word.
fn trim_value(raw: &str) -> Option<String> {
    let mut words = raw.split_whitespace().peekable();
    if words.peek() == Some(&"the") {
        words.next();
    }
    let kept: Vec<&str> = words.take_while(|w| !RESERVED.contains(w)).collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Show   Totals\tBY State "), "show totals by state");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_default_spec() {
        let spec = parse("hello there");
        assert_eq!(spec.table, "TRACING_ST_SMALL_NEW");
        assert_eq!(spec.group_by, GroupBy::Oem);
        assert!(spec.filters.is_empty());
        assert_eq!(spec.limit, 10);
        assert_eq!(spec.order, None);
    }

    #[test]
    fn test_empty_question() {
        assert_eq!(parse(""), parse("   "));
        assert!(parse("").filters.is_empty());
    }

    #[test]
    fn test_oem() {
        assert_eq!(extract_oem("for mindray"), Some("MINDRAY".to_string()));
        assert_eq!(
            extract_oem("quantities for ge healthcare"),
            Some("GE HEALTHCARE".to_string())
        );
        assert_eq!(extract_oem("for mindray?"), Some("MINDRAY".to_string()));
        assert_eq!(extract_oem("for b-braun_inc"), Some("B-BRAUN_INC".to_string()));
    }

    #[test]
    fn test_oem_stops_at_reserved_word() {
        assert_eq!(
            extract_oem("totals for philips in texas"),
            Some("PHILIPS".to_string())
        );
        assert_eq!(extract_oem("for philips by state"), Some("PHILIPS".to_string()));
    }

    #[test]
    fn test_oem_ignores_time_phrase() {
        assert_eq!(extract_oem("totals for the last 3 months"), None);
        assert_eq!(
            extract_oem("totals for the last 3 months for mindray"),
            Some("MINDRAY".to_string())
        );
    }

    #[test]
    fn test_oem_needs_word_boundary() {
        assert_eq!(extract_oem("information"), None);
        assert_eq!(extract_oem("therefore mindray"), None);
    }

    #[test]
    fn test_state() {
        assert_eq!(extract_state("in texas"), Some("TEXAS".to_string()));
        assert_eq!(extract_state("in state ca"), Some("CA".to_string()));
        assert_eq!(extract_state("in new york for mindray"), Some("NEW YORK".to_string()));
        assert_eq!(extract_state("in north carolina"), Some("NORTH CAROLINA".to_string()));
        assert_eq!(extract_state("in texas?"), Some("TEXAS".to_string()));
    }

    #[test]
    fn test_state_is_one_word_unless_known_state_name() {
        assert_eq!(
            extract_state("top 5 oems in texas grouped by city"),
            Some("TEXAS".to_string())
        );
        assert_eq!(extract_state("totals in texas and ohio"), Some("TEXAS".to_string()));
        assert_eq!(extract_state("oems in texas this year"), Some("TEXAS".to_string()));
        assert_eq!(extract_state("in new orders"), Some("NEW".to_string()));
    }

    #[test]
    fn test_state_tries_later_occurrences() {
        assert_eq!(extract_state("in the x in texas"), Some("TEXAS".to_string()));
        assert_eq!(
            extract_state("in the last 3 months in ohio"),
            Some("OHIO".to_string())
        );
    }

    #[test]
    fn test_state_rejects_short_and_time_phrases() {
        assert_eq!(extract_state("in a box"), None);
        assert_eq!(extract_state("in the last 3 months"), None);
        assert_eq!(extract_state("in 2024"), None);
        assert_eq!(extract_state("mindray"), None);
    }

    #[test]
    fn test_recency() {
        assert_eq!(extract_recency_months("for the last 3 months"), Some(3));
        assert_eq!(extract_recency_months("last 1 month"), Some(1));
        assert_eq!(extract_recency_months("past 12 months"), Some(12));
        assert_eq!(extract_recency_months("last 0 months"), None);
        assert_eq!(extract_recency_months("last three months"), None);
        assert_eq!(extract_recency_months("last 99999999999 months"), None);
    }

    #[test]
    fn test_group_by_priority() {
        assert_eq!(extract_group_by("totals by state"), Some(GroupBy::State));
        assert_eq!(extract_group_by("totals by city"), Some(GroupBy::City));
        assert_eq!(extract_group_by("by lob"), Some(GroupBy::Lob));
        assert_eq!(extract_group_by("by city and by state"), Some(GroupBy::State));
        assert_eq!(extract_group_by("by quantities"), None);
    }

    #[test]
    fn test_top() {
        assert_eq!(extract_top("top 5 oems"), Some(TopN { limit: Some(5) }));
        assert_eq!(extract_top("top oems"), Some(TopN { limit: None }));
        assert_eq!(extract_top("top 0 oems"), Some(TopN { limit: None }));
        assert_eq!(extract_top("stop the laptop"), None);
    }

    #[test]
    fn test_bare_top_sorts_with_default_limit() {
        let spec = parse("top oems");
        assert_eq!(spec.order, Some(SortOrder::Desc));
        assert_eq!(spec.limit, 10);
    }

    #[test]
    fn test_full_question() {
        let spec = parse("top 5 oems by quantities in Texas for the last 3 months");
        assert_eq!(
            spec.filters,
            vec![
                Filter::contains(Field::State, "TEXAS"),
                Filter::within_months(3),
            ]
        );
        assert_eq!(spec.group_by, GroupBy::Oem);
        assert_eq!(spec.limit, 5);
        assert_eq!(spec.order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse("BY STATE"), parse("by state"));
        assert_eq!(parse("For MINDRAY in Texas"), parse("for mindray in texas"));
    }

    #[test]
    fn test_custom_schema() {
        let schema = Schema {
            table: "OTHER".to_string(),
            default_limit: 25,
            ..Schema::default()
        };
        let spec = parse_with("anything", &schema);
        assert_eq!(spec.table, "OTHER");
        assert_eq!(spec.limit, 25);
    }
}
