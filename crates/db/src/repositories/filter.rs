//! Dynamic WHERE-clause assembly for filtered listings.

use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;
use stockroom_core::types::Timestamp;

/// Typed bind value for dynamically-built queries.
pub(crate) enum BindValue {
    BigInt(i64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Accumulates `AND`-joined conditions with positional parameters.
#[derive(Default)]
pub(crate) struct Filter {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl Filter {
    /// Add a condition. `condition` receives the placeholder index to use.
    pub(crate) fn push(&mut self, condition: impl FnOnce(usize) -> String, value: BindValue) {
        let idx = self.values.len() + 1;
        self.conditions.push(condition(idx));
        self.values.push(value);
    }

    /// `WHERE ...`, or empty when no filter is active.
    pub(crate) fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Placeholder index for the first parameter after the filter values.
    pub(crate) fn next_index(&self) -> usize {
        self.values.len() + 1
    }

    pub(crate) fn bind_rows<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }

    pub(crate) fn bind_count<'q>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    ) -> QueryScalar<'q, Postgres, i64, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }
}

/// Wrap user text for a substring `ILIKE` match, escaping wildcards.
pub(crate) fn like_pattern(text: &str) -> String {
    let escaped = text
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_sequential() {
        let mut filter = Filter::default();
        assert_eq!(filter.where_clause(), "");
        filter.push(|i| format!("a = ${i}"), BindValue::BigInt(1));
        filter.push(|i| format!("(b ILIKE ${i} OR c ILIKE ${i})"), BindValue::Text("%x%".into()));
        assert_eq!(filter.where_clause(), "WHERE a = $1 AND (b ILIKE $2 OR c ILIKE $2)");
        assert_eq!(filter.next_index(), 3);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" hand "), "%hand%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
