//! Helpers for assembling dynamic `WHERE` / `ORDER BY` clauses with
//! [`sqlx::QueryBuilder`].

use sqlx::{Postgres, QueryBuilder};
use venuebook_core::date_range::RangeFilter;
use venuebook_core::pagination::SortSpec;
use venuebook_core::types::Timestamp;

/// Emits ` WHERE ` before the first condition and ` AND ` before the rest.
#[derive(Debug, Default)]
pub struct Conditions {
    started: bool,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the connective for the next condition.
    pub fn next<'q>(&mut self, qb: &mut QueryBuilder<'q, Postgres>) {
        qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
    }
}

/// Push `column >= $n` and/or `column <= $m` for each bound that is set.
pub fn push_range<'q>(
    qb: &mut QueryBuilder<'q, Postgres>,
    conditions: &mut Conditions,
    column: &str,
    range: &RangeFilter<Timestamp>,
) {
    if let Some(start) = range.gte {
        conditions.next(qb);
        qb.push(column).push(" >= ").push_bind(start);
    }
    if let Some(end) = range.lte {
        conditions.next(qb);
        qb.push(column).push(" <= ").push_bind(end);
    }
}

/// Render an `ORDER BY` clause from a sort spec.
///
/// `columns` maps API field names to SQL expressions. Fields without a
/// mapping are skipped; callers reject them earlier with
/// [`SortSpec::ensure_allowed`]. An empty spec falls back to `default_order`.
/// `tiebreak` is appended unless the spec already sorts by it, so paging is
/// stable.
pub fn order_by_clause(
    sort: &SortSpec,
    columns: &[(&str, &str)],
    default_order: &str,
    tiebreak: (&str, &str),
) -> String {
    let mut parts: Vec<String> = sort
        .iter()
        .filter_map(|(field, direction)| {
            columns
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, column)| format!("{column} {}", direction.as_sql()))
        })
        .collect();

    if parts.is_empty() {
        parts.push(default_order.to_string());
    }

    let (tiebreak_field, tiebreak_column) = tiebreak;
    if !sort.contains(tiebreak_field) {
        parts.push(format!("{tiebreak_column} ASC"));
    }

    format!(" ORDER BY {}", parts.join(", "))
}
