//! Translation of list-endpoint query parameters into a store query.
//!
//! The grammar is loose:
//!
//! - `limit`, `page`, `sortBy` and `order` are control keys and are removed
//!   from the mapping before anything else happens. Malformed or
//!   non-positive numbers fall back to the defaults without an error.
//! - Every other key with exactly one value becomes a comparison when the
//!   value starts with one of `eq`, `neq`, `gt`, `gte`, `lt`, `lte`, e.g.
//!   `username=neqalice` or `expiry_date=gte1700000000`. The operand is kept
//!   as a string.
//! - Anything else is ignored.

use std::collections::HashMap;

use crate::{
    page::{DEFAULT_LIMIT, DEFAULT_PAGE, PaginationParams},
    query::{Expr, FieldOp, Filter, Query, Sort, SortDirection},
};

/// Raw query string, grouped by key.
pub type QueryParams = HashMap<String, Vec<String>>;

pub const DEFAULT_SORT_FIELD: &str = "expiry_date";

// `gte`/`lte` come before `gt`/`lt` so the longer operator wins.
const OPERATORS: [(&str, FieldOp); 6] = [
    ("eq", FieldOp::Eq),
    ("neq", FieldOp::Ne),
    ("gte", FieldOp::Gte),
    ("gt", FieldOp::Gt),
    ("lte", FieldOp::Lte),
    ("lt", FieldOp::Lt),
];

/// Filter, pagination and sort for one list request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    /// Field comparisons, ordered by field name.
    pub predicates: Vec<Expr>,
    pub pagination: PaginationParams,
    pub sort: Sort,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            pagination: PaginationParams::default(),
            sort: Sort {
                field: DEFAULT_SORT_FIELD.to_string(),
                direction: SortDirection::Asc,
            },
        }
    }
}

impl ListParams {
    pub fn from_query(mut params: QueryParams) -> Self {
        let limit = take_count(&mut params, "limit").unwrap_or(DEFAULT_LIMIT);
        let page = take_count(&mut params, "page").unwrap_or(DEFAULT_PAGE);
        let field = take_first(&mut params, "sortBy")
            .filter(|field| !field.is_empty())
            .unwrap_or_else(|| DEFAULT_SORT_FIELD.to_string());
        let direction = match take_first(&mut params, "order").as_deref() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        let mut comparisons = params
            .into_iter()
            .filter_map(|(field, values)| match values.as_slice() {
                [value] => parse_comparison(value).map(|(op, operand)| (field, op, operand.to_string())),
                _ => None,
            })
            .collect::<Vec<_>>();
        comparisons.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            predicates: comparisons
                .into_iter()
                .map(|(field, op, operand)| Expr::field(field, op, operand.into()))
                .collect(),
            pagination: PaginationParams::new(page, limit),
            sort: Sort { field, direction },
        }
    }

    /// Builds the mapping from `(key, value)` pairs, keeping repeated keys together.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = QueryParams::new();

        for (key, value) in pairs {
            params.entry(key).or_default().push(value);
        }

        Self::from_query(params)
    }

    pub fn limit(&self) -> usize {
        self.pagination.limit
    }

    pub fn skip(&self) -> usize {
        self.pagination.offset()
    }

    /// The conjunction of all predicates, or `None` to match everything.
    pub fn filter(&self) -> Option<Expr> {
        match self.predicates.is_empty() {
            true => None,
            false => Some(Filter::and(self.predicates.iter().cloned())),
        }
    }

    pub fn to_query(&self) -> Query {
        let mut builder = Query::builder()
            .limit(self.limit())
            .offset(self.skip())
            .sort(self.sort.field.clone(), self.sort.direction);

        if let Some(filter) = self.filter() {
            builder = builder.filter(filter);
        }

        builder.build()
    }
}

fn take_first(params: &mut QueryParams, key: &str) -> Option<String> {
    params
        .remove(key)
        .and_then(|values| values.into_iter().next())
}

fn take_count(params: &mut QueryParams, key: &str) -> Option<usize> {
    take_first(params, key)
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|count| *count > 0)
}

fn parse_comparison(value: &str) -> Option<(FieldOp, &str)> {
    OPERATORS
        .iter()
        .find_map(|(prefix, op)| value.strip_prefix(prefix).map(|operand| (*op, operand)))
}
