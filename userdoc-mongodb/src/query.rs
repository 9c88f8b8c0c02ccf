//! Query translation from the userdoc filter AST to MongoDB query syntax.

use bson::{Bson, Document, doc};

use userdoc_core::{
    error::DocumentStoreError,
    query::{Expr, FieldOp, QueryVisitor, Sort, SortDirection},
};

/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// `None` matches every document.
    pub(crate) fn filter(expr: Option<&Expr>) -> Result<Document, DocumentStoreError> {
        match expr {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }

    /// Saturates at `i64::MAX`; a negative limit means a single batch to MongoDB.
    pub(crate) fn limit(limit: usize) -> i64 {
        i64::try_from(limit).unwrap_or(i64::MAX)
    }

    /// The server stores skip as a signed 64-bit value.
    pub(crate) fn skip(offset: usize) -> u64 {
        u64::try_from(offset).unwrap_or(u64::MAX).min(i64::MAX as u64)
    }

    pub(crate) fn sort(sort: &Sort) -> Document {
        doc! {
            sort.field.clone(): match sort.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            }
        }
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        // `$and` must be a non-empty array.
        if exprs.is_empty() {
            return Ok(doc! {});
        }

        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(&mut self, field: &str, op: FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let operator = match op {
            FieldOp::Eq => "$eq",
            FieldOp::Ne => "$ne",
            FieldOp::Gt => "$gt",
            FieldOp::Gte => "$gte",
            FieldOp::Lt => "$lt",
            FieldOp::Lte => "$lte",
        };

        Ok(doc! {
            field: { operator: value.clone() },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdoc_core::{params::ListParams, query::Filter};

    #[test]
    fn no_filter_matches_everything() {
        assert_eq!(MongoQueryTranslator::filter(None).unwrap(), doc! {});
        assert_eq!(MongoQueryTranslator::filter(Some(&Filter::and([]))).unwrap(), doc! {});
    }

    #[test]
    fn comparisons_map_to_operators() {
        let expr = Filter::and([
            Filter::eq("username", "alice"),
            Filter::ne("password", ""),
            Filter::gte("expiry_date", "30"),
            Filter::lt("expiry_date", "90"),
        ]);

        assert_eq!(
            MongoQueryTranslator::filter(Some(&expr)).unwrap(),
            doc! {
                "$and": [
                    { "username": { "$eq": "alice" } },
                    { "password": { "$ne": "" } },
                    { "expiry_date": { "$gte": "30" } },
                    { "expiry_date": { "$lt": "90" } },
                ]
            }
        );
    }

    #[test]
    fn single_comparison_is_not_wrapped() {
        assert_eq!(
            MongoQueryTranslator::filter(Some(&Filter::gt("expiry_date", 5_i64))).unwrap(),
            doc! { "expiry_date": { "$gt": 5_i64 } }
        );
    }

    #[test]
    fn huge_limit_and_skip_stay_positive() {
        assert_eq!(MongoQueryTranslator::limit(50), 50);
        assert_eq!(MongoQueryTranslator::limit(usize::MAX), i64::MAX);
        assert_eq!(MongoQueryTranslator::skip(100), 100);
        assert_eq!(MongoQueryTranslator::skip(usize::MAX), i64::MAX as u64);
    }

    #[test]
    fn huge_list_params_translate_to_valid_options() {
        let params = ListParams::from_pairs([
            ("limit".to_string(), usize::MAX.to_string()),
            ("page".to_string(), "3".to_string()),
        ]);
        let query = params.to_query();

        assert_eq!(query.limit.map(MongoQueryTranslator::limit), Some(i64::MAX));
        assert_eq!(query.offset.map(MongoQueryTranslator::skip), Some(i64::MAX as u64));
    }

    #[test]
    fn sort_direction_maps_to_sign() {
        let ascending = Sort { field: "expiry_date".into(), direction: SortDirection::Asc };
        let descending = Sort { field: "username".into(), direction: SortDirection::Desc };

        assert_eq!(MongoQueryTranslator::sort(&ascending), doc! { "expiry_date": 1 });
        assert_eq!(MongoQueryTranslator::sort(&descending), doc! { "username": -1 });
    }
}
