//! Query expression evaluation for in-memory document filtering.

use std::cmp::Ordering;

use bson::{Bson, Document, datetime::DateTime};

use userdoc_core::{
    error::DocumentStoreError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Comparable view of a BSON value.
///
/// Integers and floats are normalized to `f64`. Values of different kinds
/// never compare, so a string operand does not match a numeric field.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    /// Documents, object ids and the remaining BSON kinds only compare by identity.
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Evaluates a filter expression against one document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn matches(document: &'a Document, expr: &Expr) -> bool {
        DocumentEvaluator::new(document)
            .visit_expr(expr)
            .unwrap_or(false)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_field(&mut self, field: &str, op: FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            // A missing field only satisfies `ne`, as in MongoDB.
            return Ok(op == FieldOp::Ne);
        };

        let operand = Comparable::from(value);

        Ok(match (field_value, value) {
            // A scalar operand is tested against each element; `ne` means no element is equal.
            (Bson::Array(items), operand_value) if !matches!(operand_value, Bson::Array(_)) => {
                let any = |op| items.iter().any(|item| compare(&Comparable::from(item), op, &operand));

                match op {
                    FieldOp::Ne => !any(FieldOp::Eq),
                    op => any(op),
                }
            }
            _ => compare(&Comparable::from(field_value), op, &operand),
        })
    }
}

fn compare(left: &Comparable<'_>, op: FieldOp, right: &Comparable<'_>) -> bool {
    match op {
        FieldOp::Eq => left == right,
        FieldOp::Ne => left != right,
        FieldOp::Gt => left.partial_cmp(right) == Some(Ordering::Greater),
        FieldOp::Gte => matches!(left.partial_cmp(right), Some(Ordering::Greater | Ordering::Equal)),
        FieldOp::Lt => left.partial_cmp(right) == Some(Ordering::Less),
        FieldOp::Lte => matches!(left.partial_cmp(right), Some(Ordering::Less | Ordering::Equal)),
    }
}

/// Orders two documents by `field`; documents lacking it sort first.
pub(crate) fn compare_by_field(a: &Document, b: &Document, field: &str) -> Ordering {
    let left = a.get(field).map(Comparable::from).unwrap_or(Comparable::Null);
    let right = b.get(field).map(Comparable::from).unwrap_or(Comparable::Null);

    match (&left, &right) {
        (Comparable::Null, Comparable::Null) => Ordering::Equal,
        (Comparable::Null, _) => Ordering::Less,
        (_, Comparable::Null) => Ordering::Greater,
        _ => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
    }
}
