//! Constructor resolution.
//!
//! Picks, among a type's registered constructors, the one best matching the
//! column set a result delivered. The ranking has a deliberate asymmetry
//! carried over from the system this mapper is compatible with: a candidate
//! is accumulated only when its overlap score strictly exceeds the running
//! maximum, so a later candidate that merely ties the maximum is dropped even
//! if it would otherwise be preferable. Guarded by regression tests below;
//! do not "fix" it.

use crate::db::row::ColumnDescriptor;
use crate::error::{MapError, MapResult};
use crate::models::schema::{ConstructorCandidate, TypeSchema};

/// Pick the constructor best matching the available columns.
///
/// An explicitly pinned constructor short-circuits scoring entirely.
/// Otherwise candidates are accumulated in strictly increasing score order,
/// then walked highest-score-first; the first one whose parameter count fits
/// within the column count wins.
pub fn resolve<'a>(
    schema: &'a TypeSchema,
    columns: &[ColumnDescriptor],
) -> MapResult<&'a ConstructorCandidate> {
    if let Some(pinned) = schema.explicit_constructor() {
        return Ok(pinned);
    }

    let mut max_common = 0;
    let mut ranked: Vec<&ConstructorCandidate> = Vec::new();
    for candidate in schema.constructors() {
        let score = overlap_score(candidate, columns);
        if score > max_common {
            max_common = score;
            ranked.push(candidate);
        }
    }

    ranked
        .iter()
        .rev()
        .find(|candidate| candidate.param_count() <= columns.len())
        .copied()
        .ok_or_else(|| MapError::no_matching_constructor(schema.type_name()))
}

/// Count of parameters whose name matches a column case-insensitively and
/// whose normalized type equals that column's native type.
fn overlap_score(candidate: &ConstructorCandidate, columns: &[ColumnDescriptor]) -> usize {
    candidate
        .params()
        .iter()
        .filter(|param| {
            columns.iter().any(|column| {
                column.name().eq_ignore_ascii_case(param.name)
                    && *column.value_type() == param.value_type.normalized()
            })
        })
        .count()
}
