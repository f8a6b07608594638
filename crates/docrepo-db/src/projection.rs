//! Projection expansion from `QueryOptions` column lists.
//!
//! Included columns map to `1`, skipped columns to `0`. The two lists are
//! merged without validation: a column named in both ends up excluded, and
//! mixing unrelated includes and excludes is left for the server to reject.

use mongodb::bson::Document;

use crate::options::QueryOptions;

/// Build the projection document for `options`, or `None` when neither list
/// names a column.
#[must_use]
pub fn expand_projection(options: &QueryOptions<'_>) -> Option<Document> {
    expand_columns(options.project_columns.as_slice(), options.skip_columns.as_slice())
}

pub(crate) fn expand_columns<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Option<Document> {
    if include.is_empty() && exclude.is_empty() {
        return None;
    }

    let mut projection = Document::new();
    for column in include {
        projection.insert(column.as_ref(), 1_i32);
    }
    for column in exclude {
        projection.insert(column.as_ref(), 0_i32);
    }
    Some(projection)
}
