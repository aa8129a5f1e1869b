use thiserror::Error;

/// Fatal errors raised by the geometry core.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The triangulation sweep reached a state that a simple polygon with
    /// consistent winding can never produce.
    #[error("triangulation invariant violated in polygon {polygon_id}: {detail}")]
    InvariantViolation { polygon_id: u64, detail: String },
}

/// Errors raised while loading source features.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("source document has no usable area bounds")]
    EmptyBounds,
    #[error("source document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
