use thiserror::Error;

/// Failures that abort a batch or construction.
///
/// Transient tree-state issues (an unresolvable path) are never errors:
/// the engine skips those and keeps going. Errors here indicate either a
/// producer/consumer protocol mismatch or unusable initial markup.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("replica markup could not be parsed: {0}")]
    Parse(#[from] dom::ParseError),

    #[error("mutation record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("added node at `{path}` has an unsupported kind")]
    UnsupportedNodeKind { path: String },
}
