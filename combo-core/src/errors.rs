use crate::catalog::ItemKind;
use thiserror::Error;

/// Result type alias for combo-core operations
pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum ComboError {
    /// The cart (or a preset) references an id the catalog does not know.
    /// This is a data-integrity failure: the affected computation stops, the
    /// application does not.
    #[error("unknown {kind} id: {id}")]
    UnknownItem { kind: ItemKind, id: String },
}
