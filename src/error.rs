use thiserror::Error;

use crate::enums::ViewType;

#[derive(Debug, Error, PartialEq)]
pub enum ResliceCursorError {
    #[error("View {0} does not show a reslice cursor plane")]
    InvalidView(ViewType),

    #[error("Unknown view index {0}")]
    UnknownViewIndex(usize),

    #[error("Slab must contain at least one slice, got {0}")]
    InvalidSlabSlices(usize),

    #[error("Image has no voxels")]
    EmptyImage,

    #[error("Spacing must be finite and positive, got ({0}, {1}, {2})")]
    InvalidSpacing(f64, f64, f64),
}
