//! Construction errors.
//!
//! The per-frame math never fails; these only guard the inputs a book is
//! built from.

/// Errors raised while building pages or a book.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TurningError {
    #[error("Invalid page {name}: {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("Page mesh has no vertices")]
    EmptyMesh,
    #[error("Book needs at least {min} leaves, got {count}")]
    TooFewLeaves { min: usize, count: usize },
}
