//! Small ndarray-like types used to shape model inputs.
//!
//! `Array2` holds samples row-major (one request becomes a 1xN matrix);
//! `Array1` holds weight vectors.
pub mod matrix;
pub mod vector;

pub use matrix::{Array2, ShapeError};
pub use vector::Array1;
