//! Core triangle-soup data model shared by the STL codec, the property
//! engine and the session store.

pub mod error;
pub mod mesh;
pub mod transform;
pub mod triangle;

pub use error::*;
pub use mesh::*;
pub use transform::*;
pub use triangle::*;
