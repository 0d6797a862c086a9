//! STL codec: binary and ASCII parsing into a [`Mesh`](mesh_types::Mesh),
//! binary and ASCII serialization with recomputed facet normals.

pub mod errors;
pub mod load;
pub mod save;

pub use errors::StlError;
pub use load::{parse_stl, StlEncoding};
pub use save::{to_ascii_stl, to_binary_stl};

/// Binary header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of one binary triangle record: normal, 3 vertices, attribute.
pub const TRIANGLE_SIZE: usize = 50;
