//! Structured serialization of named arrays.
//!
//! Round-trips a one-level-nested mapping of named numeric arrays through an
//! Ogawa archive. Plain entries become root-level array nodes; group entries
//! become root-level groups holding one array node per member. The
//! serializer knows nothing about the container that uses it.

mod header;
mod payload;
mod read;
mod write;

pub use header::{NodeHeader, NodeKind};
pub use payload::{decode_payload, encode_array};
pub use read::{GroupEntry, Hierarchy};
pub use write::{write_nodes, NodeRef};
