//! Content catalog for the flip engine.
//!
//! Content nodes and the schemas (document types) that govern them.

mod node;
mod schema;

pub use node::{ContentNode, NodeId};
pub use schema::Schema;
