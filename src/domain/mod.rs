pub mod builder;
pub mod callgraph;
pub mod entry_point;
pub mod error;
pub mod extractor;
pub mod function;
pub mod identity;
pub mod serializer;
pub mod session;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use error::DiscoveryError;
pub use identity::{FunctionIdentity, TypeReference};
pub use session::{discover, discover_program};
