//! Source sets and the rule that maps a source file to its place on storage.

mod path_mapper;
mod source_sets;

pub use path_mapper::PathMapper;
pub use source_sets::{DestinationRoots, SourceSets};
