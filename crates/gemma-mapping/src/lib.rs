//! # gemma-mapping
//!
//! Schema-driven re-shaping of JSON and XML documents.
//!
//! A compiled [`gemma_schema::Schema`] names, for every output field, a dotted
//! source path, a target type and an optional default. The runtime resolves
//! each path in the response document, coerces the value, and reassembles the
//! results into a nested output document. Lookups that find nothing degrade
//! to "absent" instead of failing, so mapping itself cannot error.

pub mod assemble;
pub mod resolver;
pub mod runtime;
pub mod transforms;

pub use assemble::assemble;
pub use resolver::resolve;
pub use runtime::{
    Entry, MappingOutput, MappingRuntime, MappingStats, evaluate, flatten, map_document,
};
pub use transforms::coerce;
