//! Generate Rust data models from GraphQL introspection documents.
//!
//! Pipeline: raw introspection JSON → [`schema::SchemaDocument`] →
//! [`order::build_order`] → [`codegen::generate_types`]. Independently, at
//! run time, [`codec`] round-trips instance graphs of the generated types
//! through JSON while preserving the concrete type behind interface/union
//! positions via a `__typename` discriminator.
//!
//! Design goals:
//! - One synchronous pass; failures are immediate and leave no partial state.
//! - Deterministic output: identical inputs produce byte-identical text.
//! - The document, once built, is immutable and freely shareable.

pub mod cli;
pub mod codec;
pub mod codegen;
pub mod introspection;
pub mod order;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

pub use codec::{CodecError, Instance, ObjectInstance, deserialize, serialize};
pub use codegen::generate_types;
pub use introspection::load;
pub use schema::{
    DISCRIMINATOR, FieldDefinition, ScalarMapping, SchemaDocument, SchemaError, TypeDefinition,
    TypeKind, TypeRef,
};
