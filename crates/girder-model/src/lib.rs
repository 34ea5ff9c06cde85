//! Core data structures for the Girder semantic model.
//!
//! The model is built in two stages:
//! - **Build stage** (`ModelBuilder`): mutable maps populated by a frontend
//!   while it walks parsed source trees.
//! - **Frozen stage** (`SourceModel`): immutable, fully indexed; everything
//!   downstream (graphs, rules) reads from this and never mutates it.

pub mod entity;
pub mod location;
pub mod model;
pub mod names;
pub mod relationship;

mod invariants;


pub use entity::{
    AnnotationRef, FieldEntity, MethodEntity, Modifier, Parameter, TypeEntity, TypeKind, TypeRef,
};
pub use location::Location;
pub use model::{ModelBuilder, SourceModel};
pub use relationship::{CallArgument, CallEdge, CallKind, Relationship, RelationshipKind};

/// Annotation simple names that mark a type as a container-managed component.
///
/// A type carrying one of these is flagged `is_component`; its methods
/// inherit the flag when the model is frozen.
pub const STEREOTYPE_ANNOTATIONS: &[&str] = &[
    "Service",
    "Component",
    "Repository",
    "Controller",
    "RestController",
    "Configuration",
];
