#![deny(missing_docs)]

//! # Bot API Core
//!
//! Extraction engine for the Telegram Bot API reference: turns the reference
//! page into a checked, cross-linked model of types and methods.

/// Shared error types.
pub mod error;

/// Type-definition grammar ("Array of A or B" -> canonical strings).
pub mod grammar;

/// Entity graph, builder and data sources.
pub mod model;

/// Consistency checks over the frozen graph.
pub mod check;

/// Block-level document representation.
pub mod document;

/// HTML to block adapter.
pub mod html;

/// Source locations and section names.
pub mod config;

/// Description assembly and link resolution.
pub mod text;

/// Event stream over document blocks.
pub mod walker;

/// Deferred parent/child linking.
pub mod resolver;

/// Reference document as a data source.
pub mod source;

pub use config::SourceConfig;
pub use document::{Anchor, Block, HeadingLevel, Inline, RichText};
pub use error::{AppError, AppResult, CompositeError, UnresolvedTypes};
pub use model::{
    ApiSpec, Argument, ArrayType, DataSource, DataType, DataTypeDefinition, Metadata,
    MethodEntity, ObjectRef, Property, ScalarType, SpecBuilder, TypeEntity,
};
pub use resolver::PendingLinks;
pub use source::DocumentSource;
pub use walker::{Event, VersionRecord, Walker};
