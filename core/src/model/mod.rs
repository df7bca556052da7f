//! # Spec Model
//!
//! Entity graph of the documented API: types, methods and the interning table
//! of data-type definitions they point at.

pub mod builder;
pub mod data_type;
pub mod entities;
pub mod spec;

pub use builder::SpecBuilder;
pub use data_type::{ArrayType, DataType, DataTypeDefinition, ObjectRef, ScalarType};
pub use entities::{Argument, MethodEntity, Property, TypeEntity};
pub use spec::{ApiSpec, Metadata};

use crate::error::AppResult;

/// Anything able to populate a [`SpecBuilder`] (scraped document, JSON export).
pub trait DataSource {
    /// Fills the builder. Any error aborts the whole build.
    fn fill(&self, builder: &SpecBuilder) -> AppResult<()>;
}
