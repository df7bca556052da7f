#![deny(missing_docs)]

//! # API Spec
//!
//! The frozen entity graph handed to the consistency checker and exporters.

use crate::error::AppResult;
use crate::model::builder::SpecBuilder;
use crate::model::data_type::DataType;
use crate::model::entities::{MethodEntity, TypeEntity};
use crate::model::DataSource;
use indexmap::IndexMap;

/// Top-level facts about the documented release.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Release version, e.g. `7.1`.
    pub version: String,
    /// Release date as printed in the changelog.
    pub release_date: String,
    /// Link to the changelog entry.
    pub link: String,
}

/// Read-only API description.
#[derive(Debug)]
pub struct ApiSpec {
    meta: Metadata,
    types: IndexMap<String, TypeEntity>,
    methods: IndexMap<String, MethodEntity>,
    data_types: IndexMap<String, DataType>,
}

impl ApiSpec {
    pub(crate) fn new(
        meta: Metadata,
        types: IndexMap<String, TypeEntity>,
        methods: IndexMap<String, MethodEntity>,
        data_types: IndexMap<String, DataType>,
    ) -> Self {
        Self {
            meta,
            types,
            methods,
            data_types,
        }
    }

    /// Builds a spec by letting `source` populate a fresh builder.
    pub fn from_source(source: &impl DataSource) -> AppResult<Self> {
        let builder = SpecBuilder::new();
        source.fill(&builder)?;
        let spec = builder.freeze();
        tracing::info!(
            version = %spec.version(),
            types = spec.types.len(),
            methods = spec.methods.len(),
            "spec created"
        );
        Ok(spec)
    }

    /// Release version.
    pub fn version(&self) -> &str {
        &self.meta.version
    }

    /// Release date.
    pub fn release_date(&self) -> &str {
        &self.meta.release_date
    }

    /// Changelog link.
    pub fn link(&self) -> &str {
        &self.meta.link
    }

    /// All types, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeEntity> {
        self.types.values()
    }

    /// Looks up a type by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeEntity> {
        self.types.get(name)
    }

    /// All methods, in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodEntity> {
        self.methods.values()
    }

    /// Looks up a method by name.
    pub fn get_method(&self, name: &str) -> Option<&MethodEntity> {
        self.methods.get(name)
    }

    /// Every interned definition.
    pub fn data_type_definitions(&self) -> impl Iterator<Item = &DataType> {
        self.data_types.values()
    }

    /// Looks up an interned definition by canonical string.
    pub fn get_data_type(&self, definition: &str) -> Option<&DataType> {
        self.data_types.get(definition)
    }
}
