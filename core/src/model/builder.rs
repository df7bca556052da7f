#![deny(missing_docs)]

//! # Spec Builder
//!
//! The mutable side of the entity graph. Each collection sits behind its own
//! `RwLock` so data sources may populate types and methods from separate
//! worker threads. [`SpecBuilder::freeze`] drops the locks and hands out the
//! read-only [`ApiSpec`].

use crate::error::{AppError, AppResult};
use crate::grammar::split_array_elements;
use crate::model::data_type::{
    ArrayType, DataType, DataTypeDefinition, ObjectRef, ScalarType,
};
use crate::model::entities::{require_link, require_non_blank, MethodEntity, TypeEntity};
use crate::model::spec::{ApiSpec, Metadata};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Collects entities while a data source runs.
#[derive(Default)]
pub struct SpecBuilder {
    meta: RwLock<Metadata>,
    types: RwLock<IndexMap<String, TypeEntity>>,
    methods: RwLock<IndexMap<String, MethodEntity>>,
    data_types: RwLock<IndexMap<String, DataType>>,
}

impl SpecBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API version (e.g. `7.1`).
    pub fn set_version(&self, version: &str) -> AppResult<()> {
        require_non_blank("version", version).map_err(AppError::Contract)?;
        write(&self.meta).version = version.to_string();
        Ok(())
    }

    /// Sets the release date as written in the changelog.
    pub fn set_release_date(&self, date: &str) -> AppResult<()> {
        require_non_blank("date", date).map_err(AppError::Contract)?;
        write(&self.meta).release_date = date.to_string();
        Ok(())
    }

    /// Sets the changelog link.
    pub fn set_link(&self, link: &str) -> AppResult<()> {
        require_link("link", link).map_err(AppError::Contract)?;
        write(&self.meta).link = link.to_string();
        Ok(())
    }

    /// The version recorded so far (empty when unset).
    pub fn version(&self) -> String {
        read(&self.meta).version.clone()
    }

    /// Returns the interned definition for `definition`, creating it on first use.
    ///
    /// Array definitions declare their elements recursively. Concurrent
    /// declarations of the same string settle on a single instance.
    pub fn declare_data_type(&self, definition: &str) -> DataType {
        if let Some(existing) = read(&self.data_types).get(definition) {
            return Arc::clone(existing);
        }

        // Built without holding the lock: arrays recurse into this method.
        let created = Arc::new(self.build_definition(definition));

        let mut table = write(&self.data_types);
        Arc::clone(table.entry(definition.to_string()).or_insert(created))
    }

    fn build_definition(&self, definition: &str) -> DataTypeDefinition {
        if definition.starts_with("array") {
            let elements = definition
                .strip_prefix("array<")
                .and_then(|rest| rest.strip_suffix('>'))
                .map(|inner| {
                    split_array_elements(inner)
                        .into_iter()
                        .map(|element| self.declare_data_type(element))
                        .collect()
                })
                .unwrap_or_default();
            return DataTypeDefinition::Array(ArrayType::new(definition.to_string(), elements));
        }

        match ScalarType::from_definition(definition) {
            Some(scalar) => DataTypeDefinition::Scalar(scalar),
            None => DataTypeDefinition::Object(ObjectRef::new(definition)),
        }
    }

    /// Registers a type and resolves the object definition carrying its name.
    pub fn add_type(&self, entity: TypeEntity) -> AppResult<()> {
        require_non_blank("type name", &entity.name).map_err(AppError::Contract)?;

        if let Some(object) = self.declare_data_type(&entity.name).as_object() {
            object.resolve(&entity.name);
        }

        let mut types = write(&self.types);
        if types.contains_key(&entity.name) {
            return Err(AppError::Contract(format!(
                "type '{}' is already registered",
                entity.name
            )));
        }
        tracing::debug!(name = %entity.name, properties = entity.properties.len(), "type registered");
        types.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Whether a type with this name was registered.
    pub fn has_type(&self, name: &str) -> bool {
        read(&self.types).contains_key(name)
    }

    /// Runs `f` against a registered type.
    pub fn update_type<R>(&self, name: &str, f: impl FnOnce(&mut TypeEntity) -> R) -> Option<R> {
        write(&self.types).get_mut(name).map(f)
    }

    /// Links `child` under `parent`. Both must already be registered.
    pub fn link_child(&self, parent: &str, child: &str) -> AppResult<()> {
        let mut types = write(&self.types);
        if !types.contains_key(parent) || !types.contains_key(child) {
            return Err(AppError::Contract(format!(
                "cannot link '{}' under '{}': both types must be registered",
                child, parent
            )));
        }

        if let Some(entity) = types.get_mut(child) {
            entity.parent = Some(parent.to_string());
        }
        if let Some(entity) = types.get_mut(parent) {
            if !entity.children.iter().any(|c| c == child) {
                entity.children.push(child.to_string());
            }
        }
        Ok(())
    }

    /// Registers a method.
    pub fn add_method(&self, entity: MethodEntity) -> AppResult<()> {
        require_non_blank("method name", &entity.name).map_err(AppError::Contract)?;

        let mut methods = write(&self.methods);
        if methods.contains_key(&entity.name) {
            return Err(AppError::Contract(format!(
                "method '{}' is already registered",
                entity.name
            )));
        }
        tracing::debug!(name = %entity.name, arguments = entity.arguments.len(), "method registered");
        methods.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Whether a method with this name was registered.
    pub fn has_method(&self, name: &str) -> bool {
        read(&self.methods).contains_key(name)
    }

    /// Consumes the builder, producing the read-only spec.
    pub fn freeze(self) -> ApiSpec {
        ApiSpec::new(
            into_inner(self.meta),
            into_inner(self.types),
            into_inner(self.methods),
            into_inner(self.data_types),
        )
    }
}

// A panic while holding one of these locks leaves plain data behind, so poisoned
// guards are still usable.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn into_inner<T>(lock: RwLock<T>) -> T {
    lock.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
}
