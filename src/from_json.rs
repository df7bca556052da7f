//! # JSON Source
//!
//! Rebuilds a spec from a previous JSON export. Types and methods are
//! imported on two scoped threads sharing the builder.

use crate::to_json::{JsonData, JsonMethod, JsonType};
use botapi_core::{
    AppError, AppResult, Argument, CompositeError, DataSource, MethodEntity, Property,
    SpecBuilder, TypeEntity, UnresolvedTypes,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::thread;

/// A parsed JSON export.
#[derive(Debug, Clone)]
pub struct JsonSource {
    data: JsonData,
}

impl JsonSource {
    /// Wraps already parsed export data.
    pub fn new(data: JsonData) -> Self {
        Self { data }
    }

    /// Reads and parses an export file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses export data from a JSON string.
    pub fn from_json(content: &str) -> AppResult<Self> {
        Ok(Self::new(serde_json::from_str(content)?))
    }
}

impl DataSource for JsonSource {
    fn fill(&self, builder: &SpecBuilder) -> AppResult<()> {
        let data = &self.data;
        if !data.version.is_empty() {
            builder.set_version(&data.version)?;
        }
        if !data.release_date.is_empty() {
            builder.set_release_date(&data.release_date)?;
        }
        if !data.link.is_empty() {
            builder.set_link(&data.link)?;
        }

        let (types, methods) = thread::scope(|s| {
            let types = s.spawn(|| import_types(builder, &data.types));
            let methods = s.spawn(|| import_methods(builder, &data.methods));
            (join(types.join()), join(methods.join()))
        });

        let mut errors: Vec<AppError> = [types, methods].into_iter().filter_map(Result::err).collect();
        match errors.len() {
            0 => check_relations(builder, &data.types),
            1 => Err(errors.remove(0)),
            _ => Err(CompositeError {
                problems: errors.iter().map(ToString::to_string).collect(),
            }
            .into()),
        }
    }
}

fn join(result: thread::Result<AppResult<()>>) -> AppResult<()> {
    result.unwrap_or_else(|_| Err(AppError::General("import worker panicked".to_string())))
}

fn import_types(builder: &SpecBuilder, types: &BTreeMap<String, JsonType>) -> AppResult<()> {
    for t in types.values() {
        let mut entity = TypeEntity::new(&t.category, &t.name, &t.link)?;
        entity.description = t.description.clone();
        entity.parent = t.parent.clone();
        entity.children = t.children.clone();

        for p in &t.properties {
            let mut property = Property::new(&p.name)?;
            property.description = p.description.clone();
            property.optional = p.optional;
            property.predefined_value = p.predefined_value.clone();
            property.data_types = p.types.iter().map(|dt| builder.declare_data_type(dt)).collect();
            entity.properties.push(property);
        }

        builder.add_type(entity)?;
    }
    Ok(())
}

fn import_methods(builder: &SpecBuilder, methods: &BTreeMap<String, JsonMethod>) -> AppResult<()> {
    for m in methods.values() {
        let mut entity = MethodEntity::new(&m.category, &m.name, &m.link)?;
        entity.description = m.description.clone();
        entity.returns = m.returns.iter().map(|dt| builder.declare_data_type(dt)).collect();

        for a in &m.arguments {
            let mut argument = Argument::new(&a.name)?;
            argument.description = a.description.clone();
            argument.required = a.required;
            argument.data_types = a.types.iter().map(|dt| builder.declare_data_type(dt)).collect();
            entity.arguments.push(argument);
        }

        builder.add_method(entity)?;
    }
    Ok(())
}

// Relations are copied by name, so every name must exist once all types are in.
fn check_relations(builder: &SpecBuilder, types: &BTreeMap<String, JsonType>) -> AppResult<()> {
    let mut missing: Vec<String> = types
        .values()
        .flat_map(|t| t.parent.iter().chain(t.children.iter()))
        .filter(|name| !builder.has_type(name))
        .cloned()
        .collect();
    missing.sort();
    missing.dedup();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Unresolved(UnresolvedTypes(missing)))
    }
}
