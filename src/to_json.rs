//! # JSON Export
//!
//! Flat, name-keyed JSON view of a checked [`ApiSpec`]. The same structures
//! are read back by [`crate::from_json`].

use crate::output::{to_pretty_json, write_all, Target};
use botapi_core::{ApiSpec, AppResult, DataType, MethodEntity, TypeEntity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonData {
    pub version: String,
    pub release_date: String,
    pub link: String,
    pub types: BTreeMap<String, JsonType>,
    pub methods: BTreeMap<String, JsonMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonType {
    pub category: String,
    pub name: String,
    pub link: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<JsonProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonProperty {
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub optional: bool,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub predefined_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonMethod {
    pub category: String,
    pub name: String,
    pub link: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<JsonArgument>,
    pub returns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub types: Vec<String>,
}

impl JsonData {
    /// Builds the export view. Fails when the spec does not pass its self check.
    pub fn from_spec(spec: &ApiSpec) -> AppResult<Self> {
        spec.self_check()?;

        Ok(Self {
            version: spec.version().to_string(),
            release_date: spec.release_date().to_string(),
            link: spec.link().to_string(),
            types: spec.types().map(|t| (t.name.clone(), json_type(t))).collect(),
            methods: spec.methods().map(|m| (m.name.clone(), json_method(m))).collect(),
        })
    }
}

fn definitions(data_types: &[DataType]) -> Vec<String> {
    let mut defs: Vec<String> = data_types
        .iter()
        .map(|dt| dt.definition().to_string())
        .collect();
    defs.sort();
    defs
}

fn json_type(entity: &TypeEntity) -> JsonType {
    let mut children = entity.children.clone();
    children.sort();

    let mut properties: Vec<JsonProperty> = entity
        .properties
        .iter()
        .map(|p| JsonProperty {
            name: p.name.clone(),
            description: p.description.clone(),
            types: definitions(&p.data_types),
            optional: p.optional,
            predefined_value: p.predefined_value.clone(),
        })
        .collect();
    properties.sort_by(|a, b| a.name.cmp(&b.name));

    JsonType {
        category: entity.category.clone(),
        name: entity.name.clone(),
        link: entity.link.clone(),
        description: entity.description.clone(),
        parent: entity.parent.clone(),
        children,
        properties,
    }
}

fn json_method(entity: &MethodEntity) -> JsonMethod {
    let mut arguments: Vec<JsonArgument> = entity
        .arguments
        .iter()
        .map(|a| JsonArgument {
            name: a.name.clone(),
            description: a.description.clone(),
            required: a.required,
            types: definitions(&a.data_types),
        })
        .collect();
    arguments.sort_by(|a, b| a.name.cmp(&b.name));

    JsonMethod {
        category: entity.category.clone(),
        name: entity.name.clone(),
        link: entity.link.clone(),
        description: entity.description.clone(),
        arguments,
        returns: definitions(&entity.returns),
    }
}

/// Writes `spec.json` and `spec.min.json` under `target` (or exactly
/// `target` when it names a `*.json` file).
pub fn export(spec: &ApiSpec, target: &Path) -> AppResult<Vec<PathBuf>> {
    let data = JsonData::from_spec(spec)?;

    let files = match Target::resolve(target, "spec") {
        Target::Exact(path) => vec![(path, to_pretty_json(&data)?)],
        Target::Family(base) => vec![
            (Target::with_suffix(&base, ".json"), to_pretty_json(&data)?),
            (Target::with_suffix(&base, ".min.json"), serde_json::to_vec(&data)?),
        ],
    };

    tracing::info!(types = data.types.len(), methods = data.methods.len(), "json export");
    write_all(files)
}
