#![deny(missing_docs)]

//! # Entities
//!
//! Types and methods of the API surface together with their properties and
//! arguments. Parent and child relations between types are stored as names;
//! the spec's type collection owns the canonical entities.

use crate::error::{AppError, AppResult, CompositeError};
use crate::model::data_type::DataType;
use url::Url;

/// An object schema of the API (e.g. `Message`).
#[derive(Debug, Clone)]
pub struct TypeEntity {
    /// Documentation section the type was found in.
    pub category: String,
    /// Type name.
    pub name: String,
    /// Absolute link to the type's documentation anchor.
    pub link: String,
    /// Markdown-ish description.
    pub description: String,
    /// Name of the parent type, when this type is one of its subtypes.
    pub parent: Option<String>,
    /// Names of subtypes, in listing order.
    pub children: Vec<String>,
    /// Fields of the object, in table order.
    pub properties: Vec<Property>,
}

impl TypeEntity {
    /// Creates a type, validating its identity.
    pub fn new(category: &str, name: &str, link: &str) -> AppResult<Self> {
        validate_identity(category, name, link)?;
        Ok(Self {
            category: category.to_string(),
            name: name.to_string(),
            link: link.to_string(),
            description: String::new(),
            parent: None,
            children: Vec::new(),
            properties: Vec::new(),
        })
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A single field of a [`TypeEntity`].
#[derive(Debug, Clone)]
pub struct Property {
    /// Field name.
    pub name: String,
    /// Field description.
    pub description: String,
    /// Admissible definitions; more than one means "one of".
    pub data_types: Vec<DataType>,
    /// Whether the field may be absent.
    pub optional: bool,
    /// Fixed value the field must hold (used as a discriminator).
    pub predefined_value: Option<String>,
}

impl Property {
    /// Creates a property with a non-blank name.
    pub fn new(name: &str) -> AppResult<Self> {
        require_non_blank("name", name).map_err(AppError::Contract)?;
        Ok(Self {
            name: name.to_string(),
            description: String::new(),
            data_types: Vec::new(),
            optional: false,
            predefined_value: None,
        })
    }
}

/// A callable operation of the API (e.g. `sendMessage`).
#[derive(Debug, Clone)]
pub struct MethodEntity {
    /// Documentation section the method was found in.
    pub category: String,
    /// Method name.
    pub name: String,
    /// Absolute link to the method's documentation anchor.
    pub link: String,
    /// Markdown-ish description.
    pub description: String,
    /// Parameters, in table order.
    pub arguments: Vec<Argument>,
    /// Admissible result definitions.
    pub returns: Vec<DataType>,
}

impl MethodEntity {
    /// Creates a method, validating its identity.
    pub fn new(category: &str, name: &str, link: &str) -> AppResult<Self> {
        validate_identity(category, name, link)?;
        Ok(Self {
            category: category.to_string(),
            name: name.to_string(),
            link: link.to_string(),
            description: String::new(),
            arguments: Vec::new(),
            returns: Vec::new(),
        })
    }

    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// A single parameter of a [`MethodEntity`].
#[derive(Debug, Clone)]
pub struct Argument {
    /// Parameter name.
    pub name: String,
    /// Parameter description.
    pub description: String,
    /// Whether the caller must supply it.
    pub required: bool,
    /// Admissible definitions.
    pub data_types: Vec<DataType>,
}

impl Argument {
    /// Creates a required argument with a non-blank name.
    pub fn new(name: &str) -> AppResult<Self> {
        require_non_blank("name", name).map_err(AppError::Contract)?;
        Ok(Self {
            name: name.to_string(),
            description: String::new(),
            required: true,
            data_types: Vec::new(),
        })
    }
}

fn validate_identity(category: &str, name: &str, link: &str) -> AppResult<()> {
    let problems: Vec<String> = [
        require_non_blank("category", category),
        require_non_blank("name", name),
        require_link("link", link),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    match CompositeError::from_problems(problems) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_link(field: &str, link: &str) -> Result<(), String> {
    Url::parse(link)
        .map(|_| ())
        .map_err(|_| format!("{} is invalid URI for request", field))
}
