#![deny(missing_docs)]

//! # Data-Type Definitions
//!
//! The closed set of value shapes a property, argument, return value or array
//! element may take. Instances are interned by the builder and shared as
//! [`DataType`] handles, so two declarations of the same canonical string
//! compare equal with `Arc::ptr_eq`.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Shared handle to an interned definition.
pub type DataType = Arc<DataTypeDefinition>;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `string`
    String,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `float`
    Float,
    /// `boolean`
    Boolean,
}

impl ScalarType {
    /// Recognizes a canonical scalar name.
    pub fn from_definition(definition: &str) -> Option<Self> {
        match definition {
            "string" => Some(Self::String),
            "int32" => Some(Self::Int32),
            "int64" => Some(Self::Int64),
            "float" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// The canonical definition string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

/// A named reference to a type entity.
///
/// The target is a lookup key into the spec's type collection, set once when
/// a type with the same name is registered.
#[derive(Debug)]
pub struct ObjectRef {
    name: String,
    target: OnceLock<String>,
}

impl ObjectRef {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: OnceLock::new(),
        }
    }

    /// The referenced type name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved type key, if a matching type was registered.
    pub fn reference(&self) -> Option<&str> {
        self.target.get().map(String::as_str)
    }

    pub(crate) fn resolve(&self, type_name: &str) {
        let _ = self.target.set(type_name.to_string());
    }
}

/// An array whose elements may be any of the listed definitions.
#[derive(Debug)]
pub struct ArrayType {
    definition: String,
    elements: Vec<DataType>,
}

impl ArrayType {
    pub(crate) fn new(definition: String, elements: Vec<DataType>) -> Self {
        Self {
            definition,
            elements,
        }
    }

    /// Element alternatives (empty when the definition had no element list).
    pub fn elements(&self) -> &[DataType] {
        &self.elements
    }
}

/// A canonical value shape.
#[derive(Debug)]
pub enum DataTypeDefinition {
    /// A primitive.
    Scalar(ScalarType),
    /// A reference to a type entity.
    Object(ObjectRef),
    /// A list of element alternatives.
    Array(ArrayType),
}

impl DataTypeDefinition {
    /// The canonical definition string this instance was interned under.
    pub fn definition(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.as_str(),
            Self::Object(object) => object.name(),
            Self::Array(array) => &array.definition,
        }
    }

    /// Returns the object reference when this is an `Object` definition.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl fmt::Display for DataTypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition())
    }
}
