//! # botapi-spec
//!
//! Exporters and the JSON data source built on top of `botapi-core`:
//! - [`to_json`]: flat JSON export (`spec.json`, `spec.min.json`),
//! - [`from_json`]: bulk import of that export,
//! - [`to_openapi`]: OpenAPI document (`openapi.json`, `.min.json`, `.yaml`).

pub mod from_json;
pub mod output;
pub mod to_json;
pub mod to_openapi;

pub use from_json::JsonSource;
pub use to_json::JsonData;
