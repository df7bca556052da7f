//! # OpenAPI Export
//!
//! Describes the Bot API as an OpenAPI document: one schema per type, one
//! path per method, results wrapped in the `{ok, result}` envelope.

use crate::output::{to_pretty_json, write_all, Target};
use botapi_core::{
    ApiSpec, AppError, AppResult, Argument, DataType, DataTypeDefinition, MethodEntity,
    ScalarType, TypeEntity,
};
use indexmap::IndexMap;
use openapiv3::{
    AdditionalProperties, ArrayType, BooleanType, Components, Contact, Discriminator,
    ExternalDocumentation, Info, IntegerFormat, IntegerType, License, MediaType, NumberFormat,
    NumberType, ObjectType, OpenAPI, Operation, PathItem, Paths, ReferenceOr, RequestBody,
    Response, Responses, Schema, SchemaData, SchemaKind, Server, ServerVariable, StatusCode,
    StringFormat, StringType, Type, VariantOrUnknownOrEmpty,
};
use serde_json::json;
use std::path::{Path, PathBuf};

const OPENAPI_VERSION: &str = "3.0.3";
const INPUT_FILE: &str = "InputFile";
const RESPONSE_PARAMETERS: &str = "ResponseParameters";
const ERROR_RESPONSE: &str = "error";
const JSON_MEDIA: &str = "application/json";
const MULTIPART_MEDIA: &str = "multipart/form-data";
const SAMPLE_TOKEN: &str = "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11";
const DOCS_URL: &str = "https://core.telegram.org/bots/api";

/// Builds the OpenAPI document. Fails when the spec does not pass its self check.
pub fn build(spec: &ApiSpec) -> AppResult<OpenAPI> {
    spec.self_check()?;

    let mut responses = IndexMap::new();
    responses.insert(ERROR_RESPONSE.to_string(), ReferenceOr::Item(error_response(spec)));

    Ok(OpenAPI {
        openapi: OPENAPI_VERSION.to_string(),
        info: info(spec),
        servers: servers(),
        paths: Paths {
            paths: spec
                .methods()
                .map(|m| (format!("/{}", m.name), ReferenceOr::Item(path_item(m))))
                .collect(),
            ..Default::default()
        },
        components: Some(Components {
            schemas: spec
                .types()
                .map(|t| (t.name.clone(), ReferenceOr::Item(type_schema(spec, t))))
                .collect(),
            responses,
            ..Default::default()
        }),
        security: Some(vec![IndexMap::new()]),
        external_docs: Some(docs("Telegram Bot API official page", DOCS_URL)),
        ..Default::default()
    })
}

/// Writes `openapi.json`, `openapi.min.json` and `openapi.yaml` under
/// `target` (or exactly `target` when it names a `*.json` file).
pub fn export(spec: &ApiSpec, target: &Path) -> AppResult<Vec<PathBuf>> {
    let document = build(spec)?;

    let files = match Target::resolve(target, "openapi") {
        Target::Exact(path) => vec![(path, to_pretty_json(&document)?)],
        Target::Family(base) => {
            let yaml = serde_yaml::to_string(&document)
                .map_err(|e| AppError::General(format!("yaml serialization failed: {}", e)))?;
            vec![
                (Target::with_suffix(&base, ".json"), to_pretty_json(&document)?),
                (Target::with_suffix(&base, ".min.json"), serde_json::to_vec(&document)?),
                (Target::with_suffix(&base, ".yaml"), yaml.into_bytes()),
            ]
        }
    };

    tracing::info!(paths = document.paths.paths.len(), "openapi export");
    write_all(files)
}

fn info(spec: &ApiSpec) -> Info {
    let description = format!(
        "This is a copy of the official [Telegram Bot API docs]({docs}) page converted to OpenAPI spec.\n\n\
         Methods without arguments are described as `GET` requests. Methods accepting `InputFile` are \
         described as `POST` with `multipart/form-data` and `application/json` bodies, all others as \
         `POST` with `application/json`.\n\n\
         - Release date: {date}\n\
         - Changelog: [{link}]({link})",
        docs = DOCS_URL,
        date = spec.release_date(),
        link = spec.link(),
    );

    Info {
        title: "Telegram Bot API".to_string(),
        description: Some(description),
        version: spec.version().to_string(),
        contact: Some(Contact {
            name: Some("Generated with botapi-spec".to_string()),
            ..Default::default()
        }),
        license: Some(License {
            name: "Apache-2.0 OR MIT".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn docs(description: &str, url: &str) -> ExternalDocumentation {
    ExternalDocumentation {
        description: Some(description.to_string()),
        url: url.to_string(),
        ..Default::default()
    }
}

fn variable(default: &str, enumeration: &[&str]) -> ServerVariable {
    ServerVariable {
        default: default.to_string(),
        enumeration: enumeration.iter().map(|v| v.to_string()).collect(),
        ..Default::default()
    }
}

fn servers() -> Vec<Server> {
    let official = IndexMap::from([("token".to_string(), variable(SAMPLE_TOKEN, &[]))]);
    let local = IndexMap::from([
        ("protocol".to_string(), variable("http", &["http", "https"])),
        ("host".to_string(), variable("localhost:8081", &[])),
        ("token".to_string(), variable(SAMPLE_TOKEN, &[])),
    ]);

    vec![
        Server {
            url: "https://api.telegram.org/bot{token}".to_string(),
            description: Some("Bot API Server".to_string()),
            variables: Some(official),
            ..Default::default()
        },
        Server {
            url: "{protocol}://{host}/bot{token}".to_string(),
            description: Some("Local Bot API Server".to_string()),
            variables: Some(local),
            ..Default::default()
        },
    ]
}

fn schema_ref(name: &str) -> ReferenceOr<Schema> {
    ReferenceOr::Reference {
        reference: format!("#/components/schemas/{}", name),
    }
}

fn schema(schema_kind: SchemaKind) -> Schema {
    Schema {
        schema_data: SchemaData::default(),
        schema_kind,
    }
}

fn scalar_schema(scalar: ScalarType) -> Schema {
    let kind = match scalar {
        ScalarType::String => Type::String(StringType::default()),
        ScalarType::Boolean => Type::Boolean(BooleanType::default()),
        ScalarType::Float => Type::Number(NumberType {
            format: VariantOrUnknownOrEmpty::Item(NumberFormat::Float),
            ..Default::default()
        }),
        ScalarType::Int32 => Type::Integer(IntegerType {
            format: VariantOrUnknownOrEmpty::Item(IntegerFormat::Int32),
            ..Default::default()
        }),
        ScalarType::Int64 => Type::Integer(IntegerType {
            format: VariantOrUnknownOrEmpty::Item(IntegerFormat::Int64),
            ..Default::default()
        }),
    };
    schema(SchemaKind::Type(kind))
}

/// Schema of a single definition.
fn data_type_schema(data_type: &DataType) -> ReferenceOr<Schema> {
    match data_type.as_ref() {
        DataTypeDefinition::Scalar(scalar) => ReferenceOr::Item(scalar_schema(*scalar)),
        DataTypeDefinition::Object(object) => schema_ref(object.reference().unwrap_or(object.name())),
        DataTypeDefinition::Array(array) => {
            let items = match array.elements() {
                [] => None,
                [single] => Some(boxed(data_type_schema(single))),
                many => Some(ReferenceOr::boxed_item(one_of(many))),
            };
            ReferenceOr::Item(schema(SchemaKind::Type(Type::Array(ArrayType {
                items,
                min_items: None,
                max_items: None,
                unique_items: false,
            }))))
        }
    }
}

fn boxed(schema: ReferenceOr<Schema>) -> ReferenceOr<Box<Schema>> {
    match schema {
        ReferenceOr::Item(item) => ReferenceOr::Item(Box::new(item)),
        ReferenceOr::Reference { reference } => ReferenceOr::Reference { reference },
    }
}

fn one_of(data_types: &[DataType]) -> Schema {
    schema(SchemaKind::OneOf {
        one_of: data_types.iter().map(data_type_schema).collect(),
    })
}

/// Single type as is, several as `oneOf`; the description is attached on top.
///
/// A described reference is wrapped in `allOf`, since `$ref` siblings are ignored.
fn value_schema(data_types: &[DataType], description: &str) -> ReferenceOr<Schema> {
    let mut described = match data_types {
        [single] => match data_type_schema(single) {
            ReferenceOr::Item(item) => item,
            reference if description.is_empty() => return reference,
            reference => schema(SchemaKind::AllOf {
                all_of: vec![reference],
            }),
        },
        many => one_of(many),
    };

    if !description.is_empty() {
        described.schema_data.description = Some(description.to_string());
    }
    ReferenceOr::Item(described)
}

fn type_schema(spec: &ApiSpec, entity: &TypeEntity) -> Schema {
    let schema_data = SchemaData {
        description: Some(entity.description.clone()),
        external_docs: Some(docs("See official spec", &entity.link)),
        ..Default::default()
    };

    if entity.name == INPUT_FILE {
        return Schema {
            schema_data,
            schema_kind: SchemaKind::Type(Type::String(StringType {
                format: VariantOrUnknownOrEmpty::Item(StringFormat::Binary),
                ..Default::default()
            })),
        };
    }

    if !entity.children.is_empty() {
        return Schema {
            schema_data: SchemaData {
                discriminator: discriminator(spec, &entity.children),
                ..schema_data
            },
            schema_kind: SchemaKind::OneOf {
                one_of: entity.children.iter().map(|c| schema_ref(c)).collect(),
            },
        };
    }

    let mut object = ObjectType {
        additional_properties: Some(AdditionalProperties::Any(false)),
        ..Default::default()
    };
    for p in &entity.properties {
        if !p.optional {
            object.required.push(p.name.clone());
        }

        let mut property = value_schema(&p.data_types, &p.description);
        if let (ReferenceOr::Item(item), Some(value)) = (&mut property, &p.predefined_value) {
            item.schema_data.default = Some(json!(value));
        }
        object.properties.insert(p.name.clone(), boxed(property));
    }

    Schema {
        schema_data,
        schema_kind: SchemaKind::Type(Type::Object(object)),
    }
}

/// Present when every child has a fixed-value property and they all share its name.
fn discriminator(spec: &ApiSpec, children: &[String]) -> Option<Discriminator> {
    let mut property_name: Option<&str> = None;
    let mut mapping = IndexMap::new();

    for child in children {
        let (name, value) = spec.get_type(child)?.properties.iter().find_map(|p| {
            p.predefined_value
                .as_deref()
                .map(|value| (p.name.as_str(), value))
        })?;

        if property_name.is_some_and(|known| known != name) {
            return None;
        }
        property_name = Some(name);
        mapping.insert(value.to_string(), format!("#/components/schemas/{}", child));
    }

    Some(Discriminator {
        property_name: property_name?.to_string(),
        mapping,
        extensions: IndexMap::new(),
    })
}

fn path_item(method: &MethodEntity) -> PathItem {
    let mut operation = Operation {
        tags: vec![method.category.replace('-', " ")],
        summary: Some(format!("Describes `{}` method", method.name)),
        description: Some(method.description.clone()),
        operation_id: Some(method.name.clone()),
        external_docs: Some(docs("See official spec", &method.link)),
        responses: responses(method),
        ..Default::default()
    };

    if method.arguments.is_empty() {
        return PathItem {
            get: Some(operation),
            ..Default::default()
        };
    }

    operation.request_body = Some(ReferenceOr::Item(RequestBody {
        content: request_content(&method.arguments),
        ..Default::default()
    }));
    PathItem {
        post: Some(operation),
        ..Default::default()
    }
}

fn accepts_input_file(argument: &Argument) -> bool {
    argument
        .data_types
        .iter()
        .any(|dt| dt.definition() == INPUT_FILE)
}

fn is_sole_input_file(argument: &Argument) -> bool {
    argument.required
        && argument.data_types.len() == 1
        && argument.data_types[0].definition() == INPUT_FILE
}

fn request_content(arguments: &[Argument]) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();

    if arguments.iter().any(is_sole_input_file) {
        content.insert(MULTIPART_MEDIA.to_string(), media(arguments_schema(arguments, false)));
    } else if arguments.iter().any(accepts_input_file) {
        content.insert(JSON_MEDIA.to_string(), media(arguments_schema(arguments, true)));
        content.insert(MULTIPART_MEDIA.to_string(), media(multipart_schema(arguments)));
    } else {
        content.insert(JSON_MEDIA.to_string(), media(arguments_schema(arguments, false)));
    }

    content
}

fn media(schema: Schema) -> MediaType {
    MediaType {
        schema: Some(ReferenceOr::Item(schema)),
        ..Default::default()
    }
}

/// With `skip_files`, `InputFile` alternatives are dropped and arguments left
/// without any type are omitted.
fn arguments_schema(arguments: &[Argument], skip_files: bool) -> Schema {
    let mut object = ObjectType {
        additional_properties: Some(AdditionalProperties::Any(false)),
        ..Default::default()
    };

    for a in arguments {
        if a.required {
            object.required.push(a.name.clone());
        }

        let data_types: Vec<DataType> = a
            .data_types
            .iter()
            .filter(|dt| !skip_files || dt.definition() != INPUT_FILE)
            .cloned()
            .collect();
        if data_types.is_empty() {
            continue;
        }
        object
            .properties
            .insert(a.name.clone(), boxed(value_schema(&data_types, &a.description)));
    }

    schema(SchemaKind::Type(Type::Object(object)))
}

/// File-accepting arguments are replaced by a plain `InputFile` reference.
fn multipart_schema(arguments: &[Argument]) -> Schema {
    let mut multipart = arguments_schema(arguments, true);
    if let SchemaKind::Type(Type::Object(object)) = &mut multipart.schema_kind {
        for a in arguments.iter().filter(|a| accepts_input_file(a)) {
            let file = Schema {
                schema_data: SchemaData {
                    description: Some(a.description.clone()),
                    ..Default::default()
                },
                schema_kind: SchemaKind::AllOf {
                    all_of: vec![schema_ref(INPUT_FILE)],
                },
            };
            object.properties.insert(a.name.clone(), ReferenceOr::boxed_item(file));
        }
    }
    multipart
}

fn envelope(ok: bool) -> ObjectType {
    let mut flag = scalar_schema(ScalarType::Boolean);
    flag.schema_data.default = Some(json!(ok));

    let mut object = ObjectType::default();
    object
        .properties
        .insert("ok".to_string(), ReferenceOr::boxed_item(flag));
    object.required.push("ok".to_string());
    object
}

fn responses(method: &MethodEntity) -> Responses {
    let mut body = envelope(true);
    body.properties
        .insert("result".to_string(), boxed(value_schema(&method.returns, "")));
    body.properties.insert(
        "description".to_string(),
        ReferenceOr::boxed_item(scalar_schema(ScalarType::String)),
    );
    body.required.push("result".to_string());

    let success = Response {
        description: "Success".to_string(),
        content: IndexMap::from([(
            JSON_MEDIA.to_string(),
            media(schema(SchemaKind::Type(Type::Object(body)))),
        )]),
        ..Default::default()
    };

    let error = || ReferenceOr::Reference {
        reference: format!("#/components/responses/{}", ERROR_RESPONSE),
    };

    Responses {
        default: Some(error()),
        responses: IndexMap::from([
            (StatusCode::Code(200), ReferenceOr::Item(success)),
            (StatusCode::Range(4), error()),
            (StatusCode::Range(5), error()),
        ]),
        ..Default::default()
    }
}

fn error_response(spec: &ApiSpec) -> Response {
    let mut body = envelope(false);
    body.properties.insert(
        "error_code".to_string(),
        ReferenceOr::boxed_item(schema(SchemaKind::Type(Type::Integer(IntegerType::default())))),
    );
    body.properties.insert(
        "description".to_string(),
        ReferenceOr::boxed_item(scalar_schema(ScalarType::String)),
    );
    if spec.get_type(RESPONSE_PARAMETERS).is_some() {
        body.properties.insert(
            "parameters".to_string(),
            ReferenceOr::Reference {
                reference: format!("#/components/schemas/{}", RESPONSE_PARAMETERS),
            },
        );
    }
    body.required.push("error_code".to_string());

    Response {
        description: "Error".to_string(),
        content: IndexMap::from([(
            JSON_MEDIA.to_string(),
            media(schema(SchemaKind::Type(Type::Object(body)))),
        )]),
        ..Default::default()
    }
}
