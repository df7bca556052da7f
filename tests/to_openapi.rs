mod common;

use botapi_spec::to_openapi::{build, export};
use common::sample_spec;
use openapiv3::{OpenAPI, ReferenceOr};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;

fn document() -> Value {
    serde_json::to_value(build(&sample_spec()).unwrap()).unwrap()
}

#[test]
fn test_info_and_servers() {
    let doc = document();
    assert_eq!(doc["info"]["title"], "Telegram Bot API");
    assert_eq!(doc["info"]["version"], "7.2");
    assert_eq!(doc["servers"][0]["url"], "https://api.telegram.org/bot{token}");
    assert_eq!(doc["servers"][1]["url"], "{protocol}://{host}/bot{token}");
    assert_eq!(
        doc["servers"][1]["variables"]["protocol"]["enum"],
        json!(["http", "https"])
    );
}

#[test]
fn test_object_schema() {
    let doc = document();
    let user = &doc["components"]["schemas"]["User"];

    assert_eq!(user["type"], "object");
    assert_eq!(user["additionalProperties"], false);
    assert_eq!(user["required"], json!(["id", "is_bot", "first_name"]));
    assert_eq!(user["properties"]["id"]["type"], "integer");
    assert_eq!(user["properties"]["id"]["format"], "int64");
    assert_eq!(user["properties"]["is_bot"]["type"], "boolean");
    assert_eq!(
        user["externalDocs"]["url"],
        "https://core.telegram.org/bots/api#user"
    );
}

#[test]
fn test_input_file_is_binary() {
    let doc = document();
    let file = &doc["components"]["schemas"]["InputFile"];
    assert_eq!(file["type"], "string");
    assert_eq!(file["format"], "binary");
}

#[test]
fn test_parent_has_discriminator() {
    let doc = document();
    let menu = &doc["components"]["schemas"]["MenuButton"];

    assert_eq!(
        menu["oneOf"],
        json!([
            {"$ref": "#/components/schemas/MenuButtonCommands"},
            {"$ref": "#/components/schemas/MenuButtonDefault"}
        ])
    );
    assert_eq!(menu["discriminator"]["propertyName"], "type");
    assert_eq!(
        menu["discriminator"]["mapping"]["default"],
        "#/components/schemas/MenuButtonDefault"
    );
    assert_eq!(
        doc["components"]["schemas"]["MenuButtonCommands"]["properties"]["type"]["default"],
        "commands"
    );
}

#[test]
fn test_nested_array_items() {
    let doc = document();
    let photos = &doc["components"]["schemas"]["UserProfilePhotos"]["properties"]["photos"];
    assert_eq!(photos["type"], "array");
    assert_eq!(photos["items"]["type"], "array");
    assert_eq!(
        photos["items"]["items"]["$ref"],
        "#/components/schemas/PhotoSize"
    );
}

#[test]
fn test_operations() {
    let doc = document();
    let paths = &doc["paths"];

    let get_me = &paths["/getMe"]["get"];
    assert_eq!(get_me["operationId"], "getMe");
    assert_eq!(get_me["tags"], json!(["available methods"]));
    assert!(get_me.get("requestBody").is_none());
    assert_eq!(
        get_me["responses"]["200"]["content"]["application/json"]["schema"]["properties"]["result"]["$ref"],
        "#/components/schemas/User"
    );
    assert_eq!(
        get_me["responses"]["default"]["$ref"],
        "#/components/responses/error"
    );

    let profile = &paths["/getUserProfilePhotos"]["post"]["requestBody"]["content"];
    assert!(profile.get("application/json").is_some());
    assert!(profile.get("multipart/form-data").is_none());
    assert_eq!(
        profile["application/json"]["schema"]["required"],
        json!(["user_id"])
    );
}

#[test]
fn test_file_uploads() {
    let doc = document();

    let set_photo = &doc["paths"]["/setChatPhoto"]["post"]["requestBody"]["content"];
    assert!(set_photo.get("application/json").is_none());
    assert!(set_photo.get("multipart/form-data").is_some());

    let send_photo = &doc["paths"]["/sendPhoto"]["post"]["requestBody"]["content"];
    assert_eq!(
        send_photo["application/json"]["schema"]["properties"]["photo"]["type"],
        "string"
    );
    assert_eq!(
        send_photo["multipart/form-data"]["schema"]["properties"]["photo"]["allOf"][0]["$ref"],
        "#/components/schemas/InputFile"
    );
}

#[test]
fn test_error_response() {
    let doc = document();
    let error = &doc["components"]["responses"]["error"]["content"]["application/json"]["schema"];
    assert_eq!(error["properties"]["ok"]["default"], false);
    assert_eq!(
        error["properties"]["parameters"]["$ref"],
        "#/components/schemas/ResponseParameters"
    );
}

#[test]
fn test_export_files() {
    let dir = tempfile::tempdir().unwrap();
    let written = export(&sample_spec(), dir.path()).unwrap();
    assert_eq!(written.len(), 3);

    let yaml = fs::read_to_string(dir.path().join("openapi.yaml")).unwrap();
    let from_yaml: OpenAPI = serde_yaml::from_str(&yaml).unwrap();
    let json = fs::read_to_string(dir.path().join("openapi.json")).unwrap();
    let from_json: OpenAPI = serde_json::from_str(&json).unwrap();
    assert_eq!(from_yaml.info.version, "7.2");
    assert_eq!(from_yaml.paths.paths.len(), from_json.paths.paths.len());

    let Some(ReferenceOr::Item(item)) = from_json.paths.paths.get("/sendPhoto") else {
        panic!("expected sendPhoto path");
    };
    assert!(item.post.is_some());
}
