#![allow(dead_code)]

use botapi_core::{ApiSpec, DocumentSource, SourceConfig};

pub const SAMPLE_PAGE: &str = include_str!("../fixtures/bot_api_sample.html");

pub fn sample_spec() -> ApiSpec {
    let source = DocumentSource::from_html(SAMPLE_PAGE, SourceConfig::default()).unwrap();
    ApiSpec::from_source(&source).unwrap()
}
