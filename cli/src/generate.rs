#![deny(missing_docs)]

//! # Generate Command
//!
//! Implements the pipeline: reference page -> spec -> JSON + OpenAPI.
//!
//! 1. **Load**: local HTML file or the official page (`client` feature).
//! 2. **Extract**: blocks are walked into a checked entity graph.
//! 3. **Export**: `spec.json`, `openapi.*` and `version.json` land in the
//!    output directory. A directory created by this run is removed again
//!    when any step fails.

use crate::error::CliResult;
use crate::fetch;
use botapi_core::config::DEFAULT_SITE_URL;
use botapi_core::{ApiSpec, AppError, DocumentSource, SourceConfig};
use botapi_spec::{to_json, to_openapi};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Saved reference page (`*.html`) or an http(s) URL.
    /// When omitted, the official page is downloaded.
    #[clap(long, env = "BOTAPI_SOURCE")]
    pub source: Option<String>,

    /// Output directory for the generated files.
    #[clap(long, env = "BOTAPI_OUT_DIR", default_value = "out")]
    pub dir: PathBuf,

    /// Site root used to resolve documentation links.
    #[clap(long, env = "BOTAPI_SITE_URL", default_value = DEFAULT_SITE_URL)]
    pub site_url: String,
}

/// Executes the generate pipeline.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let created = prepare_dir(&args.dir)?;

    let result = run(args);
    if result.is_err() && created {
        tracing::warn!(dir = %args.dir.display(), "removing output directory after failure");
        let _ = fs::remove_dir_all(&args.dir);
    }
    result
}

fn run(args: &GenerateArgs) -> CliResult<()> {
    println!("initializing data source...");
    let config = SourceConfig::for_site(&args.site_url);
    let html = fetch::load(args.source.as_deref(), &config)?;
    let source = DocumentSource::from_html(&html, config)?;

    println!("creating specification...");
    let spec = ApiSpec::from_source(&source)?;
    println!("Bot API v{} created", spec.version());

    println!("exporting...");
    to_json::export(&spec, &args.dir)?;
    to_openapi::export(&spec, &args.dir)?;
    write_version(&spec, &args.dir)?;

    Ok(())
}

/// Returns whether the directory was created by this call.
fn prepare_dir(dir: &Path) -> CliResult<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir)?;
    Ok(true)
}

fn write_version(spec: &ApiSpec, dir: &Path) -> CliResult<()> {
    let path = dir.join("version.json");
    let content = serde_json::to_vec(&json!({ "version": spec.version() })).map_err(AppError::from)?;

    println!("saving: {}", path.display());
    fs::write(&path, content)?;
    Ok(())
}
