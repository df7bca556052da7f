//! # Output Files
//!
//! Target resolution and all-or-nothing writing shared by the exporters.

use botapi_core::AppResult;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

/// Where an export lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Exactly this `*.json` file, pretty printed.
    Exact(PathBuf),
    /// `<base>.json`, `<base>.min.json` and any extra extensions.
    Family(PathBuf),
}

impl Target {
    /// Resolves `path`: a directory gets `<dir>/<stem>`, a `*.json` path is
    /// taken as is, anything else is used as the base name.
    pub fn resolve(path: &Path, stem: &str) -> Self {
        if path.is_dir() {
            Target::Family(path.join(stem))
        } else if path.extension().is_some_and(|ext| ext == "json") {
            Target::Exact(path.to_path_buf())
        } else {
            Target::Family(path.to_path_buf())
        }
    }

    /// `<base><suffix>` for a family target.
    pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
        let mut name = base.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }
}

/// Pretty JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Writes every file or none: already written files are removed on failure.
pub fn write_all(files: Vec<(PathBuf, Vec<u8>)>) -> AppResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for (path, content) in files {
        println!("saving: {}", path.display());
        if let Err(err) = fs::write(&path, content) {
            for done in &written {
                let _ = fs::remove_file(done);
            }
            return Err(err.into());
        }
        written.push(path);
    }

    Ok(written)
}
