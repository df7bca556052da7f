#![deny(missing_docs)]

//! # Document Source
//!
//! Feeds a parsed reference document through the walker and the child
//! resolver into a [`SpecBuilder`].

use crate::config::SourceConfig;
use crate::document::Block;
use crate::error::AppResult;
use crate::html::parse_blocks;
use crate::model::{DataSource, SpecBuilder};
use crate::resolver::PendingLinks;
use crate::walker::{Event, VersionRecord, Walker};

/// A reference document already split into blocks.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    blocks: Vec<Block>,
    config: SourceConfig,
}

impl DocumentSource {
    /// Wraps blocks produced elsewhere.
    pub fn new(blocks: Vec<Block>, config: SourceConfig) -> Self {
        Self { blocks, config }
    }

    /// Parses an HTML page using the container selector from `config`.
    pub fn from_html(html: &str, config: SourceConfig) -> AppResult<Self> {
        let blocks = parse_blocks(html, &config.container_selector)?;
        tracing::debug!(blocks = blocks.len(), "document parsed");
        Ok(Self::new(blocks, config))
    }

    /// Settings the source was created with.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl DataSource for DocumentSource {
    fn fill(&self, builder: &SpecBuilder) -> AppResult<()> {
        let mut pending = PendingLinks::new();

        for event in Walker::new(self.blocks.iter().cloned(), builder, &self.config) {
            match event {
                Event::Version(record) => apply_version(builder, &record)?,
                Event::Type(mut entity) => {
                    pending.attach(&mut entity, builder);
                    builder.add_type(entity)?;
                }
                Event::Method(entity) => builder.add_method(entity)?,
                Event::DeferredChild { child, parent } => pending.defer(child, parent),
                Event::Error(err) => return Err(err),
            }
        }

        pending.finalize(builder)
    }
}

// Only the newest changelog entry describes the documented release.
fn apply_version(builder: &SpecBuilder, record: &VersionRecord) -> AppResult<()> {
    if record.version.is_empty() || !builder.version().is_empty() {
        return Ok(());
    }

    builder.set_version(&record.version)?;
    if !record.release_date.is_empty() {
        builder.set_release_date(&record.release_date)?;
    }
    if !record.link.is_empty() {
        builder.set_link(&record.link)?;
    }
    Ok(())
}
