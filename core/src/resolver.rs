#![deny(missing_docs)]

//! # Child Resolution
//!
//! Parent types list their subtypes before the subtypes are declared, so
//! parent/child links are resolved in two passes:
//! 1. whenever a type is registered, any pending link naming it as the child
//!    is attached (if the parent already exists),
//! 2. after the walk, the remaining links are attached or reported together.

use crate::error::{AppError, AppResult, UnresolvedTypes};
use crate::model::{SpecBuilder, TypeEntity};
use indexmap::IndexMap;

/// Child name -> parent name, in listing order.
#[derive(Debug, Default)]
pub struct PendingLinks {
    links: IndexMap<String, String>,
}

impl PendingLinks {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers that `parent` listed `child`. A later listing wins.
    pub fn defer(&mut self, child: String, parent: String) {
        self.links.insert(child, parent);
    }

    /// Number of links still waiting.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// First pass: sets `entity.parent` when it was listed by a registered parent.
    ///
    /// The parent's child list is updated here as well; the link is then
    /// dropped from the pending set.
    pub fn attach(&mut self, entity: &mut TypeEntity, builder: &SpecBuilder) {
        let Some(parent) = self.links.get(&entity.name) else {
            return;
        };

        let child = entity.name.clone();
        let attached = builder
            .update_type(parent, |p| {
                if !p.children.contains(&child) {
                    p.children.push(child.clone());
                }
            })
            .is_some();

        if attached {
            entity.parent = Some(parent.clone());
            self.links.shift_remove(&child);
        }
    }

    /// Second pass: links what is left, failing with every unknown child.
    pub fn finalize(self, builder: &SpecBuilder) -> AppResult<()> {
        let mut missing = Vec::new();

        for (child, parent) in self.links {
            if builder.has_type(&child) && builder.has_type(&parent) {
                builder.link_child(&parent, &child)?;
            } else {
                missing.push(child);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            tracing::warn!(count = missing.len(), "unresolved child types");
            Err(AppError::Unresolved(UnresolvedTypes(missing)))
        }
    }
}
