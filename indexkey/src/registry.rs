//! Registry of key layouts, built once when a store opens.
//!
//! Every built-in layout (each value family, each reference system, unique
//! and non-unique) is constructed up front from the configuration and
//! shared read-only through `Arc`. There is no global registry; callers
//! pass the registry to whatever opens trees.
//!
//! # Invariants
//!
//! - Each `LayoutKey` maps to exactly one layout
//! - Layouts are never added or removed after construction

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::IndexConfig;
use crate::layout::{
    AnyLayout, Compatibility, IndexValue, KeyLayout, LayoutError, LayoutIdentifier, LayoutKey,
    MetaError, NumberLayout, SpatialLayout, TemporalLayout, TextLayout, TreeMeta,
};
use crate::spatial::{CoordinateReferenceSystem, HilbertCurve};

/// Read-only map from layout key to shared layout.
#[derive(Debug)]
pub struct LayoutRegistry {
    layouts: HashMap<LayoutKey, Arc<AnyLayout>>,
}

impl LayoutRegistry {
    /// Build every built-in layout for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured curve settings cannot produce a
    /// layout.
    pub fn new(config: &IndexConfig) -> Result<Self, LayoutError> {
        let mut layouts = HashMap::new();
        for unique in [false, true] {
            let mut add = |layout: AnyLayout| {
                layouts.insert(layout.key(), Arc::new(layout));
            };
            add(AnyLayout::Temporal(TemporalLayout::new(unique)?));
            add(AnyLayout::Number(NumberLayout::new(unique)?));
            add(AnyLayout::Text(TextLayout::new(unique)?));
            for crs in CoordinateReferenceSystem::ALL {
                let curve = HilbertCurve::new(config.envelope_for(crs), config.levels_for(crs))?;
                add(AnyLayout::Spatial(SpatialLayout::new(crs, curve, unique)?));
            }
        }
        info!(count = layouts.len(), "layout registry ready");
        Ok(Self { layouts })
    }

    /// The layout registered under `key`.
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Arc::clone is cheap and expected
    pub fn get(&self, key: LayoutKey) -> Option<Arc<AnyLayout>> {
        self.layouts.get(&key).map(Arc::clone)
    }

    /// The layout that indexes `value`.
    #[must_use]
    pub fn for_value(&self, value: &IndexValue, unique: bool) -> Option<Arc<AnyLayout>> {
        self.get(LayoutKey::for_value(value, unique))
    }

    /// Layouts sharing the persisted identifier `identifier`.
    ///
    /// Spatial layouts of same-dimension reference systems share an
    /// identifier and differ only in settings.
    pub fn with_identifier(
        &self,
        identifier: LayoutIdentifier,
    ) -> impl Iterator<Item = &Arc<AnyLayout>> {
        self.layouts
            .values()
            .filter(move |layout| layout.identifier() == identifier)
    }

    /// Find the layout a tree was built with and check it can be read.
    ///
    /// # Errors
    ///
    /// Returns `FormatMismatch` if no registered layout matches the tree's
    /// identifier and settings.
    #[allow(clippy::disallowed_methods)] // Arc::clone is cheap and expected
    pub fn open(&self, meta: &TreeMeta) -> Result<(Arc<AnyLayout>, Compatibility), MetaError> {
        let exact = self
            .layouts
            .values()
            .find(|layout| TreeMeta::for_layout(layout.as_ref()) == *meta);
        let candidate = exact.or_else(|| {
            self.layouts.values().find(|layout| {
                let expected = layout.identifier();
                LayoutIdentifier::check_compatible(expected, meta.identifier).is_ok()
                    && layout.settings_fingerprint() == meta.settings_fingerprint
            })
        });
        match candidate {
            Some(layout) => {
                let compatibility = meta.validate(layout.as_ref())?;
                Ok((Arc::clone(layout), compatibility))
            }
            None => {
                let expected = self
                    .with_identifier(meta.identifier)
                    .next()
                    .map_or(meta.identifier, |layout| layout.identifier());
                warn!(found = %meta.identifier, "no registered layout matches tree");
                Err(LayoutError::FormatMismatch {
                    expected,
                    found: meta.identifier,
                }
                .into())
            }
        }
    }

    /// All registered layouts, ordered by key.
    #[must_use]
    pub fn layouts(&self) -> Vec<(LayoutKey, &AnyLayout)> {
        let mut all: Vec<_> = self
            .layouts
            .iter()
            .map(|(key, layout)| (*key, layout.as_ref()))
            .collect();
        all.sort_by_key(|(key, _)| *key);
        all
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
