//! Manifest of embedded assets and the files derived from it.
//!
//! A [`Manifest`] is built entirely in memory from the collected raw assets.
//! Nothing touches the disk until [`write`] is called, so a collision or a
//! compression failure leaves the output directory as it was.

mod render;
mod write;

pub use render::{ArtifactStyle, render};
pub use write::{artifact_wanted, write, write_artifact};

use std::collections::HashMap;

use crate::asset::{Asset, RawAsset, is_valid_symbol};
use crate::core::{EmbedError, EmbedResult};

/// Ordered collection of assets produced in one run.
///
/// Symbols are unique and valid identifiers.
#[derive(Debug, Default)]
pub struct Manifest {
    assets: Vec<Asset>,
}

impl Manifest {
    /// Compress and fingerprint every raw asset, preserving input order.
    ///
    /// Fails with [`EmbedError::SymbolCollision`] when two distinct names
    /// sanitize to the same symbol.
    pub fn build(raw: Vec<RawAsset>) -> EmbedResult<Self> {
        let mut seen: HashMap<String, String> = HashMap::with_capacity(raw.len());
        let mut assets = Vec::with_capacity(raw.len());

        for raw in raw {
            let asset = Asset::from_raw(raw)?;

            debug_assert!(is_valid_symbol(&asset.symbol), "{}", asset.symbol);
            if let Some(first) = seen.get(&asset.symbol) {
                return Err(EmbedError::SymbolCollision {
                    symbol: asset.symbol,
                    first: first.clone(),
                    second: asset.name,
                });
            }
            seen.insert(asset.symbol.clone(), asset.name.clone());
            assets.push(asset);
        }

        Ok(Self { assets })
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Total compressed bytes across all assets.
    pub fn total_size(&self) -> usize {
        self.assets.iter().map(Asset::size).sum()
    }
}
