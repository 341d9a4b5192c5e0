//! The pack collaborator: lazy resource registration and digest-tagged
//! flush.
//!
//! Layout builds register textures and font documents into an
//! [`OverlayPack`] as deferred suppliers; nothing is evaluated until
//! [`flush`](OverlayPack::flush), which runs every supplier exactly once, in
//! path order, and tags each resulting artifact with a BLAKE3 content
//! digest. Flushing consumes the pack -- a build pass produces exactly one
//! artifact set.
//!
//! Registration is first-write-wins: a duplicate path is dropped with a
//! warning. A single build pass never produces duplicates (the layout
//! builder's dedup table guarantees it), but independent layouts sharing a
//! group and layer may collide on texture paths, in which case the bytes
//! are identical by construction.

use std::collections::BTreeMap;

use overbar_core::key::ResourceKey;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::font::FontDocument;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while flushing a pack.
#[derive(Debug, Error)]
pub enum PackError {
    /// A font document failed to serialize.
    #[error("failed to serialize font document '{path}': {source}")]
    FontSerialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// PackArtifact
// ---------------------------------------------------------------------------

/// One flushed resource: its pack-relative path, bytes, and content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackArtifact {
    /// Path inside the pack, e.g. `assets/overbar/font/boss/hp/1.json`.
    pub path: String,
    /// The resource bytes.
    pub bytes: Vec<u8>,
    /// BLAKE3 hex digest of `bytes`.
    pub digest: String,
}

// ---------------------------------------------------------------------------
// OverlayPack
// ---------------------------------------------------------------------------

type ByteSupplier = Box<dyn FnOnce() -> Vec<u8> + Send>;
type FontSupplier = Box<dyn FnOnce() -> FontDocument + Send>;

/// Collects lazily-supplied textures and font documents under one
/// namespace, then flushes them into digest-tagged artifacts.
pub struct OverlayPack {
    namespace: String,
    textures: BTreeMap<String, ByteSupplier>,
    fonts: BTreeMap<String, FontSupplier>,
}

impl OverlayPack {
    /// Create an empty pack for the given resource namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            textures: BTreeMap::new(),
            fonts: BTreeMap::new(),
        }
    }

    /// The pack's resource namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// A resource key addressing `path` inside this pack's namespace.
    pub fn key(&self, path: &str) -> ResourceKey {
        ResourceKey::new(self.namespace.clone(), path)
    }

    /// Register a texture under `path` (relative, including extension).
    ///
    /// The supplier runs once at flush time. First registration of a path
    /// wins; duplicates are dropped with a warning.
    pub fn texture(
        &mut self,
        path: impl Into<String>,
        supplier: impl FnOnce() -> Vec<u8> + Send + 'static,
    ) {
        let path = path.into();
        if self.textures.contains_key(&path) {
            warn!(path = %path, "duplicate texture registration dropped");
            return;
        }
        self.textures.insert(path, Box::new(supplier));
    }

    /// Register a font document under `path` (relative, including
    /// extension).
    ///
    /// Same laziness and first-write-wins policy as
    /// [`texture`](Self::texture).
    pub fn font(
        &mut self,
        path: impl Into<String>,
        supplier: impl FnOnce() -> FontDocument + Send + 'static,
    ) {
        let path = path.into();
        if self.fonts.contains_key(&path) {
            warn!(path = %path, "duplicate font registration dropped");
            return;
        }
        self.fonts.insert(path, Box::new(supplier));
    }

    /// Whether a texture is registered under `path`.
    pub fn contains_texture(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    /// Whether a font is registered under `path`.
    pub fn contains_font(&self, path: &str) -> bool {
        self.fonts.contains_key(path)
    }

    /// Number of registered textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of registered fonts.
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Evaluate every supplier once and produce the artifact set, ordered
    /// by artifact path.
    ///
    /// Font documents serialize as pretty JSON so operators can inspect the
    /// emitted pack. I/O is the caller's responsibility.
    pub fn flush(self) -> Result<Vec<PackArtifact>, PackError> {
        let mut artifacts = Vec::with_capacity(self.fonts.len() + self.textures.len());

        // "font" sorts before "textures", so pushing fonts first keeps the
        // whole artifact list in path order.
        for (path, supplier) in self.fonts {
            let document = supplier();
            let bytes = serde_json::to_vec_pretty(&document).map_err(|source| {
                PackError::FontSerialization {
                    path: path.clone(),
                    source,
                }
            })?;
            artifacts.push(artifact(
                format!("assets/{}/font/{}", self.namespace, path),
                bytes,
            ));
        }
        for (path, supplier) in self.textures {
            artifacts.push(artifact(
                format!("assets/{}/textures/{}", self.namespace, path),
                supplier(),
            ));
        }

        let total_bytes: usize = artifacts.iter().map(|a| a.bytes.len()).sum();
        info!(
            artifacts = artifacts.len(),
            total_bytes, "flushed overlay pack"
        );
        Ok(artifacts)
    }
}

impl std::fmt::Debug for OverlayPack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayPack")
            .field("namespace", &self.namespace)
            .field("textures", &self.textures.keys().collect::<Vec<_>>())
            .field("fonts", &self.fonts.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn artifact(path: String, bytes: Vec<u8>) -> PackArtifact {
    let digest = blake3::hash(&bytes).to_hex().to_string();
    debug!(path = %path, digest = %digest, "flushed artifact");
    PackArtifact {
        path,
        bytes,
        digest,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
