//! Model import seam: content-addressed model assets and cancellable loads.
//!
//! The game core never parses model files itself. It asks for a model by
//! source path, keeps moving its placeholder while the load is in flight, and
//! attaches whatever comes back (or a fallback) once the load resolves.
//!
//! # Invariants
//! - A load result is only handed out while its owner is still alive.
//! - Import failures never panic; they surface as `AssetError`.

mod loader;

pub use loader::{AssetLoader, LoadOutcome, LoadTicket};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Content-addressed asset ID computed from the source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

/// An imported model: mesh names plus the animation clips it can play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub id: AssetId,
    pub name: String,
    pub meshes: Vec<String>,
    pub clips: Vec<String>,
}

impl ModelAsset {
    pub fn has_clip(&self, clip: &str) -> bool {
        self.clips.iter().any(|c| c == clip)
    }

    /// Read mesh and animation names out of glTF JSON.
    ///
    /// Vertex data and skinning are left to the engine that owns the GPU side.
    pub fn from_gltf_json(name: &str, data: &str) -> Result<Self, AssetError> {
        let json: serde_json::Value =
            serde_json::from_str(data).map_err(|e| AssetError::GltfParse(e.to_string()))?;

        let names = |key: &str, fallback: &str| -> Vec<String> {
            json.get(key)
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            item.get("name")
                                .and_then(|n| n.as_str())
                                .map(str::to_owned)
                                .unwrap_or_else(|| format!("{fallback}_{i}"))
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        let meshes = names("meshes", "mesh");
        let clips = names("animations", "clip");
        if meshes.is_empty() {
            return Err(AssetError::Empty(name.to_owned()));
        }

        Ok(Self {
            id: AssetId::of(data.as_bytes()),
            name: name.to_owned(),
            meshes,
            clips,
        })
    }

    /// Import a `.gltf` file from disk.
    pub fn import(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        let model = Self::from_gltf_json(name, &data)?;
        tracing::debug!(
            model = %model.name,
            meshes = model.meshes.len(),
            clips = model.clips.len(),
            "model imported"
        );
        Ok(model)
    }
}

/// Errors from model import.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
    #[error("model {0} has no meshes")]
    Empty(String),
}
