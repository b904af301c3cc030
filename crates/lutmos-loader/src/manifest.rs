//! JSON manifests listing the sweep files of every bias plane.
//!
//! ```json
//! {
//!   "engine": { "bias_tolerance": 1e-9 },
//!   "columns": "standard",
//!   "planes": [
//!     { "bias": 0.2, "gmro": "nmos/ngmro_0p2V.csv", "ft": "nmos/nft_0p2V.csv" },
//!     { "bias": 0.4, "gmro": "nmos/ngmro_0p4V.csv" }
//!   ]
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use lutmos_core::Quantity;
use lutmos_engine::{EngineConfig, LutEngine};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reader::read_file;
use crate::schema::ColumnPolicy;

/// Sweep files recorded at one bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneFiles {
    pub bias: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_w: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmro: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ft: Option<PathBuf>,
}

impl PlaneFiles {
    /// A plane with no files yet.
    pub fn new(bias: f64) -> Self {
        Self {
            bias,
            id_w: None,
            gmro: None,
            ft: None,
        }
    }

    /// Set the file for one quantity.
    pub fn with_file(mut self, quantity: Quantity, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match quantity {
            Quantity::IdW => self.id_w = path,
            Quantity::Gmro => self.gmro = path,
            Quantity::Ft => self.ft = path,
        }
        self
    }

    /// File for one quantity, if any.
    pub fn file(&self, quantity: Quantity) -> Option<&Path> {
        match quantity {
            Quantity::IdW => self.id_w.as_deref(),
            Quantity::Gmro => self.gmro.as_deref(),
            Quantity::Ft => self.ft.as_deref(),
        }
    }
}

/// Record every file of `files` into `engine` with the standard column
/// layout. Returns the number of rows kept.
pub fn load_plane(engine: &mut LutEngine, files: &PlaneFiles) -> Result<usize> {
    load_plane_with(engine, files, ColumnPolicy::Standard)
}

/// Like [`load_plane`] with an explicit column policy.
pub fn load_plane_with(
    engine: &mut LutEngine,
    files: &PlaneFiles,
    policy: ColumnPolicy,
) -> Result<usize> {
    let mut kept = 0;
    for quantity in Quantity::ALL {
        if let Some(path) = files.file(quantity) {
            let rows = read_file(path, quantity, policy)?;
            kept += engine.record(quantity, files.bias, rows)?;
        }
    }
    Ok(kept)
}

/// A set of bias planes plus optional engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,
    #[serde(default)]
    pub columns: ColumnPolicy,
    pub planes: Vec<PlaneFiles>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Manifest {
    /// A manifest with default settings and no base directory.
    pub fn new(planes: Vec<PlaneFiles>) -> Self {
        Self {
            engine: None,
            columns: ColumnPolicy::default(),
            planes,
            base_dir: None,
        }
    }

    /// Parse a manifest. Relative paths stay relative to the working
    /// directory.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a manifest file; relative paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = Self::from_json(&text)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Set the directory relative paths resolve against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Resolve a listed path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Record every listed file into `engine` without rebuilding.
    pub fn load_into(&self, engine: &mut LutEngine) -> Result<usize> {
        let mut kept = 0;
        for plane in &self.planes {
            let mut resolved = PlaneFiles::new(plane.bias);
            for quantity in Quantity::ALL {
                if let Some(path) = plane.file(quantity) {
                    resolved = resolved.with_file(quantity, self.resolve(path));
                }
            }
            kept += load_plane_with(engine, &resolved, self.columns)?;
        }
        log::info!("loaded {} rows from {} planes", kept, self.planes.len());
        Ok(kept)
    }

    /// Build a ready-to-query engine from this manifest.
    pub fn into_engine(self) -> Result<LutEngine> {
        let mut engine = LutEngine::with_config(self.engine.clone().unwrap_or_default());
        self.load_into(&mut engine)?;
        engine.rebuild()?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let manifest = Manifest::from_json(r#"{"planes": [{"bias": 0.4, "gmro": "g.csv"}]}"#)
            .unwrap();
        assert_eq!(manifest.engine, None);
        assert_eq!(manifest.columns, ColumnPolicy::Standard);
        assert_eq!(manifest.planes[0].file(Quantity::Gmro), Some(Path::new("g.csv")));
        assert_eq!(manifest.planes[0].file(Quantity::Ft), None);
    }

    #[test]
    fn test_resolve_relative_paths() {
        let manifest = Manifest::new(vec![]).with_base_dir("/data/nmos");
        assert_eq!(
            manifest.resolve(Path::new("ngmro.csv")),
            PathBuf::from("/data/nmos/ngmro.csv")
        );
        assert_eq!(
            manifest.resolve(Path::new("/abs/nft.csv")),
            PathBuf::from("/abs/nft.csv")
        );
        assert_eq!(
            Manifest::new(vec![]).resolve(Path::new("x.csv")),
            PathBuf::from("x.csv")
        );
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = Manifest::from_json(r#"{"columns": "guess", "planes": []}"#).unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }
}
