//! On-disk archive of resolved results.
//!
//! Layout: `<root>/<result_id>/manifest.json` and `result.json`. The archive
//! is an export target; resolution never reads from it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hash::compute_result_id;
use crate::types::{Provenance, ResolvedResult};
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveManifest {
    pub result_id: String,
    pub flight_path: String,
    pub variant: String,
    pub provenance: Option<Provenance>,
    pub success: bool,
    pub warning_count: usize,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

#[derive(Clone)]
pub struct ResultArchive {
    root_dir: PathBuf,
}

impl ResultArchive {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Archive under `<project>/.cargotrim/results`.
    pub fn for_project(project_root: &Path) -> ResultsResult<Self> {
        Self::new(project_root.join(".cargotrim").join("results"))
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn result_dir(&self, result_id: &str) -> ResultsResult<PathBuf> {
        let valid = !result_id.is_empty() && result_id.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(ResultsError::InvalidId(result_id.to_string()));
        }
        Ok(self.root_dir.join(result_id))
    }

    pub fn contains(&self, result_id: &str) -> bool {
        self.result_dir(result_id)
            .is_ok_and(|dir| dir.join("manifest.json").exists())
    }

    pub fn save(&self, result: &ResolvedResult, variant: &str) -> ResultsResult<ArchiveManifest> {
        let result_id = compute_result_id(result, variant);
        let dir = self.result_dir(&result_id)?;
        fs::create_dir_all(&dir)?;

        let manifest = ArchiveManifest {
            result_id,
            flight_path: result.flight.path.clone(),
            variant: variant.to_string(),
            provenance: result.provenance,
            success: result.success,
            warning_count: result.warnings.len(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        fs::write(dir.join("result.json"), serde_json::to_string_pretty(result)?)?;
        fs::write(
            dir.join("manifest.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;
        Ok(manifest)
    }

    pub fn load_manifest(&self, result_id: &str) -> ResultsResult<ArchiveManifest> {
        let path = self.result_dir(result_id)?.join("manifest.json");
        if !path.exists() {
            return Err(ResultsError::NotFound {
                result_id: result_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_result(&self, result_id: &str) -> ResultsResult<ResolvedResult> {
        let path = self.result_dir(result_id)?.join("result.json");
        if !path.exists() {
            return Err(ResultsError::NotFound {
                result_id: result_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Manifests, newest first; `flight_path` narrows to one flight.
    pub fn list(&self, flight_path: Option<&str>) -> ResultsResult<Vec<ArchiveManifest>> {
        let mut manifests = Vec::new();
        if !self.root_dir.exists() {
            return Ok(manifests);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let result_id = entry.file_name().to_string_lossy().to_string();
            if let Ok(manifest) = self.load_manifest(&result_id)
                && flight_path.is_none_or(|p| manifest.flight_path == p)
            {
                manifests.push(manifest);
            }
        }

        manifests.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.result_id.cmp(&b.result_id))
        });
        Ok(manifests)
    }

    pub fn delete(&self, result_id: &str) -> ResultsResult<()> {
        let dir = self.result_dir(result_id)?;
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}
