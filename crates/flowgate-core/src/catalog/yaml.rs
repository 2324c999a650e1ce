// Bulk import/export of the catalog as YAML.

use std::path::Path;

use tracing::{debug, info};

use super::Catalog;
use crate::error::CoreError;

impl Catalog {
    /// Parse and validate a catalog document.
    pub fn from_yaml_str(input: &str) -> Result<Self, CoreError> {
        let catalog: Self = serde_yaml::from_str(input)
            .map_err(|e| CoreError::catalog(format!("invalid catalog YAML: {e}")))?;
        catalog.validate()?;
        debug!(
            courses = catalog.courses.len(),
            students = catalog.students.len(),
            servers = catalog.servers.len(),
            "parsed catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog file. Replaces nothing; callers swap the result in.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let input = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&input)?;
        info!(path = %path.display(), "catalog imported");
        Ok(catalog)
    }

    pub fn to_yaml_string(&self) -> Result<String, CoreError> {
        serde_yaml::to_string(self)
            .map_err(|e| CoreError::catalog(format!("failed to serialize catalog: {e}")))
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml_string()?)?;
        info!(path = %path.display(), "catalog exported");
        Ok(())
    }
}
