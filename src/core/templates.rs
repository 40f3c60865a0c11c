//! Template directory resolution

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{Error, Result};

/// Environment variable naming an extra directory of templates
pub const TEMPLATE_DIR_ENV: &str = "CLIENTGEN_TEMPLATE_DIR";

/// Trait for reading template configuration, allowing dependency injection for testing
pub trait TemplateConfigReader {
    fn get_template_dir(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvTemplateConfigReader;

impl TemplateConfigReader for EnvTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        std::env::var(TEMPLATE_DIR_ENV).ok()
    }
}

/// Mock implementation for testing with controlled values
#[cfg(test)]
pub struct MockTemplateConfigReader(Option<String>);

#[cfg(test)]
impl MockTemplateConfigReader {
    pub fn new(template_dir: Option<String>) -> Self {
        Self(template_dir)
    }
}

#[cfg(test)]
impl TemplateConfigReader for MockTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        self.0.clone()
    }
}

/// A resolved template directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDir {
    template_path: PathBuf,
}

impl TemplateDir {
    /// Resolve `template` to a directory. An existing directory path is used as
    /// given; otherwise `template` names a template under `$CLIENTGEN_TEMPLATE_DIR`
    /// or the bundled templates.
    pub fn resolve(template: &str) -> Result<Self> {
        Self::resolve_with_config(template, &EnvTemplateConfigReader)
    }

    /// Resolve with a custom config reader (for testing)
    pub fn resolve_with_config(
        template: &str,
        config_reader: &dyn TemplateConfigReader,
    ) -> Result<Self> {
        let direct = PathBuf::from(template);
        if direct.is_dir() {
            debug!("Using template directory directly: {}", direct.display());
            return Ok(Self {
                template_path: direct,
            });
        }

        let candidates: Vec<PathBuf> = config_reader
            .get_template_dir()
            .map(PathBuf::from)
            .into_iter()
            .chain(std::iter::once(Self::bundled_dir()))
            .map(|base| base.join(template))
            .collect();

        for candidate in &candidates {
            debug!("Checking template location: {}", candidate.display());
            if candidate.is_dir() {
                return Ok(Self {
                    template_path: candidate.clone(),
                });
            }
        }

        Err(Error::config(format!(
            "Template '{template}' not found (looked in: {})",
            candidates
                .iter()
                .map(|c| c.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    /// Directory holding the templates shipped with the crate
    pub fn bundled_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
    }

    /// Names of the bundled templates, sorted
    pub fn list_bundled() -> Result<Vec<String>> {
        let dir = Self::bundled_dir();
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(|e| Error::io_at(&dir, e))? {
            let entry = entry.map_err(|e| Error::io_at(&dir, e))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Get the path to the template directory
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }
}
