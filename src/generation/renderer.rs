//! Template tree rendering.
//!
//! Walks a template directory depth-first and mirrors it into an output directory:
//! - `*.tera` files are rendered with Tera and written without the suffix
//! - every other file is copied byte for byte
//! - directory and file names may contain `{key}` placeholders resolved against
//!   the context (see [`resolve_placeholders`])
//!
//! The preprocessor file at the template root is neither rendered nor copied.
//! Entries are visited in the order the filesystem reports them.

use std::error::Error as StdError;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tera::Tera;
use tracing::debug;

use super::context::Context;
use super::filters::register_filters;
use super::placeholder::resolve_placeholders;
use super::preprocessor::PREPROCESSOR_FILENAME;
use crate::core::error::{Error, Result};

/// Suffix marking a file as a template
pub const TEMPLATE_SUFFIX: &str = ".tera";

static MISSING_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Variable `([^`]+)` not found in context")
        .expect("valid missing variable pattern")
});

/// Counts of what one render pass produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Output directories created or confirmed, the root included
    pub directories: usize,
    /// Template files rendered
    pub rendered: usize,
    /// Asset files copied
    pub copied: usize,
}

/// Renders a template tree into an output directory
#[derive(Debug, Clone)]
pub struct TemplateTreeRenderer {
    template_root: PathBuf,
    output_root: PathBuf,
}

impl TemplateTreeRenderer {
    pub fn new(template_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Render the whole tree. Stops at the first error; files already written
    /// stay on disk.
    pub fn render(&self, context: &Context) -> Result<RenderSummary> {
        let mut summary = RenderSummary::default();
        self.process_dir(context, Path::new(""), &mut summary)?;
        Ok(summary)
    }

    fn process_dir(
        &self,
        context: &Context,
        current: &Path,
        summary: &mut RenderSummary,
    ) -> Result<()> {
        let output_dir = self.output_path(current, context)?;
        debug!(
            source = %current.display(),
            output = %output_dir.display(),
            "Processing directory"
        );
        fs::create_dir_all(&output_dir).map_err(|e| Error::io_at(&output_dir, e))?;
        summary.directories += 1;

        let source_dir = self.template_root.join(current);
        let entries = fs::read_dir(&source_dir).map_err(|e| Error::io_at(&source_dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::io_at(&source_dir, e))?;
            let file_name = entry.file_name();
            if current.as_os_str().is_empty() && file_name == PREPROCESSOR_FILENAME {
                continue;
            }

            let source = entry.path();
            let relative = current.join(&file_name);

            if source.is_dir() {
                self.process_dir(context, &relative, summary)?;
                continue;
            }

            let template_base = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(TEMPLATE_SUFFIX))
                .filter(|base| !base.is_empty());

            match template_base {
                Some(base) => {
                    let destination = self.output_path(&current.join(base), context)?;
                    self.render_file(&source, &destination, context)?;
                    summary.rendered += 1;
                }
                None => {
                    let destination = self.output_path(&relative, context)?;
                    debug!(
                        source = %source.display(),
                        output = %destination.display(),
                        "Copying file"
                    );
                    fs::copy(&source, &destination).map_err(|e| Error::io_at(&destination, e))?;
                    summary.copied += 1;
                }
            }
        }

        Ok(())
    }

    /// Resolve placeholders in a path relative to the template root and anchor
    /// it at the output root. The output root itself is never resolved.
    fn output_path(&self, relative: &Path, context: &Context) -> Result<PathBuf> {
        let relative = relative_path_string(relative)?;
        let resolved = resolve_placeholders(&relative, context)?;
        if resolved.is_empty() {
            Ok(self.output_root.clone())
        } else {
            Ok(self.output_root.join(resolved))
        }
    }

    fn render_file(&self, source: &Path, destination: &Path, context: &Context) -> Result<()> {
        let body = fs::read_to_string(source).map_err(|e| Error::io_at(source, e))?;

        // A fresh engine per file: nothing is cached between templates
        let name = source.display().to_string();
        let mut tera = Tera::default();
        register_filters(&mut tera);
        tera.add_raw_template(&name, &body)
            .map_err(|e| template_error(source, e))?;

        let rendered = tera
            .render(&name, &context.to_tera())
            .map_err(|e| template_error(source, e))?;

        debug!(
            source = %source.display(),
            output = %destination.display(),
            bytes = rendered.len(),
            "Rendered template"
        );
        fs::write(destination, rendered).map_err(|e| Error::io_at(destination, e))
    }
}

/// Join the components of a relative path with `/`.
fn relative_path_string(path: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                Error::io_at(
                    path,
                    io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
                )
            })?),
            Component::CurDir => {}
            _ => {
                return Err(Error::io_at(
                    path,
                    io::Error::new(io::ErrorKind::InvalidInput, "expected a relative path"),
                ));
            }
        }
    }
    Ok(parts.join("/"))
}

/// Report an undefined variable as an unresolved placeholder; everything else
/// is a template error for `path`.
fn template_error(path: &Path, source: tera::Error) -> Error {
    let mut cause: Option<&dyn StdError> = Some(&source);
    while let Some(err) = cause {
        let message = err.to_string();
        if let Some(caps) = MISSING_VARIABLE.captures(&message) {
            return Error::UnresolvedPlaceholder {
                key: caps[1].to_string(),
                path: path.display().to_string(),
            };
        }
        cause = err.source();
    }

    Error::Template {
        path: path.to_path_buf(),
        source,
    }
}
