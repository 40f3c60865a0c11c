//! Generation orchestration - coordinates one generation run

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::builder::ContextBuilder;
use super::context::Context;
use super::preprocessor::{ContextPreprocessor, TemplatePreprocessor};
use super::renderer::{RenderSummary, TemplateTreeRenderer};
use crate::core::error::Result;
use crate::schema::Schema;

/// Orchestrates the generation workflow:
/// schema + options → context → preprocessor → template tree → output directory.
pub struct Generator {
    template_root: PathBuf,
    output_root: PathBuf,
    context_builder: ContextBuilder,
    preprocessor: Option<Box<dyn ContextPreprocessor>>,
}

impl Generator {
    /// Create a generator for one template tree and output directory
    pub fn new(template_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            template_root: template_root.into(),
            output_root: output_root.into(),
            context_builder: ContextBuilder::new(),
            preprocessor: None,
        }
    }

    /// Use `preprocessor` instead of any `view_preprocessor.tera` in the template root
    pub fn with_preprocessor(mut self, preprocessor: impl ContextPreprocessor + 'static) -> Self {
        self.preprocessor = Some(Box::new(preprocessor));
        self
    }

    /// Build the context and apply the preprocessor, without writing anything.
    pub fn prepare_context(&self, schema: &Schema, options: &Context) -> Result<Context> {
        let context = self.context_builder.build(schema, options)?;

        match &self.preprocessor {
            Some(preprocessor) => {
                debug!("Applying injected context preprocessor");
                preprocessor.transform(context)
            }
            None => match TemplatePreprocessor::load(&self.template_root)? {
                Some(preprocessor) => preprocessor.transform(context),
                None => Ok(context),
            },
        }
    }

    /// Execute the generation workflow
    pub fn generate(&self, schema: &Schema, options: &Context) -> Result<RenderSummary> {
        info!(
            template = %self.template_root.display(),
            output = %self.output_root.display(),
            "Generating client"
        );

        if self.preprocessor.is_some()
            && self
                .template_root
                .join(super::preprocessor::PREPROCESSOR_FILENAME)
                .is_file()
        {
            warn!("Injected preprocessor takes precedence over the template's preprocessor file");
        }

        let context = self.prepare_context(schema, options)?;

        let summary =
            TemplateTreeRenderer::new(&self.template_root, &self.output_root).render(&context)?;

        info!(
            directories = summary.directories,
            rendered = summary.rendered,
            copied = summary.copied,
            "Generation complete"
        );
        Ok(summary)
    }
}

/// Generate a client from `schema` using the templates in `template_root`.
///
/// Convenience wrapper over [`Generator`] for callers that do not inject a
/// preprocessor.
pub fn generate_client(
    schema: &Schema,
    template_root: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    options: &Context,
) -> Result<RenderSummary> {
    Generator::new(template_root.as_ref(), output_root.as_ref()).generate(schema, options)
}
