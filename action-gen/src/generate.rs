//! The end-to-end run: fetch, synthesize, render, write.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::fetch::fetch_schema;
use crate::output::{ActionRenderer, remove_generated, write_actions};
use crate::schema::OpenApiSchema;
use crate::synthesize::synthesize;

/// One rendered action, kept in memory for dry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAction {
    pub name: String,
    pub content: String,
}

/// Summary of the generation process.
#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub schema_version: String,
    pub output_dir: PathBuf,
    pub synthesized: usize,
    pub removed: usize,
    pub written: usize,
    pub dry_run: bool,
    /// Populated instead of writing files when running dry.
    pub rendered: Vec<RenderedAction>,
}

impl GenerationSummary {
    pub fn print(&self) {
        if self.dry_run {
            for action in &self.rendered {
                println!("--- {} ---", action.name);
                println!("{}", action.content);
            }
            println!(
                "\nDry run: rendered {} actions for NetBox {}",
                self.rendered.len(),
                self.schema_version
            );
            return;
        }

        println!(
            "Wrote {} actions to {} (NetBox {}, removed {} stale)",
            self.written,
            self.output_dir.display(),
            self.schema_version,
            self.removed
        );
    }
}

/// Fetches the schema from `config.host` and regenerates the actions.
pub async fn generate(config: &GeneratorConfig) -> Result<GenerationSummary, GeneratorError> {
    let schema = fetch_schema(&config.host, config.verify_tls, config.timeout).await?;
    generate_from_schema(&schema, config)
}

/// Regenerates the actions for an already fetched schema.
///
/// Synthesis and template compilation both happen before anything in the
/// output directory is deleted, so a schema inconsistency or a broken
/// template leaves the previous actions untouched.
pub fn generate_from_schema(
    schema: &OpenApiSchema,
    config: &GeneratorConfig,
) -> Result<GenerationSummary, GeneratorError> {
    let actions = synthesize(schema)?;
    let renderer = ActionRenderer::from_file(&config.template_path)?;
    let schema_version = schema.schema_version();

    let mut summary = GenerationSummary {
        schema_version: schema_version.to_string(),
        output_dir: config.output_dir.clone(),
        synthesized: actions.len(),
        dry_run: config.dry_run,
        ..Default::default()
    };

    if config.dry_run {
        info!("Dry run - no files will be written");
        for action in &actions {
            summary.rendered.push(RenderedAction {
                name: action.name.clone(),
                content: renderer.render(schema_version, action)?,
            });
        }
        return Ok(summary);
    }

    fs::create_dir_all(&config.output_dir).map_err(|source| GeneratorError::OutputDir {
        path: config.output_dir.display().to_string(),
        source,
    })?;

    summary.removed = remove_generated(&config.output_dir)?;
    summary.written = write_actions(&config.output_dir, &renderer, schema_version, &actions)?;

    Ok(summary)
}
