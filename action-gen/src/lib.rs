//! NetBox action generator library.
//!
//! This crate turns the OpenAPI v3 schema served by a NetBox instance into
//! StackStorm action definitions: one YAML file per API operation, rendered
//! from a Jinja template.
//!
//! ## Modules
//!
//! - [`fetch`] - Downloads the schema from `<host>/api/schema?format=json`
//! - [`schema`] - Typed, order-preserving view of the OpenAPI document
//! - [`path`] - Action naming and endpoint URI templates
//! - [`action`] - Action descriptors and the ordered [`action::ActionSet`]
//! - [`synthesize`] - The operation-to-action mapping rules
//! - [`output`] - Template rendering and file writing
//! - [`generate`] - The full fetch/synthesize/write run
//! - [`config`] - Run settings
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use netbox_action_gen::config::GeneratorConfig;
//! use netbox_action_gen::generate::generate;
//!
//! # async fn run() -> Result<(), netbox_action_gen::errors::GeneratorError> {
//! let config = GeneratorConfig {
//!     host: "https://netbox.example.com".to_string(),
//!     ..Default::default()
//! };
//! let summary = generate(&config).await?;
//! summary.print();
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod generate;
pub mod output;
pub mod path;
pub mod schema;
pub mod synthesize;

#[cfg(test)]
mod test_utils;
