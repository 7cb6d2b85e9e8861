use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::DEFAULT_TIMEOUT;

/// Public NetBox demo instance used when no host is given.
pub const DEFAULT_HOST: &str = "https://demo.netbox.dev";

/// Directory generated actions are written to, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "actions";

/// Template file read from the working directory.
pub const DEFAULT_TEMPLATE: &str = "action-template.jinja2";

/// Settings for one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// NetBox base URL; trailing slashes are ignored.
    pub host: String,
    pub verify_tls: bool,
    pub output_dir: PathBuf,
    pub template_path: PathBuf,
    pub timeout: Duration,
    /// Render to stdout instead of touching `output_dir`.
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            verify_tls: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            timeout: DEFAULT_TIMEOUT,
            dry_run: false,
        }
    }
}
