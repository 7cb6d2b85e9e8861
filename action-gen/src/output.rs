//! Template rendering and file writing for generated actions.
//!
//! ## Output Structure
//!
//! ```text
//! actions/
//! ├── get.dcim.sites.yaml
//! ├── post.dcim.sites.yaml
//! └── ...
//! ```
//!
//! Every `*.yaml` file in the output directory is treated as generated and is
//! removed before new actions are written. Files are written one at a time;
//! each write is atomic (temp file + rename) but the directory as a whole is
//! not.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::action::{ActionDescriptor, ActionSet};
use crate::errors::GeneratorError;

/// Extension of generated action files.
pub const ACTION_EXTENSION: &str = "yaml";

const TEMPLATE_NAME: &str = "action";

/// Errors raised while loading or rendering the action template.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read template '{path}': {source}")]
    ReadTemplate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid action template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to render {action}: {source}")]
    Render {
        action: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Variables passed to the template for one action.
#[derive(Serialize)]
struct TemplateContext<'a> {
    schema_version: &'a str,
    version: &'a str,
    action_name: &'a str,
    #[serde(flatten)]
    action: &'a ActionDescriptor,
}

/// A compiled action template.
pub struct ActionRenderer {
    env: Environment<'static>,
}

impl ActionRenderer {
    /// Compiles a template from source.
    ///
    /// Output is not HTML-escaped; templates are expected to quote values
    /// themselves (e.g. with `tojson`).
    pub fn from_source(source: impl Into<String>) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    /// Reads and compiles a template file.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let source = fs::read_to_string(path).map_err(|source| RenderError::ReadTemplate {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Loaded action template from {}", path.display());
        Self::from_source(source)
    }

    /// Renders one action.
    pub fn render(
        &self,
        schema_version: &str,
        action: &ActionDescriptor,
    ) -> Result<String, RenderError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let context = TemplateContext {
            schema_version,
            version: schema_version,
            action_name: &action.name,
            action,
        };
        template
            .render(context)
            .map_err(|source| RenderError::Render {
                action: action.name.clone(),
                source,
            })
    }
}

/// Path of the file an action is written to.
pub fn action_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{name}.{ACTION_EXTENSION}"))
}

/// Removes every previously generated action file from `output_dir`.
///
/// Returns the number of files removed. Subdirectories and files with other
/// extensions are left alone.
pub fn remove_generated(output_dir: &Path) -> Result<usize, GeneratorError> {
    info!("Deleting all actions from {}", output_dir.display());

    let dir_error = |source| GeneratorError::OutputDir {
        path: output_dir.display().to_string(),
        source,
    };

    let mut removed = 0;
    for entry in fs::read_dir(output_dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != ACTION_EXTENSION) {
            continue;
        }
        fs::remove_file(&path).map_err(|source| GeneratorError::RemoveError {
            path: path.display().to_string(),
            source,
        })?;
        removed += 1;
    }

    debug!("Removed {removed} stale actions");
    Ok(removed)
}

/// Writes file atomically (write to temp, then rename).
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(GeneratorError::WriteError {
            path: path.display().to_string(),
            source: e,
        });
    }

    Ok(())
}

/// Renders every action and writes it to `<output_dir>/<name>.yaml`.
///
/// Returns the number of files written. Stops at the first failure, leaving
/// the actions written so far in place.
pub fn write_actions(
    output_dir: &Path,
    renderer: &ActionRenderer,
    schema_version: &str,
    actions: &ActionSet,
) -> Result<usize, GeneratorError> {
    for action in actions {
        let rendered = renderer.render(schema_version, action)?;
        let path = action_path(output_dir, &action.name);
        write_atomic(&path, &rendered)?;
        debug!("Wrote {}", path.display());
    }

    info!("Wrote {} actions to {}", actions.len(), output_dir.display());
    Ok(actions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Parameter;
    use crate::schema::HttpVerb;
    use tempfile::TempDir;

    const BUNDLED_TEMPLATE: &str = include_str!("../../action-template.jinja2");

    fn sites_action() -> ActionDescriptor {
        ActionDescriptor {
            name: "patch.dcim.sites".to_string(),
            description: "Patch a site object.".to_string(),
            parameters: vec![
                Parameter {
                    name: "tags".to_string(),
                    kind: "array".to_string(),
                    description: "Array of tag strings".to_string(),
                    required: false,
                },
                Parameter::object_id("ID of the object to patch."),
            ],
            endpoint_uri: "/dcim/sites/{{ id }}/".to_string(),
            verb: HttpVerb::Patch,
            immutable: true,
            get_detail_route_eligible: true,
        }
    }

    fn action_set(actions: Vec<ActionDescriptor>) -> ActionSet {
        let mut set = ActionSet::new();
        for action in actions {
            set.insert(action);
        }
        set
    }

    #[test]
    fn template_sees_every_variable() {
        let renderer = ActionRenderer::from_source(
            "{{ action_name }}|{{ schema_version }}|{{ version }}|{{ verb }}|{{ endpoint_uri }}|\
             {{ immutable }}|{{ get_detail_route_eligible }}|{{ parameters | length }}|{{ description }}",
        )
        .unwrap();

        let rendered = renderer.render("4.1.0", &sites_action()).unwrap();

        assert_eq!(
            rendered,
            "patch.dcim.sites|4.1.0|4.1.0|patch|/dcim/sites/{{ id }}/|True|True|2|Patch a site object."
        );
    }

    #[test]
    fn booleans_render_as_yaml_through_tojson() {
        let renderer = ActionRenderer::from_source(
            "{{ immutable | tojson }}|{{ get_detail_route_eligible | tojson }}",
        )
        .unwrap();
        let mut action = sites_action();
        action.get_detail_route_eligible = false;

        assert_eq!(renderer.render("4.1.0", &action).unwrap(), "true|false");
    }

    #[test]
    fn output_is_not_html_escaped() {
        let renderer = ActionRenderer::from_source("{{ description }}").unwrap();
        let mut action = sites_action();
        action.description = "Sites & <regions>".to_string();

        assert_eq!(renderer.render("4.1.0", &action).unwrap(), "Sites & <regions>");
    }

    #[test]
    fn invalid_template_is_rejected() {
        let result = ActionRenderer::from_source("{% for p in parameters %}");
        assert!(matches!(result, Err(RenderError::Template(_))));
    }

    #[test]
    fn missing_template_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = ActionRenderer::from_file(&dir.path().join("nope.jinja2"));
        assert!(matches!(result, Err(RenderError::ReadTemplate { .. })));
    }

    #[test]
    fn bundled_template_renders_yaml() {
        let renderer = ActionRenderer::from_source(BUNDLED_TEMPLATE).unwrap();
        let rendered = renderer.render("4.1.0", &sites_action()).unwrap();

        let doc: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(doc["name"], "patch.dcim.sites");
        assert_eq!(doc["parameters"]["tags"]["description"], "Array of tag strings");
        assert_eq!(doc["parameters"]["id"]["type"], "integer");
        assert_eq!(doc["parameters"]["id"]["required"], true);
        assert_eq!(
            doc["parameters"]["endpoint_uri"]["default"],
            "/dcim/sites/{{ id }}/"
        );
        assert_eq!(doc["parameters"]["http_verb"]["default"], "patch");
        assert_eq!(doc["parameters"]["netbox_version"]["default"], "4.1.0");
    }

    #[test]
    fn remove_generated_only_touches_action_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("get.dcim.sites.yaml"), "old").unwrap();
        fs::write(dir.path().join("run.py"), "keep").unwrap();
        fs::write(dir.path().join("notes.yml"), "keep").unwrap();
        fs::create_dir(dir.path().join("lib.yaml")).unwrap();

        let removed = remove_generated(dir.path()).unwrap();

        assert_eq!(removed, 1);
        assert!(!dir.path().join("get.dcim.sites.yaml").exists());
        assert!(dir.path().join("run.py").exists());
        assert!(dir.path().join("notes.yml").exists());
        assert!(dir.path().join("lib.yaml").is_dir());
    }

    #[test]
    fn remove_generated_requires_existing_dir() {
        let dir = TempDir::new().unwrap();
        let result = remove_generated(&dir.path().join("missing"));
        assert!(matches!(result, Err(GeneratorError::OutputDir { .. })));
    }

    #[test]
    fn write_actions_creates_one_file_per_action() {
        let dir = TempDir::new().unwrap();
        let mut post = sites_action();
        post.name = "post.dcim.sites".to_string();
        post.verb = HttpVerb::Post;
        let actions = action_set(vec![sites_action(), post]);
        let renderer = ActionRenderer::from_source("{{ action_name }} {{ verb }}").unwrap();

        let written = write_actions(dir.path(), &renderer, "4.1.0", &actions).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("patch.dcim.sites.yaml")).unwrap(),
            "patch.dcim.sites patch"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("post.dcim.sites.yaml")).unwrap(),
            "post.dcim.sites post"
        );
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("get.dcim.sites.yaml");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), "x").unwrap();

        let result = write_atomic(&target, "name: get.dcim.sites");

        assert!(matches!(result, Err(GeneratorError::WriteError { .. })));
        assert!(!dir.path().join("get.dcim.sites.tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn action_path_keeps_dotted_name() {
        assert_eq!(
            action_path(Path::new("actions"), "get.dcim.sites"),
            PathBuf::from("actions/get.dcim.sites.yaml")
        );
    }
}
