//! Action synthesis: turns OpenAPI operations into action descriptors.
//!
//! ## Rules
//!
//! | Verb                 | Emitted when                              | Parameters                         |
//! |----------------------|-------------------------------------------|------------------------------------|
//! | `get` (`*_list`)     | always                                    | the operation's declared parameters |
//! | `get` (`.../{id}/`)  | never; checked against the list action    | -                                  |
//! | `get` (`{id}` inner) | always, not detail-route eligible         | body + required `id`               |
//! | `delete/put/patch`   | always                                    | body + required `id`               |
//! | `post`               | path has no `{id}`                        | body                               |
//! | anything else        | never                                     | -                                  |
//!
//! Body parameters come from the `application/json` request body's component
//! schema. For `patch`, only `id` is ever considered required.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::action::{ActionDescriptor, ActionSet, Parameter};
use crate::path::{ID_TEMPLATE, IdPlacement, action_name, endpoint_uri, id_placement};
use crate::schema::{
    ComponentSchema, DEFAULT_TYPE, HttpVerb, OpenApiSchema, Operation, OperationParameter,
};

/// Description every `tags` parameter receives.
pub const TAGS_DESCRIPTION: &str = "Array of tag strings";

/// Errors that stop synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// A detail GET has no collection GET of the same name.
    #[error("Unable to find list action for deferred GET endpoint {action}")]
    MissingListAction { action: String },

    /// A request body points at a component the schema does not define.
    #[error("Request body of {action} references unknown component '{reference}'")]
    UnknownComponent { action: String, reference: String },
}

/// What happens to a single operation.
#[derive(Debug)]
enum Disposition {
    Emit(ActionDescriptor),
    /// Detail GET; only checked once every path has been processed.
    Defer(String),
    Skip,
}

/// Synthesizes every action described by `schema`.
///
/// Actions are returned in path order. Detail GET routes are not emitted;
/// each must have a list action of the same name, otherwise
/// [`SynthesisError::MissingListAction`] is returned.
pub fn synthesize(schema: &OpenApiSchema) -> Result<ActionSet, SynthesisError> {
    info!("Generating actions from {} paths", schema.paths.len());

    let mut actions = ActionSet::new();
    let mut deferred = Vec::new();

    for (path, item) in schema.paths.iter() {
        for (verb, operation) in &item.operations {
            match synthesize_operation(schema, path, *verb, operation)? {
                Disposition::Emit(action) => record(&mut actions, action),
                Disposition::Defer(name) => deferred.push(name),
                Disposition::Skip => {}
            }
        }
    }

    for name in deferred {
        if !actions.contains(&name) {
            return Err(SynthesisError::MissingListAction { action: name });
        }
        debug!("Detail route for {name} is served by its list action");
    }

    info!("Synthesized {} actions", actions.len());
    Ok(actions)
}

/// Inserts an action, reporting name collisions.
///
/// A list route and a detail route of the same model (`/dcim/sites/` and
/// `/dcim/sites/{{ id }}/`) collide by construction; any other collision is
/// surfaced as a warning.
fn record(actions: &mut ActionSet, action: ActionDescriptor) {
    let name = action.name.clone();
    let uri = action.endpoint_uri.clone();
    let Some(previous) = actions.insert(action) else {
        return;
    };

    let route = |uri: &str| uri.replace(&format!("/{ID_TEMPLATE}"), "");
    if route(&previous.endpoint_uri) == route(&uri) {
        debug!("{name}: {uri} replaces {}", previous.endpoint_uri);
    } else {
        warn!(
            action = %name,
            replaced = %previous.endpoint_uri,
            by = %uri,
            "Distinct endpoints normalize to the same action name"
        );
    }
}

fn synthesize_operation(
    schema: &OpenApiSchema,
    path: &str,
    verb: HttpVerb,
    operation: &Operation,
) -> Result<Disposition, SynthesisError> {
    if matches!(verb, HttpVerb::Options | HttpVerb::Head | HttpVerb::Trace) {
        return Ok(Disposition::Skip);
    }

    let name = action_name(verb, path);
    let placement = id_placement(path);
    debug!("Processing {name} ...");

    let parameters = body_parameters(schema, &name, verb, operation)?;
    let mut action = ActionDescriptor {
        name,
        description: operation.description.clone().unwrap_or_default(),
        parameters,
        endpoint_uri: endpoint_uri(path),
        verb,
        immutable: true,
        get_detail_route_eligible: true,
    };

    let disposition = match verb {
        HttpVerb::Get if operation.is_list() => {
            action.parameters = operation.parameters.iter().map(declared_parameter).collect();
            Disposition::Emit(action)
        }
        HttpVerb::Get => match placement {
            IdPlacement::Trailing => Disposition::Defer(action.name),
            IdPlacement::Inner => {
                action
                    .parameters
                    .push(Parameter::object_id("ID of the object."));
                action.get_detail_route_eligible = false;
                Disposition::Emit(action)
            }
            IdPlacement::Absent => Disposition::Skip,
        },
        HttpVerb::Delete | HttpVerb::Put | HttpVerb::Patch => {
            action
                .parameters
                .push(Parameter::object_id(format!("ID of the object to {verb}.")));
            Disposition::Emit(action)
        }
        HttpVerb::Post if placement == IdPlacement::Absent => Disposition::Emit(action),
        _ => Disposition::Skip,
    };

    Ok(disposition)
}

/// Parameters taken from the operation's JSON request body, if it has one.
fn body_parameters(
    schema: &OpenApiSchema,
    action: &str,
    verb: HttpVerb,
    operation: &Operation,
) -> Result<Vec<Parameter>, SynthesisError> {
    let Some(reference) = operation.json_body_ref() else {
        return Ok(Vec::new());
    };

    let component =
        schema
            .component(reference)
            .ok_or_else(|| SynthesisError::UnknownComponent {
                action: action.to_string(),
                reference: reference.to_string(),
            })?;

    Ok(component_parameters(component, verb))
}

/// Converts the writable properties of a component into parameters.
///
/// `readOnly` properties are skipped. For [`HttpVerb::Patch`] the
/// component's `required` list is ignored and only `id` counts as required.
pub fn component_parameters(component: &ComponentSchema, verb: HttpVerb) -> Vec<Parameter> {
    component
        .properties
        .iter()
        .filter(|(_, property)| !property.read_only)
        .map(|(name, property)| {
            let required = match verb {
                HttpVerb::Patch => name == "id",
                _ => component.required.iter().any(|r| r == name),
            };
            let description = property
                .title
                .clone()
                .or_else(|| property.description.clone())
                .unwrap_or_else(|| humanize(name));

            sanitize(Parameter {
                name: name.to_string(),
                kind: property.kind.as_deref().unwrap_or(DEFAULT_TYPE).to_string(),
                description,
                required,
            })
        })
        .collect()
}

/// Converts a parameter declared on the operation itself.
pub fn declared_parameter(parameter: &OperationParameter) -> Parameter {
    sanitize(Parameter {
        name: parameter.name.clone(),
        kind: parameter.declared_type().to_string(),
        description: parameter
            .description
            .clone()
            .unwrap_or_else(|| humanize(&parameter.name)),
        required: parameter.required,
    })
}

/// Applies the rules shared by every parameter source.
fn sanitize(mut parameter: Parameter) -> Parameter {
    if parameter.name == "tags" {
        parameter.description = TAGS_DESCRIPTION.to_string();
    }
    if parameter.kind == "number" {
        parameter.kind = "integer".to_string();
    }
    parameter
}

/// `primary_ip4` -> `Primary ip4`.
fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
