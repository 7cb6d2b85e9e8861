//! Action naming and endpoint URI templates derived from OpenAPI paths.
//!
//! NetBox paths look like `/api/dcim/sites/{id}/`. Actions are named after the
//! path with the `/api` prefix and any `{id}` segment removed, so the list and
//! detail routes of one model share a name.

use crate::schema::HttpVerb;

const API_PREFIX: &str = "/api";
const ID_PLACEHOLDER: &str = "{id}";
const ID_SEGMENT: &str = "/{id}";

/// How the id placeholder appears in the rendered endpoint URI.
pub const ID_TEMPLATE: &str = "{{ id }}";

/// Where, if anywhere, a path addresses a single object by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPlacement {
    /// Collection route such as `/api/dcim/sites/`.
    Absent,
    /// Detail route such as `/api/dcim/sites/{id}/`.
    Trailing,
    /// Nested route such as `/api/dcim/racks/{id}/elevation/`.
    Inner,
}

/// Removes a leading `/api` path segment.
///
/// ## Examples
///
/// ```
/// use netbox_action_gen::path::strip_api_prefix;
///
/// assert_eq!(strip_api_prefix("/api/dcim/sites/"), "/dcim/sites/");
/// assert_eq!(strip_api_prefix("/status/"), "/status/");
/// ```
pub fn strip_api_prefix(path: &str) -> &str {
    match path.strip_prefix(API_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Splits a path into the segments that make up an action name.
///
/// `{id}` segments are dropped and hyphens become underscores.
pub fn name_segments(path: &str) -> Vec<String> {
    strip_api_prefix(path)
        .replace(ID_SEGMENT, "")
        .trim_matches('/')
        .split('/')
        .map(|segment| segment.replace('-', "_"))
        .collect()
}

/// Builds the action name `<verb>.<segment>.<segment>...`.
///
/// ## Examples
///
/// ```
/// use netbox_action_gen::path::action_name;
/// use netbox_action_gen::schema::HttpVerb;
///
/// assert_eq!(action_name(HttpVerb::Get, "/api/dcim/sites/"), "get.dcim.sites");
/// assert_eq!(
///     action_name(HttpVerb::Patch, "/api/dcim/console-ports/{id}/"),
///     "patch.dcim.console_ports"
/// );
/// ```
pub fn action_name(verb: HttpVerb, path: &str) -> String {
    format!("{}.{}", verb, name_segments(path).join("."))
}

/// Builds the endpoint URI template stored on an action.
///
/// ## Examples
///
/// ```
/// use netbox_action_gen::path::endpoint_uri;
///
/// assert_eq!(endpoint_uri("/api/dcim/sites/{id}/"), "/dcim/sites/{{ id }}/");
/// ```
pub fn endpoint_uri(path: &str) -> String {
    strip_api_prefix(path).replace(ID_PLACEHOLDER, ID_TEMPLATE)
}

/// Classifies where the `{id}` placeholder sits in a path.
///
/// A trailing `/` is ignored, so `/api/dcim/sites/{id}/` is a detail route.
pub fn id_placement(path: &str) -> IdPlacement {
    if path.trim_end_matches('/').ends_with(ID_SEGMENT) {
        IdPlacement::Trailing
    } else if path.contains(ID_PLACEHOLDER) {
        IdPlacement::Inner
    } else {
        IdPlacement::Absent
    }
}
