//! Action descriptors: the flattened, template-friendly view of an operation.

use std::collections::HashMap;

use serde::Serialize;

use crate::schema::HttpVerb;

/// One input of a generated action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub required: bool,
}

impl Parameter {
    /// The required integer `id` appended to actions that address one object.
    pub fn object_id(description: impl Into<String>) -> Self {
        Self {
            name: "id".to_string(),
            kind: "integer".to_string(),
            description: description.into(),
            required: true,
        }
    }
}

/// A synthesized action, ready to be rendered.
///
/// Every field except `name` is exposed to the template under its own name;
/// `name` is passed as `action_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    #[serde(skip)]
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub endpoint_uri: String,
    pub verb: HttpVerb,
    pub immutable: bool,
    pub get_detail_route_eligible: bool,
}

impl ActionDescriptor {
    pub fn required_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.required)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Actions keyed by name, in first-insertion order.
///
/// Inserting a name that already exists replaces the stored action but keeps
/// its original position.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    actions: Vec<ActionDescriptor>,
    index: HashMap<String, usize>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an action, returning the one it replaced, if any.
    pub fn insert(&mut self, action: ActionDescriptor) -> Option<ActionDescriptor> {
        match self.index.get(&action.name) {
            Some(&slot) => Some(std::mem::replace(&mut self.actions[slot], action)),
            None => {
                self.index.insert(action.name.clone(), self.actions.len());
                self.actions.push(action);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ActionDescriptor> {
        self.index.get(name).map(|&slot| &self.actions[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<'a> IntoIterator for &'a ActionSet {
    type Item = &'a ActionDescriptor;
    type IntoIter = std::slice::Iter<'a, ActionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
