//! Typed view of the parts of an OpenAPI v3 document the generator reads.
//!
//! Only the fields needed for action synthesis are modelled. Everything else in
//! the document is ignored during deserialization.
//!
//! JSON objects whose iteration order matters (`paths`, the operations inside a
//! path item, and component `properties`) are decoded into [`OrderedMap`] or
//! [`PathItem`] so the generated actions follow the order the NetBox schema
//! declares them in.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Type reported for properties and parameters that do not declare one.
pub const DEFAULT_TYPE: &str = "object";

/// HTTP verbs that may key an operation inside an OpenAPI path item.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use netbox_action_gen::schema::HttpVerb;
///
/// assert_eq!(HttpVerb::from_str("patch").unwrap(), HttpVerb::Patch);
/// assert_eq!(HttpVerb::Delete.to_string(), "delete");
/// assert!(HttpVerb::from_str("parameters").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HttpVerb {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

/// A JSON object decoded into a vector of entries, keeping document order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    /// Iterates entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// The operations declared under one path, in document order.
///
/// Keys that are not HTTP verbs (`parameters`, `summary`, `servers`, ...)
/// are skipped while decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub operations: Vec<(HttpVerb, Operation)>,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathItemVisitor;

        impl<'de> Visitor<'de> for PathItemVisitor {
            type Value = PathItem;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an OpenAPI path item object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut operations = Vec::new();
                while let Some(key) = access.next_key::<String>()? {
                    match HttpVerb::from_str(&key) {
                        Ok(verb) => operations.push((verb, access.next_value::<Operation>()?)),
                        Err(_) => {
                            access.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(PathItem { operations })
            }
        }

        deserializer.deserialize_map(PathItemVisitor)
    }
}

/// A single operation (one verb on one path).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<OperationParameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
}

impl Operation {
    /// True for collection GETs, which NetBox names `<app>_<model>_list`.
    pub fn is_list(&self) -> bool {
        self.operation_id
            .as_deref()
            .is_some_and(|id| id.ends_with("_list"))
    }

    /// The `$ref` of the `application/json` request body schema, if any.
    pub fn json_body_ref(&self) -> Option<&str> {
        self.request_body
            .as_ref()?
            .content
            .get("application/json")?
            .schema
            .as_ref()?
            .reference
            .as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: HashMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<SchemaRef>,
}

/// A schema object that may point at a named component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
}

/// A declared operation parameter (query, path or header).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OperationParameter {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: ParameterKind,
}

/// Where a parameter's type information lives.
///
/// OpenAPI v3 puts it in a nested `schema` object; older (Swagger-style)
/// parameters carry a flat `type` field instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterKind {
    Schema {
        schema: TypeSchema,
    },
    Flat {
        #[serde(rename = "type")]
        kind: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TypeSchema {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl OperationParameter {
    /// The declared type, wherever it was declared.
    pub fn declared_type(&self) -> &str {
        match &self.kind {
            ParameterKind::Schema { schema } => schema.kind.as_deref().unwrap_or(DEFAULT_TYPE),
            ParameterKind::Flat { kind } => kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: HashMap<String, ComponentSchema>,
}

/// A named object schema under `components.schemas`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComponentSchema {
    #[serde(default)]
    pub properties: OrderedMap<Property>,
    /// Absent in the document means no property is required.
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Info {
    pub version: String,
}

/// The fetched OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpenApiSchema {
    pub info: Info,
    pub paths: OrderedMap<PathItem>,
    #[serde(default)]
    pub components: Components,
}

impl OpenApiSchema {
    /// The NetBox release, without the trailing API version.
    ///
    /// NetBox reports `info.version` as e.g. `"3.6.9 (3.6)"`; this returns
    /// `"3.6.9"`.
    pub fn schema_version(&self) -> &str {
        self.info
            .version
            .split(' ')
            .next()
            .unwrap_or(&self.info.version)
    }

    /// Resolves a `#/components/schemas/<Name>` reference by its last segment.
    pub fn component(&self, reference: &str) -> Option<&ComponentSchema> {
        let name = reference.rsplit('/').next()?;
        self.components.schemas.get(name)
    }
}
