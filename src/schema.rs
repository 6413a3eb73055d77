//! Schema types and structures
//!
//! A draft-07 flavored JSON Schema node. Fields at their default are omitted
//! when serialized, so the JSON produced is exactly the keywords that were set.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Default prefix for definition references
pub const DEFAULT_DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Primitive JSON type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl SimpleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimpleType::Array => "array",
            SimpleType::Boolean => "boolean",
            SimpleType::Integer => "integer",
            SimpleType::Null => "null",
            SimpleType::Number => "number",
            SimpleType::Object => "object",
            SimpleType::String => "string",
        }
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` keyword: a single kind or a union of kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Type {
    Simple(SimpleType),
    Multiple(Vec<SimpleType>),
}

impl Type {
    /// All kinds named by this designator
    pub fn kinds(&self) -> Vec<SimpleType> {
        match self {
            Type::Simple(t) => vec![*t],
            Type::Multiple(ts) => ts.clone(),
        }
    }

    pub fn contains(&self, kind: SimpleType) -> bool {
        match self {
            Type::Simple(t) => *t == kind,
            Type::Multiple(ts) => ts.contains(&kind),
        }
    }
}

impl From<SimpleType> for Type {
    fn from(t: SimpleType) -> Self {
        Type::Simple(t)
    }
}

/// Either a full schema or the boolean shorthand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[allow(clippy::large_enum_variant)]
pub enum SchemaOrBool {
    /// `true` accepts anything, `false` accepts nothing
    Bool(bool),
    Schema(Schema),
}

impl SchemaOrBool {
    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrBool::Schema(s) => Some(s),
            SchemaOrBool::Bool(_) => None,
        }
    }
}

impl From<Schema> for SchemaOrBool {
    fn from(s: Schema) -> Self {
        SchemaOrBool::Schema(s)
    }
}

impl From<bool> for SchemaOrBool {
    fn from(b: bool) -> Self {
        SchemaOrBool::Bool(b)
    }
}

/// A named definition reference: prefix plus definition name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    pub prefix: String,
    pub name: String,
}

impl Ref {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// The document root reference (`#`)
    pub fn root() -> Self {
        Self::new("#", "")
    }

    /// Rendered reference string
    pub fn path(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }

    /// Schema consisting only of this reference
    pub fn schema(&self) -> Schema {
        Schema::reference(self.path())
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.name)
    }
}

/// Serialize `Option<f64>` as an integer when it has no fractional part,
/// so bounds read `1` rather than `1.0`.
#[allow(clippy::ref_option)]
fn serialize_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
            #[allow(clippy::cast_possible_truncation)]
            let int_val = *v as i64;
            serializer.serialize_some(&int_val)
        }
        Some(v) => serializer.serialize_some(v),
        None => serializer.serialize_none(),
    }
}

/// JSON Schema node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Reference to a definition; see [`Schema::ref_is_clean`]
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "$comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<Type>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub r#const: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,

    // Number constraints
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_number")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_number")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_number")]
    pub exclusive_maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_number")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_number")]
    pub exclusive_minimum: Option<f64>,

    // String constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,

    // Array constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<Box<SchemaOrBool>>,

    // Object constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<BTreeMap<String, SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Box<SchemaOrBool>>,

    // Composition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaOrBool>>,
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub r#if: Option<Box<SchemaOrBool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<Box<SchemaOrBool>>,
    #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
    pub r#else: Option<Box<SchemaOrBool>>,

    // Annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<BTreeMap<String, SchemaOrBool>>,

    /// Extension keywords (`x-*`)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Schema {
    /// Empty schema, accepts anything
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema with a single type
    pub fn with_type(t: SimpleType) -> Self {
        Self {
            r#type: Some(Type::Simple(t)),
            ..Default::default()
        }
    }

    /// Schema consisting only of a reference
    pub fn reference(path: impl Into<String>) -> Self {
        Self {
            reference: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn is_ref(&self) -> bool {
        self.reference.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Kinds named by `type`, empty if unset
    pub fn types(&self) -> Vec<SimpleType> {
        self.r#type.as_ref().map(Type::kinds).unwrap_or_default()
    }

    pub fn has_type(&self, kind: SimpleType) -> bool {
        self.r#type.as_ref().is_some_and(|t| t.contains(kind))
    }

    /// First non-null kind named by `type`
    pub fn primary_type(&self) -> Option<SimpleType> {
        self.types().into_iter().find(|t| *t != SimpleType::Null)
    }

    /// Add a kind to the type union. `null` is kept first.
    ///
    /// Returns false when the schema has no `type` to extend.
    pub fn add_type(&mut self, kind: SimpleType) -> bool {
        let current = match self.r#type.take() {
            Some(t) => t,
            None => return false,
        };
        let mut kinds = current.kinds();
        if !kinds.contains(&kind) {
            if kind == SimpleType::Null {
                kinds.insert(0, kind);
            } else {
                kinds.push(kind);
            }
        }
        self.r#type = Some(if kinds.len() == 1 {
            Type::Simple(kinds[0])
        } else {
            Type::Multiple(kinds)
        });
        true
    }

    /// Remove a kind from the type union
    pub fn remove_type(&mut self, kind: SimpleType) {
        if let Some(t) = self.r#type.take() {
            let kinds: Vec<_> = t.kinds().into_iter().filter(|k| *k != kind).collect();
            self.r#type = match kinds.len() {
                0 => None,
                1 => Some(Type::Simple(kinds[0])),
                _ => Some(Type::Multiple(kinds)),
            };
        }
    }

    /// True when the schema is nothing but a (possibly nullable) scalar `type`
    pub fn is_trivial(&self) -> bool {
        let Some(t) = &self.r#type else {
            return false;
        };
        if t.contains(SimpleType::Object) || t.contains(SimpleType::Array) {
            return false;
        }
        let bare = Schema {
            r#type: self.r#type.clone(),
            ..Default::default()
        };
        *self == bare
    }

    /// True unless a `$ref` is accompanied by keywords other than description and deprecation
    pub fn ref_is_clean(&self) -> bool {
        if !self.is_ref() {
            return true;
        }
        let allowed = Schema {
            reference: self.reference.clone(),
            description: self.description.clone(),
            deprecated: self.deprecated,
            ..Default::default()
        };
        *self == allowed
    }

    /// Move a `$ref` carrying sibling keywords into `allOf`
    pub fn normalize_ref(&mut self) {
        if self.ref_is_clean() {
            return;
        }
        if let Some(reference) = self.reference.take() {
            let mut all_of = self.all_of.take().unwrap_or_default();
            all_of.insert(0, Schema::reference(reference).into());
            self.all_of = Some(all_of);
        }
    }

    /// Properties map, created on first use
    pub fn properties_mut(&mut self) -> &mut BTreeMap<String, SchemaOrBool> {
        self.properties.get_or_insert_with(BTreeMap::new)
    }

    /// Whether the object declares any properties
    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Mark a property as required, keeping the list free of duplicates
    pub fn add_required(&mut self, name: &str) {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }

    pub fn to_json_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
