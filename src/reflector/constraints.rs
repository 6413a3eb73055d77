//! Constraint Extractor
//!
//! Reads validation keywords and annotations from field tags into the
//! property schema. Literal values (`default`, `const`, `enum`, examples) are
//! typed after the resolved property type.

use regex::Regex;
use serde_json::{Number, Value};

use crate::error::{ReflectError, Result};
use crate::schema::{Schema, SchemaOrBool, SimpleType};
use crate::tags::Tags;

/// How literal tag values are decoded for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralKind {
    Integer,
    Number,
    Boolean,
    String,
    /// Array of strings: `[a,b]` is accepted besides JSON
    StringArray,
    /// Anything else is decoded as JSON
    Json,
}

impl LiteralKind {
    /// Literal kind of a resolved (non-reference) property schema
    pub fn of(schema: &Schema) -> Self {
        match schema.primary_type() {
            Some(SimpleType::Integer) => LiteralKind::Integer,
            Some(SimpleType::Number) => LiteralKind::Number,
            Some(SimpleType::Boolean) => LiteralKind::Boolean,
            Some(SimpleType::String) => LiteralKind::String,
            Some(SimpleType::Array) => {
                let items = schema.items.as_deref().and_then(SchemaOrBool::as_schema);
                match items.and_then(Schema::primary_type) {
                    Some(SimpleType::String) => LiteralKind::StringArray,
                    _ => LiteralKind::Json,
                }
            }
            _ => LiteralKind::Json,
        }
    }
}

/// Field-level facts the walker needs besides the schema keywords
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldConstraints {
    pub required: bool,
    /// Explicit `nullable` override
    pub nullable: Option<bool>,
}

/// Apply all recognized tag keys to `property`
pub(crate) fn apply(
    tags: &Tags,
    literal: LiteralKind,
    property: &mut Schema,
    path: &str,
) -> Result<FieldConstraints> {
    let parser = TagReader { tags, path };

    if let Some(title) = tags.get("title") {
        property.title = Some(title.to_string());
    }
    if let Some(description) = tags.get("description") {
        property.description = Some(description.to_string());
    }
    if let Some(format) = tags.get("format") {
        property.format = Some(format.to_string());
    }
    if let Some(pattern) = tags.get("pattern") {
        Regex::new(pattern).map_err(|e| parser.error("pattern", pattern, e.to_string()))?;
        property.pattern = Some(pattern.to_string());
    }
    if let Some(media_type) = tags.get("contentMediaType") {
        property.content_media_type = Some(media_type.to_string());
    }
    if let Some(encoding) = tags.get("contentEncoding") {
        property.content_encoding = Some(encoding.to_string());
    }

    set(&mut property.minimum, parser.number("minimum")?);
    set(&mut property.maximum, parser.number("maximum")?);
    set(&mut property.exclusive_minimum, parser.number("exclusiveMinimum")?);
    set(&mut property.exclusive_maximum, parser.number("exclusiveMaximum")?);
    set(&mut property.multiple_of, parser.number("multipleOf")?);

    set(&mut property.min_length, parser.count("minLength")?);
    set(&mut property.max_length, parser.count("maxLength")?);
    set(&mut property.min_items, parser.count("minItems")?);
    set(&mut property.max_items, parser.count("maxItems")?);
    set(&mut property.min_properties, parser.count("minProperties")?);
    set(&mut property.max_properties, parser.count("maxProperties")?);

    set(&mut property.unique_items, parser.boolean("uniqueItems")?);
    set(&mut property.read_only, parser.boolean("readOnly")?);
    set(&mut property.write_only, parser.boolean("writeOnly")?);
    set(&mut property.deprecated, parser.boolean("deprecated")?);

    if let Some(raw) = tags.get("enum") {
        let values = raw
            .split(',')
            .map(|item| match literal {
                LiteralKind::Integer | LiteralKind::Number | LiteralKind::Boolean => {
                    decode_literal(literal, item.trim())
                        .map_err(|reason| parser.error("enum", raw, reason))
                }
                _ => Ok(Value::String(item.to_string())),
            })
            .collect::<Result<Vec<_>>>()?;
        property.r#enum = Some(values);
    }

    set(&mut property.default, parser.literal("default", literal)?);
    set(&mut property.r#const, parser.literal("const", literal)?);
    if let Some(example) = parser.literal("example", literal)? {
        property.examples.get_or_insert_with(Vec::new).push(example);
    }
    if let Some(raw) = tags.get("examples") {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(values)) => {
                property.examples.get_or_insert_with(Vec::new).extend(values);
            }
            Ok(_) => return Err(parser.error("examples", raw, "expected a JSON array".to_string())),
            Err(e) => return Err(parser.error("examples", raw, e.to_string())),
        }
    }

    Ok(FieldConstraints {
        required: parser.boolean("required")?.unwrap_or(false),
        nullable: parser.boolean("nullable")?,
    })
}

/// Overwrite only when the tag was present
fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Typed access to tag values with path-aware errors
pub(crate) struct TagReader<'a> {
    pub tags: &'a Tags,
    pub path: &'a str,
}

impl TagReader<'_> {
    pub fn error(&self, keyword: &str, value: &str, reason: String) -> ReflectError {
        ReflectError::TagParse {
            path: self.path.to_string(),
            keyword: keyword.to_string(),
            value: value.to_string(),
            reason,
        }
    }

    pub fn boolean(&self, key: &str) -> Result<Option<bool>> {
        self.tags
            .get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<bool>()
                    .map_err(|e| self.error(key, raw, e.to_string()))
            })
            .transpose()
    }

    fn number(&self, key: &str) -> Result<Option<f64>> {
        self.tags
            .get(key)
            .map(|raw| match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                Ok(_) => Err(self.error(key, raw, "number must be finite".to_string())),
                Err(e) => Err(self.error(key, raw, e.to_string())),
            })
            .transpose()
    }

    fn count(&self, key: &str) -> Result<Option<u64>> {
        self.tags
            .get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| self.error(key, raw, e.to_string()))
            })
            .transpose()
    }

    fn literal(&self, key: &str, kind: LiteralKind) -> Result<Option<Value>> {
        self.tags
            .get(key)
            .map(|raw| decode_literal(kind, raw).map_err(|reason| self.error(key, raw, reason)))
            .transpose()
    }
}

/// Decode a literal tag value for a property of the given kind
pub(crate) fn decode_literal(kind: LiteralKind, raw: &str) -> std::result::Result<Value, String> {
    match kind {
        LiteralKind::Integer => {
            let trimmed = raw.trim();
            if let Ok(v) = trimmed.parse::<i64>() {
                Ok(Value::from(v))
            } else if let Ok(v) = trimmed.parse::<u64>() {
                Ok(Value::from(v))
            } else {
                decode_literal(LiteralKind::Number, raw)
            }
        }
        LiteralKind::Number => {
            let v = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
            Number::from_f64(v)
                .map(Value::Number)
                .ok_or_else(|| "number must be finite".to_string())
        }
        LiteralKind::Boolean => raw
            .trim()
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|e| e.to_string()),
        LiteralKind::String => Ok(Value::String(raw.to_string())),
        LiteralKind::StringArray => match serde_json::from_str::<Value>(raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                let inner = raw
                    .trim()
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .ok_or_else(|| e.to_string())?;
                Ok(Value::Array(
                    inner
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| Value::String(s.to_string()))
                        .collect(),
                ))
            }
        },
        LiteralKind::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
    }
}
