//! Capability contracts
//!
//! A type customizes its own schema by implementing any of these traits and
//! registering them on its [`TypeInfo`](super::TypeInfo) (`with_title`,
//! `with_exposer`, ...). The walker probes the registered capabilities in
//! declaration order.

use serde_json::Value;
use std::fmt;

use super::TypeFn;
use crate::error::HookError;
use crate::schema::Schema;

/// Provides a `title`
pub trait Titled {
    fn json_schema_title() -> String;
}

/// Provides a `description`
pub trait Described {
    fn json_schema_description() -> String;
}

/// Provides `enum` values
pub trait Enumerated {
    fn json_schema_enum() -> Vec<Value>;
}

/// Provides `enum` values with display names, emitted as `x-enum-names`
pub trait NamedEnumerated {
    fn json_schema_named_enum() -> Vec<(Value, String)>;
}

/// Provides the complete schema, replacing default expansion
pub trait Exposer {
    fn json_schema() -> Result<Schema, HookError>;
}

/// Provides the complete schema as raw JSON bytes
pub trait RawExposer {
    fn json_schema_bytes() -> Result<Vec<u8>, HookError>;
}

/// Adjusts the schema after default expansion
pub trait Preparer {
    fn prepare_json_schema(schema: &mut Schema) -> Result<(), HookError>;
}

pub trait OneOfExposer {
    fn json_schema_one_of() -> Vec<TypeFn>;
}

pub trait AnyOfExposer {
    fn json_schema_any_of() -> Vec<TypeFn>;
}

pub trait AllOfExposer {
    fn json_schema_all_of() -> Vec<TypeFn>;
}

pub trait NotExposer {
    fn json_schema_not() -> TypeFn;
}

pub trait IfExposer {
    fn json_schema_if() -> TypeFn;
}

pub trait ThenExposer {
    fn json_schema_then() -> TypeFn;
}

pub trait ElseExposer {
    fn json_schema_else() -> TypeFn;
}

/// A registered capability
#[derive(Clone, Copy)]
pub enum Capability {
    Title(fn() -> String),
    Description(fn() -> String),
    Enum(fn() -> Vec<Value>),
    NamedEnum(fn() -> Vec<(Value, String)>),
    Exposer(fn() -> Result<Schema, HookError>),
    RawExposer(fn() -> Result<Vec<u8>, HookError>),
    Preparer(fn(&mut Schema) -> Result<(), HookError>),
    OneOf(fn() -> Vec<TypeFn>),
    AnyOf(fn() -> Vec<TypeFn>),
    AllOf(fn() -> Vec<TypeFn>),
    Not(fn() -> TypeFn),
    If(fn() -> TypeFn),
    Then(fn() -> TypeFn),
    Else(fn() -> TypeFn),
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Title(_) => "title",
            Capability::Description(_) => "description",
            Capability::Enum(_) => "enum",
            Capability::NamedEnum(_) => "named_enum",
            Capability::Exposer(_) => "exposer",
            Capability::RawExposer(_) => "raw_exposer",
            Capability::Preparer(_) => "preparer",
            Capability::OneOf(_) => "one_of",
            Capability::AnyOf(_) => "any_of",
            Capability::AllOf(_) => "all_of",
            Capability::Not(_) => "not",
            Capability::If(_) => "if",
            Capability::Then(_) => "then",
            Capability::Else(_) => "else",
        }
    }

    /// Whether this capability replaces default expansion
    pub fn is_exposer(&self) -> bool {
        matches!(self, Capability::Exposer(_) | Capability::RawExposer(_))
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability::{}", self.name())
    }
}
