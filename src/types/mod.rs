//! Type Descriptors
//!
//! Rust has no runtime reflection, so every type that can be turned into a
//! schema describes itself through [`Reflect::type_info`]. A [`TypeInfo`]
//! carries the facts the walker needs:
//!
//! - an identity ([`TypeKey`]) used to deduplicate definitions and guard cycles
//! - naming (anonymous, derived from the type path, or explicit)
//! - the [`Kind`] with nested types as lazy [`TypeFn`] handles, so recursive
//!   graphs stay finite
//! - the ordered list of [`Capability`] probes the type opts into
//!
//! ```
//! use schema_reflect::types::{Field, Reflect, TypeInfo};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Reflect for Person {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::object::<Self>(vec![
//!             Field::new::<String>("name").tag(r#"json:"name" required:"true""#),
//!             Field::new::<u32>("age").tag(r#"json:"age""#),
//!         ])
//!     }
//! }
//! ```

pub mod builtin;
pub mod capability;

pub use capability::{
    AllOfExposer, AnyOfExposer, Capability, Described, ElseExposer, Enumerated, Exposer,
    IfExposer, NamedEnumerated, NotExposer, OneOfExposer, Preparer, RawExposer, ThenExposer,
    Titled,
};

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;

/// Lazy handle to a type descriptor
pub type TypeFn = fn() -> TypeInfo;

/// Types that can describe their own schema-relevant structure
pub trait Reflect: 'static {
    fn type_info() -> TypeInfo;
}

/// Identity of a type after indirection is stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey(TypeId);

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey(TypeId::of::<T>())
    }
}

/// How a type earns a definition name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Naming {
    /// Never registered as a shared definition
    Anonymous,
    /// Name derived from the Rust type path
    Path,
    /// Name given by the type itself
    Explicit(Cow<'static, str>),
}

/// Structural kind of a type
#[derive(Debug, Clone)]
pub enum Kind {
    Bool,
    Integer,
    Number,
    String,
    /// Unit-like, serializes as `null`
    Null,
    /// Unconstrained value, yields the empty schema
    Any,
    /// Nullable pointer (`Option<T>`)
    Optional(TypeFn),
    /// Ordered sequence
    Sequence {
        items: TypeFn,
        unique: bool,
        len: Option<usize>,
    },
    /// String-keyed mapping
    Map { values: TypeFn },
    /// Struct with named fields
    Object(Vec<Field>),
    /// No schema mapping exists (function pointers, channels, ...)
    Unsupported(&'static str),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Null => "null",
            Kind::Any => "any",
            Kind::Optional(_) => "optional",
            Kind::Sequence { .. } => "sequence",
            Kind::Map { .. } => "map",
            Kind::Object(_) => "object",
            Kind::Unsupported(what) => what,
        }
    }
}

/// A struct field
#[derive(Debug, Clone)]
pub struct Field {
    /// Declared field name
    pub name: Cow<'static, str>,
    pub ty: TypeFn,
    /// Metadata tag string, see [`crate::tags`]
    pub tag: Cow<'static, str>,
    /// Embedded fields contribute their properties to the parent
    pub embedded: bool,
}

impl Field {
    pub fn new<T: Reflect + ?Sized>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ty: T::type_info,
            tag: Cow::Borrowed(""),
            embedded: false,
        }
    }

    /// An embedded (flattened) field
    pub fn embedded<T: Reflect + ?Sized>() -> Self {
        let type_name = std::any::type_name::<T>();
        let local = type_name
            .split('<')
            .next()
            .unwrap_or(type_name)
            .rsplit("::")
            .next()
            .unwrap_or(type_name);
        Self {
            name: Cow::Owned(local.to_string()),
            ty: T::type_info,
            tag: Cow::Borrowed(""),
            embedded: true,
        }
    }

    pub fn tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Descriptor of a type
#[derive(Clone)]
pub struct TypeInfo {
    key: TypeKey,
    type_name: &'static str,
    naming: Naming,
    kind: Kind,
    capabilities: Vec<Capability>,
}

impl TypeInfo {
    /// Descriptor of `T`
    pub fn of<T: Reflect + ?Sized>() -> Self {
        T::type_info()
    }

    /// Anonymous descriptor, always inlined
    pub fn new<T: ?Sized + 'static>(kind: Kind) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            type_name: std::any::type_name::<T>(),
            naming: Naming::Anonymous,
            kind,
            capabilities: Vec::new(),
        }
    }

    /// Named descriptor; the definition name derives from the type path
    pub fn named<T: ?Sized + 'static>(kind: Kind) -> Self {
        Self {
            naming: Naming::Path,
            ..Self::new::<T>(kind)
        }
    }

    /// Named descriptor with an explicit definition name
    pub fn named_as<T: ?Sized + 'static>(name: impl Into<Cow<'static, str>>, kind: Kind) -> Self {
        Self {
            naming: Naming::Explicit(name.into()),
            ..Self::new::<T>(kind)
        }
    }

    /// Named struct descriptor
    pub fn object<T: ?Sized + 'static>(fields: Vec<Field>) -> Self {
        Self::named::<T>(Kind::Object(fields))
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Full Rust type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    pub fn is_named(&self) -> bool {
        self.naming != Naming::Anonymous
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn with_title<T: Titled>(self) -> Self {
        self.with_capability(Capability::Title(T::json_schema_title))
    }

    pub fn with_description<T: Described>(self) -> Self {
        self.with_capability(Capability::Description(T::json_schema_description))
    }

    pub fn with_enum<T: Enumerated>(self) -> Self {
        self.with_capability(Capability::Enum(T::json_schema_enum))
    }

    pub fn with_named_enum<T: NamedEnumerated>(self) -> Self {
        self.with_capability(Capability::NamedEnum(T::json_schema_named_enum))
    }

    pub fn with_exposer<T: Exposer>(self) -> Self {
        self.with_capability(Capability::Exposer(T::json_schema))
    }

    pub fn with_raw_exposer<T: RawExposer>(self) -> Self {
        self.with_capability(Capability::RawExposer(T::json_schema_bytes))
    }

    pub fn with_preparer<T: Preparer>(self) -> Self {
        self.with_capability(Capability::Preparer(T::prepare_json_schema))
    }

    pub fn with_one_of<T: OneOfExposer>(self) -> Self {
        self.with_capability(Capability::OneOf(T::json_schema_one_of))
    }

    pub fn with_any_of<T: AnyOfExposer>(self) -> Self {
        self.with_capability(Capability::AnyOf(T::json_schema_any_of))
    }

    pub fn with_all_of<T: AllOfExposer>(self) -> Self {
        self.with_capability(Capability::AllOf(T::json_schema_all_of))
    }

    pub fn with_not<T: NotExposer>(self) -> Self {
        self.with_capability(Capability::Not(T::json_schema_not))
    }

    pub fn with_if<T: IfExposer>(self) -> Self {
        self.with_capability(Capability::If(T::json_schema_if))
    }

    pub fn with_then<T: ThenExposer>(self) -> Self {
        self.with_capability(Capability::Then(T::json_schema_then))
    }

    pub fn with_else<T: ElseExposer>(self) -> Self {
        self.with_capability(Capability::Else(T::json_schema_else))
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name)
            .field("naming", &self.naming)
            .field("kind", &self.kind.name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
