//! Schema Reflect
//!
//! Generates JSON Schema (draft-07) documents from Rust type descriptors.
//!
//! ## Features
//!
//! - **Type Walker**: Objects, sequences, maps and scalars map to schema kinds
//! - **Shared Definitions**: Named types become `definitions` entries referenced by `$ref`
//! - **Cycle Safety**: Recursive types resolve to references instead of looping
//! - **Field Tags**: Names, requiredness and validation keywords from `key:"value"` tags
//! - **Hooks**: Intercept schemas, properties, nullability and definition names
//!
//! ## Architecture
//!
//! ```text
//! Reflect::type_info()          descriptor with lazy nested types
//!        │
//!        ▼
//! Reflector ── options ──▶ ReflectContext
//!        │                   ├── registry     (definitions, names, cycle guard)
//!        │                   ├── constraints  (field tags → keywords)
//!        │                   ├── nullability
//!        │                   ├── compose      (oneOf/anyOf/allOf/not/if/then/else)
//!        │                   └── hooks
//!        ▼
//! Schema { ..., definitions }
//! ```
//!
//! ## Example
//!
//! ```
//! use schema_reflect::types::{Field, Reflect, TypeInfo};
//! use schema_reflect::reflect;
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
//!
//! let person = Person { name: "Ada".into(), age: 36 };
//! let schema = reflect(&person, []).unwrap();
//! assert_eq!(
//!     schema.to_json_value().unwrap(),
//!     serde_json::json!({
//!         "type": "object",
//!         "required": ["name"],
//!         "properties": {
//!             "name": {"type": "string"},
//!             "age": {"type": "integer"}
//!         }
//!     })
//! );
//! # let _ = (person.name, person.age);
//! ```

pub mod config;
pub mod error;
pub mod reflector;
pub mod schema;
pub mod tags;
pub mod types;

pub use config::ReflectorConfig;
pub use error::{HookError, ReflectError, Result};
pub use reflector::{options, reflect, ReflectContext, ReflectOption, Reflector, Stage};
pub use schema::{Ref, Schema, SchemaOrBool, SimpleType, Type};
pub use types::{Field, Kind, Reflect, TypeInfo};
