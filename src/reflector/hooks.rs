//! Hook Pipeline
//!
//! User callbacks installed through [`options`](super::options). Each kind of
//! hook may be installed several times; hooks run in installation order.

use std::fmt;
use std::sync::Arc;

use crate::error::HookError;
use crate::schema::Schema;
use crate::types::{Field, TypeInfo};

/// Which side of the default expansion a hook runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Before,
    After,
}

/// Arguments of a schema interceptor
pub struct InterceptSchemaParams<'a> {
    /// Dotted path of the value being reflected
    pub path: &'a str,
    pub type_info: &'a TypeInfo,
    /// Empty before expansion, the expanded schema after
    pub schema: &'a mut Schema,
    pub stage: Stage,
}

/// Arguments of a property interceptor
pub struct InterceptPropertyParams<'a> {
    pub path: &'a str,
    /// Property name as it appears in `properties`
    pub name: &'a str,
    pub field: &'a Field,
    /// Empty before reflection, the built property after.
    ///
    /// Filling it in the `Before` stage supplies the property schema and skips
    /// reflecting the field type; tags and nullability still apply.
    pub property: &'a mut Schema,
    /// Object schema the property is placed into
    pub parent: &'a mut Schema,
    pub stage: Stage,
}

/// Arguments of a nullability interceptor
#[derive(Clone, Copy)]
pub struct InterceptNullabilityParams<'a> {
    pub path: &'a str,
    pub field: &'a Field,
    /// Property schema before nullability is applied
    pub schema: &'a Schema,
    /// Field is an `Option<T>`
    pub pointer: bool,
    pub omit_empty: bool,
    /// Decision of the structural rules
    pub nullable: bool,
}

/// Returns `true` from the `Before` stage to stop default expansion
pub type InterceptSchemaFn =
    Arc<dyn Fn(InterceptSchemaParams<'_>) -> Result<bool, HookError> + Send + Sync>;

pub type InterceptPropertyFn =
    Arc<dyn Fn(InterceptPropertyParams<'_>) -> Result<(), HookError> + Send + Sync>;

/// Returns `Some` to force the decision
pub type InterceptNullabilityFn =
    Arc<dyn Fn(InterceptNullabilityParams<'_>) -> Option<bool> + Send + Sync>;

/// Maps a type and its derived name to the name to use
pub type InterceptDefNameFn = Arc<dyn Fn(&TypeInfo, &str) -> String + Send + Sync>;

/// Installed hooks
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) schema: Vec<InterceptSchemaFn>,
    pub(crate) property: Vec<InterceptPropertyFn>,
    pub(crate) nullability: Vec<InterceptNullabilityFn>,
    pub(crate) def_name: Vec<InterceptDefNameFn>,
}

impl Hooks {
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
            && self.property.is_empty()
            && self.nullability.is_empty()
            && self.def_name.is_empty()
    }

    /// Run schema interceptors; true if any asked to stop.
    ///
    /// Stopping ends the chain: later interceptors do not see the schema.
    pub(crate) fn run_schema(
        &self,
        stage: Stage,
        path: &str,
        type_info: &TypeInfo,
        schema: &mut Schema,
    ) -> Result<bool, HookError> {
        for hook in &self.schema {
            let stop = hook(InterceptSchemaParams {
                path,
                type_info,
                schema: &mut *schema,
                stage,
            })?;
            if stop {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub(crate) fn run_property(
        &self,
        stage: Stage,
        path: &str,
        name: &str,
        field: &Field,
        property: &mut Schema,
        parent: &mut Schema,
    ) -> Result<(), HookError> {
        for hook in &self.property {
            hook(InterceptPropertyParams {
                path,
                name,
                field,
                property: &mut *property,
                parent: &mut *parent,
                stage,
            })?;
        }
        Ok(())
    }

    /// First interceptor returning `Some` decides
    pub(crate) fn resolve_nullability(
        &self,
        params: InterceptNullabilityParams<'_>,
    ) -> Option<bool> {
        self.nullability.iter().find_map(|hook| hook(params))
    }

    /// Interceptors are chained, each seeing the previous result
    pub(crate) fn definition_name(&self, type_info: &TypeInfo, derived: String) -> String {
        self.def_name
            .iter()
            .fold(derived, |name, hook| hook(type_info, &name))
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("schema", &self.schema.len())
            .field("property", &self.property.len())
            .field("nullability", &self.nullability.len())
            .field("def_name", &self.def_name.len())
            .finish()
    }
}
