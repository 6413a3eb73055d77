//! Reflection options
//!
//! Each option is a mutator of the [`ReflectContext`] applied before the walk
//! starts. Options are cheap to clone, so a [`Reflector`](super::Reflector)
//! can hold them as defaults for every call.

use std::fmt;
use std::sync::Arc;

use super::hooks::{
    InterceptNullabilityParams, InterceptPropertyParams, InterceptSchemaParams,
};
use super::{ReflectContext, Substitution};
use crate::error::HookError;
use crate::schema::Schema;
use crate::types::{Reflect, TypeInfo, TypeKey};

/// A configuration mutator
#[derive(Clone)]
pub struct ReflectOption(Arc<dyn Fn(&mut ReflectContext) + Send + Sync>);

impl ReflectOption {
    /// Option from an arbitrary mutator, e.g. to bundle other options
    pub fn new(apply: impl Fn(&mut ReflectContext) + Send + Sync + 'static) -> Self {
        Self(Arc::new(apply))
    }

    pub fn apply(&self, ctx: &mut ReflectContext) {
        (self.0)(ctx)
    }
}

impl fmt::Debug for ReflectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReflectOption")
    }
}

/// Tag key that holds property names (default `json`)
pub fn property_name_tag(key: impl Into<String>) -> ReflectOption {
    let key = key.into();
    ReflectOption::new(move |ctx| ctx.property_name_tag = key.clone())
}

/// Fallback tag keys consulted, in order, when the primary key is absent
pub fn property_name_additional_tags<I, S>(keys: I) -> ReflectOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
    ReflectOption::new(move |ctx| ctx.additional_name_tags = keys.clone())
}

/// Prefix of definition references (default `#/definitions/`)
pub fn definitions_prefix(prefix: impl Into<String>) -> ReflectOption {
    let prefix = prefix.into();
    ReflectOption::new(move |ctx| ctx.definitions_prefix = prefix.clone())
}

/// Reflect `B` wherever `A` is encountered
pub fn type_mapping<A: Reflect + ?Sized, B: Reflect + ?Sized>() -> ReflectOption {
    ReflectOption::new(|ctx| {
        ctx.type_mappings
            .insert(TypeKey::of::<A>(), Substitution::Type(B::type_info));
    })
}

/// Use a literal schema wherever `A` is encountered
pub fn type_schema<A: Reflect + ?Sized>(schema: Schema) -> ReflectOption {
    ReflectOption::new(move |ctx| {
        ctx.type_mappings
            .insert(TypeKey::of::<A>(), Substitution::Schema(schema.clone()));
    })
}

/// Never register `T` as a definition
pub fn inline_definition<T: Reflect + ?Sized>() -> ReflectOption {
    ReflectOption::new(|ctx| {
        ctx.inline_types.insert(TypeKey::of::<T>());
    })
}

/// Hook fired before and after each type expansion
pub fn intercept_schema<F>(hook: F) -> ReflectOption
where
    F: Fn(InterceptSchemaParams<'_>) -> Result<bool, HookError> + Send + Sync + 'static,
{
    let hook = Arc::new(hook);
    ReflectOption::new(move |ctx| ctx.hooks.schema.push(hook.clone()))
}

/// Hook fired before and after each property is reflected
pub fn intercept_property<F>(hook: F) -> ReflectOption
where
    F: Fn(InterceptPropertyParams<'_>) -> Result<(), HookError> + Send + Sync + 'static,
{
    let hook = Arc::new(hook);
    ReflectOption::new(move |ctx| ctx.hooks.property.push(hook.clone()))
}

/// Hook that may force the nullability of a property
pub fn intercept_nullability<F>(hook: F) -> ReflectOption
where
    F: Fn(InterceptNullabilityParams<'_>) -> Option<bool> + Send + Sync + 'static,
{
    let hook = Arc::new(hook);
    ReflectOption::new(move |ctx| ctx.hooks.nullability.push(hook.clone()))
}

/// Hook that remaps definition names
pub fn intercept_def_name<F>(hook: F) -> ReflectOption
where
    F: Fn(&TypeInfo, &str) -> String + Send + Sync + 'static,
{
    let hook = Arc::new(hook);
    ReflectOption::new(move |ctx| ctx.hooks.def_name.push(hook.clone()))
}

/// Inline every definition instead of referencing it; cycles still use references
pub fn inline_refs() -> ReflectOption {
    ReflectOption::new(|ctx| ctx.inline_refs = true)
}

/// Register the root type as a definition and reference it from the root
pub fn root_ref() -> ReflectOption {
    ReflectOption::new(|ctx| ctx.root_ref = true)
}

/// Admit `null` at the root
pub fn root_nullable() -> ReflectOption {
    ReflectOption::new(|ctx| ctx.root_nullable = true)
}

/// Omit properties whose type has no schema mapping instead of failing
pub fn skip_unsupported_properties() -> ReflectOption {
    ReflectOption::new(|ctx| ctx.skip_unsupported = true)
}

/// Skip fields that carry none of the property name tags
pub fn require_tags() -> ReflectOption {
    ReflectOption::new(|ctx| ctx.require_tags = true)
}

/// Express nullable references as `anyOf: [null, ref]`
pub fn envelop_nullability() -> ReflectOption {
    ReflectOption::new(|ctx| ctx.envelop_nullability = true)
}

/// Do not add `null` to sequences, maps and property-less objects
pub fn skip_null_for_containers() -> ReflectOption {
    ReflectOption::new(|ctx| ctx.null_for_containers = false)
}

/// Deliver definitions to `collect` instead of embedding them in the root
pub fn collect_definitions<F>(collect: F) -> ReflectOption
where
    F: Fn(String, Schema) + Send + Sync + 'static,
{
    let collect: Arc<dyn Fn(String, Schema) + Send + Sync> = Arc::new(collect);
    ReflectOption::new(move |ctx| ctx.collector = Some(collect.clone()))
}
