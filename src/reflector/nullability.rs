//! Nullability Resolver
//!
//! Decides whether a property admits `null` and rewrites its schema
//! accordingly. An explicit override (the `nullable` tag, then an
//! `intercept_nullability` hook) wins outright. Otherwise the first structural
//! rule that applies decides: `Option<T>` fields are nullable unless
//! `omitempty`; sequences, maps and property-less objects are nullable unless
//! container nullability is switched off.

use tracing::trace;

use crate::schema::{Schema, SimpleType};

/// Facts about a property relevant to nullability
#[derive(Debug, Clone, Copy)]
pub(crate) struct NullabilityInput {
    /// Declared as `Option<T>`
    pub pointer: bool,
    pub omit_empty: bool,
    /// Sequence, map, or object without declared properties
    pub container: bool,
}

/// Outcome of the structural rules alone
pub(crate) fn structural_decision(input: NullabilityInput, null_for_containers: bool) -> bool {
    if input.pointer {
        return !input.omit_empty;
    }
    input.container && null_for_containers
}

/// Add the null variant.
///
/// References are enveloped as `anyOf: [null, ref]` when `envelope` is set and
/// left alone otherwise. Schemas with a `type` get `null` prepended to the
/// union. Schemas without either are enveloped only when `envelope` is set.
pub(crate) fn make_nullable(schema: Schema, envelope: bool) -> Schema {
    if schema.is_ref() {
        if envelope {
            return envelop(schema);
        }
        trace!("reference left without null variant");
        return schema;
    }

    let mut schema = schema;
    if schema.add_type(SimpleType::Null) {
        return schema;
    }
    if envelope && schema != Schema::new() {
        return envelop(schema);
    }
    schema
}

/// Remove the null variant added by a nested `Option`
pub(crate) fn make_non_nullable(schema: &mut Schema) {
    if schema.has_type(SimpleType::Null) && schema.types().len() > 1 {
        schema.remove_type(SimpleType::Null);
    }
}

fn envelop(schema: Schema) -> Schema {
    // Keep annotations next to the union so they stay visible
    let mut inner = schema;
    let description = inner.description.take();
    let deprecated = inner.deprecated.take();
    inner.normalize_ref();
    Schema {
        any_of: Some(vec![Schema::with_type(SimpleType::Null).into(), inner.into()]),
        description,
        deprecated,
        ..Default::default()
    }
}
