//! Sub-schema Composer
//!
//! Attaches `oneOf`, `anyOf`, `allOf`, `not`, `if`, `then` and `else` for types
//! exposing alternative type handles. Each handle is reflected with the shared
//! context, so alternatives are registered and deduplicated like any other type.

use super::{ReflectContext, WalkResult};
use crate::schema::{Schema, SchemaOrBool};
use crate::types::{Capability, TypeFn, TypeInfo};

pub(crate) fn compose(
    ctx: &mut ReflectContext,
    info: &TypeInfo,
    schema: &mut Schema,
) -> WalkResult<()> {
    for capability in info.capabilities() {
        match *capability {
            Capability::OneOf(alternatives) => {
                let members = walk_all(ctx, "oneOf", alternatives())?;
                schema.one_of.get_or_insert_with(Vec::new).extend(members);
            }
            Capability::AnyOf(alternatives) => {
                let members = walk_all(ctx, "anyOf", alternatives())?;
                schema.any_of.get_or_insert_with(Vec::new).extend(members);
            }
            Capability::AllOf(alternatives) => {
                let members = walk_all(ctx, "allOf", alternatives())?;
                schema.all_of.get_or_insert_with(Vec::new).extend(members);
            }
            Capability::Not(target) => {
                schema.not = Some(Box::new(ctx.walk_at(target(), "not")?.into()));
            }
            Capability::If(target) => {
                schema.r#if = Some(Box::new(ctx.walk_at(target(), "if")?.into()));
            }
            Capability::Then(target) => {
                schema.then = Some(Box::new(ctx.walk_at(target(), "then")?.into()));
            }
            Capability::Else(target) => {
                schema.r#else = Some(Box::new(ctx.walk_at(target(), "else")?.into()));
            }
            _ => {}
        }
    }
    Ok(())
}

fn walk_all(
    ctx: &mut ReflectContext,
    keyword: &str,
    types: Vec<TypeFn>,
) -> WalkResult<Vec<SchemaOrBool>> {
    types
        .into_iter()
        .enumerate()
        .map(|(i, ty)| {
            ctx.walk_at(ty, &format!("{}[{}]", keyword, i))
                .map(SchemaOrBool::from)
        })
        .collect()
}
