//! Type Walker
//!
//! [`Reflector`] turns a type descriptor graph into a JSON Schema document.
//! Each top-level call builds a fresh [`ReflectContext`] holding the
//! configuration from the options plus the traversal state: the current
//! path, the definition registry and the cycle guard.
//!
//! For every type the walker:
//!
//! 1. applies configured type substitutions and strips `Option`
//! 2. returns a reference if the type already has a completed definition
//! 3. returns a placeholder reference if the type is on the recursion path
//! 4. otherwise expands it: pre hooks and exposers, kind dispatch,
//!    type-level annotations, composition, preparers, post hooks
//! 5. registers the result as a definition or returns it inline

pub mod compose;
pub mod constraints;
pub mod hooks;
pub mod names;
pub mod nullability;
pub mod options;
pub mod registry;

pub use hooks::{
    Hooks, InterceptDefNameFn, InterceptNullabilityFn, InterceptNullabilityParams,
    InterceptPropertyFn, InterceptPropertyParams, InterceptSchemaFn, InterceptSchemaParams, Stage,
};
pub use options::ReflectOption;

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::ReflectorConfig;
use crate::error::{Interrupt, ReflectError, Result};
use crate::schema::{Ref, Schema, SimpleType, DEFAULT_DEFINITIONS_PREFIX};
use crate::tags::{NameTag, Tags};
use crate::types::{Capability, Field, Kind, Naming, Reflect, TypeFn, TypeInfo, TypeKey};

use constraints::{LiteralKind, TagReader};
use nullability::NullabilityInput;
use registry::Registry;

pub(crate) type WalkResult<T> = std::result::Result<T, Interrupt>;

/// Callback receiving collected definitions
pub type DefinitionCollector = Arc<dyn Fn(String, Schema) + Send + Sync>;

/// Replacement for a type wherever it is encountered
#[derive(Debug, Clone)]
pub(crate) enum Substitution {
    Type(TypeFn),
    Schema(Schema),
}

/// State of one reflection call
pub struct ReflectContext {
    pub(crate) definitions_prefix: String,
    pub(crate) property_name_tag: String,
    pub(crate) additional_name_tags: Vec<String>,
    pub(crate) type_mappings: HashMap<TypeKey, Substitution>,
    pub(crate) inline_types: HashSet<TypeKey>,
    pub(crate) hooks: Hooks,
    pub(crate) inline_refs: bool,
    pub(crate) root_ref: bool,
    pub(crate) root_nullable: bool,
    pub(crate) skip_unsupported: bool,
    pub(crate) require_tags: bool,
    pub(crate) envelop_nullability: bool,
    pub(crate) null_for_containers: bool,
    pub(crate) collector: Option<DefinitionCollector>,

    path: Vec<String>,
    registry: Registry,
    /// Identity of the root type, set when its expansion starts
    root: Option<TypeKey>,
    /// Embedded types whose fields are being flattened
    flattening: Vec<TypeKey>,
}

impl Default for ReflectContext {
    fn default() -> Self {
        Self {
            definitions_prefix: DEFAULT_DEFINITIONS_PREFIX.to_string(),
            property_name_tag: "json".to_string(),
            additional_name_tags: Vec::new(),
            type_mappings: HashMap::new(),
            inline_types: HashSet::new(),
            hooks: Hooks::default(),
            inline_refs: false,
            root_ref: false,
            root_nullable: false,
            skip_unsupported: false,
            require_tags: false,
            envelop_nullability: false,
            null_for_containers: true,
            collector: None,
            path: vec!["#".to_string()],
            registry: Registry::default(),
            root: None,
            flattening: Vec::new(),
        }
    }
}

impl ReflectContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dotted path of the value being reflected, rooted at `#`
    pub fn path(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 && !segment.starts_with('[') && !segment.starts_with('{') {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }

    pub fn definitions_prefix(&self) -> &str {
        &self.definitions_prefix
    }

    pub fn property_name_tag(&self) -> &str {
        &self.property_name_tag
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    fn child_path(&self, segment: &str) -> String {
        format!("{}.{}", self.path(), segment)
    }

    fn reference(&self, name: &str) -> Schema {
        Ref::new(self.definitions_prefix.as_str(), name).schema()
    }

    /// Walk the root type and assemble the document
    fn run(mut self, info: TypeInfo) -> Result<Schema> {
        let mut schema = self.walk(info).map_err(|e| e.into_error("#"))?;
        if self.root_nullable {
            schema = nullability::make_nullable(schema, true);
        }

        debug!(definitions = self.registry.len(), "reflection complete");
        let definitions = std::mem::take(&mut self.registry).into_definitions();
        match &self.collector {
            Some(collect) => {
                for (name, definition) in definitions {
                    collect(name, definition);
                }
            }
            None if !definitions.is_empty() => {
                schema.definitions = Some(
                    definitions
                        .into_iter()
                        .map(|(name, definition)| (name, definition.into()))
                        .collect(),
                );
            }
            None => {}
        }
        Ok(schema)
    }

    /// Walk a nested type under an extra path segment
    pub(crate) fn walk_at(&mut self, ty: TypeFn, segment: &str) -> WalkResult<Schema> {
        self.path.push(segment.to_string());
        let result = self.walk(ty());
        self.path.pop();
        result
    }

    fn walk(&mut self, info: TypeInfo) -> WalkResult<Schema> {
        let info = match self.type_mappings.get(&info.key()) {
            Some(Substitution::Schema(schema)) => return Ok(schema.clone()),
            Some(Substitution::Type(target)) => target(),
            None => info,
        };

        if let Kind::Optional(inner) = info.kind() {
            let inner = *inner;
            let schema = self.walk(inner())?;
            return Ok(nullability::make_nullable(schema, self.envelop_nullability));
        }

        let key = info.key();
        if let Some(name) = self.registry.completed(key) {
            return Ok(self.reference(name));
        }
        if self.registry.is_active(key) {
            return Ok(self.placeholder(&info));
        }

        let is_root = self.root.is_none();
        if is_root {
            self.root = Some(key);
        }

        let mark = self.registry.mark();
        self.registry.enter(key);
        if info.is_named() && (!is_root || self.root_ref) {
            let name = self.definition_name(&info);
            self.registry.allocate(key, &name);
        }
        let expanded = self.expand(&info);
        self.registry.leave(key);

        match expanded {
            Ok(schema) => Ok(self.finish(&info, schema, is_root)),
            Err(e) => {
                self.registry.rollback(mark);
                Err(e)
            }
        }
    }

    fn definition_name(&self, info: &TypeInfo) -> String {
        let derived = match info.naming() {
            Naming::Explicit(name) => name.to_string(),
            _ => names::definition_name(info.type_name()),
        };
        self.hooks.definition_name(info, derived)
    }

    /// Reference returned when a type recurses into itself
    fn placeholder(&mut self, info: &TypeInfo) -> Schema {
        let key = info.key();
        if self.root == Some(key) && !self.root_ref {
            trace!(path = %self.path(), "root recursion");
            return Ref::root().schema();
        }

        let name = match self.registry.slot(key) {
            Some(slot) => slot.name.clone(),
            None => {
                let base = if info.is_named() {
                    self.definition_name(info)
                } else {
                    self.registry.next_anonymous_name()
                };
                self.registry.allocate(key, &base).to_string()
            }
        };
        self.registry.mark_referenced(key);
        trace!(path = %self.path(), name = %name, "cycle placeholder");
        self.reference(&name)
    }

    /// Register the expanded schema or hand it back inline
    fn finish(&mut self, info: &TypeInfo, schema: Schema, is_root: bool) -> Schema {
        let key = info.key();
        let name = match self.registry.slot(key) {
            Some(slot) => slot.name.clone(),
            None => return schema,
        };

        let must_register = self.registry.is_referenced(key) || (is_root && self.root_ref);
        let inline = self.inline_refs || self.inline_types.contains(&key) || schema.is_trivial();
        if inline && !must_register {
            self.registry.release(key);
            return schema;
        }

        self.registry.finalize(key, schema);
        self.reference(&name)
    }

    fn expand(&mut self, info: &TypeInfo) -> WalkResult<Schema> {
        let path = self.path();
        debug!(path = %path, type_name = info.type_name(), "expanding type");

        let mut schema = Schema::new();
        let stop = self
            .hooks
            .run_schema(Stage::Before, &path, info, &mut schema)
            .map_err(|e| Interrupt::from_hook(e, &path))?;
        if stop {
            trace!(path = %path, "expansion stopped by hook");
            return Ok(schema);
        }
        if let Some(exposed) = expose(info, &path)? {
            return Ok(exposed);
        }

        match info.kind() {
            Kind::Bool => schema.r#type = Some(SimpleType::Boolean.into()),
            Kind::Integer => schema.r#type = Some(SimpleType::Integer.into()),
            Kind::Number => schema.r#type = Some(SimpleType::Number.into()),
            Kind::String => schema.r#type = Some(SimpleType::String.into()),
            Kind::Null => schema.r#type = Some(SimpleType::Null.into()),
            Kind::Any => {}
            Kind::Optional(inner) => {
                let inner = self.walk(inner())?;
                schema = nullability::make_nullable(inner, self.envelop_nullability);
            }
            Kind::Sequence { items, unique, len } => {
                schema.r#type = Some(SimpleType::Array.into());
                schema.items = Some(Box::new(self.walk_at(*items, "[]")?.into()));
                if *unique {
                    schema.unique_items = Some(true);
                }
                if let Some(len) = len {
                    schema.min_items = Some(*len as u64);
                    schema.max_items = Some(*len as u64);
                }
            }
            Kind::Map { values } => {
                schema.r#type = Some(SimpleType::Object.into());
                schema.additional_properties = Some(Box::new(self.walk_at(*values, "{}")?.into()));
            }
            Kind::Object(fields) => {
                schema.r#type = Some(SimpleType::Object.into());
                for field in fields {
                    self.walk_field(field, &mut schema)?;
                }
            }
            Kind::Unsupported(what) => {
                return Err(ReflectError::UnsupportedType {
                    path,
                    type_name: info.type_name().to_string(),
                    kind: what.to_string(),
                }
                .into());
            }
        }

        annotate(info, &mut schema);
        compose::compose(self, info, &mut schema)?;

        for capability in info.capabilities() {
            if let Capability::Preparer(prepare) = *capability {
                prepare(&mut schema).map_err(|e| Interrupt::from_hook(e, &path))?;
            }
        }

        self.hooks
            .run_schema(Stage::After, &path, info, &mut schema)
            .map_err(|e| Interrupt::from_hook(e, &path))?;
        Ok(schema)
    }

    /// First configured property-name tag present on the field
    fn name_tag_value<'t>(&self, tags: &'t Tags) -> Option<&'t str> {
        std::iter::once(&self.property_name_tag)
            .chain(self.additional_name_tags.iter())
            .find_map(|key| tags.get(key))
    }

    fn walk_field(&mut self, field: &Field, parent: &mut Schema) -> WalkResult<()> {
        let tags = Tags::parse(&field.tag).map_err(|e| ReflectError::InvalidTag {
            path: self.child_path(&field.name),
            tag: field.tag.to_string(),
            reason: e.to_string(),
        })?;

        let name_value = self.name_tag_value(&tags);
        if name_value.is_none() && self.require_tags && !field.embedded {
            trace!(field = %field.name, "untagged field skipped");
            return Ok(());
        }
        let name_tag = NameTag::parse(name_value.unwrap_or_default());
        if name_tag.is_skipped() {
            return Ok(());
        }
        if field.embedded && name_tag.name.is_empty() {
            return self.walk_embedded(field, &tags, parent);
        }

        let name = if name_tag.name.is_empty() {
            field.name.to_string()
        } else {
            name_tag.name.to_string()
        };
        let omit_empty = name_tag.omit_empty();

        let mark = self.registry.mark();
        self.path.push(name.clone());
        let result = self.walk_property(field, &tags, &name, omit_empty, parent);
        let path = self.path();
        self.path.pop();
        if result.is_err() {
            self.registry.rollback(mark);
        }

        match result {
            Err(Interrupt::SkipProperty) => {
                debug!(path = %path, "property skipped by hook");
                Ok(())
            }
            Err(Interrupt::Error(ReflectError::UnsupportedType { kind, .. }))
                if self.skip_unsupported =>
            {
                debug!(path = %path, kind = %kind, "unsupported property skipped");
                Ok(())
            }
            other => other,
        }
    }

    fn walk_property(
        &mut self,
        field: &Field,
        tags: &Tags,
        name: &str,
        omit_empty: bool,
        parent: &mut Schema,
    ) -> WalkResult<()> {
        let path = self.path();

        let mut property = Schema::new();
        self.hooks
            .run_property(Stage::Before, &path, name, field, &mut property, parent)
            .map_err(|e| Interrupt::from_hook(e, &path))?;

        // a property filled in by a `Before` hook replaces reflection of the field type
        let (info, pointer) = strip_optional((field.ty)());
        let mut property = if property == Schema::new() {
            self.walk(info)?
        } else {
            trace!(path = %path, "property provided by hook");
            property
        };

        let (literal, container) = {
            let resolved = self.resolve(&property);
            let container = match resolved.primary_type() {
                Some(SimpleType::Array) => true,
                Some(SimpleType::Object) => !resolved.has_properties(),
                _ => false,
            };
            (LiteralKind::of(resolved), container)
        };

        let constraints = constraints::apply(tags, literal, &mut property, &path)?;

        let input = NullabilityInput {
            pointer,
            omit_empty,
            container,
        };
        let structural = nullability::structural_decision(input, self.null_for_containers);
        let decision = constraints.nullable.or_else(|| {
            self.hooks.resolve_nullability(InterceptNullabilityParams {
                path: &path,
                field,
                schema: &property,
                pointer,
                omit_empty,
                nullable: structural,
            })
        });
        property = match decision {
            Some(true) => nullability::make_nullable(property, true),
            Some(false) => {
                nullability::make_non_nullable(&mut property);
                property
            }
            None if structural => nullability::make_nullable(property, self.envelop_nullability),
            None => property,
        };

        property.normalize_ref();

        if constraints.required {
            parent.add_required(name);
        }
        if let Err(e) = self
            .hooks
            .run_property(Stage::After, &path, name, field, &mut property, parent)
        {
            parent.required.retain(|r| r != name);
            return Err(Interrupt::from_hook(e, &path));
        }

        parent.properties_mut().insert(name.to_string(), property.into());
        Ok(())
    }

    /// Embedded fields contribute their properties to the parent, or an
    /// `allOf` reference with `refer:"true"`
    fn walk_embedded(&mut self, field: &Field, tags: &Tags, parent: &mut Schema) -> WalkResult<()> {
        let path = self.path();
        let refer = TagReader { tags, path: &path }
            .boolean("refer")?
            .unwrap_or(false);
        let (info, _) = strip_optional((field.ty)());
        let key = info.key();

        let flatten = !refer
            && !self.type_mappings.contains_key(&key)
            && !self.flattening.contains(&key)
            && !info.capabilities().iter().any(Capability::is_exposer);

        if flatten {
            if let Kind::Object(fields) = info.kind() {
                trace!(path = %path, type_name = info.type_name(), "flattening embedded type");
                self.flattening.push(key);
                let result = fields
                    .iter()
                    .try_for_each(|field| self.walk_field(field, parent));
                self.flattening.pop();
                return result;
            }
        }

        let schema = self.walk(info)?;
        parent.all_of.get_or_insert_with(Vec::new).push(schema.into());
        Ok(())
    }

    /// Follow definition references to the schema they name
    fn resolve<'s>(&'s self, schema: &'s Schema) -> &'s Schema {
        let mut current = schema;
        // bounded: definitions may themselves be plain references
        for _ in 0..8 {
            let target = current
                .reference
                .as_deref()
                .and_then(|r| r.strip_prefix(self.definitions_prefix.as_str()))
                .and_then(|name| self.registry.schema_by_name(name));
            match target {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }
}

impl fmt::Debug for ReflectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectContext")
            .field("path", &self.path())
            .field("definitions_prefix", &self.definitions_prefix)
            .field("property_name_tag", &self.property_name_tag)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

fn strip_optional(info: TypeInfo) -> (TypeInfo, bool) {
    let inner = match info.kind() {
        Kind::Optional(inner) => Some(*inner),
        _ => None,
    };
    match inner {
        Some(inner) => (inner(), true),
        None => (info, false),
    }
}

/// Exposer capabilities replace default expansion
fn expose(info: &TypeInfo, path: &str) -> WalkResult<Option<Schema>> {
    for capability in info.capabilities() {
        match *capability {
            Capability::Exposer(expose) => {
                return expose()
                    .map(Some)
                    .map_err(|e| Interrupt::from_hook(e, path));
            }
            Capability::RawExposer(expose) => {
                let bytes = expose().map_err(|e| Interrupt::from_hook(e, path))?;
                let schema: Schema = serde_json::from_slice(&bytes).map_err(ReflectError::from)?;
                return Ok(Some(schema));
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Type-level title, description and enum capabilities
fn annotate(info: &TypeInfo, schema: &mut Schema) {
    for capability in info.capabilities() {
        match *capability {
            Capability::Title(title) => schema.title = Some(title()),
            Capability::Description(description) => schema.description = Some(description()),
            Capability::Enum(values) => schema.r#enum = Some(values()),
            Capability::NamedEnum(values) => {
                let (values, names): (Vec<Value>, Vec<String>) = values().into_iter().unzip();
                schema.r#enum = Some(values);
                schema.extra.insert("x-enum-names".to_string(), Value::from(names));
            }
            _ => {}
        }
    }
}

/// Entry point holding reusable configuration
#[derive(Clone, Default)]
pub struct Reflector {
    type_mappings: HashMap<TypeKey, Substitution>,
    inline_types: HashSet<TypeKey>,
    default_options: Vec<ReflectOption>,
}

impl Reflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflector with defaults taken from a configuration file
    pub fn from_config(config: ReflectorConfig) -> Self {
        let mut reflector = Self::new();
        reflector.with_default_options(config.into_options());
        reflector
    }

    /// Reflect `B` wherever `A` is encountered
    pub fn add_type_mapping<A: Reflect + ?Sized, B: Reflect + ?Sized>(&mut self) -> &mut Self {
        self.type_mappings
            .insert(TypeKey::of::<A>(), Substitution::Type(B::type_info));
        self
    }

    /// Use a literal schema wherever `A` is encountered
    pub fn add_type_schema<A: Reflect + ?Sized>(&mut self, schema: Schema) -> &mut Self {
        self.type_mappings
            .insert(TypeKey::of::<A>(), Substitution::Schema(schema));
        self
    }

    /// Never register `T` as a definition
    pub fn inline_definition<T: Reflect + ?Sized>(&mut self) -> &mut Self {
        self.inline_types.insert(TypeKey::of::<T>());
        self
    }

    /// Options applied before the per-call options of every reflection
    pub fn with_default_options(
        &mut self,
        options: impl IntoIterator<Item = ReflectOption>,
    ) -> &mut Self {
        self.default_options.extend(options);
        self
    }

    /// Schema of the type of `sample`
    pub fn reflect<T: Reflect + ?Sized>(
        &self,
        _sample: &T,
        options: impl IntoIterator<Item = ReflectOption>,
    ) -> Result<Schema> {
        self.reflect_type::<T>(options)
    }

    /// Schema of `T`
    pub fn reflect_type<T: Reflect + ?Sized>(
        &self,
        options: impl IntoIterator<Item = ReflectOption>,
    ) -> Result<Schema> {
        self.reflect_info(T::type_info(), options)
    }

    /// Schema of an arbitrary descriptor
    pub fn reflect_info(
        &self,
        info: TypeInfo,
        options: impl IntoIterator<Item = ReflectOption>,
    ) -> Result<Schema> {
        let mut ctx = ReflectContext::new();
        ctx.type_mappings = self.type_mappings.clone();
        ctx.inline_types = self.inline_types.clone();
        for option in self.default_options.iter().cloned().chain(options) {
            option.apply(&mut ctx);
        }
        ctx.run(info)
    }
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("type_mappings", &self.type_mappings.len())
            .field("inline_types", &self.inline_types.len())
            .field("default_options", &self.default_options.len())
            .finish()
    }
}

/// Reflect with a default [`Reflector`]
pub fn reflect<T: Reflect + ?Sized>(
    sample: &T,
    options: impl IntoIterator<Item = ReflectOption>,
) -> Result<Schema> {
    Reflector::default().reflect(sample, options)
}
