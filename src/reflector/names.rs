//! Definition Name Derivation
//!
//! Builds a definition name from a Rust type path:
//!
//! - the last module segment and the local type name, PascalCased
//! - followed by the local names of generic arguments
//!
//! `app::models::Page<app::models::User>` becomes `ModelsPageUser`.
//! Collisions between different types are resolved by the registry, not here.

/// Derive the definition name for a full type path
pub fn definition_name(type_name: &str) -> String {
    let (base, _) = split_generics(type_name);
    let segments: Vec<&str> = base.split("::").filter(|s| !s.is_empty()).collect();

    let mut name = String::new();
    if segments.len() >= 2 {
        name.push_str(&to_pascal_case(segments[segments.len() - 2]));
    }
    name.push_str(&local_name(type_name));
    name
}

/// Local type name plus generic argument names, without the module prefix
pub fn local_name(type_name: &str) -> String {
    let (base, args) = split_generics(type_name);
    let local = base.rsplit("::").next().unwrap_or(base);

    let mut name = to_pascal_case(&sanitize(local));
    for arg in args {
        name.push_str(&local_name(arg));
    }
    name
}

/// Split `path::Type<A, B<C>>` into `path::Type` and its top-level arguments
fn split_generics(type_name: &str) -> (&str, Vec<&str>) {
    let type_name = type_name.trim();
    let Some(open) = type_name.find('<') else {
        return (type_name, Vec::new());
    };
    let base = &type_name[..open];
    let inner = type_name[open + 1..]
        .strip_suffix('>')
        .unwrap_or(&type_name[open + 1..]);

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        args.push(last);
    }
    (base, args)
}

/// Keep identifier characters; everything else separates words
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Convert string to PascalCase, preserving the casing inside words
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
