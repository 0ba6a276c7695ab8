//! Field paths → GDScript accessors on the request value `In`.
//!
//! Generated classes expose one property per proto field with the first
//! letter upper-cased (`user_id` → `User_id`, `user` → `User`), so resolution
//! is purely textual. Paths are not checked against the schema; a component
//! we cannot follow is only logged.

use crate::grammar::FieldPath;
use prost_reflect::{Kind, MessageDescriptor};
use serde::Serialize;
use std::fmt;

/// Identifier the generated client functions bind the request value to.
pub const INPUT_IDENT: &str = "In";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldAccess(String);

impl FieldAccess {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used inside a double-quoted path string: closes the string,
    /// appends the stringified value, reopens the string.
    pub fn splice(&self) -> String {
        format!("\"+str({})+\"", self.0)
    }
}

impl fmt::Display for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the request body dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyField {
    pub wire_name: String,
    pub access: FieldAccess,
}

/// GDScript property name for a proto field name.
pub fn accessor_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn resolve(path: &FieldPath, input: &MessageDescriptor) -> FieldAccess {
    warn_if_unresolved(path, input);

    let mut expr = String::from(INPUT_IDENT);
    for component in path.components() {
        expr.push('.');
        expr.push_str(&accessor_name(component));
    }
    FieldAccess(expr)
}

/// Every field of `input`, in declaration order, keyed by JSON name.
pub fn body_fields(input: &MessageDescriptor) -> Vec<BodyField> {
    input
        .fields()
        .map(|field| BodyField {
            wire_name: field.json_name().to_string(),
            access: FieldAccess(format!("{INPUT_IDENT}.{}", accessor_name(field.name()))),
        })
        .collect()
}

fn warn_if_unresolved(path: &FieldPath, input: &MessageDescriptor) {
    let mut current = Some(input.clone());
    for component in path.components() {
        let Some(message) = current.take() else {
            tracing::warn!(
                path = %path,
                input = input.full_name(),
                component = component.as_str(),
                "placeholder descends into a non-message field"
            );
            return;
        };
        let Some(field) = message.get_field_by_name(component) else {
            tracing::warn!(
                path = %path,
                scope = message.full_name(),
                component = component.as_str(),
                "placeholder names an unknown field"
            );
            return;
        };
        current = match field.kind() {
            Kind::Message(nested) if !field.is_list() && !field.is_map() => Some(nested),
            _ => None,
        };
    }
}
