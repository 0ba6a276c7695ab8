use crate::catalog::ExtensionCatalog;
use crate::error::BindingError;
use crate::grammar::{parse_binding, BindingSpec, Segment};
use crate::options::{self, RawOptions};
use crate::resolve::{self, BodyField};
use prost_reflect::{MessageDescriptor, MethodDescriptor};
use serde::Serialize;

/// Extension field name carrying the binding unless configured otherwise.
pub const DEFAULT_BINDING_OPTION: &str = "http";

/// Everything the renderer needs to emit one client function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallDescriptor {
    pub method: String,
    pub http_verb: String,
    /// Contents of a double-quoted GDScript string; placeholders are spliced
    /// in as `"+str(In.X)+"`.
    pub path_expression: String,
    /// Every input field, including those already used in the path.
    pub body_fields: Vec<BodyField>,
}

/// `Ok(None)` when the method carries no binding option.
pub fn assemble(
    method: &MethodDescriptor,
    catalog: &ExtensionCatalog,
    option_name: &str,
) -> Result<Option<CallDescriptor>, BindingError> {
    let raw = RawOptions::of_method(method);
    let Some(binding) = options::extract(&raw, catalog, option_name)? else {
        tracing::debug!(method = method.full_name(), "no binding option; skipping");
        return Ok(None);
    };

    let spec = parse_binding(&binding).map_err(|source| BindingError::Grammar {
        method: method.full_name().to_string(),
        binding: binding.clone(),
        source,
    })?;

    let descriptor = build_descriptor(method.name(), &spec, &method.input());
    tracing::debug!(
        method = method.full_name(),
        verb = %descriptor.http_verb,
        path = %descriptor.path_expression,
        "assembled call descriptor"
    );
    Ok(Some(descriptor))
}

pub fn build_descriptor(
    method: &str,
    spec: &BindingSpec,
    input: &MessageDescriptor,
) -> CallDescriptor {
    let mut path_expression = String::new();
    for segment in &spec.segments {
        match segment {
            Segment::Literal(text) => path_expression.push_str(&escape_literal(text)),
            Segment::Placeholder(path) => {
                path_expression.push_str(&resolve::resolve(path, input).splice())
            }
        }
    }

    CallDescriptor {
        method: method.to_string(),
        http_verb: spec.http_verb(),
        path_expression,
        body_fields: resolve::body_fields(input),
    }
}

fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}
