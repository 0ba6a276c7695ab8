//! Recovering a named extension from a method's options.
//!
//! The loader may have decoded the options without knowing the extension, in
//! which case the value only exists as unknown field bytes. We re-encode the
//! options and decode a scratch copy against the catalog's descriptor pool,
//! where the extension is a regular, addressable field.

use crate::catalog::ExtensionCatalog;
use crate::error::SchemaIntegrityError;
use prost::Message as _;
use prost_reflect::{DynamicMessage, MethodDescriptor, ReflectMessage, Value};

pub const METHOD_OPTIONS: &str = "google.protobuf.MethodOptions";

/// Encoded options of one schema element, plus the name of its options type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOptions {
    message: String,
    bytes: Vec<u8>,
}

impl RawOptions {
    pub fn from_message(options: &DynamicMessage) -> Self {
        Self {
            message: options.descriptor().full_name().to_string(),
            bytes: options.encode_to_vec(),
        }
    }

    pub fn of_method(method: &MethodDescriptor) -> Self {
        Self::from_message(&method.options())
    }

    /// Wrap already-encoded `google.protobuf.MethodOptions` bytes.
    pub fn method_options(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            message: METHOD_OPTIONS.to_string(),
            bytes: bytes.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Value of the extension named `field_name`, if the options carry one.
pub fn extract(
    raw: &RawOptions,
    catalog: &ExtensionCatalog,
    field_name: &str,
) -> Result<Option<String>, SchemaIntegrityError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let descriptor = catalog.options_descriptor(&raw.message)?;
    let scratch = DynamicMessage::decode(descriptor, raw.bytes()).map_err(|source| {
        SchemaIntegrityError::OptionDecode {
            message: raw.message.clone(),
            source,
        }
    })?;

    let mut matches: Vec<_> = scratch
        .extensions()
        .filter(|(extension, _)| {
            catalog
                .get(extension.containing_message().full_name(), extension.number())
                .is_some_and(|entry| entry.name == field_name)
        })
        .collect();
    matches.sort_by_key(|(extension, _)| extension.number());

    let Some((extension, value)) = matches.first() else {
        return Ok(None);
    };
    if matches.len() > 1 {
        tracing::warn!(
            option = field_name,
            chosen = extension.full_name(),
            candidates = matches.len(),
            "several extensions share this name; using the lowest field number"
        );
    }

    coerce_to_string(extension.full_name(), value).map(Some)
}

fn coerce_to_string(extension: &str, value: &Value) -> Result<String, SchemaIntegrityError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::I32(n) => n.to_string(),
        Value::I64(n) => n.to_string(),
        Value::U32(n) => n.to_string(),
        Value::U64(n) => n.to_string(),
        Value::F32(n) => n.to_string(),
        Value::F64(n) => n.to_string(),
        Value::EnumNumber(n) => n.to_string(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Value::Message(_) => return Err(unsupported(extension, "message")),
        Value::List(_) => return Err(unsupported(extension, "repeated")),
        Value::Map(_) => return Err(unsupported(extension, "map")),
    };
    Ok(text)
}

fn unsupported(extension: &str, kind: &'static str) -> SchemaIntegrityError {
    SchemaIntegrityError::UnsupportedOptionValue {
        extension: extension.to_string(),
        kind,
    }
}
