//! Registry of every extension declared in a schema snapshot.
//!
//! Extensions can be declared at file scope or inside any message, at any
//! nesting depth:
//!
//! ```proto
//! message Outer { message Inner { extend google.protobuf.MethodOptions {
//!   string http = 50001;
//! } } }
//! ```
//!
//! The catalog records each declaration keyed by `(extendee, number)` and then
//! links the same files into its own descriptor pool, which is what
//! [`crate::options::extract`] decodes raw option bytes against.

use crate::error::SchemaIntegrityError;
use crate::schema::SchemaSet;
use prost_reflect::{DescriptorPool, MessageDescriptor};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtensionKey {
    /// Fully-qualified name of the extended message, without a leading `.`.
    pub extendee: String,
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEntry {
    pub name: String,
    pub full_name: String,
    pub file: String,
}

#[derive(Debug, Clone)]
pub struct ExtensionCatalog {
    entries: BTreeMap<ExtensionKey, ExtensionEntry>,
    pool: DescriptorPool,
}

impl ExtensionCatalog {
    /// Register every extension of `files` (dependencies first, as protoc
    /// orders them).
    pub fn build<'a, I>(files: I) -> Result<Self, SchemaIntegrityError>
    where
        I: IntoIterator<Item = &'a FileDescriptorProto>,
    {
        let mut builder = CatalogBuilder::default();
        let mut pending = Vec::new();

        for file in files {
            let scope = file.package().to_string();
            builder.register_scope(file.name(), &scope, &file.message_type, &file.extension)?;
            pending.push(file);
        }

        let mut pool = DescriptorPool::global();
        for file in pending {
            if pool.get_file_by_name(file.name()).is_some() {
                continue;
            }
            pool.add_file_descriptor_proto(file.clone())?;
        }

        tracing::debug!(extensions = builder.entries.len(), "extension catalog built");
        Ok(Self {
            entries: builder.entries,
            pool,
        })
    }

    pub fn from_schema(schema: &SchemaSet) -> Result<Self, SchemaIntegrityError> {
        let protos = schema.file_protos();
        Self::build(&protos)
    }

    pub fn get(&self, extendee: &str, number: u32) -> Option<&ExtensionEntry> {
        self.entries.get(&ExtensionKey {
            extendee: extendee.trim_start_matches('.').to_string(),
            number,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptor of an options message (e.g. `google.protobuf.MethodOptions`)
    /// as seen by the catalog's pool, i.e. with every extension attached.
    pub fn options_descriptor(
        &self,
        full_name: &str,
    ) -> Result<MessageDescriptor, SchemaIntegrityError> {
        self.pool
            .get_message_by_name(full_name)
            .ok_or_else(|| SchemaIntegrityError::MissingOptionsType(full_name.to_string()))
    }
}

#[derive(Default)]
struct CatalogBuilder {
    entries: BTreeMap<ExtensionKey, ExtensionEntry>,
}

impl CatalogBuilder {
    fn register_scope(
        &mut self,
        file: &str,
        scope: &str,
        messages: &[DescriptorProto],
        extensions: &[FieldDescriptorProto],
    ) -> Result<(), SchemaIntegrityError> {
        for message in messages {
            let nested = qualify(scope, message.name());
            self.register_scope(file, &nested, &message.nested_type, &message.extension)?;
        }
        for extension in extensions {
            self.register(file, scope, extension)?;
        }
        Ok(())
    }

    fn register(
        &mut self,
        file: &str,
        scope: &str,
        extension: &FieldDescriptorProto,
    ) -> Result<(), SchemaIntegrityError> {
        let key = ExtensionKey {
            extendee: extension.extendee().trim_start_matches('.').to_string(),
            number: extension.number() as u32,
        };
        let entry = ExtensionEntry {
            name: extension.name().to_string(),
            full_name: qualify(scope, extension.name()),
            file: file.to_string(),
        };

        if let Some(existing) = self.entries.get(&key) {
            return Err(SchemaIntegrityError::DuplicateExtension {
                extendee: key.extendee,
                number: key.number,
                first: existing.full_name.clone(),
                second: entry.full_name,
            });
        }

        tracing::debug!(
            extension = %entry.full_name,
            extendee = %key.extendee,
            number = key.number,
            "registered extension"
        );
        self.entries.insert(key, entry);
        Ok(())
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extension(name: &str, number: i32) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            extendee: Some(".google.protobuf.MethodOptions".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn qualifies_nested_scopes() {
        let mut builder = CatalogBuilder::default();
        let inner = DescriptorProto {
            name: Some("Inner".to_string()),
            extension: vec![extension("http", 50001)],
            ..Default::default()
        };
        let outer = DescriptorProto {
            name: Some("Outer".to_string()),
            nested_type: vec![inner],
            ..Default::default()
        };

        builder
            .register_scope("a.proto", "pkg", &[outer], &[])
            .expect("register");

        let entry = builder
            .entries
            .get(&ExtensionKey {
                extendee: "google.protobuf.MethodOptions".to_string(),
                number: 50001,
            })
            .expect("entry");
        assert_eq!(entry.full_name, "pkg.Outer.Inner.http");
        assert_eq!(entry.name, "http");
    }

    #[test]
    fn rejects_number_collision_on_same_extendee() {
        let mut builder = CatalogBuilder::default();
        let err = builder
            .register_scope(
                "a.proto",
                "",
                &[],
                &[extension("http", 50001), extension("rest", 50001)],
            )
            .unwrap_err();
        match err {
            SchemaIntegrityError::DuplicateExtension { number, first, second, .. } => {
                assert_eq!(number, 50001);
                assert_eq!(first, "http");
                assert_eq!(second, "rest");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
