//! Loading encoded file descriptors into a reflective schema model.
//!
//! Files are decoded from their raw bytes (not from `prost_types` structs) so
//! that option messages keep their extension fields as bytes.

use crate::error::SchemaIntegrityError;
use prost::Message as _;
use prost_reflect::{DescriptorPool, FileDescriptor};
use prost_types::FileDescriptorProto;

/// `google.protobuf.FileDescriptorSet` with each file left encoded.
#[derive(Clone, PartialEq, ::prost::Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// The full transitive set of schema files of one generation run.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    pool: DescriptorPool,
    loaded: Vec<String>,
}

impl SchemaSet {
    /// Load encoded `FileDescriptorProto`s, dependencies first.
    ///
    /// The pool is seeded with the well-known types; a file whose name is
    /// already in the seed (typically `google/protobuf/descriptor.proto`) is
    /// skipped.
    pub fn from_encoded_files<I, B>(files: I) -> Result<Self, SchemaIntegrityError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut pool = DescriptorPool::global();
        let mut loaded = Vec::new();

        for bytes in files {
            let bytes = bytes.as_ref();
            let header =
                FileDescriptorProto::decode(bytes).map_err(SchemaIntegrityError::FileDecode)?;
            let name = header.name().to_string();
            if pool.get_file_by_name(&name).is_some() {
                tracing::debug!(file = %name, "file already in seed pool; skipping");
                continue;
            }
            pool.decode_file_descriptor_proto(bytes)?;
            loaded.push(name);
        }

        Ok(Self { pool, loaded })
    }

    /// Load an encoded `google.protobuf.FileDescriptorSet`.
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self, SchemaIntegrityError> {
        let set = RawFileDescriptorSet::decode(bytes).map_err(SchemaIntegrityError::FileDecode)?;
        Self::from_encoded_files(set.file)
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    pub fn file(&self, name: &str) -> Option<FileDescriptor> {
        self.pool.get_file_by_name(name)
    }

    /// Names of the files loaded by this set, in load order.
    pub fn loaded_files(&self) -> &[String] {
        &self.loaded
    }

    /// Every file of the pool, seed files included.
    pub fn files(&self) -> impl Iterator<Item = FileDescriptor> + '_ {
        self.pool.files()
    }

    pub fn file_protos(&self) -> Vec<FileDescriptorProto> {
        self.files()
            .map(|file| file.file_descriptor_proto().clone())
            .collect()
    }
}
