//! `protoc-gen-gdscript`: GDScript classes and HTTP clients from `.proto` files.
//!
//! Pipeline (one run, single pass):
//! 1. Decode the plugin request, keeping every `FileDescriptorProto` encoded
//! 2. Load them into a [`gdproto_binding::SchemaSet`] and build the extension catalog
//! 3. Plan each requested file (classes, loader, one client per service)
//! 4. Render GDScript and answer with a `CodeGeneratorResponse`

pub mod config;
pub mod generate;
pub mod render;
pub mod request;

use config::{ConfigError, GeneratorConfig};
use gdproto_binding::{SchemaIntegrityError, SchemaSet};
use generate::GenerateError;
use prost_types::compiler::CodeGeneratorResponse;
use request::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaIntegrityError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Handle one encoded `CodeGeneratorRequest`.
///
/// Failures are reported through the response's `error` field, which is how
/// protoc expects plugins to reject their input.
pub fn run_plugin(request: &[u8]) -> CodeGeneratorResponse {
    match try_run_plugin(request) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "generation aborted");
            request::error_response(err.to_string())
        }
    }
}

fn try_run_plugin(bytes: &[u8]) -> Result<CodeGeneratorResponse, PluginError> {
    let request = request::decode_request(bytes)?;
    let config = GeneratorConfig::from_parameter(request.parameter.as_deref())?;
    let schema = SchemaSet::from_encoded_files(&request.proto_file)?;
    let files = generate::generate(&schema, &request.file_to_generate, &config)?;
    Ok(request::success_response(files))
}
