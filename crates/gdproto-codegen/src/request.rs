//! protoc plugin protocol.
//!
//! `prost_types::compiler::CodeGeneratorRequest` would decode `proto_file`
//! into structs and drop every option extension, so the request is decoded
//! with the files kept as raw bytes.

use prost::Message as _;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::CodeGeneratorResponse;
use thiserror::Error;

use crate::render::GeneratedFile;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    pub proto_file: Vec<Vec<u8>>,
}

#[derive(Debug, Error)]
#[error("failed to decode CodeGeneratorRequest: {0}")]
pub struct RequestError(#[from] prost::DecodeError);

pub fn decode_request(bytes: &[u8]) -> Result<RawCodeGeneratorRequest, RequestError> {
    Ok(RawCodeGeneratorRequest::decode(bytes)?)
}

pub fn success_response(files: Vec<GeneratedFile>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        file: files
            .into_iter()
            .map(|file| File {
                name: Some(file.name),
                content: Some(file.content),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// protoc prints `error` and fails the invocation.
pub fn error_response(message: String) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(message),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}

pub fn encode_response(response: &CodeGeneratorResponse) -> Vec<u8> {
    response.encode_to_vec()
}
