//! Descriptor fixtures shared by the binding tests and the workspace
//! integration tests.
//!
//! `prost_types` drops unknown fields, so method options carrying an
//! extension are encoded by hand and spliced into the surrounding messages.

#![allow(dead_code)]

use prost::encoding;
use prost::Message as _;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, MethodDescriptorProto,
};

pub const HTTP_EXTENSION_NUMBER: u32 = 50001;
pub const ROUTE_EXTENSION_NUMBER: u32 = 50010;

const FILE_SERVICE_TAG: u32 = 6;
const SERVICE_NAME_TAG: u32 = 1;
const SERVICE_METHOD_TAG: u32 = 2;
const METHOD_OPTIONS_TAG: u32 = 4;

pub fn scalar_field(name: &str, number: i32, ty: Type, json_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(json_name.to_string()),
        ..Default::default()
    }
}

pub fn string_field(name: &str, number: i32) -> FieldDescriptorProto {
    scalar_field(name, number, Type::String, name)
}

pub fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar_field(name, number, Type::Message, name)
    }
}

pub fn string_extension(name: &str, number: u32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        extendee: Some(".google.protobuf.MethodOptions".to_string()),
        ..string_field(name, number as i32)
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

/// Encoded `google.protobuf.MethodOptions` holding one string extension.
pub fn string_option(number: u32, value: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    encoding::string::encode(number, &value.to_string(), &mut buf);
    buf
}

pub fn http_option(binding: &str) -> Vec<u8> {
    string_option(HTTP_EXTENSION_NUMBER, binding)
}

/// Encoded `MethodDescriptorProto`, with raw option bytes appended.
pub fn method(name: &str, input: &str, output: &str, options: Option<Vec<u8>>) -> Vec<u8> {
    let proto = MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        ..Default::default()
    };
    let mut buf = proto.encode_to_vec();
    if let Some(options) = options {
        encoding::bytes::encode(METHOD_OPTIONS_TAG, &options, &mut buf);
    }
    buf
}

pub fn service(name: &str, methods: Vec<Vec<u8>>) -> Vec<u8> {
    let mut buf = Vec::new();
    encoding::string::encode(SERVICE_NAME_TAG, &name.to_string(), &mut buf);
    for method in methods {
        encoding::bytes::encode(SERVICE_METHOD_TAG, &method, &mut buf);
    }
    buf
}

pub fn encode_file(file: &FileDescriptorProto, services: Vec<Vec<u8>>) -> Vec<u8> {
    let mut buf = file.encode_to_vec();
    for service in services {
        encoding::bytes::encode(FILE_SERVICE_TAG, &service, &mut buf);
    }
    buf
}

/// `acme/annotations.proto`: `extend MethodOptions { string http = 50001; }`
pub fn annotations_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("acme/annotations.proto".to_string()),
        package: Some("acme.annotations".to_string()),
        dependency: vec!["google/protobuf/descriptor.proto".to_string()],
        extension: vec![string_extension("http", HTTP_EXTENSION_NUMBER)],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// `acme/routes.proto`: an extension declared three messages deep.
pub fn nested_annotations_file() -> FileDescriptorProto {
    let level3 = DescriptorProto {
        name: Some("Level3".to_string()),
        extension: vec![string_extension("route", ROUTE_EXTENSION_NUMBER)],
        ..Default::default()
    };
    let level2 = DescriptorProto {
        name: Some("Level2".to_string()),
        nested_type: vec![level3],
        ..Default::default()
    };
    let level1 = DescriptorProto {
        name: Some("Level1".to_string()),
        nested_type: vec![level2],
        ..Default::default()
    };
    FileDescriptorProto {
        name: Some("acme/routes.proto".to_string()),
        package: Some("acme.routes".to_string()),
        dependency: vec!["google/protobuf/descriptor.proto".to_string()],
        message_type: vec![level1],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

pub fn users_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("acme/users.proto".to_string()),
        package: Some("acme.users".to_string()),
        dependency: vec!["acme/annotations.proto".to_string()],
        message_type: vec![
            message("User", vec![string_field("id", 1)]),
            message(
                "GetUserRequest",
                vec![
                    message_field("user", 1, ".acme.users.User"),
                    string_field("filter", 2),
                ],
            ),
            message(
                "CreateItemRequest",
                vec![
                    scalar_field("page_size", 1, Type::Int32, "pageSize"),
                    string_field("title", 2),
                    message_field("owner", 3, ".acme.users.User"),
                ],
            ),
            message("Empty", Vec::new()),
        ],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// `acme/users.proto` with a `Users` service:
/// - `GetUser`: `GET:/v1/users/{user.id}`
/// - `CreateItem`: `post:/v1/items`
/// - `Ping`: no options at all
pub fn users_file_bytes() -> Vec<u8> {
    users_file_bytes_with(&[
        ("GetUser", ".acme.users.GetUserRequest", Some("GET:/v1/users/{user.id}")),
        ("CreateItem", ".acme.users.CreateItemRequest", Some("post:/v1/items")),
        ("Ping", ".acme.users.Empty", None),
    ])
}

/// `acme/users.proto` with one `Users` method per `(name, input, binding)`.
pub fn users_file_bytes_with(methods: &[(&str, &str, Option<&str>)]) -> Vec<u8> {
    let methods = methods
        .iter()
        .map(|(name, input, binding)| {
            method(name, input, ".acme.users.User", binding.map(http_option))
        })
        .collect();
    encode_file(&users_file(), vec![service("Users", methods)])
}

/// Encoded files of the default users schema, dependencies first.
pub fn users_schema() -> Vec<Vec<u8>> {
    vec![annotations_file().encode_to_vec(), users_file_bytes()]
}
