//! One generation run: schema snapshot → per-file plans → GDScript files.
//!
//! Files are processed in request order; within a file, messages, services and
//! methods follow declaration order. The first error aborts the whole run.

use crate::config::GeneratorConfig;
use crate::render::{self, GeneratedFile};
use gdproto_binding::resolve::accessor_name;
use gdproto_binding::{
    assemble, BindingError, CallDescriptor, ExtensionCatalog, SchemaIntegrityError, SchemaSet,
};
use prost_reflect::FileDescriptor;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Schema(#[from] SchemaIntegrityError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("file `{0}` was requested but is not part of the schema")]
    UnknownFile(String),

    #[error("failed to render `{file}`: {source}")]
    Render {
        file: String,
        #[source]
        source: fmt::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassField {
    pub wire_name: String,
    pub property: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassPlan {
    pub name: String,
    pub file_name: String,
    pub fields: Vec<ClassField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePlan {
    pub name: String,
    pub file_name: String,
    /// Annotated methods only.
    pub calls: Vec<CallDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePlan {
    pub source: String,
    pub loader_file_name: String,
    pub classes: Vec<ClassPlan>,
    pub services: Vec<ServicePlan>,
}

/// Plan every requested file. Files without messages produce no plan.
pub fn plan(
    schema: &SchemaSet,
    files_to_generate: &[String],
    config: &GeneratorConfig,
) -> Result<Vec<FilePlan>, GenerateError> {
    let catalog = ExtensionCatalog::from_schema(schema)?;

    let mut plans = Vec::new();
    for name in files_to_generate {
        let file = schema
            .file(name)
            .ok_or_else(|| GenerateError::UnknownFile(name.clone()))?;
        if let Some(plan) = plan_file(&file, &catalog, config)? {
            plans.push(plan);
        }
    }
    Ok(plans)
}

pub fn generate(
    schema: &SchemaSet,
    files_to_generate: &[String],
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    let mut files = Vec::new();
    for plan in plan(schema, files_to_generate, config)? {
        files.extend(render_plan(&plan, config)?);
    }
    Ok(files)
}

pub fn render_plan(
    plan: &FilePlan,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    let mut files = Vec::new();
    for class in &plan.classes {
        files.push(emit(&class.file_name, render::render_class(&plan.source, class))?);
    }
    files.push(emit(
        &plan.loader_file_name,
        render::render_loader(plan, &config.res_root),
    )?);
    for service in &plan.services {
        files.push(emit(&service.file_name, render::render_client(&plan.source, service))?);
    }
    Ok(files)
}

fn emit(
    name: &str,
    content: Result<String, fmt::Error>,
) -> Result<GeneratedFile, GenerateError> {
    let content = content.map_err(|source| GenerateError::Render {
        file: name.to_string(),
        source,
    })?;
    tracing::info!(file = %name, bytes = content.len(), "generated");
    Ok(GeneratedFile {
        name: name.to_string(),
        content,
    })
}

fn plan_file(
    file: &FileDescriptor,
    catalog: &ExtensionCatalog,
    config: &GeneratorConfig,
) -> Result<Option<FilePlan>, GenerateError> {
    if file.messages().next().is_none() {
        tracing::debug!(file = file.name(), "no messages; nothing to generate");
        return Ok(None);
    }

    let prefix = file.name().strip_suffix(".proto").unwrap_or(file.name());

    let classes = file
        .messages()
        .map(|message| ClassPlan {
            name: message.name().to_string(),
            file_name: format!("{prefix}_{}.gd", message.name()),
            fields: message
                .fields()
                .map(|field| ClassField {
                    wire_name: field.json_name().to_string(),
                    property: accessor_name(field.name()),
                })
                .collect(),
        })
        .collect();

    let mut services = Vec::new();
    for service in file.services() {
        let mut calls = Vec::new();
        for method in service.methods() {
            if let Some(call) = assemble(&method, catalog, &config.binding_option)? {
                calls.push(call);
            }
        }
        services.push(ServicePlan {
            name: service.name().to_string(),
            file_name: format!("{prefix}_Client_{}.gd", service.name()),
            calls,
        });
    }

    let loader_file_name = match file.package_name() {
        "" => format!("{prefix}_Loader.gd"),
        package => format!("{prefix}_Loader_{package}.gd"),
    };

    Ok(Some(FilePlan {
        source: file.name().to_string(),
        loader_file_name,
        classes,
        services,
    }))
}
