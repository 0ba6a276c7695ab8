//! GDScript text for classes, loaders and HTTP clients.

use crate::generate::{ClassPlan, FilePlan, ServicePlan};
use gdproto_binding::resolve::INPUT_IDENT;
use std::fmt::{self, Write as _};

const HEADER: &str = "# Code generated by protoc-gen-gdscript. DO NOT EDIT.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

fn header(out: &mut String, source: &str) -> fmt::Result {
    writeln!(out, "{HEADER}")?;
    writeln!(out, "# source: {source}")
}

pub fn render_class(source: &str, class: &ClassPlan) -> Result<String, fmt::Error> {
    let mut out = String::new();
    header(&mut out, source)?;
    writeln!(out, "class_name {}", class.name)?;
    writeln!(out, "extends RefCounted")?;
    out.push('\n');

    for field in &class.fields {
        writeln!(out, "var {}", field.property)?;
    }
    if !class.fields.is_empty() {
        out.push('\n');
    }

    let params = class
        .fields
        .iter()
        .map(|f| format!("p_{} = null", f.property))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "\nfunc _init({params}) -> void:")?;
    if class.fields.is_empty() {
        writeln!(out, "\tpass")?;
    }
    for field in &class.fields {
        writeln!(out, "\t{0} = p_{0}", field.property)?;
    }

    let entries = class
        .fields
        .iter()
        .map(|f| format!("\"{}\": {}", f.wire_name, f.property))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "\n\nfunc to_dict() -> Dictionary:")?;
    writeln!(out, "\treturn {{{entries}}}")?;
    Ok(out)
}

pub fn render_loader(plan: &FilePlan, res_root: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    header(&mut out, &plan.source)?;
    writeln!(out, "extends Node")?;
    out.push('\n');
    for class in &plan.classes {
        writeln!(
            out,
            "const {} = preload(\"{res_root}{}\")",
            class.name, class.file_name
        )?;
    }
    Ok(out)
}

pub fn render_client(source: &str, service: &ServicePlan) -> Result<String, fmt::Error> {
    let mut out = String::new();
    header(&mut out, source)?;
    writeln!(out, "class_name {}Client", service.name)?;
    writeln!(out, "extends Node")?;
    out.push('\n');
    writeln!(out, "signal request_failed(method: String, status: int)")?;
    out.push('\n');
    writeln!(out, "var base_url: String = \"\"")?;
    writeln!(
        out,
        "var headers: PackedStringArray = PackedStringArray([\"Content-Type: application/json\"])"
    )?;

    for call in &service.calls {
        let body = call
            .body_fields
            .iter()
            .map(|f| format!("\"{}\": {}", f.wire_name, f.access))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "\n\nfunc {}({INPUT_IDENT}) -> Variant:", call.method)?;
        writeln!(
            out,
            "\treturn await _request(\"{}\", \"{}\", {{{body}}})",
            call.http_verb, call.path_expression
        )?;
    }

    out.push_str(CLIENT_RUNTIME);
    Ok(out)
}

const CLIENT_RUNTIME: &str = r#"

func _request(method: String, path: String, body: Dictionary) -> Variant:
	var verb := HTTPClient.METHOD_GET
	match method:
		"HEAD": verb = HTTPClient.METHOD_HEAD
		"POST": verb = HTTPClient.METHOD_POST
		"PUT": verb = HTTPClient.METHOD_PUT
		"PATCH": verb = HTTPClient.METHOD_PATCH
		"DELETE": verb = HTTPClient.METHOD_DELETE
		"OPTIONS": verb = HTTPClient.METHOD_OPTIONS
	var payload := ""
	if verb != HTTPClient.METHOD_GET and verb != HTTPClient.METHOD_HEAD:
		payload = JSON.stringify(_encode(body))
	var http := HTTPRequest.new()
	add_child(http)
	var err := http.request(base_url + path, headers, verb, payload)
	if err != OK:
		http.queue_free()
		request_failed.emit(method, -err)
		return null
	var result: Array = await http.request_completed
	http.queue_free()
	var status: int = result[1]
	if status < 200 or status >= 300:
		request_failed.emit(method, status)
		return null
	return JSON.parse_string(result[3].get_string_from_utf8())


func _encode(value: Variant) -> Variant:
	if value is Object and value.has_method("to_dict"):
		return _encode(value.to_dict())
	if value is Dictionary:
		var out := {}
		for key in value:
			out[key] = _encode(value[key])
		return out
	if value is Array:
		return value.map(_encode)
	return value
"#;
