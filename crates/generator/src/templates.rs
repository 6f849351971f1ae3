//! Template loading and rendering
//!
//! File-level documents (handler preamble, `zzconfig.go`) are Tera
//! templates. Method stubs use the fixed `${placeholder}` bodies that
//! hand-written completions are written against.

use crate::descriptor::{MethodDescriptor, StreamMode};
use protoc_gen_vkit_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

pub const HANDLER_HEADER: &str = "handler_header.go";
pub const REGISTRY_CONFIG: &str = "zzconfig.go";

const UNARY: &str = include_str!("../templates/methods/unary.go.tmpl");
const CLIENT_STREAM: &str = include_str!("../templates/methods/client_stream.go.tmpl");
const SERVER_STREAM: &str = include_str!("../templates/methods/server_stream.go.tmpl");
const BIDI_STREAM: &str = include_str!("../templates/methods/bidi_stream.go.tmpl");

/// Load all file templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("import_alias", import_alias_filter);

    tera.add_raw_template(
        HANDLER_HEADER,
        include_str!("../templates/handler_header.go.tera"),
    )
    .map_err(|e| {
        GeneratorError::Template(format!("Failed to load handler header template: {}", e))
    })?;

    tera.add_raw_template(
        REGISTRY_CONFIG,
        include_str!("../templates/zzconfig.go.tera"),
    )
    .map_err(|e| GeneratorError::Template(format!("Failed to load zzconfig.go template: {}", e)))?;

    Ok(tera)
}

/// Render a file template, mapping Tera failures into `GeneratorError`
pub fn render(tera: &Tera, name: &str, context: &tera::Context) -> Result<String> {
    tera.render(name, context)
        .map_err(|e| GeneratorError::Template(format!("Failed to render {}: {:?}", name, e)))
}

/// Method-body template for a streaming mode
pub fn method_template(mode: StreamMode) -> &'static str {
    match mode {
        StreamMode::Unary => UNARY,
        StreamMode::ClientStreaming => CLIENT_STREAM,
        StreamMode::ServerStreaming => SERVER_STREAM,
        StreamMode::Bidirectional => BIDI_STREAM,
    }
}

/// Render the stub for one method of `service_type`
///
/// Field values are substituted literally, malformed ones included.
pub fn render_method(service_type: &str, method: &MethodDescriptor) -> String {
    replace_list(
        method_template(method.stream_mode()),
        &[
            ("${serviceName}", service_type),
            ("${methodName}", &method.name),
            ("${req}", &method.request_type),
            ("${resp}", &method.reply_type),
            ("${methodPath}", &method.path),
        ],
    )
}

/// Receiver type declaration appended when the file lacks one
pub fn render_service_type(service_type: &str) -> String {
    format!("\ntype {} struct {{\n}}\n", service_type)
}

/// Apply each `(placeholder, value)` replacement in order
fn replace_list(template: &str, pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .fold(template.to_string(), |out, (from, to)| out.replace(from, to))
}

/// Filter: package identifier of a Go import path (last segment)
fn import_alias_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let path = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("import_alias filter expects a string"))?;

    let alias = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    Ok(Value::String(alias.to_string()))
}
