//! Converter from reflected descriptors to the `ProtoFile` IR

use super::descriptor::{http_rule_proto::Pattern, HttpRuleProto};
use crate::go_names::{go_camel_case, go_package_name};
use prost::Message;
use prost_reflect::{
    ExtensionDescriptor, FileDescriptor, MessageDescriptor, MethodDescriptor, ServiceDescriptor,
    Value,
};
use protoc_gen_vkit_common::{
    GeneratorError, HttpRule, HttpVerb, ProtoFile, Result, RpcMethod, ServiceDefinition,
};

/// Full name of the method option carrying the HTTP binding
pub const HTTP_EXTENSION: &str = "google.api.http";

/// Convert one file; `http` is absent when no input file declares the extension
pub fn convert_file(
    file: &FileDescriptor,
    generate: bool,
    http: Option<&ExtensionDescriptor>,
) -> Result<ProtoFile> {
    let name = file.name().to_string();
    let package = file.package_name().to_string();
    let go_package = file
        .file_descriptor_proto()
        .options
        .as_ref()
        .and_then(|o| o.go_package.as_deref());

    let services = file
        .services()
        .map(|service| convert_service(&service, http))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProtoFile {
        go_package_name: go_package_name(go_package, &package, &name),
        generate,
        name,
        package,
        services,
    })
}

fn convert_service(
    service: &ServiceDescriptor,
    http: Option<&ExtensionDescriptor>,
) -> Result<ServiceDefinition> {
    let methods = service
        .methods()
        .map(|method| convert_method(&method, http))
        .collect::<Result<Vec<_>>>()?;

    Ok(ServiceDefinition {
        go_name: go_camel_case(service.name()),
        full_name: service.full_name().to_string(),
        methods,
    })
}

fn convert_method(
    method: &MethodDescriptor,
    http: Option<&ExtensionDescriptor>,
) -> Result<RpcMethod> {
    let http_rule = match http {
        Some(extension) => decode_http_rule(method, extension)?,
        None => None,
    };

    Ok(RpcMethod {
        name: method.name().to_string(),
        go_name: go_camel_case(method.name()),
        input_type: message_ident(&method.input()),
        output_type: message_ident(&method.output()),
        client_streaming: method.is_client_streaming(),
        server_streaming: method.is_server_streaming(),
        http_rule,
    })
}

/// Read `(google.api.http)` from the method options
fn decode_http_rule(
    method: &MethodDescriptor,
    extension: &ExtensionDescriptor,
) -> Result<Option<HttpRule>> {
    let options = method.options();
    if !options.has_extension(extension) {
        return Ok(None);
    }

    let value = options.get_extension(extension);
    let Value::Message(rule) = value.as_ref() else {
        return Ok(None);
    };

    let rule = HttpRuleProto::decode(rule.encode_to_vec().as_slice()).map_err(|e| {
        GeneratorError::Parse(format!(
            "Invalid {} option on {}: {}",
            HTTP_EXTENSION,
            method.full_name(),
            e
        ))
    })?;

    Ok(convert_http_rule(&rule))
}

/// Map a `google.api.HttpRule` onto verb and path
///
/// A rule without a pattern carries no binding and is treated as absent.
fn convert_http_rule(rule: &HttpRuleProto) -> Option<HttpRule> {
    let (verb, path) = match rule.pattern.as_ref()? {
        Pattern::Get(path) => (HttpVerb::Get, path.clone()),
        Pattern::Put(path) => (HttpVerb::Put, path.clone()),
        Pattern::Post(path) => (HttpVerb::Post, path.clone()),
        Pattern::Delete(path) => (HttpVerb::Delete, path.clone()),
        Pattern::Patch(path) => (HttpVerb::Patch, path.clone()),
        Pattern::Custom(custom) => (HttpVerb::Custom(custom.kind.clone()), custom.path.clone()),
    };

    Some(HttpRule {
        verb,
        path,
        body: Some(rule.body.clone()).filter(|b| !b.is_empty()),
    })
}

/// Go identifier of a message: its path inside the package, `.` → `_`
fn message_ident(message: &MessageDescriptor) -> String {
    let full_name = message.full_name();
    let local = full_name
        .strip_prefix(message.package_name())
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(full_name);
    go_camel_case(local)
}
