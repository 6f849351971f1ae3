//! Method and service descriptors
//!
//! Normalizes one RPC method plus its optional HTTP rule into the shape
//! the templates and the endpoint table consume.

use protoc_gen_vkit_common::{HttpVerb, ProtoFile, RpcMethod, ServiceDefinition};
use serde::Serialize;

/// Streaming cardinality of a method, one template per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamMode {
    Unary,
    ClientStreaming,
    ServerStreaming,
    Bidirectional,
}

impl StreamMode {
    pub fn from_flags(client_stream: bool, server_stream: bool) -> Self {
        match (client_stream, server_stream) {
            (false, false) => StreamMode::Unary,
            (true, false) => StreamMode::ClientStreaming,
            (false, true) => StreamMode::ServerStreaming,
            (true, true) => StreamMode::Bidirectional,
        }
    }
}

/// Normalized view of one RPC method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    /// Go method name
    pub name: String,
    pub verb: HttpVerb,
    /// URL template; taken verbatim from the annotation when present
    pub path: String,
    pub request_type: String,
    pub reply_type: String,
    pub client_stream: bool,
    pub server_stream: bool,
    /// Body selector of the HTTP rule, if any
    pub body: Option<String>,
}

impl MethodDescriptor {
    /// Build the descriptor for `method` of `service`
    ///
    /// Without an HTTP annotation the method is routed as
    /// `POST /<full.service.Name>/<Method>`. Streaming flags always come
    /// from the method declaration.
    pub fn build(service: &ServiceDefinition, method: &RpcMethod) -> Self {
        let (verb, path, body) = match &method.http_rule {
            Some(rule) => (rule.verb.clone(), rule.path.clone(), rule.body.clone()),
            None => (
                HttpVerb::Post,
                format!("/{}/{}", service.full_name, method.name),
                None,
            ),
        };

        Self {
            name: method.go_name.clone(),
            verb,
            path,
            request_type: method.input_type.clone(),
            reply_type: method.output_type.clone(),
            client_stream: method.client_streaming,
            server_stream: method.server_streaming,
            body,
        }
    }

    pub fn stream_mode(&self) -> StreamMode {
        StreamMode::from_flags(self.client_stream, self.server_stream)
    }
}

/// One service of the proto file currently being generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    /// Go receiver type name (e.g., "OrderService")
    pub service_type: String,
    /// Fully-qualified proto name (e.g., "order.v1.OrderService")
    pub service_name: String,
    /// Proto file the service was declared in
    pub source_path: String,
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn build(file: &ProtoFile, service: &ServiceDefinition) -> Self {
        Self {
            service_type: service.go_name.clone(),
            service_name: service.full_name.clone(),
            source_path: file.name.clone(),
            methods: service
                .methods
                .iter()
                .map(|method| MethodDescriptor::build(service, method))
                .collect(),
        }
    }
}
