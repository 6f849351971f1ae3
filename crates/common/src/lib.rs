//! Common types and utilities for protoc-gen-vkit
//!
//! This crate contains the intermediate representation produced by the
//! parser and consumed by the generator, the shared error type, and the
//! generator configuration.

pub mod config;

pub use config::GeneratorConfig;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during handler generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Module resolution error: {0}")]
    Module(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// One `.proto` file offered by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoFile {
    /// Path of the file as protoc knows it (e.g., "order/v1/order.proto")
    pub name: String,
    /// Proto package (e.g., "order.v1")
    pub package: String,
    /// Go package name of the generated protobuf code (e.g., "orderv1")
    pub go_package_name: String,
    /// Whether protoc asked for this file to be generated
    pub generate: bool,
    pub services: Vec<ServiceDefinition>,
}

/// An RPC service declared in a proto file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Go identifier of the service (e.g., "OrderService")
    pub go_name: String,
    /// Fully-qualified proto name (e.g., "order.v1.OrderService")
    pub full_name: String,
    pub methods: Vec<RpcMethod>,
}

/// An RPC method as declared, before HTTP mapping is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcMethod {
    /// Proto name of the method (e.g., "GetOrder")
    pub name: String,
    /// Go identifier of the method
    pub go_name: String,
    /// Go identifier of the request message (e.g., "GetOrderReq")
    pub input_type: String,
    /// Go identifier of the reply message
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    /// `(google.api.http)` annotation, if present
    pub http_rule: Option<HttpRule>,
}

/// HTTP binding extracted from a `google.api.http` annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRule {
    pub verb: HttpVerb,
    /// URL path template, passed through unvalidated
    pub path: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// HTTP verb of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    /// `custom` pattern kind, e.g. "HEAD" or "OPTIONS"
    Custom(String),
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVerb::Get => write!(f, "GET"),
            HttpVerb::Post => write!(f, "POST"),
            HttpVerb::Put => write!(f, "PUT"),
            HttpVerb::Delete => write!(f, "DELETE"),
            HttpVerb::Patch => write!(f, "PATCH"),
            HttpVerb::Custom(kind) => write!(f, "{}", kind),
        }
    }
}
