//! Service registry and endpoint table emission
//!
//! Accumulates, across the services of one proto file, the handler types
//! to instantiate and one endpoint row per method, then writes them as
//! `zzconfig.go`. That file holds no hand-written code and is rewritten
//! from scratch on every run.

use crate::descriptor::ServiceDescriptor;
use crate::templates::{self, REGISTRY_CONFIG};
use protoc_gen_vkit_common::{GeneratorConfig, GeneratorError, ProtoFile, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;

/// File name of the generated registry
pub const REGISTRY_FILE_NAME: &str = "zzconfig.go";

/// One row of the endpoint table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRow {
    /// `ServiceType.MethodName`
    pub method_key: String,
    pub url: String,
    pub client_stream: bool,
    pub server_stream: bool,
}

/// Registration state for one proto file
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Registry {
    services: Vec<String>,
    endpoints: Vec<EndpointRow>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of every service in `file`, without touching disk
    pub fn from_file(file: &ProtoFile) -> Self {
        let mut registry = Self::new();
        for service in &file.services {
            registry.register(&ServiceDescriptor::build(file, service));
        }
        registry
    }

    /// Record the service type and one endpoint per method, in declaration order
    pub fn register(&mut self, service: &ServiceDescriptor) {
        self.services.push(service.service_type.clone());
        self.endpoints
            .extend(service.methods.iter().map(|method| EndpointRow {
                method_key: format!("{}.{}", service.service_type, method.name),
                url: method.path.clone(),
                client_stream: method.client_stream,
                server_stream: method.server_stream,
            }));
    }

    /// Handler types `GetList()` instantiates
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Rows `GetApiEndpoint()` returns
    pub fn endpoints(&self) -> &[EndpointRow] {
        &self.endpoints
    }
}

/// Writes `zzconfig.go`
pub struct RegistryEmitter<'a> {
    tera: &'a Tera,
    config: &'a GeneratorConfig,
}

impl<'a> RegistryEmitter<'a> {
    pub fn new(tera: &'a Tera, config: &'a GeneratorConfig) -> Self {
        Self { tera, config }
    }

    /// Render the registry source
    pub fn render(&self, registry: &Registry) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("version", &self.config.version);
        context.insert("package_name", &self.config.package_name);
        context.insert("framework_import", &self.config.framework_import);
        context.insert("extra_imports", &self.config.extra_imports);
        context.insert("services", registry.services());
        context.insert("endpoints", registry.endpoints());

        templates::render(self.tera, REGISTRY_CONFIG, &context)
    }

    /// Truncate and rewrite `<dir>/zzconfig.go`
    pub fn emit(&self, registry: &Registry, dir: &Path) -> Result<PathBuf> {
        let rendered = self.render(registry)?;

        let output_path = dir.join(REGISTRY_FILE_NAME);
        fs::write(&output_path, rendered).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            ))
        })?;

        Ok(output_path)
    }
}
