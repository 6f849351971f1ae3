//! Per-file generation pipeline

use crate::descriptor::ServiceDescriptor;
use crate::merger::{HandlerMerger, MergeOutcome};
use crate::module::{proto_import_path, GoModResolver, ModuleResolver};
use crate::registry::{Registry, RegistryEmitter};
use crate::scanner::{LinePrefixScanner, SymbolScanner};
use crate::templates::{self, HANDLER_HEADER};
use protoc_gen_vkit_common::{GeneratorConfig, GeneratorError, ProtoFile, Result};
use std::fs;
use std::path::PathBuf;
use tera::Tera;
use tracing::info;

/// Result of generating one proto file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub proto_file: String,
    pub handlers: Vec<MergeOutcome>,
    pub registry: Registry,
    pub config_path: PathBuf,
}

/// Handler generator
///
/// Runs, for every proto file protoc asked for that declares services:
/// - one handler-file merge per service
/// - one `zzconfig.go` rewrite with the accumulated registry
pub struct HandlerGenerator {
    config: GeneratorConfig,
    tera: Tera,
    resolver: Box<dyn ModuleResolver>,
    scanner: Box<dyn SymbolScanner>,
}

impl HandlerGenerator {
    /// Create a generator using `go.mod` resolution and the line-prefix scanner
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self {
            config,
            tera,
            resolver: Box::new(GoModResolver),
            scanner: Box::new(LinePrefixScanner),
        })
    }

    pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_scanner(mut self, scanner: impl SymbolScanner + 'static) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate every eligible file, stopping at the first error
    pub fn generate(&self, files: &[ProtoFile]) -> Result<Vec<FileReport>> {
        let mut reports = Vec::new();

        for file in files {
            if !file.generate || file.services.is_empty() {
                continue;
            }
            reports.push(self.generate_file(file)?);
        }

        Ok(reports)
    }

    /// Merge every service of `file` and rewrite its registry
    pub fn generate_file(&self, file: &ProtoFile) -> Result<FileReport> {
        let handler_dir = &self.config.handler_path;
        fs::create_dir_all(handler_dir).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to create handler directory {}: {}",
                handler_dir.display(),
                e
            ))
        })?;

        info!(proto = %file.name, services = file.services.len(), "generating handlers");

        let merger = HandlerMerger::new(handler_dir, self.scanner.as_ref());
        let mut registry = Registry::new();
        let mut handlers = Vec::with_capacity(file.services.len());

        for service in &file.services {
            let descriptor = ServiceDescriptor::build(file, service);
            let outcome = merger.merge(&descriptor, &mut registry, || self.render_header(file))?;
            handlers.push(outcome);
        }

        let config_path = RegistryEmitter::new(&self.tera, &self.config)
            .emit(&registry, handler_dir)?;
        info!(path = %config_path.display(), endpoints = registry.endpoints().len(), "registry written");

        Ok(FileReport {
            proto_file: file.name.clone(),
            handlers,
            registry,
            config_path,
        })
    }

    /// Preamble of a newly created handler file
    fn render_header(&self, file: &ProtoFile) -> Result<String> {
        let proto_import =
            proto_import_path(&self.config, self.resolver.as_ref(), &file.go_package_name)?;

        let mut context = tera::Context::new();
        context.insert("version", &self.config.version);
        context.insert("package_name", &self.config.package_name);
        context.insert("proto_import", &proto_import);

        templates::render(&self.tera, HANDLER_HEADER, &context)
    }
}
