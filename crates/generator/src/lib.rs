//! Incremental handler generation for protoc-gen-vkit
//!
//! For each proto file with services this crate:
//! - derives one `MethodDescriptor` per RPC (HTTP verb, path, streaming mode)
//! - creates or extends one Go handler file per service, appending only the
//!   declarations the existing-symbol scan does not find
//! - rewrites `zzconfig.go` with the service list and endpoint table
//!
//! Handler files are never truncated once they exist; `zzconfig.go` always is.

mod descriptor;
mod driver;
mod merger;
mod module;
mod registry;
mod scanner;
mod templates;

pub use descriptor::{MethodDescriptor, ServiceDescriptor, StreamMode};
pub use driver::{FileReport, HandlerGenerator};
pub use merger::{handler_file_name, HandlerMerger, MergeOutcome, MergeSummary};
pub use module::{proto_import_path, GoModResolver, ModuleResolver};
pub use registry::{EndpointRow, Registry, RegistryEmitter, REGISTRY_FILE_NAME};
pub use scanner::{method_key, ExistingSymbolSet, LinePrefixScanner, SymbolOracle, SymbolScanner};
pub use templates::{load_templates, method_template, render_method, render_service_type};

use protoc_gen_vkit_common::{GeneratorConfig, ProtoFile, Result};

/// Generate handlers for every eligible file (convenience function)
pub fn generate_handlers(files: &[ProtoFile], config: GeneratorConfig) -> Result<Vec<FileReport>> {
    let generator = HandlerGenerator::new(config)?;
    generator.generate(files)
}
