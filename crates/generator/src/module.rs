//! Go module path resolution

use protoc_gen_vkit_common::{GeneratorConfig, GeneratorError, Result};
use std::fs;
use std::path::Path;

/// Resolves the Go module root import path for a directory
#[cfg_attr(test, mockall::automock)]
pub trait ModuleResolver {
    fn module_path(&self, dir: &Path) -> Result<String>;
}

/// Reads the `module` directive of `<dir>/go.mod`
#[derive(Debug, Default, Clone, Copy)]
pub struct GoModResolver;

impl ModuleResolver for GoModResolver {
    fn module_path(&self, dir: &Path) -> Result<String> {
        let go_mod = dir.join("go.mod");
        let content = fs::read_to_string(&go_mod).map_err(|e| {
            GeneratorError::Module(format!("Failed to read {}: {}", go_mod.display(), e))
        })?;

        content
            .lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix("module"))
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
            .map(|rest| rest.trim().trim_matches('"').to_string())
            .filter(|module| !module.is_empty())
            .ok_or_else(|| {
                GeneratorError::Module(format!("No module directive in {}", go_mod.display()))
            })
    }
}

/// Import path of the generated protobuf package for new handler files
///
/// An explicit `proto_import_path` wins. Otherwise, when protoc runs from a
/// directory ending in `proto`, the package lives under
/// `<module of handler_path/..>/proto/`; from anywhere else it lives
/// directly under the module of the working directory.
pub fn proto_import_path(
    config: &GeneratorConfig,
    resolver: &dyn ModuleResolver,
    go_package_name: &str,
) -> Result<String> {
    if let Some(path) = &config.proto_import_path {
        return Ok(path.clone());
    }

    let module_of = |dir: &Path| match &config.module {
        Some(module) => Ok(module.clone()),
        None => resolver.module_path(dir),
    };

    let work_dir = config.work_dir.to_string_lossy();
    if work_dir.trim_end_matches('/').ends_with("proto") {
        let module = module_of(&config.handler_path.join(".."))?;
        Ok(format!("{}/proto/{}", module, go_package_name))
    } else {
        let module = module_of(&config.work_dir)?;
        Ok(format!("{}/{}", module, go_package_name))
    }
}
