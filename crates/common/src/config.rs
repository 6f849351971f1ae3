//! Generator configuration
//!
//! Configuration is layered: built-in defaults, then an optional YAML
//! file, then the protoc plugin parameter string, then CLI flags.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default import path of the RPC framework referenced by `zzconfig.go`
pub const DEFAULT_FRAMEWORK_IMPORT: &str = "github.com/visonlv/go-vkit/grpcx";

/// Settings threaded through one generator run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the handler files and `zzconfig.go` are written to
    pub handler_path: PathBuf,
    /// Go module root import path; resolved from `go.mod` when unset
    pub module: Option<String>,
    /// Import path of the generated protobuf package; derived when unset
    pub proto_import_path: Option<String>,
    /// Go package clause of the generated files
    pub package_name: String,
    /// Import path of the RPC framework providing `ApiEndpoint`
    pub framework_import: String,
    /// Additional imports for `zzconfig.go`
    pub extra_imports: Vec<String>,
    /// Generator version written into file headers
    pub version: String,
    /// Directory protoc was invoked from
    pub work_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            handler_path: PathBuf::from("./handler"),
            module: None,
            proto_import_path: None,
            package_name: "handler".to_string(),
            framework_import: DEFAULT_FRAMEWORK_IMPORT.to_string(),
            extra_imports: Vec::new(),
            version: format!("v{}", env!("CARGO_PKG_VERSION")),
            work_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file, filling gaps with defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Apply a protoc parameter string (`key=value,key=value`)
    ///
    /// A `config=<path>` entry replaces the current settings with the YAML
    /// file before the remaining entries are applied, wherever it appears.
    pub fn apply_parameters(mut self, parameter: &str) -> Result<Self> {
        let entries = parameter
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.split_once('=').ok_or_else(|| {
                    GeneratorError::Config(format!("Plugin parameter without a value: {}", p))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some((_, path)) = entries.iter().find(|(k, _)| *k == "config") {
            let version = self.version.clone();
            let work_dir = self.work_dir.clone();
            self = Self::load(Path::new(path))?;
            self.version = version;
            self.work_dir = work_dir;
        }

        for (key, value) in entries {
            match key {
                "config" => {}
                "handler_path" => self.handler_path = PathBuf::from(value),
                "module" => self.module = Some(value.to_string()),
                "proto_import_path" => self.proto_import_path = Some(value.to_string()),
                "package" => self.package_name = value.to_string(),
                "framework_import" => self.framework_import = value.to_string(),
                "import" => self.extra_imports.push(value.to_string()),
                other => {
                    return Err(GeneratorError::Config(format!(
                        "Unknown plugin parameter: {}",
                        other
                    )))
                }
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.handler_path, PathBuf::from("./handler"));
        assert_eq!(config.package_name, "handler");
        assert_eq!(config.framework_import, DEFAULT_FRAMEWORK_IMPORT);
        assert!(config.version.starts_with('v'));
    }

    #[test]
    fn test_apply_parameters() {
        let config = GeneratorConfig::default()
            .apply_parameters("handler_path=./svc/handler, module=example.com/app,import=fmt")
            .unwrap();

        assert_eq!(config.handler_path, PathBuf::from("./svc/handler"));
        assert_eq!(config.module.as_deref(), Some("example.com/app"));
        assert_eq!(config.extra_imports, vec!["fmt".to_string()]);
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let result = GeneratorConfig::default().apply_parameters("paths=source_relative");
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_parameter_without_value_rejected() {
        let result = GeneratorConfig::default().apply_parameters("module=example.com/app,handler_path");
        assert!(matches!(result, Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_yaml_config_then_parameters() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "handler_path: ./from_yaml").unwrap();
        writeln!(file, "package_name: api").unwrap();
        writeln!(file, "extra_imports:").unwrap();
        writeln!(file, "  - \"strings\"").unwrap();

        let parameter = format!(
            "handler_path=./override,config={}",
            file.path().display()
        );
        let config = GeneratorConfig::default()
            .apply_parameters(&parameter)
            .unwrap();

        assert_eq!(config.handler_path, PathBuf::from("./override"));
        assert_eq!(config.package_name, "api");
        assert_eq!(config.extra_imports, vec!["strings".to_string()]);
        assert_eq!(config.framework_import, DEFAULT_FRAMEWORK_IMPORT);
    }
}
