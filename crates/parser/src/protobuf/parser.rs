//! CodeGeneratorRequest / FileDescriptorSet parser

use super::converter::{self, HTTP_EXTENSION};
use super::descriptor::{RawCodeGeneratorRequest, RawFileDescriptorSet};
use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::FileDescriptorProto;
use protoc_gen_vkit_common::{GeneratorError, ProtoFile, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Protobuf plugin input parser
///
/// Holds a descriptor pool over every file protoc handed over, plus the
/// subset of file names that generation was requested for.
pub struct ProtobufParser {
    /// Descriptor pool for reflection
    pool: DescriptorPool,

    /// File names in input order
    files: Vec<String>,

    /// Files to generate; `None` means every file
    targets: Option<HashSet<String>>,

    /// Raw plugin parameter string (`--vkit_opt=...`)
    parameter: Option<String>,
}

impl ProtobufParser {
    /// Decode a `CodeGeneratorRequest` as read from the plugin's stdin
    pub fn from_code_generator_request(bytes: &[u8]) -> Result<Self> {
        let request = RawCodeGeneratorRequest::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode CodeGeneratorRequest: {}", e))
        })?;

        let (pool, files) = build_pool(request.proto_file)?;

        Ok(Self {
            pool,
            files,
            targets: Some(request.file_to_generate.into_iter().collect()),
            parameter: request.parameter.filter(|p| !p.is_empty()),
        })
    }

    /// Decode a `FileDescriptorSet`; every file in it is a generation target
    ///
    /// The set must be self-contained (`protoc --include_imports`).
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let set = RawFileDescriptorSet::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;

        let (pool, files) = build_pool(set.file)?;

        Ok(Self {
            pool,
            files,
            targets: None,
            parameter: None,
        })
    }

    /// Load a `FileDescriptorSet` from a binary file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ProtobufParser::from_file("order.pb")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes)
    }

    /// Restrict generation to the named files
    pub fn with_targets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Plugin parameter string, if protoc passed one
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// Convert every input file into the `ProtoFile` IR, in input order
    pub fn parse(&self) -> Result<Vec<ProtoFile>> {
        let http = self.pool.get_extension_by_name(HTTP_EXTENSION);

        self.files
            .iter()
            .map(|name| {
                let file = self.pool.get_file_by_name(name).ok_or_else(|| {
                    GeneratorError::Parse(format!("File {} missing from descriptor pool", name))
                })?;
                converter::convert_file(&file, self.is_target(name), http.as_ref())
            })
            .collect()
    }

    fn is_target(&self, name: &str) -> bool {
        match &self.targets {
            Some(targets) => targets.contains(name),
            None => true,
        }
    }
}

/// Create a descriptor pool from undecoded `FileDescriptorProto`s
///
/// Files are handed to the pool as raw bytes so `MethodOptions` keeps
/// its extensions. The names are read separately to preserve input order.
fn build_pool(files: Vec<Vec<u8>>) -> Result<(DescriptorPool, Vec<String>)> {
    let names = files
        .iter()
        .map(|bytes| {
            FileDescriptorProto::decode(bytes.as_slice())
                .map(|file| file.name.unwrap_or_default())
                .map_err(|e| {
                    GeneratorError::Parse(format!("Failed to decode FileDescriptorProto: {}", e))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let set = RawFileDescriptorSet { file: files };
    let pool = DescriptorPool::decode(set.encode_to_vec().as_slice()).map_err(|e| {
        GeneratorError::Parse(format!("Failed to create DescriptorPool: {}", e))
    })?;

    Ok((pool, names))
}
