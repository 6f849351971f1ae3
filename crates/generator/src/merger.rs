//! Handler-file merging
//!
//! Each service owns one Go file in the handler directory. A missing file
//! is created with a preamble; an existing one is only ever appended to.
//! Symbols the scanner reports as declared are never emitted again, which
//! keeps hand-written method bodies intact across runs.

use crate::descriptor::ServiceDescriptor;
use crate::registry::Registry;
use crate::scanner::{method_key, ExistingSymbolSet, SymbolOracle, SymbolScanner};
use crate::templates;
use protoc_gen_vkit_common::Result;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to one service's handler file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged(MergeSummary),
    /// The file could not be opened; nothing was written or registered
    Skipped { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub path: PathBuf,
    /// The file did not exist and was created with a preamble
    pub created: bool,
    pub type_appended: bool,
    /// Methods whose stubs were appended
    pub appended: Vec<String>,
    /// Methods already declared in the file
    pub preserved: Vec<String>,
}

/// Handler file name for a service type: `UserInfoService` → `user_info.go`
pub fn handler_file_name(service_type: &str) -> String {
    let short = match service_type.strip_suffix("Service") {
        Some(short) if !short.is_empty() => short,
        _ => service_type,
    };

    let mut name = String::with_capacity(short.len() + 8);
    for (i, c) in short.chars().enumerate() {
        if c.is_uppercase() {
            if i != 0 {
                name.push('_');
            }
            name.extend(c.to_lowercase());
        } else {
            name.push(c);
        }
    }
    name.push_str(".go");
    name
}

/// Appends missing declarations to per-service handler files
pub struct HandlerMerger<'a> {
    handler_dir: &'a Path,
    scanner: &'a dyn SymbolScanner,
}

impl<'a> HandlerMerger<'a> {
    pub fn new(handler_dir: &'a Path, scanner: &'a dyn SymbolScanner) -> Self {
        Self {
            handler_dir,
            scanner,
        }
    }

    /// Merge `service` into its handler file and register it
    ///
    /// `preamble` is only invoked when the file has to be created. Failing
    /// to open the file is reported as `MergeOutcome::Skipped`; failing to
    /// append to an opened file is an error.
    pub fn merge<F>(
        &self,
        service: &ServiceDescriptor,
        registry: &mut Registry,
        preamble: F,
    ) -> Result<MergeOutcome>
    where
        F: FnOnce() -> Result<String>,
    {
        let path = self.handler_dir.join(handler_file_name(&service.service_type));
        let created = !path.exists();

        let opened = if created {
            let preamble = preamble()?;
            self.create_with_preamble(&path, &preamble)
        } else {
            self.open_for_append(&path)
        };

        let (file, existing) = match opened {
            Ok(opened) => opened,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "open handler file failed, skipping service");
                return Ok(MergeOutcome::Skipped {
                    reason: e.to_string(),
                    path,
                });
            }
        };

        let summary = append_missing(&file, &path, created, service, &existing)?;
        registry.register(service);

        Ok(MergeOutcome::Merged(summary))
    }

    /// New file: truncate, write the preamble, then scan from the end of
    /// what was written, which finds nothing
    fn create_with_preamble(
        &self,
        path: &Path,
        preamble: &str,
    ) -> io::Result<(File, ExistingSymbolSet)> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(preamble.as_bytes())?;

        let existing = self.scanner.scan(&mut BufReader::new(&file));
        Ok((file, existing))
    }

    /// Existing file: scan its current content, writes go to the end
    fn open_for_append(&self, path: &Path) -> io::Result<(File, ExistingSymbolSet)> {
        let file = OpenOptions::new().read(true).append(true).open(path)?;

        let existing = self.scanner.scan(&mut BufReader::new(&file));
        Ok((file, existing))
    }
}

fn append_missing(
    file: &File,
    path: &Path,
    created: bool,
    service: &ServiceDescriptor,
    existing: &dyn SymbolOracle,
) -> Result<MergeSummary> {
    let mut writer = BufWriter::new(file);
    let mut summary = MergeSummary {
        path: path.to_path_buf(),
        created,
        type_appended: false,
        appended: Vec::new(),
        preserved: Vec::new(),
    };

    if !existing.is_declared(&service.service_type) {
        writer.write_all(templates::render_service_type(&service.service_type).as_bytes())?;
        summary.type_appended = true;
    }

    for method in &service.methods {
        if existing.is_declared(&method_key(&service.service_type, &method.name)) {
            debug!(service = %service.service_type, method = %method.name, "stub already declared");
            summary.preserved.push(method.name.clone());
            continue;
        }

        writer.write_all(templates::render_method(&service.service_type, method).as_bytes())?;
        debug!(service = %service.service_type, method = %method.name, "stub appended");
        summary.appended.push(method.name.clone());
    }

    writer.flush()?;
    Ok(summary)
}
