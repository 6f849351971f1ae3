//! Protobuf input decoding for protoc-gen-vkit
//!
//! This crate turns what protoc hands a plugin (a `CodeGeneratorRequest`)
//! or a serialized `FileDescriptorSet` into the `ProtoFile` intermediate
//! representation.
//!
//! ## Naming
//! Go identifiers are derived the way protoc-gen-go derives them, so the
//! generated handlers line up with the generated `pb` package:
//! - services and methods: camel-cased proto names
//! - messages: path inside the owning package, `.` → `_`

mod go_names;
mod protobuf;

pub use go_names::{go_camel_case, go_package_name, go_sanitized};
pub use protobuf::descriptor;
pub use protobuf::ProtobufParser;
