//! Protobuf plugin input parser
//!
//! Decodes the descriptors protoc sends to a plugin and maps them to
//! `ProtoFile` values.
//!
//! ## Sources
//! - **CodeGeneratorRequest**: read from stdin when running as a protoc plugin
//! - **FileDescriptorSet**: produced by `protoc --descriptor_set_out`, for offline runs
//!
//! ## Example
//! ```rust,ignore
//! use protoc_gen_vkit_parser::ProtobufParser;
//!
//! let parser = ProtobufParser::from_code_generator_request(&stdin_bytes)?;
//! let files = parser.parse()?;
//! ```

mod converter;
pub mod descriptor;
mod parser;

pub use parser::ProtobufParser;
