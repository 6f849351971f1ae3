//! Plugin envelope and `google.api` annotation messages
//!
//! Descriptor files stay as raw bytes until they reach the
//! `DescriptorPool`, so option extensions survive decoding.

/// `google.protobuf.compiler.CodeGeneratorRequest` with undecoded files
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(bytes, repeated, tag = "15")]
    pub proto_file: Vec<Vec<u8>>,
}

/// `google.protobuf.FileDescriptorSet` with undecoded files
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFileDescriptorSet {
    #[prost(bytes, repeated, tag = "1")]
    pub file: Vec<Vec<u8>>,
}

/// `google.api.HttpRule`, the payload of the `(google.api.http)` method option
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HttpRuleProto {
    #[prost(string, tag = "1")]
    pub selector: String,
    #[prost(oneof = "http_rule_proto::Pattern", tags = "2, 3, 4, 5, 6, 8")]
    pub pattern: Option<http_rule_proto::Pattern>,
    #[prost(string, tag = "7")]
    pub body: String,
    #[prost(string, tag = "12")]
    pub response_body: String,
    #[prost(message, repeated, tag = "11")]
    pub additional_bindings: Vec<HttpRuleProto>,
}

pub mod http_rule_proto {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Pattern {
        #[prost(string, tag = "2")]
        Get(String),
        #[prost(string, tag = "3")]
        Put(String),
        #[prost(string, tag = "4")]
        Post(String),
        #[prost(string, tag = "5")]
        Delete(String),
        #[prost(string, tag = "6")]
        Patch(String),
        #[prost(message, tag = "8")]
        Custom(super::CustomHttpPattern),
    }
}

/// `google.api.CustomHttpPattern`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomHttpPattern {
    #[prost(string, tag = "1")]
    pub kind: String,
    #[prost(string, tag = "2")]
    pub path: String,
}
