//! Integration test for the protobuf plugin input parser

use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet, FileOptions,
    MethodDescriptorProto, OneofDescriptorProto, ServiceDescriptorProto,
};
use protoc_gen_vkit_common::HttpVerb;
use protoc_gen_vkit_parser::ProtobufParser;

fn message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn method(name: &str, input: &str, output: &str, client: bool, server: bool) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        client_streaming: Some(client),
        server_streaming: Some(server),
        ..Default::default()
    }
}

/// Order service with one method per streaming mode
fn create_order_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("order/v1/order.proto".to_string()),
        package: Some("order.v1".to_string()),
        message_type: vec![message("GetOrderReq"), message("GetOrderResp")],
        service: vec![ServiceDescriptorProto {
            name: Some("OrderService".to_string()),
            method: vec![
                method("GetOrder", ".order.v1.GetOrderReq", ".order.v1.GetOrderResp", false, false),
                method("Upload", ".order.v1.GetOrderReq", ".order.v1.GetOrderResp", true, false),
                method("Watch", ".order.v1.GetOrderReq", ".order.v1.GetOrderResp", false, true),
                method("Chat", ".order.v1.GetOrderReq", ".order.v1.GetOrderResp", true, true),
            ],
            ..Default::default()
        }],
        options: Some(FileOptions {
            go_package: Some("example.com/app/proto/orderv1;orderv1".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn create_common_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("common/types.proto".to_string()),
        package: Some("common".to_string()),
        message_type: vec![message("Empty")],
        ..Default::default()
    }
}

#[test]
fn test_parse_code_generator_request() {
    let request = CodeGeneratorRequest {
        file_to_generate: vec!["order/v1/order.proto".to_string()],
        parameter: Some("handler_path=./handler".to_string()),
        proto_file: vec![create_common_file(), create_order_file()],
        ..Default::default()
    };

    let parser = ProtobufParser::from_code_generator_request(&request.encode_to_vec()).unwrap();
    assert_eq!(parser.parameter(), Some("handler_path=./handler"));

    let files = parser.parse().unwrap();
    assert_eq!(files.len(), 2);

    let common = &files[0];
    assert!(!common.generate, "dependencies are not generated");
    assert!(common.services.is_empty());

    let order = &files[1];
    assert!(order.generate);
    assert_eq!(order.package, "order.v1");
    assert_eq!(order.go_package_name, "orderv1");
    assert_eq!(order.services.len(), 1);

    let service = &order.services[0];
    assert_eq!(service.go_name, "OrderService");
    assert_eq!(service.full_name, "order.v1.OrderService");

    let modes: Vec<(&str, bool, bool)> = service
        .methods
        .iter()
        .map(|m| (m.go_name.as_str(), m.client_streaming, m.server_streaming))
        .collect();
    assert_eq!(
        modes,
        vec![
            ("GetOrder", false, false),
            ("Upload", true, false),
            ("Watch", false, true),
            ("Chat", true, true),
        ]
    );

    let get_order = &service.methods[0];
    assert_eq!(get_order.input_type, "GetOrderReq");
    assert_eq!(get_order.output_type, "GetOrderResp");
    assert!(get_order.http_rule.is_none());
}

#[test]
fn test_parse_file_descriptor_set_targets_everything() {
    let set = FileDescriptorSet {
        file: vec![create_common_file(), create_order_file()],
    };

    let parser = ProtobufParser::from_file_descriptor_set(&set.encode_to_vec()).unwrap();
    let files = parser.parse().unwrap();
    assert!(files.iter().all(|f| f.generate));

    let parser = ProtobufParser::from_file_descriptor_set(&set.encode_to_vec())
        .unwrap()
        .with_targets(["common/types.proto"]);
    let files = parser.parse().unwrap();
    assert!(files[0].generate);
    assert!(!files[1].generate);
}

fn varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Length-delimited field `tag` wrapping `payload`
fn field(tag: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    varint((u64::from(tag) << 3) | 2, &mut out);
    varint(payload.len() as u64, &mut out);
    out.extend_from_slice(payload);
    out
}

fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.concat()
}

fn string_field(name: &str, number: i32, oneof: Option<i32>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::String as i32),
        oneof_index: oneof,
        ..Default::default()
    }
}

fn message_field(name: &str, number: i32, type_name: &str, label: Label) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(Type::Message as i32),
        type_name: Some(type_name.to_string()),
        ..Default::default()
    }
}

/// `google/api/http.proto`
fn create_http_file() -> FileDescriptorProto {
    let mut custom = message_field("custom", 8, ".google.api.CustomHttpPattern", Label::Optional);
    custom.oneof_index = Some(0);

    FileDescriptorProto {
        name: Some("google/api/http.proto".to_string()),
        package: Some("google.api".to_string()),
        message_type: vec![
            DescriptorProto {
                name: Some("HttpRule".to_string()),
                field: vec![
                    string_field("selector", 1, None),
                    string_field("get", 2, Some(0)),
                    string_field("put", 3, Some(0)),
                    string_field("post", 4, Some(0)),
                    string_field("delete", 5, Some(0)),
                    string_field("patch", 6, Some(0)),
                    string_field("body", 7, None),
                    custom,
                    message_field("additional_bindings", 11, ".google.api.HttpRule", Label::Repeated),
                    string_field("response_body", 12, None),
                ],
                oneof_decl: vec![OneofDescriptorProto {
                    name: Some("pattern".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            },
            DescriptorProto {
                name: Some("CustomHttpPattern".to_string()),
                field: vec![string_field("kind", 1, None), string_field("path", 2, None)],
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

/// `google/api/annotations.proto`
fn create_annotations_file() -> FileDescriptorProto {
    let mut http = message_field("http", 72295728, ".google.api.HttpRule", Label::Optional);
    http.extendee = Some(".google.protobuf.MethodOptions".to_string());

    FileDescriptorProto {
        name: Some("google/api/annotations.proto".to_string()),
        package: Some("google.api".to_string()),
        dependency: vec![
            "google/api/http.proto".to_string(),
            "google/protobuf/descriptor.proto".to_string(),
        ],
        extension: vec![http],
        ..Default::default()
    }
}

fn create_descriptor_file() -> FileDescriptorProto {
    DescriptorPool::global()
        .get_file_by_name("google/protobuf/descriptor.proto")
        .expect("descriptor.proto is a well-known file")
        .file_descriptor_proto()
        .clone()
}

/// Annotated method, with `MethodOptions` spliced in as raw bytes
fn annotated_method(name: &str, input: &str, output: &str, rule: &[u8]) -> Vec<u8> {
    let plain = method(name, input, output, false, false).encode_to_vec();
    let options = field(72295728, rule);
    concat(&[plain, field(4, &options)])
}

/// `user.proto` with `GET /v1/users/{id}` and `PATCH /v1/users/{user.id}` bindings
fn create_user_file() -> Vec<u8> {
    let get_rule = field(2, b"/v1/users/{id}");
    let patch_rule = concat(&[field(6, b"/v1/users/{user.id}"), field(7, b"user")]);

    let service = concat(&[
        ServiceDescriptorProto {
            name: Some("UserService".to_string()),
            ..Default::default()
        }
        .encode_to_vec(),
        field(2, &annotated_method("GetUser", ".user.GetUserReq", ".user.User", &get_rule)),
        field(2, &annotated_method("UpdateUser", ".user.UpdateUserReq", ".user.User", &patch_rule)),
        field(2, &method("DeleteUser", ".user.GetUserReq", ".user.User", false, false).encode_to_vec()),
    ]);

    let file = FileDescriptorProto {
        name: Some("user.proto".to_string()),
        package: Some("user".to_string()),
        dependency: vec!["google/api/annotations.proto".to_string()],
        message_type: vec![message("GetUserReq"), message("UpdateUserReq"), message("User")],
        ..Default::default()
    };
    concat(&[file.encode_to_vec(), field(6, &service)])
}

#[test]
fn test_http_annotation_is_extracted() {
    let request = CodeGeneratorRequest {
        file_to_generate: vec!["user.proto".to_string()],
        ..Default::default()
    };
    let dependencies = [
        create_descriptor_file(),
        create_http_file(),
        create_annotations_file(),
    ];

    let mut bytes = request.encode_to_vec();
    for file in &dependencies {
        bytes.extend(field(15, &file.encode_to_vec()));
    }
    bytes.extend(field(15, &create_user_file()));

    let files = ProtobufParser::from_code_generator_request(&bytes)
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(files.len(), 4);

    let user = &files[3];
    assert!(user.generate);
    assert!(files[..3].iter().all(|f| !f.generate));

    let methods = &user.services[0].methods;
    assert_eq!(methods.len(), 3);

    let get = methods[0].http_rule.as_ref().unwrap();
    assert_eq!(get.verb, HttpVerb::Get);
    assert_eq!(get.path, "/v1/users/{id}");
    assert_eq!(get.body, None);

    let patch = methods[1].http_rule.as_ref().unwrap();
    assert_eq!(patch.verb, HttpVerb::Patch);
    assert_eq!(patch.path, "/v1/users/{user.id}");
    assert_eq!(patch.body.as_deref(), Some("user"));

    assert!(methods[2].http_rule.is_none());
    assert_eq!(methods[2].input_type, "GetUserReq");

    // No go_package: derived from the proto package
    assert_eq!(user.go_package_name, "user");
}

#[test]
fn test_from_file() {
    let set = FileDescriptorSet {
        file: vec![create_order_file()],
    };
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("order.pb");
    std::fs::write(&path, set.encode_to_vec()).unwrap();

    let files = ProtobufParser::from_file(&path).unwrap().parse().unwrap();
    assert_eq!(files[0].services[0].methods.len(), 4);

    assert!(ProtobufParser::from_file(dir.path().join("missing.pb")).is_err());
}
