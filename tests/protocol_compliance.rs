//! A2A protocol wire-format compliance tests
//!
//! These tests pin the JSON shapes the protocol mandates: lowercase role and
//! state strings, `type`-tagged message parts, camelCase field naming and the
//! JSON-RPC 2.0 envelope.

use serde_json::json;

use a2a_runtime::protocol::{
    message::{Message, Part, Role},
    task::{Task, TaskState},
    Artifact,
};
use a2a_runtime::rpc::{JsonRpcRequest, JsonRpcResponse};

#[test]
fn test_role_serialization() {
    let user_msg = Message::user("Hello");
    let json = serde_json::to_value(&user_msg).unwrap();
    assert_eq!(json["role"], "user");

    let agent_msg = Message::agent("Hi there");
    let json = serde_json::to_value(&agent_msg).unwrap();
    assert_eq!(json["role"], "agent");
}

#[test]
fn test_text_part_serialization() {
    let part = Part::text("Hello, world!");
    let json = serde_json::to_value(&part).unwrap();

    assert_eq!(json["type"], "text");
    assert_eq!(json["text"], "Hello, world!");
    assert!(json.get("mimeType").is_none());
}

#[test]
fn test_file_part_serialization() {
    let part = Part::file_named(
        "https://example.com/doc.pdf",
        "application/pdf",
        "document.pdf",
        2048,
    );
    let json = serde_json::to_value(&part).unwrap();

    assert_eq!(json["type"], "file");
    assert_eq!(json["uri"], "https://example.com/doc.pdf");
    assert_eq!(json["mimeType"], "application/pdf");
    assert_eq!(json["name"], "document.pdf");
    assert_eq!(json["size"], 2048);

    // Should NOT use snake_case
    assert!(json.get("mime_type").is_none());
}

#[test]
fn test_data_part_serialization() {
    let data = json!({"key": "value", "count": 42});
    let part = Part::json_data(data.clone());
    let json = serde_json::to_value(&part).unwrap();

    assert_eq!(json["type"], "data");
    assert_eq!(json["data"], data);
    assert_eq!(json["mimeType"], "application/json");
}

#[test]
fn test_unknown_part_type_rejected() {
    let wire = json!({"type": "video", "uri": "https://example.com/clip.mp4"});
    assert!(serde_json::from_value::<Part>(wire).is_err());
}

#[test]
fn test_message_field_naming() {
    let msg = Message::builder()
        .role(Role::User)
        .part(Part::text("Test"))
        .message_id("msg-123")
        .task_id("task-456")
        .context_id("ctx-789")
        .build();

    let json = serde_json::to_value(&msg).unwrap();

    assert_eq!(json["messageId"], "msg-123");
    assert_eq!(json["taskId"], "task-456");
    assert_eq!(json["contextId"], "ctx-789");
    assert!(json.get("timestamp").is_some());

    // Should NOT use snake_case
    assert!(json.get("message_id").is_none());
    assert!(json.get("task_id").is_none());
    assert!(json.get("context_id").is_none());
}

#[test]
fn test_message_optional_fields_omitted() {
    let msg = Message::user("Test");
    let json = serde_json::to_value(&msg).unwrap();

    assert!(json.get("taskId").is_none());
    assert!(json.get("contextId").is_none());
    assert!(json.get("metadata").is_none());
}

#[test]
fn test_task_state_strings() {
    let mut task = Task::new("task-123", Message::user("Test"));
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["status"]["state"], "submitted");

    task.transition(TaskState::Working, None).unwrap();
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["status"]["state"], "working");

    task.transition(TaskState::Completed, None).unwrap();
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["status"]["state"], "completed");

    let mut failing = Task::new("task-124", Message::user("Test"));
    failing.transition(TaskState::Failed, None).unwrap();
    let json = serde_json::to_value(&failing).unwrap();
    assert_eq!(json["status"]["state"], "failed");

    let mut canceled = Task::new("task-125", Message::user("Test"));
    canceled.transition(TaskState::Canceled, None).unwrap();
    let json = serde_json::to_value(&canceled).unwrap();
    assert_eq!(json["status"]["state"], "canceled");
}

#[test]
fn test_task_field_naming() {
    let task = Task::new("task-123", Message::user("Test")).with_context_id("ctx-456");
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["contextId"], "ctx-456");
    assert!(json["status"].get("timestamp").is_some());
    assert!(json.get("context_id").is_none());
}

#[test]
fn test_task_history_mirrors_status() {
    let mut task = Task::new("task-123", Message::user("Test"));
    task.transition(TaskState::Working, Some(Message::agent("on it")))
        .unwrap();

    let json = serde_json::to_value(&task).unwrap();
    let history = json["history"].as_array().unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["state"], "submitted");
    assert_eq!(history.last().unwrap(), &json["status"]);
}

#[test]
fn test_artifact_field_naming() {
    let artifact = Artifact::inline_json("result", &json!({"ok": true})).unwrap();
    let json = serde_json::to_value(&artifact).unwrap();

    assert_eq!(json["mimeType"], "application/json");
    assert!(json.get("createdAt").is_some());
    assert!(json["uri"].as_str().unwrap().starts_with("data:"));
    assert!(json.get("mime_type").is_none());
}

#[test]
fn test_artifact_both_encodings_round_trip() {
    let value = json!({"text": "hello world & more", "n": 7});

    let base64 = Artifact::inline_json("result", &value).unwrap();
    assert!(base64.uri.contains(";base64,"));
    assert_eq!(base64.decode_json().unwrap(), value);

    let percent = Artifact::inline_json_percent("result", &value).unwrap();
    assert!(!percent.uri.contains("base64"));
    assert_eq!(percent.decode_json().unwrap(), value);
}

#[test]
fn test_jsonrpc_request_envelope() {
    let req = JsonRpcRequest::new("message/send", json!({"message": {}}));
    let json = serde_json::to_value(&req).unwrap();

    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["method"], "message/send");
    assert!(json["id"].is_string());
    assert!(json.get("params").is_some());
}

#[test]
fn test_jsonrpc_response_has_exactly_one_outcome() {
    let success = JsonRpcResponse::success(json!(1), json!({"ok": true}));
    let json = serde_json::to_value(&success).unwrap();
    assert!(json.get("result").is_some());
    assert!(json.get("error").is_none());

    let error = JsonRpcResponse::error(
        json!(1),
        a2a_runtime::protocol::JsonRpcError::new(-32601, "Method not found: nope"),
    );
    let json = serde_json::to_value(&error).unwrap();
    assert!(json.get("result").is_none());
    assert_eq!(json["error"]["code"], -32601);
}

#[test]
fn test_message_round_trip() {
    let original = Message::builder()
        .role(Role::Agent)
        .part(Part::text("Hello"))
        .part(Part::file("https://example.com/doc.pdf", "application/pdf"))
        .part(Part::data(json!({"key": "value"})))
        .message_id("msg-123")
        .build();

    let json = serde_json::to_string(&original).unwrap();
    let deserialized: Message = serde_json::from_str(&json).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn test_message_deserialization_from_wire_example() {
    let wire = json!({
        "messageId": "msg-123",
        "role": "user",
        "parts": [
            {"type": "text", "text": "What is the weather?"},
            {"type": "data", "data": {"city": "Berlin"}, "mimeType": "application/json"}
        ],
        "contextId": "ctx-456",
        "timestamp": "2026-01-01T00:00:00Z"
    });

    let msg: Message = serde_json::from_value(wire).unwrap();
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.parts.len(), 2);
    assert_eq!(msg.context_id, Some("ctx-456".to_string()));

    match &msg.parts[1] {
        Part::Data { data, mime_type, .. } => {
            assert_eq!(data["city"], "Berlin");
            assert_eq!(mime_type.as_deref(), Some("application/json"));
        }
        other => panic!("expected data part, got {:?}", other),
    }
}
