//! Unit tests for message models.

use super::*;

#[cfg(test)]
mod message_role_tests {
    use super::*;

    #[test]
    fn display_roles() {
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
        assert_eq!(MessageRole::System.to_string(), "system");
        assert_eq!(MessageRole::Tool.to_string(), "tool");
        assert_eq!(MessageRole::Other.to_string(), "other");
    }

    #[test]
    fn from_user_variants() {
        assert_eq!(MessageRole::from("user"), MessageRole::User);
        assert_eq!(MessageRole::from("USER"), MessageRole::User);
        assert_eq!(MessageRole::from("human"), MessageRole::User);
    }

    #[test]
    fn from_assistant_variants() {
        assert_eq!(MessageRole::from("assistant"), MessageRole::Assistant);
        assert_eq!(MessageRole::from("ai"), MessageRole::Assistant);
        assert_eq!(MessageRole::from("bot"), MessageRole::Assistant);
    }

    #[test]
    fn from_unknown_returns_other() {
        assert_eq!(MessageRole::from("narrator"), MessageRole::Other);
        assert_eq!(MessageRole::from(""), MessageRole::Other);
    }

    #[test]
    fn unknown_role_deserializes_to_other() {
        let role: MessageRole = serde_json::from_str("\"data\"").expect("deserialize");
        assert_eq!(role, MessageRole::Other);
    }
}

#[cfg(test)]
mod message_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_message_without_parts() {
        let message: Message = serde_json::from_value(json!({
            "id": "m1",
            "role": "assistant",
            "content": "hi"
        }))
        .expect("deserialize");

        assert!(message.parts.is_none());
        assert!(message.parts().is_empty());
        assert_eq!(message.content, "hi");
    }

    #[test]
    fn message_with_mixed_parts() {
        let message: Message = serde_json::from_value(json!({
            "id": "m2",
            "role": "assistant",
            "content": "Hello",
            "parts": [
                {"type": "step-start"},
                {"type": "tool-invocation", "toolInvocation": {
                    "toolCallId": "c1", "toolName": "web_search", "args": "{\"query\":\"x\"}"
                }},
                {"type": "text", "text": "Hello"}
            ]
        }))
        .expect("deserialize");

        let parts = message.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], MessagePart::Unknown);
        assert!(parts[1].as_tool_invocation().is_some());
        assert_eq!(parts[2].as_text(), Some("Hello"));
    }

    #[test]
    fn push_part_creates_list() {
        let mut message = Message::new("m3", MessageRole::Assistant);
        assert!(message.parts.is_none());
        message.push_part(MessagePart::text("a"));
        assert_eq!(message.parts().len(), 1);
    }

    #[test]
    fn user_constructor_sets_content() {
        let message = Message::user("u1", "question");
        assert_eq!(message.role, MessageRole::User);
        assert_eq!(message.content, "question");
    }
}
