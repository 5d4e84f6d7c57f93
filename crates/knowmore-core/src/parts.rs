//! Typed message parts and the part classifier.
//!
//! Parts use the wire shape produced by the chat client SDK:
//!
//! ```json
//! { "type": "text", "text": "Hello" }
//! { "type": "tool-invocation",
//!   "toolInvocation": { "toolCallId": "call_1", "toolName": "web_search",
//!                       "args": { "query": "rust" }, "result": [ ... ] } }
//! ```
//!
//! A part's resolution state is never read from the wire. It is derived from
//! whether `result` is present, because the transport fills `result` in place
//! on an existing part when the tool finishes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DEFAULT_WEB_SEARCH_TOOL;

/// One ordered element of a message's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessagePart {
    /// A complete block of assistant prose.
    Text {
        #[serde(default)]
        text: String,
    },

    /// A call to an external tool and, once available, its result.
    ToolInvocation {
        #[serde(rename = "toolInvocation")]
        tool_invocation: ToolInvocation,
    },

    /// Any part type this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl MessagePart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an in-flight tool invocation part.
    pub fn tool_call(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        args: Value,
    ) -> Self {
        Self::ToolInvocation {
            tool_invocation: ToolInvocation::new(tool_call_id, tool_name, args),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_invocation(&self) -> Option<&ToolInvocation> {
        match self {
            Self::ToolInvocation { tool_invocation } => Some(tool_invocation),
            _ => None,
        }
    }

    pub fn as_tool_invocation_mut(&mut self) -> Option<&mut ToolInvocation> {
        match self {
            Self::ToolInvocation { tool_invocation } => Some(tool_invocation),
            _ => None,
        }
    }
}

/// A tool call record as delivered by the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(rename = "toolCallId", default)]
    pub tool_call_id: String,

    #[serde(rename = "toolName", default)]
    pub tool_name: String,

    /// Call arguments: a JSON-encoded string or a structured object.
    #[serde(default)]
    pub args: Value,

    /// Tool output. Absent (or null) while the call is in flight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// State string as reported by the sender. Informational only, see
    /// [`ToolInvocation::state`].
    #[serde(rename = "state", default, skip_serializing_if = "Option::is_none")]
    pub reported_state: Option<String>,
}

impl ToolInvocation {
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<String>, args: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
            result: None,
            reported_state: Some("call".to_string()),
        }
    }

    /// Resolution state, computed from the presence of a non-null `result`.
    pub fn state(&self) -> ToolState {
        if self.result.as_ref().is_some_and(|result| !result.is_null()) {
            ToolState::Resolved
        } else {
            ToolState::Pending
        }
    }

    /// Store the tool's outcome in place. A null outcome leaves the call pending.
    pub fn resolve(&mut self, result: Value) {
        if result.is_null() {
            return;
        }
        self.result = Some(result);
        self.reported_state = Some("result".to_string());
    }
}

/// Resolution state of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolState {
    Pending,
    Resolved,
}

/// Tools this crate knows how to render, with a fallback for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind<'a> {
    WebSearch,
    Other(&'a str),
}

/// A tool invocation part after classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedTool<'a> {
    pub kind: ToolKind<'a>,
    pub tool_name: &'a str,
    pub state: ToolState,
    pub args: &'a Value,
    pub result: Option<&'a Value>,
}

/// What a single part contributes to rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartKind<'a> {
    Text(&'a str),
    ToolInvocation(ClassifiedTool<'a>),
    /// Unknown part type; contributes nothing.
    None,
}

/// Decides the kind of each part. Holds the web-search tool identifier.
#[derive(Debug, Clone)]
pub struct PartClassifier {
    web_search_tool: String,
}

impl Default for PartClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_WEB_SEARCH_TOOL)
    }
}

impl PartClassifier {
    pub fn new(web_search_tool: impl Into<String>) -> Self {
        Self {
            web_search_tool: web_search_tool.into(),
        }
    }

    pub fn web_search_tool(&self) -> &str {
        &self.web_search_tool
    }

    /// Classify a part. State is recomputed on every call.
    pub fn classify<'a>(&self, part: &'a MessagePart) -> PartKind<'a> {
        match part {
            MessagePart::Text { text } => PartKind::Text(text),
            MessagePart::ToolInvocation { tool_invocation } => {
                let name = tool_invocation.tool_name.as_str();
                let kind = if name == self.web_search_tool {
                    ToolKind::WebSearch
                } else {
                    ToolKind::Other(name)
                };
                let result = tool_invocation
                    .result
                    .as_ref()
                    .filter(|result| !result.is_null());
                PartKind::ToolInvocation(ClassifiedTool {
                    kind,
                    tool_name: name,
                    state: tool_invocation.state(),
                    args: &tool_invocation.args,
                    result,
                })
            }
            MessagePart::Unknown => PartKind::None,
        }
    }
}

/// Classify a part using the default web-search tool name.
pub fn classify(part: &MessagePart) -> PartKind<'_> {
    PartClassifier::default().classify(part)
}
