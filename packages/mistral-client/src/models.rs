//! Request and response types for the Mistral chat-completions API

use serde::{Deserialize, Serialize};

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// A single chat message
///
/// Assistant messages may carry tool calls instead of (or in addition
/// to) content; tool messages carry the result of executing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: ChatRole,
    /// Message content; absent on pure tool-call turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Name of the tool a result message answers for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ID of the tool call a result message answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: Some(content.into()),
            tool_calls: None,
            name: None,
            tool_call_id: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: Some(content.into()),
            tool_calls: None,
            name: None,
            tool_call_id: None,
        }
    }

    /// Create a tool-result message answering a specific tool call
    pub fn tool_result(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(content.into()),
            tool_calls: None,
            name: Some(name.into()),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Content of the message, empty when absent
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A tool call requested by the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call ID, echoed back in the tool result
    pub id: String,
    /// The function to invoke
    pub function: FunctionCall,
}

/// Function name and JSON-encoded arguments of a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name
    pub name: String,
    /// Arguments as a JSON string, to be parsed by the executor
    pub arguments: String,
}

/// A tool made available to the model
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: ToolFunction,
}

/// Function declaration inside a tool definition
#[derive(Debug, Clone, Serialize)]
pub struct ToolFunction {
    pub name: String,
    pub description: String,
    /// JSON Schema for the arguments object
    pub parameters: serde_json::Value,
}

impl Tool {
    /// Declare a function tool with a JSON Schema for its arguments
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: "function",
            function: ToolFunction {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Constraint on which tool (if any) the model must call
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolChoice {
    /// One of "auto", "any", "none"
    Mode(&'static str),
    /// Force a specific function
    Function {
        #[serde(rename = "type")]
        kind: &'static str,
        function: ToolChoiceFunction,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolChoiceFunction {
    pub name: String,
}

impl ToolChoice {
    /// Let the model decide whether to call a tool
    pub fn auto() -> Self {
        Self::Mode("auto")
    }

    /// Force the model to call the named function
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function {
            kind: "function",
            function: ToolChoiceFunction { name: name.into() },
        }
    }
}

/// Request for a chat completion
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use
    pub model: String,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Tools offered to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    /// Tool-choice constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

/// Response from a chat completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; the first one is used
    pub choices: Vec<ChatChoice>,
}

/// A single completion choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The assistant's message
    pub message: ChatMessage,
    /// Why generation stopped (e.g. "stop", "tool_calls")
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_serialization() {
        let tool = Tool::function(
            "get_user_playlists",
            "Gets a list of the user's playlists.",
            json!({"type": "object", "properties": {}}),
        );
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "get_user_playlists");
    }

    #[test]
    fn test_tool_choice_serialization() {
        let auto = serde_json::to_value(ToolChoice::auto()).unwrap();
        assert_eq!(auto, json!("auto"));

        let forced = serde_json::to_value(ToolChoice::function("track_recommendation")).unwrap();
        assert_eq!(forced["type"], "function");
        assert_eq!(forced["function"]["name"], "track_recommendation");
    }

    #[test]
    fn test_plain_message_omits_tool_fields() {
        let value = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("tool_calls"));
        assert!(!object.contains_key("tool_call_id"));
    }

    #[test]
    fn test_assistant_tool_call_deserialization() {
        let raw = json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call-1",
                "function": {
                    "name": "track_recommendation",
                    "arguments": "{\"genre\":\"rock\",\"mood\":\"happy\"}",
                },
            }],
        });
        let message: ChatMessage = serde_json::from_value(raw).unwrap();
        assert_eq!(message.role, ChatRole::Assistant);
        assert_eq!(message.content_or_empty(), "");
        let calls = message.tool_calls.unwrap();
        assert_eq!(calls[0].function.name, "track_recommendation");
    }
}
