use serde::{Deserialize, Serialize};

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
    /// Tool result
    Tool,
    /// Legacy function result
    Function,
}

/// Message in a conversation
///
/// Use the role constructors; each sets only the fields that role uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author
    pub role: Role,
    /// Text or structured parts; absent on tool-call-only assistant turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Participant or function name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Legacy function call made by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    /// Tool calls made by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Tool call this message answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    const fn bare(role: Role, content: Option<Content>) -> Self {
        Self {
            role,
            content,
            name: None,
            function_call: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::bare(Role::System, Some(Content::Text(content.into())))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::bare(Role::User, Some(Content::Text(content.into())))
    }

    /// User message attributed to a named participant
    pub fn user_named(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::user(content)
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::bare(Role::Assistant, Some(Content::Text(content.into())))
    }

    /// Assistant turn that requested tool calls, with optional text
    pub fn assistant_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::bare(Role::Assistant, content.filter(|c| !c.is_empty()).map(Content::Text))
        }
    }

    /// Result of the tool call `tool_call_id`
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::bare(Role::Tool, Some(Content::Text(content.into())))
        }
    }

    /// Result of the legacy function `name`
    pub fn function(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::bare(Role::Function, Some(Content::Text(content.into())))
        }
    }

    /// User message with text followed by images
    pub fn multimodal<I, S>(text: impl Into<String>, image_urls: I, detail: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = vec![ContentPart::Text { text: text.into() }];
        parts.extend(image_urls.into_iter().map(|url| ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: Some(detail.to_owned()),
            },
        }));

        Self::bare(Role::User, Some(Content::Parts(parts)))
    }

    /// Text content, joining text parts
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().map(Content::as_text)
    }
}

/// Message content, either plain text or structured parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text content
    Text(String),
    /// Text and image parts
    Parts(Vec<ContentPart>),
}

impl Content {
    /// Text of the content, joining parts if necessary
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect(),
        }
    }
}

/// Part of a multipart message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text block
    Text {
        /// The text
        text: String,
    },
    /// Image reference
    ImageUrl {
        /// Image location
        image_url: ImageUrl,
    },
}

/// Image location and detail hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// URL or base64 data URI
    pub url: String,
    /// Detail level (`auto`, `low`, `high`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Tool call requested by the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier
    pub id: String,
    /// Tool type, always `function`
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    /// Function name and arguments
    pub function: FunctionCall,
}

impl ToolCall {
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            call_type: function_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Function name and JSON-encoded arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Tool the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool type, always `function`
    #[serde(rename = "type", default = "function_type")]
    pub tool_type: String,
    /// Function specification
    pub function: FunctionDefinition,
}

impl Tool {
    pub fn function(name: impl Into<String>, description: Option<String>, parameters: Option<serde_json::Value>) -> Self {
        Self {
            tool_type: function_type(),
            function: FunctionDefinition {
                name: name.into(),
                description,
                parameters,
            },
        }
    }
}

/// Function specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Requested response format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text
    Text,
    /// A JSON object
    JsonObject,
}

fn function_type() -> String {
    "function".to_owned()
}
