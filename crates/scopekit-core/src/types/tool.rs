//! Tool types.
//!
//! Tools are functions a server exposes for clients to invoke. Each tool has
//! a name, an optional description, and a JSON Schema for its arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::Content;

/// A tool definition exposed by a server.
///
/// # Example
///
/// ```rust
/// use scopekit_core::types::Tool;
///
/// let tool = Tool::new("read_doc_content")
///     .description("Read the contents of a document and return it as a string.")
///     .with_string_param("doc_id", "Id of the document to read", true);
///
/// assert_eq!(tool.input_schema["required"][0], "doc_id");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Unique name of the tool.
    pub name: String,
    /// Human-readable description of what the tool does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema defining the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Optional hints about tool behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

impl Tool {
    /// Create a new tool with an empty object schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            annotations: None,
        }
    }

    /// Set the tool's description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the tool's input schema.
    #[must_use]
    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Set the tool's annotations.
    #[must_use]
    pub fn annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Whether the tool is marked as read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.annotations
            .as_ref()
            .and_then(|a| a.read_only_hint)
            .unwrap_or(false)
    }

    /// Add a string parameter to the input schema.
    ///
    /// A schema that is not a JSON object is replaced by an empty object
    /// schema first.
    #[must_use]
    pub fn with_string_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        let schema = self.schema_object();

        let properties = schema
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if !properties.is_object() {
            *properties = Value::Object(Map::new());
        }
        properties[name.as_str()] = serde_json::json!({
            "type": "string",
            "description": description.into()
        });

        if required {
            let list = schema
                .entry("required")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Some(list) = list.as_array_mut() {
                list.push(Value::String(name));
            }
        }
        self
    }

    fn schema_object(&mut self) -> &mut Map<String, Value> {
        if !self.input_schema.is_object() {
            self.input_schema = serde_json::json!({"type": "object"});
        }
        match &mut self.input_schema {
            Value::Object(map) => map,
            _ => unreachable!("schema was normalized to an object"),
        }
    }
}

/// Hints about tool behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    /// Human-readable title for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The tool only reads data.
    #[serde(rename = "readOnlyHint", skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    /// The tool may perform destructive updates.
    #[serde(rename = "destructiveHint", skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
    /// Repeated calls with the same input have no additional effect.
    #[serde(rename = "idempotentHint", skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
}

impl ToolAnnotations {
    /// Annotations for a read-only tool.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read_only_hint: Some(true),
            ..Default::default()
        }
    }

    /// Annotations for a destructive tool.
    #[must_use]
    pub fn destructive() -> Self {
        Self {
            destructive_hint: Some(true),
            ..Default::default()
        }
    }

    /// Mark the tool as idempotent.
    #[must_use]
    pub const fn with_idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent_hint = Some(idempotent);
        self
    }
}

/// The result of calling a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResult {
    /// The content returned by the tool.
    pub content: Vec<Content>,
    /// Set when this result represents an error.
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    /// Create a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: None,
        }
    }

    /// Create an error result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(message)],
            is_error: Some(true),
        }
    }

    /// Whether this result indicates an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// All text content joined with newlines.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(Content::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ergonomic return type for tool handlers, converted into
/// [`CallToolResult`].
#[derive(Debug, Clone)]
pub enum ToolOutput {
    /// Successful output.
    Success(CallToolResult),
    /// Recoverable error, reported to the caller as an error result rather
    /// than a protocol failure.
    RecoverableError {
        /// The error message.
        message: String,
    },
}

impl ToolOutput {
    /// Create a text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Success(CallToolResult::text(text))
    }

    /// Create a recoverable error.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::RecoverableError {
            message: message.into(),
        }
    }
}

impl From<ToolOutput> for CallToolResult {
    fn from(output: ToolOutput) -> Self {
        match output {
            ToolOutput::Success(result) => result,
            ToolOutput::RecoverableError { message } => Self::error(message),
        }
    }
}

/// Response for listing tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// The available tools.
    pub tools: Vec<Tool>,
}

/// Request parameters for calling a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolRequest {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments to pass to the tool.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub arguments: Value,
}

impl CallToolRequest {
    /// Create a tool call request.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tool_builder() {
        let tool = Tool::new("update_doc_content")
            .description("Update a document")
            .with_string_param("doc_id", "Id of the document", true)
            .with_string_param("content", "New content", true)
            .annotations(ToolAnnotations::destructive());

        assert_eq!(tool.input_schema["properties"]["doc_id"]["type"], "string");
        assert_eq!(
            tool.input_schema["required"],
            serde_json::json!(["doc_id", "content"])
        );
        assert!(!tool.is_read_only());
    }

    #[test]
    fn test_non_object_schema_is_replaced() {
        let tool = Tool::new("odd")
            .input_schema(Value::Null)
            .with_string_param("q", "query", false);

        assert_eq!(tool.input_schema["type"], "object");
        assert!(tool.input_schema.get("required").is_none());
    }

    #[test]
    fn test_tool_output_conversion() {
        let result: CallToolResult = ToolOutput::text("Success").into();
        assert!(!result.is_error());
        assert_eq!(result.text_content(), "Success");

        let result: CallToolResult = ToolOutput::error("Document with id x is not found").into();
        assert!(result.is_error());
    }

    #[test]
    fn test_tool_serialization() {
        let json = serde_json::to_string(&Tool::new("test")).unwrap();
        assert!(json.contains("\"name\":\"test\""));
        assert!(json.contains("\"inputSchema\""));

        let result = serde_json::to_value(CallToolResult::error("nope")).unwrap();
        assert_eq!(result["isError"], true);
    }
}
