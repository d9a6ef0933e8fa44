//! Typed requests and responses exchanged between clients and servers.
//!
//! Requests travel as Rust values over in-process transports; the serde
//! representation (`{"method": ..., "params": ...}`) exists for logging and
//! test fixtures.

use serde::{Deserialize, Serialize};

use crate::capability::{InitializeRequest, InitializeResult};
use crate::types::{
    CallToolRequest, CallToolResult, ListResourceTemplatesResult, ListResourcesResult,
    ListToolsResult, ReadResourceRequest, ReadResourceResult,
};

/// Method names.
pub mod method {
    /// `initialize`
    pub const INITIALIZE: &str = "initialize";
    /// `ping`
    pub const PING: &str = "ping";
    /// `tools/list`
    pub const LIST_TOOLS: &str = "tools/list";
    /// `tools/call`
    pub const CALL_TOOL: &str = "tools/call";
    /// `resources/list`
    pub const LIST_RESOURCES: &str = "resources/list";
    /// `resources/templates/list`
    pub const LIST_RESOURCE_TEMPLATES: &str = "resources/templates/list";
    /// `resources/read`
    pub const READ_RESOURCE: &str = "resources/read";
}

/// A request from a client to a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Request {
    /// Open a session.
    #[serde(rename = "initialize")]
    Initialize(InitializeRequest),
    /// Liveness check.
    #[serde(rename = "ping")]
    Ping,
    /// List the server's tools.
    #[serde(rename = "tools/list")]
    ListTools,
    /// Invoke a tool.
    #[serde(rename = "tools/call")]
    CallTool(CallToolRequest),
    /// List static resources.
    #[serde(rename = "resources/list")]
    ListResources,
    /// List resource templates.
    #[serde(rename = "resources/templates/list")]
    ListResourceTemplates,
    /// Read a resource by URI.
    #[serde(rename = "resources/read")]
    ReadResource(ReadResourceRequest),
}

impl Request {
    /// The method name of this request.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Initialize(_) => method::INITIALIZE,
            Self::Ping => method::PING,
            Self::ListTools => method::LIST_TOOLS,
            Self::CallTool(_) => method::CALL_TOOL,
            Self::ListResources => method::LIST_RESOURCES,
            Self::ListResourceTemplates => method::LIST_RESOURCE_TEMPLATES,
            Self::ReadResource(_) => method::READ_RESOURCE,
        }
    }
}

/// A server's answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "result")]
pub enum Response {
    /// Answer to [`Request::Initialize`].
    #[serde(rename = "initialize")]
    Initialized(InitializeResult),
    /// Answer to [`Request::Ping`].
    #[serde(rename = "ping")]
    Pong,
    /// Answer to [`Request::ListTools`].
    #[serde(rename = "tools/list")]
    Tools(ListToolsResult),
    /// Answer to [`Request::CallTool`].
    #[serde(rename = "tools/call")]
    ToolResult(CallToolResult),
    /// Answer to [`Request::ListResources`].
    #[serde(rename = "resources/list")]
    Resources(ListResourcesResult),
    /// Answer to [`Request::ListResourceTemplates`].
    #[serde(rename = "resources/templates/list")]
    ResourceTemplates(ListResourceTemplatesResult),
    /// Answer to [`Request::ReadResource`].
    #[serde(rename = "resources/read")]
    ResourceContents(ReadResourceResult),
}

impl Response {
    /// The method this response answers.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Initialized(_) => method::INITIALIZE,
            Self::Pong => method::PING,
            Self::Tools(_) => method::LIST_TOOLS,
            Self::ToolResult(_) => method::CALL_TOOL,
            Self::Resources(_) => method::LIST_RESOURCES,
            Self::ResourceTemplates(_) => method::LIST_RESOURCE_TEMPLATES,
            Self::ResourceContents(_) => method::READ_RESOURCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_wire_shape() {
        let request = Request::CallTool(CallToolRequest::new(
            "read_doc_content",
            serde_json::json!({"doc_id": "plan.md"}),
        ));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "tools/call");
        assert_eq!(json["params"]["arguments"]["doc_id"], "plan.md");

        let ping = serde_json::to_value(Request::Ping).unwrap();
        assert_eq!(ping, serde_json::json!({"method": "ping"}));
    }

    #[test]
    fn test_method_names_match_serde_tags() {
        let requests = [
            Request::Ping,
            Request::ListTools,
            Request::ListResources,
            Request::ListResourceTemplates,
            Request::ReadResource(ReadResourceRequest::new("docs://documents")),
        ];
        for request in requests {
            let json = serde_json::to_value(&request).unwrap();
            assert_eq!(json["method"], request.method());
        }
    }
}
