//! Resource types.
//!
//! Resources are addressable data a server exposes. Static resources have a
//! fixed URI; templates describe a family of URIs with `{param}`
//! placeholders such as `docs://{doc_id}`.

use serde::{Deserialize, Serialize};

/// A static resource exposed by a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// URI identifying the resource.
    pub uri: String,
    /// Human-readable name.
    pub name: String,
    /// Description of the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource content.
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Resource {
    /// Create a new resource with a URI and name.
    #[must_use]
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A template for parameterized resource URIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTemplate {
    /// URI template with `{param}` placeholders.
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    /// Human-readable name for this resource family.
    pub name: String,
    /// Description of the template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of resources matching this template.
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ResourceTemplate {
    /// Create a new resource template.
    #[must_use]
    pub fn new(uri_template: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri_template: uri_template.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// The contents of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContents {
    /// URI of the resource.
    pub uri: String,
    /// MIME type of the content.
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Text content.
    pub text: String,
}

impl ResourceContents {
    /// Create plain-text contents.
    #[must_use]
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: Some("text/plain".to_string()),
            text: text.into(),
        }
    }

    /// Create JSON contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: Serialize>(uri: impl Into<String>, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            uri: uri.into(),
            mime_type: Some("application/json".to_string()),
            text: serde_json::to_string(value)?,
        })
    }

    /// Override the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Whether the contents are JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mime_type.as_deref() == Some("application/json")
    }
}

/// Response for listing resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResourcesResult {
    /// The available static resources.
    pub resources: Vec<Resource>,
}

/// Response for listing resource templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResourceTemplatesResult {
    /// The available templates.
    #[serde(rename = "resourceTemplates")]
    pub resource_templates: Vec<ResourceTemplate>,
}

/// Request parameters for reading a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResourceRequest {
    /// URI of the resource to read.
    pub uri: String,
}

impl ReadResourceRequest {
    /// Create a read request.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Response for reading a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResourceResult {
    /// The resource contents.
    pub contents: Vec<ResourceContents>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let resource = Resource::new("docs://documents", "list_docs").mime_type("application/json");
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["mimeType"], "application/json");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_json_contents() {
        let contents = ResourceContents::json("docs://documents", &["plan.md", "spec.txt"]).unwrap();
        assert!(contents.is_json());
        assert_eq!(contents.text, r#"["plan.md","spec.txt"]"#);

        let text = ResourceContents::text("docs://plan.md", "steps");
        assert!(!text.is_json());
    }

    #[test]
    fn test_template_serialization() {
        let template = ResourceTemplate::new("docs://{doc_id}", "fetch_doc");
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["uriTemplate"], "docs://{doc_id}");
    }
}
