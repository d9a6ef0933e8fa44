//! Resource capability implementation.
//!
//! Static resources are looked up by exact URI. Templates contain `{param}`
//! placeholders; a URI matches a template when every literal part lines up
//! and every placeholder captures a non-empty value without `/`.

use std::collections::BTreeMap;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use scopekit_core::types::{Resource, ResourceContents, ResourceTemplate};
use scopekit_core::SessionError;
use tracing::trace;

/// Parameter values extracted from a URI by [`match_template`].
pub type TemplateParams = BTreeMap<String, String>;

/// A boxed async function for reading a static resource.
pub type BoxedResourceFn =
    Box<dyn Fn(String) -> BoxFuture<'static, Result<ResourceContents, SessionError>> + Send + Sync>;

/// A boxed async function for reading a templated resource.
pub type BoxedTemplateFn = Box<
    dyn Fn(String, TemplateParams) -> BoxFuture<'static, Result<ResourceContents, SessionError>>
        + Send
        + Sync,
>;

/// A registered resource with metadata and handler.
pub struct RegisteredResource {
    /// Resource metadata.
    pub resource: Resource,
    /// Handler function for reading.
    pub handler: BoxedResourceFn,
}

/// A registered resource template.
pub struct RegisteredTemplate {
    /// Template metadata.
    pub template: ResourceTemplate,
    /// Handler function for reading with URI parameters.
    pub handler: BoxedTemplateFn,
}

/// Service for managing resources.
#[derive(Default)]
pub struct ResourceService {
    /// Static resources by URI.
    resources: BTreeMap<String, RegisteredResource>,
    /// Templates in registration order, which is also match order.
    templates: Vec<RegisteredTemplate>,
}

impl ResourceService {
    /// Create a new empty resource service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a static resource.
    pub fn register<F, Fut>(&mut self, resource: Resource, handler: F)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceContents, SessionError>> + Send + 'static,
    {
        let uri = resource.uri.clone();
        let boxed: BoxedResourceFn = Box::new(move |uri| handler(uri).boxed());
        self.resources.insert(
            uri,
            RegisteredResource {
                resource,
                handler: boxed,
            },
        );
    }

    /// Register a resource template.
    pub fn register_template<F, Fut>(&mut self, template: ResourceTemplate, handler: F)
    where
        F: Fn(String, TemplateParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceContents, SessionError>> + Send + 'static,
    {
        let boxed: BoxedTemplateFn = Box::new(move |uri, params| handler(uri, params).boxed());
        self.templates.push(RegisteredTemplate {
            template,
            handler: boxed,
        });
    }

    /// Get a static resource by URI.
    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&RegisteredResource> {
        self.resources.get(uri)
    }

    /// List all static resources.
    #[must_use]
    pub fn list(&self) -> Vec<&Resource> {
        self.resources.values().map(|r| &r.resource).collect()
    }

    /// List all resource templates.
    #[must_use]
    pub fn list_templates(&self) -> Vec<&ResourceTemplate> {
        self.templates.iter().map(|r| &r.template).collect()
    }

    /// Read a resource by URI.
    ///
    /// Static resources are tried first, then templates in registration
    /// order.
    pub async fn read(&self, uri: &str) -> Result<ResourceContents, SessionError> {
        if let Some(registered) = self.resources.get(uri) {
            return (registered.handler)(uri.to_string()).await;
        }

        for registered in &self.templates {
            if let Some(params) = match_template(&registered.template.uri_template, uri) {
                trace!(uri, template = %registered.template.uri_template, "Matched resource template");
                return (registered.handler)(uri.to_string(), params).await;
            }
        }

        Err(SessionError::resource_not_found(uri))
    }

    /// Get the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Get the number of registered templates.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Check if the service has no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.templates.is_empty()
    }
}

/// Match a URI against a template with `{param}` placeholders.
///
/// Returns the captured parameters, or `None` if the URI does not match.
/// Adjacent placeholders (`{a}{b}`) never match.
///
/// ```rust
/// use scopekit_server::capability::match_template;
///
/// let params = match_template("docs://{doc_id}", "docs://plan.md").unwrap();
/// assert_eq!(params["doc_id"], "plan.md");
/// assert!(match_template("docs://{doc_id}", "docs://a/b").is_none());
/// ```
#[must_use]
pub fn match_template(template: &str, uri: &str) -> Option<TemplateParams> {
    let mut params = TemplateParams::new();
    let mut template_rest = template;
    let mut uri_rest = uri;

    while let Some(open) = template_rest.find('{') {
        uri_rest = uri_rest.strip_prefix(&template_rest[..open])?;

        let close = open + template_rest[open..].find('}')?;
        let name = &template_rest[open + 1..close];
        template_rest = &template_rest[close + 1..];

        let literal = &template_rest[..template_rest.find('{').unwrap_or(template_rest.len())];
        let value_len = if template_rest.is_empty() {
            uri_rest.len()
        } else if literal.is_empty() {
            return None;
        } else {
            uri_rest.find(literal)?
        };

        let value = &uri_rest[..value_len];
        if value.is_empty() || value.contains('/') {
            return None;
        }
        params.insert(name.to_string(), value.to_string());
        uri_rest = &uri_rest[value_len..];
    }

    (template_rest == uri_rest).then_some(params)
}
