//! The document server.
//!
//! A small server over an in-memory document store, exposing:
//!
//! | Kind | Name | Behavior |
//! |------|------|----------|
//! | tool | `read_doc_content` | returns a document's text |
//! | tool | `update_doc_content` | replaces a document's text |
//! | resource | `docs://documents` | JSON array of document ids |
//! | template | `docs://{doc_id}` | a document's text |

use std::collections::BTreeMap;
use std::sync::Arc;

use async_lock::RwLock;
use scopekit_core::protocol::method;
use scopekit_core::types::{
    Resource, ResourceContents, ResourceTemplate, Tool, ToolAnnotations, ToolOutput,
};
use scopekit_core::SessionError;
use serde_json::Value;
use tracing::debug;

use crate::capability::{TemplateParams, string_arg};
use crate::server::Server;

/// Name the document server reports from `initialize`.
pub const SERVER_NAME: &str = "DocumentMCP";

/// The documents a [`DocumentStore::default`] starts with.
pub const SEED_DOCUMENTS: [(&str, &str); 6] = [
    (
        "deposition.md",
        "This deposition covers the testimony of Angela Smith, P.E.",
    ),
    (
        "report.pdf",
        "The report details the state of a 20m condenser tower.",
    ),
    (
        "financials.docx",
        "These financials outline the project's budget and expenditures.",
    ),
    (
        "outlook.pdf",
        "This document presents the projected future performance of the system.",
    ),
    (
        "plan.md",
        "The plan outlines the steps for the project's implementation.",
    ),
    (
        "spec.txt",
        "These specifications define the technical requirements for the equipment.",
    ),
];

/// Shared handle over an ordered map of document id to content.
///
/// Clones share the same documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    docs: Arc<RwLock<BTreeMap<String, String>>>,
}

impl DocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_documents(std::iter::empty::<(String, String)>())
    }

    /// Create a store holding the given documents.
    pub fn from_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let docs = documents
            .into_iter()
            .map(|(id, content)| (id.into(), content.into()))
            .collect();
        Self {
            docs: Arc::new(RwLock::new(docs)),
        }
    }

    /// The content of a document.
    pub async fn get(&self, doc_id: &str) -> Option<String> {
        self.docs.read().await.get(doc_id).cloned()
    }

    /// All document ids, in order.
    pub async fn ids(&self) -> Vec<String> {
        self.docs.read().await.keys().cloned().collect()
    }

    /// Replace the content of an existing document.
    ///
    /// Returns `false` if there is no document with that id.
    pub async fn update(&self, doc_id: &str, content: impl Into<String>) -> bool {
        match self.docs.write().await.get_mut(doc_id) {
            Some(existing) => {
                *existing = content.into();
                true
            }
            None => false,
        }
    }

    /// Insert or replace a document.
    pub async fn insert(&self, doc_id: impl Into<String>, content: impl Into<String>) {
        self.docs.write().await.insert(doc_id.into(), content.into());
    }

    /// Number of documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Whether the store has no documents.
    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::from_documents(SEED_DOCUMENTS)
    }
}

fn not_found(doc_id: &str) -> ToolOutput {
    ToolOutput::error(format!("Document with id {doc_id} is not found"))
}

async fn read_doc(store: DocumentStore, args: Value) -> Result<ToolOutput, SessionError> {
    let doc_id = string_arg(&args, "doc_id")?;
    Ok(match store.get(doc_id).await {
        Some(content) => ToolOutput::text(content),
        None => not_found(doc_id),
    })
}

async fn update_doc(store: DocumentStore, args: Value) -> Result<ToolOutput, SessionError> {
    let doc_id = string_arg(&args, "doc_id")?;
    let content = string_arg(&args, "content")?;
    if store.update(doc_id, content).await {
        debug!(doc_id, "Document updated");
        Ok(ToolOutput::text("Successfully updated the document"))
    } else {
        Ok(not_found(doc_id))
    }
}

async fn list_docs(store: DocumentStore, uri: String) -> Result<ResourceContents, SessionError> {
    Ok(ResourceContents::json(uri, &store.ids().await)?)
}

async fn fetch_doc(
    store: DocumentStore,
    uri: String,
    params: TemplateParams,
) -> Result<ResourceContents, SessionError> {
    let doc_id = params.get("doc_id").ok_or_else(|| {
        SessionError::invalid_params(method::READ_RESOURCE, "template parameter `doc_id` missing")
    })?;
    match store.get(doc_id).await {
        Some(content) => Ok(ResourceContents::text(uri, content)),
        None => Err(SessionError::resource_not_found(uri)),
    }
}

/// Build the document server over `store`.
#[must_use]
pub fn document_server(store: DocumentStore) -> Server {
    let read_store = store.clone();
    let update_store = store.clone();
    let list_store = store.clone();
    let fetch_store = store;

    Server::builder(SERVER_NAME, env!("CARGO_PKG_VERSION"))
        .instructions("Read and update documents by id; list ids via docs://documents.")
        .tool(
            Tool::new("read_doc_content")
                .description("Read the content of the requested document.")
                .with_string_param("doc_id", "Id of the document to read", true)
                .annotations(ToolAnnotations::read_only()),
            move |args| read_doc(read_store.clone(), args),
        )
        .tool(
            Tool::new("update_doc_content")
                .description("Update the content of the document by the content that is passed.")
                .with_string_param("doc_id", "Id of the document to update", true)
                .with_string_param("content", "The new content of the document", true)
                .annotations(ToolAnnotations::destructive().with_idempotent(true)),
            move |args| update_doc(update_store.clone(), args),
        )
        .resource(
            Resource::new("docs://documents", "list_docs")
                .description("Ids of every document")
                .mime_type("application/json"),
            move |uri| list_docs(list_store.clone(), uri),
        )
        .resource_template(
            ResourceTemplate::new("docs://{doc_id}", "get_doc")
                .description("The content of one document")
                .mime_type("text/plain"),
            move |uri, params| fetch_doc(fetch_store.clone(), uri, params),
        )
        .build()
}
