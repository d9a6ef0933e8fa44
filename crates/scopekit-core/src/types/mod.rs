//! Value types for tools, resources and content.
//!
//! - **Tools**: callable functions a server exposes, with a JSON Schema
//!   describing their arguments
//! - **Resources**: addressable data, either static URIs or URI templates
//!   with `{param}` placeholders
//! - **Content**: the payload returned by tool calls

pub mod content;
pub mod resource;
pub mod tool;

pub use content::*;
pub use resource::*;
pub use tool::*;
