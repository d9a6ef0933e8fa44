//! Capability registries.
//!
//! - [`tools`]: named tools with async handlers
//! - [`resources`]: static resources and URI templates with async readers

pub mod resources;
pub mod tools;

pub use resources::{ResourceService, TemplateParams, match_template};
pub use tools::{ToolService, string_arg};
