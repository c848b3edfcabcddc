//! envnet AWS Provider
//!
//! Renders a declared envnet stack as a CloudFormation template.
//!
//! ## Module Structure
//!
//! - `schemas` - CloudFormation resource schemas
//! - `validation` - Schema and graph checks over a stack
//! - `template` - Template and deployment manifest rendering

pub mod schemas;
pub mod template;
pub mod validation;

// Re-export main types
pub use template::{
    Manifest, RenderError, logical_id, render_manifest, render_template, template_file_name,
};
pub use validation::{ValidationError, validate_stack};
