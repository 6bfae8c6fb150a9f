//! Named package templates.

pub mod manager;

pub use crate::config::Template;
pub use manager::{split_words, TemplateManager};
