//! knowmore-core: view models for streaming assistant messages
//!
//! This crate turns a live assistant message (text parts interleaved with
//! tool invocations whose results arrive later, in place) into an ordered
//! list of render blocks. The derivation is pure and is re-run on every
//! update of the message.

pub mod config;
pub mod error;
pub mod interaction;
pub mod models;
pub mod parts;
pub mod query;
pub mod sources;
pub mod stream;
pub mod view;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use models::{Message, MessageRole};
pub use parts::{MessagePart, ToolInvocation};
pub use view::{MessageViewModel, RenderBlock, ViewModelBuilder, build_view_model};

/// Application name used for config directories and paths.
pub const APP_NAME: &str = "knowmore";

/// Tool name that triggers source aggregation unless configured otherwise.
pub const DEFAULT_WEB_SEARCH_TOOL: &str = "web_search";

/// Returns the environment variable prefix for this application.
pub fn env_prefix() -> String {
    "KNOWMORE".to_string()
}
