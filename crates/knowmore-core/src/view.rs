//! Message view-model derivation.
//!
//! [`ViewModelBuilder::build`] is a pure function of a message snapshot. It
//! is meant to be called again on every update of the message; nothing is
//! carried between calls.
//!
//! Assembly order for an assistant message:
//!
//! 1. At most one sources block, or its loading placeholder, for all
//!    web-search invocations in the message combined.
//! 2. One text block per text part, in part order.
//!
//! Sources come first regardless of where the tool parts sit in the stream.

use serde::Serialize;

use crate::config::Config;
use crate::models::{Message, MessageRole};
use crate::parts::{ClassifiedTool, PartClassifier, PartKind, ToolKind, ToolState};
use crate::query::extract_search_query;
use crate::sources::{SearchResultRecord, normalize_search_results};

/// One unit of the derived view, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderBlock {
    /// At least one web search is still in flight.
    SourcesLoading,

    /// All web-search results of the message, merged.
    Sources {
        filter_tags: Vec<String>,
        search_results: Vec<SearchResultRecord>,
    },

    Text {
        content: String,
    },
}

impl RenderBlock {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Short label used in frame summaries and logs.
    pub fn label(&self) -> String {
        match self {
            Self::SourcesLoading => "loading".to_string(),
            Self::Sources { search_results, .. } => format!("sources({})", search_results.len()),
            Self::Text { content } => format!("text({})", content.chars().count()),
        }
    }
}

/// Ordered render blocks for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageViewModel {
    pub message_id: String,
    pub role: MessageRole,
    pub blocks: Vec<RenderBlock>,
    copy_text: String,
}

impl MessageViewModel {
    /// Text the copy affordance puts on the clipboard.
    pub fn copy_text(&self) -> &str {
        &self.copy_text
    }

    /// Whether the message shows interactive affordances (copy, feedback).
    pub fn has_affordances(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    pub fn is_loading_sources(&self) -> bool {
        self.blocks
            .iter()
            .any(|block| matches!(block, RenderBlock::SourcesLoading))
    }

    /// Filter tags and records of the sources block, if one is shown.
    pub fn sources(&self) -> Option<(&[String], &[SearchResultRecord])> {
        self.blocks.iter().find_map(|block| match block {
            RenderBlock::Sources {
                filter_tags,
                search_results,
            } => Some((filter_tags.as_slice(), search_results.as_slice())),
            _ => None,
        })
    }

    pub fn text_blocks(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            RenderBlock::Text { content } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Compact one-line description, e.g. `loading | text(12)`.
    pub fn summary(&self) -> String {
        if self.blocks.is_empty() {
            return "(empty)".to_string();
        }
        self.blocks
            .iter()
            .map(RenderBlock::label)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Collected state of all web-search invocations in one message.
#[derive(Debug, Default)]
struct SourceAggregate {
    has_searches: bool,
    loading: bool,
    filter_tags: Vec<String>,
    search_results: Vec<SearchResultRecord>,
}

impl SourceAggregate {
    fn collect(&mut self, part_index: usize, tool: &ClassifiedTool<'_>) {
        self.has_searches = true;
        match (tool.state, tool.result) {
            (ToolState::Resolved, Some(result)) => {
                let prefix = format!("{part_index}-");
                self.search_results
                    .extend(normalize_search_results(result, &prefix));

                let query = extract_search_query(tool.args);
                if !query.is_empty() && !self.filter_tags.contains(&query) {
                    self.filter_tags.push(query);
                }
            }
            _ => self.loading = true,
        }
    }

    fn into_block(self) -> Option<RenderBlock> {
        if !self.has_searches {
            return None;
        }
        if self.loading {
            return Some(RenderBlock::SourcesLoading);
        }
        if self.search_results.is_empty() {
            return None;
        }
        Some(RenderBlock::Sources {
            filter_tags: self.filter_tags,
            search_results: self.search_results,
        })
    }
}

/// Builds [`MessageViewModel`]s from message snapshots.
#[derive(Debug, Clone, Default)]
pub struct ViewModelBuilder {
    classifier: PartClassifier,
}

impl ViewModelBuilder {
    pub fn new(web_search_tool: impl Into<String>) -> Self {
        Self {
            classifier: PartClassifier::new(web_search_tool),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.web_search_tool.clone())
    }

    pub fn classifier(&self) -> &PartClassifier {
        &self.classifier
    }

    pub fn build(&self, message: &Message) -> MessageViewModel {
        let blocks = match message.role {
            MessageRole::Assistant => self.assistant_blocks(message),
            _ => vec![RenderBlock::text(message.content.clone())],
        };

        let copy_text = if message.content.is_empty() {
            blocks
                .iter()
                .filter_map(|block| match block {
                    RenderBlock::Text { content } => Some(content.as_str()),
                    _ => None,
                })
                .collect::<String>()
        } else {
            message.content.clone()
        };

        MessageViewModel {
            message_id: message.id.clone(),
            role: message.role,
            blocks,
            copy_text,
        }
    }

    /// Build view models for a whole transcript, in order.
    pub fn build_all(&self, messages: &[Message]) -> Vec<MessageViewModel> {
        messages.iter().map(|message| self.build(message)).collect()
    }

    fn assistant_blocks(&self, message: &Message) -> Vec<RenderBlock> {
        let parts = message.parts();
        if parts.is_empty() {
            return vec![RenderBlock::text(message.content.clone())];
        }

        let mut sources = SourceAggregate::default();
        let mut texts = Vec::new();

        for (index, part) in parts.iter().enumerate() {
            match self.classifier.classify(part) {
                PartKind::Text(text) => texts.push(RenderBlock::text(text)),
                PartKind::ToolInvocation(tool) => match tool.kind {
                    ToolKind::WebSearch => sources.collect(index, &tool),
                    ToolKind::Other(name) => {
                        tracing::debug!(tool = name, index, "No renderer for tool, skipping");
                    }
                },
                PartKind::None => {}
            }
        }

        let mut blocks = Vec::with_capacity(texts.len() + 1);
        blocks.extend(sources.into_block());
        blocks.extend(texts);
        blocks
    }
}

/// Build a view model using the default web-search tool name.
pub fn build_view_model(message: &Message) -> MessageViewModel {
    ViewModelBuilder::default().build(message)
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
