//! Decision engine.
//!
//! Pure, deterministic components (scoring, candidate selection,
//! delegation, nudges) plus the oracle-backed decision layers for
//! recommendation, decomposition, and daily planning. Every oracle
//! failure is absorbed at this layer and answered with a
//! deterministic fallback carrying explicit provenance.

use std::sync::Arc;

use crate::ai::prompts::PromptManager;
use crate::ai::OracleProvider;
use crate::config::EngineConfig;
use crate::storage::Storage;

mod daily_plan;
mod delegate;
mod dispatch;
mod nudges;
mod recommend;
mod selector;
mod tasks;
mod workflow;

pub use daily_plan::fallback_plan;
pub use delegate::delegate_actions;
pub use dispatch::Dispatcher;
pub use nudges::compute_nudges;
pub use recommend::{
    fallback_recommendations, Recommendation, RecommendationContext, WhatNow,
};
pub use selector::select_candidates;
pub use tasks::{TaskDraft, TaskUpdate};
pub use workflow::fallback_actions;

/// Which path produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// The oracle answered within schema and timeout
    Oracle,
    /// The deterministic fallback answered after an oracle failure
    Fallback,
}

/// A successful answer from a two-branch decision layer. Both branches
/// conform to the same output contract; callers can only tell them
/// apart through this explicit provenance.
#[derive(Debug, Clone)]
pub struct Decision<T> {
    pub value: T,
    pub source: DecisionSource,
}

impl<T> Decision<T> {
    pub fn from_oracle(value: T) -> Self {
        Self {
            value,
            source: DecisionSource::Oracle,
        }
    }

    pub fn from_fallback(value: T) -> Self {
        Self {
            value,
            source: DecisionSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DecisionSource::Fallback
    }
}

/// The assistant engine: storage plus oracle plus configuration.
pub struct Engine {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) oracle: Arc<dyn OracleProvider>,
    pub(crate) config: EngineConfig,
    pub(crate) prompts: PromptManager,
    dispatcher: Dispatcher,
}

impl Engine {
    /// Build an engine over the given store and oracle. Must be called
    /// inside a tokio runtime (the dispatcher spawns its worker here).
    pub fn new(storage: Arc<dyn Storage>, oracle: Arc<dyn OracleProvider>) -> Self {
        Self::with_config(storage, oracle, EngineConfig::default())
    }

    pub fn with_config(
        storage: Arc<dyn Storage>,
        oracle: Arc<dyn OracleProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            storage,
            oracle,
            config,
            prompts: PromptManager::default(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The background dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The underlying store.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}
