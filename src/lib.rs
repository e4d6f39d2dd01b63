//! Steward: a personal task-management assistant engine.
//!
//! Tasks are captured, scored, and moved through a forward-only
//! lifecycle. Decision surfaces (what to do now, how to break a task
//! down, how to lay out the day) ask an external reasoning oracle
//! first and fall back to deterministic rules when the oracle fails,
//! with explicit provenance on every answer.
//!
//! # Architecture
//!
//! - [`entities`] — tasks, actions, household members, nudges, templates
//! - [`scoring`] — pure weighted priority scoring
//! - [`engine`] — candidate selection, recommendation, decomposition,
//!   delegation, nudges, daily planning, background dispatch
//! - [`ai`] — oracle provider abstraction, prompt templates, response
//!   schemas
//! - [`storage`] — record-store trait with file and in-memory backends

pub mod ai;
pub mod config;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod scoring;
pub mod storage;
pub mod ui;

pub use config::EngineConfig;
pub use engine::{Decision, DecisionSource, Engine};
pub use errors::{StewardError, StewardResult};
