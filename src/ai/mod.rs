//! Oracle integration for the assistant engine.
//!
//! This module provides:
//! - The oracle provider abstraction and its OpenAI implementation
//! - Handlebars prompt templates with typed contexts
//! - Structured response schemas

pub mod openai;
pub mod prompts;
pub mod provider;
pub mod schemas;

pub use openai::OpenAiProvider;
pub use prompts::{PromptManager, PromptTemplate};
pub use provider::{
    parse_oracle_response, OracleMessage, OracleOptions, OracleProvider, OracleResponse,
    OracleRole,
};
