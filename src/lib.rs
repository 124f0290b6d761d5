//! email-triage: classifies incoming email as productive or unproductive and
//! drafts a reply, with a keyword fallback when no LLM is available.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod reply;
pub mod text;
