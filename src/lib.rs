//! Intake Agent - Conversational intake form service
//!
//! An LLM agent collects a configured set of fields from a user in chat and
//! escalates to a human once the required fields are in or the user asks for
//! something that needs one. This crate tracks the structured state and
//! enforces the completion and escalation rules; the model does the talking.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
