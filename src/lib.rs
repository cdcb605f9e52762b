//! Receipt Extraction and Reconciliation Engine
//!
//! This crate turns restaurant receipt images (or the text a vision model
//! produced for one) into validated receipt records, reconciles totals that
//! do not add up, and splits a reconciled bill across participants.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod reconciliation;
pub mod split;
