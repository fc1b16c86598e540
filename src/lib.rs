//! `LeaseLens` - interactive lease analysis demo for the terminal.
//!
//! A scripted walkthrough of an AI lease review: document packs supply the
//! annotated sample lease, clause risk ratings, canned chat answers, and
//! the analysis timeline; the session loop renders it all as terminal
//! views driven by line commands.

pub mod analysis;
pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod observability;
pub mod packs;
pub mod session;
