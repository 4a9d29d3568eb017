//! kanban - Ticket Board Library
//!
//! This library provides the core functionality for the kanban CLI: it loads
//! tickets and users from a remote endpoint, arranges them into board columns
//! and remembers how the user likes the board displayed.
//!
//! # Core Concepts
//!
//! - **Grouping**: which ticket field becomes the board's columns
//! - **Ordering**: how cards are sorted inside a column
//! - **Preferences**: the last chosen grouping and ordering, kept on disk
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `kanban.toml`
//! - `error`: Error types and result aliases
//! - `model`: Ticket and user records as delivered by the endpoint
//! - `loader`: Fetching and decoding the board payload
//! - `board`: Grouping, ordering and column titles
//! - `prefs`: Preference stores and the persisted display choices
//! - `session`: Loaded data plus active preferences
//! - `output`: Human and JSON rendering
//! - `lock`: File locking and atomic writes
//! - `ui`: Interactive terminal board

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod lock;
pub mod model;
pub mod output;
pub mod prefs;
pub mod session;
pub mod ui;

pub use error::{Error, Result};
