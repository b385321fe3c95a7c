//! Compile-time validation of UI data-binding tags.
//!
//! A [`types::BindingSite`] describes one tag on a view-model declaration.
//! [`validate::validate`] checks it against the framework contract through a
//! [`validate::SymbolResolver`] and yields [`catalog::Diagnostic`]s. The
//! remaining modules host the validators for the `bindcheck` binary: model
//! files, configuration, baselines, and parallel checking.

pub mod baseline;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod converter;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod framework;
pub mod graph;
pub mod logging;
pub mod model;
pub mod relation;
pub mod scanner;
pub mod target;
pub mod typeexpr;
pub mod types;
pub mod validate;
pub mod watch;
