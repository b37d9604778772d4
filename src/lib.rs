//! arcommands: dictionary-driven codec and filter engine for ARSDK command frames.
//!
//! Every command or event is addressed by a `(project, class, command)`
//! path and carries typed arguments declared in a command dictionary.
//! This crate loads the dictionary, encodes and decodes command buffers,
//! evaluates allow/block filters over paths and dispatches decoded frames
//! to listeners.

pub mod cli;
pub mod config;
pub mod domain;
pub mod service;
