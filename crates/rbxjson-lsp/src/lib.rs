//! rbxjson Language Server
//!
//! LSP server for rbxjson instance documents (a Roblox instance serialized as
//! JSON), providing:
//! - Diagnostics (parse errors)
//! - Completions (root keys, class names, properties, types, enum members,
//!   value skeletons, attributes, tags) driven by a [`schema::SchemaStore`]
//! - Document symbols (the instance and its properties)
//!
//! The pieces are usable without the server: [`analyzer::analyze`] classifies
//! a cursor position and [`completion::CompletionGenerator`] turns the result
//! into candidates.

pub mod analyzer;
pub mod completion;
pub mod config;
pub mod lookahead;
pub mod position;
pub mod schema;
mod server;
pub mod tables;
pub mod templates;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use server::{RbxjsonLanguageServer, run};
