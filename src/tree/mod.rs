//! Navigation over untyped recognition responses.
//!
//! A recognition response is a `serde_json::Value` tree: mappings, sequences
//! and scalars with no fixed schema. This module provides the two generic
//! operations the rest of the crate builds on:
//!
//! - [`resolve`]: follow a [`KeyPath`] down the tree, with absence as a value
//! - [`key_paths`]: enumerate every terminal key-path in a tree, for
//!   discovering new field mappings against an unfamiliar payload

mod keys;
mod path;

pub use keys::{KeyPaths, MAX_DEPTH, extract_key_paths, key_paths};
pub use path::{KeyPath, PathSegment, resolve, resolve_path};
