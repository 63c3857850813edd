// trcfilter - core/mod.rs
//
// Core classification logic layer.
// Writes only to Write trait objects; never touches the filesystem directly.
// Must NOT depend on: app, clap, or any terminal/CLI concern.

pub mod classify;
pub mod export;
pub mod model;
pub mod record;
pub mod schema;
pub mod transform;
