// trcfilter - app/mod.rs
//
// Application layer: file handling and run orchestration around the core
// classification engine. Dependencies: core layer.

pub mod clean;
pub mod config;
pub mod run;
