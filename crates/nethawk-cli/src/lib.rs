//! Wrapper CLI for the bundled nethawk tool.
//!
//! The binary has exactly two behaviors: with no arguments it runs the
//! self-test battery and reports on the packaged binary's health; with
//! arguments it passes them through to the bundled tool and mirrors the
//! tool's captured output and exit code.

pub mod bootstrap;
pub mod display;

pub use bootstrap::{WrapperContext, bootstrap, bootstrap_with};
