//! esfold: fold browser ES modules into self-contained script blocks
//!
//! This crate converts ES-module script text into dependency-ordered IIFE
//! bundles that run without native module loading:
//! - **Scan**: string/comment-aware multi-rule text scanning (`scan` module)
//! - **Minify**: comment stripping and whitespace squeezing (`minify` module)
//! - **Transform**: import/export rewriting against a runtime module
//!   registry, plus the isolating closure wrapper (`transform` module)
//! - **Resolve**: recursive dependency inlining with cycle containment
//!   (`resolve` module)
//!
//! The host application owns everything document-shaped: finding script
//! elements, deciding module vs. plain script, and serializing the result.
//! It hands each module's text here and splices back what it gets.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use esfold::{Bundler, FsLoader};
//!
//! let source = std::fs::read_to_string("app/main.js")?;
//! let mut bundler = Bundler::new(FsLoader, true);
//! let bundle = bundler.bundle(&source, Path::new("app"), Some("main.js"))?;
//! // `bundle` holds every transitively imported module, dependency first,
//! // ending with main.js itself.
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Scan module: pattern combinator and shared token classifiers
pub mod scan;

/// Minify module: whitespace and comment stripping
pub mod minify;

/// Transform module: ES module to IIFE rewriting
pub mod transform;

/// Resolve module: recursive dependency resolution and bundling
pub mod resolve;

pub use minify::minify;
pub use resolve::{BundleError, BundleState, Bundler, FsLoader, MemoryLoader, ModuleLoader};
pub use scan::{Context, PatternSet, RewriteFn, ScanError, TokenAction};
pub use transform::{convert_module, TransformedModule};
