// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Params Substitutor
//!
//! `params_substitutor` is a library that resolves `${...}` placeholder
//! variables embedded in textual configuration, substituting values fetched
//! from a remote key-value parameter store.
//!
//! It is meant to run as a pre-processing step before a larger application
//! loads its settings: the surrounding configuration pipeline hands a raw
//! template string to the [`Substitutor`], which scans it for placeholders,
//! resolves each one through the injected [`store::ParameterStore`], and
//! returns the fully substituted string.
//!
//! ## Features
//!
//! - Recursive placeholder resolution: `${outer-${inner}}` resolves the inner
//!   variable first and uses its value inside the outer name
//! - Inline defaults: `${name:fallback}` substitutes `fallback` when `name`
//!   has no value
//! - Namespace prefixing, for re-using variable names across environments
//! - Strict mode, turning any unresolved placeholder into a hard failure
//! - Decrypted retrieval requested on every lookup
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use params_substitutor::Substitutor;
//!
//! fn preprocess(raw: &str, store: Arc<dyn ParameterStore>) -> Result<String, Box<dyn std::error::Error>> {
//!     let substituted = Substitutor::new(store)
//!         .strict(true)
//!         .namespace_prefix("/myapp/prod/")
//!         .substitute(raw)?;
//!
//!     Ok(substituted)
//! }
//! ```

mod resolver;
mod substitutor;
pub mod errors;
pub mod store;

pub use resolver::VariableResolver;
pub use substitutor::Substitutor;
