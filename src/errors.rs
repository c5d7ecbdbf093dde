// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Errors
//!
//! Error types for the params_substitutor crate.
//!
//! This module defines the single error that can escape the substitution core.
//! Backend-side failures (parameter not found, network, permission, throttling)
//! are deliberately *not* represented here: the resolver collapses all of them
//! into an absence, and only strict mode turns that absence into an error.
//! Downstream callers therefore only ever handle "value" versus
//! "absent / strict failure", never a taxonomy of backend failure modes.

use thiserror::Error;

/// Errors raised while substituting placeholder variables.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubstitutionError {
    /// A variable had no value in the parameter store while strict mode was
    /// enabled, and no inline default was available.
    ///
    /// Carries both the effective lookup key (after namespace prefixing) and
    /// the original variable name as written in the template, so the failing
    /// expression can be located in the source configuration.
    #[error("no parameter found with name `{key}` - could not substitute variable `{variable}`")]
    UndefinedVariable {
        /// The fully-qualified key that was sent to the parameter store.
        key: String,
        /// The variable name as it appeared between the placeholder delimiters.
        variable: String,
    },
}
