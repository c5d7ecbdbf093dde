// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Variable Resolver
//!
//! This module provides the `VariableResolver`, which maps one variable name
//! to a value fetched from the injected parameter store, per the configured
//! resolution policy.
//!
//! ## Resolution Policy
//!
//! Three knobs are fixed at construction time and apply uniformly to every
//! lookup performed through the same instance:
//!
//! - **Namespace prefix**: when configured, it is concatenated immediately
//!   before the variable name to form the lookup key. No separator is inserted
//!   automatically, so the prefix must carry any desired delimiter (e.g.
//!   `"/prod/"`). This is mostly useful for re-using the same variable names
//!   across multiple environments.
//! - **Strict mode**: when enabled, a variable with no value is a hard
//!   failure instead of an absence.
//! - **Decryption** is not a knob: every lookup requests a decrypted value.
//!
//! ## Miss and Fault Collapsing
//!
//! A "parameter not found" response and any other backend fault both resolve
//! to the same absence. Faults are surfaced as a warning-level log entry only;
//! the resolver never retries and never exposes the failure cause to its
//! caller. Strict-mode callers rely on this uniform absence semantics.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::{
    errors::SubstitutionError,
    store::{ParameterStore, StoreError},
};

/// Resolves single variable names against a parameter store.
///
/// The resolver holds only immutable configuration plus a shared reference to
/// the injected store, so an instance can be reused across any number of
/// sequential resolution calls.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = VariableResolver::new(store)
///     .strict(true)
///     .namespace_prefix("/prod/");
///
/// let value = resolver.resolve("db/password")?;
/// ```
pub struct VariableResolver {
    store: Arc<dyn ParameterStore>,
    strict: bool,
    namespace_prefix: Option<String>,
}

impl VariableResolver {
    /// Creates a resolver around the given store, with strict mode disabled
    /// and no namespace prefix.
    pub fn new(store: Arc<dyn ParameterStore>) -> VariableResolver {
        VariableResolver {
            store,
            strict: false,
            namespace_prefix: None,
        }
    }

    /// Enables or disables strict mode.
    ///
    /// Under strict mode, resolving a variable that has no value fails with
    /// [`SubstitutionError::UndefinedVariable`] instead of returning `None`.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets a prefix concatenated immediately before every variable name when
    /// forming the lookup key. No separator is inserted.
    pub fn namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = Some(prefix.into());
        self
    }

    /// Resolves one variable name to its stored value.
    ///
    /// Issues exactly one store lookup for the effective key, always
    /// requesting decryption. The value is returned verbatim.
    ///
    /// Misses and backend faults both yield `Ok(None)` when strict mode is
    /// off, and [`SubstitutionError::UndefinedVariable`] when it is on.
    pub fn resolve(&self, variable: &str) -> Result<Option<String>, SubstitutionError> {
        let key = self.effective_key(variable);

        trace!(key = key, "looking up parameter");

        match self.store.get_parameter(&key, true) {
            Ok(value) => return Ok(Some(value)),
            Err(StoreError::NotFound) => {
                debug!(key = key, "parameter not found");
            }
            Err(err) => {
                warn!(key = key, error = err.to_string(), "error looking up parameter");
            }
        }

        if self.strict {
            return Err(SubstitutionError::UndefinedVariable {
                key,
                variable: variable.to_owned(),
            });
        }

        Ok(None)
    }

    fn effective_key(&self, variable: &str) -> String {
        match &self.namespace_prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}{variable}"),
            _ => variable.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FakeParameterStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_returns_stored_value_verbatim() {
        let store = Arc::new(FakeParameterStore::new().with("/foo/bar/value", "  foo-value "));
        let resolver = VariableResolver::new(store.clone());

        let value = resolver.resolve("/foo/bar/value").unwrap();

        assert_eq!(value, Some("  foo-value ".to_owned()));
        assert_eq!(store.requests(), vec![("/foo/bar/value".to_owned(), true)]);
    }

    #[test]
    fn resolve_always_requests_decryption() {
        let store = Arc::new(FakeParameterStore::new().with("key", "value"));
        let resolver = VariableResolver::new(store.clone());

        resolver.resolve("key").unwrap();
        resolver.resolve("missing").unwrap();

        assert!(store.requests().iter().all(|(_, decrypt)| *decrypt));
    }

    #[test]
    fn missing_parameter_with_strict_enabled_fails() {
        let store = Arc::new(FakeParameterStore::new());
        let resolver = VariableResolver::new(store).strict(true);

        let err = resolver.resolve("/foo/bar/key").unwrap_err();

        assert_eq!(
            err,
            SubstitutionError::UndefinedVariable {
                key: "/foo/bar/key".to_owned(),
                variable: "/foo/bar/key".to_owned(),
            }
        );
    }

    #[test]
    fn missing_parameter_with_strict_disabled_resolves_to_none() {
        let store = Arc::new(FakeParameterStore::new());
        let resolver = VariableResolver::new(store);

        assert_eq!(resolver.resolve("/foo/bar/key").unwrap(), None);
    }

    #[test]
    fn backend_fault_behaves_like_a_miss() {
        let store = Arc::new(FakeParameterStore::new().with_fault("key", "access denied"));

        let lenient = VariableResolver::new(store.clone());
        assert_eq!(lenient.resolve("key").unwrap(), None);

        let strict = VariableResolver::new(store).strict(true);
        let err = strict.resolve("key").unwrap_err();
        assert!(matches!(err, SubstitutionError::UndefinedVariable { .. }));
    }

    #[test]
    fn namespace_prefix_is_concatenated_without_separator() {
        let store = Arc::new(FakeParameterStore::new().with("--myprefix--/foo/bar/value", "foo-value"));
        let resolver = VariableResolver::new(store.clone()).namespace_prefix("--myprefix--");

        let value = resolver.resolve("/foo/bar/value").unwrap();

        assert_eq!(value, Some("foo-value".to_owned()));
        assert_eq!(
            store.requests(),
            vec![("--myprefix--/foo/bar/value".to_owned(), true)]
        );
    }

    #[test]
    fn empty_prefix_leaves_the_key_untouched() {
        let store = Arc::new(FakeParameterStore::new());
        let resolver = VariableResolver::new(store.clone()).namespace_prefix("");

        resolver.resolve("key").unwrap();

        assert_eq!(store.requests(), vec![("key".to_owned(), true)]);
    }

    #[test]
    fn strict_error_carries_the_effective_key_and_the_variable() {
        let store = Arc::new(FakeParameterStore::new());
        let resolver = VariableResolver::new(store)
            .strict(true)
            .namespace_prefix("/prod/");

        let err = resolver.resolve("db/host").unwrap_err();

        assert_eq!(
            err.to_string(),
            "no parameter found with name `/prod/db/host` - could not substitute variable `db/host`"
        );
    }
}
