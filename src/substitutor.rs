// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Substitutor
//!
//! This module provides the `Substitutor`, which scans a template string for
//! `${...}` placeholders and replaces each one with a value resolved through
//! the [`VariableResolver`].
//!
//! ## Placeholder Grammar
//!
//! - `${name}` is replaced by the resolved value of `name`. Placeholders may
//!   nest: in `${outer-${inner}}` the inner placeholder is fully resolved
//!   first and its value becomes part of the outer variable's name.
//! - `${name:default}` substitutes the text after the first top-level `:`
//!   when `name` resolves to no value. Defaults may themselves contain
//!   placeholders and are only resolved when actually used.
//! - `$${` escapes the delimiter: one `$` is dropped and `${` is emitted
//!   literally.
//! - A placeholder with no closing brace, or with an empty variable name, is
//!   malformed and emitted verbatim.
//! - A placeholder that resolves to no value, with no default, substitutes
//!   the empty string.
//!
//! ## Failure Semantics
//!
//! Under strict mode, the first unresolvable placeholder without an inline
//! default aborts the whole pass with the resolver's error; the caller never
//! receives a half-substituted string.
//!
//! The scanner is implemented as a recursive descent over the delimiter pair
//! rather than a regular expression, so nesting depth and escaping are handled
//! exactly.

use std::sync::Arc;

use tracing::warn;

use crate::{errors::SubstitutionError, resolver::VariableResolver, store::ParameterStore};

const VAR_START: &str = "${";
const DEFAULT_SEPARATOR: u8 = b':';

/// Upper bound on re-expansion rounds of a variable name, so cyclic
/// references between parameter values cannot loop forever.
const MAX_NAME_EXPANSIONS: usize = 16;

/// Substitutes `${...}` placeholders in template strings with values from a
/// parameter store.
///
/// Construction mirrors [`VariableResolver`]: the store is injected once, and
/// the policy flags are fixed before the first substitution pass.
///
/// # Example
///
/// ```rust,ignore
/// let substitutor = Substitutor::new(store)
///     .strict(true)
///     .namespace_prefix("/prod/");
///
/// let yaml = substitutor.substitute(&raw_yaml)?;
/// ```
pub struct Substitutor {
    resolver: VariableResolver,
    substitution_in_variables: bool,
}

impl Substitutor {
    /// Creates a substitutor around the given store, with strict mode off, no
    /// namespace prefix, and no substitution inside variable names.
    pub fn new(store: Arc<dyn ParameterStore>) -> Substitutor {
        Substitutor {
            resolver: VariableResolver::new(store),
            substitution_in_variables: false,
        }
    }

    /// Enables or disables strict mode on the underlying resolver.
    pub fn strict(mut self, strict: bool) -> Self {
        self.resolver = self.resolver.strict(strict);
        self
    }

    /// Sets the namespace prefix on the underlying resolver.
    pub fn namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resolver = self.resolver.namespace_prefix(prefix);
        self
    }

    /// Enables or disables substitution inside variable names.
    ///
    /// When enabled, a resolved value that feeds into a variable name is
    /// itself re-scanned for placeholders before the name is used as a lookup
    /// key.
    pub fn substitution_in_variables(mut self, enabled: bool) -> Self {
        self.substitution_in_variables = enabled;
        self
    }

    /// Replaces every placeholder in `template` with its resolved value.
    ///
    /// Lookups happen strictly in scan order, one backend round trip per
    /// placeholder occurrence. Fails with the resolver's
    /// [`SubstitutionError::UndefinedVariable`] on the first strict-mode miss
    /// that has no inline default.
    pub fn substitute(&self, template: &str) -> Result<String, SubstitutionError> {
        self.scan(template)
    }

    fn scan(&self, input: &str) -> Result<String, SubstitutionError> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find(VAR_START) {
            // "$${" drops one '$' and emits the delimiter literally.
            if rest[..start].ends_with('$') {
                out.push_str(&rest[..start - 1]);
                out.push_str(VAR_START);
                rest = &rest[start + 2..];
                continue;
            }

            let after = &rest[start + 2..];
            let Some(end) = matching_end(after) else {
                // unclosed placeholder, emit the remainder verbatim
                out.push_str(rest);
                return Ok(out);
            };

            out.push_str(&rest[..start]);
            let body = &after[..end];
            rest = &after[end + 1..];

            let (raw_name, default) = split_default(body);
            if raw_name.is_empty() {
                out.push_str(VAR_START);
                out.push_str(body);
                out.push('}');
                continue;
            }

            out.push_str(&self.resolve_placeholder(raw_name, default)?);
        }

        out.push_str(rest);
        Ok(out)
    }

    fn resolve_placeholder(
        &self,
        raw_name: &str,
        default: Option<&str>,
    ) -> Result<String, SubstitutionError> {
        // nested placeholders in the name resolve innermost-first
        let mut name = self.scan(raw_name)?;

        if self.substitution_in_variables {
            name = self.expand_name(name)?;
        }

        match self.resolver.resolve(&name) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => match default {
                Some(default) => self.scan(default),
                None => Ok(String::new()),
            },
            // the inline default still applies under strict mode
            Err(err) => match default {
                Some(default) => self.scan(default),
                None => Err(err),
            },
        }
    }

    /// Re-scans a composed variable name until it carries no further
    /// placeholders, bounded by [`MAX_NAME_EXPANSIONS`].
    fn expand_name(&self, mut name: String) -> Result<String, SubstitutionError> {
        let mut rounds = 0;
        while name.contains(VAR_START) {
            let expanded = self.scan(&name)?;
            if expanded == name {
                break;
            }
            name = expanded;

            rounds += 1;
            if rounds == MAX_NAME_EXPANSIONS {
                warn!(variable = name, "cyclic reference while expanding variable name");
                break;
            }
        }
        Ok(name)
    }
}

/// Finds the byte offset of the `}` closing the placeholder whose body starts
/// at the beginning of `body`, skipping over nested `${...}` pairs.
fn matching_end(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Splits a placeholder body into variable name and optional default at the
/// first separator that is not inside a nested placeholder.
fn split_default(body: &str) -> (&str, Option<&str>) {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' if depth > 0 => depth -= 1,
            DEFAULT_SEPARATOR if depth == 0 => {
                return (&body[..i], Some(&body[i + 1..]));
            }
            _ => {}
        }
        i += 1;
    }

    (body, None)
}
