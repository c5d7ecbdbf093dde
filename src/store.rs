// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Parameter Store
//!
//! The capability boundary between the substitution core and the remote
//! key-value parameter store.
//!
//! The store is owned by the hosting configuration-loading system and injected
//! at construction time; this crate holds a shared reference and never manages
//! its lifecycle. A single operation is exposed: fetch one parameter by key,
//! optionally asking the backend to decrypt it.
//!
//! `FakeParameterStore` is an in-memory implementation intended for tests and
//! local development, so nothing in this crate ever needs a real network
//! dependency to be exercised.

use std::{collections::HashMap, sync::Mutex};

use thiserror::Error;

/// Failures reported by a parameter store lookup.
///
/// The substitution core collapses both variants into the same miss path; the
/// distinction exists only so backend faults can be logged at warning level
/// while ordinary misses stay at debug level.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key does not exist in the store.
    #[error("parameter not found")]
    NotFound,

    /// Any other backend-side failure: network, permission, throttling,
    /// malformed response.
    #[error("parameter store request failed - `{0}`")]
    Backend(String),
}

/// A remote key-value parameter store.
///
/// Implementations perform one blocking round trip per call. Timeouts and
/// retries, if any, belong to the implementation; the substitution core never
/// retries on its own.
pub trait ParameterStore {
    /// Fetches the value stored under `key`.
    ///
    /// `decrypt` asks the backend to return the plaintext value for encrypted
    /// parameters. The substitution core always passes `true`.
    fn get_parameter(&self, key: &str, decrypt: bool) -> Result<String, StoreError>;
}

/// An in-memory [`ParameterStore`] for tests and local development.
///
/// Every lookup is recorded, so assertions can be made about which keys were
/// requested and with which decryption flag. Keys listed in `failing` report a
/// backend fault instead of a value or a miss.
#[derive(Default)]
pub struct FakeParameterStore {
    values: HashMap<String, String>,
    failing: HashMap<String, String>,
    requests: Mutex<Vec<(String, bool)>>,
}

impl FakeParameterStore {
    pub fn new() -> FakeParameterStore {
        FakeParameterStore::default()
    }

    /// Registers a parameter value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Registers a key whose lookup fails with a backend fault carrying the
    /// given message.
    pub fn with_fault(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.failing.insert(key.into(), message.into());
        self
    }

    /// Returns every `(key, decrypt)` pair requested so far, in call order.
    pub fn requests(&self) -> Vec<(String, bool)> {
        self.requests.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl ParameterStore for FakeParameterStore {
    fn get_parameter(&self, key: &str, decrypt: bool) -> Result<String, StoreError> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((key.to_owned(), decrypt));

        if let Some(message) = self.failing.get(key) {
            return Err(StoreError::Backend(message.clone()));
        }

        match self.values.get(key) {
            Some(v) => Ok(v.clone()),
            None => Err(StoreError::NotFound),
        }
    }
}
