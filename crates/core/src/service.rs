// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service identity.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// Unique name of a supervised service.
///
/// Must be non-empty ASCII. Validated once at construction so the rest of
/// the system can treat `ServiceName` as a cheap, `Copy`-free but cloneable
/// key without re-checking invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(SmolStr);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ServiceNameError {
    #[error("service name must not be empty")]
    Empty,
    #[error("service name {0:?} is not ASCII")]
    NotAscii(String),
}

impl ServiceName {
    pub fn new(s: impl AsRef<str>) -> Result<Self, ServiceNameError> {
        let s = s.as_ref();
        if s.is_empty() {
            return Err(ServiceNameError::Empty);
        }
        if !s.is_ascii() {
            return Err(ServiceNameError::NotAscii(s.to_string()));
        }
        Ok(Self(SmolStr::new(s)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ServiceName {
    type Error = ServiceNameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ServiceName> for String {
    fn from(name: ServiceName) -> Self {
        name.0.to_string()
    }
}

impl Borrow<str> for ServiceName {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
