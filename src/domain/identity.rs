//! Function and type identities shared by every discovery stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a function by its owning type (or module) and its name.
///
/// Overloads are not distinguished: two functions with the same name on the
/// same owner map to the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionIdentity {
    pub type_name: String,
    pub method_name: String,
}

impl FunctionIdentity {
    pub fn new(type_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method_name: method_name.into(),
        }
    }

    /// Parse `path::to::Type::method` by splitting at the last `::`.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (type_name, method_name) = qualified.trim().rsplit_once("::")?;
        if type_name.is_empty() || method_name.is_empty() {
            return None;
        }
        Some(Self::new(type_name, method_name))
    }
}

impl fmt::Display for FunctionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.method_name)
    }
}

/// A resolved, fully-qualified type name passed through to backends untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeReference(String);

impl TypeReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The return type of a function that declares none.
    pub fn void() -> Self {
        Self("void".to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
