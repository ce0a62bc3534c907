// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dynamic interchange value.
//!
//! [`Variant`] is the neutral representation used whenever a parameter value
//! leaves strongly-typed code: UI widgets, inspectors and tree documents all
//! speak `Variant`. The set of kinds is closed; see [`VariantKind`].

use std::fmt;

/// A dynamically-typed value with a closed set of kinds.
///
/// Integers are always carried as `i64` and floating-point values as `f64`,
/// so every registrable parameter type widens into a `Variant` without loss.
///
/// # Example
///
/// ```rust
/// use understory_param::{Variant, VariantKind};
///
/// let v = Variant::from(500.0_f32);
/// assert_eq!(v.kind(), VariantKind::Float);
/// assert_eq!(v.as_float(), Some(500.0));
///
/// let list: Variant = [1_i64, 2, 3].into_iter().map(Variant::from).collect();
/// assert_eq!(list.to_string(), "[1, 2, 3]");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Variant {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered sequence of variants.
    Array(Vec<Variant>),
}

/// The kind of a [`Variant`], without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// [`Variant::Bool`].
    Bool,
    /// [`Variant::Int`].
    Int,
    /// [`Variant::Float`].
    Float,
    /// [`Variant::String`].
    String,
    /// [`Variant::Array`].
    Array,
}

impl VariantKind {
    /// Returns a short lowercase name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Variant {
    /// Returns the kind of this variant.
    #[must_use]
    pub const fn kind(&self) -> VariantKind {
        match self {
            Self::Bool(_) => VariantKind::Bool,
            Self::Int(_) => VariantKind::Int,
            Self::Float(_) => VariantKind::Float,
            Self::String(_) => VariantKind::String,
            Self::Array(_) => VariantKind::Array,
        }
    }

    /// Returns the boolean payload, if this is a [`Variant::Bool`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is a [`Variant::Int`].
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64` if this is a [`Variant::Float`] or a
    /// [`Variant::Int`].
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            // Integers beyond 2^53 round to the nearest float.
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a [`Variant::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements, if this is a [`Variant::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Variant {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Variant {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl FromIterator<Self> for Variant {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}
