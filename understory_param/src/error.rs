// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Every fallible operation returns one of the narrow error types below.
//! [`ParamError`] unifies them so callers can chain lookups, typed access and
//! variant conversion with `?`.

use thiserror::Error;

use crate::id::ParamId;
use crate::variant::VariantKind;

/// A typed accessor was called with a type other than the parameter's own.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("parameter holds `{stored}`, not `{requested}`")]
pub struct TypeMismatch {
    /// Type name of the stored value.
    pub stored: &'static str,
    /// Type name the caller asked for.
    pub requested: &'static str,
}

/// No parameter with the given name exists.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no parameter named `{name}`")]
pub struct NotFound {
    /// The name that was looked up.
    pub name: String,
}

/// A parameter with the given name is already registered.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("a parameter named `{name}` is already registered")]
pub struct DuplicateName {
    /// The rejected name.
    pub name: String,
}

/// A [`Variant`](crate::Variant) could not be converted into a parameter type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The variant's kind has no conversion to the target type.
    #[error("cannot convert a {found} variant to `{target}`")]
    WrongKind {
        /// Target type name.
        target: &'static str,
        /// Kind of the offending variant.
        found: VariantKind,
    },
    /// The value is numeric but does not fit the target type.
    #[error("{value} is out of range for `{target}`")]
    OutOfRange {
        /// Target type name.
        target: &'static str,
        /// The offending value, rendered as text.
        value: String,
    },
    /// A string variant does not parse as the target type.
    #[error("cannot parse {text:?} as `{target}`")]
    Unparsable {
        /// Target type name.
        target: &'static str,
        /// The offending text.
        text: String,
    },
    /// An array element failed to convert.
    #[error("element {index}: {source}")]
    Element {
        /// Position of the element in the array.
        index: usize,
        /// Why the element failed.
        source: Box<ConversionError>,
    },
}

/// Any error produced by this crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamError {
    /// See [`NotFound`].
    #[error(transparent)]
    NotFound(#[from] NotFound),
    /// See [`DuplicateName`].
    #[error(transparent)]
    DuplicateName(#[from] DuplicateName),
    /// See [`TypeMismatch`].
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),
    /// See [`ConversionError`].
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// A typed key was used with a registry that did not issue it.
    #[error("{0} does not belong to this registry")]
    UnknownId(ParamId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = TypeMismatch {
            stored: "f32",
            requested: "i32",
        };
        assert_eq!(err.to_string(), "parameter holds `f32`, not `i32`");

        let err = ConversionError::Element {
            index: 2,
            source: Box::new(ConversionError::WrongKind {
                target: "f32",
                found: VariantKind::String,
            }),
        };
        assert_eq!(
            err.to_string(),
            "element 2: cannot convert a string variant to `f32`"
        );
    }

    #[test]
    fn param_error_is_transparent() {
        let err: ParamError = NotFound {
            name: "Ghost".into(),
        }
        .into();
        assert_eq!(err.to_string(), "no parameter named `Ghost`");
        assert!(matches!(err, ParamError::NotFound(_)));
    }
}
