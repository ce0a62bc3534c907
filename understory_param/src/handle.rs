// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased parameter handles.
//!
//! [`ParamHandle`] owns a [`ParamCell<T>`] behind a trait object and recovers
//! the concrete cell only after checking the requested type against the
//! stored [`TypeId`].

use std::any::{Any, TypeId, type_name};
use std::fmt;

use crate::cell::{ParamCell, ParamReader, ValueMut};
use crate::error::{ConversionError, TypeMismatch};
use crate::value::ParamValue;
use crate::variant::Variant;

/// A parameter whose value type is known only at runtime.
///
/// Typed accessors take the expected type as a parameter and return
/// [`TypeMismatch`] if it is wrong. The variant accessors work regardless of
/// the stored type.
///
/// # Example
///
/// ```rust
/// use understory_param::{ParamHandle, Variant};
///
/// let mut freq = ParamHandle::new(500.0_f32);
/// assert_eq!(freq.get::<f32>(), Ok(500.0));
/// assert!(freq.get::<i32>().is_err());
///
/// freq.set_variant(&Variant::Float(1234.0)).unwrap();
/// assert_eq!(freq.equals(&1234.0_f32), Ok(true));
/// ```
pub struct ParamHandle {
    cell: Box<dyn ErasedCell>,
    type_id: TypeId,
}

impl ParamHandle {
    /// Creates a handle holding `value`, with no clamper.
    #[must_use]
    pub fn new<T: ParamValue>(value: T) -> Self {
        Self::from_cell(ParamCell::new(value))
    }

    /// Wraps an existing cell.
    #[must_use]
    pub fn from_cell<T: ParamValue>(cell: ParamCell<T>) -> Self {
        Self {
            cell: Box::new(cell),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the stored value type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the name of the stored value type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.cell.type_name()
    }

    /// Returns `true` if the stored value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns the typed cell.
    pub fn cell<T: ParamValue>(&self) -> Result<&ParamCell<T>, TypeMismatch> {
        if self.is::<T>()
            && let Some(cell) = self.cell.as_any().downcast_ref()
        {
            return Ok(cell);
        }
        Err(self.mismatch::<T>())
    }

    /// Returns the typed cell mutably.
    pub fn cell_mut<T: ParamValue>(&mut self) -> Result<&mut ParamCell<T>, TypeMismatch> {
        let mismatch = self.mismatch::<T>();
        if self.is::<T>()
            && let Some(cell) = self.cell.as_any_mut().downcast_mut()
        {
            return Ok(cell);
        }
        Err(mismatch)
    }

    /// Returns a copy of the value.
    pub fn get<T: ParamValue>(&self) -> Result<T, TypeMismatch> {
        self.cell::<T>().map(ParamCell::get)
    }

    /// Assigns a value through the clamper.
    pub fn set<T: ParamValue>(&mut self, value: T) -> Result<(), TypeMismatch> {
        self.cell_mut::<T>()?.set(value);
        Ok(())
    }

    /// Compares the value with `other`.
    pub fn equals<T: ParamValue>(&self, other: &T) -> Result<bool, TypeMismatch> {
        Ok(self.cell::<T>()?.equals(other))
    }

    /// Direct mutable access that bypasses the clamper.
    ///
    /// See [`ParamCell::get_mut`].
    pub fn get_mut<T: ParamValue>(&mut self) -> Result<ValueMut<'_, T>, TypeMismatch> {
        Ok(self.cell_mut::<T>()?.get_mut())
    }

    /// Returns a lock-free reader for the real-time context.
    pub fn reader<T: ParamValue>(&self) -> Result<ParamReader<T>, TypeMismatch> {
        self.cell::<T>().map(ParamCell::reader)
    }

    /// Installs a clamper and re-clamps the current value.
    pub fn set_clamper<T, F>(&mut self, clamper: F) -> Result<(), TypeMismatch>
    where
        T: ParamValue,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.cell_mut::<T>()?.set_clamper(clamper);
        Ok(())
    }

    /// Converts the value into a [`Variant`].
    #[must_use]
    pub fn to_variant(&self) -> Variant {
        self.cell.to_variant()
    }

    /// Converts `variant` into the stored type and assigns it through the
    /// clamper. On failure the value is unchanged.
    pub fn set_variant(&mut self, variant: &Variant) -> Result<(), ConversionError> {
        self.cell.set_variant(variant)
    }

    fn mismatch<T>(&self) -> TypeMismatch {
        TypeMismatch {
            stored: self.type_name(),
            requested: type_name::<T>(),
        }
    }
}

impl fmt::Debug for ParamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamHandle")
            .field("type", &self.type_name())
            .field("value", &self.to_variant())
            .finish_non_exhaustive()
    }
}

/// Object-safe view of a [`ParamCell<T>`] for any `T`.
trait ErasedCell: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
    fn to_variant(&self) -> Variant;
    fn set_variant(&mut self, variant: &Variant) -> Result<(), ConversionError>;
}

impl<T: ParamValue> ErasedCell for ParamCell<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn to_variant(&self) -> Variant {
        Self::to_variant(self)
    }

    fn set_variant(&mut self, variant: &Variant) -> Result<(), ConversionError> {
        Self::set_variant(self, variant)
    }
}
