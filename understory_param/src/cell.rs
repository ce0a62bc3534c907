// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strongly-typed parameter storage.
//!
//! A [`ParamCell<T>`] owns one value and an optional clamper. The control
//! context writes through the cell; the real-time context reads through a
//! [`ParamReader<T>`] that shares the cell's lock-free slot.

use std::any::TypeId;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::error::ConversionError;
use crate::value::{ParamValue, ValueSlot};
use crate::variant::Variant;

/// Normalizes a newly assigned value in place.
///
/// Typical clampers restrict a range or snap to a step, e.g.
/// `|v: &mut f32| *v = v.clamp(20.0, 20_000.0)`.
pub type Clamper<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// Storage for a single parameter value of type `T`.
///
/// Every setter except [`get_mut`](Self::get_mut) runs the clamper before the
/// new value is published, so readers never observe an unclamped value.
///
/// # Example
///
/// ```rust
/// use understory_param::ParamCell;
///
/// let mut gain = ParamCell::with_clamper(0.5_f32, |v| *v = v.clamp(0.0, 1.0));
/// let reader = gain.reader();
///
/// gain.set(3.0);
/// assert_eq!(gain.get(), 1.0);
/// assert_eq!(reader.get(), 1.0);
/// ```
pub struct ParamCell<T: ParamValue> {
    slot: Arc<T::Slot>,
    clamper: Option<Clamper<T>>,
}

impl<T: ParamValue> ParamCell<T> {
    /// Creates a cell holding `value`, with no clamper.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Arc::new(T::Slot::new(value)),
            clamper: None,
        }
    }

    /// Creates a cell with a clamper; the initial value is clamped too.
    #[must_use]
    pub fn with_clamper<F>(value: T, clamper: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let mut cell = Self::new(value);
        cell.set_clamper(clamper);
        cell
    }

    /// Returns the [`TypeId`] of `T`.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    /// Returns a copy of the current value.
    #[must_use]
    #[inline]
    pub fn get(&self) -> T {
        self.slot.load()
    }

    /// Calls `f` with a borrow of the current value.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.slot.with(f)
    }

    /// Returns `true` if the current value equals `other`.
    #[must_use]
    pub fn equals(&self, other: &T) -> bool {
        self.with(|value| value == other)
    }

    /// Assigns a new value, clamping it first.
    pub fn set(&mut self, value: T) {
        let value = self.clamp(value);
        self.slot.store(value);
    }

    /// Runs the clamper, if any, over `value` and returns the result.
    #[must_use]
    pub fn clamp(&self, mut value: T) -> T {
        if let Some(clamper) = &self.clamper {
            clamper(&mut value);
        }
        value
    }

    /// Installs a clamper and re-clamps the current value.
    pub fn set_clamper<F>(&mut self, clamper: F)
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.clamper = Some(Box::new(clamper));
        let current = self.get();
        self.set(current);
    }

    /// Removes the clamper. Returns `true` if one was set.
    pub fn clear_clamper(&mut self) -> bool {
        self.clamper.take().is_some()
    }

    /// Returns `true` if a clamper is set.
    #[must_use]
    #[inline]
    pub fn has_clamper(&self) -> bool {
        self.clamper.is_some()
    }

    /// Direct mutable access that **bypasses the clamper**.
    ///
    /// The edited value is published when the returned guard is dropped.
    /// This is an escape hatch for processing code that owns the value's
    /// invariants itself; use [`set`](Self::set) otherwise.
    ///
    /// ```rust
    /// use understory_param::ParamCell;
    ///
    /// let mut taps = ParamCell::with_clamper(4_i32, |v| *v = (*v).min(8));
    /// *taps.get_mut() = 222;
    /// assert_eq!(taps.get(), 222);
    /// ```
    pub fn get_mut(&mut self) -> ValueMut<'_, T> {
        let value = self.get();
        ValueMut { cell: self, value }
    }

    /// Returns a read-only view that shares this cell's storage.
    #[must_use]
    pub fn reader(&self) -> ParamReader<T> {
        ParamReader {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Converts the current value into a [`Variant`].
    #[must_use]
    pub fn to_variant(&self) -> Variant {
        self.with(T::to_variant)
    }

    /// Converts `variant` into `T` and assigns it through the clamper.
    ///
    /// On failure the stored value is unchanged.
    pub fn set_variant(&mut self, variant: &Variant) -> Result<(), ConversionError> {
        let value = T::from_variant(variant)?;
        self.set(value);
        Ok(())
    }
}

impl<T: ParamValue> fmt::Debug for ParamCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| {
            f.debug_struct("ParamCell")
                .field("value", value)
                .field("has_clamper", &self.has_clamper())
                .finish_non_exhaustive()
        })
    }
}

/// A cloneable, lock-free, read-only view of a [`ParamCell`].
///
/// Readers are `Send + Sync` and are meant to be handed to the real-time
/// context. For scalar types `get` is a single atomic load.
pub struct ParamReader<T: ParamValue> {
    slot: Arc<T::Slot>,
}

impl<T: ParamValue> ParamReader<T> {
    /// Returns a copy of the current value.
    #[must_use]
    #[inline]
    pub fn get(&self) -> T {
        self.slot.load()
    }

    /// Calls `f` with a borrow of the current value.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.slot.with(f)
    }
}

impl<T: ParamValue> Clone for ParamReader<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: ParamValue> fmt::Debug for ParamReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("ParamReader").field(value).finish())
    }
}

/// Guard returned by [`ParamCell::get_mut`].
///
/// Dereferences to a working copy of the value and publishes it, unclamped,
/// on drop.
pub struct ValueMut<'a, T: ParamValue> {
    cell: &'a mut ParamCell<T>,
    value: T,
}

impl<T: ParamValue> Deref for ValueMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: ParamValue> DerefMut for ValueMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: ParamValue> Drop for ValueMut<'_, T> {
    fn drop(&mut self) {
        self.cell.slot.store(self.value.clone());
    }
}

impl<T: ParamValue> fmt::Debug for ValueMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueMut").field(&self.value).finish()
    }
}
