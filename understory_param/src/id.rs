// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameter identification types.
//!
//! [`ParamId`] is the position of an entry in its registry's insertion order.
//! [`Param<T>`] pairs that position with the value type fixed at registration,
//! so typed access through it never has to name `T` again.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// The insertion index of a registry entry.
///
/// Entries are never removed, so an id stays valid for the lifetime of the
/// [`ParamRegistry`](crate::ParamRegistry) that issued it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamId(u32);

impl ParamId {
    /// Creates an id from an insertion index.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the insertion index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParamId").field(&self.0).finish()
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parameter #{}", self.0)
    }
}

/// A typed key returned by [`ParamRegistry::add`](crate::ParamRegistry::add).
///
/// ```rust
/// use understory_param::{ParamRegistry, UiMetadata};
///
/// let mut registry = ParamRegistry::new();
/// let taps = registry.add("Num_Taps", 4_i32, UiMetadata::default()).unwrap();
///
/// registry.set_value(taps, 10).unwrap();
/// assert_eq!(registry.value(taps), Ok(10));
/// ```
pub struct Param<T> {
    id: ParamId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Param<T> {
    /// Creates a typed key from an id.
    ///
    /// A key whose `T` differs from the registered type yields
    /// [`TypeMismatch`](crate::TypeMismatch) on use rather than undefined
    /// behavior.
    #[must_use]
    #[inline]
    pub const fn from_id(id: ParamId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the untyped id.
    #[must_use]
    #[inline]
    pub const fn id(self) -> ParamId {
        self.id
    }
}

impl<T> Copy for Param<T> {}

impl<T> Clone for Param<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Param<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Param<T> {}

impl<T> Hash for Param<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("id", &self.id.0)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
