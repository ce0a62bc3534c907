// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parameter registry.
//!
//! This module provides [`ParamRegistry`], an insertion-ordered, name-keyed
//! collection of [`ParamHandle`]s with their [`UiMetadata`].

use std::any::TypeId;
use std::fmt;
use std::slice;

use hashbrown::HashMap;

use crate::cell::{ParamCell, ParamReader};
use crate::error::{DuplicateName, NotFound, ParamError, TypeMismatch};
use crate::handle::ParamHandle;
use crate::id::{Param, ParamId};
use crate::metadata::UiMetadata;
use crate::tree::{TreeDocument, ValueTree};
use crate::value::ParamValue;
use crate::variant::Variant;

/// Type name of the tree produced by [`ParamRegistry::export_state`].
pub const PARAMETER_LIST: &str = "PARAMETER_LIST";

/// One registered parameter.
pub struct ParamEntry {
    id: ParamId,
    name: String,
    handle: ParamHandle,
    metadata: UiMetadata,
}

impl ParamEntry {
    /// Returns the entry's id.
    #[must_use]
    #[inline]
    pub fn id(&self) -> ParamId {
        self.id
    }

    /// Returns the entry's name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entry's handle.
    #[must_use]
    #[inline]
    pub fn handle(&self) -> &ParamHandle {
        &self.handle
    }

    /// Returns the entry's UI metadata.
    #[must_use]
    #[inline]
    pub fn metadata(&self) -> &UiMetadata {
        &self.metadata
    }

    /// Returns the [`TypeId`] of the value type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.handle.type_id()
    }

    /// Returns the name of the value type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.handle.type_name()
    }

    /// Returns the current value as a [`Variant`].
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.handle.to_variant()
    }
}

impl fmt::Debug for ParamEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type", &self.type_name())
            .field("value", &self.variant())
            .finish_non_exhaustive()
    }
}

/// A named, insertion-ordered collection of parameters.
///
/// Each name maps to exactly one entry for the lifetime of the registry:
/// registering a name twice is rejected and the first entry is kept.
///
/// # Example
///
/// ```rust
/// use understory_param::{ParamRegistry, UiMetadata, Variant};
///
/// let mut registry = ParamRegistry::new();
/// registry.add("freq", 500.0_f32, UiMetadata::default()).unwrap();
/// registry.add("Enabled", true, UiMetadata::default()).unwrap();
///
/// assert_eq!(registry.get("freq").unwrap().get::<f32>(), Ok(500.0));
/// assert!(registry.add("freq", 1.0_f32, UiMetadata::default()).is_err());
///
/// registry.set_variant("Enabled", &Variant::Bool(false)).unwrap();
/// let names: Vec<_> = registry.iter().map(|e| e.name()).collect();
/// assert_eq!(names, ["freq", "Enabled"]);
/// ```
#[derive(Default)]
pub struct ParamRegistry {
    entries: Vec<ParamEntry>,
    by_name: HashMap<String, ParamId>,
}

impl ParamRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter and returns its typed key.
    ///
    /// Fails with [`DuplicateName`] if `name` is taken; the existing entry is
    /// left unmodified.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` parameters are registered.
    pub fn add<T: ParamValue>(
        &mut self,
        name: impl Into<String>,
        default: T,
        metadata: UiMetadata,
    ) -> Result<Param<T>, DuplicateName> {
        self.insert(name.into(), ParamCell::new(default), metadata)
    }

    /// Registers a parameter whose values pass through `clamper`.
    ///
    /// The default value is clamped too.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` parameters are registered.
    pub fn add_with_clamper<T, F>(
        &mut self,
        name: impl Into<String>,
        default: T,
        metadata: UiMetadata,
        clamper: F,
    ) -> Result<Param<T>, DuplicateName>
    where
        T: ParamValue,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.insert(
            name.into(),
            ParamCell::with_clamper(default, clamper),
            metadata,
        )
    }

    fn insert<T: ParamValue>(
        &mut self,
        name: String,
        cell: ParamCell<T>,
        metadata: UiMetadata,
    ) -> Result<Param<T>, DuplicateName> {
        if self.by_name.contains_key(&name) {
            log::debug!("rejected duplicate parameter `{name}`");
            return Err(DuplicateName { name });
        }
        assert!(
            self.entries.len() < u32::MAX as usize,
            "too many parameters registered"
        );

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = ParamId::new(self.entries.len() as u32);

        self.by_name.insert(name.clone(), id);
        self.entries.push(ParamEntry {
            id,
            name,
            handle: ParamHandle::from_cell(cell),
            metadata,
        });
        Ok(Param::from_id(id))
    }

    /// Returns the number of registered parameters.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameters are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a parameter called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Looks up a parameter's id by name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<ParamId> {
        self.by_name.get(name).copied()
    }

    /// Returns the entry called `name`.
    pub fn entry(&self, name: &str) -> Result<&ParamEntry, NotFound> {
        self.id(name)
            .and_then(|id| self.entries.get(id.slot()))
            .ok_or_else(|| not_found(name))
    }

    /// Returns the handle called `name`.
    pub fn get(&self, name: &str) -> Result<&ParamHandle, NotFound> {
        self.entry(name).map(ParamEntry::handle)
    }

    /// Returns the handle called `name` mutably.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut ParamHandle, NotFound> {
        let id = self.id(name).ok_or_else(|| not_found(name))?;
        self.entries
            .get_mut(id.slot())
            .map(|entry| &mut entry.handle)
            .ok_or_else(|| not_found(name))
    }

    /// Returns the UI metadata of the parameter called `name`.
    pub fn metadata(&self, name: &str) -> Result<&UiMetadata, NotFound> {
        self.entry(name).map(ParamEntry::metadata)
    }

    /// Returns the handle with the given id.
    #[must_use]
    pub fn handle(&self, id: ParamId) -> Option<&ParamHandle> {
        self.entries.get(id.slot()).map(ParamEntry::handle)
    }

    fn handle_mut(&mut self, id: ParamId) -> Result<&mut ParamHandle, ParamError> {
        self.entries
            .get_mut(id.slot())
            .map(|entry| &mut entry.handle)
            .ok_or(ParamError::UnknownId(id))
    }

    /// Recovers a typed key by name, checking the value type.
    pub fn param<T: ParamValue>(&self, name: &str) -> Result<Param<T>, ParamError> {
        let entry = self.entry(name)?;
        if !entry.handle.is::<T>() {
            return Err(TypeMismatch {
                stored: entry.type_name(),
                requested: std::any::type_name::<T>(),
            }
            .into());
        }
        Ok(Param::from_id(entry.id))
    }

    /// Returns a copy of a parameter's value.
    pub fn value<T: ParamValue>(&self, param: Param<T>) -> Result<T, ParamError> {
        let handle = self
            .handle(param.id())
            .ok_or(ParamError::UnknownId(param.id()))?;
        Ok(handle.get()?)
    }

    /// Assigns a parameter's value through its clamper.
    pub fn set_value<T: ParamValue>(&mut self, param: Param<T>, value: T) -> Result<(), ParamError> {
        self.handle_mut(param.id())?.set(value)?;
        Ok(())
    }

    /// Returns a lock-free reader for a parameter.
    pub fn reader<T: ParamValue>(&self, param: Param<T>) -> Result<ParamReader<T>, ParamError> {
        let handle = self
            .handle(param.id())
            .ok_or(ParamError::UnknownId(param.id()))?;
        Ok(handle.reader()?)
    }

    /// Assigns the parameter called `name` from a [`Variant`].
    ///
    /// This is the write path for code that does not know the value type.
    /// On failure the stored value is unchanged.
    pub fn set_variant(&mut self, name: &str, variant: &Variant) -> Result<(), ParamError> {
        self.get_mut(name)?.set_variant(variant)?;
        Ok(())
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, ParamEntry> {
        self.entries.iter()
    }

    /// Snapshots every parameter into a [`ValueTree`] of type
    /// [`PARAMETER_LIST`], one property per entry in insertion order.
    #[must_use]
    pub fn export_state(&self) -> ValueTree {
        let mut tree = ValueTree::new(PARAMETER_LIST);
        for entry in &self.entries {
            tree.set_property(&entry.name, entry.variant());
        }
        tree
    }
}

impl<'a> IntoIterator for &'a ParamRegistry {
    type Item = &'a ParamEntry;
    type IntoIter = slice::Iter<'a, ParamEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for ParamRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamRegistry")
            .field("count", &self.entries.len())
            .field(
                "params",
                &self.entries.iter().map(ParamEntry::name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn not_found(name: &str) -> NotFound {
    NotFound { name: name.into() }
}
