// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable tree documents.
//!
//! A tree document is a hierarchical store of named [`Variant`] properties
//! owned by someone else (a host, an editor, a persistence layer). This module
//! defines the contract the sync adapter relies on ([`TreeDocument`],
//! [`ObservableTree`], [`TreeListener`]) and provides an in-memory
//! implementation, [`ValueTree`].
//!
//! Listeners are registered as [`Weak`] references: the tree never keeps a
//! listener alive, so dropping the owner of a listener is enough to stop
//! delivery.

use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::variant::Variant;

/// Identifies one listener registration.
///
/// Ids are unique across all trees in the process, so removing an id from
/// the wrong tree is a harmless no-op.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocates a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Receives property-change notifications from a tree.
pub trait TreeListener {
    /// Called synchronously after `property` changed or was removed in `tree`.
    fn property_changed(&self, tree: &dyn TreeDocument, property: &str);
}

/// Read/write access to a tree node's properties.
pub trait TreeDocument {
    /// Returns the value of a property.
    fn property(&self, name: &str) -> Option<&Variant>;

    /// Sets a property, notifying listeners.
    fn set_property(&mut self, name: &str, value: Variant);

    /// Returns the number of properties.
    fn property_count(&self) -> usize;

    /// Returns the name of the property at `index`, in document order.
    fn property_name_at(&self, index: usize) -> Option<&str>;
}

/// A [`TreeDocument`] that reports changes to registered listeners.
pub trait ObservableTree: TreeDocument {
    /// Registers a listener and returns its id.
    fn add_listener(&mut self, listener: Weak<dyn TreeListener>) -> ListenerId;

    /// Unregisters a listener. Returns `true` if it was registered here.
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

/// An in-memory observable tree node.
///
/// Properties keep insertion order. Setting a property to the value it
/// already holds does not notify listeners. Cloning a tree copies its
/// properties and children but not its listeners.
///
/// # Example
///
/// ```rust
/// use understory_param::{TreeDocument, ValueTree, Variant};
///
/// let mut tree = ValueTree::new("Preset");
/// tree.set_property("Enabled", Variant::Bool(true));
/// tree.set_property("Name", Variant::from("Init"));
///
/// assert_eq!(tree.property_count(), 2);
/// assert_eq!(tree.property_name_at(1), Some("Name"));
/// assert_eq!(tree.property("Enabled"), Some(&Variant::Bool(true)));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueTree {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    type_name: String,
    properties: Vec<(String, Variant)>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    children: Vec<ValueTree>,
    #[cfg_attr(feature = "serde", serde(skip))]
    listeners: SmallVec<[(ListenerId, Weak<dyn TreeListener>); 2]>,
}

impl ValueTree {
    /// Creates an empty tree node of the given type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            children: Vec::new(),
            listeners: SmallVec::new(),
        }
    }

    /// Returns the node's type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns `true` if the node has a property called `name`.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates over `(name, value)` pairs in document order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Removes a property, notifying listeners. Returns the old value.
    pub fn remove_property(&mut self, name: &str) -> Option<Variant> {
        let index = self.position(name)?;
        let (name, value) = self.properties.remove(index);
        self.notify(&name);
        Some(value)
    }

    /// Appends a child node.
    pub fn add_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    /// Returns the child at `index` mutably.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.children.get_mut(index)
    }

    /// Returns the first child with the given type name.
    #[must_use]
    pub fn child_with_type(&self, type_name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.type_name == type_name)
    }

    /// Returns the number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(_, listener)| listener.strong_count() > 0)
            .count()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|(n, _)| n == name)
    }

    fn notify(&mut self, property: &str) {
        self.listeners.retain(|(_, listener)| listener.strong_count() > 0);
        // Upgrade first so listeners can be dropped from inside a callback.
        let live: SmallVec<[Rc<dyn TreeListener>; 2]> = self
            .listeners
            .iter()
            .filter_map(|(_, listener)| listener.upgrade())
            .collect();
        for listener in live {
            listener.property_changed(&*self, property);
        }
    }
}

impl TreeDocument for ValueTree {
    fn property(&self, name: &str) -> Option<&Variant> {
        self.position(name).map(|i| &self.properties[i].1)
    }

    fn set_property(&mut self, name: &str, value: Variant) {
        match self.position(name) {
            Some(i) if self.properties[i].1 == value => return,
            Some(i) => self.properties[i].1 = value,
            None => self.properties.push((name.into(), value)),
        }
        self.notify(name);
    }

    fn property_count(&self) -> usize {
        self.properties.len()
    }

    fn property_name_at(&self, index: usize) -> Option<&str> {
        self.properties.get(index).map(|(name, _)| name.as_str())
    }
}

impl ObservableTree for ValueTree {
    fn add_listener(&mut self, listener: Weak<dyn TreeListener>) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.push((id, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _)| *other != id);
        self.listeners.len() != before
    }
}

impl Clone for ValueTree {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name.clone(),
            properties: self.properties.clone(),
            children: self.children.clone(),
            listeners: SmallVec::new(),
        }
    }
}

impl PartialEq for ValueTree {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.properties == other.properties
            && self.children == other.children
    }
}

impl fmt::Debug for ValueTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTree")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .field("children", &self.children)
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
