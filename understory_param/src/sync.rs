// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live synchronization from a tree document into a registry.
//!
//! [`TreeSync`] attaches a shared [`ParamRegistry`] to an [`ObservableTree`].
//! Tree edits flow into the registry as they happen; registry writes never
//! flow back. Use [`ParamRegistry::export_state`] to snapshot the registry
//! into a tree.

use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};

use crate::error::ParamError;
use crate::registry::ParamRegistry;
use crate::tree::{ListenerId, ObservableTree, TreeDocument, TreeListener};
use crate::variant::Variant;

/// A registry shared between its owner and a [`TreeSync`].
pub type SharedRegistry = Rc<RefCell<ParamRegistry>>;

/// What happened to the properties pulled by [`TreeSync::sync`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Properties assigned to a matching parameter.
    pub applied: usize,
    /// Properties with no matching parameter.
    pub ignored: usize,
    /// Properties whose value could not be assigned.
    pub rejected: usize,
}

impl SyncReport {
    /// Returns the number of properties examined.
    #[must_use]
    pub fn total(&self) -> usize {
        self.applied + self.ignored + self.rejected
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Ignored => self.ignored += 1,
            Outcome::Rejected => self.rejected += 1,
        }
    }
}

/// Keeps a registry in step with a tree document.
///
/// The adapter owns its listener; the tree only holds it weakly. Calling
/// [`desync`](Self::desync) or dropping the adapter stops delivery.
///
/// Do not hold a borrow of the registry across a tree edit. An edit that
/// arrives while the registry is borrowed is dropped with a warning and is
/// not retried, so the tree and the registry disagree until the property is
/// set again or the adapter re-syncs.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_param::{ParamRegistry, TreeDocument, TreeSync, UiMetadata, Variant};
///
/// let registry = Rc::new(RefCell::new(ParamRegistry::new()));
/// registry.borrow_mut().add("Enabled", true, UiMetadata::default()).unwrap();
///
/// let mut tree = registry.borrow().export_state();
/// let mut sync = TreeSync::new(Rc::clone(&registry));
/// sync.sync(&mut tree);
///
/// tree.set_property("Enabled", Variant::Bool(false));
/// assert_eq!(registry.borrow().get("Enabled").unwrap().get::<bool>(), Ok(false));
///
/// assert!(sync.desync(&mut tree));
/// assert!(!sync.desync(&mut tree));
/// ```
#[derive(Debug)]
pub struct TreeSync {
    registry: SharedRegistry,
    state: State,
}

#[derive(Debug)]
enum State {
    Detached,
    Attached {
        // Only strong reference to the listener.
        listener: Rc<RegistryListener>,
        id: ListenerId,
    },
}

impl TreeSync {
    /// Creates a detached adapter for `registry`.
    #[must_use]
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            state: State::Detached,
        }
    }

    /// Returns the registry this adapter writes into.
    #[must_use]
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Returns `true` while attached to a tree.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self.state, State::Attached { .. })
    }

    /// Attaches to `tree` and pulls its current properties into the registry.
    ///
    /// Properties without a matching parameter are ignored, and properties
    /// whose value does not convert are rejected; neither aborts the pull.
    /// If the adapter was already attached, the previous attachment is
    /// dropped first.
    pub fn sync<D: ObservableTree>(&mut self, tree: &mut D) -> SyncReport {
        self.state = State::Detached;

        let listener = Rc::new(RegistryListener {
            registry: Rc::clone(&self.registry),
        });
        let weak = Rc::downgrade(&listener) as Weak<dyn TreeListener>;
        let id = tree.add_listener(weak);
        let report = listener.pull(&*tree);
        log::debug!(
            "attached to tree: {} applied, {} ignored, {} rejected",
            report.applied,
            report.ignored,
            report.rejected
        );

        self.state = State::Attached { listener, id };
        report
    }

    /// Detaches from `tree`.
    ///
    /// Returns `true` if the listener was registered on `tree`. Delivery
    /// stops either way, and calling this while detached is a no-op.
    pub fn desync<D: ObservableTree + ?Sized>(&mut self, tree: &mut D) -> bool {
        match mem::replace(&mut self.state, State::Detached) {
            State::Attached { id, .. } => tree.remove_listener(id),
            State::Detached => false,
        }
    }
}

enum Outcome {
    Applied,
    Ignored,
    Rejected,
}

#[derive(Debug)]
struct RegistryListener {
    registry: SharedRegistry,
}

impl RegistryListener {
    fn pull(&self, tree: &dyn TreeDocument) -> SyncReport {
        let mut report = SyncReport::default();
        for index in 0..tree.property_count() {
            let Some(name) = tree.property_name_at(index) else {
                continue;
            };
            if let Some(value) = tree.property(name) {
                report.record(self.apply(name, value));
            }
        }
        report
    }

    fn apply(&self, name: &str, value: &Variant) -> Outcome {
        let Ok(mut registry) = self.registry.try_borrow_mut() else {
            log::warn!("registry is busy; dropped tree edit to `{name}`");
            return Outcome::Rejected;
        };
        match registry.set_variant(name, value) {
            Ok(()) => Outcome::Applied,
            Err(ParamError::NotFound(_)) => {
                log::debug!("ignoring tree property `{name}` with no matching parameter");
                Outcome::Ignored
            }
            Err(err) => {
                log::warn!("rejected tree value {value} for `{name}`: {err}");
                Outcome::Rejected
            }
        }
    }
}

impl TreeListener for RegistryListener {
    fn property_changed(&self, tree: &dyn TreeDocument, property: &str) {
        match tree.property(property) {
            Some(value) => {
                self.apply(property, value);
            }
            None => log::debug!("tree property `{property}` removed; parameter keeps its value"),
        }
    }
}
