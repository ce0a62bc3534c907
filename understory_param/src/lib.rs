// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Param: typed parameter registry with live tree synchronization.
//!
//! This crate stores named, dynamically-typed control values (a filter
//! cutoff, a tap count, an on/off switch) and exposes them three ways at once:
//!
//! - **Typed access** for processing code, through [`ParamCell`],
//!   [`ParamReader`] and typed [`Param<T>`] keys.
//! - **Variant access** for UI and inspection code that does not know the
//!   value type, through [`Variant`].
//! - **Live tree sync**: [`TreeSync`] applies edits made to an external
//!   [`ObservableTree`] as they happen, and [`ParamRegistry::export_state`]
//!   snapshots the registry back into a [`ValueTree`].
//!
//! ## Core Concepts
//!
//! ### Cells and handles
//!
//! A [`ParamCell<T>`] owns one value and an optional clamper that normalizes
//! every assigned value. A [`ParamHandle`] erases `T` and checks it again on
//! every typed access, returning [`TypeMismatch`] instead of panicking.
//!
//! ### Registry
//!
//! [`ParamRegistry`] owns the handles, keyed by unique name and kept in
//! insertion order. Registering a name twice fails with [`DuplicateName`].
//!
//! ### Clamping
//!
//! The clamper runs on every path that assigns a value: [`ParamCell::set`],
//! [`ParamHandle::set_variant`], [`ParamRegistry::set_variant`], the initial
//! pull in [`TreeSync::sync`] and every live tree edit. Only
//! [`ParamCell::get_mut`] bypasses it.
//!
//! ### Real-time reads
//!
//! [`ParamReader<T>`] shares the cell's storage and never locks. Scalars are
//! atomics; strings and vectors are published through `arc_swap`.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_param::{
//!     ParamRegistry, TreeDocument, TreeSync, UiMetadata, Variant,
//! };
//!
//! let mut registry = ParamRegistry::new();
//! let freq = registry
//!     .add_with_clamper("freq", 500.0_f32, UiMetadata::default(), |v: &mut f32| {
//!         *v = v.clamp(20.0, 20_000.0);
//!     })
//!     .unwrap();
//! registry.add("Enabled", true, UiMetadata::default()).unwrap();
//!
//! // Hand a lock-free reader to the processing thread.
//! let reader = registry.reader(freq).unwrap();
//!
//! // Typed write from control code.
//! registry.set_value(freq, 15.0).unwrap();
//! assert_eq!(reader.get(), 20.0);
//!
//! // Untyped write from a UI.
//! registry.set_variant("freq", &Variant::Float(1234.0)).unwrap();
//! assert_eq!(reader.get(), 1234.0);
//!
//! // Snapshot into a tree and follow its edits.
//! let registry = Rc::new(RefCell::new(registry));
//! let mut tree = registry.borrow().export_state();
//! let mut sync = TreeSync::new(Rc::clone(&registry));
//! sync.sync(&mut tree);
//!
//! tree.set_property("Enabled", Variant::Bool(false));
//! assert_eq!(registry.borrow().get("Enabled").unwrap().get::<bool>(), Ok(false));
//! ```
//!
//! ## Supported value types
//!
//! | Type | Variant kind |
//! |------|--------------|
//! | `bool` | `Bool` |
//! | `i8`..`i64`, `u8`..`u32` | `Int` |
//! | `f32`, `f64` | `Float` |
//! | `String` | `String` |
//! | `Vec<T>` of any of the above | `Array` |
//!
//! ## Features
//!
//! - `serde`: serialization for [`Variant`], [`ValueTree`] and [`UiMetadata`].

mod cell;
mod error;
mod handle;
mod id;
mod metadata;
mod registry;
mod sync;
mod tree;
mod value;
mod variant;

pub use cell::{Clamper, ParamCell, ParamReader, ValueMut};
pub use error::{ConversionError, DuplicateName, NotFound, ParamError, TypeMismatch};
pub use handle::ParamHandle;
pub use id::{Param, ParamId};
pub use metadata::{DisplayStyle, UiMetadata, UiMetadataBuilder};
pub use registry::{PARAMETER_LIST, ParamEntry, ParamRegistry};
pub use sync::{SharedRegistry, SyncReport, TreeSync};
pub use tree::{ListenerId, ObservableTree, TreeDocument, TreeListener, ValueTree};
pub use value::{AtomicFloatSlot, AtomicSlot, ParamValue, SharedSlot, ValueSlot};
pub use variant::{Variant, VariantKind};
