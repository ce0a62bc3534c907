// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_param` crate.
//!
//! These walk through the public API end to end: registration, typed and
//! variant access, real-time readers, and live sync with a value tree.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use understory_param::{
    ConversionError, DuplicateName, NotFound, ParamError, ParamRegistry, SyncReport,
    TreeDocument, TreeSync, TypeMismatch, UiMetadata, ValueTree, Variant,
};

fn plugin_params() -> ParamRegistry {
    let mut registry = ParamRegistry::new();
    registry
        .add(
            "freq",
            500.0_f32,
            UiMetadata::builder()
                .tooltip("filter cutoff")
                .units("Hz")
                .logarithmic(true)
                .build(),
        )
        .unwrap();
    registry
        .add_with_clamper(
            "Num_Taps",
            4_i32,
            UiMetadata::builder().tooltip("delay taps").build(),
            |v: &mut i32| *v = (*v).clamp(1, 256),
        )
        .unwrap();
    registry.add("Enabled", true, UiMetadata::default()).unwrap();
    registry
}

#[test]
fn freq_scenario() {
    let mut registry = ParamRegistry::new();
    registry.add("freq", 500.0_f32, UiMetadata::default()).unwrap();
    assert_eq!(registry.get("freq").unwrap().get::<f32>(), Ok(500.0));

    registry.get_mut("freq").unwrap().set(15.0_f32).unwrap();
    assert_eq!(registry.get("freq").unwrap().get::<f32>(), Ok(15.0));
}

#[test]
fn duplicate_add_is_rejected() {
    let mut registry = ParamRegistry::new();
    registry.add("x", 1_i32, UiMetadata::default()).unwrap();
    assert_eq!(
        registry.add("x", 2_i32, UiMetadata::default()),
        Err(DuplicateName { name: "x".into() })
    );
    assert_eq!(registry.get("x").unwrap().get::<i32>(), Ok(1));
}

#[test]
fn missing_name_returns_not_found() {
    let registry = plugin_params();
    assert_eq!(
        registry.get("missing").err(),
        Some(NotFound {
            name: "missing".into()
        })
    );
}

#[test]
fn wrong_type_returns_mismatch() {
    let registry = plugin_params();
    assert_eq!(
        registry.get("freq").unwrap().get::<i32>(),
        Err(TypeMismatch {
            stored: "f32",
            requested: "i32",
        })
    );
}

#[test]
fn equality_checks() {
    let registry = plugin_params();
    let freq = registry.get("freq").unwrap();
    assert_eq!(freq.equals(&500.0_f32), Ok(true));
    assert_eq!(freq.equals(&501.0_f32), Ok(false));
    assert!(freq.equals(&true).is_err());
    assert_eq!(registry.get("Enabled").unwrap().equals(&true), Ok(true));
}

#[test]
fn variant_round_trip_for_every_entry() {
    let mut registry = plugin_params();
    registry.add("label", String::from("Lowpass"), UiMetadata::default()).unwrap();
    registry
        .add("taps", vec![0.25_f64, 0.5, 0.25], UiMetadata::default())
        .unwrap();

    let before: Vec<_> = registry.iter().map(|e| e.variant()).collect();
    let names: Vec<_> = registry.iter().map(|e| e.name().to_owned()).collect();
    for (name, variant) in names.iter().zip(&before) {
        registry.set_variant(name, variant).unwrap();
    }
    let after: Vec<_> = registry.iter().map(|e| e.variant()).collect();
    assert_eq!(before, after);
}

#[test]
fn variant_1234_into_f32() {
    let mut registry = plugin_params();
    registry.set_variant("freq", &Variant::Float(1234.0)).unwrap();
    assert_eq!(registry.get("freq").unwrap().get::<f32>(), Ok(1234.0));
}

#[test]
fn failed_conversion_leaves_value() {
    let mut registry = plugin_params();
    let err = registry
        .set_variant("Num_Taps", &Variant::from("lots"))
        .unwrap_err();
    assert!(matches!(
        err,
        ParamError::Conversion(ConversionError::Unparsable { .. })
    ));
    assert_eq!(registry.get("Num_Taps").unwrap().get::<i32>(), Ok(4));
}

#[test]
fn out_of_range_float_leaves_value() {
    let mut registry = plugin_params();
    let err = registry
        .set_variant("freq", &Variant::Float(1e300))
        .unwrap_err();
    assert!(matches!(
        err,
        ParamError::Conversion(ConversionError::OutOfRange { target: "f32", .. })
    ));
    assert_eq!(registry.get("freq").unwrap().get::<f32>(), Ok(500.0));
}

#[test]
fn clamper_applies_on_every_entry_path() {
    let mut registry = plugin_params();
    let taps = registry.param::<i32>("Num_Taps").unwrap();

    registry.set_value(taps, 1000).unwrap();
    assert_eq!(registry.value(taps), Ok(256));

    registry.set_variant("Num_Taps", &Variant::Int(0)).unwrap();
    assert_eq!(registry.value(taps), Ok(1));

    // The escape hatch does not clamp.
    *registry.get_mut("Num_Taps").unwrap().get_mut::<i32>().unwrap() = 222_000;
    assert_eq!(registry.value(taps), Ok(222_000));
}

#[test]
fn reader_sees_later_writes_from_another_thread() {
    let mut registry = plugin_params();
    let taps = registry.param::<i32>("Num_Taps").unwrap();
    let reader = registry.reader(taps).unwrap();

    registry.set_value(taps, 111).unwrap();
    let seen = thread::spawn(move || reader.get()).join().unwrap();
    assert_eq!(seen, 111);
}

#[test]
fn ui_view_lists_entries_in_order() {
    let registry = plugin_params();
    let rows: Vec<_> = registry
        .iter()
        .map(|e| (e.name(), e.type_name(), e.variant(), e.metadata().units()))
        .collect();
    assert_eq!(
        rows,
        [
            ("freq", "f32", Variant::Float(500.0), "Hz"),
            ("Num_Taps", "i32", Variant::Int(4), ""),
            ("Enabled", "bool", Variant::Bool(true), ""),
        ]
    );
}

#[test]
fn export_is_non_empty_and_ordered() {
    let registry = plugin_params();
    let tree = registry.export_state();
    assert_eq!(tree.property_count(), registry.len());
    let names: Vec<_> = (0..tree.property_count())
        .filter_map(|i| tree.property_name_at(i))
        .collect();
    assert_eq!(names, ["freq", "Num_Taps", "Enabled"]);
}

#[test]
fn enabled_scenario() {
    let registry = Rc::new(RefCell::new(plugin_params()));
    let mut tree = registry.borrow().export_state();
    let mut sync = TreeSync::new(Rc::clone(&registry));
    sync.sync(&mut tree);

    tree.set_property("Enabled", Variant::Bool(false));
    assert_eq!(
        registry.borrow().get("Enabled").unwrap().get::<bool>(),
        Ok(false)
    );
}

#[test]
fn ghost_scenario() {
    let registry = Rc::new(RefCell::new(plugin_params()));
    let mut tree = ValueTree::new("Preset");
    tree.set_property("Ghost", Variant::Float(0.5));
    tree.set_property("freq", Variant::Float(880.0));

    let report = TreeSync::new(Rc::clone(&registry)).sync(&mut tree);
    assert_eq!(
        report,
        SyncReport {
            applied: 1,
            ignored: 1,
            rejected: 0,
        }
    );
    assert!(registry.borrow().get("Ghost").is_err());
    assert_eq!(registry.borrow().get("freq").unwrap().get::<f32>(), Ok(880.0));
}

#[test]
fn live_edit_then_export_reflects_clamping() {
    let registry = Rc::new(RefCell::new(plugin_params()));
    let mut tree = registry.borrow().export_state();
    let mut sync = TreeSync::new(Rc::clone(&registry));
    sync.sync(&mut tree);

    tree.set_property("Num_Taps", Variant::Int(9999));
    assert_eq!(tree.property("Num_Taps"), Some(&Variant::Int(9999)));

    let exported = registry.borrow().export_state();
    assert_eq!(exported.property("Num_Taps"), Some(&Variant::Int(256)));

    assert!(sync.desync(&mut tree));
    tree.set_property("Num_Taps", Variant::Int(8));
    assert_eq!(
        registry.borrow().get("Num_Taps").unwrap().get::<i32>(),
        Ok(256)
    );
}

#[test]
fn sync_from_a_child_node() {
    let registry = Rc::new(RefCell::new(plugin_params()));
    let mut root = ValueTree::new("Plugin");
    root.add_child(ValueTree::new("Ui"));
    root.add_child(registry.borrow().export_state());

    let mut sync = TreeSync::new(Rc::clone(&registry));
    let params = root.child_mut(1).unwrap();
    sync.sync(params);
    params.set_property("freq", Variant::Float(100.0));

    assert_eq!(registry.borrow().get("freq").unwrap().get::<f32>(), Ok(100.0));
}
