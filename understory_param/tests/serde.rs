// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serialization of trees and variants with the `serde` feature.

#![cfg(feature = "serde")]

use serde_json::json;
use understory_param::{
    DisplayStyle, ParamRegistry, TreeDocument, UiMetadata, ValueTree, Variant,
};

#[test]
fn variant_maps_onto_json_values() {
    let v = Variant::Array(vec![
        Variant::Bool(true),
        Variant::Int(3),
        Variant::Float(0.5),
        Variant::from("hz"),
    ]);
    assert_eq!(serde_json::to_value(&v).unwrap(), json!([true, 3, 0.5, "hz"]));

    let back: Variant = serde_json::from_value(json!([true, 3, 0.5, "hz"])).unwrap();
    assert_eq!(back, v);
}

#[test]
fn exported_tree_serializes_without_listeners() {
    let mut registry = ParamRegistry::new();
    registry.add("freq", 500.0_f32, UiMetadata::default()).unwrap();
    registry.add("Enabled", true, UiMetadata::default()).unwrap();

    let tree = registry.export_state();
    let text = serde_json::to_string(&tree).unwrap();
    let back: ValueTree = serde_json::from_str(&text).unwrap();

    assert_eq!(back, tree);
    assert_eq!(back.type_name(), "PARAMETER_LIST");
    assert_eq!(back.property("Enabled"), Some(&Variant::Bool(true)));
    assert_eq!(back.listener_count(), 0);
}

#[test]
fn metadata_serializes() {
    let metadata = UiMetadata::builder()
        .units("dB")
        .style(DisplayStyle::Slider)
        .build();
    let text = serde_json::to_string(&metadata).unwrap();
    let back: UiMetadata = serde_json::from_str(&text).unwrap();
    assert_eq!(back, metadata);
}
