//! Property-based conformance tests for the generated code.
//!
//! - Every decode tier reproduces the value that was encoded
//! - `encoded_size` matches the encoded length exactly
//! - Every strict prefix of a valid encoding fails with `UnexpectedEof`
//! - The dynamic codec and the generated code agree byte for byte

use brine_sdp::wire::{Arena, DecodeIn, DecodeRef, Message, Result, Schema, Value, WireError};
use brine_sdp::{compile_schema, to_runtime_schema};
use proptest::prelude::*;
use sdp_conformance::generated::*;
use sdp_conformance::SCHEMA;

fn point_strategy() -> impl Strategy<Value = Point> {
    (-1.0e6f32..1.0e6, -1.0e6f32..1.0e6).prop_map(|(x, y)| Point { x, y })
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (
        any::<u32>(),
        ".{0,12}",
        prop::collection::vec(".{0,8}", 0..4),
        prop::collection::vec(-1.0e9f64..1.0e9, 0..6),
    )
        .prop_map(|(id, name, tags, weights)| Item { id, name, tags, weights })
}

fn inventory_strategy() -> impl Strategy<Value = Inventory> {
    (
        "[a-zA-Z0-9 ]{0,16}",
        prop::option::of(point_strategy()),
        prop::collection::vec(item_strategy(), 0..4),
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..8), 0..4),
        prop::collection::vec(any::<bool>(), 0..8),
    )
        .prop_map(|(owner, origin, items, grid, flags)| Inventory { owner, origin, items, grid, flags })
}

fn all_primitives_strategy() -> impl Strategy<Value = AllPrimitives> {
    (
        (any::<u8>(), any::<u16>(), any::<u32>(), any::<u64>()),
        (any::<i8>(), any::<i16>(), any::<i32>(), any::<i64>()),
        (-1.0e30f32..1.0e30, -1.0e300f64..1.0e300, any::<bool>(), ".{0,20}"),
    )
        .prop_map(|((a_u8, a_u16, a_u32, a_u64), (a_i8, a_i16, a_i32, a_i64), (a_f32, a_f64, a_bool, a_str))| {
            AllPrimitives { a_u8, a_u16, a_u32, a_u64, a_i8, a_i16, a_i32, a_i64, a_f32, a_f64, a_bool, a_str }
        })
}

fn runtime_schema() -> Schema {
    to_runtime_schema(&compile_schema(SCHEMA).unwrap()).unwrap()
}

fn point_value(point: &Point) -> Value<'static> {
    Value::Object("Point", vec![("x", Value::F32(point.x)), ("y", Value::F32(point.y))])
}

fn item_value(item: &Item) -> Value<'static> {
    Value::Object(
        "Item",
        vec![
            ("id", Value::U32(item.id)),
            ("name", Value::Str(item.name.clone())),
            ("tags", Value::Array(item.tags.iter().map(|t| Value::Str(t.clone())).collect())),
            ("weights", Value::Array(item.weights.iter().map(|w| Value::F64(*w)).collect())),
        ],
    )
}

fn inventory_value(inventory: &Inventory) -> Value<'static> {
    let mut fields = vec![("owner", Value::Str(inventory.owner.clone()))];
    if let Some(origin) = &inventory.origin {
        fields.push(("origin", point_value(origin)));
    }
    fields.push(("items", Value::Array(inventory.items.iter().map(item_value).collect())));
    fields.push((
        "grid",
        Value::Array(
            inventory
                .grid
                .iter()
                .map(|row| Value::Array(row.iter().map(|b| Value::U8(*b)).collect()))
                .collect(),
        ),
    ));
    fields.push(("flags", Value::Array(inventory.flags.iter().map(|f| Value::Bool(*f)).collect())));
    Value::Object("Inventory", fields)
}

fn item_from_arena(item: &ItemIn, arena: &Arena) -> Result<Item> {
    Ok(Item {
        id:      item.id,
        name:    item.name.resolve(arena)?.to_owned(),
        tags:    item
            .tags
            .resolve(arena)?
            .iter()
            .map(|t| t.and_then(|t| t.resolve(arena).map(str::to_owned)))
            .collect::<Result<_>>()?,
        weights: item.weights.resolve(arena)?.to_vec(),
    })
}

fn inventory_from_arena(inventory: &InventoryIn, arena: &Arena) -> Result<Inventory> {
    Ok(Inventory {
        owner:  inventory.owner.resolve(arena)?.to_owned(),
        origin: inventory.origin.as_ref().map(|p| Point { x: p.x, y: p.y }),
        items:  inventory
            .items
            .resolve(arena)?
            .iter()
            .map(|i| i.and_then(|i| item_from_arena(&i, arena)))
            .collect::<Result<_>>()?,
        grid:   inventory
            .grid
            .resolve(arena)?
            .iter()
            .map(|row| row.and_then(|row| row.resolve(arena).map(|view| view.to_vec())))
            .collect::<Result<_>>()?,
        flags:  inventory.flags.resolve(arena)?.to_vec(),
    })
}

#[test]
fn prop_owned_round_trip_and_size() {
    proptest!(|(inventory in inventory_strategy())| {
        let bytes = inventory.encode();
        prop_assert_eq!(bytes.len(), inventory.encoded_size());
        prop_assert_eq!(Inventory::decode(&bytes).unwrap(), inventory);
    });
}

#[test]
fn prop_all_primitives_round_trip() {
    proptest!(|(value in all_primitives_strategy())| {
        let bytes = value.encode();
        prop_assert_eq!(bytes.len(), 47 + value.a_str.len());
        prop_assert_eq!(bytes.len(), value.encoded_size());
        prop_assert_eq!(AllPrimitives::decode(&bytes).unwrap(), value.clone());
        prop_assert_eq!(AllPrimitivesRef::decode(&bytes).unwrap().into_owned(), value);
    });
}

#[test]
fn prop_zero_copy_matches_owned() {
    proptest!(|(inventory in inventory_strategy())| {
        let bytes = inventory.encode();
        let view = InventoryRef::decode(&bytes).unwrap();
        prop_assert_eq!(view.owner, inventory.owner.as_str());
        prop_assert_eq!(view.flags.len(), inventory.flags.len());
        prop_assert_eq!(view.into_owned(), inventory);
    });
}

#[test]
fn prop_arena_matches_owned() {
    proptest!(|(inventory in inventory_strategy())| {
        let bytes = inventory.encode();
        let mut arena = Arena::new();
        let decoded = InventoryIn::decode(&bytes, &mut arena).unwrap();
        prop_assert_eq!(inventory_from_arena(&decoded, &arena).unwrap(), inventory);
    });
}

#[test]
fn prop_truncation_is_rejected() {
    proptest!(|(inventory in inventory_strategy())| {
        let bytes = inventory.encode();
        let mut arena = Arena::new();
        for len in 0..bytes.len() {
            let prefix = &bytes[..len];
            prop_assert!(matches!(Inventory::decode(prefix), Err(WireError::UnexpectedEof { .. })), "Inventory::decode of truncated prefix (len {}) must fail with UnexpectedEof", len);
            prop_assert!(matches!(InventoryRef::decode(prefix), Err(WireError::UnexpectedEof { .. })), "InventoryRef::decode of truncated prefix (len {}) must fail with UnexpectedEof", len);
            prop_assert!(matches!(InventoryIn::decode(prefix, &mut arena), Err(WireError::UnexpectedEof { .. })), "InventoryIn::decode of truncated prefix (len {}) must fail with UnexpectedEof", len);
            arena.reset();
        }
    });
}

#[test]
fn prop_dynamic_codec_agrees() {
    let schema = runtime_schema();
    proptest!(|(inventory in inventory_strategy())| {
        let bytes = inventory.encode();
        let value = inventory_value(&inventory);
        prop_assert_eq!(value.encode(&schema).unwrap(), bytes.clone());
        prop_assert_eq!(value.encoded_size(&schema).unwrap(), bytes.len());
        prop_assert_eq!(Value::decode(&schema, 3, &bytes).unwrap(), value);
    });
}

#[test]
fn prop_framed_dispatch() {
    let schema = runtime_schema();
    proptest!(|(item in item_strategy())| {
        let framed = item.encode_message();
        prop_assert_eq!(decode_message(&framed).unwrap(), AnyMessage::Item(item.clone()));
        prop_assert_eq!(Value::decode_message(&schema, &framed).unwrap(), item_value(&item));
        prop_assert_eq!(item_value(&item).encode_message(&schema).unwrap(), framed);
    });
}
