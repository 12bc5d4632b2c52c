use brine_sdp::wire::{
    context::{MAX_ARRAY_ELEMENTS, MAX_SERIALIZED_SIZE, MAX_TOTAL_ELEMENTS},
    encode_frame, Arena, ArenaRecord, DecodeIn, DecodeRef, Message, WireError,
};
use brine_sdp::{compile_schema, generate, BackendKind};
use sdp_conformance::generated::*;
use sdp_conformance::SCHEMA;

fn sample_inventory() -> Inventory {
    Inventory {
        owner:  "ada".to_string(),
        origin: Some(Point { x: 0.5, y: -0.5 }),
        items:  vec![Item {
            id:      7,
            name:    "bolt".to_string(),
            tags:    vec!["m3".to_string(), "steel".to_string()],
            weights: vec![1.5],
        }],
        grid:   vec![vec![1, 2], vec![]],
        flags:  vec![true, false],
    }
}

/// Encodes an Inventory prefix (owner "", no origin, no items) followed by
/// `grid` as raw bytes.
fn inventory_with_grid(grid: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0, 0, 0, 0, 0, 0, 0, 0, 0];
    bytes.extend_from_slice(grid);
    bytes
}

#[test]
fn checked_in_code_matches_generator() {
    let schema = compile_schema(SCHEMA).unwrap();
    let files = generate(&schema, BackendKind::Rust).unwrap();
    assert_eq!(files[0].path, "generated.rs");
    assert_eq!(files[0].contents, include_str!("../src/generated.rs"));
}

#[test]
fn point_worked_example() {
    let point = Point { x: 3.14, y: 2.71 };
    let bytes = point.encode();
    assert_eq!(bytes, [0xC3, 0xF5, 0x48, 0x40, 0xA4, 0x70, 0x2D, 0x40]);
    assert_eq!(Point::decode(&bytes).unwrap(), point);
    assert_eq!(PointRef::decode(&bytes).unwrap(), PointRef { x: 3.14, y: 2.71 });
}

#[test]
fn inventory_layout() {
    let bytes = sample_inventory().encode();
    let mut expected = vec![3, 0, 0, 0, b'a', b'd', b'a'];
    expected.extend_from_slice(&[1, 0, 0, 0, 0x3F, 0, 0, 0, 0xBF]);
    expected.extend_from_slice(&[1, 0, 0, 0]);
    expected.extend_from_slice(&[7, 0, 0, 0, 4, 0, 0, 0, b'b', b'o', b'l', b't']);
    expected.extend_from_slice(&[2, 0, 0, 0, 2, 0, 0, 0, b'm', b'3', 5, 0, 0, 0, b's', b't', b'e', b'e', b'l']);
    expected.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xF8, 0x3F]);
    expected.extend_from_slice(&[2, 0, 0, 0, 2, 0, 0, 0, 1, 2, 0, 0, 0, 0]);
    expected.extend_from_slice(&[2, 0, 0, 0, 1, 0]);
    assert_eq!(bytes, expected);
}

#[test]
fn absent_optional_is_one_zero_byte() {
    let inventory = Inventory { owner: "a".to_string(), ..Inventory::default() };
    let bytes = inventory.encode();
    assert_eq!(bytes, [1, 0, 0, 0, b'a', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(Inventory::decode(&bytes).unwrap(), inventory);
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut bytes = Point { x: 1.0, y: 2.0 }.encode();
    bytes.extend_from_slice(&[0xFF; 3]);
    assert_eq!(Point::decode(&bytes).unwrap(), Point { x: 1.0, y: 2.0 });
}

#[test]
fn strict_bool_in_every_position() {
    let mut bytes = inventory_with_grid(&[0, 0, 0, 0, 1, 0, 0, 0, 2]);
    assert_eq!(Inventory::decode(&bytes), Err(WireError::InvalidBool(2)));
    assert_eq!(InventoryRef::decode(&bytes).unwrap_err(), WireError::InvalidBool(2));
    assert_eq!(InventoryIn::decode(&bytes, &mut Arena::new()).unwrap_err(), WireError::InvalidBool(2));

    // Presence flag of `origin`.
    bytes = vec![0, 0, 0, 0, 2];
    assert_eq!(Inventory::decode(&bytes), Err(WireError::InvalidBool(2)));

    let mut all = AllPrimitives::default().encode();
    all[42] = 0xFF;
    assert_eq!(AllPrimitives::decode(&all), Err(WireError::InvalidBool(0xFF)));
}

#[test]
fn strict_utf8_in_every_tier() {
    let bytes = [2, 0, 0, 0, 0xC3, 0x28, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(Inventory::decode(&bytes), Err(WireError::InvalidUtf8));
    assert_eq!(InventoryRef::decode(&bytes).unwrap_err(), WireError::InvalidUtf8);
    assert_eq!(InventoryIn::decode(&bytes, &mut Arena::new()).unwrap_err(), WireError::InvalidUtf8);
}

#[test]
fn truncated_string_reports_eof() {
    assert_eq!(
        Inventory::decode(&[10, 0, 0, 0, b'a']),
        Err(WireError::UnexpectedEof { needed: 14, available: 5 })
    );
}

#[test]
fn array_limit_is_checked_before_reading() {
    let count = (MAX_ARRAY_ELEMENTS + 1).to_le_bytes();
    let bytes = inventory_with_grid(&count);
    assert_eq!(
        Inventory::decode(&bytes),
        Err(WireError::ArrayTooLarge { count: 1_000_001, max: 1_000_000 })
    );

    // At the limit the count is accepted but the input cannot back it.
    let bytes = inventory_with_grid(&MAX_ARRAY_ELEMENTS.to_le_bytes());
    assert!(matches!(Inventory::decode(&bytes), Err(WireError::UnexpectedEof { .. })));
}

#[test]
fn cumulative_limit_spans_nested_arrays() {
    // The outer grid count (10) counts too, so the last row may hold
    // 10_000_000 - 10 - 9 * 1_000_000 elements.
    let last_row = (MAX_TOTAL_ELEMENTS - 10 - 9 * MAX_ARRAY_ELEMENTS as u64) as usize;
    assert_eq!(last_row, 999_990);

    let mut inventory = Inventory {
        grid: vec![vec![0u8; MAX_ARRAY_ELEMENTS as usize]; 9],
        ..Inventory::default()
    };
    inventory.grid.push(vec![0u8; last_row]);
    let bytes = inventory.encode();
    assert_eq!(Inventory::decode(&bytes).unwrap().grid.len(), 10);
    assert_eq!(InventoryRef::decode(&bytes).unwrap().grid[9].len(), last_row);

    inventory.grid[9].push(0);
    let bytes = inventory.encode();
    assert_eq!(
        Inventory::decode(&bytes),
        Err(WireError::TooManyElements { total: 10_000_001, max: 10_000_000 })
    );
    assert!(matches!(
        InventoryIn::decode(&bytes, &mut Arena::new()),
        Err(WireError::TooManyElements { .. })
    ));
}

#[test]
fn oversized_input_is_rejected() {
    let bytes = vec![0u8; MAX_SERIALIZED_SIZE + 1];
    assert_eq!(
        Point::decode(&bytes),
        Err(WireError::DataTooLarge { size: MAX_SERIALIZED_SIZE + 1, max: MAX_SERIALIZED_SIZE })
    );
}

#[test]
fn encode_into_needs_room() {
    let inventory = sample_inventory();
    let mut small = vec![0u8; inventory.encoded_size() - 1];
    assert_eq!(
        inventory.encode_into(&mut small),
        Err(WireError::BufferTooSmall { needed: small.len() + 1, available: small.len() })
    );
    assert!(small.iter().all(|b| *b == 0));

    let mut exact = vec![0u8; inventory.encoded_size() + 4];
    assert_eq!(inventory.encode_into(&mut exact), Ok(inventory.encoded_size()));
    assert_eq!(&exact[..inventory.encoded_size()], inventory.encode().as_slice());
}

#[test]
fn arena_is_reused_across_messages() {
    let first_bytes = sample_inventory().encode();
    let second_bytes = Inventory {
        owner:  "grace".to_string(),
        origin: None,
        items:  vec![Item {
            id:      9,
            name:    "nut".to_string(),
            tags:    vec!["m4".to_string()],
            weights: vec![],
        }],
        grid:   vec![vec![5]],
        flags:  vec![false],
    }
    .encode();
    let mut arena = Arena::with_capacity(256);

    let first = InventoryIn::decode(&first_bytes, &mut arena).unwrap();
    assert_eq!(first.owner.resolve(&arena).unwrap(), "ada");
    let item = first.items.resolve(&arena).unwrap().get(0).unwrap().unwrap();
    let tag = item.tags.resolve(&arena).unwrap().get(1).unwrap().unwrap();
    assert_eq!(tag.resolve(&arena).unwrap(), "steel");
    let row = first.grid.resolve(&arena).unwrap().get(0).unwrap().unwrap();
    assert_eq!(row.resolve(&arena).unwrap().to_vec(), vec![1, 2]);
    assert_eq!(arena.used(), 200);

    arena.reset();
    assert_eq!(arena.used(), 0);
    assert_eq!(first.owner.resolve(&arena), Err(WireError::StaleArenaHandle));
    assert!(matches!(first.items.resolve(&arena), Err(WireError::StaleArenaHandle)));
    assert_eq!(first.flags.resolve(&arena).unwrap_err(), WireError::StaleArenaHandle);

    let second = InventoryIn::decode(&second_bytes, &mut arena).unwrap();
    assert_eq!(arena.used(), 152);
    assert_eq!(arena.capacity(), 256);
    assert_eq!(second.owner.resolve(&arena).unwrap(), "grace");
    assert_eq!(second.origin, None);
    let items = second.items.resolve(&arena).unwrap().to_vec().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 9);
    assert_eq!(items[0].name.resolve(&arena).unwrap(), "nut");
    let tags = items[0].tags.resolve(&arena).unwrap().to_vec().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].resolve(&arena).unwrap(), "m4");
    assert!(items[0].weights.is_empty());
    let grid = second.grid.resolve(&arena).unwrap().to_vec().unwrap();
    assert_eq!(grid.len(), 1);
    assert_eq!(grid[0].resolve(&arena).unwrap().to_vec(), vec![5]);
    assert_eq!(second.flags.resolve(&arena).unwrap().to_vec(), vec![false]);
}

#[test]
fn arena_decode_stays_in_the_region() {
    fn copy_only<T: Copy>() {}
    copy_only::<InventoryIn>();
    copy_only::<ItemIn>();

    let inventory = Inventory {
        items: (0..1000).map(|id| Item { id, name: "bolt".to_string(), ..Item::default() }).collect(),
        ..Inventory::default()
    };
    let bytes = inventory.encode();
    let mut arena = Arena::with_capacity(1 << 17);
    for _ in 0..3 {
        arena.reset();
        let decoded = InventoryIn::decode(&bytes, &mut arena).unwrap();
        assert_eq!(decoded.items.len(), 1000);
        // One record per item, then every name padded to 8 bytes.
        assert_eq!(arena.used(), 1000 * ItemIn::RECORD_SIZE + 1000 * 8);
        assert_eq!(arena.capacity(), 1 << 17);
    }
    assert_eq!(ItemIn::RECORD_SIZE, 64);
}

#[test]
fn framing() {
    let all = AllPrimitives { a_u16: 0xBEEF, a_str: "x".to_string(), ..AllPrimitives::default() };
    let framed = all.encode_message();
    assert_eq!(&framed[..10], &[b'S', b'D', b'P', b'2', 2, 0, 48, 0, 0, 0]);
    assert_eq!(decode_message(&framed).unwrap(), AnyMessage::AllPrimitives(all.clone()));
    assert_eq!(AllPrimitives::decode_message(&framed).unwrap(), all);

    let any = AnyMessage::Point(Point { x: 1.0, y: 1.0 });
    assert_eq!(any.type_id(), 1);
    assert_eq!(decode_message(&any.encode_message()).unwrap(), any);

    assert_eq!(decode_message(&encode_frame(99, &[])), Err(WireError::UnknownTypeId(99)));
    assert_eq!(
        Point::decode_message(&framed),
        Err(WireError::TypeIdMismatch { expected: 1, found: 2 })
    );

    let mut bad_magic = framed.clone();
    bad_magic[0] = b'X';
    assert_eq!(decode_message(&bad_magic), Err(WireError::InvalidMagic(*b"XDP")));

    let mut bad_version = framed.clone();
    bad_version[3] = b'1';
    assert_eq!(decode_message(&bad_version), Err(WireError::UnsupportedVersion(b'1')));

    assert!(matches!(decode_message(&framed[..9]), Err(WireError::UnexpectedEof { .. })));
    assert!(matches!(decode_message(&framed[..framed.len() - 1]), Err(WireError::UnexpectedEof { .. })));
}
