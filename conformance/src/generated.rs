// Code generated by bsdp. DO NOT EDIT.
// 4 structs; frame type ids follow declaration order.

#![allow(unused_variables, unused_imports)]

use brine_sdp::wire::{
    Arena, ArenaContext, ArenaList, ArenaRecord, ArenaSlice, ArenaStr, ArrayView, ByteBuffer,
    ByteBufferMut, DecodeContext, DecodeIn, DecodeRef, FrameHeader, Message, Result, WireError,
};

/// Two-dimensional point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Zero-copy view of [`Point`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointRef {
    pub x: f32,
    pub y: f32,
}

/// Arena-backed form of [`Point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointIn {
    pub x: f32,
    pub y: f32,
}

impl Message for Point {
    const TYPE_ID: u16 = 1;
    const NAME: &'static str = "Point";

    fn encoded_size(&self) -> usize {
        let mut size = 0;
        size += 4;
        size += 4;
        size
    }

    fn encode_to(&self, bb: &mut ByteBufferMut) {
        bb.write_f32(self.x);
        bb.write_f32(self.y);
    }

    fn decode_from(bb: &mut ByteBuffer, ctx: &mut DecodeContext) -> Result<Point> {
        Ok(Point {
            x: bb.read_f32()?,
            y: bb.read_f32()?,
        })
    }
}

impl<'a> DecodeRef<'a> for PointRef {
    fn decode_from(bb: &mut ByteBuffer<'a>, ctx: &mut DecodeContext) -> Result<PointRef> {
        Ok(PointRef {
            x: bb.read_f32()?,
            y: bb.read_f32()?,
        })
    }
}

impl PointRef {
    /// Copies borrowed data into an owned [`Point`].
    pub fn into_owned(self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

impl DecodeIn for PointIn {
    fn decode_in(bb: &mut ByteBuffer, ctx: &mut ArenaContext) -> Result<PointIn> {
        Ok(PointIn {
            x: bb.read_f32()?,
            y: bb.read_f32()?,
        })
    }
}

impl ArenaRecord for PointIn {
    const RECORD_SIZE: usize = 4 + 4;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        bb.write_f32(self.x);
        bb.write_f32(self.y);
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<PointIn> {
        Ok(PointIn {
            x: bb.read_f32()?,
            y: bb.read_f32()?,
        })
    }
}

/// One of every primitive type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllPrimitives {
    pub a_u8: u8,
    pub a_u16: u16,
    pub a_u32: u32,
    pub a_u64: u64,
    pub a_i8: i8,
    pub a_i16: i16,
    pub a_i32: i32,
    pub a_i64: i64,
    pub a_f32: f32,
    pub a_f64: f64,
    pub a_bool: bool,
    pub a_str: String,
}

/// Zero-copy view of [`AllPrimitives`].
#[derive(Debug, Clone, PartialEq)]
pub struct AllPrimitivesRef<'a> {
    pub a_u8: u8,
    pub a_u16: u16,
    pub a_u32: u32,
    pub a_u64: u64,
    pub a_i8: i8,
    pub a_i16: i16,
    pub a_i32: i32,
    pub a_i64: i64,
    pub a_f32: f32,
    pub a_f64: f64,
    pub a_bool: bool,
    pub a_str: &'a str,
}

/// Arena-backed form of [`AllPrimitives`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllPrimitivesIn {
    pub a_u8: u8,
    pub a_u16: u16,
    pub a_u32: u32,
    pub a_u64: u64,
    pub a_i8: i8,
    pub a_i16: i16,
    pub a_i32: i32,
    pub a_i64: i64,
    pub a_f32: f32,
    pub a_f64: f64,
    pub a_bool: bool,
    pub a_str: ArenaStr,
}

impl Message for AllPrimitives {
    const TYPE_ID: u16 = 2;
    const NAME: &'static str = "AllPrimitives";

    fn encoded_size(&self) -> usize {
        let mut size = 0;
        size += 1;
        size += 2;
        size += 4;
        size += 8;
        size += 1;
        size += 2;
        size += 4;
        size += 8;
        size += 4;
        size += 8;
        size += 1;
        size += 4 + self.a_str.len();
        size
    }

    fn encode_to(&self, bb: &mut ByteBufferMut) {
        bb.write_u8(self.a_u8);
        bb.write_u16(self.a_u16);
        bb.write_u32(self.a_u32);
        bb.write_u64(self.a_u64);
        bb.write_i8(self.a_i8);
        bb.write_i16(self.a_i16);
        bb.write_i32(self.a_i32);
        bb.write_i64(self.a_i64);
        bb.write_f32(self.a_f32);
        bb.write_f64(self.a_f64);
        bb.write_bool(self.a_bool);
        bb.write_str(&self.a_str);
    }

    fn decode_from(bb: &mut ByteBuffer, ctx: &mut DecodeContext) -> Result<AllPrimitives> {
        Ok(AllPrimitives {
            a_u8: bb.read_u8()?,
            a_u16: bb.read_u16()?,
            a_u32: bb.read_u32()?,
            a_u64: bb.read_u64()?,
            a_i8: bb.read_i8()?,
            a_i16: bb.read_i16()?,
            a_i32: bb.read_i32()?,
            a_i64: bb.read_i64()?,
            a_f32: bb.read_f32()?,
            a_f64: bb.read_f64()?,
            a_bool: bb.read_bool()?,
            a_str: bb.read_str().map(str::to_owned)?,
        })
    }
}

impl<'a> DecodeRef<'a> for AllPrimitivesRef<'a> {
    fn decode_from(bb: &mut ByteBuffer<'a>, ctx: &mut DecodeContext) -> Result<AllPrimitivesRef<'a>> {
        Ok(AllPrimitivesRef {
            a_u8: bb.read_u8()?,
            a_u16: bb.read_u16()?,
            a_u32: bb.read_u32()?,
            a_u64: bb.read_u64()?,
            a_i8: bb.read_i8()?,
            a_i16: bb.read_i16()?,
            a_i32: bb.read_i32()?,
            a_i64: bb.read_i64()?,
            a_f32: bb.read_f32()?,
            a_f64: bb.read_f64()?,
            a_bool: bb.read_bool()?,
            a_str: bb.read_str()?,
        })
    }
}

impl<'a> AllPrimitivesRef<'a> {
    /// Copies borrowed data into an owned [`AllPrimitives`].
    pub fn into_owned(self) -> AllPrimitives {
        AllPrimitives {
            a_u8: self.a_u8,
            a_u16: self.a_u16,
            a_u32: self.a_u32,
            a_u64: self.a_u64,
            a_i8: self.a_i8,
            a_i16: self.a_i16,
            a_i32: self.a_i32,
            a_i64: self.a_i64,
            a_f32: self.a_f32,
            a_f64: self.a_f64,
            a_bool: self.a_bool,
            a_str: self.a_str.to_owned(),
        }
    }
}

impl DecodeIn for AllPrimitivesIn {
    fn decode_in(bb: &mut ByteBuffer, ctx: &mut ArenaContext) -> Result<AllPrimitivesIn> {
        Ok(AllPrimitivesIn {
            a_u8: bb.read_u8()?,
            a_u16: bb.read_u16()?,
            a_u32: bb.read_u32()?,
            a_u64: bb.read_u64()?,
            a_i8: bb.read_i8()?,
            a_i16: bb.read_i16()?,
            a_i32: bb.read_i32()?,
            a_i64: bb.read_i64()?,
            a_f32: bb.read_f32()?,
            a_f64: bb.read_f64()?,
            a_bool: bb.read_bool()?,
            a_str: ctx.read_str(bb)?,
        })
    }
}

impl ArenaRecord for AllPrimitivesIn {
    const RECORD_SIZE: usize = 1 + 2 + 4 + 8 + 1 + 2 + 4 + 8 + 4 + 8 + 1 + <ArenaStr>::RECORD_SIZE;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        bb.write_u8(self.a_u8);
        bb.write_u16(self.a_u16);
        bb.write_u32(self.a_u32);
        bb.write_u64(self.a_u64);
        bb.write_i8(self.a_i8);
        bb.write_i16(self.a_i16);
        bb.write_i32(self.a_i32);
        bb.write_i64(self.a_i64);
        bb.write_f32(self.a_f32);
        bb.write_f64(self.a_f64);
        bb.write_bool(self.a_bool);
        self.a_str.write_record(bb);
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<AllPrimitivesIn> {
        Ok(AllPrimitivesIn {
            a_u8: bb.read_u8()?,
            a_u16: bb.read_u16()?,
            a_u32: bb.read_u32()?,
            a_u64: bb.read_u64()?,
            a_i8: bb.read_i8()?,
            a_i16: bb.read_i16()?,
            a_i32: bb.read_i32()?,
            a_i64: bb.read_i64()?,
            a_f32: bb.read_f32()?,
            a_f64: bb.read_f64()?,
            a_bool: bb.read_bool()?,
            a_str: <ArenaStr>::read_record(bb)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub tags: Vec<String>,
    pub weights: Vec<f64>,
}

/// Zero-copy view of [`Item`].
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRef<'a> {
    pub id: u32,
    pub name: &'a str,
    pub tags: Vec<&'a str>,
    pub weights: ArrayView<'a, f64>,
}

/// Arena-backed form of [`Item`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemIn {
    pub id: u32,
    pub name: ArenaStr,
    pub tags: ArenaList<ArenaStr>,
    pub weights: ArenaSlice<f64>,
}

impl Message for Item {
    const TYPE_ID: u16 = 3;
    const NAME: &'static str = "Item";

    fn encoded_size(&self) -> usize {
        let mut size = 0;
        size += 4;
        size += 4 + self.name.len();
        size += 4 + self.tags.iter().map(|v| 4 + v.len()).sum::<usize>();
        size += 4 + self.weights.len() * 8;
        size
    }

    fn encode_to(&self, bb: &mut ByteBufferMut) {
        bb.write_u32(self.id);
        bb.write_str(&self.name);
        bb.write_array(&self.tags, |bb, v| bb.write_str(v));
        bb.write_slice(&self.weights);
    }

    fn decode_from(bb: &mut ByteBuffer, ctx: &mut DecodeContext) -> Result<Item> {
        Ok(Item {
            id: bb.read_u32()?,
            name: bb.read_str().map(str::to_owned)?,
            tags: bb.read_vec(ctx, |bb, ctx| bb.read_str().map(str::to_owned))?,
            weights: bb.read_primitives::<f64, _>(ctx)?,
        })
    }
}

impl<'a> DecodeRef<'a> for ItemRef<'a> {
    fn decode_from(bb: &mut ByteBuffer<'a>, ctx: &mut DecodeContext) -> Result<ItemRef<'a>> {
        Ok(ItemRef {
            id: bb.read_u32()?,
            name: bb.read_str()?,
            tags: bb.read_vec(ctx, |bb, ctx| bb.read_str())?,
            weights: bb.read_view::<f64, _>(ctx)?,
        })
    }
}

impl<'a> ItemRef<'a> {
    /// Copies borrowed data into an owned [`Item`].
    pub fn into_owned(self) -> Item {
        Item {
            id: self.id,
            name: self.name.to_owned(),
            tags: self.tags.into_iter().map(|v| v.to_owned()).collect(),
            weights: self.weights.to_vec(),
        }
    }
}

impl DecodeIn for ItemIn {
    fn decode_in(bb: &mut ByteBuffer, ctx: &mut ArenaContext) -> Result<ItemIn> {
        Ok(ItemIn {
            id: bb.read_u32()?,
            name: ctx.read_str(bb)?,
            tags: ctx.read_list(bb, |bb, ctx| ctx.read_str(bb))?,
            weights: ctx.read_primitives::<f64>(bb)?,
        })
    }
}

impl ArenaRecord for ItemIn {
    const RECORD_SIZE: usize = 4 + <ArenaStr>::RECORD_SIZE + <ArenaList<ArenaStr>>::RECORD_SIZE + <ArenaSlice<f64>>::RECORD_SIZE;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        bb.write_u32(self.id);
        self.name.write_record(bb);
        self.tags.write_record(bb);
        self.weights.write_record(bb);
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<ItemIn> {
        Ok(ItemIn {
            id: bb.read_u32()?,
            name: <ArenaStr>::read_record(bb)?,
            tags: <ArenaList<ArenaStr>>::read_record(bb)?,
            weights: <ArenaSlice<f64>>::read_record(bb)?,
        })
    }
}

/// Nested arrays, an optional struct and arrays of structs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventory {
    pub owner: String,
    /// Where the inventory was taken, if known.
    pub origin: Option<Point>,
    pub items: Vec<Item>,
    pub grid: Vec<Vec<u8>>,
    pub flags: Vec<bool>,
}

/// Zero-copy view of [`Inventory`].
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRef<'a> {
    pub owner: &'a str,
    pub origin: Option<PointRef>,
    pub items: Vec<ItemRef<'a>>,
    pub grid: Vec<ArrayView<'a, u8>>,
    pub flags: ArrayView<'a, bool>,
}

/// Arena-backed form of [`Inventory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryIn {
    pub owner: ArenaStr,
    pub origin: Option<PointIn>,
    pub items: ArenaList<ItemIn>,
    pub grid: ArenaList<ArenaSlice<u8>>,
    pub flags: ArenaSlice<bool>,
}

impl Message for Inventory {
    const TYPE_ID: u16 = 4;
    const NAME: &'static str = "Inventory";

    fn encoded_size(&self) -> usize {
        let mut size = 0;
        size += 4 + self.owner.len();
        size += 1 + self.origin.as_ref().map_or(0, |v| v.encoded_size());
        size += 4 + self.items.iter().map(|v| v.encoded_size()).sum::<usize>();
        size += 4 + self.grid.iter().map(|v| 4 + v.len() * 1).sum::<usize>();
        size += 4 + self.flags.len() * 1;
        size
    }

    fn encode_to(&self, bb: &mut ByteBufferMut) {
        bb.write_str(&self.owner);
        bb.write_option(self.origin.as_ref(), |bb, v| v.encode_to(bb));
        bb.write_array(&self.items, |bb, v| v.encode_to(bb));
        bb.write_array(&self.grid, |bb, v| bb.write_slice(v));
        bb.write_slice(&self.flags);
    }

    fn decode_from(bb: &mut ByteBuffer, ctx: &mut DecodeContext) -> Result<Inventory> {
        Ok(Inventory {
            owner: bb.read_str().map(str::to_owned)?,
            origin: bb.read_option(ctx, |bb, ctx| Point::decode_from(bb, ctx))?,
            items: bb.read_vec(ctx, |bb, ctx| Item::decode_from(bb, ctx))?,
            grid: bb.read_vec(ctx, |bb, ctx| bb.read_primitives::<u8, _>(ctx))?,
            flags: bb.read_primitives::<bool, _>(ctx)?,
        })
    }
}

impl<'a> DecodeRef<'a> for InventoryRef<'a> {
    fn decode_from(bb: &mut ByteBuffer<'a>, ctx: &mut DecodeContext) -> Result<InventoryRef<'a>> {
        Ok(InventoryRef {
            owner: bb.read_str()?,
            origin: bb.read_option(ctx, |bb, ctx| PointRef::decode_from(bb, ctx))?,
            items: bb.read_vec(ctx, |bb, ctx| ItemRef::decode_from(bb, ctx))?,
            grid: bb.read_vec(ctx, |bb, ctx| bb.read_view::<u8, _>(ctx))?,
            flags: bb.read_view::<bool, _>(ctx)?,
        })
    }
}

impl<'a> InventoryRef<'a> {
    /// Copies borrowed data into an owned [`Inventory`].
    pub fn into_owned(self) -> Inventory {
        Inventory {
            owner: self.owner.to_owned(),
            origin: self.origin.map(|v| v.into_owned()),
            items: self.items.into_iter().map(|v| v.into_owned()).collect(),
            grid: self.grid.into_iter().map(|v| v.to_vec()).collect(),
            flags: self.flags.to_vec(),
        }
    }
}

impl DecodeIn for InventoryIn {
    fn decode_in(bb: &mut ByteBuffer, ctx: &mut ArenaContext) -> Result<InventoryIn> {
        Ok(InventoryIn {
            owner: ctx.read_str(bb)?,
            origin: bb.read_option(ctx, |bb, ctx| PointIn::decode_in(bb, ctx))?,
            items: ctx.read_list(bb, |bb, ctx| ItemIn::decode_in(bb, ctx))?,
            grid: ctx.read_list(bb, |bb, ctx| ctx.read_primitives::<u8>(bb))?,
            flags: ctx.read_primitives::<bool>(bb)?,
        })
    }
}

impl ArenaRecord for InventoryIn {
    const RECORD_SIZE: usize = <ArenaStr>::RECORD_SIZE + <Option<PointIn>>::RECORD_SIZE + <ArenaList<ItemIn>>::RECORD_SIZE + <ArenaList<ArenaSlice<u8>>>::RECORD_SIZE + <ArenaSlice<bool>>::RECORD_SIZE;

    fn write_record(&self, bb: &mut ByteBufferMut) {
        self.owner.write_record(bb);
        self.origin.write_record(bb);
        self.items.write_record(bb);
        self.grid.write_record(bb);
        self.flags.write_record(bb);
    }

    fn read_record(bb: &mut ByteBuffer) -> Result<InventoryIn> {
        Ok(InventoryIn {
            owner: <ArenaStr>::read_record(bb)?,
            origin: <Option<PointIn>>::read_record(bb)?,
            items: <ArenaList<ItemIn>>::read_record(bb)?,
            grid: <ArenaList<ArenaSlice<u8>>>::read_record(bb)?,
            flags: <ArenaSlice<bool>>::read_record(bb)?,
        })
    }
}

/// Any message defined by this schema, tagged by frame type id.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMessage {
    Point(Point),
    AllPrimitives(AllPrimitives),
    Item(Item),
    Inventory(Inventory),
}

impl AnyMessage {
    pub fn type_id(&self) -> u16 {
        match self {
            AnyMessage::Point(_) => Point::TYPE_ID,
            AnyMessage::AllPrimitives(_) => AllPrimitives::TYPE_ID,
            AnyMessage::Item(_) => Item::TYPE_ID,
            AnyMessage::Inventory(_) => Inventory::TYPE_ID,
        }
    }

    pub fn encode_message(&self) -> Vec<u8> {
        match self {
            AnyMessage::Point(message) => message.encode_message(),
            AnyMessage::AllPrimitives(message) => message.encode_message(),
            AnyMessage::Item(message) => message.encode_message(),
            AnyMessage::Inventory(message) => message.encode_message(),
        }
    }
}

/// Decodes a framed message of any type in this schema.
pub fn decode_message(bytes: &[u8]) -> Result<AnyMessage> {
    let (header, payload) = FrameHeader::parse(bytes)?;
    match header.type_id {
        1 => Ok(AnyMessage::Point(Point::decode(payload)?)),
        2 => Ok(AnyMessage::AllPrimitives(AllPrimitives::decode(payload)?)),
        3 => Ok(AnyMessage::Item(Item::decode(payload)?)),
        4 => Ok(AnyMessage::Inventory(Inventory::decode(payload)?)),
        other => Err(WireError::UnknownTypeId(other)),
    }
}
