use crate::{
    bb::{ByteBuffer, ByteBufferMut},
    context::{check_serialized_size, DecodeContext},
    error::{Result, WireError},
    frame::{encode_frame, FrameHeader},
    schema::{Def, Field, FieldType, PrimitiveType, Schema},
};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::ops::Index;

/// This type holds dynamic wire data.
///
/// Values can represent anything in a schema and can be converted to and from
/// byte arrays using the corresponding [Schema](struct.Schema.html). Struct and
/// field names are borrowed from the Schema, so a Value can outlive the buffer
/// it was decoded from but can't outlive the schema.
///
/// Object fields keep declaration order. An absent optional field is simply
/// missing from the object.
#[derive(Clone, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Array(Vec<Value<'a>>),
    Object(&'a str, Vec<(&'a str, Value<'a>)>),
}

impl<'a> Value<'a> {
    /// A convenience method to extract the value out of a [Bool](#variant.Bool).
    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            Value::Bool(value) => value,
            _ => false,
        }
    }

    /// Widens any unsigned integer. Returns `0` for other value kinds.
    pub fn as_u64(&self) -> u64 {
        match *self {
            Value::U8(value) => value.into(),
            Value::U16(value) => value.into(),
            Value::U32(value) => value.into(),
            Value::U64(value) => value,
            _ => 0,
        }
    }

    /// Widens any signed integer. Returns `0` for other value kinds.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Value::I8(value) => value.into(),
            Value::I16(value) => value.into(),
            Value::I32(value) => value.into(),
            Value::I64(value) => value,
            _ => 0,
        }
    }

    /// Widens either float. Returns `0.0` for other value kinds.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::F32(value) => value.into(),
            Value::F64(value) => value,
            _ => 0.0,
        }
    }

    /// A convenience method to extract the value out of a [Str](#variant.Str).
    /// Returns `""` for other value kinds.
    pub fn as_str(&self) -> &str {
        match *self {
            Value::Str(ref value) => value.as_str(),
            _ => "",
        }
    }

    /// A convenience method to extract the contents of an [Array](#variant.Array).
    /// Returns `&[]` for other value kinds.
    pub fn as_array(&self) -> &[Value<'a>] {
        match *self {
            Value::Array(ref values) => values.as_slice(),
            _ => &[],
        }
    }

    /// A convenience method to extract the length out of an [Array](#variant.Array).
    /// Returns `0` for other value kinds.
    pub fn len(&self) -> usize {
        match *self {
            Value::Array(ref values) => values.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A convenience method to append to an [Array](#variant.Array).
    /// Does nothing for other value kinds.
    pub fn push(&mut self, value: Value<'a>) {
        if let Value::Array(ref mut values) = *self {
            values.push(value);
        }
    }

    /// A convenience method to extract a field out of an [Object](#variant.Object).
    /// Returns `None` for other value kinds or if the field isn't present.
    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        match *self {
            Value::Object(_, ref fields) => fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// A convenience method to update a field on an [Object](#variant.Object).
    /// New fields are appended. Does nothing for other value kinds.
    pub fn set(&mut self, name: &'a str, value: Value<'a>) {
        if let Value::Object(_, ref mut fields) = *self {
            match fields.iter_mut().find(|(k, _)| *k == name) {
                Some(slot) => slot.1 = value,
                None => fields.push((name, value)),
            }
        }
    }

    /// A convenience method to remove a field on an [Object](#variant.Object).
    /// Does nothing for other value kinds.
    pub fn remove(&mut self, name: &str) {
        if let Value::Object(_, ref mut fields) = *self {
            fields.retain(|(k, _)| *k != name);
        }
    }

    /// Decodes the struct at `def_index` in `schema` from `bytes`, applying the
    /// size limit and a fresh decode context. Trailing bytes are ignored.
    pub fn decode(schema: &'a Schema, def_index: usize, bytes: &[u8]) -> Result<Value<'a>> {
        check_serialized_size(bytes.len())?;
        let mut ctx = DecodeContext::new();
        Value::decode_bb(schema, def_index, &mut ByteBuffer::new(bytes), &mut ctx)
    }

    /// Decodes a framed message, dispatching on its type id.
    pub fn decode_message(schema: &'a Schema, bytes: &[u8]) -> Result<Value<'a>> {
        let (header, payload) = FrameHeader::parse(bytes)?;
        let index = schema
            .index_of_type_id(header.type_id)
            .ok_or(WireError::UnknownTypeId(header.type_id))?;
        Value::decode(schema, index, payload)
    }

    /// Encodes this value into an array of bytes using the provided `schema`.
    /// The value must be an [Object](#variant.Object) naming a struct in it.
    pub fn encode(&self, schema: &Schema) -> Result<Vec<u8>> {
        let def_index = self.object_def_index(schema)?;
        let ty = FieldType::Struct(def_index);
        let size = self.encoded_size_as(schema, &ty)?;
        let mut out = vec![0u8; size];
        self.encode_as(schema, &ty, &mut ByteBufferMut::new(&mut out))?;
        Ok(out)
    }

    /// Encodes this value behind a frame header.
    pub fn encode_message(&self, schema: &Schema) -> Result<Vec<u8>> {
        let def_index = self.object_def_index(schema)?;
        let payload = self.encode(schema)?;
        Ok(encode_frame((def_index + 1) as u16, &payload))
    }

    /// Exact number of bytes [encode](#method.encode) produces.
    pub fn encoded_size(&self, schema: &Schema) -> Result<usize> {
        let def_index = self.object_def_index(schema)?;
        self.encoded_size_as(schema, &FieldType::Struct(def_index))
    }

    fn object_def_index(&self, schema: &Schema) -> Result<usize> {
        match *self {
            Value::Object(name, _) => schema
                .index_of(name)
                .ok_or_else(|| WireError::SchemaMismatch(format!("unknown struct {}", name))),
            _ => Err(WireError::SchemaMismatch("top-level value is not an object".to_owned())),
        }
    }

    /// Decodes the struct at `def_index` from `bb` starting at the current
    /// index. Every array read goes through `ctx`. This is mainly useful as a
    /// helper routine for [decode](#method.decode), which you probably want to
    /// use instead.
    pub fn decode_bb(
        schema: &'a Schema,
        def_index: usize,
        bb: &mut ByteBuffer,
        ctx: &mut DecodeContext,
    ) -> Result<Value<'a>> {
        let def = schema
            .defs
            .get(def_index)
            .ok_or_else(|| WireError::SchemaMismatch(format!("no struct at index {}", def_index)))?;

        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            if field.optional {
                if let Some(value) = bb.read_option(ctx, |bb, ctx| {
                    Value::decode_field_bb(schema, &field.field_type, bb, ctx)
                })? {
                    fields.push((field.name.as_str(), value));
                }
            } else {
                fields.push((
                    field.name.as_str(),
                    Value::decode_field_bb(schema, &field.field_type, bb, ctx)?,
                ));
            }
        }
        Ok(Value::Object(def.name.as_str(), fields))
    }

    /// Decodes one value of type `ty` from `bb`. This is used by
    /// [decode_bb](#method.decode_bb) but may also be useful by itself.
    pub fn decode_field_bb(
        schema: &'a Schema,
        ty: &FieldType,
        bb: &mut ByteBuffer,
        ctx: &mut DecodeContext,
    ) -> Result<Value<'a>> {
        match *ty {
            FieldType::Primitive(primitive) => decode_primitive(primitive, bb),
            FieldType::Struct(def_index) => Value::decode_bb(schema, def_index, bb, ctx),
            FieldType::Array(ref element) => Ok(Value::Array(
                bb.read_vec(ctx, |bb, ctx| Value::decode_field_bb(schema, element, bb, ctx))?,
            )),
        }
    }

    fn encoded_size_as(&self, schema: &Schema, ty: &FieldType) -> Result<usize> {
        match (ty, self) {
            (FieldType::Primitive(PrimitiveType::Str), Value::Str(value)) => Ok(4 + value.len()),
            (FieldType::Primitive(primitive), _) => {
                check_primitive(*primitive, self)?;
                Ok(primitive.fixed_size().unwrap_or(0))
            }
            (FieldType::Array(element), Value::Array(values)) => {
                let mut size = 4;
                for value in values {
                    size += value.encoded_size_as(schema, element)?;
                }
                Ok(size)
            }
            (FieldType::Struct(def_index), Value::Object(name, fields)) => {
                let def = expect_def(schema, *def_index, name)?;
                check_no_extra_fields(def, fields)?;
                let mut size = 0;
                for field in &def.fields {
                    size += match (self.get(&field.name), field.optional) {
                        (Some(value), true) => 1 + value.encoded_size_as(schema, &field.field_type)?,
                        (None, true) => 1,
                        (Some(value), false) => value.encoded_size_as(schema, &field.field_type)?,
                        (None, false) => return Err(missing_field(def, field)),
                    };
                }
                Ok(size)
            }
            _ => Err(mismatch(ty, self)),
        }
    }

    /// Encodes this value as type `ty` at the current index of `bb`. The buffer
    /// must have room for [encoded_size](#method.encoded_size) bytes.
    pub fn encode_as(&self, schema: &Schema, ty: &FieldType, bb: &mut ByteBufferMut) -> Result<()> {
        match (ty, self) {
            (FieldType::Primitive(primitive), _) => encode_primitive(*primitive, self, bb),
            (FieldType::Array(element), Value::Array(values)) => {
                bb.write_u32(values.len() as u32);
                for value in values {
                    value.encode_as(schema, element, bb)?;
                }
                Ok(())
            }
            (FieldType::Struct(def_index), Value::Object(name, fields)) => {
                let def = expect_def(schema, *def_index, name)?;
                check_no_extra_fields(def, fields)?;
                for field in &def.fields {
                    match (self.get(&field.name), field.optional) {
                        (Some(value), true) => {
                            bb.write_bool(true);
                            value.encode_as(schema, &field.field_type, bb)?;
                        }
                        (None, true) => bb.write_bool(false),
                        (Some(value), false) => value.encode_as(schema, &field.field_type, bb)?,
                        (None, false) => return Err(missing_field(def, field)),
                    }
                }
                Ok(())
            }
            _ => Err(mismatch(ty, self)),
        }
    }

    fn kind(&self) -> &'static str {
        match *self {
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
            Value::Object(..) => "object",
        }
    }
}

fn decode_primitive<'a>(primitive: PrimitiveType, bb: &mut ByteBuffer) -> Result<Value<'a>> {
    Ok(match primitive {
        PrimitiveType::Bool => Value::Bool(bb.read_bool()?),
        PrimitiveType::U8 => Value::U8(bb.read_u8()?),
        PrimitiveType::U16 => Value::U16(bb.read_u16()?),
        PrimitiveType::U32 => Value::U32(bb.read_u32()?),
        PrimitiveType::U64 => Value::U64(bb.read_u64()?),
        PrimitiveType::I8 => Value::I8(bb.read_i8()?),
        PrimitiveType::I16 => Value::I16(bb.read_i16()?),
        PrimitiveType::I32 => Value::I32(bb.read_i32()?),
        PrimitiveType::I64 => Value::I64(bb.read_i64()?),
        PrimitiveType::F32 => Value::F32(bb.read_f32()?),
        PrimitiveType::F64 => Value::F64(bb.read_f64()?),
        PrimitiveType::Str => Value::Str(bb.read_str()?.to_owned()),
    })
}

fn check_primitive(primitive: PrimitiveType, value: &Value) -> Result<()> {
    if primitive.name() == value.kind() {
        Ok(())
    } else {
        Err(mismatch(&FieldType::Primitive(primitive), value))
    }
}

fn encode_primitive(primitive: PrimitiveType, value: &Value, bb: &mut ByteBufferMut) -> Result<()> {
    match (primitive, value) {
        (PrimitiveType::Bool, Value::Bool(v)) => bb.write_bool(*v),
        (PrimitiveType::U8, Value::U8(v)) => bb.write_u8(*v),
        (PrimitiveType::U16, Value::U16(v)) => bb.write_u16(*v),
        (PrimitiveType::U32, Value::U32(v)) => bb.write_u32(*v),
        (PrimitiveType::U64, Value::U64(v)) => bb.write_u64(*v),
        (PrimitiveType::I8, Value::I8(v)) => bb.write_i8(*v),
        (PrimitiveType::I16, Value::I16(v)) => bb.write_i16(*v),
        (PrimitiveType::I32, Value::I32(v)) => bb.write_i32(*v),
        (PrimitiveType::I64, Value::I64(v)) => bb.write_i64(*v),
        (PrimitiveType::F32, Value::F32(v)) => bb.write_f32(*v),
        (PrimitiveType::F64, Value::F64(v)) => bb.write_f64(*v),
        (PrimitiveType::Str, Value::Str(v)) => bb.write_str(v),
        _ => return Err(mismatch(&FieldType::Primitive(primitive), value)),
    }
    Ok(())
}

fn expect_def<'s>(schema: &'s Schema, def_index: usize, name: &str) -> Result<&'s Def> {
    match schema.defs.get(def_index) {
        Some(def) if def.name == name => Ok(def),
        Some(def) => Err(WireError::SchemaMismatch(format!(
            "expected a {} object, found {}",
            def.name, name
        ))),
        None => Err(WireError::SchemaMismatch(format!("no struct at index {}", def_index))),
    }
}

fn check_no_extra_fields(def: &Def, fields: &[(&str, Value)]) -> Result<()> {
    match fields.iter().find(|(name, _)| def.field(name).is_none()) {
        Some((name, _)) => Err(WireError::SchemaMismatch(format!(
            "{} has no field named {}",
            def.name, name
        ))),
        None => Ok(()),
    }
}

fn missing_field(def: &Def, field: &Field) -> WireError {
    WireError::SchemaMismatch(format!("{}.{} is required", def.name, field.name))
}

fn mismatch(ty: &FieldType, value: &Value) -> WireError {
    let expected = match *ty {
        FieldType::Primitive(primitive) => primitive.name(),
        FieldType::Struct(_) => "object",
        FieldType::Array(_) => "array",
    };
    WireError::SchemaMismatch(format!("expected {}, found {}", expected, value.kind()))
}

impl<'a> Index<usize> for Value<'a> {
    type Output = Value<'a>;

    /// A convenience method that adds support for `self[index]` expressions.
    /// It will panic if this value isn't an [Array](#variant.Array) or if the
    /// provided index is out of bounds.
    fn index(&self, index: usize) -> &Value<'a> {
        match *self {
            Value::Array(ref values) => &values[index],
            _ => panic!("indexing a {} value", self.kind()),
        }
    }
}

impl<'a> fmt::Debug for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Bool(value) => value.fmt(f),
            Value::U8(value) => value.fmt(f),
            Value::U16(value) => value.fmt(f),
            Value::U32(value) => value.fmt(f),
            Value::U64(value) => value.fmt(f),
            Value::I8(value) => value.fmt(f),
            Value::I16(value) => value.fmt(f),
            Value::I32(value) => value.fmt(f),
            Value::I64(value) => value.fmt(f),
            Value::F32(value) => value.fmt(f),
            Value::F64(value) => value.fmt(f),
            Value::Str(ref value) => value.fmt(f),
            Value::Array(ref values) => values.fmt(f),

            Value::Object(name, ref fields) => {
                write!(f, "{} {{", name)?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl<'a> Serialize for Value<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Value::Bool(value) => serializer.serialize_bool(value),
            Value::U8(value) => serializer.serialize_u8(value),
            Value::U16(value) => serializer.serialize_u16(value),
            Value::U32(value) => serializer.serialize_u32(value),
            Value::U64(value) => serializer.serialize_u64(value),
            Value::I8(value) => serializer.serialize_i8(value),
            Value::I16(value) => serializer.serialize_i16(value),
            Value::I32(value) => serializer.serialize_i32(value),
            Value::I64(value) => serializer.serialize_i64(value),
            Value::F32(value) => serializer.serialize_f32(value),
            Value::F64(value) => serializer.serialize_f64(value),
            Value::Str(ref value) => serializer.serialize_str(value),
            Value::Array(ref values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Object(_, ref fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MAX_ARRAY_ELEMENTS;
    use crate::frame::encode_frame;

    fn point_schema() -> Schema {
        let f32_field = |name: &str| Field {
            name:       name.to_owned(),
            field_type: FieldType::Primitive(PrimitiveType::F32),
            optional:   false,
        };
        Schema::new(vec![
            Def::new("Point".to_owned(), vec![f32_field("x"), f32_field("y")]),
            Def::new(
                "Path".to_owned(),
                vec![
                    Field {
                        name:       "label".to_owned(),
                        field_type: FieldType::Primitive(PrimitiveType::Str),
                        optional:   false,
                    },
                    Field {
                        name:       "start".to_owned(),
                        field_type: FieldType::Struct(0),
                        optional:   true,
                    },
                    Field {
                        name:       "points".to_owned(),
                        field_type: FieldType::Array(Box::new(FieldType::Struct(0))),
                        optional:   false,
                    },
                ],
            ),
        ])
    }

    #[test]
    fn value_basic() {
        let value = Value::Array(vec![
            Value::Bool(true),
            Value::U8(255),
            Value::I32(-1),
            Value::U64(1),
            Value::F32(0.5),
            Value::Str("abc".to_owned()),
            Value::Object("Obj", vec![("key1", Value::Str("value1".to_owned()))]),
        ]);

        assert_eq!(value.len(), 7);
        assert_eq!(value[0].as_bool(), true);
        assert_eq!(value[1].as_u64(), 255);
        assert_eq!(value[2].as_i64(), -1);
        assert_eq!(value[3].as_u64(), 1);
        assert_eq!(value[4].as_f64(), 0.5);
        assert_eq!(value[5].as_str(), "abc");
        assert_eq!(value.get("key1"), None);
        assert_eq!(value[6].get("key1"), Some(&Value::Str("value1".to_owned())));

        assert_eq!(
            format!("{:?}", value),
            "[true, 255, -1, 1, 0.5, \"abc\", Obj {key1: \"value1\"}]"
        );
    }

    #[test]
    fn value_set_and_remove() {
        let mut value = Value::Object("Foo", vec![]);
        value.set("y", Value::I32(1));
        value.set("x", Value::I32(2));
        value.set("y", Value::I32(3));
        assert_eq!(format!("{:?}", value), "Foo {y: 3, x: 2}");

        value.remove("y");
        assert_eq!(value.get("y"), None);
        assert_eq!(value.get("x"), Some(&Value::I32(2)));
    }

    #[test]
    fn point_worked_example() {
        let schema = point_schema();
        let bytes = [0xC3, 0xF5, 0x48, 0x40, 0xA4, 0x70, 0x2D, 0x40];
        let value = Value::decode(&schema, 0, &bytes).unwrap();
        assert_eq!(format!("{:?}", value), "Point {x: 3.14, y: 2.71}");
        assert_eq!(value.encoded_size(&schema), Ok(8));
        assert_eq!(value.encode(&schema).unwrap(), bytes);
    }

    #[test]
    fn optional_and_nested() {
        let schema = point_schema();
        let point = |x: f32, y: f32| Value::Object("Point", vec![("x", Value::F32(x)), ("y", Value::F32(y))]);

        let without = Value::Object(
            "Path",
            vec![
                ("label", Value::Str("a".to_owned())),
                ("points", Value::Array(vec![point(1.0, 2.0)])),
            ],
        );
        let bytes = without.encode(&schema).unwrap();
        assert_eq!(bytes.len(), 4 + 1 + 1 + 4 + 8);
        assert_eq!(bytes[5], 0);
        assert_eq!(Value::decode(&schema, 1, &bytes).unwrap(), without);

        let mut with = without.clone();
        with.set("start", point(0.0, -0.5));
        let bytes = with.encode(&schema).unwrap();
        assert_eq!(&bytes[5..14], &[1, 0, 0, 0, 0, 0, 0, 0, 0xBF]);

        let decoded = Value::decode(&schema, 1, &bytes).unwrap();
        assert_eq!(decoded.get("start"), Some(&point(0.0, -0.5)));
    }

    #[test]
    fn encode_rejects_mismatches() {
        let schema = point_schema();
        let missing = Value::Object("Point", vec![("x", Value::F32(1.0))]);
        assert!(matches!(missing.encode(&schema), Err(WireError::SchemaMismatch(_))));

        let wrong_kind = Value::Object("Point", vec![("x", Value::F64(1.0)), ("y", Value::F32(1.0))]);
        assert!(matches!(wrong_kind.encode(&schema), Err(WireError::SchemaMismatch(_))));

        let extra = Value::Object(
            "Point",
            vec![("x", Value::F32(1.0)), ("y", Value::F32(1.0)), ("z", Value::F32(1.0))],
        );
        assert!(matches!(extra.encode(&schema), Err(WireError::SchemaMismatch(_))));

        assert!(matches!(Value::U8(1).encode(&schema), Err(WireError::SchemaMismatch(_))));
    }

    #[test]
    fn decode_errors() {
        let schema = point_schema();
        assert!(matches!(
            Value::decode(&schema, 0, &[0, 0, 0, 0, 0, 0, 0]),
            Err(WireError::UnexpectedEof { .. })
        ));

        let mut bytes = vec![0, 0, 0, 0, 0];
        bytes.extend_from_slice(&(MAX_ARRAY_ELEMENTS + 1).to_le_bytes());
        assert_eq!(
            Value::decode(&schema, 1, &bytes),
            Err(WireError::ArrayTooLarge { count: MAX_ARRAY_ELEMENTS + 1, max: MAX_ARRAY_ELEMENTS })
        );

        assert_eq!(
            Value::decode(&schema, 1, &[0, 0, 0, 0, 5]),
            Err(WireError::InvalidBool(5))
        );
    }

    #[test]
    fn framed_dispatch() {
        let schema = point_schema();
        let point = Value::Object("Point", vec![("x", Value::F32(1.0)), ("y", Value::F32(2.0))]);
        let framed = point.encode_message(&schema).unwrap();
        assert_eq!(&framed[..6], &[b'S', b'D', b'P', b'2', 1, 0]);
        assert_eq!(Value::decode_message(&schema, &framed).unwrap(), point);

        let unknown = encode_frame(99, &[]);
        assert_eq!(Value::decode_message(&schema, &unknown), Err(WireError::UnknownTypeId(99)));
        let zero = encode_frame(0, &[]);
        assert_eq!(Value::decode_message(&schema, &zero), Err(WireError::UnknownTypeId(0)));
    }
}
