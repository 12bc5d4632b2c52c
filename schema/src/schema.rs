//! The runtime schema model.
//!
//! This is the validated, resolved form of a schema that the dynamic
//! [`Value`](crate::Value) codec walks. Named references are already resolved
//! to indices into [`Schema::defs`], so nothing here needs a name lookup on the
//! hot path.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// The twelve built-in field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Str,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 12] = [
        PrimitiveType::U8,
        PrimitiveType::U16,
        PrimitiveType::U32,
        PrimitiveType::U64,
        PrimitiveType::I8,
        PrimitiveType::I16,
        PrimitiveType::I32,
        PrimitiveType::I64,
        PrimitiveType::F32,
        PrimitiveType::F64,
        PrimitiveType::Bool,
        PrimitiveType::Str,
    ];

    /// Looks up a primitive by its schema spelling. Case-sensitive.
    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        PrimitiveType::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::I8 => "i8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Str => "str",
        }
    }

    /// Encoded width in bytes, or `None` for the variable-length `str`.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            PrimitiveType::U8 | PrimitiveType::I8 | PrimitiveType::Bool => Some(1),
            PrimitiveType::U16 | PrimitiveType::I16 => Some(2),
            PrimitiveType::U32 | PrimitiveType::I32 | PrimitiveType::F32 => Some(4),
            PrimitiveType::U64 | PrimitiveType::I64 | PrimitiveType::F64 => Some(8),
            PrimitiveType::Str => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Primitive(PrimitiveType),
    /// Index into [`Schema::defs`].
    Struct(usize),
    Array(Box<FieldType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name:       String,
    pub field_type: FieldType,
    /// Only ever set on [`FieldType::Struct`] fields.
    pub optional:   bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Def {
    pub name:   String,
    pub fields: Vec<Field>,
}

impl Def {
    pub fn new(name: String, fields: Vec<Field>) -> Def {
        Def { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Structs in declaration order. The position of a def is its index; the
/// framing type id is that index plus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub defs:              Vec<Def>,
    pub def_name_to_index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(defs: Vec<Def>) -> Schema {
        let mut def_name_to_index = HashMap::new();
        for (i, def) in defs.iter().enumerate() {
            def_name_to_index.entry(def.name.clone()).or_insert(i);
        }
        Schema { defs, def_name_to_index }
    }

    pub fn def(&self, name: &str) -> Option<&Def> {
        self.def_name_to_index.get(name).map(|&i| &self.defs[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.def_name_to_index.get(name).copied()
    }

    /// The framing type id of `name`.
    pub fn type_id_of(&self, name: &str) -> Option<u16> {
        self.index_of(name).map(|i| (i + 1) as u16)
    }

    /// Resolves a framing type id back to a def index.
    pub fn index_of_type_id(&self, type_id: u16) -> Option<usize> {
        let index = (type_id as usize).checked_sub(1)?;
        if index < self.defs.len() {
            Some(index)
        } else {
            None
        }
    }
}

#[test]
fn primitive_names() {
    for p in PrimitiveType::ALL {
        assert_eq!(PrimitiveType::from_name(p.name()), Some(p));
    }
    assert_eq!(PrimitiveType::from_name("U8"), None);
    assert_eq!(PrimitiveType::from_name("string"), None);
    assert_eq!(PrimitiveType::Str.fixed_size(), None);
    assert_eq!(PrimitiveType::F64.fixed_size(), Some(8));
}

#[test]
fn type_ids_follow_declaration_order() {
    let schema = Schema::new(vec![
        Def::new("A".to_owned(), vec![]),
        Def::new("B".to_owned(), vec![]),
    ]);
    assert_eq!(schema.type_id_of("A"), Some(1));
    assert_eq!(schema.type_id_of("B"), Some(2));
    assert_eq!(schema.index_of_type_id(2), Some(1));
    assert_eq!(schema.index_of_type_id(0), None);
    assert_eq!(schema.index_of_type_id(3), None);
}
