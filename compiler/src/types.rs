use brine_sdp_schema::PrimitiveType;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub structs: Vec<Struct>,
}

impl Schema {
    pub fn get(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Struct {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc:    Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:     String,
    pub line:     usize,
    pub column:   usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc:      Option<String>,
    #[serde(rename = "type")]
    pub type_:    TypeExpr,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum TypeExpr {
    Primitive(PrimitiveType),
    Named(String),
    Array(Box<TypeExpr>),
}

impl TypeExpr {
    /// The struct name this type ultimately refers to, looking through arrays.
    pub fn named(&self) -> Option<&str> {
        match self {
            TypeExpr::Primitive(_) => None,
            TypeExpr::Named(name) => Some(name),
            TypeExpr::Array(element) => element.named(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeExpr::Primitive(p) => write!(f, "{}", p),
            TypeExpr::Named(name) => write!(f, "{}", name),
            TypeExpr::Array(element) => write!(f, "[]{}", element),
        }
    }
}
