//! Words that cannot be used as struct or field names because some target
//! ecosystem reserves them. Matching is case-insensitive, so `Type`, `TYPE`
//! and `type` are all rejected.

use brine_sdp_schema::PrimitiveType;
use lazy_static::lazy_static;
use std::collections::HashMap;

const GO: &[&str] = &[
    "break", "default", "func", "interface", "select", "case", "defer", "go", "map", "struct",
    "chan", "else", "goto", "package", "switch", "const", "fallthrough", "if", "range", "type",
    "continue", "for", "import", "return", "var",
    "bool", "byte", "complex64", "complex128", "error", "float32", "float64", "int", "int8",
    "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "true", "false", "iota", "nil", "append", "cap", "close", "complex", "copy",
    "delete", "imag", "len", "make", "new", "panic", "print", "println", "real", "recover",
    "main", "init",
];

const RUST: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while",
    "abstract", "async", "await", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield", "union", "dyn", "raw",
    "Option", "Result", "Some", "None", "Ok", "Err", "String", "Vec", "Box", "Rc", "Arc",
    "Copy", "Clone", "Send", "Sync", "Sized",
];

const C: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
    "_Alignas", "_Alignof", "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary",
    "_Noreturn", "_Static_assert", "_Thread_local", "_BitInt", "_Decimal128", "_Decimal32",
    "_Decimal64",
    "bool", "true", "false", "NULL", "size_t", "ptrdiff_t", "wchar_t", "int8_t", "int16_t",
    "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "FILE", "EOF",
];

const CPP: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "bitand", "bitor", "catch", "char8_t",
    "char16_t", "char32_t", "class", "compl", "concept", "consteval", "constexpr", "constinit",
    "const_cast", "co_await", "co_return", "co_yield", "decltype", "delete", "dynamic_cast",
    "explicit", "export", "friend", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "reinterpret_cast",
    "requires", "static_assert", "static_cast", "template", "this", "thread_local", "throw",
    "try", "typeid", "typename", "using", "virtual", "wchar_t", "xor", "xor_eq",
    "std", "string", "vector", "optional",
];

const SWIFT: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "precedencegroup",
    "protocol", "public", "rethrows", "static", "struct", "subscript", "typealias", "var",
    "break", "case", "catch", "continue", "default", "defer", "do", "else", "fallthrough",
    "for", "guard", "if", "in", "repeat", "return", "switch", "throw", "where", "while",
    "as", "false", "is", "nil", "self", "Self", "super", "throws", "true", "try",
    "async", "await", "didSet", "get", "set", "willSet", "weak", "unowned", "_",
    "Any", "Type", "Protocol",
    "available", "objc", "nonobjc", "discardableResult", "dynamicCallable",
    "dynamicMemberLookup", "escaping", "autoclosure", "convention", "IBAction", "IBOutlet",
    "IBDesignable", "IBInspectable", "NSCopying", "NSManaged", "UIApplicationMain",
    "NSApplicationMain", "testable", "warn_unqualified_access", "frozen", "unknown",
    "dynamic", "final", "lazy", "optional", "required", "convenience", "override", "mutating",
    "nonmutating",
    "Int", "Int8", "Int16", "Int32", "Int64", "UInt", "UInt8", "UInt16", "UInt32", "UInt64",
    "Float", "Double", "Bool", "String", "Character", "Array", "Dictionary", "Set", "Optional",
    "Error", "Result",
];

/// Type names that generated Rust code imports from the runtime.
const RUNTIME: &[&str] = &[
    "ByteBuffer", "ByteBufferMut", "DecodeContext", "Limits", "Arena", "ArenaContext",
    "ArenaStr", "ArenaSlice", "ArenaList", "ArenaRecord", "ArrayView", "Message", "DecodeRef",
    "DecodeIn", "WireError", "AnyMessage", "FrameHeader",
];

lazy_static! {
    static ref RESERVED: HashMap<String, Vec<&'static str>> = {
        let mut map: HashMap<String, Vec<&'static str>> = HashMap::new();
        for (ecosystem, words) in [("Go", GO), ("Rust", RUST), ("C", C), ("C++", CPP), ("Swift", SWIFT)] {
            for word in words {
                let langs = map.entry(word.to_lowercase()).or_default();
                if !langs.contains(&ecosystem) {
                    langs.push(ecosystem);
                }
            }
        }
        map
    };

    static ref STRUCT_ONLY: HashMap<String, Vec<&'static str>> = {
        let mut map: HashMap<String, Vec<&'static str>> = HashMap::new();
        for primitive in PrimitiveType::ALL {
            map.entry(primitive.name().to_string()).or_default().push("schema");
        }
        for word in RUNTIME {
            map.entry(word.to_lowercase()).or_default().push("runtime");
        }
        map
    };
}

/// Ecosystems that reserve `word` as a field name. Empty when it is free.
pub fn reserved_in(word: &str) -> Vec<&'static str> {
    RESERVED.get(&word.to_lowercase()).cloned().unwrap_or_default()
}

/// Ecosystems that reserve `word` as a struct name. Struct names additionally
/// may not shadow a primitive or a runtime type.
pub fn reserved_struct_name_in(word: &str) -> Vec<&'static str> {
    let lower = word.to_lowercase();
    let mut langs = reserved_in(word);
    if let Some(extra) = STRUCT_ONLY.get(&lower) {
        langs.extend(extra.iter().copied());
    }
    langs
}

#[test]
fn case_insensitive() {
    assert_eq!(reserved_in("type"), vec!["Go", "Rust", "Swift"]);
    assert_eq!(reserved_in("TYPE"), reserved_in("type"));
    assert_eq!(reserved_in("Point"), Vec::<&str>::new());
}

#[test]
fn single_ecosystem_is_enough() {
    assert_eq!(reserved_in("guard"), vec!["Swift"]);
    assert_eq!(reserved_in("impl"), vec!["Rust"]);
    assert_eq!(reserved_in("namespace"), vec!["C++"]);
    assert_eq!(reserved_in("iota"), vec!["Go"]);
    assert_eq!(reserved_in("_Bool"), vec!["C"]);
}

#[test]
fn struct_names() {
    assert_eq!(reserved_struct_name_in("u8"), vec!["schema"]);
    assert_eq!(reserved_struct_name_in("Arena"), vec!["runtime"]);
    assert_eq!(reserved_in("Arena"), Vec::<&str>::new());
    assert_eq!(reserved_struct_name_in("Bool"), vec!["Go", "C", "Swift", "schema"]);
}
