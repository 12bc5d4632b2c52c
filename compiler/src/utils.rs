use crate::error::ParseError;

pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

pub fn error(msg: &str, line: usize, column: usize) -> ParseError {
    ParseError {
        msg: msg.to_string(),
        line,
        column,
    }
}

/// Converts a string to PascalCase.
/// - If the string contains underscores, it splits on underscores and
///   capitalizes the first letter of each word, lowercasing the rest.
/// - If the string is fully uppercase, only the first letter stays uppercase.
/// - Otherwise only the first letter is touched.
pub fn to_pascal_case(s: &str) -> String {
    fn capitalize(word: &str, lower_rest: bool) -> String {
        let mut chars = word.chars();
        match chars.next() {
            None => String::new(),
            Some(first) if lower_rest => first.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
            Some(first) => first.to_uppercase().to_string() + chars.as_str(),
        }
    }

    if s.contains('_') {
        s.split('_')
            .filter(|word| !word.is_empty())
            .map(|word| capitalize(word, true))
            .collect::<String>()
    } else {
        capitalize(s, s == s.to_uppercase())
    }
}

/// Converts a string to snake_case.
/// Runs of uppercase letters stay together so acronyms survive
/// (e.g. "sessionID" becomes "session_id").
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut snake = String::new();
    for i in 0..chars.len() {
        let c = chars[i];
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                if prev != '_'
                    && (!prev.is_uppercase() || (i + 1 < chars.len() && chars[i + 1].is_lowercase()))
                {
                    snake.push('_');
                }
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

#[test]
fn pascal_case() {
    assert_eq!(to_pascal_case("point"), "Point");
    assert_eq!(to_pascal_case("audio_unit"), "AudioUnit");
    assert_eq!(to_pascal_case("SIGNAL"), "Signal");
    assert_eq!(to_pascal_case("httpRequest"), "HttpRequest");
    assert_eq!(to_pascal_case("_inner"), "Inner");
}

#[test]
fn snake_case() {
    assert_eq!(to_snake_case("sessionID"), "session_id");
    assert_eq!(to_snake_case("maxValue"), "max_value");
    assert_eq!(to_snake_case("HTTPServer"), "http_server");
    assert_eq!(to_snake_case("already_snake"), "already_snake");
    assert_eq!(to_snake_case("Big_Name"), "big_name");
}

#[test]
fn quoting() {
    assert_eq!(quote("a\"b"), r#""a\"b""#);
}
