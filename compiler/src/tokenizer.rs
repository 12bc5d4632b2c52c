use crate::error::ParseError;
use crate::utils::{error, quote};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref TOKEN_REGEX: Regex = Regex::new(r"(///[^\n]*|//[^\n]*|[\p{L}\p{N}_]+|[{}\[\]:,?]|\s+)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Struct,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Question,
    DocComment,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:   TokenKind,
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

impl Token {
    /// How the token reads in a diagnostic.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::DocComment => "doc comment".to_string(),
            _ => quote(&self.text),
        }
    }
}

fn classify(part: &str) -> Option<TokenKind> {
    let kind = match part {
        "struct" => TokenKind::Struct,
        "{" => TokenKind::LBrace,
        "}" => TokenKind::RBrace,
        "[" => TokenKind::LBracket,
        "]" => TokenKind::RBracket,
        ":" => TokenKind::Colon,
        "," => TokenKind::Comma,
        "?" => TokenKind::Question,
        _ if part.starts_with("///") => TokenKind::DocComment,
        _ if part.starts_with("//") => return None,
        _ if part.chars().all(char::is_whitespace) => return None,
        _ => TokenKind::Ident,
    };
    Some(kind)
}

/// Splits schema text into tokens, dropping whitespace and ordinary comments.
/// The last token is always [`TokenKind::Eof`].
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let part = mat.as_str();

        if start > last_end {
            let unexpected = text[last_end..start].chars().next().unwrap_or_default();
            return Err(error(
                &format!("Unexpected character {}", quote(&unexpected.to_string())),
                line,
                column,
            ));
        }

        if let Some(kind) = classify(part) {
            let text = match kind {
                TokenKind::DocComment => {
                    let body = part[3..].trim_end_matches('\r');
                    body.strip_prefix(' ').unwrap_or(body).to_string()
                }
                _ => part.to_string(),
            };
            tokens.push(Token { kind, text, line, column });
        }

        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.chars().count() + 1;
            }
        } else {
            column += part.chars().count();
        }

        last_end = mat.end();
    }

    if last_end != text.len() {
        let unexpected = text[last_end..].chars().next().unwrap_or_default();
        return Err(error(
            &format!("Unexpected character {}", quote(&unexpected.to_string())),
            line,
            column,
        ));
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        line,
        column,
    });
    Ok(tokens)
}
