use crate::{
    error::ParseError,
    tokenizer::{Token, TokenKind},
    types::{Field, Schema, Struct, TypeExpr},
    utils::error,
};
use brine_sdp_schema::PrimitiveType;

/// Builds a Schema from a token stream. Stops at the first syntax error.
pub fn parse_schema(tokens: &[Token]) -> Result<Schema, ParseError> {
    let mut structs = Vec::new();
    let mut index = 0;

    if tokens.is_empty() {
        return Ok(Schema::default());
    }

    fn current_token(tokens: &[Token], index: usize) -> &Token {
        &tokens[index.min(tokens.len() - 1)]
    }

    fn eat(tokens: &[Token], index: &mut usize, kind: TokenKind) -> bool {
        if current_token(tokens, *index).kind == kind {
            *index += 1;
            true
        } else {
            false
        }
    }

    fn expect<'t>(tokens: &'t [Token], index: &mut usize, kind: TokenKind, expected: &str) -> Result<&'t Token, ParseError> {
        let tok = current_token(tokens, *index);
        if !eat(tokens, index, kind) {
            return Err(error(
                &format!("Expected {} but found {}", expected, tok.describe()),
                tok.line,
                tok.column,
            ));
        }
        Ok(tok)
    }

    fn doc_comment(tokens: &[Token], index: &mut usize) -> Option<(String, usize, usize)> {
        let first = current_token(tokens, *index);
        let mut lines = Vec::new();
        while current_token(tokens, *index).kind == TokenKind::DocComment {
            lines.push(current_token(tokens, *index).text.as_str());
            *index += 1;
        }
        if lines.is_empty() {
            None
        } else {
            Some((lines.join("\n"), first.line, first.column))
        }
    }

    fn type_expr(tokens: &[Token], index: &mut usize) -> Result<TypeExpr, ParseError> {
        if eat(tokens, index, TokenKind::LBracket) {
            expect(tokens, index, TokenKind::RBracket, "\"]\"")?;
            return Ok(TypeExpr::Array(Box::new(type_expr(tokens, index)?)));
        }
        let tok = expect(tokens, index, TokenKind::Ident, "type")?;
        Ok(match PrimitiveType::from_name(&tok.text) {
            Some(primitive) => TypeExpr::Primitive(primitive),
            None => TypeExpr::Named(tok.text.clone()),
        })
    }

    loop {
        let doc = doc_comment(tokens, &mut index);
        if current_token(tokens, index).kind == TokenKind::Eof {
            if let Some((_, line, column)) = doc {
                return Err(error("Doc comment must be followed by a struct", line, column));
            }
            break;
        }

        expect(tokens, &mut index, TokenKind::Struct, "\"struct\"")?;
        let name_tok = expect(tokens, &mut index, TokenKind::Ident, "struct name")?;
        expect(tokens, &mut index, TokenKind::LBrace, "\"{\"")?;

        let mut fields = Vec::new();
        loop {
            let field_doc = doc_comment(tokens, &mut index);
            if current_token(tokens, index).kind == TokenKind::RBrace {
                if let Some((_, line, column)) = field_doc {
                    return Err(error("Doc comment must be followed by a field", line, column));
                }
                index += 1;
                break;
            }

            let f_tok = expect(tokens, &mut index, TokenKind::Ident, "field name")?;
            expect(tokens, &mut index, TokenKind::Colon, "\":\"")?;
            let optional = eat(tokens, &mut index, TokenKind::Question);
            let type_ = type_expr(tokens, &mut index)?;

            fields.push(Field {
                name: f_tok.text.clone(),
                line: f_tok.line,
                column: f_tok.column,
                doc: field_doc.map(|(text, _, _)| text),
                type_,
                optional,
            });

            if !eat(tokens, &mut index, TokenKind::Comma) {
                expect(tokens, &mut index, TokenKind::RBrace, "\",\" or \"}\"")?;
                break;
            }
        }

        structs.push(Struct {
            name: name_tok.text.clone(),
            line: name_tok.line,
            column: name_tok.column,
            doc: doc.map(|(text, _, _)| text),
            fields,
        });
    }

    Ok(Schema { structs })
}
