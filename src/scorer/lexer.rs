use crate::scorer::error::ScorerParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Equals,
    Str(String),
    /// Raw numeric text, validated by the parser.
    Number(String),
    Ident(String),
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Str(s) => format!("string {:?}", s),
            TokenKind::Number(s) => format!("number {}", s),
            TokenKind::Ident(s) => format!("identifier {}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Splits scorer output into tokens. Whitespace, newlines included, only
/// separates tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ScorerParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let kind = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'[' => {
                i += 1;
                TokenKind::LBracket
            }
            b']' => {
                i += 1;
                TokenKind::RBracket
            }
            b'(' => {
                i += 1;
                TokenKind::LParen
            }
            b')' => {
                i += 1;
                TokenKind::RParen
            }
            b',' => {
                i += 1;
                TokenKind::Comma
            }
            b'=' => {
                i += 1;
                TokenKind::Equals
            }
            b'\'' | b'"' => {
                let (s, next) = read_string(input, start)?;
                i = next;
                TokenKind::Str(s)
            }
            b'0'..=b'9' | b'-' | b'+' | b'.' => {
                i += 1;
                while i < bytes.len() && is_number_byte(bytes[i]) {
                    i += 1;
                }
                TokenKind::Number(input[start..i].to_string())
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                i += 1;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.')
                {
                    i += 1;
                }
                TokenKind::Ident(input[start..i].to_string())
            }
            _ => {
                let found = input[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(ScorerParseError::UnexpectedChar {
                    offset: start,
                    found,
                });
            }
        };
        tokens.push(Token {
            kind,
            offset: start,
        });
    }

    Ok(tokens)
}

// Letters are allowed so that `-inf`, `1e-05` and `-nan` stay one token.
fn is_number_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'+'
}

fn read_string(input: &str, start: usize) -> Result<(String, usize), ScorerParseError> {
    let mut chars = input[start..].char_indices();
    let (_, quote) = chars
        .next()
        .ok_or(ScorerParseError::UnterminatedString { offset: start })?;
    let mut out = String::new();
    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or(ScorerParseError::UnterminatedString { offset: start })?;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
            '\n' => return Err(ScorerParseError::UnterminatedString { offset: start }),
            c if c == quote => return Ok((out, start + pos + c.len_utf8())),
            c => out.push(c),
        }
    }
    Err(ScorerParseError::UnterminatedString { offset: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokens_span_newlines() {
        assert_eq!(
            kinds("array([0.1,\n       nan])"),
            vec![
                TokenKind::Ident("array".to_string()),
                TokenKind::LParen,
                TokenKind::LBracket,
                TokenKind::Number("0.1".to_string()),
                TokenKind::Comma,
                TokenKind::Ident("nan".to_string()),
                TokenKind::RBracket,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn quoted_strings_both_styles() {
        assert_eq!(
            kinds(r#"'a' "b\"c""#),
            vec![
                TokenKind::Str("a".to_string()),
                TokenKind::Str("b\"c".to_string())
            ]
        );
    }

    #[test]
    fn exponent_stays_one_token() {
        assert_eq!(kinds("1.5e-05"), vec![TokenKind::Number("1.5e-05".to_string())]);
    }

    #[test]
    fn unterminated_string_reports_start() {
        assert_eq!(
            tokenize("['5, 'x']").unwrap_err(),
            ScorerParseError::UnterminatedString { offset: 7 }
        );
    }

    #[test]
    fn stray_character_is_rejected() {
        assert_eq!(
            tokenize("[1; 2]").unwrap_err(),
            ScorerParseError::UnexpectedChar {
                offset: 2,
                found: ';'
            }
        );
    }
}
