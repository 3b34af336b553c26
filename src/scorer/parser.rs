use std::collections::HashSet;

use crate::scorer::error::ScorerParseError;
use crate::scorer::lexer::{Token, TokenKind, tokenize};

/// One module tuple exactly as the scorer printed it. `pvalue` is NaN when
/// the scorer reported `nan`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerRecord {
    pub module_index: i64,
    pub genes: Vec<String>,
    pub gene_pvalues: Vec<f64>,
    pub pvalue: f64,
    pub offset: usize,
}

/// Parses the complete scorer output. Records may stand alone one after
/// another or be wrapped in a single outer list; nothing else is accepted.
pub fn parse_records(input: &str) -> Result<Vec<ScorerRecord>, ScorerParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let records = parser.output()?;

    let mut seen = HashSet::new();
    for r in &records {
        if !seen.insert(r.module_index) {
            return Err(ScorerParseError::DuplicateIndex {
                offset: r.offset,
                index: r.module_index,
            });
        }
    }
    Ok(records)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek_kind(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self, expected: &'static str) -> Result<Token, ScorerParseError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ScorerParseError::UnexpectedEof { expected })?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<usize, ScorerParseError> {
        let tok = self.bump(expected)?;
        if tok.kind != kind {
            return Err(unexpected(&tok, expected));
        }
        Ok(tok.offset)
    }

    fn output(&mut self) -> Result<Vec<ScorerRecord>, ScorerParseError> {
        let mut records = Vec::new();
        if self.at_end() {
            return Ok(records);
        }

        let wrapped = matches!(
            (self.peek_kind(0), self.peek_kind(1)),
            (Some(TokenKind::LBracket), Some(TokenKind::LBracket | TokenKind::RBracket))
        );
        if wrapped {
            self.expect(TokenKind::LBracket, "'['")?;
            if self.peek_kind(0) == Some(&TokenKind::RBracket) {
                self.pos += 1;
            } else {
                loop {
                    records.push(self.record()?);
                    let tok = self.bump("',' or ']'")?;
                    match tok.kind {
                        TokenKind::Comma => continue,
                        TokenKind::RBracket => break,
                        _ => return Err(unexpected(&tok, "',' or ']'")),
                    }
                }
            }
        } else {
            while !self.at_end() {
                records.push(self.record()?);
            }
        }

        if let Some(tok) = self.tokens.get(self.pos) {
            return Err(unexpected(tok, "end of input"));
        }
        Ok(records)
    }

    // record := '[' index ',' genes ',' array ',' pvalue ']'
    fn record(&mut self) -> Result<ScorerRecord, ScorerParseError> {
        let offset = self.expect(TokenKind::LBracket, "'[' opening a module record")?;
        let module_index = self.index()?;
        self.expect(TokenKind::Comma, "',' after module index")?;
        let genes = self.gene_list()?;
        self.expect(TokenKind::Comma, "',' after gene list")?;
        let gene_pvalues = self.array()?;
        self.expect(TokenKind::Comma, "',' after gene p-value array")?;
        let (pvalue, pv_offset) = self.scalar("module p-value")?;
        if !pvalue.is_nan() && !(0.0..=1.0).contains(&pvalue) {
            return Err(ScorerParseError::PvalueOutOfRange {
                offset: pv_offset,
                value: pvalue,
            });
        }
        self.expect(TokenKind::RBracket, "']' closing a module record")?;

        Ok(ScorerRecord {
            module_index,
            genes,
            gene_pvalues,
            pvalue,
            offset,
        })
    }

    fn index(&mut self) -> Result<i64, ScorerParseError> {
        let tok = self.bump("module index")?;
        let raw = match &tok.kind {
            TokenKind::Str(s) | TokenKind::Number(s) => s.trim(),
            _ => return Err(unexpected(&tok, "module index")),
        };
        raw.parse::<i64>()
            .map_err(|_| ScorerParseError::InvalidIndex {
                offset: tok.offset,
                value: raw.to_string(),
            })
    }

    // genes := '[' (string (',' string)* ','?)? ']'  or the same in '(' ')'
    fn gene_list(&mut self) -> Result<Vec<String>, ScorerParseError> {
        let open = self.bump("gene list")?;
        let close = match open.kind {
            TokenKind::LBracket => TokenKind::RBracket,
            TokenKind::LParen => TokenKind::RParen,
            _ => return Err(unexpected(&open, "gene list")),
        };

        let mut genes = Vec::new();
        loop {
            let tok = self.bump("gene name or end of gene list")?;
            match &tok.kind {
                k if *k == close => break,
                TokenKind::Str(gene) => genes.push(gene.clone()),
                _ => return Err(unexpected(&tok, "quoted gene name")),
            }
            let sep = self.bump("',' or end of gene list")?;
            match &sep.kind {
                TokenKind::Comma => continue,
                k if *k == close => break,
                _ => return Err(unexpected(&sep, "',' or end of gene list")),
            }
        }
        Ok(genes)
    }

    // array := 'array' '(' '[' scalars ']' (',' 'dtype' '=' ident)? ')'
    fn array(&mut self) -> Result<Vec<f64>, ScorerParseError> {
        let tok = self.bump("array(...)")?;
        if tok.kind != TokenKind::Ident("array".to_string()) {
            return Err(unexpected(&tok, "array(...)"));
        }
        self.expect(TokenKind::LParen, "'(' after array")?;
        self.expect(TokenKind::LBracket, "'[' inside array(...)")?;

        let mut values = Vec::new();
        if self.peek_kind(0) == Some(&TokenKind::RBracket) {
            self.pos += 1;
        } else {
            loop {
                let (v, _) = self.scalar("array element")?;
                values.push(v);
                let sep = self.bump("',' or ']' in array")?;
                match sep.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RBracket => break,
                    _ => return Err(unexpected(&sep, "',' or ']' in array")),
                }
            }
        }

        if self.peek_kind(0) == Some(&TokenKind::Comma) {
            self.pos += 1;
            let kw = self.bump("dtype")?;
            if kw.kind != TokenKind::Ident("dtype".to_string()) {
                return Err(unexpected(&kw, "dtype"));
            }
            self.expect(TokenKind::Equals, "'=' after dtype")?;
            let ty = self.bump("dtype name")?;
            if !matches!(ty.kind, TokenKind::Ident(_)) {
                return Err(unexpected(&ty, "dtype name"));
            }
        }
        self.expect(TokenKind::RParen, "')' closing array(...)")?;
        Ok(values)
    }

    // scalar := number | 'nan' | 'inf' | ident '(' (number | 'nan' | 'inf') ')'
    fn scalar(&mut self, expected: &'static str) -> Result<(f64, usize), ScorerParseError> {
        let tok = self.bump(expected)?;
        match &tok.kind {
            TokenKind::Ident(_) if self.peek_kind(0) == Some(&TokenKind::LParen) => {
                self.pos += 1;
                let inner = self.bump(expected)?;
                let value = self.bare_scalar(&inner, expected)?;
                self.expect(TokenKind::RParen, "')' closing scalar wrapper")?;
                Ok(value)
            }
            _ => self.bare_scalar(&tok, expected),
        }
    }

    fn bare_scalar(
        &self,
        tok: &Token,
        expected: &'static str,
    ) -> Result<(f64, usize), ScorerParseError> {
        match &tok.kind {
            TokenKind::Number(raw) | TokenKind::Ident(raw) => {
                Ok((parse_float(raw, tok.offset)?, tok.offset))
            }
            _ => Err(unexpected(tok, expected)),
        }
    }
}

fn parse_float(raw: &str, offset: usize) -> Result<f64, ScorerParseError> {
    raw.parse::<f64>().map_err(|_| ScorerParseError::InvalidNumber {
        offset,
        value: raw.to_string(),
    })
}

fn unexpected(tok: &Token, expected: &'static str) -> ScorerParseError {
    ScorerParseError::Unexpected {
        offset: tok.offset,
        expected,
        found: tok.kind.describe(),
    }
}
