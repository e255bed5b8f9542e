use std::fmt::{Display, Formatter};

use chnative_error::{ChResult, ch_bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Name,
    Number,
    String,
    LPar,
    RPar,
    Comma,
    Assign,
    Eos,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Number => "number",
            Self::String => "string",
            Self::LPar => "'('",
            Self::RPar => "')'",
            Self::Comma => "','",
            Self::Assign => "'='",
            Self::Eos => "end of input",
        };
        f.write_str(name)
    }
}

/// A token borrowed from the input. String tokens exclude their quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub fn next_token(&mut self) -> ChResult<Token<'a>> {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        let start = self.pos;
        let Some(&c) = bytes.get(start) else {
            return Ok(self.token(TokenKind::Eos, start, start));
        };

        match c {
            b'(' => Ok(self.single(TokenKind::LPar)),
            b')' => Ok(self.single(TokenKind::RPar)),
            b',' => Ok(self.single(TokenKind::Comma)),
            b'=' => Ok(self.single(TokenKind::Assign)),
            b'\'' => {
                let Some(len) = self.input[start + 1..].find('\'') else {
                    ch_bail!(GrammarError: "unterminated string starting at offset {start}");
                };
                let end = start + 1 + len;
                self.pos = end + 1;
                Ok(self.token(TokenKind::String, start + 1, end))
            }
            b'-' | b'0'..=b'9' => {
                let mut end = start + usize::from(c == b'-');
                let digits = end;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end == digits {
                    ch_bail!(GrammarError: "expected digits after '-' at offset {start}");
                }
                self.pos = end;
                Ok(self.token(TokenKind::Number, start, end))
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let mut end = start + 1;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                {
                    end += 1;
                }
                self.pos = end;
                Ok(self.token(TokenKind::Name, start, end))
            }
            _ => {
                let unexpected = self.input[start..].chars().next().unwrap_or_default();
                ch_bail!(GrammarError: "unexpected character '{unexpected}' at offset {start}")
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.pos;
        self.pos += 1;
        self.token(kind, start, start + 1)
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.input[start..end],
            offset: start,
        }
    }
}
