use chnative_error::{ChResult, ch_bail, ch_err};
use itertools::Itertools;

use crate::ast::{AstMeta, TypeAst};
use crate::lexer::{Lexer, Token, TokenKind};

/// Limits applied while parsing a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// The deepest nesting of parenthesized argument lists accepted.
    pub max_depth: usize,
}

impl ParseOptions {
    /// The default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 64;
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// A recursive-descent parser turning a type name into a [`TypeAst`].
///
/// A parser is single-use: [`TypeParser::parse`] consumes it. Either the whole input is a
/// well-formed type and its tree is returned, or a [`GrammarError`](chnative_error::ChError)
/// is, with no partial tree.
///
/// ```
/// use chnative_dtype::{AstMeta, TypeParser};
///
/// let ast = TypeParser::new("Array(Nullable(FixedString(16)))").parse().unwrap();
/// assert_eq!(ast.meta, AstMeta::Array);
/// assert_eq!(ast.elements[0].meta, AstMeta::Nullable);
/// ```
pub struct TypeParser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    options: ParseOptions,
    depth: usize,
}

impl<'a> TypeParser<'a> {
    /// A parser over `input` with the default options.
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    /// A parser over `input` with the given options.
    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            options,
            depth: 0,
        }
    }

    /// Parse the whole input as a single type.
    pub fn parse(mut self) -> ChResult<TypeAst> {
        let ast = self.parse_type()?;
        let token = self.next()?;
        if token.kind != TokenKind::Eos {
            ch_bail!(
                GrammarError: "unexpected {} '{}' after the type at offset {}",
                token.kind,
                token.text,
                token.offset
            );
        }
        Ok(ast)
    }

    fn peek(&mut self) -> ChResult<Token<'a>> {
        match self.peeked {
            Some(token) => Ok(token),
            None => {
                let token = self.lexer.next_token()?;
                self.peeked = Some(token);
                Ok(token)
            }
        }
    }

    fn next(&mut self) -> ChResult<Token<'a>> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ChResult<Token<'a>> {
        let token = self.next()?;
        if token.kind != kind {
            ch_bail!(
                GrammarError: "expected {kind} but found {} at offset {}",
                token.kind,
                token.offset
            );
        }
        Ok(token)
    }

    fn parse_type(&mut self) -> ChResult<TypeAst> {
        let name = self.expect(TokenKind::Name)?;
        let meta = meta_of(name.text);

        if self.peek()?.kind != TokenKind::LPar {
            if meta != AstMeta::Terminal {
                ch_bail!(
                    GrammarError: "{} requires an argument list at offset {}",
                    name.text,
                    name.offset
                );
            }
            return Ok(TypeAst::terminal(name.text));
        }
        self.next()?;

        self.depth += 1;
        if self.depth > self.options.max_depth {
            ch_bail!(
                GrammarError: "type nested deeper than {} levels at offset {}",
                self.options.max_depth,
                name.offset
            );
        }

        let mut elements = vec![self.parse_arg()?];
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Comma => elements.push(self.parse_arg()?),
                TokenKind::RPar => break,
                _ => ch_bail!(
                    GrammarError: "expected ',' or ')' but found {} at offset {}",
                    token.kind,
                    token.offset
                ),
            }
        }
        self.depth -= 1;

        let ast = TypeAst::node(meta, name.text, elements);
        check_arguments(&ast)?;
        Ok(ast)
    }

    fn parse_arg(&mut self) -> ChResult<TypeAst> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Name => self.parse_type(),
            TokenKind::Number => {
                self.next()?;
                Ok(TypeAst::number(parse_number(token)?))
            }
            TokenKind::String => {
                self.next()?;
                if self.peek()?.kind != TokenKind::Assign {
                    return Ok(TypeAst::string(token.text));
                }
                self.next()?;
                let value = self.expect(TokenKind::Number)?;
                Ok(TypeAst::assign(token.text, parse_number(value)?))
            }
            _ => ch_bail!(
                GrammarError: "expected a type, number or string but found {} at offset {}",
                token.kind,
                token.offset
            ),
        }
    }
}

fn meta_of(name: &str) -> AstMeta {
    match name {
        "Array" => AstMeta::Array,
        "Nullable" => AstMeta::Nullable,
        "Tuple" => AstMeta::Tuple,
        "Enum8" | "Enum16" => AstMeta::Enum,
        _ => AstMeta::Terminal,
    }
}

fn parse_number(token: Token<'_>) -> ChResult<i64> {
    token.text.parse::<i64>().map_err(|_| {
        ch_err!(
            GrammarError: "number '{}' at offset {} is out of range",
            token.text,
            token.offset
        )
    })
}

/// Checks the kind and count of the arguments of a parenthesized type.
fn check_arguments(ast: &TypeAst) -> ChResult<()> {
    let kinds = ast.elements.iter().map(|e| e.meta).collect::<Vec<_>>();
    let is_type = |i: usize| ast.elements[i].is_type();

    let valid = match ast.meta {
        AstMeta::Array | AstMeta::Nullable => kinds.len() == 1 && is_type(0),
        AstMeta::Tuple => (0..kinds.len()).all(is_type),
        AstMeta::Enum => kinds.iter().all(|k| *k == AstMeta::Assign),
        _ => match ast.name.as_str() {
            "FixedString" | "Decimal32" | "Decimal64" | "Decimal128" => {
                kinds == [AstMeta::Number]
            }
            "DateTime" => kinds == [AstMeta::String],
            "DateTime64" => {
                kinds == [AstMeta::Number] || kinds == [AstMeta::Number, AstMeta::String]
            }
            "Decimal" => {
                kinds == [AstMeta::Number] || kinds == [AstMeta::Number, AstMeta::Number]
            }
            // Unknown names are rejected when lowering.
            _ => true,
        },
    };

    if !valid {
        ch_bail!(
            GrammarError: "invalid arguments for {}: ({})",
            ast.name,
            kinds.iter().join(", ")
        );
    }
    Ok(())
}
