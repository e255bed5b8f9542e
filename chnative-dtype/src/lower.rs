use std::sync::Arc;

use chnative_error::{ChError, ChResult, ch_bail, ch_err};

use crate::ast::{AstMeta, TypeAst};
use crate::decimal::{DECIMAL32_PRECISION, DECIMAL64_PRECISION, DECIMAL128_PRECISION};
use crate::{DType, DecimalDType, EnumDType, EnumItem, TypeParser, TypeRef};

/// Largest sub-second precision of a `DateTime64`.
pub const MAX_DATETIME64_PRECISION: u8 = 9;

/// Parse and lower a type name in one step.
///
/// ```
/// use chnative_dtype::parse_type_name;
///
/// let dtype = parse_type_name("Nullable(Decimal(10, 2))").unwrap();
/// assert_eq!(dtype.to_string(), "Nullable(Decimal(10,2))");
/// ```
pub fn parse_type_name(name: &str) -> ChResult<TypeRef> {
    Ok(Arc::new(lower(&parse_type_ast(name)?)?))
}

/// Parse a type name into its syntax tree without lowering it.
pub fn parse_type_ast(name: &str) -> ChResult<TypeAst> {
    TypeParser::new(name).parse()
}

/// Build the type a syntax tree describes, children first.
///
/// Fails with a grammar error for unknown names and for arguments outside the range the named
/// type accepts.
pub fn lower(ast: &TypeAst) -> ChResult<DType> {
    match ast.meta {
        AstMeta::Array => Ok(DType::array(lower_single(ast)?)),
        AstMeta::Nullable => Ok(DType::nullable(lower_single(ast)?)),
        AstMeta::Tuple => {
            if ast.elements.is_empty() {
                ch_bail!(GrammarError: "Tuple requires at least one item type");
            }
            DType::try_tuple(
                ast.elements
                    .iter()
                    .map(|e| lower(e).map(Arc::new))
                    .collect::<ChResult<Vec<_>>>()?,
            )
        }
        AstMeta::Enum => lower_enum(ast),
        AstMeta::Terminal => lower_terminal(ast),
        AstMeta::Number | AstMeta::String | AstMeta::Assign => {
            ch_bail!(GrammarError: "a {} is not a type", ast.meta)
        }
    }
}

impl TryFrom<&TypeAst> for DType {
    type Error = ChError;

    fn try_from(ast: &TypeAst) -> Result<Self, Self::Error> {
        lower(ast)
    }
}

fn lower_single(ast: &TypeAst) -> ChResult<TypeRef> {
    match ast.elements.as_slice() {
        [item] => Ok(Arc::new(lower(item)?)),
        _ => ch_bail!(
            GrammarError: "{} takes exactly one type argument, got {}",
            ast.name,
            ast.elements.len()
        ),
    }
}

fn lower_enum(ast: &TypeAst) -> ChResult<DType> {
    let (min, max) = match ast.name.as_str() {
        "Enum8" => (i64::from(i8::MIN), i64::from(i8::MAX)),
        "Enum16" => (i64::from(i16::MIN), i64::from(i16::MAX)),
        other => ch_bail!(GrammarError: "unknown enum type '{other}'"),
    };
    if ast.elements.is_empty() {
        ch_bail!(GrammarError: "{} requires at least one item", ast.name);
    }

    let items = ast
        .elements
        .iter()
        .map(|e| match (e.meta, &e.value_string, e.value) {
            (AstMeta::Assign, Some(name), Some(value)) if (min..=max).contains(&value) => {
                Ok(EnumItem::new(name.as_str(), value as i16))
            }
            (AstMeta::Assign, Some(name), Some(value)) => Err(ch_err!(
                GrammarError: "{} value {value} for '{name}' outside of {min}..={max}",
                ast.name
            )),
            _ => Err(ch_err!(GrammarError: "{} items must be 'name' = value", ast.name)),
        })
        .collect::<ChResult<Vec<_>>>()?;

    let items = Arc::new(EnumDType::new(items));
    Ok(if ast.name == "Enum8" {
        DType::Enum8(items)
    } else {
        DType::Enum16(items)
    })
}

fn lower_terminal(ast: &TypeAst) -> ChResult<DType> {
    if ast.elements.is_empty() {
        return primitive(&ast.name)
            .ok_or_else(|| ch_err!(GrammarError: "unknown type name '{}'", ast.name));
    }

    let args = ast.elements.as_slice();
    match ast.name.as_str() {
        "FixedString" => {
            let width = number_arg(ast, 0)?;
            usize::try_from(width)
                .map(DType::FixedString)
                .map_err(|_| ch_err!(GrammarError: "invalid FixedString width {width}"))
        }
        "DateTime" => Ok(DType::DateTime(Some(string_arg(ast, 0)?.into()))),
        "DateTime64" => {
            let precision = small_arg(ast, 0)?;
            if precision > MAX_DATETIME64_PRECISION {
                ch_bail!(
                    GrammarError: "DateTime64 precision {precision} exceeds {}",
                    MAX_DATETIME64_PRECISION
                );
            }
            let tz = match args.len() {
                1 => None,
                _ => Some(string_arg(ast, 1)?.into()),
            };
            Ok(DType::DateTime64(precision, tz))
        }
        "Decimal" => {
            let precision = small_arg(ast, 0)?;
            let scale = match args.len() {
                1 => 0,
                _ => small_arg(ast, 1)?,
            };
            decimal(&ast.name, precision, scale).map(DType::Decimal)
        }
        "Decimal32" => {
            decimal(&ast.name, DECIMAL32_PRECISION, small_arg(ast, 0)?).map(DType::Decimal32)
        }
        "Decimal64" => {
            decimal(&ast.name, DECIMAL64_PRECISION, small_arg(ast, 0)?).map(DType::Decimal64)
        }
        "Decimal128" => {
            decimal(&ast.name, DECIMAL128_PRECISION, small_arg(ast, 0)?).map(DType::Decimal128)
        }
        name if primitive(name).is_some() => {
            ch_bail!(GrammarError: "type {name} takes no arguments")
        }
        name => ch_bail!(GrammarError: "unknown type name '{name}'"),
    }
}

fn primitive(name: &str) -> Option<DType> {
    Some(match name {
        "Void" | "Nothing" => DType::Void,
        "Int8" => DType::Int8,
        "Int16" => DType::Int16,
        "Int32" => DType::Int32,
        "Int64" => DType::Int64,
        "Int128" => DType::Int128,
        "UInt8" => DType::UInt8,
        "UInt16" => DType::UInt16,
        "UInt32" => DType::UInt32,
        "UInt64" => DType::UInt64,
        "Float32" => DType::Float32,
        "Float64" => DType::Float64,
        "String" => DType::String,
        "UUID" => DType::Uuid,
        "IPv4" => DType::IPv4,
        "IPv6" => DType::IPv6,
        "Date" => DType::Date,
        "DateTime" => DType::DateTime(None),
        _ => return None,
    })
}

fn decimal(name: &str, precision: u8, scale: u8) -> ChResult<DecimalDType> {
    DecimalDType::try_new(precision, scale)
        .map_err(|e| ch_err!(GrammarError: "invalid {name} parameters: {e}"))
}

fn number_arg(ast: &TypeAst, idx: usize) -> ChResult<i64> {
    match ast.elements.get(idx) {
        Some(TypeAst {
            meta: AstMeta::Number,
            value: Some(value),
            ..
        }) => Ok(*value),
        _ => ch_bail!(
            GrammarError: "argument {} of {} must be a number",
            idx + 1,
            ast.name
        ),
    }
}

fn small_arg(ast: &TypeAst, idx: usize) -> ChResult<u8> {
    let value = number_arg(ast, idx)?;
    u8::try_from(value).map_err(|_| {
        ch_err!(GrammarError: "argument {} of {} out of range: {value}", idx + 1, ast.name)
    })
}

fn string_arg(ast: &TypeAst, idx: usize) -> ChResult<&str> {
    match ast.elements.get(idx) {
        Some(TypeAst {
            meta: AstMeta::String,
            value_string: Some(value),
            ..
        }) => Ok(value),
        _ => ch_bail!(
            GrammarError: "argument {} of {} must be a quoted string",
            idx + 1,
            ast.name
        ),
    }
}
