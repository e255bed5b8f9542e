use std::fmt::{Display, Formatter};

/// The category of a [`TypeAst`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstMeta {
    /// A named type, possibly with literal arguments (`Int8`, `FixedString(16)`).
    Terminal,
    /// An integer literal argument.
    Number,
    /// A quoted string argument.
    String,
    /// `Array(T)`.
    Array,
    /// `Nullable(T)`.
    Nullable,
    /// `Tuple(T, ...)`.
    Tuple,
    /// `Enum8(...)` or `Enum16(...)`.
    Enum,
    /// A `'name' = value` enum item.
    Assign,
}

impl Display for AstMeta {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Terminal => "type",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Nullable => "nullable",
            Self::Tuple => "tuple",
            Self::Enum => "enum",
            Self::Assign => "enum item",
        };
        f.write_str(name)
    }
}

/// A parsed type name, before it is lowered into a [`DType`](crate::DType).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAst {
    /// The node's category.
    pub meta: AstMeta,
    /// The type name for type nodes; empty for literals.
    pub name: String,
    /// The integer of a `Number` node or the value of an `Assign` node.
    pub value: Option<i64>,
    /// The text of a `String` node or the name of an `Assign` node.
    pub value_string: Option<String>,
    /// Type arguments, literal arguments and enum items, in source order.
    pub elements: Vec<TypeAst>,
}

impl TypeAst {
    /// A type node with the given arguments.
    pub fn node(meta: AstMeta, name: impl Into<String>, elements: Vec<TypeAst>) -> Self {
        Self {
            meta,
            name: name.into(),
            value: None,
            value_string: None,
            elements,
        }
    }

    /// A type without arguments.
    pub fn terminal(name: impl Into<String>) -> Self {
        Self::node(AstMeta::Terminal, name, Vec::new())
    }

    /// An integer literal.
    pub fn number(value: i64) -> Self {
        Self {
            value: Some(value),
            ..Self::node(AstMeta::Number, String::new(), Vec::new())
        }
    }

    /// A string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value_string: Some(value.into()),
            ..Self::node(AstMeta::String, String::new(), Vec::new())
        }
    }

    /// A `'name' = value` enum item.
    pub fn assign(name: impl Into<String>, value: i64) -> Self {
        Self {
            value: Some(value),
            value_string: Some(name.into()),
            ..Self::node(AstMeta::Assign, String::new(), Vec::new())
        }
    }

    /// Whether the node denotes a type rather than a literal or enum item.
    pub fn is_type(&self) -> bool {
        matches!(
            self.meta,
            AstMeta::Terminal | AstMeta::Array | AstMeta::Nullable | AstMeta::Tuple | AstMeta::Enum
        )
    }
}
