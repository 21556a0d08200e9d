//! Query abstract syntax tree.
//!
//! The tree is built once per parse and never mutated afterwards. Every node
//! owns its children. [`Expr::canonical`] renders any tree to a parenthesized
//! prefix string used for golden testing and debugging.

use std::{fmt, str::FromStr};

use serde::Serialize;

/// Root of a parsed query. Empty for an empty query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Expr {
    /// The top-level disjunction, absent for an empty query.
    pub root: Option<OrExpr>,
}

/// One or more [`AndExpr`]s combined with OR, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrExpr {
    /// Operands; never empty.
    operands: Vec<AndExpr>,
}

/// One or more [`Primary`] expressions combined with AND, in source order.
///
/// Explicit `AND` and plain juxtaposition produce the same node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AndExpr {
    /// Operands; never empty.
    operands: Vec<Primary>,
}

/// The smallest unit combinable by AND and OR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primary {
    /// Negation of the nested primary.
    Not {
        /// The negated expression.
        inner: Box<Self>,
    },
    /// A parenthesized sub-expression.
    Group {
        /// The enclosed expression.
        inner: Box<Expr>,
    },
    /// A `field op value` test.
    Comparison(Comparison),
    /// A standalone value with no operator.
    Bare {
        /// The value itself.
        value: Value,
    },
}

/// A field test such as `age > 20`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// The field being tested.
    pub field: Identifier,
    /// The comparison operator.
    pub op: CompareOp,
    /// The value the field is compared against.
    pub value: Value,
}

/// A dot-separated field path such as `user.address.city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier {
    /// Path segments; at least one, none of them empty.
    segments: Vec<String>,
}

/// The right-hand side of a comparison, or a bare value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// A quoted string, unescaped and without quotes.
    String(String),
    /// An unquoted scalar such as `20`, `-10.7` or `*bar`.
    Scalar(String),
    /// A bare identifier used as a value.
    FieldRef(Identifier),
}

/// Comparison operators. The lexical `:` is an alias for [`CompareOp::Eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `<=`
    Le,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `=`
    Eq,
    /// `~`
    Match,
    /// `!=`
    Ne,
    /// `!~`
    NotMatch,
}

impl Expr {
    /// Creates a non-empty expression.
    pub fn new(root: OrExpr) -> Self {
        Self { root: Some(root) }
    }

    /// Returns true for the expression of an empty query.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Renders the expression as a canonical S-expression.
    ///
    /// The empty expression renders as the empty string. Comparison values
    /// are always quoted: `(= name "Bob")`. Bare values keep their lexical
    /// form, so a bare string stays quoted (`(value "two words")`) while bare
    /// scalars and field paths do not (`(value 42)`, `(value user.name)`).
    pub fn canonical(&self) -> String {
        self.root.as_ref().map(OrExpr::canonical).unwrap_or_default()
    }

    /// Formats the expression as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match &self.root {
            Some(or) => or.fmt_tree(f, indent),
            None => writeln!(f, "{}Empty", "  ".repeat(indent)),
        }
    }
}

impl OrExpr {
    /// Starts a disjunction with its first operand.
    pub fn new(first: AndExpr) -> Self {
        Self {
            operands: vec![first],
        }
    }

    /// Appends an operand.
    pub fn push(&mut self, operand: AndExpr) {
        self.operands.push(operand);
    }

    /// Returns the operands in source order.
    pub fn operands(&self) -> &[AndExpr] {
        &self.operands
    }

    /// Renders `(or ...)`, or the lone operand's rendering.
    pub fn canonical(&self) -> String {
        render_list("or", self.operands.iter().map(AndExpr::canonical))
    }

    /// Formats the node as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        if let [only] = self.operands.as_slice() {
            return only.fmt_tree(f, indent);
        }
        writeln!(f, "{}Or", "  ".repeat(indent))?;
        for operand in &self.operands {
            operand.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }
}

impl AndExpr {
    /// Starts a conjunction with its first operand.
    pub fn new(first: Primary) -> Self {
        Self {
            operands: vec![first],
        }
    }

    /// Appends an operand.
    pub fn push(&mut self, operand: Primary) {
        self.operands.push(operand);
    }

    /// Returns the operands in source order.
    pub fn operands(&self) -> &[Primary] {
        &self.operands
    }

    /// Renders `(and ...)`, or the lone operand's rendering.
    pub fn canonical(&self) -> String {
        render_list("and", self.operands.iter().map(Primary::canonical))
    }

    /// Formats the node as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        if let [only] = self.operands.as_slice() {
            return only.fmt_tree(f, indent);
        }
        writeln!(f, "{}And", "  ".repeat(indent))?;
        for operand in &self.operands {
            operand.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }
}

impl Primary {
    /// Wraps a primary in a negation.
    pub fn not(inner: Self) -> Self {
        Self::Not {
            inner: Box::new(inner),
        }
    }

    /// Wraps an expression in a group.
    pub fn group(inner: Expr) -> Self {
        Self::Group {
            inner: Box::new(inner),
        }
    }

    /// Renders the primary as a canonical S-expression.
    ///
    /// Groups are transparent: `(a)` renders like `a`.
    pub fn canonical(&self) -> String {
        match self {
            Self::Not { inner } => format!("(NOT {})", inner.canonical()),
            Self::Group { inner } => inner.canonical(),
            Self::Comparison(cmp) => cmp.canonical(),
            Self::Bare { value } => format!("(value {})", value.bare_text()),
        }
    }

    /// Formats the node as an indented tree.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Not { inner } => {
                writeln!(f, "{prefix}Not")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::Group { inner } => {
                writeln!(f, "{prefix}Group")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::Comparison(cmp) => writeln!(
                f,
                "{prefix}Comparison({} {} {})",
                cmp.field,
                cmp.op,
                quote(&cmp.value.text())
            ),
            Self::Bare { value } => writeln!(f, "{prefix}Bare({})", value.bare_text()),
        }
    }
}

impl Comparison {
    /// Renders `(OP field "value")`.
    pub fn canonical(&self) -> String {
        format!("({} {} {})", self.op, self.field, quote(&self.value.text()))
    }
}

impl Identifier {
    /// Builds an identifier from a dotted path.
    ///
    /// Returns `None` when any segment is empty, as in `a..b`, `.a` or `a.`.
    pub fn from_path(path: &str) -> Option<Self> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self { segments })
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the segments joined with `.`.
    pub fn path(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Value {
    /// Returns the value's text as written (strings unescaped, no quotes).
    pub fn text(&self) -> String {
        match self {
            Self::String(s) | Self::Scalar(s) => s.clone(),
            Self::FieldRef(ident) => ident.path(),
        }
    }

    /// Text used when the value stands alone: strings stay quoted so they
    /// are distinguishable from identifiers.
    fn bare_text(&self) -> String {
        match self {
            Self::String(s) => quote(s),
            Self::Scalar(s) => s.clone(),
            Self::FieldRef(ident) => ident.path(),
        }
    }
}

impl CompareOp {
    /// Every operator, in grammar order.
    pub const ALL: [Self; 8] = [
        Self::Le,
        Self::Lt,
        Self::Gt,
        Self::Ge,
        Self::Eq,
        Self::Match,
        Self::Ne,
        Self::NotMatch,
    ];

    /// Returns the operator symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Le => "<=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
            Self::Match => "~",
            Self::Ne => "!=",
            Self::NotMatch => "!~",
        }
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown comparison operator: {s}"))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CompareOp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Renders a list node, collapsing single-element lists to the element.
fn render_list(name: &str, items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    if items.len() == 1 {
        return items.into_iter().next().unwrap_or_default();
    }
    format!("({name} {})", items.join(" "))
}

/// Double-quotes `s`, escaping `"` and `\`.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
