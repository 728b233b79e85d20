// AST (Abstract Syntax Tree) definitions for theme and render snippets

use std::rc::Rc;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Equality
    Eq,       // ==
    Ne,       // !=
    StrictEq, // ===
    StrictNe, // !==
    // Relational
    Lt,
    Le,
    Gt,
    Ge,
    In,
}

/// Short-circuiting operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,     // &&
    Or,      // ||
    Nullish, // ??
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,    // -x
    Plus,   // +x
    Not,    // !x
    Typeof, // typeof x
    Void,   // void x
}

/// Assignment operators (only local `let` bindings are assignable)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
}

/// `const` vs `let`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
}

/// Piece of a template literal
#[derive(Debug, Clone)]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

/// Object literal / destructuring key
#[derive(Debug, Clone)]
pub enum PropertyKey {
    Named(String),
    Computed(Box<Expr>),
}

/// Member of an object literal
#[derive(Debug, Clone)]
pub enum ObjectMember {
    Property { key: PropertyKey, value: Expr },
    Spread(Expr),
}

/// Element of an array literal or argument list
#[derive(Debug, Clone)]
pub enum ListEntry {
    Item(Expr),
    Spread(Expr),
}

/// Binding pattern used by parameters and declarations
#[derive(Debug, Clone)]
pub enum Pattern {
    Ident(String),
    Object {
        properties: Vec<PatternProperty>,
        rest: Option<String>,
    },
    Array {
        elements: Vec<Option<PatternElement>>,
        rest: Option<String>,
    },
}

/// `key: target = default` inside an object pattern
#[derive(Debug, Clone)]
pub struct PatternProperty {
    pub key: PropertyKey,
    pub target: Pattern,
    pub default: Option<Expr>,
}

/// `target = default` inside an array pattern or parameter list
#[derive(Debug, Clone)]
pub struct PatternElement {
    pub target: Pattern,
    pub default: Option<Expr>,
}

impl Pattern {
    /// Every name this pattern binds, in source order.
    pub fn bound_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Ident(name) => out.push(name),
            Pattern::Object { properties, rest } => {
                for prop in properties {
                    prop.target.collect_names(out);
                }
                if let Some(rest) = rest {
                    out.push(rest);
                }
            }
            Pattern::Array { elements, rest } => {
                for element in elements.iter().flatten() {
                    element.target.collect_names(out);
                }
                if let Some(rest) = rest {
                    out.push(rest);
                }
            }
        }
    }
}

/// Function body: `=> expr` or `{ statements }`
#[derive(Debug, Clone)]
pub enum FunctionBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

/// Arrow function or `function` expression
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<PatternElement>,
    pub rest: Option<String>,
    pub body: FunctionBody,
    pub location: SourceLocation,
}

/// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64, SourceLocation),
    Str(String, SourceLocation),
    Template(Vec<TemplatePart>, SourceLocation),
    Bool(bool, SourceLocation),
    Null(SourceLocation),
    Undefined(SourceLocation),
    Ident(String, SourceLocation),
    Array(Vec<ListEntry>, SourceLocation),
    Object(Vec<ObjectMember>, SourceLocation),
    Function(Rc<Function>),
    Member {
        object: Box<Expr>,
        property: String,
        optional: bool,
        location: SourceLocation,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<ListEntry>,
        optional: bool,
        location: SourceLocation,
    },
    New {
        callee: Box<Expr>,
        args: Vec<ListEntry>,
        location: SourceLocation,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        location: SourceLocation,
    },
    Assign {
        target: String,
        op: AssignOp,
        value: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Number(_, loc)
            | Expr::Str(_, loc)
            | Expr::Template(_, loc)
            | Expr::Bool(_, loc)
            | Expr::Null(loc)
            | Expr::Undefined(loc)
            | Expr::Ident(_, loc)
            | Expr::Array(_, loc)
            | Expr::Object(_, loc) => *loc,
            Expr::Function(function) => function.location,
            Expr::Member { location, .. }
            | Expr::Index { location, .. }
            | Expr::Call { location, .. }
            | Expr::New { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Logical { location, .. }
            | Expr::Conditional { location, .. }
            | Expr::Assign { location, .. } => *location,
        }
    }
}

/// Statements (only inside block function bodies)
#[derive(Debug, Clone)]
pub enum Stmt {
    Declare {
        kind: DeclKind,
        pattern: Pattern,
        init: Option<Expr>,
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Throw {
        expr: Expr,
        location: SourceLocation,
    },
    Block {
        body: Vec<Stmt>,
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Declare { location, .. }
            | Stmt::Expression { location, .. }
            | Stmt::If { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Throw { location, .. }
            | Stmt::Block { location, .. } => *location,
        }
    }
}

/// Canonical string form of a number, as used for object keys and string
/// conversion (`500` rather than `500.0`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}
