//! Tree representation of one translation unit
//!
//! This is the structure the host front end hands to the checking passes:
//! statements and expressions live in arenas, names are interned symbols,
//! and every node carries a [`FileSpan`]. Symbol and type resolution has
//! already happened — call expressions carry their resolved signature
//! ([`CallSig`]), and declarations carry the annotation names spelled on
//! them exactly as written (qualified or simple).

pub mod builder;
pub mod display;

use la_arena::{Arena, Idx};
use lc_intern::Symbol;
use lc_span::{FileId, FileSpan};

pub use builder::UnitBuilder;
pub use display::render_expr;

pub type StmtId = Idx<Stmt>;
pub type ExprId = Idx<Expr>;

/// One translation unit: imports, classes and the node arenas behind them
#[derive(Debug, Clone)]
pub struct Unit {
    pub file: FileId,
    pub imports: Vec<Import>,
    pub classes: Vec<ClassDecl>,
    pub stmts: Arena<Stmt>,
    pub exprs: Arena<Expr>,
}

impl Unit {
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            imports: Vec::new(),
            classes: Vec::new(),
            stmts: Arena::new(),
            exprs: Arena::new(),
        }
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    /// Returns the identifier name if `id` is a plain identifier expression
    pub fn as_ident(&self, id: ExprId) -> Option<Symbol> {
        match self.exprs[id] {
            Expr::Ident { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// An import observed at the top of the unit, e.g. `a.b.Linear` or `a.b.*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: Symbol,
    pub span: FileSpan,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Symbol,
    pub methods: Vec<MethodDecl>,
    pub span: FileSpan,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    /// `None` for void routines
    pub return_ty: Option<TypeRef>,
    pub body: Vec<StmtId>,
    pub span: FileSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeRef,
    /// Annotation names spelled on the parameter declaration
    pub annotations: Vec<Symbol>,
    pub span: FileSpan,
}

/// A resolved type reference as it appears in declarations and signatures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: Symbol,
    pub kind: TypeKind,
    /// Annotation names carried by the type itself
    pub annotations: Vec<Symbol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Primitive,
    Reference,
    Array,
}

impl TypeRef {
    pub fn reference(name: Symbol) -> Self {
        Self { name, kind: TypeKind::Reference, annotations: Vec::new() }
    }

    pub fn primitive(name: Symbol) -> Self {
        Self { name, kind: TypeKind::Primitive, annotations: Vec::new() }
    }

    pub fn array(name: Symbol) -> Self {
        Self { name, kind: TypeKind::Array, annotations: Vec::new() }
    }

    pub fn annotated(mut self, annotation: Symbol) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == TypeKind::Primitive
    }
}

/// Resolved signature of a call expression, supplied by the host resolver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSig {
    pub params: Vec<TypeRef>,
    /// `None` for void callees
    pub ret: Option<TypeRef>,
}

impl CallSig {
    pub fn new(params: Vec<TypeRef>, ret: Option<TypeRef>) -> Self {
        Self { params, ret }
    }
}

/// A local variable declaration, also used for for-each loop variables
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Symbol,
    pub ty: TypeRef,
    /// Annotation names spelled on the declaration
    pub annotations: Vec<Symbol>,
    pub init: Option<ExprId>,
    pub span: FileSpan,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub labels: Vec<CaseLabel>,
    pub stmts: Vec<StmtId>,
    pub span: FileSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseLabel {
    Value(ExprId),
    Default,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub param: Param,
    pub body: StmtId,
    pub span: FileSpan,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Local(VarDecl),
    Expr {
        expr: ExprId,
        span: FileSpan,
    },
    Block {
        stmts: Vec<StmtId>,
        span: FileSpan,
    },
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
        span: FileSpan,
    },
    While {
        cond: ExprId,
        body: StmtId,
        span: FileSpan,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
        span: FileSpan,
    },
    For {
        init: Vec<StmtId>,
        cond: Option<ExprId>,
        update: Vec<ExprId>,
        body: StmtId,
        span: FileSpan,
    },
    ForEach {
        var: VarDecl,
        iterable: ExprId,
        body: StmtId,
        span: FileSpan,
    },
    Switch {
        selector: ExprId,
        cases: Vec<SwitchCase>,
        span: FileSpan,
    },
    Break {
        span: FileSpan,
    },
    Continue {
        span: FileSpan,
    },
    Return {
        value: Option<ExprId>,
        span: FileSpan,
    },
    Throw {
        value: ExprId,
        span: FileSpan,
    },
    Synchronized {
        lock: ExprId,
        body: StmtId,
        span: FileSpan,
    },
    Try {
        body: StmtId,
        catches: Vec<CatchClause>,
        finally: Option<StmtId>,
        span: FileSpan,
    },
}

impl Stmt {
    pub fn span(&self) -> FileSpan {
        match self {
            Stmt::Local(decl) => decl.span,
            Stmt::Expr { span, .. }
            | Stmt::Block { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::DoWhile { span, .. }
            | Stmt::For { span, .. }
            | Stmt::ForEach { span, .. }
            | Stmt::Switch { span, .. }
            | Stmt::Break { span }
            | Stmt::Continue { span }
            | Stmt::Return { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Synchronized { span, .. }
            | Stmt::Try { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident {
        name: Symbol,
        span: FileSpan,
    },
    Literal {
        kind: LiteralKind,
        span: FileSpan,
    },
    Call {
        receiver: Option<ExprId>,
        callee: Symbol,
        args: Vec<ExprId>,
        sig: CallSig,
        span: FileSpan,
    },
    New {
        class: Symbol,
        args: Vec<ExprId>,
        span: FileSpan,
    },
    NewArray {
        elem_ty: TypeRef,
        elems: Vec<ExprId>,
        span: FileSpan,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
        span: FileSpan,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: FileSpan,
    },
    Ternary {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        span: FileSpan,
    },
    Paren {
        inner: ExprId,
        span: FileSpan,
    },
    Cast {
        ty: TypeRef,
        inner: ExprId,
        span: FileSpan,
    },
    /// Plain (`op: None`) or compound (`op: Some(..)`) assignment
    Assign {
        target: ExprId,
        op: Option<BinaryOp>,
        value: ExprId,
        span: FileSpan,
    },
    ArrayIndex {
        base: ExprId,
        index: ExprId,
        span: FileSpan,
    },
    Field {
        base: ExprId,
        name: Symbol,
        span: FileSpan,
    },
    MethodRef {
        base: ExprId,
        name: Symbol,
        span: FileSpan,
    },
}

impl Expr {
    pub fn span(&self) -> FileSpan {
        match self {
            Expr::Ident { span, .. }
            | Expr::Literal { span, .. }
            | Expr::Call { span, .. }
            | Expr::New { span, .. }
            | Expr::NewArray { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Cast { span, .. }
            | Expr::Assign { span, .. }
            | Expr::ArrayIndex { span, .. }
            | Expr::Field { span, .. }
            | Expr::MethodRef { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Int(i64),
    Str(String),
    Bool(bool),
    Char(char),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    PostInc,
    PostDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}
