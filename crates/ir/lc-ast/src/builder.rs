//! Programmatic construction of units
//!
//! Hosts that already have a front end lower their own tree into a
//! [`Unit`]; tests and small embedders use this builder instead.

use crate::{
    BinaryOp, CallSig, CaseLabel, CatchClause, ClassDecl, Expr, ExprId, Import, LiteralKind,
    MethodDecl, Param, Stmt, StmtId, SwitchCase, TypeRef, UnaryOp, Unit, VarDecl,
};
use lc_intern::{Interner, Symbol};
use lc_span::{FileId, FileSpan};

/// Builds one [`Unit`], interning names as it goes
#[derive(Debug)]
pub struct UnitBuilder {
    interner: Interner,
    unit: Unit,
}

impl UnitBuilder {
    pub fn new(file: FileId) -> Self {
        Self {
            interner: Interner::new(),
            unit: Unit::new(file),
        }
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn sym(&self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    pub fn finish(self) -> (Unit, Interner) {
        (self.unit, self.interner)
    }

    // ---- types ----

    pub fn reference(&self, name: &str) -> TypeRef {
        TypeRef::reference(self.sym(name))
    }

    pub fn primitive(&self, name: &str) -> TypeRef {
        TypeRef::primitive(self.sym(name))
    }

    pub fn array(&self, name: &str) -> TypeRef {
        TypeRef::array(self.sym(name))
    }

    pub fn annotated(&self, ty: TypeRef, annotation: &str) -> TypeRef {
        ty.annotated(self.sym(annotation))
    }

    pub fn sig(&self, params: Vec<TypeRef>, ret: Option<TypeRef>) -> CallSig {
        CallSig::new(params, ret)
    }

    // ---- expressions ----

    pub fn ident(&mut self, name: &str, span: FileSpan) -> ExprId {
        let name = self.sym(name);
        self.unit.exprs.alloc(Expr::Ident { name, span })
    }

    pub fn lit_int(&mut self, value: i64, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Literal { kind: LiteralKind::Int(value), span })
    }

    pub fn lit_str(&mut self, text: &str, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Literal { kind: LiteralKind::Str(text.to_owned()), span })
    }

    pub fn lit_bool(&mut self, value: bool, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Literal { kind: LiteralKind::Bool(value), span })
    }

    pub fn null(&mut self, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Literal { kind: LiteralKind::Null, span })
    }

    pub fn call(
        &mut self,
        receiver: Option<ExprId>,
        callee: &str,
        args: Vec<ExprId>,
        sig: CallSig,
        span: FileSpan,
    ) -> ExprId {
        let callee = self.sym(callee);
        self.unit.exprs.alloc(Expr::Call { receiver, callee, args, sig, span })
    }

    pub fn new_object(&mut self, class: &str, args: Vec<ExprId>, span: FileSpan) -> ExprId {
        let class = self.sym(class);
        self.unit.exprs.alloc(Expr::New { class, args, span })
    }

    pub fn new_array(&mut self, elem_ty: TypeRef, elems: Vec<ExprId>, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::NewArray { elem_ty, elems, span })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Unary { op, operand, span })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Binary { op, lhs, rhs, span })
    }

    pub fn ternary(
        &mut self,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        span: FileSpan,
    ) -> ExprId {
        self.unit.exprs.alloc(Expr::Ternary { cond, then_expr, else_expr, span })
    }

    pub fn paren(&mut self, inner: ExprId, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Paren { inner, span })
    }

    pub fn cast(&mut self, ty: TypeRef, inner: ExprId, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Cast { ty, inner, span })
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::Assign { target, op: None, value, span })
    }

    pub fn compound_assign(
        &mut self,
        target: ExprId,
        op: BinaryOp,
        value: ExprId,
        span: FileSpan,
    ) -> ExprId {
        self.unit.exprs.alloc(Expr::Assign { target, op: Some(op), value, span })
    }

    pub fn array_index(&mut self, base: ExprId, index: ExprId, span: FileSpan) -> ExprId {
        self.unit.exprs.alloc(Expr::ArrayIndex { base, index, span })
    }

    pub fn field(&mut self, base: ExprId, name: &str, span: FileSpan) -> ExprId {
        let name = self.sym(name);
        self.unit.exprs.alloc(Expr::Field { base, name, span })
    }

    pub fn method_ref(&mut self, base: ExprId, name: &str, span: FileSpan) -> ExprId {
        let name = self.sym(name);
        self.unit.exprs.alloc(Expr::MethodRef { base, name, span })
    }

    // ---- statements ----

    pub fn decl(
        &mut self,
        name: &str,
        ty: TypeRef,
        annotations: &[&str],
        init: Option<ExprId>,
        span: FileSpan,
    ) -> StmtId {
        let decl = self.var_decl(name, ty, annotations, init, span);
        self.unit.stmts.alloc(Stmt::Local(decl))
    }

    pub fn var_decl(
        &mut self,
        name: &str,
        ty: TypeRef,
        annotations: &[&str],
        init: Option<ExprId>,
        span: FileSpan,
    ) -> VarDecl {
        VarDecl {
            name: self.sym(name),
            ty,
            annotations: annotations.iter().map(|a| self.sym(a)).collect(),
            init,
            span,
        }
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        let span = self.unit.exprs[expr].span();
        self.unit.stmts.alloc(Stmt::Expr { expr, span })
    }

    pub fn block(&mut self, stmts: Vec<StmtId>, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::Block { stmts, span })
    }

    pub fn if_stmt(
        &mut self,
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
        span: FileSpan,
    ) -> StmtId {
        self.unit.stmts.alloc(Stmt::If { cond, then_branch, else_branch, span })
    }

    pub fn while_stmt(&mut self, cond: ExprId, body: StmtId, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::While { cond, body, span })
    }

    pub fn do_while(&mut self, body: StmtId, cond: ExprId, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::DoWhile { body, cond, span })
    }

    pub fn for_stmt(
        &mut self,
        init: Vec<StmtId>,
        cond: Option<ExprId>,
        update: Vec<ExprId>,
        body: StmtId,
        span: FileSpan,
    ) -> StmtId {
        self.unit.stmts.alloc(Stmt::For { init, cond, update, body, span })
    }

    pub fn for_each(
        &mut self,
        var: VarDecl,
        iterable: ExprId,
        body: StmtId,
        span: FileSpan,
    ) -> StmtId {
        self.unit.stmts.alloc(Stmt::ForEach { var, iterable, body, span })
    }

    pub fn switch(&mut self, selector: ExprId, cases: Vec<SwitchCase>, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::Switch { selector, cases, span })
    }

    pub fn case(&mut self, label: ExprId, stmts: Vec<StmtId>, span: FileSpan) -> SwitchCase {
        SwitchCase { labels: vec![CaseLabel::Value(label)], stmts, span }
    }

    pub fn default_case(&mut self, stmts: Vec<StmtId>, span: FileSpan) -> SwitchCase {
        SwitchCase { labels: vec![CaseLabel::Default], stmts, span }
    }

    pub fn break_stmt(&mut self, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::Break { span })
    }

    pub fn continue_stmt(&mut self, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::Continue { span })
    }

    pub fn ret(&mut self, value: Option<ExprId>, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::Return { value, span })
    }

    pub fn throw(&mut self, value: ExprId, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::Throw { value, span })
    }

    pub fn synchronized(&mut self, lock: ExprId, body: StmtId, span: FileSpan) -> StmtId {
        self.unit.stmts.alloc(Stmt::Synchronized { lock, body, span })
    }

    pub fn try_stmt(
        &mut self,
        body: StmtId,
        catches: Vec<CatchClause>,
        finally: Option<StmtId>,
        span: FileSpan,
    ) -> StmtId {
        self.unit.stmts.alloc(Stmt::Try { body, catches, finally, span })
    }

    pub fn catch(&mut self, param: Param, body: StmtId, span: FileSpan) -> CatchClause {
        CatchClause { param, body, span }
    }

    // ---- declarations ----

    pub fn param(&mut self, name: &str, ty: TypeRef, annotations: &[&str], span: FileSpan) -> Param {
        Param {
            name: self.sym(name),
            ty,
            annotations: annotations.iter().map(|a| self.sym(a)).collect(),
            span,
        }
    }

    pub fn method(
        &mut self,
        name: &str,
        params: Vec<Param>,
        return_ty: Option<TypeRef>,
        body: Vec<StmtId>,
        span: FileSpan,
    ) -> MethodDecl {
        MethodDecl { name: self.sym(name), params, return_ty, body, span }
    }

    pub fn class(&mut self, name: &str, methods: Vec<MethodDecl>, span: FileSpan) {
        let name = self.sym(name);
        self.unit.classes.push(ClassDecl { name, methods, span });
    }

    pub fn import(&mut self, path: &str, span: FileSpan) {
        let path = self.sym(path);
        self.unit.imports.push(Import { path, span });
    }
}
