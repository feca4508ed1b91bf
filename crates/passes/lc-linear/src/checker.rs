//! The linearity pass
//!
//! Walks a unit top to bottom with a [`ScopeStack`] of [`LinearMark`]s.
//! Straight-line code consumes marks through ids shared with the
//! enclosing frame; mutually exclusive branches each run on their own
//! deep copy and are folded back together afterwards, so a variable
//! may be consumed on *each* path but never twice on *one* path.

use crate::block::BlockKind;
use crate::detect::AnnotationDetector;
use crate::error::{DiagnosticSink, LinearError};
use crate::mark::LinearMark;
use crate::scope::{RoutineInfo, ScopeStack};
use lc_ast::{
    CallSig, CaseLabel, ClassDecl, Expr, ExprId, MethodDecl, Stmt, StmtId, SwitchCase, Unit,
    VarDecl, render_expr,
};
use lc_intern::{Interner, Symbol};
use lc_span::FileSpan;

pub struct LinearChecker<'a> {
    unit: &'a Unit,
    interner: &'a Interner,
    detector: AnnotationDetector,
    scopes: ScopeStack<LinearMark>,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> LinearChecker<'a> {
    /// Checks one unit and returns every violation found, in source
    /// order.
    pub fn check(unit: &Unit, interner: &Interner, marker: &str) -> Vec<LinearError> {
        let mut errors = Vec::new();
        LinearChecker::run(unit, interner, marker, &mut errors);
        errors
    }

    /// Checks one unit, streaming violations into `sink`.
    pub fn run(
        unit: &'a Unit,
        interner: &'a Interner,
        marker: &str,
        sink: &'a mut dyn DiagnosticSink,
    ) {
        let mut checker = LinearChecker {
            unit,
            interner,
            detector: AnnotationDetector::new(marker, interner),
            scopes: ScopeStack::new(),
            sink,
        };
        checker.scan();
        checker.finish();
    }

    fn scan(&mut self) {
        let unit = self.unit;
        for import in &unit.imports {
            self.detector.observe_import(import.path);
        }
        for class in &unit.classes {
            self.scan_class(class);
        }
    }

    /// Traversal sanity check: every frame entered must have been exited.
    fn finish(&self) {
        assert_eq!(self.scopes.depth(), 1, "unbalanced scope traversal");
    }

    fn report(&mut self, error: LinearError) {
        self.sink.report(error);
    }

    fn resolve(&self, name: Symbol) -> String {
        self.interner.resolve(name).to_owned()
    }

    fn render(&self, id: ExprId) -> String {
        render_expr(self.unit, self.interner, id)
    }

    // ---- declarations ----

    /// Runs `body` inside a fresh frame of the given kind; the frame is
    /// exited on every path out.
    fn scoped(&mut self, kind: BlockKind, body: impl FnOnce(&mut Self)) {
        self.scopes.enter(kind);
        body(self);
        self.scopes.exit();
    }

    fn scan_class(&mut self, class: &'a ClassDecl) {
        self.scoped(BlockKind::Class, |checker| {
            for method in &class.methods {
                checker.scan_method(method);
            }
        });
    }

    fn scan_method(&mut self, method: &'a MethodDecl) {
        self.scopes.enter_routine(RoutineInfo {
            name: method.name,
            return_ty: method.return_ty.clone(),
        });
        for param in &method.params {
            let linear = self.detector.is_marked(&param.annotations)
                || self.detector.is_marked(&param.ty.annotations);
            if linear {
                self.scopes.declare(param.name, LinearMark::new(param.name));
            }
        }
        for &stmt in &method.body {
            self.scan_stmt(stmt);
        }
        self.scopes.exit();
    }

    fn scan_local(&mut self, decl: &'a VarDecl) {
        let linear = self.detector.is_marked(&decl.annotations)
            || self.detector.is_marked(&decl.ty.annotations);
        let Some(init) = decl.init else {
            // Declared but not yet initialized: tracking starts now so
            // a later plain assignment can alias into it.
            if linear {
                self.scopes.declare(decl.name, LinearMark::new(decl.name));
            }
            return;
        };

        if let Some(source) = self.unit.as_ident(init) {
            if let Some(source_id) = self.scopes.get_id(source) {
                // Initializing from a tracked variable aliases it, for
                // linear and non-linear targets alike. The syntactic
                // read of the source is forgiven.
                self.scopes.mark_mut(source_id).ignore_next_use();
                self.scan_expr(init);
                self.scopes.alias(decl.name, source_id);
            } else if linear {
                self.report(LinearError::NonLinearSource {
                    source: self.resolve(source),
                    target: self.resolve(decl.name),
                    span: decl.span,
                });
                self.scan_expr(init);
            } else {
                self.scan_expr(init);
            }
            return;
        }

        if linear {
            if let Expr::Call { sig, .. } = self.unit.expr(init) {
                if !self.returns_linear(sig) {
                    self.report(LinearError::NonLinearCallResult {
                        call: self.render(init),
                        target: self.resolve(decl.name),
                        span: decl.span,
                    });
                    self.scan_expr(init);
                    return;
                }
            }
            // Literals, constructors and linear-returning calls are all
            // valid origins for a fresh linear value.
            self.scan_expr(init);
            self.scopes.declare(decl.name, LinearMark::new(decl.name));
        } else {
            self.scan_expr(init);
        }
    }

    fn returns_linear(&self, sig: &CallSig) -> bool {
        sig.ret.as_ref().is_some_and(|ty| self.detector.is_linear_compatible(ty))
    }

    // ---- statements ----

    fn scan_stmt(&mut self, id: StmtId) {
        let unit = self.unit;
        match unit.stmt(id) {
            Stmt::Local(decl) => self.scan_local(decl),
            Stmt::Expr { expr, .. } => self.scan_expr(*expr),
            Stmt::Block { stmts, .. } => {
                self.scoped(BlockKind::Other, |checker| {
                    for &stmt in stmts {
                        checker.scan_stmt(stmt);
                    }
                });
            }
            Stmt::If { cond, then_branch, else_branch, .. } => {
                self.scan_expr(*cond);
                match else_branch {
                    Some(else_branch) => {
                        let (then_branch, else_branch) = (*then_branch, *else_branch);
                        self.scopes.enter(BlockKind::If);
                        self.scan_exclusive(
                            |checker| checker.scan_stmt(then_branch),
                            |checker| checker.scan_stmt(else_branch),
                        );
                    }
                    None => {
                        // A lone arm runs on the shared frame; its
                        // consumptions leak out like any plain block.
                        let then_branch = *then_branch;
                        self.scoped(BlockKind::If, |checker| checker.scan_stmt(then_branch));
                    }
                }
            }
            Stmt::While { cond, body, .. } => {
                let (cond, body) = (*cond, *body);
                self.scoped(BlockKind::WhileLoop, |checker| {
                    checker.scan_expr(cond);
                    checker.scan_stmt(body);
                });
            }
            Stmt::DoWhile { body, cond, .. } => {
                let (body, cond) = (*body, *cond);
                self.scoped(BlockKind::WhileLoop, |checker| {
                    checker.scan_stmt(body);
                    checker.scan_expr(cond);
                });
            }
            Stmt::For { init, cond, update, body, .. } => {
                let (cond, body) = (*cond, *body);
                self.scoped(BlockKind::ForLoop, |checker| {
                    for &stmt in init {
                        checker.scan_stmt(stmt);
                    }
                    if let Some(cond) = cond {
                        checker.scan_expr(cond);
                    }
                    checker.scan_stmt(body);
                    for &expr in update {
                        checker.scan_expr(expr);
                    }
                });
            }
            Stmt::ForEach { var, iterable, body, .. } => {
                let (iterable, body) = (*iterable, *body);
                self.scoped(BlockKind::ForLoop, |checker| {
                    checker.scan_local(var);
                    checker.scan_expr(iterable);
                    checker.scan_stmt(body);
                });
            }
            Stmt::Switch { selector, cases, .. } => {
                let selector = *selector;
                self.scoped(BlockKind::Switch, |checker| {
                    checker.scan_expr(selector);
                    let runs = fallthrough_runs(unit, cases);
                    if !runs.is_empty() {
                        checker.scan_runs(&runs);
                    }
                });
            }
            Stmt::Break { .. } | Stmt::Continue { .. } => {}
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.check_return(*value);
                    self.scan_expr(*value);
                }
            }
            Stmt::Throw { value, .. } => self.scan_expr(*value),
            Stmt::Synchronized { lock, body, .. } => {
                self.scan_expr(*lock);
                let body = *body;
                self.scoped(BlockKind::Synchronized, |checker| checker.scan_stmt(body));
            }
            Stmt::Try { body, catches, finally, .. } => {
                let (body, finally) = (*body, *finally);
                self.scoped(BlockKind::Other, |checker| {
                    checker.scan_stmt(body);
                    for catch in catches {
                        checker.scan_stmt(catch.body);
                    }
                    if let Some(finally) = finally {
                        checker.scan_stmt(finally);
                    }
                });
            }
        }
    }

    /// Runs two closures on mutually exclusive copies of the current
    /// frame and folds the results back together. The caller has
    /// already entered the branching frame; both it and the copy are
    /// exited here.
    fn scan_exclusive(
        &mut self,
        first: impl FnOnce(&mut Self),
        second: impl FnOnce(&mut Self),
    ) {
        self.scopes.duplicate();
        first(self);
        self.scopes.swap();
        second(self);
        let active = self.scopes.exit();
        let detached = self.scopes.exit();
        self.scopes.merge_scopes(&active, &detached);
    }

    /// Checks fallthrough runs of a switch. The runs are mutually
    /// exclusive with each other, expressed as a right-nested chain of
    /// two-way splits.
    fn scan_runs(&mut self, runs: &[Vec<&'a SwitchCase>]) {
        if let [run] = runs {
            self.scoped(BlockKind::SwitchCase, |checker| checker.scan_run(run));
        } else {
            self.scopes.enter(BlockKind::SwitchCase);
            self.scan_exclusive(
                |checker| checker.scan_run(&runs[0]),
                |checker| checker.scan_runs(&runs[1..]),
            );
        }
    }

    fn scan_run(&mut self, run: &[&'a SwitchCase]) {
        for case in run {
            for label in &case.labels {
                if let CaseLabel::Value(expr) = label {
                    self.scan_expr(*expr);
                }
            }
            for &stmt in &case.stmts {
                self.scan_stmt(stmt);
            }
        }
    }

    // ---- expressions ----

    fn scan_expr(&mut self, id: ExprId) {
        let unit = self.unit;
        match unit.expr(id) {
            Expr::Ident { name, span } => self.use_ident(*name, *span),
            Expr::Literal { .. } | Expr::MethodRef { .. } => {}
            Expr::Call { receiver, callee, args, sig, .. } => {
                if let Some(receiver) = receiver {
                    self.scan_expr(*receiver);
                }
                self.check_arguments(*callee, args, sig);
                for &arg in args {
                    self.scan_expr(arg);
                }
            }
            Expr::New { args, .. } => {
                for &arg in args {
                    self.scan_expr(arg);
                }
            }
            Expr::NewArray { elems, .. } => {
                for &elem in elems {
                    self.scan_expr(elem);
                }
            }
            Expr::Unary { operand, .. } => self.scan_expr(*operand),
            Expr::Binary { lhs, rhs, .. } => {
                self.scan_expr(*lhs);
                self.scan_expr(*rhs);
            }
            Expr::Ternary { cond, then_expr, else_expr, .. } => {
                self.scan_expr(*cond);
                self.scopes.enter(BlockKind::If);
                let (then_expr, else_expr) = (*then_expr, *else_expr);
                self.scan_exclusive(
                    |checker| checker.scan_expr(then_expr),
                    |checker| checker.scan_expr(else_expr),
                );
            }
            Expr::Paren { inner, .. } | Expr::Cast { inner, .. } => self.scan_expr(*inner),
            Expr::Assign { target, op, value, span } => {
                self.scan_assign(*target, op.is_some(), *value, *span);
            }
            Expr::ArrayIndex { base, index, .. } => {
                self.scan_expr(*base);
                self.scan_expr(*index);
            }
            Expr::Field { base, .. } => self.scan_expr(*base),
        }
    }

    /// One read of an identifier. Inside a loop a single syntactic use
    /// stands for arbitrarily many runtime uses, so the mark is bumped
    /// once before the check and the first use already trips it.
    fn use_ident(&mut self, name: Symbol, span: FileSpan) {
        let Some(id) = self.scopes.get_id(name) else { return };
        if self.scopes.is_within_loop() {
            self.scopes.mark_mut(id).mark_used();
        }
        let (used_up, original) = {
            let mark = self.scopes.mark(id);
            (mark.is_used_up(), mark.name())
        };
        if used_up {
            let error = if original == name {
                LinearError::Reuse { name: self.resolve(name), span }
            } else {
                LinearError::ReuseAliased {
                    name: self.resolve(original),
                    alias: self.resolve(name),
                    span,
                }
            };
            self.report(error);
        } else {
            self.scopes.mark_mut(id).mark_used();
        }
    }

    /// A plain assignment never reads its target; a compound one does.
    /// A tracked right-hand identifier turns the assignment into an
    /// aliasing bind regardless of whether the target is linear.
    fn scan_assign(&mut self, target: ExprId, compound: bool, value: ExprId, span: FileSpan) {
        if compound {
            self.scan_expr(target);
            self.scan_expr(value);
            return;
        }
        let Some(target_name) = self.unit.as_ident(target) else {
            // Array element or field target: the base is read.
            self.scan_expr(target);
            self.scan_expr(value);
            return;
        };
        if let Some(source) = self.unit.as_ident(value) {
            if let Some(source_id) = self.scopes.get_id(source) {
                self.scopes.mark_mut(source_id).ignore_next_use();
                self.scan_expr(value);
                self.scopes.alias(target_name, source_id);
                return;
            }
            if self.scopes.get_id(target_name).is_some() {
                self.report(LinearError::NonLinearSource {
                    source: self.resolve(source),
                    target: self.resolve(target_name),
                    span,
                });
            }
        }
        self.scan_expr(value);
    }

    /// A linear variable may only be handed to a parameter position the
    /// callee declares as linear-compatible; anywhere else the value
    /// escapes tracking.
    fn check_arguments(&mut self, callee: Symbol, args: &[ExprId], sig: &CallSig) {
        for (index, &arg) in args.iter().enumerate() {
            let Some(name) = self.unit.as_ident(arg) else { continue };
            if self.scopes.get_id(name).is_none() {
                continue;
            }
            let compatible = sig
                .params
                .get(index)
                .is_some_and(|ty| self.detector.is_linear_compatible(ty));
            if !compatible {
                let span = self.unit.expr(arg).span();
                self.report(LinearError::NonLinearParameter {
                    arg: self.resolve(name),
                    callee: self.resolve(callee),
                    index,
                    span,
                });
            }
        }
    }

    // ---- returns ----

    fn check_return(&mut self, value: ExprId) {
        let Some(routine) = self.scopes.current_routine() else { return };
        let Some(return_ty) = &routine.return_ty else { return };
        if !self.detector.is_marked(&return_ty.annotations) {
            return;
        }
        let method = routine.name;
        self.check_return_value(value, method);
    }

    /// Validates the shape of a returned value, descending into wrapper
    /// expressions so the diagnostic lands on the offending leaf.
    fn check_return_value(&mut self, id: ExprId, method: Symbol) {
        let unit = self.unit;
        match unit.expr(id) {
            Expr::Paren { inner, .. } | Expr::Cast { inner, .. } => {
                self.check_return_value(*inner, method);
            }
            // `return v = expr` yields the assigned target.
            Expr::Assign { target, .. } => self.check_return_value(*target, method),
            Expr::Ternary { then_expr, else_expr, .. } => {
                self.check_return_value(*then_expr, method);
                self.check_return_value(*else_expr, method);
            }
            Expr::Ident { name, span } => {
                if self.scopes.get_id(*name).is_none() {
                    self.report_nonlinear_return(id, method, *span);
                }
            }
            Expr::Call { sig, span, .. } => {
                if !self.returns_linear(sig) {
                    self.report_nonlinear_return(id, method, *span);
                }
            }
            // Fresh values are always valid linear origins.
            Expr::Literal { .. } | Expr::New { .. } | Expr::NewArray { .. } => {}
            other => self.report_nonlinear_return(id, method, other.span()),
        }
    }

    fn report_nonlinear_return(&mut self, id: ExprId, method: Symbol, span: FileSpan) {
        self.report(LinearError::NonLinearReturn {
            value: self.render(id),
            method: self.resolve(method),
            span,
        });
    }
}

/// Splits the cases of a switch into fallthrough runs. A run ends at a
/// case whose last statement is a `break`; a trailing run without one
/// falls out of the switch.
fn fallthrough_runs<'a>(unit: &Unit, cases: &'a [SwitchCase]) -> Vec<Vec<&'a SwitchCase>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for case in cases {
        current.push(case);
        let breaks = case
            .stmts
            .last()
            .is_some_and(|&stmt| matches!(unit.stmt(stmt), Stmt::Break { .. }));
        if breaks {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
