//! Source-shaped rendering of expressions
//!
//! Diagnostics embed the offending expression the way the user wrote it
//! (`s.toUpperCase().toLowerCase()`, `x[1]`, `this::myMethod`), so the
//! checker needs to turn arena nodes back into text.

use crate::{Expr, ExprId, LiteralKind, TypeKind, TypeRef, Unit, UnaryOp};
use lc_intern::Interner;
use std::fmt::Write as _;

/// Renders the expression `id` back into source-shaped text
pub fn render_expr(unit: &Unit, interner: &Interner, id: ExprId) -> String {
    let mut out = String::new();
    write_expr(unit, interner, id, &mut out);
    out
}

/// Renders a type reference, e.g. `String` or `char[]`
pub fn render_type(interner: &Interner, ty: &TypeRef) -> String {
    let name = interner.resolve(ty.name);
    match ty.kind {
        TypeKind::Array => format!("{name}[]"),
        TypeKind::Primitive | TypeKind::Reference => name.to_owned(),
    }
}

fn write_expr(unit: &Unit, interner: &Interner, id: ExprId, out: &mut String) {
    match unit.expr(id) {
        Expr::Ident { name, .. } => out.push_str(interner.resolve(*name)),
        Expr::Literal { kind, .. } => write_literal(kind, out),
        Expr::Call { receiver, callee, args, .. } => {
            if let Some(receiver) = receiver {
                write_expr(unit, interner, *receiver, out);
                out.push('.');
            }
            out.push_str(interner.resolve(*callee));
            out.push('(');
            write_args(unit, interner, args, out);
            out.push(')');
        }
        Expr::New { class, args, .. } => {
            out.push_str("new ");
            out.push_str(interner.resolve(*class));
            out.push('(');
            write_args(unit, interner, args, out);
            out.push(')');
        }
        Expr::NewArray { elem_ty, elems, .. } => {
            out.push_str("new ");
            out.push_str(interner.resolve(elem_ty.name));
            out.push_str("[]{");
            write_args(unit, interner, elems, out);
            out.push('}');
        }
        Expr::Unary { op, operand, .. } => match op {
            UnaryOp::Neg => {
                out.push('-');
                write_expr(unit, interner, *operand, out);
            }
            UnaryOp::Not => {
                out.push('!');
                write_expr(unit, interner, *operand, out);
            }
            UnaryOp::PostInc => {
                write_expr(unit, interner, *operand, out);
                out.push_str("++");
            }
            UnaryOp::PostDec => {
                write_expr(unit, interner, *operand, out);
                out.push_str("--");
            }
        },
        Expr::Binary { op, lhs, rhs, .. } => {
            write_expr(unit, interner, *lhs, out);
            let _ = write!(out, " {} ", op.symbol());
            write_expr(unit, interner, *rhs, out);
        }
        Expr::Ternary { cond, then_expr, else_expr, .. } => {
            write_expr(unit, interner, *cond, out);
            out.push_str(" ? ");
            write_expr(unit, interner, *then_expr, out);
            out.push_str(" : ");
            write_expr(unit, interner, *else_expr, out);
        }
        Expr::Paren { inner, .. } => {
            out.push('(');
            write_expr(unit, interner, *inner, out);
            out.push(')');
        }
        Expr::Cast { ty, inner, .. } => {
            out.push('(');
            out.push_str(&render_type(interner, ty));
            out.push_str(") ");
            write_expr(unit, interner, *inner, out);
        }
        Expr::Assign { target, op, value, .. } => {
            write_expr(unit, interner, *target, out);
            match op {
                Some(op) => {
                    let _ = write!(out, " {}= ", op.symbol());
                }
                None => out.push_str(" = "),
            }
            write_expr(unit, interner, *value, out);
        }
        Expr::ArrayIndex { base, index, .. } => {
            write_expr(unit, interner, *base, out);
            out.push('[');
            write_expr(unit, interner, *index, out);
            out.push(']');
        }
        Expr::Field { base, name, .. } => {
            write_expr(unit, interner, *base, out);
            out.push('.');
            out.push_str(interner.resolve(*name));
        }
        Expr::MethodRef { base, name, .. } => {
            write_expr(unit, interner, *base, out);
            out.push_str("::");
            out.push_str(interner.resolve(*name));
        }
    }
}

fn write_args(unit: &Unit, interner: &Interner, args: &[ExprId], out: &mut String) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(unit, interner, *arg, out);
    }
}

fn write_literal(kind: &LiteralKind, out: &mut String) {
    match kind {
        LiteralKind::Int(value) => {
            let _ = write!(out, "{value}");
        }
        LiteralKind::Str(text) => {
            let _ = write!(out, "\"{text}\"");
        }
        LiteralKind::Bool(value) => {
            let _ = write!(out, "{value}");
        }
        LiteralKind::Char(value) => {
            let _ = write!(out, "'{value}'");
        }
        LiteralKind::Null => out.push_str("null"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitBuilder;
    use lc_span::{FileId, FileSpan, Span};

    fn at() -> FileSpan {
        FileSpan::new(FileId(0), Span::point(0))
    }

    #[test]
    fn renders_call_chains() {
        let mut builder = UnitBuilder::new(FileId(0));
        let receiver = builder.ident("s", at());
        let upper = builder.call(Some(receiver), "toUpperCase", vec![], crate::CallSig::default(), at());
        let lower = builder.call(Some(upper), "toLowerCase", vec![], crate::CallSig::default(), at());
        let (unit, interner) = builder.finish();

        assert_eq!(render_expr(&unit, &interner, lower), "s.toUpperCase().toLowerCase()");
    }

    #[test]
    fn renders_array_index_and_method_ref() {
        let mut builder = UnitBuilder::new(FileId(0));
        let base = builder.ident("x", at());
        let one = builder.lit_int(1, at());
        let indexed = builder.array_index(base, one, at());
        let this = builder.ident("this", at());
        let method_ref = builder.method_ref(this, "myMethod", at());
        let (unit, interner) = builder.finish();

        assert_eq!(render_expr(&unit, &interner, indexed), "x[1]");
        assert_eq!(render_expr(&unit, &interner, method_ref), "this::myMethod");
    }

    #[test]
    fn renders_literals_and_operators() {
        let mut builder = UnitBuilder::new(FileId(0));
        let lhs = builder.ident("a", at());
        let rhs = builder.lit_int(2, at());
        let sum = builder.binary(crate::BinaryOp::Add, lhs, rhs, at());
        let text = builder.lit_str("hi", at());
        let (unit, interner) = builder.finish();

        assert_eq!(render_expr(&unit, &interner, sum), "a + 2");
        assert_eq!(render_expr(&unit, &interner, text), "\"hi\"");
    }
}
