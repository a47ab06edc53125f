use crate::ir::ast::*;
use crate::utils::info::Info;
use crate::utils::smap::SMapAccum;

fn fold_unop(op: UnOp, arg: Expr, ty: Type, i: Info) -> Expr {
    match (op, arg.get_int_value()) {
        (UnOp::Sub, Some(v)) => Expr::Int {v: -v, ty, i},
        _ => Expr::UnOp {op, arg: Box::new(arg), ty, i}
    }
}

fn fold_binop(lhs: Expr, op: BinOp, rhs: Expr, ty: Type, i: Info) -> Expr {
    match (lhs.get_int_value(), op, rhs.get_int_value()) {
        (Some(l), BinOp::Add, Some(r)) => Expr::Int {v: l + r, ty, i},
        (Some(l), BinOp::Sub, Some(r)) => Expr::Int {v: l - r, ty, i},
        (Some(l), BinOp::Mul, Some(r)) => Expr::Int {v: l * r, ty, i},
        (Some(l), BinOp::Div, Some(r)) if r != 0 => Expr::Int {v: l / r, ty, i},
        (Some(l), BinOp::Rem, Some(r)) if r != 0 => Expr::Int {v: l % r, ty, i},
        (Some(l), BinOp::Eq, Some(r)) => Expr::Bool {v: l == r, ty, i},
        (Some(l), BinOp::Neq, Some(r)) => Expr::Bool {v: l != r, ty, i},
        (Some(l), BinOp::Lt, Some(r)) => Expr::Bool {v: l < r, ty, i},
        (Some(l), BinOp::Leq, Some(r)) => Expr::Bool {v: l <= r, ty, i},
        (Some(l), BinOp::Gt, Some(r)) => Expr::Bool {v: l > r, ty, i},
        (Some(l), BinOp::Geq, Some(r)) => Expr::Bool {v: l >= r, ty, i},
        (_, BinOp::Add, Some(0)) | (_, BinOp::Sub, Some(0)) |
        (_, BinOp::Mul, Some(1)) | (_, BinOp::Div, Some(1)) => lhs,
        (Some(0), BinOp::Add, _) | (Some(1), BinOp::Mul, _) => rhs,
        _ => Expr::BinOp {lhs: Box::new(lhs), op, rhs: Box::new(rhs), ty, i}
    }
}

pub fn fold_expr(e: Expr) -> Expr {
    match e {
        Expr::UnOp {op, arg, ty, i} => {
            let arg = fold_expr(*arg);
            fold_unop(op, arg, ty, i)
        },
        Expr::BinOp {lhs, op, rhs, ty, i} => {
            let lhs = fold_expr(*lhs);
            let rhs = fold_expr(*rhs);
            fold_binop(lhs, op, rhs, ty, i)
        },
        _ => e.smap(fold_expr)
    }
}

fn fold_stmt(s: Stmt) -> Stmt {
    let s = <Stmt as SMapAccum<Expr>>::smap(s, fold_expr);
    <Stmt as SMapAccum<Stmt>>::smap(s, fold_stmt)
}

pub fn fold(ast: Ast) -> Ast {
    let defs = ast.defs.into_iter()
        .map(|def| {
            let body = def.body.smap(fold_stmt);
            FunDef {body, ..def}
        })
        .collect();
    Ast {defs}
}
