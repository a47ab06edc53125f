use crate::ir::ast::*;
use crate::utils::info::*;
use crate::utils::name::Name;

pub fn id(x: &str) -> Name {
    Name::new(x.to_string())
}

pub fn int_ty() -> Type {
    Type::Scalar {sz: ElemSize::I64}
}

pub fn scalar(sz: ElemSize) -> Type {
    Type::Scalar {sz}
}

pub fn array_ty_sz(sz: ElemSize, shape: Vec<i64>, mem: MemSpace) -> Type {
    Type::Array {sz, shape, mem}
}

pub fn array_ty(shape: Vec<i64>, mem: MemSpace) -> Type {
    array_ty_sz(ElemSize::F32, shape, mem)
}

pub fn var(v: &str, ty: Type) -> Expr {
    let id = Name::new(v.to_string());
    Expr::Var {id, ty, i: Info::default()}
}

// An array variable living in the slow memory space 0.
pub fn slow_array(v: &str, shape: Vec<i64>) -> Expr {
    var(v, array_ty(shape, MemSpace(0)))
}

// An array variable living in the fast memory space 1.
pub fn fast_array(v: &str, shape: Vec<i64>) -> Expr {
    var(v, array_ty(shape, MemSpace(1)))
}

pub fn int(v: i64) -> Expr {
    Expr::Int {v, ty: int_ty(), i: Info::default()}
}

pub fn binop(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
    let ty = lhs.get_type().clone();
    let i = lhs.get_info();
    Expr::BinOp {lhs: Box::new(lhs), op, rhs: Box::new(rhs), ty, i}
}

pub fn array_access(target: Expr, indices: Vec<Expr>) -> Expr {
    let ty = Type::Scalar {sz: *target.get_type().get_elem_size()};
    Expr::ArrayAccess {
        target: Box::new(target), indices, ty, i: Info::default()
    }
}

pub fn assign(dst: Expr, expr: Expr) -> Stmt {
    Stmt::Assign {dst, expr, i: Info::default()}
}

pub fn definition(ty: Type, id: Name, expr: Expr) -> Stmt {
    Stmt::Definition {ty, id, expr, i: Info::default()}
}

pub fn for_loop(var: Name, lo: Expr, hi: Expr, step: i64, body: Vec<Stmt>) -> Stmt {
    Stmt::For {var, lo, hi, step, body, i: Info::default()}
}

pub fn if_cond(cond: Expr, thn: Vec<Stmt>, els: Vec<Stmt>) -> Stmt {
    Stmt::If {cond, thn, els, i: Info::default()}
}

pub fn param(v: &str, ty: Type) -> Param {
    Param {id: id(v), ty, i: Info::default()}
}

pub fn fun_def(params: Vec<Param>, body: Vec<Stmt>) -> FunDef {
    FunDef {
        id: Name::new("main".to_string()),
        params,
        body,
        i: Info::default()
    }
}

pub fn ast(params: Vec<Param>, body: Vec<Stmt>) -> Ast {
    Ast {defs: vec![fun_def(params, body)]}
}
