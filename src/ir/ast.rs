use crate::utils::info::*;
use crate::utils::name::Name;
use crate::utils::smap::{SFold, SMapAccum};

use strum_macros::EnumIter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
pub enum ElemSize {
    #[default] Bool, I8, I16, I32, I64, U8, U16, U32, U64, F16, F32, F64
}

impl ElemSize {
    pub fn size_bytes(&self) -> i64 {
        match self {
            ElemSize::Bool | ElemSize::I8 | ElemSize::U8 => 1,
            ElemSize::I16 | ElemSize::U16 | ElemSize::F16 => 2,
            ElemSize::I32 | ElemSize::U32 | ElemSize::F32 => 4,
            ElemSize::I64 | ElemSize::U64 | ElemSize::F64 => 8,
        }
    }
}

// An integer tag identifying one of the addressable memories of the target. The transfer
// generation pass is configured with a slow and a fast memory space tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemSpace(pub u32);

impl Default for MemSpace {
    fn default() -> MemSpace {
        MemSpace(0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Scalar {sz: ElemSize},
    Array {sz: ElemSize, shape: Vec<i64>, mem: MemSpace},
}

impl Type {
    pub fn get_elem_size<'a>(&'a self) -> &'a ElemSize {
        match self {
            Type::Scalar {sz} => sz,
            Type::Array {sz, ..} => sz,
        }
    }

    pub fn get_mem_space(&self) -> Option<MemSpace> {
        match self {
            Type::Scalar {..} => None,
            Type::Array {mem, ..} => Some(*mem),
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            Type::Scalar {..} => 0,
            Type::Array {shape, ..} => shape.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum UnOp {
    #[default] Sub
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum BinOp {
    #[default] Add, Sub, Mul, Div, Rem,
    Eq, Neq, Lt, Leq, Gt, Geq
}

#[derive(Clone, Debug)]
pub enum Expr {
    Var {id: Name, ty: Type, i: Info},
    Bool {v: bool, ty: Type, i: Info},
    Int {v: i64, ty: Type, i: Info},
    UnOp {op: UnOp, arg: Box<Expr>, ty: Type, i: Info},
    BinOp {lhs: Box<Expr>, op: BinOp, rhs: Box<Expr>, ty: Type, i: Info},

    // A multi-dimensional access into a named array. In expression position this is a load; as the
    // destination of an assignment it is a store. The target is a variable carrying the array
    // type, and the type of the access itself is the scalar element type.
    ArrayAccess {target: Box<Expr>, indices: Vec<Expr>, ty: Type, i: Info},
}

impl Expr {
    pub fn get_type<'a>(&'a self) -> &'a Type {
        match self {
            Expr::Var {ty, ..} => ty,
            Expr::Bool {ty, ..} => ty,
            Expr::Int {ty, ..} => ty,
            Expr::UnOp {ty, ..} => ty,
            Expr::BinOp {ty, ..} => ty,
            Expr::ArrayAccess {ty, ..} => ty,
        }
    }

    pub fn get_int_value(&self) -> Option<i64> {
        match self {
            Expr::Int {v, ..} => Some(*v),
            _ => None
        }
    }
}

impl InfoNode for Expr {
    fn get_info(&self) -> Info {
        match self {
            Expr::Var {i, ..} => i.clone(),
            Expr::Bool {i, ..} => i.clone(),
            Expr::Int {i, ..} => i.clone(),
            Expr::UnOp {i, ..} => i.clone(),
            Expr::BinOp {i, ..} => i.clone(),
            Expr::ArrayAccess {i, ..} => i.clone(),
        }
    }
}

// Structural equality, ignoring types and info fields. This is what tests and the use rewriter
// care about when comparing index expressions.
impl PartialEq for Expr {
    fn eq(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Var {id: lid, ..}, Expr::Var {id: rid, ..}) => lid.eq(rid),
            (Expr::Bool {v: lv, ..}, Expr::Bool {v: rv, ..}) => lv.eq(rv),
            (Expr::Int {v: lv, ..}, Expr::Int {v: rv, ..}) => lv.eq(rv),
            ( Expr::UnOp {op: lop, arg: larg, ..}
            , Expr::UnOp {op: rop, arg: rarg, ..} ) =>
                lop.eq(rop) && larg.eq(rarg),
            ( Expr::BinOp {lhs: llhs, op: lop, rhs: lrhs, ..}
            , Expr::BinOp {lhs: rlhs, op: rop, rhs: rrhs, ..} ) =>
                llhs.eq(rlhs) && lop.eq(rop) && lrhs.eq(rrhs),
            ( Expr::ArrayAccess {target: lt, indices: li, ..}
            , Expr::ArrayAccess {target: rt, indices: ri, ..} ) =>
                lt.eq(rt) && li.eq(ri),
            (_, _) => false
        }
    }
}

impl SMapAccum<Expr> for Expr {
    fn smap_accum_l_result<A, E>(
        self,
        acc: Result<A, E>,
        f: impl Fn(A, Expr) -> Result<(A, Expr), E>
    ) -> Result<(A, Expr), E> {
        match self {
            Expr::UnOp {op, arg, ty, i} => {
                let (acc, arg) = f(acc?, *arg)?;
                Ok((acc, Expr::UnOp {op, arg: Box::new(arg), ty, i}))
            },
            Expr::BinOp {lhs, op, rhs, ty, i} => {
                let (acc, lhs) = f(acc?, *lhs)?;
                let (acc, rhs) = f(acc, *rhs)?;
                Ok((acc, Expr::BinOp {
                    lhs: Box::new(lhs), op, rhs: Box::new(rhs), ty, i
                }))
            },
            Expr::ArrayAccess {target, indices, ty, i} => {
                let (acc, target) = f(acc?, *target)?;
                let (acc, indices) = indices.smap_accum_l_result(Ok(acc), &f)?;
                Ok((acc, Expr::ArrayAccess {
                    target: Box::new(target), indices, ty, i
                }))
            },
            Expr::Var {..} | Expr::Bool {..} | Expr::Int {..} => Ok((acc?, self)),
        }
    }
}

impl SFold<Expr> for Expr {
    fn sfold_result<A, E>(
        &self,
        acc: Result<A, E>,
        f: impl Fn(A, &Expr) -> Result<A, E>
    ) -> Result<A, E> {
        match self {
            Expr::UnOp {arg, ..} => f(acc?, arg),
            Expr::BinOp {lhs, rhs, ..} => f(f(acc?, lhs)?, rhs),
            Expr::ArrayAccess {target, indices, ..} => {
                indices.sfold_result(f(acc?, target), &f)
            },
            Expr::Var {..} | Expr::Bool {..} | Expr::Int {..} => acc,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Definition {ty: Type, id: Name, expr: Expr, i: Info},
    Assign {dst: Expr, expr: Expr, i: Info},
    For {var: Name, lo: Expr, hi: Expr, step: i64, body: Vec<Stmt>, i: Info},
    If {cond: Expr, thn: Vec<Stmt>, els: Vec<Stmt>, i: Info},

    // Allocation of a fresh array, placed in the memory space of its type.
    Alloc {id: Name, ty: Type, i: Info},

    // Starts an asynchronous bulk copy of 'elems' elements from the source location to the
    // destination location. The single-element tag array correlates the start with its wait.
    TransferStart {src: Expr, dst: Expr, elems: Expr, tag: Expr, i: Info},

    // Blocks until the transfer identified by the tag has completed.
    TransferWait {tag: Expr, elems: Expr, i: Info},
}

impl InfoNode for Stmt {
    fn get_info(&self) -> Info {
        match self {
            Stmt::Definition {i, ..} => i.clone(),
            Stmt::Assign {i, ..} => i.clone(),
            Stmt::For {i, ..} => i.clone(),
            Stmt::If {i, ..} => i.clone(),
            Stmt::Alloc {i, ..} => i.clone(),
            Stmt::TransferStart {i, ..} => i.clone(),
            Stmt::TransferWait {i, ..} => i.clone(),
        }
    }
}

impl SMapAccum<Expr> for Stmt {
    fn smap_accum_l_result<A, E>(
        self,
        acc: Result<A, E>,
        f: impl Fn(A, Expr) -> Result<(A, Expr), E>
    ) -> Result<(A, Self), E> {
        match self {
            Stmt::Definition {ty, id, expr, i} => {
                let (acc, expr) = f(acc?, expr)?;
                Ok((acc, Stmt::Definition {ty, id, expr, i}))
            },
            Stmt::Assign {dst, expr, i} => {
                let (acc, dst) = f(acc?, dst)?;
                let (acc, expr) = f(acc, expr)?;
                Ok((acc, Stmt::Assign {dst, expr, i}))
            },
            Stmt::For {var, lo, hi, step, body, i} => {
                let (acc, lo) = f(acc?, lo)?;
                let (acc, hi) = f(acc, hi)?;
                Ok((acc, Stmt::For {var, lo, hi, step, body, i}))
            },
            Stmt::If {cond, thn, els, i} => {
                let (acc, cond) = f(acc?, cond)?;
                Ok((acc, Stmt::If {cond, thn, els, i}))
            },
            Stmt::TransferStart {src, dst, elems, tag, i} => {
                let (acc, src) = f(acc?, src)?;
                let (acc, dst) = f(acc, dst)?;
                let (acc, elems) = f(acc, elems)?;
                let (acc, tag) = f(acc, tag)?;
                Ok((acc, Stmt::TransferStart {src, dst, elems, tag, i}))
            },
            Stmt::TransferWait {tag, elems, i} => {
                let (acc, tag) = f(acc?, tag)?;
                let (acc, elems) = f(acc, elems)?;
                Ok((acc, Stmt::TransferWait {tag, elems, i}))
            },
            Stmt::Alloc {..} => Ok((acc?, self)),
        }
    }
}

impl SFold<Expr> for Stmt {
    fn sfold_result<A, E>(
        &self,
        acc: Result<A, E>,
        f: impl Fn(A, &Expr) -> Result<A, E>
    ) -> Result<A, E> {
        match self {
            Stmt::Definition {expr, ..} => f(acc?, expr),
            Stmt::Assign {dst, expr, ..} => f(f(acc?, dst)?, expr),
            Stmt::For {lo, hi, ..} => f(f(acc?, lo)?, hi),
            Stmt::If {cond, ..} => f(acc?, cond),
            Stmt::TransferStart {src, dst, elems, tag, ..} => {
                f(f(f(f(acc?, src)?, dst)?, elems)?, tag)
            },
            Stmt::TransferWait {tag, elems, ..} => f(f(acc?, tag)?, elems),
            Stmt::Alloc {..} => acc,
        }
    }
}

impl SMapAccum<Stmt> for Stmt {
    fn smap_accum_l_result<A, E>(
        self,
        acc: Result<A, E>,
        f: impl Fn(A, Stmt) -> Result<(A, Stmt), E>
    ) -> Result<(A, Self), E> {
        match self {
            Stmt::For {var, lo, hi, step, body, i} => {
                let (acc, body) = body.smap_accum_l_result(acc, &f)?;
                Ok((acc, Stmt::For {var, lo, hi, step, body, i}))
            },
            Stmt::If {cond, thn, els, i} => {
                let (acc, thn) = thn.smap_accum_l_result(acc, &f)?;
                let (acc, els) = els.smap_accum_l_result(Ok(acc), &f)?;
                Ok((acc, Stmt::If {cond, thn, els, i}))
            },
            Stmt::Definition {..} | Stmt::Assign {..} | Stmt::Alloc {..} |
            Stmt::TransferStart {..} | Stmt::TransferWait {..} => {
                Ok((acc?, self))
            }
        }
    }
}

impl SFold<Stmt> for Stmt {
    fn sfold_result<A, E>(
        &self,
        acc: Result<A, E>,
        f: impl Fn(A, &Stmt) -> Result<A, E>
    ) -> Result<A, E> {
        match self {
            Stmt::For {body, ..} => body.sfold_result(acc, &f),
            Stmt::If {thn, els, ..} => els.sfold_result(thn.sfold_result(acc, &f), &f),
            Stmt::Definition {..} | Stmt::Assign {..} | Stmt::Alloc {..} |
            Stmt::TransferStart {..} | Stmt::TransferWait {..} => acc,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub id: Name,
    pub ty: Type,
    pub i: Info
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunDef {
    pub id: Name,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub i: Info
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ast {
    pub defs: Vec<FunDef>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::ast_builder::*;

    use strum::IntoEnumIterator;

    #[test]
    fn all_element_sizes_have_a_byte_width() {
        for sz in ElemSize::iter() {
            assert!(sz.size_bytes() > 0);
        }
    }

    #[test]
    fn structural_equality_ignores_positions() {
        let l = var("x", int_ty());
        let r = Expr::Var {
            id: Name::new("x".to_string()),
            ty: scalar(ElemSize::F32),
            i: Info::new("f.src", FilePos::new(3, 1), FilePos::new(3, 2))
        };
        assert_eq!(l, r);
    }

    #[test]
    fn smap_rewrites_immediate_subexpressions_only() {
        let e = binop(int(1), BinOp::Add, binop(int(2), BinOp::Mul, int(3)));
        let negate = |e| match e {
            Expr::Int {v, ty, i} => Expr::Int {v: -v, ty, i},
            e => e
        };
        let e = e.smap(negate);
        let expected = binop(int(-1), BinOp::Add, binop(int(2), BinOp::Mul, int(3)));
        assert_eq!(e, expected);
    }

    #[test]
    fn sfold_visits_loop_bounds_and_body_expressions() {
        let s = for_loop(id("i"), int(2), int(7), 1, vec![
            definition(int_ty(), id("x"), int(5))
        ]);
        let sum_ints = |acc: i64, e: &Expr| match e {
            Expr::Int {v, ..} => acc + v,
            _ => acc
        };
        let acc = <Stmt as SFold<Expr>>::sfold(&s, 0, sum_ints);
        let acc = <Stmt as SFold<Stmt>>::sfold(&s, acc, |acc, s| {
            <Stmt as SFold<Expr>>::sfold(s, acc, sum_ints)
        });
        assert_eq!(acc, 14);
    }
}
