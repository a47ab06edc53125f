use crate::ir::ast::*;
use crate::utils::info::Info;
use crate::utils::name::Name;

use std::collections::BTreeMap;

// A linear expression over named index variables plus a constant term. Region bounds, buffer
// offsets and index remaps are all expressions of this form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AffineExpr {
    terms: BTreeMap<Name, i64>,
    k: i64
}

impl AffineExpr {
    pub fn constant(k: i64) -> AffineExpr {
        AffineExpr {terms: BTreeMap::new(), k}
    }

    pub fn var(id: Name) -> AffineExpr {
        let mut terms = BTreeMap::new();
        terms.insert(id, 1);
        AffineExpr {terms, k: 0}
    }

    pub fn coef(&self, id: &Name) -> i64 {
        self.terms.get(id).copied().unwrap_or(0)
    }

    // Removes the term of the given variable, returning its coefficient.
    pub fn remove_term(&mut self, id: &Name) -> i64 {
        self.terms.remove(id).unwrap_or(0)
    }

    pub fn add_const(mut self, c: i64) -> AffineExpr {
        self.k += c;
        self
    }

    pub fn add_scaled(mut self, other: &AffineExpr, c: i64) -> AffineExpr {
        for (id, coef) in &other.terms {
            let entry = self.terms.entry(id.clone()).or_insert(0);
            *entry += coef * c;
            if *entry == 0 {
                self.terms.remove(id);
            }
        }
        self.k += other.k * c;
        self
    }

    pub fn add(self, other: &AffineExpr) -> AffineExpr {
        self.add_scaled(other, 1)
    }

    pub fn sub(self, other: &AffineExpr) -> AffineExpr {
        self.add_scaled(other, -1)
    }

    pub fn scale(mut self, c: i64) -> AffineExpr {
        if c == 0 {
            return AffineExpr::constant(0);
        }
        for coef in self.terms.values_mut() {
            *coef *= c;
        }
        self.k *= c;
        self
    }

    pub fn constant_term(&self) -> i64 {
        self.k
    }

    pub fn get_constant(&self) -> Option<i64> {
        if self.terms.is_empty() {
            Some(self.k)
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.get_constant() == Some(0)
    }

    pub fn support<'a>(&'a self) -> impl Iterator<Item = &'a Name> {
        self.terms.keys()
    }

    // Converts an expression of the IR into affine form, when it is affine. Multiplication is
    // only affine when at least one operand reduces to a constant.
    pub fn from_expr(e: &Expr) -> Option<AffineExpr> {
        match e {
            Expr::Var {id, ..} => Some(AffineExpr::var(id.clone())),
            Expr::Int {v, ..} => Some(AffineExpr::constant(*v)),
            Expr::UnOp {op: UnOp::Sub, arg, ..} => {
                Some(AffineExpr::from_expr(arg)?.scale(-1))
            },
            Expr::BinOp {lhs, op: BinOp::Add, rhs, ..} => {
                Some(AffineExpr::from_expr(lhs)?.add(&AffineExpr::from_expr(rhs)?))
            },
            Expr::BinOp {lhs, op: BinOp::Sub, rhs, ..} => {
                Some(AffineExpr::from_expr(lhs)?.sub(&AffineExpr::from_expr(rhs)?))
            },
            Expr::BinOp {lhs, op: BinOp::Mul, rhs, ..} => {
                let l = AffineExpr::from_expr(lhs)?;
                let r = AffineExpr::from_expr(rhs)?;
                match (l.get_constant(), r.get_constant()) {
                    (Some(c), _) => Some(r.scale(c)),
                    (_, Some(c)) => Some(l.scale(c)),
                    (None, None) => None
                }
            },
            Expr::Bool {..} | Expr::BinOp {..} | Expr::ArrayAccess {..} => None,
        }
    }

    // Materializes the affine expression as an IR expression over 64-bit indices.
    pub fn to_expr(&self, i: &Info) -> Expr {
        let ty = Type::Scalar {sz: ElemSize::I64};
        let int = |v: i64| Expr::Int {v, ty: ty.clone(), i: i.clone()};
        let mut acc: Option<Expr> = if self.k != 0 {
            Some(int(self.k))
        } else {
            None
        };
        for (id, coef) in &self.terms {
            let v = Expr::Var {id: id.clone(), ty: ty.clone(), i: i.clone()};
            let term = match coef {
                1 => v,
                -1 => Expr::UnOp {
                    op: UnOp::Sub, arg: Box::new(v), ty: ty.clone(), i: i.clone()
                },
                c => Expr::BinOp {
                    lhs: Box::new(int(*c)), op: BinOp::Mul, rhs: Box::new(v),
                    ty: ty.clone(), i: i.clone()
                }
            };
            acc = match acc {
                Some(l) => Some(Expr::BinOp {
                    lhs: Box::new(l), op: BinOp::Add, rhs: Box::new(term),
                    ty: ty.clone(), i: i.clone()
                }),
                None => Some(term)
            };
        }
        acc.unwrap_or_else(|| int(0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::ast_builder::*;

    fn x() -> Name {
        id("x")
    }

    fn y() -> Name {
        id("y")
    }

    #[test]
    fn constant_expr_is_constant() {
        assert_eq!(AffineExpr::constant(4).get_constant(), Some(4));
        assert!(AffineExpr::constant(0).is_zero());
    }

    #[test]
    fn var_expr_is_not_constant() {
        assert_eq!(AffineExpr::var(x()).get_constant(), None);
    }

    #[test]
    fn sub_cancels_terms() {
        let e = AffineExpr::var(x()).sub(&AffineExpr::var(x()));
        assert!(e.is_zero());
    }

    #[test]
    fn from_expr_affine_combination() {
        // 2 * x + (y - 3)
        let e = binop(
            binop(int(2), BinOp::Mul, var("x", int_ty())),
            BinOp::Add,
            binop(var("y", int_ty()), BinOp::Sub, int(3))
        );
        let a = AffineExpr::from_expr(&e).unwrap();
        assert_eq!(a.coef(&x()), 2);
        assert_eq!(a.coef(&y()), 1);
        assert_eq!(a.clone().sub(&a).get_constant(), Some(0));
    }

    #[test]
    fn from_expr_rejects_products_of_variables() {
        let e = binop(var("x", int_ty()), BinOp::Mul, var("y", int_ty()));
        assert!(AffineExpr::from_expr(&e).is_none());
    }

    #[test]
    fn from_expr_rejects_array_access() {
        let e = array_access(slow_array("a", vec![8]), vec![int(0)]);
        assert!(AffineExpr::from_expr(&e).is_none());
    }

    #[test]
    fn to_expr_roundtrips_through_from_expr() {
        let a = AffineExpr::var(x()).scale(3).add(&AffineExpr::constant(-2));
        let e = a.to_expr(&Info::default());
        assert_eq!(AffineExpr::from_expr(&e), Some(a));
    }

    #[test]
    fn to_expr_of_zero_is_literal_zero() {
        assert_eq!(AffineExpr::constant(0).to_expr(&Info::default()), int(0));
    }
}
