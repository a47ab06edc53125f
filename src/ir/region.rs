use crate::ir::affine::AffineExpr;
use crate::ir::ast::*;
use crate::ir::constraints::IndexConstraints;
use crate::utils::name::Name;

use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AccessDir {
    Read,
    Write
}

impl AccessDir {
    pub fn is_write(&self) -> bool {
        match self {
            AccessDir::Read => false,
            AccessDir::Write => true
        }
    }
}

// The compile-time footprint of one memory access across all iterations of the loops it is
// nested inside, down to the candidate loop. The constraint system bounds the reachable indices
// in terms of the induction variables and symbols outside the candidate loop.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub array: Name,
    pub arr_ty: Type,
    pub dir: AccessDir,
    pub rank: usize,
    pub cst: IndexConstraints,
}

// A counted loop whose induction variable is eliminated when computing a region. The loops are
// ordered outermost first, starting at the candidate loop; everything above the candidate loop
// stays symbolic in the region's bounds.
#[derive(Clone, Debug)]
pub struct LoopRange {
    pub var: Name,
    pub lo: Expr,
    pub hi: Expr,
    pub step: i64
}

// Reasons the footprint of an access cannot be derived. All of them are local to one access; the
// access is left untouched on the original array.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionError {
    NonAffineIndex,
    NonAffineBound,
    RankMismatch {expected: usize, found: usize},
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegionError::NonAffineIndex =>
                write!(f, "access index is not affine"),
            RegionError::NonAffineBound =>
                write!(f, "enclosing loop bound is not affine"),
            RegionError::RankMismatch {expected, found} =>
                write!(f, "access rank {found} does not match array rank {expected}"),
        }
    }
}

// The inclusive range an index expression spans when the given loop variables run over their
// bounds. Elimination goes innermost first, so bounds referring to outer eliminated variables
// are substituted in turn.
fn index_range(
    idx: &AffineExpr,
    bounds: &[(Name, AffineExpr, AffineExpr)]
) -> (AffineExpr, AffineExpr) {
    let mut lb = idx.clone();
    let mut ub = idx.clone();
    for (var, lo, last) in bounds.iter().rev() {
        let a = lb.remove_term(var);
        if a > 0 {
            lb = lb.add_scaled(lo, a);
        } else if a < 0 {
            lb = lb.add_scaled(last, a);
        }
        let a = ub.remove_term(var);
        if a > 0 {
            ub = ub.add_scaled(last, a);
        } else if a < 0 {
            ub = ub.add_scaled(lo, a);
        }
    }
    (lb, ub)
}

// Computes the region of one access at the depth of the candidate loop. The 'inner' slice holds
// the loops enclosing the access from the candidate loop inward; their induction variables are
// eliminated from the bounds, leaving an exact rectangular footprint over the outer ids.
pub fn compute_region(
    array: Name,
    arr_ty: &Type,
    indices: &[Expr],
    dir: AccessDir,
    inner: &[LoopRange]
) -> Result<Region, RegionError> {
    let rank = arr_ty.rank();
    if indices.len() != rank {
        return Err(RegionError::RankMismatch {expected: rank, found: indices.len()});
    }
    let bounds = inner.iter()
        .map(|l| {
            let lo = AffineExpr::from_expr(&l.lo).ok_or(RegionError::NonAffineBound)?;
            let hi = AffineExpr::from_expr(&l.hi).ok_or(RegionError::NonAffineBound)?;
            Ok((l.var.clone(), lo, hi.add_const(-1)))
        })
        .collect::<Result<Vec<_>, RegionError>>()?;
    let ranges = indices.iter()
        .map(|idx| {
            let idx = AffineExpr::from_expr(idx).ok_or(RegionError::NonAffineIndex)?;
            Ok(index_range(&idx, &bounds))
        })
        .collect::<Result<Vec<_>, RegionError>>()?;
    let ids = ranges.iter()
        .flat_map(|(lb, ub)| lb.support().chain(ub.support()))
        .cloned()
        .collect::<BTreeSet<Name>>();
    let mut cst = IndexConstraints::new(rank, ids.into_iter().collect());
    for (d, (lb, ub)) in ranges.iter().enumerate() {
        cst.add_lower_bound(d, lb);
        cst.add_upper_bound(d, ub);
    }
    Ok(Region {array, arr_ty: arr_ty.clone(), dir, rank, cst})
}
