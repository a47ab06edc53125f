use crate::ir::affine::AffineExpr;
use crate::utils::name::Name;

// One inequality of the form dims . x + ids . y + k >= 0, where x are the array dimensions of a
// region and y are the index variables and symbols visible outside the candidate loop.
#[derive(Clone, Debug, PartialEq)]
struct Ineq {
    dims: Vec<i64>,
    ids: Vec<i64>,
    k: i64
}

// A conjunction of inequalities bounding the indices of one array that a memory access may reach.
// The columns are laid out as [array dimensions | outer ids | constant].
#[derive(Clone, Debug, PartialEq)]
pub struct IndexConstraints {
    rank: usize,
    ids: Vec<Name>,
    ineqs: Vec<Ineq>
}

impl IndexConstraints {
    pub fn new(rank: usize, ids: Vec<Name>) -> IndexConstraints {
        IndexConstraints {rank, ids, ineqs: vec![]}
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn ids<'a>(&'a self) -> &'a Vec<Name> {
        &self.ids
    }

    fn id_coefs(&self, e: &AffineExpr) -> Vec<i64> {
        self.ids.iter().map(|id| e.coef(id)).collect()
    }

    // Adds the inequality x_d >= lb, where lb ranges over the outer ids.
    pub fn add_lower_bound(&mut self, d: usize, lb: &AffineExpr) {
        let mut dims = vec![0; self.rank];
        dims[d] = 1;
        let ids = self.id_coefs(lb).into_iter().map(|c| -c).collect();
        let k = -lb.constant_term();
        self.ineqs.push(Ineq {dims, ids, k});
    }

    // Adds the inequality x_d <= ub (inclusive), where ub ranges over the outer ids.
    pub fn add_upper_bound(&mut self, d: usize, ub: &AffineExpr) {
        let mut dims = vec![0; self.rank];
        dims[d] = -1;
        let ids = self.id_coefs(ub);
        let k = ub.constant_term();
        self.ineqs.push(Ineq {dims, ids, k});
    }

    fn bound_rows(&self, d: usize, sign: i64) -> impl Iterator<Item = &Ineq> {
        self.ineqs.iter().filter(move |r| {
            r.dims[d] * sign > 0 && r.dims.iter().enumerate().all(|(j, c)| j == d || *c == 0)
        })
    }

    // The tightest lower-bound row for dimension d. When several rows bound the dimension with
    // identical id coefficients, the largest lower bound wins.
    fn tightest_lower_bound_row(&self, d: usize) -> Option<&Ineq> {
        self.bound_rows(d, 1).fold(None, |best: Option<&Ineq>, r| {
            match best {
                Some(b) if b.ids == r.ids && r.k < b.k => Some(r),
                Some(b) => Some(b),
                None => Some(r)
            }
        })
    }

    // The lower bound of dimension d as an affine expression over the outer ids, read off the
    // tightest lower-bound row. Rows with a non-unit dimension coefficient are not handled.
    pub fn lower_bound(&self, d: usize) -> Option<AffineExpr> {
        let row = self.tightest_lower_bound_row(d)?;
        if row.dims[d] != 1 {
            return None;
        }
        let mut lb = AffineExpr::constant(-row.k);
        for (id, c) in self.ids.iter().zip(row.ids.iter()) {
            lb = lb.add_scaled(&AffineExpr::var(id.clone()), -c);
        }
        Some(lb)
    }

    // The compile-time constant extent of dimension d, i.e. the difference between its upper and
    // lower bound rows when their id coefficients cancel out.
    pub fn constant_extent(&self, d: usize) -> Option<i64> {
        let lb = self.tightest_lower_bound_row(d)?;
        if lb.dims[d] != 1 {
            return None;
        }
        self.bound_rows(d, -1)
            .filter(|ub| {
                ub.dims[d] == -1 &&
                    lb.ids.iter().zip(ub.ids.iter()).all(|(l, u)| l + u == 0)
            })
            .map(|ub| (lb.k + ub.k + 1).max(0))
            .min()
    }

    pub fn constant_shape(&self) -> Option<Vec<i64>> {
        (0..self.rank()).map(|d| self.constant_extent(d)).collect()
    }

    pub fn constant_size(&self) -> Option<i64> {
        let shape = self.constant_shape()?;
        Some(shape.into_iter().product())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn j() -> Name {
        Name::new("j".to_string())
    }

    // x_0 in [0, 31], x_1 in [j, j + 15]
    fn rect_region() -> IndexConstraints {
        let mut cst = IndexConstraints::new(2, vec![j()]);
        cst.add_lower_bound(0, &AffineExpr::constant(0));
        cst.add_upper_bound(0, &AffineExpr::constant(31));
        cst.add_lower_bound(1, &AffineExpr::var(j()));
        cst.add_upper_bound(1, &AffineExpr::var(j()).add_const(15));
        cst
    }

    #[test]
    fn constant_shape_of_rectangle() {
        let cst = rect_region();
        assert_eq!(cst.constant_shape(), Some(vec![32, 16]));
        assert_eq!(cst.constant_size(), Some(512));
    }

    #[test]
    fn lower_bounds_of_rectangle() {
        let cst = rect_region();
        assert_eq!(cst.lower_bound(0), Some(AffineExpr::constant(0)));
        assert_eq!(cst.lower_bound(1), Some(AffineExpr::var(j())));
    }

    #[test]
    fn symbolic_extent_is_not_constant() {
        // x_0 in [0, n - 1] for a symbolic n
        let n = Name::new("n".to_string());
        let mut cst = IndexConstraints::new(1, vec![n.clone()]);
        cst.add_lower_bound(0, &AffineExpr::constant(0));
        cst.add_upper_bound(0, &AffineExpr::var(n).add_const(-1));
        assert_eq!(cst.constant_extent(0), None);
        assert_eq!(cst.constant_size(), None);
    }

    #[test]
    fn empty_dimension_has_zero_extent() {
        // x_0 in [4, 3]
        let mut cst = IndexConstraints::new(1, vec![]);
        cst.add_lower_bound(0, &AffineExpr::constant(4));
        cst.add_upper_bound(0, &AffineExpr::constant(3));
        assert_eq!(cst.constant_extent(0), Some(0));
        assert_eq!(cst.constant_size(), Some(0));
    }

    #[test]
    fn tightest_lower_bound_wins() {
        let mut cst = IndexConstraints::new(1, vec![]);
        cst.add_lower_bound(0, &AffineExpr::constant(0));
        cst.add_lower_bound(0, &AffineExpr::constant(8));
        cst.add_upper_bound(0, &AffineExpr::constant(15));
        assert_eq!(cst.lower_bound(0), Some(AffineExpr::constant(8)));
        assert_eq!(cst.constant_extent(0), Some(8));
    }
}
