// Structural mapping and folding over the immediate children of an IR node. Each AST type
// implements these for its child relation (expressions in expressions, expressions in statements,
// statements in statements), so that transforms only spell out the interesting cases.

pub trait SMapAccum<T: Clone> {
    fn smap_accum_l_result<A, E>(
        self,
        acc: Result<A, E>,
        f: impl Fn(A, T) -> Result<(A, T), E>
    ) -> Result<(A, Self), E> where Self: Sized;

    fn smap_accum_l<A>(self, acc: A, f: impl Fn(A, T) -> (A, T)) -> (A, Self) where Self: Sized {
        self.smap_accum_l_result(Ok(acc), |acc, t| Ok::<(A, T), ()>(f(acc, t)))
            .unwrap()
    }

    fn smap_result<E>(
        self,
        f: impl Fn(T) -> Result<T, E>
    ) -> Result<Self, E> where Self: Sized {
        let (_, t) = self.smap_accum_l_result(Ok(()), |_, t| Ok(((), f(t)?)))?;
        Ok(t)
    }

    fn smap(self, f: impl Fn(T) -> T) -> Self where Self: Sized {
        let (_, res) = self.smap_accum_l::<()>((), |_, x| ((), f(x)));
        res
    }
}

pub trait SFold<T: Clone> {
    fn sfold_result<A, E>(
        &self,
        acc: Result<A, E>,
        f: impl Fn(A, &T) -> Result<A, E>
    ) -> Result<A, E> where Self: Sized;

    fn sfold<A>(&self, acc: A, f: impl Fn(A, &T) -> A) -> A where Self: Sized {
        self.sfold_result(Ok(acc), |acc, t| Ok::<A, ()>(f(acc, t))).unwrap()
    }
}

// Flattening map over statements, used by transforms that replace one statement by a sequence of
// statements. The callback receives the accumulated statement list and pushes its rewrites.
pub trait SFlatten<T: Clone> {
    fn sflatten_result<E>(
        self,
        acc: Result<Vec<T>, E>,
        f: impl Fn(Vec<T>, T) -> Result<Vec<T>, E>
    ) -> Result<Vec<T>, E> where Self: Sized;

    fn sflatten(self, acc: Vec<T>, f: impl Fn(Vec<T>, T) -> Vec<T>) -> Vec<T> where Self: Sized {
        self.sflatten_result(Ok(acc), |acc, t| Ok::<Vec<T>, ()>(f(acc, t)))
            .unwrap()
    }
}

impl<T: Clone> SMapAccum<T> for Vec<T> {
    fn smap_accum_l_result<A, E>(
        self,
        acc: Result<A, E>,
        f: impl Fn(A, T) -> Result<(A, T), E>
    ) -> Result<(A, Self), E> {
        self.into_iter()
            .fold(Ok((acc?, vec![])), |acc, x| {
                let (acc, mut elems) = acc?;
                let (acc, x) = f(acc, x)?;
                elems.push(x);
                Ok((acc, elems))
            })
    }
}

impl<T: Clone> SMapAccum<T> for Option<Box<T>> {
    fn smap_accum_l_result<A, E>(
        self,
        acc: Result<A, E>,
        f: impl Fn(A, T) -> Result<(A, T), E>
    ) -> Result<(A, Self), E> {
        match self {
            Some(e) => {
                let (acc, e) = f(acc?, *e)?;
                Ok((acc, Some(Box::new(e))))
            },
            None => Ok((acc?, None))
        }
    }
}

impl<T: Clone> SFold<T> for Vec<T> {
    fn sfold_result<A, E>(
        &self,
        acc: Result<A, E>,
        f: impl Fn(A, &T) -> Result<A, E>
    ) -> Result<A, E> {
        self.iter().fold(acc, |acc, t| f(acc?, t))
    }
}

impl<T: Clone> SFold<T> for Option<Box<T>> {
    fn sfold_result<A, E>(
        &self,
        acc: Result<A, E>,
        f: impl Fn(A, &T) -> Result<A, E>
    ) -> Result<A, E> {
        match self {
            Some(e) => f(acc?, e),
            None => acc
        }
    }
}

impl<T: Clone> SFlatten<T> for Vec<T> {
    fn sflatten_result<E>(
        self,
        acc: Result<Vec<T>, E>,
        f: impl Fn(Vec<T>, T) -> Result<Vec<T>, E>
    ) -> Result<Vec<T>, E> {
        self.into_iter().fold(acc, |acc, t| f(acc?, t))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn smap_vec_applies_in_order() {
        let v = vec![1, 2, 3];
        let (sum, v) = v.smap_accum_l(0, |acc, x| (acc + x, x * 2));
        assert_eq!(sum, 6);
        assert_eq!(v, vec![2, 4, 6]);
    }

    #[test]
    fn sfold_vec_accumulates() {
        let v = vec![1, 2, 3];
        assert_eq!(v.sfold(0, |acc, x| acc + x), 6);
    }

    #[test]
    fn sflatten_vec_expands() {
        let v = vec![1, 2];
        let r = v.sflatten(vec![], |mut acc, x| {
            acc.push(x);
            acc.push(x);
            acc
        });
        assert_eq!(r, vec![1, 1, 2, 2]);
    }
}
