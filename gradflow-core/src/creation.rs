//! Leaf variable constructors.

use ndarray::{ArrayD, IxDyn, NdFloat};
use rand::distributions::Standard;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::variable::Variable;

/// Creates a leaf variable filled with zeros with the specified shape.
pub fn zeros<A: NdFloat>(shape: &[usize]) -> Variable<A> {
    full(shape, A::zero())
}

/// Creates a leaf variable filled with ones with the specified shape.
pub fn ones<A: NdFloat>(shape: &[usize]) -> Variable<A> {
    full(shape, A::one())
}

pub fn full<A: NdFloat>(shape: &[usize], value: A) -> Variable<A> {
    Variable::new(ArrayD::from_elem(IxDyn(shape), value))
}

/// Samples every element uniformly from `[0, 1)` using the thread RNG.
pub fn rand<A>(shape: &[usize]) -> Variable<A>
where
    A: NdFloat,
    Standard: Distribution<A>,
{
    rand_with_rng(shape, &mut rand::thread_rng())
}

/// Samples every element from the standard normal distribution using the
/// thread RNG.
pub fn randn<A>(shape: &[usize]) -> Variable<A>
where
    A: NdFloat,
    StandardNormal: Distribution<A>,
{
    randn_with_rng(shape, &mut rand::thread_rng())
}

/// [`rand`] with a caller-supplied generator, e.g. a seeded `StdRng`.
pub fn rand_with_rng<A, R>(shape: &[usize], rng: &mut R) -> Variable<A>
where
    A: NdFloat,
    R: Rng + ?Sized,
    Standard: Distribution<A>,
{
    Variable::new(ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.gen::<A>()))
}

/// [`randn`] with a caller-supplied generator.
pub fn randn_with_rng<A, R>(shape: &[usize], rng: &mut R) -> Variable<A>
where
    A: NdFloat,
    R: Rng + ?Sized,
    StandardNormal: Distribution<A>,
{
    Variable::new(ArrayD::from_shape_simple_fn(IxDyn(shape), || {
        StandardNormal.sample(rng)
    }))
}
