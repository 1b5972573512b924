// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Primitive numeric values the built-in combiners operate on
pub trait ReduceValue: Copy + PartialEq + PartialOrd + std::fmt::Debug + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    /// Smallest value, identity of [`Max`]
    const LOWEST: Self;
    /// Largest value, identity of [`Min`]
    const HIGHEST: Self;

    fn add(self, other: Self) -> Self;
    fn mul(self, other: Self) -> Self;
}

macro_rules! impl_reduce_value_int {
    ($($t:ty),*) => {
        $(
            impl ReduceValue for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const LOWEST: Self = <$t>::MIN;
                const HIGHEST: Self = <$t>::MAX;

                fn add(self, other: Self) -> Self {
                    self + other
                }

                fn mul(self, other: Self) -> Self {
                    self * other
                }
            }
        )*
    };
}

macro_rules! impl_reduce_value_float {
    ($($t:ty),*) => {
        $(
            impl ReduceValue for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;
                const LOWEST: Self = <$t>::NEG_INFINITY;
                const HIGHEST: Self = <$t>::INFINITY;

                fn add(self, other: Self) -> Self {
                    self + other
                }

                fn mul(self, other: Self) -> Self {
                    self * other
                }
            }
        )*
    };
}

impl_reduce_value_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_reduce_value_float!(f32, f64);

/// Associative, commutative join used to merge worker partials and scan prefixes
pub trait Combiner<T>: Send + Sync {
    /// Neutral element every worker partial starts from
    fn identity(&self) -> T;

    fn join(&self, accumulator: &mut T, value: T);

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sum;

impl<T: ReduceValue> Combiner<T> for Sum {
    fn identity(&self) -> T {
        T::ZERO
    }

    fn join(&self, accumulator: &mut T, value: T) {
        *accumulator = accumulator.add(value);
    }

    fn name(&self) -> &'static str {
        "sum"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prod;

impl<T: ReduceValue> Combiner<T> for Prod {
    fn identity(&self) -> T {
        T::ONE
    }

    fn join(&self, accumulator: &mut T, value: T) {
        *accumulator = accumulator.mul(value);
    }

    fn name(&self) -> &'static str {
        "prod"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Max;

impl<T: ReduceValue> Combiner<T> for Max {
    fn identity(&self) -> T {
        T::LOWEST
    }

    fn join(&self, accumulator: &mut T, value: T) {
        if value > *accumulator {
            *accumulator = value;
        }
    }

    fn name(&self) -> &'static str {
        "max"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Min;

impl<T: ReduceValue> Combiner<T> for Min {
    fn identity(&self) -> T {
        T::HIGHEST
    }

    fn join(&self, accumulator: &mut T, value: T) {
        if value < *accumulator {
            *accumulator = value;
        }
    }

    fn name(&self) -> &'static str {
        "min"
    }
}
