// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Combiner, DispatchError, Max, Min, Prod, ReduceValue, Sum};

/// Combiner plus the seed the final value is folded into
#[derive(Debug, Clone)]
pub struct Reduction<T, C> {
    combiner: C,
    seed: T,
}

impl<T, C> Reduction<T, C>
where
    T: PartialEq + std::fmt::Debug,
    C: Combiner<T>,
{
    /// Reduction seeded with the combiner identity
    pub fn new(combiner: C) -> Self {
        let seed = combiner.identity();
        Self { combiner, seed }
    }

    /// Reduction with an explicit seed, which must equal the combiner identity
    pub fn with_seed(combiner: C, seed: T) -> Result<Self, DispatchError> {
        let identity = combiner.identity();
        if seed != identity {
            return Err(DispatchError::Configuration(format!(
                "{} reduction expects seed {:?}, got {:?}",
                combiner.name(),
                identity,
                seed
            )));
        }
        Ok(Self { combiner, seed })
    }

    pub fn combiner(&self) -> &C {
        &self.combiner
    }

    pub fn seed(&self) -> &T {
        &self.seed
    }

    pub(crate) fn into_parts(self) -> (C, T) {
        (self.combiner, self.seed)
    }
}

impl<T: ReduceValue> Reduction<T, Sum> {
    pub fn sum() -> Self {
        Self::new(Sum)
    }
}

impl<T: ReduceValue> Reduction<T, Prod> {
    pub fn prod() -> Self {
        Self::new(Prod)
    }
}

impl<T: ReduceValue> Reduction<T, Max> {
    pub fn max() -> Self {
        Self::new(Max)
    }
}

impl<T: ReduceValue> Reduction<T, Min> {
    pub fn min() -> Self {
        Self::new(Min)
    }
}
