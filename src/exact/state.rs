// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::marker::PhantomData;

use super::buffer::SampleBuffer;
use super::policy::InterpolationPolicy;
use super::policy::Nearest;
use super::policy::Policy;
use super::policy::nearest_index;
use super::value::SampleValue;
use crate::codec::StateBytes;
use crate::codec::StateSlice;
use crate::codec::varuint_len;
use crate::error::Error;

/// Exact quantile aggregate state.
///
/// Collects every sample into one buffer and answers quantile queries by
/// partial selection (introselect) at finalization. Memory is Θ(N) by
/// design; the win is CPU efficiency on small and medium groups.
///
/// The state is a multiset: `add`, `merge`, `serialize` and
/// `deserialize` are insensitive to sample order. A finalize pass
/// permutes the buffer in place so the queried order statistics sit at
/// their sorted positions; the matching `get` then reads them out.
/// Re-finalizing at a different level stays correct because partial
/// selection always operates on the full sample range.
///
/// See the [module level documentation](crate::exact) for more.
#[allow(private_bounds)]
pub struct QuantileExact<T: SampleValue, P: Policy = Nearest> {
    samples: SampleBuffer<T>,
    policy: PhantomData<P>,
}

impl<T: SampleValue + std::fmt::Debug, P: Policy> std::fmt::Debug for QuantileExact<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantileExact")
            .field("samples", &self.samples)
            .finish()
    }
}

impl<T: SampleValue, P: Policy> Clone for QuantileExact<T, P> {
    fn clone(&self) -> Self {
        Self {
            samples: self.samples.clone(),
            policy: PhantomData,
        }
    }
}

#[allow(private_bounds)]
impl<T: SampleValue, P: Policy> QuantileExact<T, P> {
    /// Creates an empty state. Does not allocate; samples up to the
    /// inline capacity live in the state object itself.
    pub fn new() -> Self {
        Self {
            samples: SampleBuffer::new(),
            policy: PhantomData,
        }
    }

    /// Number of retained samples.
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the state has not retained any sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Adds one sample.
    ///
    /// NaN samples are skipped: they have no place in a comparison
    /// order, and admitting one would corrupt every later selection.
    pub fn add(&mut self, value: T) -> Result<(), Error> {
        if T::is_nan(&value) {
            return Ok(());
        }
        self.samples.push(value)
    }

    /// Exact quantiles carry no per-sample weights; this always fails
    /// with [`ErrorKind::NotImplemented`](crate::error::ErrorKind).
    pub fn add_weighted(&mut self, _value: T, _weight: u64) -> Result<(), Error> {
        Err(Error::not_implemented(
            "add with weight is not supported by exact quantile states",
        ))
    }

    /// Merges another state of the same element type and policy into
    /// this one. Commutative and associative, with the empty state as
    /// identity.
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        self.samples.extend_from(&other.samples)
    }

    /// Serializes the state: sample count as a varuint, then the raw
    /// little-endian samples, unpadded. The element type is not tagged;
    /// the reader knows it from the schema.
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = StateBytes::with_capacity(self.serialized_size());
        bytes.write_varuint(self.samples.len() as u64);
        for sample in self.samples.as_slice() {
            T::write_le(*sample, &mut bytes);
        }
        bytes.into_bytes()
    }

    /// Exact size in bytes of [`serialize`](Self::serialize)'s output.
    pub fn serialized_size(&self) -> usize {
        varuint_len(self.samples.len() as u64) + self.samples.len() * T::WIDTH
    }

    /// Deserializes a state from bytes.
    ///
    /// The format is trusted intra-cluster data: samples are not
    /// revalidated against NaN. A count prefix inconsistent with the
    /// available bytes fails with
    /// [`ErrorKind::CannotReadAllData`](crate::error::ErrorKind).
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut cursor = StateSlice::new(bytes);

        let count = cursor
            .read_varuint()
            .map_err(|_| Error::cannot_read_all_data("sample count"))?;
        let count = usize::try_from(count).map_err(|_| {
            Error::memory_limit_exceeded("sample count exceeds address space")
                .with_context("count", count)
        })?;

        let mut state = Self::new();
        state.samples.reserve(count)?;
        for index in 0..count {
            let value = T::read_le(&mut cursor).map_err(|_| {
                Error::cannot_read_all_data(T::TAG)
                    .with_context("count", count)
                    .with_context("index", index)
            })?;
            state.samples.push(value)?;
        }
        Ok(state)
    }

    /// Rearranges the buffer so the `level` quantile can be read out.
    pub fn finalize(&mut self, level: f64) -> Result<(), Error> {
        P::finalize_one(self.samples.as_mut_slice(), level)
    }

    /// Rearranges the buffer for a multi-level query in one pass.
    ///
    /// `indices` must be a permutation of `0..levels.len()` ordering
    /// `levels` ascending; walking the levels in rank order lets every
    /// partial select reuse the sorted prefix the previous one built,
    /// for O(len · log k) expected comparisons overall.
    pub fn finalize_many(&mut self, levels: &[f64], indices: &[usize]) -> Result<(), Error> {
        P::finalize_sorted_levels(self.samples.as_mut_slice(), levels, indices)
    }
}

impl<T: SampleValue, P: Policy> Default for QuantileExact<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(private_bounds)]
impl<T: SampleValue> QuantileExact<T, Nearest> {
    /// Reads the `level` quantile after [`finalize`](Self::finalize)
    /// ran for the same level.
    ///
    /// An empty state yields NaN for float element types and zero for
    /// integer ones; callers that must distinguish an empty group from
    /// a zero quantile track the group count separately.
    pub fn get(&self, level: f64) -> T {
        let samples = self.samples.as_slice();
        if samples.is_empty() {
            return T::empty_value();
        }
        samples[nearest_index(level, samples.len())]
    }

    /// Reads the quantiles of a multi-level query after
    /// [`finalize_many`](Self::finalize_many) ran with the same
    /// arguments. The result for `levels[indices[i]]` is written to
    /// `result[indices[i]]`.
    pub fn get_many(&self, levels: &[f64], indices: &[usize], result: &mut [T]) {
        debug_assert_eq!(levels.len(), indices.len());
        let samples = self.samples.as_slice();
        if samples.is_empty() {
            result.fill(T::empty_value());
            return;
        }
        for &index in indices {
            result[index] = samples[nearest_index(levels[index], samples.len())];
        }
    }
}

#[allow(private_bounds)]
impl<T: SampleValue, P: InterpolationPolicy> QuantileExact<T, P> {
    /// Reads the interpolated `level` quantile after
    /// [`finalize`](Self::finalize) ran for the same level. The return
    /// type is always `f64`, regardless of the element type.
    pub fn get_float(&self, level: f64) -> Result<f64, Error> {
        let samples = self.samples.as_slice();
        if samples.is_empty() {
            return Ok(f64::NAN);
        }
        let h = P::position(level, samples.len())?;
        Ok(interpolate(samples, h))
    }

    /// Reads the interpolated quantiles of a multi-level query after
    /// [`finalize_many`](Self::finalize_many) ran with the same levels
    /// and indices. The result for `levels[indices[i]]` is written to
    /// `result[indices[i]]`.
    pub fn get_many_float(
        &self,
        levels: &[f64],
        indices: &[usize],
        result: &mut [f64],
    ) -> Result<(), Error> {
        debug_assert_eq!(levels.len(), indices.len());
        let samples = self.samples.as_slice();
        if samples.is_empty() {
            result.fill(f64::NAN);
            return Ok(());
        }
        for &index in indices {
            let h = P::position(levels[index], samples.len())?;
            result[index] = interpolate(samples, h);
        }
        Ok(())
    }
}

/// Linear interpolation between the order statistics around real sort
/// position `h`. Assumes a finalize pass placed them; `samples` must be
/// non-empty.
fn interpolate<T: SampleValue>(samples: &[T], h: f64) -> f64 {
    let len = samples.len();
    let n = h as usize;

    if n >= len {
        return T::to_f64(samples[len - 1]);
    }
    if n < 1 {
        return T::to_f64(samples[0]);
    }

    let lower = T::to_f64(samples[n - 1]);
    let upper = T::to_f64(samples[n]);
    lower + (h - n as f64) * (upper - lower)
}
