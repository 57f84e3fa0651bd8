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

//! Sample storage with inline small-object optimization.
//!
//! Per-group states are allocated by the thousands, and most groups see
//! only a handful of rows. The buffer therefore keeps
//! [`INLINE_BYTES`](super::INLINE_BYTES) worth of element slots inside
//! the state object itself and only spills to the heap beyond that, so a
//! small state stays within a single cache line and costs no allocation.
//! Once spilled, storage stays on the heap with doubling growth.

use smallvec::SmallVec;

use super::value::SampleValue;
use crate::error::Error;

/// Contiguous sample storage. Element order is not observable before
/// finalization; any permutation is an equivalent buffer.
pub(crate) struct SampleBuffer<T: SampleValue> {
    samples: SmallVec<T::Inline>,
}

impl<T: SampleValue + std::fmt::Debug> std::fmt::Debug for SampleBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("samples", &self.samples.as_slice())
            .finish()
    }
}

impl<T: SampleValue> Clone for SampleBuffer<T> {
    fn clone(&self) -> Self {
        let mut samples = SmallVec::new();
        samples.extend_from_slice(self.samples.as_slice());
        Self { samples }
    }
}

impl<T: SampleValue> SampleBuffer<T> {
    pub fn new() -> Self {
        Self {
            samples: SmallVec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        self.samples.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.samples.as_mut_slice()
    }

    /// Append one sample. Amortized O(1).
    pub fn push(&mut self, value: T) -> Result<(), Error> {
        self.reserve(1)?;
        self.samples.push(value);
        Ok(())
    }

    /// Append all samples of `other`, preserving `other`.
    pub fn extend_from(&mut self, other: &SampleBuffer<T>) -> Result<(), Error> {
        self.reserve(other.len())?;
        self.samples.extend_from_slice(other.as_slice());
        Ok(())
    }

    /// Make room for `additional` more samples, so that the pushes that
    /// follow cannot fail.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.samples.try_reserve(additional).map_err(|err| {
            Error::memory_limit_exceeded("cannot grow sample buffer")
                .with_context("additional", additional)
                .with_context("len", self.samples.len())
                .with_context("reason", format!("{err:?}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    fn inline_slots<T: SampleValue>() -> usize {
        SmallVec::<T::Inline>::new().inline_size()
    }

    #[test]
    fn test_inline_capacity_matches_budget() {
        assert_eq!(inline_slots::<u8>(), crate::exact::INLINE_BYTES);
        assert_eq!(inline_slots::<u16>(), crate::exact::INLINE_BYTES / 2);
        assert_eq!(inline_slots::<u32>(), crate::exact::INLINE_BYTES / 4);
        assert_eq!(inline_slots::<u64>(), crate::exact::INLINE_BYTES / 8);
        assert_eq!(inline_slots::<i128>(), crate::exact::INLINE_BYTES / 16);
        assert_eq!(inline_slots::<f32>(), crate::exact::INLINE_BYTES / 4);
        assert_eq!(inline_slots::<f64>(), crate::exact::INLINE_BYTES / 8);
    }

    #[test]
    fn test_buffer_fits_cache_line() {
        assert!(mem::size_of::<SampleBuffer<u8>>() <= 64);
        assert!(mem::size_of::<SampleBuffer<u64>>() <= 64);
        assert!(mem::size_of::<SampleBuffer<i128>>() <= 64);
        assert!(mem::size_of::<SampleBuffer<f64>>() <= 64);
    }

    #[test]
    fn test_spill_keeps_samples() {
        let mut buffer = SampleBuffer::<u64>::new();
        for i in 0..16 {
            buffer.push(i).unwrap();
        }
        assert_eq!(buffer.len(), 16);
        let mut samples = buffer.as_slice().to_vec();
        samples.sort_unstable();
        assert_eq!(samples, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_extend_from_preserves_source() {
        let mut left = SampleBuffer::<i32>::new();
        let mut right = SampleBuffer::<i32>::new();
        left.push(1).unwrap();
        right.push(2).unwrap();
        right.push(3).unwrap();
        left.extend_from(&right).unwrap();
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 2);
    }
}
