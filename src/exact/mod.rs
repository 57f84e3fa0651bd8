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

//! Exact quantile aggregate states.
//!
//! The exact family materializes every sample and answers order
//! statistic queries by partial selection. It uses O(N) memory, but is
//! very CPU efficient for small and medium groups, which dominate
//! grouped aggregation.
//!
//! Three conventions share the accumulator and the sample buffer:
//!
//! - [`QuantileExact`] (nearest rank, the default): returns an element
//!   of the input, no interpolation.
//! - [`QuantileExactExclusive`]: Excel `PERCENTILE.EXC` / R-6 /
//!   SciPy-(0,0) linear interpolation; levels 0 and 1 are rejected.
//! - [`QuantileExactInclusive`]: Excel `PERCENTILE.INC` / R-7 /
//!   SciPy-(1,1) linear interpolation; levels 0 and 1 yield the
//!   minimum and maximum.
//!
//! A query runs `finalize` (or `finalize_many` for several levels at
//! once) and then reads results with `get`/`get_many` (nearest) or
//! `get_float`/`get_many_float` (interpolation).
//!
//! # Usage
//!
//! ```rust
//! # use quantile_exact::exact::QuantileExactInclusive;
//! let mut state = QuantileExactInclusive::<f64>::new();
//! for value in [1.0, 2.0, 3.0, 4.0] {
//!     state.add(value).unwrap();
//! }
//! state.finalize(0.5).unwrap();
//! assert_eq!(state.get_float(0.5).unwrap(), 2.5);
//! ```

mod buffer;
mod policy;
mod state;
mod value;

pub use self::policy::Exclusive;
pub use self::policy::Inclusive;
pub use self::policy::Nearest;
pub use self::state::QuantileExact;

/// Excel `PERCENTILE.EXC`-style exact quantile state.
pub type QuantileExactExclusive<T> = QuantileExact<T, Exclusive>;

/// Excel `PERCENTILE.INC`-style exact quantile state.
pub type QuantileExactInclusive<T> = QuantileExact<T, Inclusive>;

/// Bytes of inline sample slots embedded in a state object.
///
/// A state is budgeted to one 64-byte cache line: the buffer header
/// takes the rest, and each element type gets `INLINE_BYTES` divided by
/// its width in inline slots (at least one) before spilling to the heap.
pub const INLINE_BYTES: usize = 40;
