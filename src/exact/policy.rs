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

//! The three quantile conventions and their partial-selection finalizers.
//!
//! All three share one primitive: `select_nth_unstable_by`, the standard
//! library's introselect. A finalize pass rearranges the sample slice so
//! the queried order statistics sit at their sorted positions; everything
//! else is only partially ordered. Multi-level finalize walks the query
//! levels in ascending order, so each partial select operates on the
//! suffix the previous one left unsorted.

use super::value::SampleValue;
use crate::error::Error;

/// Nearest-rank convention: no interpolation, results are elements of
/// the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nearest;

/// Excel `PERCENTILE.EXC` / R-6 / SAS-4 / SciPy-(0,0): linear
/// interpolation, levels 0 and 1 rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exclusive;

/// Excel `PERCENTILE.INC` / R-7 / SciPy-(1,1): linear interpolation,
/// levels 0 and 1 produce the minimum and maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inclusive;

/// Finalization arithmetic of one quantile convention.
pub(crate) trait Policy {
    /// Rearrange `samples` so the single-level read for `level` is valid.
    fn finalize_one<T: SampleValue>(samples: &mut [T], level: f64) -> Result<(), Error>;

    /// Rearrange `samples` for every level of a multi-level query.
    /// `indices` must order `levels` ascending.
    fn finalize_sorted_levels<T: SampleValue>(
        samples: &mut [T],
        levels: &[f64],
        indices: &[usize],
    ) -> Result<(), Error>;
}

/// Interpolating conventions additionally map a level to a real-valued
/// sort position `h`; the two order statistics around `h` feed the
/// linear interpolation.
pub(crate) trait InterpolationPolicy: Policy {
    fn position(level: f64, len: usize) -> Result<f64, Error>;
}

/// Index of the nearest-rank order statistic for `level`.
///
/// The clamp keeps a level rounding up against 1.0 from indexing one
/// past the end. Callers guarantee `len > 0`.
pub(crate) fn nearest_index(level: f64, len: usize) -> usize {
    if level < 1.0 {
        ((level * len as f64) as usize).min(len - 1)
    } else {
        len - 1
    }
}

fn min_position<T: SampleValue>(samples: &[T]) -> usize {
    samples
        .iter()
        .enumerate()
        .min_by(|a, b| T::cmp(a.1, b.1))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

fn max_position<T: SampleValue>(samples: &[T]) -> usize {
    samples
        .iter()
        .enumerate()
        .max_by(|a, b| T::cmp(a.1, b.1))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

fn debug_assert_levels_ascending(levels: &[f64], indices: &[usize]) {
    debug_assert_eq!(levels.len(), indices.len());
    debug_assert!(
        indices
            .windows(2)
            .all(|pair| levels[pair[0]] <= levels[pair[1]]),
        "indices must order levels ascending"
    );
}

impl Policy for Nearest {
    fn finalize_one<T: SampleValue>(samples: &mut [T], level: f64) -> Result<(), Error> {
        if samples.is_empty() {
            return Ok(());
        }
        let n = nearest_index(level, samples.len());
        samples.select_nth_unstable_by(n, T::cmp);
        Ok(())
    }

    fn finalize_sorted_levels<T: SampleValue>(
        samples: &mut [T],
        levels: &[f64],
        indices: &[usize],
    ) -> Result<(), Error> {
        if samples.is_empty() {
            return Ok(());
        }
        debug_assert_levels_ascending(levels, indices);

        let mut interval_start = 0;
        for &index in indices {
            let n = nearest_index(levels[index], samples.len());

            // Position n already holds its order statistic: it is the
            // last element of the fully sorted prefix.
            if n + 1 == interval_start {
                continue;
            }

            samples[interval_start..].select_nth_unstable_by(n - interval_start, T::cmp);
            interval_start = n + 1;
        }
        Ok(())
    }
}

/// Place the order statistics at `n - 1` and `n` for an interpolating
/// read at real position `h`, degenerating to min/max at the edges.
fn interpolated_finalize<T: SampleValue>(samples: &mut [T], h: f64) {
    let len = samples.len();
    let n = h as usize;

    if n >= len {
        let max = max_position(samples);
        samples.swap(max, len - 1);
    } else if n < 1 {
        let min = min_position(samples);
        samples.swap(0, min);
    } else {
        samples.select_nth_unstable_by(n - 1, T::cmp);
        // One linear scan instead of a second select: everything at
        // n.. is >= the selected statistic, so its minimum is the
        // (n + 1)-th order statistic.
        let suffix_min = min_position(&samples[n..]);
        samples.swap(n, n + suffix_min);
    }
}

fn interpolated_finalize_sorted<T: SampleValue, P: InterpolationPolicy>(
    samples: &mut [T],
    levels: &[f64],
    indices: &[usize],
) -> Result<(), Error> {
    debug_assert_levels_ascending(levels, indices);

    let len = samples.len();
    let mut interval_start = 0;
    for &index in indices {
        let h = P::position(levels[index], len)?;
        let n = h as usize;

        if n >= len {
            let max = max_position(samples);
            samples.swap(max, len - 1);
        } else if n < 1 {
            let min = min_position(samples);
            samples.swap(0, min);
        } else {
            // Positions n - 1 and n must hold their order statistics.
            // The previous query sorted everything below interval_start,
            // so both may already be in place (interval_start == n + 1),
            // or only n - 1 may be (interval_start == n).
            if interval_start == n + 1 {
                continue;
            }

            if interval_start != n {
                samples[interval_start..]
                    .select_nth_unstable_by(n - 1 - interval_start, T::cmp);
            }

            let suffix_min = min_position(&samples[n..]);
            samples.swap(n, n + suffix_min);

            interval_start = n + 1;
        }
    }
    Ok(())
}

impl Policy for Exclusive {
    fn finalize_one<T: SampleValue>(samples: &mut [T], level: f64) -> Result<(), Error> {
        if samples.is_empty() {
            return Ok(());
        }
        let h = Self::position(level, samples.len())?;
        interpolated_finalize(samples, h);
        Ok(())
    }

    fn finalize_sorted_levels<T: SampleValue>(
        samples: &mut [T],
        levels: &[f64],
        indices: &[usize],
    ) -> Result<(), Error> {
        if samples.is_empty() {
            return Ok(());
        }
        interpolated_finalize_sorted::<T, Self>(samples, levels, indices)
    }
}

impl InterpolationPolicy for Exclusive {
    fn position(level: f64, len: usize) -> Result<f64, Error> {
        if level == 0.0 || level == 1.0 {
            return Err(Error::bad_arguments(
                "exclusive interpolation cannot produce the percentiles 0 and 1",
            )
            .with_context("level", level));
        }
        Ok(level * (len + 1) as f64)
    }
}

impl Policy for Inclusive {
    fn finalize_one<T: SampleValue>(samples: &mut [T], level: f64) -> Result<(), Error> {
        if samples.is_empty() {
            return Ok(());
        }
        let h = Self::position(level, samples.len())?;
        interpolated_finalize(samples, h);
        Ok(())
    }

    fn finalize_sorted_levels<T: SampleValue>(
        samples: &mut [T],
        levels: &[f64],
        indices: &[usize],
    ) -> Result<(), Error> {
        if samples.is_empty() {
            return Ok(());
        }
        interpolated_finalize_sorted::<T, Self>(samples, levels, indices)
    }
}

impl InterpolationPolicy for Inclusive {
    fn position(level: f64, len: usize) -> Result<f64, Error> {
        Ok(level * (len - 1) as f64 + 1.0)
    }
}
