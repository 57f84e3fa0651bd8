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

use std::cmp::Ordering;
use std::io;

use smallvec::Array;

use crate::codec::StateBytes;
use crate::codec::StateSlice;

/// Trait implemented by element types supported by
/// [`QuantileExact`](super::QuantileExact).
///
/// A wider element width (e.g. a 256-bit decimal backing type) is one
/// more impl of this trait.
pub(crate) trait SampleValue: Copy {
    /// Serialized width in bytes.
    const WIDTH: usize;

    /// Short type name used in error context.
    const TAG: &'static str;

    /// Inline slot array sizing the state to the cache-line budget,
    /// see [`super::buffer`].
    type Inline: Array<Item = Self>;

    /// Compare two samples. Must be a total order; NaN never reaches it.
    fn cmp(a: &Self, b: &Self) -> Ordering;

    /// Returns true if the sample is NaN.
    fn is_nan(_value: &Self) -> bool {
        false
    }

    /// The quantile of the empty multiset: NaN for floats, zero for
    /// integers. Callers track group emptiness separately if they need
    /// to tell the two apart.
    fn empty_value() -> Self;

    /// Cast used by the interpolation policies' f64 return channel.
    fn to_f64(value: Self) -> f64;

    /// Serialize a single sample into the sink, little-endian, unpadded.
    fn write_le(value: Self, bytes: &mut StateBytes);

    /// Deserialize a single sample from the input.
    fn read_le(input: &mut StateSlice<'_>) -> io::Result<Self>;
}

macro_rules! impl_integer_sample {
    ($ty:ty, $inline:literal, $write:ident, $read:ident) => {
        impl SampleValue for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            const TAG: &'static str = stringify!($ty);

            type Inline = [$ty; $inline];

            fn cmp(a: &Self, b: &Self) -> Ordering {
                a.cmp(b)
            }

            fn empty_value() -> Self {
                0
            }

            fn to_f64(value: Self) -> f64 {
                value as f64
            }

            fn write_le(value: Self, bytes: &mut StateBytes) {
                bytes.$write(value);
            }

            fn read_le(input: &mut StateSlice<'_>) -> io::Result<Self> {
                input.$read()
            }
        }
    };
}

impl_integer_sample!(u8, 40, write_u8, read_u8);
impl_integer_sample!(i8, 40, write_i8, read_i8);
impl_integer_sample!(u16, 20, write_u16_le, read_u16_le);
impl_integer_sample!(i16, 20, write_i16_le, read_i16_le);
impl_integer_sample!(u32, 10, write_u32_le, read_u32_le);
impl_integer_sample!(i32, 10, write_i32_le, read_i32_le);
impl_integer_sample!(u64, 5, write_u64_le, read_u64_le);
impl_integer_sample!(i64, 5, write_i64_le, read_i64_le);
impl_integer_sample!(u128, 2, write_u128_le, read_u128_le);
impl_integer_sample!(i128, 2, write_i128_le, read_i128_le);

impl SampleValue for f32 {
    const WIDTH: usize = 4;
    const TAG: &'static str = "f32";

    type Inline = [f32; 10];

    fn cmp(a: &Self, b: &Self) -> Ordering {
        a.total_cmp(b)
    }

    fn is_nan(value: &Self) -> bool {
        value.is_nan()
    }

    fn empty_value() -> Self {
        f32::NAN
    }

    fn to_f64(value: Self) -> f64 {
        f64::from(value)
    }

    fn write_le(value: Self, bytes: &mut StateBytes) {
        bytes.write_f32_le(value);
    }

    fn read_le(input: &mut StateSlice<'_>) -> io::Result<Self> {
        input.read_f32_le()
    }
}

impl SampleValue for f64 {
    const WIDTH: usize = 8;
    const TAG: &'static str = "f64";

    type Inline = [f64; 5];

    fn cmp(a: &Self, b: &Self) -> Ordering {
        a.total_cmp(b)
    }

    fn is_nan(value: &Self) -> bool {
        value.is_nan()
    }

    fn empty_value() -> Self {
        f64::NAN
    }

    fn to_f64(value: Self) -> f64 {
        value
    }

    fn write_le(value: Self, bytes: &mut StateBytes) {
        bytes.write_f64_le(value);
    }

    fn read_le(input: &mut StateSlice<'_>) -> io::Result<Self> {
        input.read_f64_le()
    }
}
