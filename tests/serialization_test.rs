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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use quantile_exact::error::ErrorKind;
use quantile_exact::exact::QuantileExact;
use quantile_exact::exact::QuantileExactExclusive;

#[test]
fn test_wire_layout() {
    let mut state = QuantileExact::<u64>::new();
    for value in [1u64, 2, 3] {
        state.add(value).unwrap();
    }

    // varuint count, then raw little-endian samples, unpadded.
    let mut expected = vec![0x03];
    for value in [1u64, 2, 3] {
        expected.extend_from_slice(&value.to_le_bytes());
    }
    assert_eq!(state.serialize(), expected);
}

#[test]
fn test_wire_layout_multibyte_count() {
    let mut state = QuantileExact::<u8>::new();
    for _ in 0..300 {
        state.add(1).unwrap();
    }

    let bytes = state.serialize();
    assert_eq!(bytes.len(), 2 + 300);
    assert_eq!(&bytes[..2], &[0xac, 0x02]);
}

#[test]
fn test_serialized_size_matches_output() {
    let mut state = QuantileExact::<f64>::new();
    assert_eq!(state.serialized_size(), state.serialize().len());

    for i in 0..3 {
        state.add(i as f64).unwrap();
    }
    assert_eq!(state.serialized_size(), state.serialize().len());

    // Past the inline capacity, onto the heap.
    for i in 0..200 {
        state.add(i as f64).unwrap();
    }
    assert_eq!(state.serialized_size(), state.serialize().len());
}

#[test]
fn test_empty_roundtrip() {
    let state = QuantileExact::<i32>::new();
    let bytes = state.serialize();
    assert_eq!(bytes, vec![0x00]);

    let restored = QuantileExact::<i32>::deserialize(&bytes).unwrap();
    assert!(restored.is_empty());
}

#[test]
fn test_roundtrip_bytes_are_stable() {
    let mut state = QuantileExact::<i64>::new();
    for value in [-5i64, 0, 12, i64::MAX, i64::MIN] {
        state.add(value).unwrap();
    }

    let bytes = state.serialize();
    let restored = QuantileExact::<i64>::deserialize(&bytes).unwrap();
    assert_eq!(restored.serialize(), bytes);
}

#[test]
fn test_roundtrip_spilled_state() {
    let mut state = QuantileExact::<f32>::new();
    for i in 0..100 {
        state.add(i as f32).unwrap();
    }

    let bytes = state.serialize();
    let restored = QuantileExact::<f32>::deserialize(&bytes).unwrap();
    assert_eq!(restored.count(), 100);
    assert_eq!(restored.serialize(), bytes);
}

#[test]
fn test_deserialize_truncated_payload() {
    let mut state = QuantileExact::<u64>::new();
    for value in [1u64, 2, 3] {
        state.add(value).unwrap();
    }

    let bytes = state.serialize();
    let err = QuantileExact::<u64>::deserialize(&bytes[..bytes.len() - 4]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CannotReadAllData);
    assert_that!(format!("{err}"), contains_substring("u64"));
}

#[test]
fn test_deserialize_count_prefix_exceeds_input() {
    // Five samples declared, one present.
    let mut bytes = vec![0x05];
    bytes.extend_from_slice(&7u64.to_le_bytes());

    let err = QuantileExact::<u64>::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CannotReadAllData);
}

#[test]
fn test_deserialize_truncated_varuint() {
    let err = QuantileExact::<u64>::deserialize(&[0x80]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CannotReadAllData);
    assert_that!(format!("{err}"), contains_substring("sample count"));
}

#[test]
fn test_deserialize_does_not_revalidate_nan() {
    // The wire format is trusted; a NaN written by hand round-trips.
    let mut bytes = vec![0x01];
    bytes.extend_from_slice(&f64::NAN.to_le_bytes());

    let restored = QuantileExact::<f64>::deserialize(&bytes).unwrap();
    assert_eq!(restored.count(), 1);
}

#[test]
fn test_error_rendering() {
    let mut state = QuantileExactExclusive::<f64>::new();
    state.add(1.0).unwrap();
    state.add(2.0).unwrap();

    let err = state.get_float(1.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadArguments);
    assert_that!(format!("{err}"), contains_substring("BadArguments"));
    assert_that!(format!("{err}"), contains_substring("level: 1"));

    let err = QuantileExact::<i64>::new().add_weighted(1, 1).unwrap_err();
    assert_that!(format!("{err}"), contains_substring("NotImplemented"));
    assert_that!(format!("{err}"), contains_substring("weight"));
}
