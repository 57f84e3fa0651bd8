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

//! Quantile aggregate states for grouped analytic query execution.
//!
//! Each state accumulates the samples of one group and supports the
//! aggregate contract the execution engine drives: `add` per input row,
//! `merge` to combine partial states across threads or shards,
//! `serialize`/`deserialize` for the stable wire format, and a
//! finalize/get pair to read quantiles out. States are single-owner
//! structures; `merge` is the only cross-thread combinator, and the
//! merging thread holds both operands exclusively.
//!
//! The [`exact`] module holds the exact family; see its documentation
//! for the three quantile conventions it implements.

mod codec;
pub mod error;
pub mod exact;
