/*
 * // Copyright (c) Radzivon Bartoshyk 12/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Errors produced by every fallible operation in this crate.
///
/// Every variant carries the failing operation's name and the offending
/// quantity; most also carry a remediation hint in their `Display` text.
#[derive(Debug)]
pub enum WaveletError {
    /// Failed to allocate the buffer required for a result. The associated
    /// value is the requested size (`usize`) of the allocation.
    Allocation(usize),
    /// A signal argument was empty where at least one sample is required.
    EmptySignal { operation: &'static str },
    /// A sample was NaN or infinite.
    NonFiniteValue { operation: &'static str, index: usize },
    /// Two wavelet filter invariants (normalization, orthogonality, QMF
    /// relation), or two operands such as the approximation/detail pair
    /// passed to a kernel, were incompatible.
    InvalidCombination {
        operation: &'static str,
        detail: String,
    },
    /// Two arrays that are required to agree in length did not.
    LengthMismatch {
        operation: &'static str,
        expected: usize,
        got: usize,
    },
    /// `decompose` was asked for more levels than the signal length admits.
    MaxLevelExceeded {
        requested: usize,
        admissible: usize,
        signal_length: usize,
    },
    /// The requested boundary mode is not supported for this operation.
    UnsupportedBoundaryMode {
        operation: &'static str,
        mode: &'static str,
    },
    /// Two mutually exclusive configuration options were both requested.
    ConfigConflict { detail: String },
    /// The operation was attempted after `close()` on a ring buffer or a
    /// streaming denoiser.
    StateClosed { operation: &'static str },
    /// A write would have pushed the ring buffer's occupancy past its
    /// capacity; the producer is outpacing the consumer.
    RingOverflow { requested: usize, available: usize },
}

impl Display for WaveletError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WaveletError::Allocation(size) => {
                f.write_fmt(format_args!("failed to allocate buffer with size {size}"))
            }
            WaveletError::EmptySignal { operation } => f.write_fmt(format_args!(
                "{operation}: signal must contain at least one sample"
            )),
            WaveletError::NonFiniteValue { operation, index } => f.write_fmt(format_args!(
                "{operation}: sample at index {index} is NaN or infinite; remove or \
                 replace non-finite samples before calling {operation}"
            )),
            WaveletError::InvalidCombination { operation, detail } => {
                f.write_fmt(format_args!("{operation}: {detail}"))
            }
            WaveletError::LengthMismatch {
                operation,
                expected,
                got,
            } => f.write_fmt(format_args!(
                "{operation}: expected length {expected} but got {got}"
            )),
            WaveletError::MaxLevelExceeded {
                requested,
                admissible,
                signal_length,
            } => f.write_fmt(format_args!(
                "decompose: requested {requested} levels but only {admissible} are \
                 admissible for a signal of length {signal_length}; request at most \
                 {admissible} levels or pad the signal"
            )),
            WaveletError::UnsupportedBoundaryMode { operation, mode } => f.write_fmt(format_args!(
                "{operation}: boundary mode {mode} is not supported for this operation"
            )),
            WaveletError::ConfigConflict { detail } => {
                f.write_fmt(format_args!("conflicting configuration: {detail}"))
            }
            WaveletError::StateClosed { operation } => f.write_fmt(format_args!(
                "{operation}: called after close(); construct a new instance to continue"
            )),
            WaveletError::RingOverflow {
                requested,
                available,
            } => f.write_fmt(format_args!(
                "ring buffer overflow: requested to write {requested} samples but only \
                 {available} slots are free; the consumer is not keeping up"
            )),
        }
    }
}

impl Error for WaveletError {}

macro_rules! try_vec {
    ($elem:expr; $n:expr) => {{
        let mut v = Vec::new();
        v.try_reserve_exact($n)
            .map_err(|_| crate::err::WaveletError::Allocation($n))?;
        v.resize($n, $elem);
        v
    }};
}

pub(crate) use try_vec;
