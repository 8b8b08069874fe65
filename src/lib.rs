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
//! A shift-invariant maximal overlap discrete wavelet transform (MODWT):
//! single- and multi-level decomposition, wavelet shrinkage denoising, and
//! a streaming denoiser for unbounded sample sources.
//!
//! Unlike the critically-sampled DWT, every level of a MODWT has the same
//! length as the input signal — there is no decimation step to undo, which
//! is what makes the transform shift-invariant and safe to run over
//! arbitrary-length, non-power-of-two signals.
//!
//! ```
//! use modwt::{kernel, BoundaryMode, Wavelet};
//!
//! let signal: Vec<f64> = (0..64).map(|i| (i as f64 * 0.2).sin()).collect();
//! let wavelet = Wavelet::db2();
//! let result = kernel::forward(&signal, &wavelet, BoundaryMode::Periodic, 1).unwrap();
//! assert_eq!(result.approximation.len(), signal.len());
//!
//! let reconstructed = kernel::inverse(
//!     &result.approximation,
//!     &result.detail,
//!     &wavelet,
//!     BoundaryMode::Periodic,
//!     1,
//! )
//! .unwrap();
//! assert!((reconstructed[0] - signal[0]).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! - [`wavelet`]: named filter banks (`Wavelet::haar`, `db2`, `db4`,
//!   `cdf_5_3`) and custom filter construction.
//! - [`boundary`]: periodic vs. zero-padded edge handling.
//! - [`kernel`]: the single-level forward/inverse transform.
//! - [`multilevel`]: cascaded multi-level decomposition and reconstruction.
//! - [`noise`]: streaming MAD-based noise estimation and threshold rules.
//! - [`shrink`]: soft/hard coefficient shrinkage.
//! - [`ring`]: the lock-free ring buffer backing the streaming denoiser.
//! - [`pool`]: a size-bucketed, cache-aligned scratch-buffer pool for
//!   callers building their own low-allocation MODWT pipelines.
//! - [`denoiser`]: [`StreamingDenoiser`], the end-to-end real-time pipeline.
#![allow(clippy::excessive_precision)]

pub mod boundary;
pub mod denoiser;
pub mod err;
pub mod kernel;
pub mod multilevel;
pub mod noise;
pub mod pool;
pub mod ring;
pub mod shrink;
mod simd;
pub mod wavelet;

pub use boundary::BoundaryMode;
pub use denoiser::{DenoiserConfig, DenoiserPreset, PerformanceProfile, StreamingDenoiser};
pub use err::WaveletError;
pub use kernel::ModwtResult;
pub use multilevel::MultiLevelResult;
pub use noise::{NoiseEstimator, P2Quantile, ThresholdMethod};
pub use pool::{AlignedBuffer, AlignedMemoryPool};
pub use ring::{ResizableRingBuffer, RingBuffer};
pub use shrink::ThresholdFlavor;
pub use wavelet::Wavelet;
