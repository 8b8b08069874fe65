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
mod scalar;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod sse;

#[cfg(all(target_arch = "x86_64", feature = "avx"))]
mod avx;

#[cfg(all(target_arch = "aarch64", feature = "neon"))]
mod neon;

use std::sync::{Arc, OnceLock};

/// Fused forward-MODWT convolution over a contiguous range of output
/// indices that is known, by construction of the caller, to never read a
/// source index outside `[0, x.len())` — i.e. the range does not straddle
/// a signal boundary under either [`crate::boundary::BoundaryMode`].
///
/// Implementations process several output positions per iteration: for a
/// fixed tap `k`, the source index `t - k*stride` is affine in the output
/// index `t`, so `n` consecutive outputs read from `n` contiguous source
/// elements per tap.
pub(crate) trait InteriorKernel: Send + Sync {
    fn convolve_forward(
        &self,
        x: &[f64],
        h: &[f64],
        g: &[f64],
        stride: usize,
        out_start: usize,
        len: usize,
        a_out: &mut [f64],
        d_out: &mut [f64],
    );
}

/// Returns the best interior kernel available on the current CPU, cached
/// for the lifetime of the process.
pub(crate) fn interior_kernel() -> Arc<dyn InteriorKernel> {
    static KERNEL: OnceLock<Arc<dyn InteriorKernel>> = OnceLock::new();
    KERNEL
        .get_or_init(|| {
            #[cfg(all(target_arch = "x86_64", feature = "avx"))]
            if std::arch::is_x86_feature_detected!("avx2")
                && std::arch::is_x86_feature_detected!("fma")
            {
                return Arc::new(avx::Avx2Fma::default()) as Arc<dyn InteriorKernel>;
            }
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            if std::arch::is_x86_feature_detected!("sse2") {
                return Arc::new(sse::Sse2::default()) as Arc<dyn InteriorKernel>;
            }
            #[cfg(all(target_arch = "aarch64", feature = "neon"))]
            {
                return Arc::new(neon::Neon::default()) as Arc<dyn InteriorKernel>;
            }
            #[allow(unreachable_code)]
            Arc::new(scalar::Scalar::default()) as Arc<dyn InteriorKernel>
        })
        .clone()
}
