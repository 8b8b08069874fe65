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
use super::scalar::Scalar;
use super::InteriorKernel;

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

const LANES: usize = 2;

#[derive(Default)]
pub(crate) struct Sse2;

impl InteriorKernel for Sse2 {
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
    ) {
        let chunks = len / LANES;
        unsafe {
            convolve_forward_sse2(x, h, g, stride, out_start, chunks * LANES, a_out, d_out);
        }
        let done = chunks * LANES;
        if done < len {
            Scalar.convolve_forward(
                x,
                h,
                g,
                stride,
                out_start + done,
                len - done,
                &mut a_out[done..],
                &mut d_out[done..],
            );
        }
    }
}

#[target_feature(enable = "sse2")]
unsafe fn convolve_forward_sse2(
    x: &[f64],
    h: &[f64],
    g: &[f64],
    stride: usize,
    out_start: usize,
    len: usize,
    a_out: &mut [f64],
    d_out: &mut [f64],
) {
    let mut i = 0usize;
    while i < len {
        let t0 = out_start + i;
        let mut acc_a = _mm_setzero_pd();
        let mut acc_d = _mm_setzero_pd();
        for (k, (&hk, &gk)) in h.iter().zip(g.iter()).enumerate() {
            let src = t0 - k * stride;
            let xv = _mm_loadu_pd(x.as_ptr().add(src));
            acc_a = _mm_add_pd(acc_a, _mm_mul_pd(_mm_set1_pd(hk), xv));
            acc_d = _mm_add_pd(acc_d, _mm_mul_pd(_mm_set1_pd(gk), xv));
        }
        _mm_storeu_pd(a_out.as_mut_ptr().add(i), acc_a);
        _mm_storeu_pd(d_out.as_mut_ptr().add(i), acc_d);
        i += LANES;
    }
}
