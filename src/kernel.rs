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
use crate::boundary::{x_at, BoundaryMode};
use crate::err::WaveletError;
use crate::err::try_vec;
use crate::simd::interior_kernel;
use crate::wavelet::Wavelet;

/// Output of a single-level forward transform: the approximation
/// (low-pass) and detail (high-pass) coefficient streams, each the same
/// length as the input signal.
#[derive(Debug, Clone)]
pub struct ModwtResult {
    pub approximation: Vec<f64>,
    pub detail: Vec<f64>,
}

fn validate_signal(x: &[f64], operation: &'static str) -> Result<(), WaveletError> {
    if x.is_empty() {
        return Err(WaveletError::EmptySignal { operation });
    }
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(WaveletError::NonFiniteValue { operation, index });
    }
    Ok(())
}

/// Rescales a filter by `1/√2`, the single per-call normalization MODWT
/// applies at every level (it is not compounded across levels: the stride
/// alone carries the level's dilation).
fn rescale(filter: &[f64]) -> Vec<f64> {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    filter.iter().map(|v| v * s).collect()
}

/// Runs the forward MODWT at decomposition level `level` (`1`-based;
/// `stride = 2^(level-1)`), producing the approximation and detail streams.
///
/// The interior region — output indices whose full tap window stays inside
/// `[0, x.len())` — is delegated to the SIMD-dispatched kernel; the
/// boundary region (at most `2 * (L-1) * stride` samples, and the whole
/// signal for very short inputs) uses the mode-aware scalar path.
pub fn forward(
    x: &[f64],
    wavelet: &Wavelet,
    mode: BoundaryMode,
    level: usize,
) -> Result<ModwtResult, WaveletError> {
    validate_signal(x, "kernel::forward")?;
    if level == 0 {
        return Err(WaveletError::InvalidCombination {
            operation: "kernel::forward",
            detail: "level must be >= 1".to_string(),
        });
    }

    let n = x.len();
    let (h, g) = wavelet.analysis();
    let h = rescale(h);
    let g = rescale(g);
    let l = h.len();
    let stride = 1usize << (level - 1);

    let mut approximation = try_vec!(0.0; n);
    let mut detail = try_vec!(0.0; n);

    let interior_start = (l - 1) * stride;
    if mode == BoundaryMode::Periodic || mode == BoundaryMode::ZeroPadding {
        if interior_start < n {
            let interior_len = n - interior_start;
            interior_kernel().convolve_forward(
                x,
                &h,
                &g,
                stride,
                interior_start,
                interior_len,
                &mut approximation[interior_start..],
                &mut detail[interior_start..],
            );
        }
    }
    let boundary_end = interior_start.min(n);
    for t in 0..boundary_end {
        let mut acc_a = 0.0f64;
        let mut acc_d = 0.0f64;
        for k in 0..l {
            let src = t as isize - (k * stride) as isize;
            let xv = x_at(x, src, mode);
            acc_a += h[k] * xv;
            acc_d += g[k] * xv;
        }
        approximation[t] = acc_a;
        detail[t] = acc_d;
    }

    Ok(ModwtResult {
        approximation,
        detail,
    })
}

/// Reconstructs the signal at decomposition level `level` from its
/// approximation/detail pair. Only [`BoundaryMode::Periodic`] is supported:
/// the zero-padded boundary is not invertible in general because samples
/// outside `[0, n)` were discarded rather than folded back in, so
/// `ZeroPadding` is rejected here rather than silently producing a biased
/// reconstruction.
pub fn inverse(
    a: &[f64],
    d: &[f64],
    wavelet: &Wavelet,
    mode: BoundaryMode,
    level: usize,
) -> Result<Vec<f64>, WaveletError> {
    validate_signal(a, "kernel::inverse")?;
    validate_signal(d, "kernel::inverse")?;
    if a.len() != d.len() {
        return Err(WaveletError::LengthMismatch {
            operation: "kernel::inverse",
            expected: a.len(),
            got: d.len(),
        });
    }
    if level == 0 {
        return Err(WaveletError::InvalidCombination {
            operation: "kernel::inverse",
            detail: "level must be >= 1".to_string(),
        });
    }
    if mode != BoundaryMode::Periodic {
        return Err(WaveletError::UnsupportedBoundaryMode {
            operation: "kernel::inverse",
            mode: mode.name(),
        });
    }

    let n = a.len();
    let (h_tilde, g_tilde) = wavelet.synthesis();
    let h_tilde = rescale(h_tilde);
    let g_tilde = rescale(g_tilde);
    let l = h_tilde.len();
    let stride = 1usize << (level - 1);

    let mut x = try_vec!(0.0; n);
    for t in 0..n {
        let mut acc = 0.0f64;
        for k in 0..l {
            let src = t as isize + (k * stride) as isize;
            acc += h_tilde[k] * x_at(a, src, mode) + g_tilde[k] * x_at(d, src, mode);
        }
        x[t] = acc;
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signal(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 0.37).sin() + 0.5).collect()
    }

    #[test]
    fn forward_rejects_empty_signal() {
        let err = forward(&[], &Wavelet::haar(), BoundaryMode::Periodic, 1).unwrap_err();
        assert!(matches!(err, WaveletError::EmptySignal { .. }));
    }

    #[test]
    fn forward_rejects_non_finite_sample() {
        let x = [1.0, f64::NAN, 3.0, 4.0];
        let err = forward(&x, &Wavelet::haar(), BoundaryMode::Periodic, 1).unwrap_err();
        assert!(matches!(err, WaveletError::NonFiniteValue { .. }));
    }

    #[test]
    fn forward_rejects_level_zero() {
        let x = sample_signal(8);
        let err = forward(&x, &Wavelet::haar(), BoundaryMode::Periodic, 0).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidCombination { .. }));
    }

    #[test]
    fn output_length_equals_input_length_at_every_level() {
        let x = sample_signal(37);
        let w = Wavelet::db4();
        for level in 1..=3 {
            let r = forward(&x, &w, BoundaryMode::Periodic, level).unwrap();
            assert_eq!(r.approximation.len(), x.len());
            assert_eq!(r.detail.len(), x.len());
        }
    }

    #[test]
    fn periodic_interior_and_boundary_paths_agree_with_pure_scalar() {
        // A signal long enough that the interior fast path actually fires,
        // cross-checked against the same formula evaluated with x_at at
        // every position (i.e. skip the interior kernel entirely).
        let x = sample_signal(128);
        let w = Wavelet::db2();
        let stride = 1usize;
        let (h, g) = w.analysis();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let h: Vec<f64> = h.iter().map(|v| v * s).collect();
        let g: Vec<f64> = g.iter().map(|v| v * s).collect();

        let r = forward(&x, &w, BoundaryMode::Periodic, 1).unwrap();
        for t in 0..x.len() {
            let mut acc_a = 0.0;
            let mut acc_d = 0.0;
            for k in 0..h.len() {
                let src = t as isize - (k * stride) as isize;
                let xv = x_at(&x, src, BoundaryMode::Periodic);
                acc_a += h[k] * xv;
                acc_d += g[k] * xv;
            }
            assert!((r.approximation[t] - acc_a).abs() < 1e-9);
            assert!((r.detail[t] - acc_d).abs() < 1e-9);
        }
    }

    #[test]
    fn haar_level_one_round_trips_under_periodic_mode() {
        let x = sample_signal(64);
        let w = Wavelet::haar();
        let r = forward(&x, &w, BoundaryMode::Periodic, 1).unwrap();
        let rec = inverse(&r.approximation, &r.detail, &w, BoundaryMode::Periodic, 1).unwrap();
        for i in 0..x.len() {
            assert!((rec[i] - x[i]).abs() < 1e-9, "mismatch at {i}: {} vs {}", rec[i], x[i]);
        }
    }

    #[test]
    fn db4_level_two_round_trips_under_periodic_mode() {
        let x = sample_signal(96);
        let w = Wavelet::db4();
        let r = forward(&x, &w, BoundaryMode::Periodic, 2).unwrap();
        let rec = inverse(&r.approximation, &r.detail, &w, BoundaryMode::Periodic, 2).unwrap();
        for i in 0..x.len() {
            assert!((rec[i] - x[i]).abs() < 1e-8, "mismatch at {i}: {} vs {}", rec[i], x[i]);
        }
    }

    #[test]
    fn inverse_rejects_zero_padding_mode() {
        let x = sample_signal(16);
        let w = Wavelet::haar();
        let r = forward(&x, &w, BoundaryMode::Periodic, 1).unwrap();
        let err = inverse(
            &r.approximation,
            &r.detail,
            &w,
            BoundaryMode::ZeroPadding,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, WaveletError::UnsupportedBoundaryMode { .. }));
    }

    #[test]
    fn inverse_rejects_mismatched_lengths() {
        let w = Wavelet::haar();
        let a = sample_signal(16);
        let d = sample_signal(8);
        let err = inverse(&a, &d, &w, BoundaryMode::Periodic, 1).unwrap_err();
        assert!(matches!(err, WaveletError::LengthMismatch { .. }));
    }
}
