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
use std::sync::OnceLock;

use crate::boundary::BoundaryMode;
use crate::err::WaveletError;
use crate::kernel;
use crate::wavelet::Wavelet;

/// The admissible number of levels for a signal of length `n`: the largest
/// `j` such that `(L-1) * 2^(j-1) < n`, i.e. the level at which the
/// interior region would still contain at least one sample. Requesting
/// more is rejected rather than silently degrading to an all-boundary
/// transform.
pub fn max_level(signal_length: usize, wavelet: &Wavelet) -> usize {
    let l = wavelet.filter_length();
    if signal_length == 0 || l < 2 {
        return 0;
    }
    let mut level = 0usize;
    loop {
        let next = level + 1;
        let stride = 1usize << (next - 1);
        if (l - 1) * stride >= signal_length || next > 32 {
            return level;
        }
        level = next;
    }
}

/// The full multi-level decomposition of a signal: one detail stream per
/// level plus the coarsest-level approximation, all the same length as the
/// input signal.
///
/// Detail energies are computed lazily and cached: most callers inspect
/// only a handful of levels (or none), so eagerly summing every level's
/// squared coefficients on every `decompose` call would waste work for the
/// common case.
pub struct MultiLevelResult {
    details: Vec<Vec<f64>>,
    approximation: Vec<f64>,
    energies: OnceLock<Vec<f64>>,
}

impl MultiLevelResult {
    /// Detail coefficients at level `level` (`1`-based).
    pub fn detail(&self, level: usize) -> Option<&[f64]> {
        self.details.get(level - 1).map(|v| v.as_slice())
    }

    /// The coarsest-level approximation, `V_J`.
    pub fn approximation(&self) -> &[f64] {
        &self.approximation
    }

    /// Number of decomposition levels present.
    pub fn levels(&self) -> usize {
        self.details.len()
    }

    /// `Σ d[i]²` for the detail stream at `level`, memoized after first use.
    pub fn detail_energy_at_level(&self, level: usize) -> Option<f64> {
        if level == 0 || level > self.details.len() {
            return None;
        }
        let energies = self.energies.get_or_init(|| {
            self.details
                .iter()
                .map(|d| d.iter().map(|v| v * v).sum())
                .collect()
        });
        energies.get(level - 1).copied()
    }
}

/// Decomposes `x` into `levels` detail streams plus a coarsest
/// approximation, cascading through the pyramid: `A_0 = x`, and for
/// `j = 1..=levels`, `(A_j, D_j) = kernel::forward(A_{j-1}, W, B, j)`. Each
/// level's forward call consumes the *previous* level's approximation, not
/// the original signal — the effective level-`j` filter is therefore the
/// composition of every lower level's dilated filter, not the base filter
/// dilated once.
pub fn decompose(
    x: &[f64],
    wavelet: &Wavelet,
    mode: BoundaryMode,
    levels: usize,
) -> Result<MultiLevelResult, WaveletError> {
    if levels == 0 {
        return Err(WaveletError::InvalidCombination {
            operation: "multilevel::decompose",
            detail: "levels must be >= 1".to_string(),
        });
    }
    let admissible = max_level(x.len(), wavelet);
    if levels > admissible {
        return Err(WaveletError::MaxLevelExceeded {
            requested: levels,
            admissible,
            signal_length: x.len(),
        });
    }

    let mut details = Vec::with_capacity(levels);
    let mut previous_approximation = x.to_vec();
    for level in 1..=levels {
        let r = kernel::forward(&previous_approximation, wavelet, mode, level)?;
        previous_approximation = r.approximation;
        details.push(r.detail);
    }

    Ok(MultiLevelResult {
        details,
        approximation: previous_approximation,
        energies: OnceLock::new(),
    })
}

/// Reconstructs the original signal from the full set of detail streams
/// plus the coarsest approximation, inverting from level `J` down to level
/// `1`: `x̂ = A_J`; for `j = J..1`, `x̂ = kernel::inverse(x̂, D_j, W̃, B, j)`.
/// This is exact, to machine precision, whenever the filter bank is
/// orthogonal, because each level's inverse call is itself the exact
/// inverse of the forward call `decompose` used to produce that level.
pub fn reconstruct(result: &MultiLevelResult, wavelet: &Wavelet) -> Result<Vec<f64>, WaveletError> {
    reconstruct_from_level(result, wavelet, 1)
}

/// Reconstructs while discarding detail at every level below `level`
/// (treating those streams as zero), cascading the same `j = J..1` inverse
/// loop as [`reconstruct`]. Used for denoising by detail-zeroing: a detail
/// stream at level `j < level` contributes a zero vector to the inverse at
/// that step instead of its actual coefficients.
pub fn reconstruct_from_level(
    result: &MultiLevelResult,
    wavelet: &Wavelet,
    level: usize,
) -> Result<Vec<f64>, WaveletError> {
    if level == 0 || level > result.levels() {
        return Err(WaveletError::InvalidCombination {
            operation: "multilevel::reconstruct_from_level",
            detail: format!(
                "level {level} is out of range for a result with {} levels",
                result.levels()
            ),
        });
    }

    let mut x = result.approximation.clone();
    for j in (1..=result.levels()).rev() {
        let detail = result.detail(j).expect("j is within 1..=levels()");
        if j < level {
            let zeroed = vec![0.0; detail.len()];
            x = kernel::inverse(&x, &zeroed, wavelet, BoundaryMode::Periodic, j)?;
        } else {
            x = kernel::inverse(&x, detail, wavelet, BoundaryMode::Periodic, j)?;
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signal(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 0.21).cos() * 2.0 + (i as f64 * 0.05).sin()).collect()
    }

    #[test]
    fn max_level_grows_with_signal_length() {
        let w = Wavelet::haar();
        assert!(max_level(4, &w) < max_level(1024, &w));
    }

    #[test]
    fn decompose_rejects_levels_beyond_admissible() {
        let x = sample_signal(8);
        let w = Wavelet::db4();
        let admissible = max_level(x.len(), &w);
        let err = decompose(&x, &w, BoundaryMode::Periodic, admissible + 1).unwrap_err();
        assert!(matches!(err, WaveletError::MaxLevelExceeded { .. }));
    }

    #[test]
    fn every_level_output_matches_input_length() {
        let x = sample_signal(200);
        let w = Wavelet::db2();
        let r = decompose(&x, &w, BoundaryMode::Periodic, 4).unwrap();
        assert_eq!(r.levels(), 4);
        for level in 1..=4 {
            assert_eq!(r.detail(level).unwrap().len(), x.len());
        }
        assert_eq!(r.approximation().len(), x.len());
    }

    #[test]
    fn detail_energy_is_nonnegative_and_memoized_consistently() {
        let x = sample_signal(128);
        let w = Wavelet::haar();
        let r = decompose(&x, &w, BoundaryMode::Periodic, 3).unwrap();
        let e1 = r.detail_energy_at_level(2).unwrap();
        let e2 = r.detail_energy_at_level(2).unwrap();
        assert!(e1 >= 0.0);
        assert_eq!(e1, e2);
        assert!(r.detail_energy_at_level(0).is_none());
        assert!(r.detail_energy_at_level(4).is_none());
    }

    #[test]
    fn reconstruct_cascades_through_every_level_for_orthogonal_wavelet() {
        let x = sample_signal(160);
        let w = Wavelet::haar();
        let r = decompose(&x, &w, BoundaryMode::Periodic, 3).unwrap();
        let rec = reconstruct(&r, &w).unwrap();
        for i in 0..x.len() {
            assert!(
                (rec[i] - x[i]).abs() < 1e-8,
                "mismatch at {i}: {} vs {}",
                rec[i],
                x[i]
            );
        }
    }

    #[test]
    fn reconstruct_from_level_one_matches_full_reconstruct() {
        let x = sample_signal(160);
        let w = Wavelet::haar();
        let r = decompose(&x, &w, BoundaryMode::Periodic, 3).unwrap();
        let full = reconstruct(&r, &w).unwrap();
        let from_level_one = reconstruct_from_level(&r, &w, 1).unwrap();
        assert_eq!(full, from_level_one);
    }

    #[test]
    fn reconstruct_from_level_discards_finer_detail() {
        // Zeroing every detail level below the top discards strictly more
        // information than the full reconstruction, so it should deviate
        // from the original signal while a full reconstruct does not.
        let x = sample_signal(160);
        let w = Wavelet::haar();
        let r = decompose(&x, &w, BoundaryMode::Periodic, 3).unwrap();
        let full = reconstruct(&r, &w).unwrap();
        let coarse = reconstruct_from_level(&r, &w, 3).unwrap();

        let full_err: f64 = x.iter().zip(full.iter()).map(|(a, b)| (a - b).abs()).sum();
        let coarse_err: f64 = x.iter().zip(coarse.iter()).map(|(a, b)| (a - b).abs()).sum();
        assert!(full_err < 1e-6);
        assert!(coarse_err > full_err);
    }

    #[test]
    fn reconstruct_from_level_rejects_out_of_range_level() {
        let x = sample_signal(64);
        let w = Wavelet::db2();
        let r = decompose(&x, &w, BoundaryMode::Periodic, 2).unwrap();
        let err = reconstruct_from_level(&r, &w, 3).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidCombination { .. }));
    }

    #[test]
    fn reconstruct_round_trips_for_db2() {
        let x = sample_signal(64);
        let w = Wavelet::db2();
        let r = decompose(&x, &w, BoundaryMode::Periodic, 2).unwrap();
        let rec = reconstruct(&r, &w).unwrap();
        for i in 0..x.len() {
            assert!((rec[i] - x[i]).abs() < 1e-6);
        }
    }
}
