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
use crate::err::WaveletError;

/// Tolerance used for the normalization (`Σh² = 1`) and orthogonality
/// (`Σh·g = 0`) invariants checked at construction time.
const ORTHOGONALITY_TOLERANCE: f64 = 1e-10;

/// A named, immutable wavelet filter quartet.
///
/// For orthogonal wavelets the synthesis filters equal the analysis
/// filters; biorthogonal wavelets carry an independent synthesis pair plus
/// a reconstruction scale and group delay. This is a tagged variant rather
/// than a trait hierarchy: the kernel only ever needs "four filters" and,
/// for biorthogonal wavelets, the scale/delay pair.
#[derive(Debug, Clone)]
pub enum Wavelet {
    Orthogonal(OrthogonalFilters),
    Biorthogonal(BiorthogonalFilters),
}

/// Filter quartet for an orthogonal wavelet: analysis equals synthesis.
#[derive(Debug, Clone)]
pub struct OrthogonalFilters {
    name: &'static str,
    h: Vec<f64>,
    g: Vec<f64>,
}

/// Filter quartet for a biorthogonal wavelet: analysis and synthesis
/// filters differ and reconstruction carries a scaling factor and an
/// integer group delay.
#[derive(Debug, Clone)]
pub struct BiorthogonalFilters {
    name: &'static str,
    h: Vec<f64>,
    g: Vec<f64>,
    h_tilde: Vec<f64>,
    g_tilde: Vec<f64>,
    /// Reconstruction scaling factor applied by the source system; MODWT
    /// reconstruction in this crate does not apply it automatically (see
    /// the crate-level documentation), it is exposed for callers that need
    /// to reproduce the source system's exact convention.
    reconstruction_scale: f64,
    /// Integer group delay of the synthesis filter pair. Not applied by
    /// `kernel::inverse`; see the crate-level Open Questions note.
    group_delay: i32,
}

impl Wavelet {
    /// The Haar wavelet: the shortest orthogonal wavelet, `L = 2`.
    pub fn haar() -> Wavelet {
        let c = std::f64::consts::FRAC_1_SQRT_2;
        Wavelet::orthogonal("haar", vec![c, c])
            .expect("haar filter is normalized and orthogonal by construction")
    }

    /// Daubechies-2 (`db2`), the 4-tap orthogonal wavelet.
    pub fn db2() -> Wavelet {
        let sqrt2 = std::f64::consts::SQRT_2;
        let sqrt3 = 3.0_f64.sqrt();
        let h = vec![
            (1.0 + sqrt3) / (4.0 * sqrt2),
            (3.0 + sqrt3) / (4.0 * sqrt2),
            (3.0 - sqrt3) / (4.0 * sqrt2),
            (1.0 - sqrt3) / (4.0 * sqrt2),
        ];
        Wavelet::orthogonal("db2", h).expect("db2 filter is normalized and orthogonal")
    }

    /// Daubechies-4 (`db4`), the 8-tap orthogonal wavelet with four
    /// vanishing moments.
    pub fn db4() -> Wavelet {
        let h = vec![
            -0.010597401785069032,
            0.032883011666885,
            0.030841381835561,
            -0.18703481171909309,
            -0.02798376941698385,
            0.6308807679298589,
            0.7148465705529157,
            0.23037781330885523,
        ];
        Wavelet::orthogonal("db4", h).expect("db4 filter is normalized and orthogonal")
    }

    /// The LeGall/Cohen-Daubechies-Feauveau 5/3 biorthogonal filter bank,
    /// the wavelet used by lossless JPEG2000. Included so that the
    /// `Biorthogonal` arm of this type is exercised end to end, not merely
    /// declared.
    pub fn cdf_5_3() -> Wavelet {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let h = vec![-0.125 * s, 0.25 * s, 0.75 * s, 0.25 * s, -0.125 * s];
        let g = vec![0.0, -0.5 * s, 1.0 * s, -0.5 * s, 0.0];
        let h_tilde = vec![0.0, 0.5 * s, 1.0 * s, 0.5 * s, 0.0];
        let g_tilde = vec![-0.125 * s, -0.25 * s, 0.75 * s, -0.25 * s, -0.125 * s];
        Wavelet::Biorthogonal(BiorthogonalFilters {
            name: "cdf5.3",
            h,
            g,
            h_tilde,
            g_tilde,
            reconstruction_scale: 1.0,
            group_delay: 1,
        })
    }

    /// Constructs a custom orthogonal wavelet from its analysis low-pass
    /// filter `h`. The high-pass filter is derived via the quadrature
    /// mirror relation `g[k] = (-1)^k · h[L-1-k]`.
    pub fn orthogonal(name: &'static str, h: Vec<f64>) -> Result<Wavelet, WaveletError> {
        if h.len() < 2 {
            return Err(WaveletError::InvalidCombination {
                operation: "Wavelet::orthogonal",
                detail: format!("filter length must be >= 2, got {}", h.len()),
            });
        }
        let l = h.len();
        let g: Vec<f64> = (0..l)
            .map(|k| {
                let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                sign * h[l - 1 - k]
            })
            .collect();

        let sum_h2: f64 = h.iter().map(|v| v * v).sum();
        if (sum_h2 - 1.0).abs() > ORTHOGONALITY_TOLERANCE {
            return Err(WaveletError::InvalidCombination {
                operation: "Wavelet::orthogonal",
                detail: format!("Σh² = {sum_h2} is not within {ORTHOGONALITY_TOLERANCE} of 1.0"),
            });
        }
        let cross: f64 = h.iter().zip(g.iter()).map(|(a, b)| a * b).sum();
        if cross.abs() > ORTHOGONALITY_TOLERANCE {
            return Err(WaveletError::InvalidCombination {
                operation: "Wavelet::orthogonal",
                detail: format!(
                    "Σh·g = {cross} is not within {ORTHOGONALITY_TOLERANCE} of 0.0"
                ),
            });
        }

        Ok(Wavelet::Orthogonal(OrthogonalFilters { name, h, g }))
    }

    /// Constructs a custom biorthogonal wavelet from explicit analysis and
    /// synthesis filter pairs. Shorter of the two filters in a pair must be
    /// zero-padded by the caller to a common length; this constructor only
    /// checks that both pairs already agree in length.
    pub fn biorthogonal(
        name: &'static str,
        h: Vec<f64>,
        g: Vec<f64>,
        h_tilde: Vec<f64>,
        g_tilde: Vec<f64>,
        reconstruction_scale: f64,
        group_delay: i32,
    ) -> Result<Wavelet, WaveletError> {
        if h.len() < 2 || h.len() != g.len() || h_tilde.len() != g_tilde.len() {
            return Err(WaveletError::InvalidCombination {
                operation: "Wavelet::biorthogonal",
                detail: "analysis and synthesis filter pairs must each have matching, \
                         non-trivial length"
                    .to_string(),
            });
        }
        if h.len() != h_tilde.len() {
            return Err(WaveletError::LengthMismatch {
                operation: "Wavelet::biorthogonal",
                expected: h.len(),
                got: h_tilde.len(),
            });
        }
        Ok(Wavelet::Biorthogonal(BiorthogonalFilters {
            name,
            h,
            g,
            h_tilde,
            g_tilde,
            reconstruction_scale,
            group_delay,
        }))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Wavelet::Orthogonal(f) => f.name,
            Wavelet::Biorthogonal(f) => f.name,
        }
    }

    pub fn is_orthogonal(&self) -> bool {
        matches!(self, Wavelet::Orthogonal(_))
    }

    /// Conservative filter length, `L`, shared by every filter in the quartet.
    pub fn filter_length(&self) -> usize {
        match self {
            Wavelet::Orthogonal(f) => f.h.len(),
            Wavelet::Biorthogonal(f) => f.h.len(),
        }
    }

    /// Analysis filters `(h, g)` used by the forward transform.
    pub fn analysis(&self) -> (&[f64], &[f64]) {
        match self {
            Wavelet::Orthogonal(f) => (&f.h, &f.g),
            Wavelet::Biorthogonal(f) => (&f.h, &f.g),
        }
    }

    /// Synthesis filters `(h̃, g̃)` used by the inverse transform. Equal to
    /// [`Wavelet::analysis`] for orthogonal wavelets.
    pub fn synthesis(&self) -> (&[f64], &[f64]) {
        match self {
            Wavelet::Orthogonal(f) => (&f.h, &f.g),
            Wavelet::Biorthogonal(f) => (&f.h_tilde, &f.g_tilde),
        }
    }

    /// `Some((scale, group_delay))` for biorthogonal wavelets, `None` for
    /// orthogonal ones (where both are trivial: `1.0` and `0`).
    pub fn reconstruction_hint(&self) -> Option<(f64, i32)> {
        match self {
            Wavelet::Orthogonal(_) => None,
            Wavelet::Biorthogonal(f) => Some((f.reconstruction_scale, f.group_delay)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthogonality(h: &[f64], g: &[f64]) {
        let sum_h2: f64 = h.iter().map(|v| v * v).sum();
        assert!((sum_h2 - 1.0).abs() < 1e-10, "Σh² = {sum_h2}");
        let cross: f64 = h.iter().zip(g.iter()).map(|(a, b)| a * b).sum();
        assert!(cross.abs() < 1e-10, "Σh·g = {cross}");
    }

    #[test]
    fn haar_is_orthogonal_and_length_two() {
        let w = Wavelet::haar();
        assert_eq!(w.filter_length(), 2);
        let (h, g) = w.analysis();
        assert_orthogonality(h, g);
    }

    #[test]
    fn db2_is_orthogonal_and_length_four() {
        let w = Wavelet::db2();
        assert_eq!(w.filter_length(), 4);
        let (h, g) = w.analysis();
        assert_orthogonality(h, g);
    }

    #[test]
    fn db4_is_orthogonal_and_length_eight() {
        let w = Wavelet::db4();
        assert_eq!(w.filter_length(), 8);
        let (h, g) = w.analysis();
        assert_orthogonality(h, g);
    }

    #[test]
    fn orthogonal_wavelets_have_equal_analysis_and_synthesis() {
        for w in [Wavelet::haar(), Wavelet::db2(), Wavelet::db4()] {
            let (ha, ga) = w.analysis();
            let (hs, gs) = w.synthesis();
            assert_eq!(ha, hs);
            assert_eq!(ga, gs);
            assert!(w.is_orthogonal());
            assert!(w.reconstruction_hint().is_none());
        }
    }

    #[test]
    fn cdf_5_3_is_biorthogonal_with_distinct_synthesis() {
        let w = Wavelet::cdf_5_3();
        assert!(!w.is_orthogonal());
        let (h, _) = w.analysis();
        let (h_tilde, _) = w.synthesis();
        assert_ne!(h, h_tilde);
        assert!(w.reconstruction_hint().is_some());
    }

    #[test]
    fn rejects_non_normalized_filter() {
        let err = Wavelet::orthogonal("bad", vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidCombination { .. }));
    }

    #[test]
    fn rejects_filter_shorter_than_two() {
        let err = Wavelet::orthogonal("bad", vec![1.0]).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidCombination { .. }));
    }
}
