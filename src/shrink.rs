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

/// Which shrinkage rule [`shrink`] applies to a coefficient past a
/// threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ThresholdFlavor {
    /// `sign(c) * max(|c| - tau, 0)`: shrinks every surviving coefficient
    /// towards zero by `tau`, avoiding the discontinuity hard thresholding
    /// introduces at `|c| = tau`.
    Soft,
    /// `c` if `|c| > tau`, else `0`: leaves surviving coefficients
    /// untouched.
    Hard,
}

/// Shrinks a single wavelet coefficient `c` against threshold `tau >= 0`
/// according to `flavor`.
#[inline]
pub fn shrink(c: f64, tau: f64, flavor: ThresholdFlavor) -> f64 {
    debug_assert!(tau >= 0.0);
    match flavor {
        ThresholdFlavor::Soft => {
            let mag = c.abs() - tau;
            if mag > 0.0 {
                c.signum() * mag
            } else {
                0.0
            }
        }
        ThresholdFlavor::Hard => {
            if c.abs() > tau {
                c
            } else {
                0.0
            }
        }
    }
}

/// Shrinks every coefficient in `coeffs` in place.
pub fn shrink_in_place(coeffs: &mut [f64], tau: f64, flavor: ThresholdFlavor) {
    for c in coeffs.iter_mut() {
        *c = shrink(*c, tau, flavor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_threshold_shrinks_towards_zero() {
        assert_eq!(shrink(5.0, 2.0, ThresholdFlavor::Soft), 3.0);
        assert_eq!(shrink(-5.0, 2.0, ThresholdFlavor::Soft), -3.0);
        assert_eq!(shrink(1.0, 2.0, ThresholdFlavor::Soft), 0.0);
        assert_eq!(shrink(2.0, 2.0, ThresholdFlavor::Soft), 0.0);
    }

    #[test]
    fn hard_threshold_preserves_survivors_untouched() {
        assert_eq!(shrink(5.0, 2.0, ThresholdFlavor::Hard), 5.0);
        assert_eq!(shrink(-5.0, 2.0, ThresholdFlavor::Hard), -5.0);
        assert_eq!(shrink(1.0, 2.0, ThresholdFlavor::Hard), 0.0);
        assert_eq!(shrink(2.0, 2.0, ThresholdFlavor::Hard), 0.0);
    }

    #[test]
    fn zero_threshold_is_a_no_op_for_hard_and_identity_for_soft_away_from_zero() {
        assert_eq!(shrink(3.5, 0.0, ThresholdFlavor::Hard), 3.5);
        assert_eq!(shrink(3.5, 0.0, ThresholdFlavor::Soft), 3.5);
        assert_eq!(shrink(0.0, 0.0, ThresholdFlavor::Hard), 0.0);
    }

    #[test]
    fn shrink_in_place_matches_elementwise_shrink() {
        let mut coeffs = vec![-4.0, -1.0, 0.5, 2.0, 6.0];
        let expected: Vec<f64> = coeffs
            .iter()
            .map(|&c| shrink(c, 1.5, ThresholdFlavor::Soft))
            .collect();
        shrink_in_place(&mut coeffs, 1.5, ThresholdFlavor::Soft);
        assert_eq!(coeffs, expected);
    }
}
