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

/// Threshold selection rule applied to a noise estimator's current σ.
///
/// `Sure` and `Minimax` are fixed multiples of σ rather than the
/// data-adaptive Stein/minimax-risk procedures of the same name in the
/// wavelet-shrinkage literature: a streaming estimator only ever sees one
/// block at a time and has no access to the full coefficient vector those
/// procedures minimize over. They are kept under these names because that
/// is the convention this crate's threshold configuration follows;
/// `Universal` is the one rule computed from its textbook definition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ThresholdMethod {
    /// `σ · sqrt(2 ln N)`, the Donoho–Johnstone universal threshold.
    Universal,
    /// `σ · 2.5`.
    Sure,
    /// `σ · 1.5`.
    Minimax,
}

/// A single streaming quantile estimator using the P² (Jain & Chlamtac)
/// algorithm: five markers track the target quantile and its two
/// neighbors on each side in O(1) space, updated incrementally per sample
/// with no buffering of past observations.
#[derive(Debug, Clone)]
pub struct P2Quantile {
    p: f64,
    /// Marker heights, `q[0..5]`.
    q: [f64; 5],
    /// Marker positions (as real-valued counts, per the original paper).
    n: [f64; 5],
    /// Desired marker positions.
    np: [f64; 5],
    /// Count of observations seen so far, capped at `5` for the purpose of
    /// deciding whether initialization is complete.
    count: usize,
}

impl P2Quantile {
    pub fn new(p: f64) -> P2Quantile {
        debug_assert!((0.0..=1.0).contains(&p));
        P2Quantile {
            p,
            q: [0.0; 5],
            n: [1.0, 2.0, 3.0, 4.0, 5.0],
            np: [1.0, 1.0 + 2.0 * p, 1.0 + 4.0 * p, 3.0 + 2.0 * p, 5.0],
            count: 0,
        }
    }

    /// The current quantile estimate. `0.0` until at least one sample has
    /// been observed.
    pub fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else if self.count < 5 {
            let mut sorted = self.q;
            sorted[..self.count].sort_by(|a, b| a.partial_cmp(b).unwrap());
            let mid = ((self.count as f64 - 1.0) * self.p).round() as usize;
            sorted[mid.min(self.count - 1)]
        } else {
            self.q[2]
        }
    }

    pub fn update(&mut self, x: f64) {
        if self.count < 5 {
            self.q[self.count] = x;
            self.count += 1;
            if self.count == 5 {
                self.q.sort_by(|a, b| a.partial_cmp(b).unwrap());
            }
            return;
        }

        let k = if x < self.q[0] {
            self.q[0] = x;
            0
        } else if x >= self.q[4] {
            self.q[4] = x;
            3
        } else {
            let mut k = 0;
            for i in 0..4 {
                if self.q[i] <= x && x < self.q[i + 1] {
                    k = i;
                    break;
                }
            }
            k
        };

        for i in (k + 1)..5 {
            self.n[i] += 1.0;
        }
        for i in 0..5 {
            self.np[i] += Self::increment(i, self.p);
        }

        for i in 1..4 {
            let d = self.np[i] - self.n[i];
            if (d >= 1.0 && self.n[i + 1] - self.n[i] > 1.0)
                || (d <= -1.0 && self.n[i - 1] - self.n[i] < -1.0)
            {
                let sign = d.signum();
                let candidate = self.parabolic(i, sign);
                self.q[i] = if self.q[i - 1] < candidate && candidate < self.q[i + 1] {
                    candidate
                } else {
                    self.linear(i, sign)
                };
                self.n[i] += sign;
            }
        }
    }

    fn increment(marker: usize, p: f64) -> f64 {
        match marker {
            0 => 0.0,
            1 => p / 2.0,
            2 => p,
            3 => (1.0 + p) / 2.0,
            4 => 1.0,
            _ => unreachable!(),
        }
    }

    fn parabolic(&self, i: usize, sign: f64) -> f64 {
        let (qm1, q0, qp1) = (self.q[i - 1], self.q[i], self.q[i + 1]);
        let (nm1, n0, np1) = (self.n[i - 1], self.n[i], self.n[i + 1]);
        q0 + sign / (np1 - nm1)
            * ((n0 - nm1 + sign) * (qp1 - q0) / (np1 - n0)
                + (np1 - n0 - sign) * (q0 - qm1) / (n0 - nm1))
    }

    fn linear(&self, i: usize, sign: f64) -> f64 {
        let j = (i as isize + sign as isize) as usize;
        self.q[i] + sign * (self.q[j] - self.q[i]) / (self.n[j] - self.n[i])
    }
}

/// Online estimator of the noise standard deviation of a detail
/// coefficient stream, via the median absolute deviation (MAD):
/// `σ_raw = 1.4826 · median(|d - median(d)|)`, exponentially smoothed into
/// a running `σ`. `Q_x` (the running median) and `Q_d` (the running
/// median of absolute deviations) are independent [`P2Quantile`]
/// estimators, so the whole estimator runs in O(1) memory regardless of
/// how many coefficients it has seen.
#[derive(Debug, Clone)]
pub struct NoiseEstimator {
    /// `Q_x`: running median of the raw coefficients.
    median: P2Quantile,
    /// `Q_d`: running median of `|c - m|`.
    mad: P2Quantile,
    sigma: f64,
    initialized: bool,
    alpha: f64,
    samples_seen: u64,
}

impl NoiseEstimator {
    /// Exponential-smoothing weight applied to the previous `σ` on every
    /// update after the first; the first block seeds `σ` directly from
    /// `σ_raw` rather than being smoothed against an undefined prior value.
    pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.9;

    pub fn new() -> NoiseEstimator {
        Self::with_alpha(Self::DEFAULT_SMOOTHING_ALPHA)
    }

    pub fn with_alpha(alpha: f64) -> NoiseEstimator {
        debug_assert!((0.0..=1.0).contains(&alpha));
        NoiseEstimator {
            median: P2Quantile::new(0.5),
            mad: P2Quantile::new(0.5),
            sigma: 0.0,
            initialized: false,
            alpha,
            samples_seen: 0,
        }
    }

    /// Feeds one block of detail coefficients into the estimator via the
    /// two-pass update the MAD requires: first `Q_x` sees every coefficient
    /// in the block and yields one block-wide median `m`, then `Q_d` sees
    /// `|c - m|` for every coefficient in the same block.
    pub fn update(&mut self, detail: &[f64]) {
        for &c in detail {
            self.median.update(c);
        }
        let m = self.median.value();
        for &c in detail {
            self.mad.update((c - m).abs());
        }

        let sigma_raw = 1.4826 * self.mad.value();
        self.sigma = if self.initialized {
            self.alpha * self.sigma + (1.0 - self.alpha) * sigma_raw
        } else {
            self.initialized = true;
            sigma_raw
        };
        self.samples_seen += detail.len() as u64;
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// The current smoothed estimate of the noise standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The threshold implied by the current σ under `method`, scaled for a
    /// block of `block_len` coefficients (only [`ThresholdMethod::Universal`]
    /// depends on the block length).
    pub fn threshold(&self, method: ThresholdMethod, block_len: usize) -> f64 {
        let sigma = self.sigma();
        match method {
            ThresholdMethod::Universal => {
                let n = block_len.max(1) as f64;
                sigma * (2.0 * n.ln()).max(0.0).sqrt()
            }
            ThresholdMethod::Sure => sigma * 2.5,
            ThresholdMethod::Minimax => sigma * 1.5,
        }
    }
}

impl Default for NoiseEstimator {
    fn default() -> NoiseEstimator {
        NoiseEstimator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_median(xs: &mut [f64]) -> f64 {
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        xs[xs.len() / 2]
    }

    #[test]
    fn p2_quantile_tracks_median_of_a_stationary_stream_approximately() {
        let mut samples: Vec<f64> = (0..2001).map(|i| ((i * 2654435761u32) % 10000) as f64).collect();
        let exact = exact_median(&mut samples.clone());

        let mut q = P2Quantile::new(0.5);
        for &s in &samples {
            q.update(s);
        }
        let approx = q.value();
        let tolerance = 0.05 * exact.max(1.0);
        assert!(
            (approx - exact).abs() < tolerance,
            "approx {approx} vs exact {exact}"
        );
    }

    #[test]
    fn p2_quantile_returns_zero_before_any_samples() {
        let q = P2Quantile::new(0.5);
        assert_eq!(q.value(), 0.0);
    }

    #[test]
    fn noise_estimator_recovers_known_gaussian_sigma_approximately() {
        // A fixed, deterministic pseudo-Gaussian sequence (Box-Muller over a
        // linear congruential generator) with a known target sigma.
        let mut state: u64 = 88172645463325252;
        let mut next_uniform = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state >> 11) as f64) / ((1u64 << 53) as f64)
        };
        let target_sigma = 3.0;
        let mut detail = Vec::with_capacity(4000);
        for _ in 0..2000 {
            let u1 = next_uniform().max(1e-12);
            let u2 = next_uniform();
            let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            detail.push(z * target_sigma);
        }

        let mut est = NoiseEstimator::new();
        est.update(&detail);
        let sigma = est.sigma();
        assert!(
            (sigma - target_sigma).abs() < 0.6,
            "estimated sigma {sigma} far from target {target_sigma}"
        );
    }

    #[test]
    fn threshold_methods_order_as_expected_for_a_typical_sigma() {
        let mut est = NoiseEstimator::new();
        est.update(&vec![1.0; 200]);
        est.update(&(0..200).map(|i| (i as f64) * 0.01 - 1.0).collect::<Vec<_>>());
        let universal = est.threshold(ThresholdMethod::Universal, 256);
        let sure = est.threshold(ThresholdMethod::Sure, 256);
        let minimax = est.threshold(ThresholdMethod::Minimax, 256);
        assert!(sure >= 0.0 && minimax >= 0.0 && universal >= 0.0);
        assert!((sure / minimax - 2.5 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn first_update_seeds_sigma_directly_then_later_updates_smooth_it() {
        let mut est = NoiseEstimator::with_alpha(0.5);
        est.update(&[0.0, 0.0, 0.0, 0.0, 0.0, 10.0]);
        let seeded = est.sigma();
        assert!(seeded > 0.0);

        est.update(&[0.0; 6]);
        let smoothed = est.sigma();
        // The second block's raw sigma is 0, so a 0.5 blend must land
        // strictly between 0 and the first block's seeded value.
        assert!(smoothed > 0.0 && smoothed < seeded);
    }

    #[test]
    fn samples_seen_counts_every_coefficient_across_blocks() {
        let mut est = NoiseEstimator::new();
        est.update(&[1.0, 2.0, 3.0]);
        est.update(&[4.0, 5.0]);
        assert_eq!(est.samples_seen(), 5);
    }
}
