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
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::boundary::BoundaryMode;
use crate::err::WaveletError;
use crate::kernel;
use crate::noise::{NoiseEstimator, ThresholdMethod};
use crate::ring::ResizableRingBuffer;
use crate::shrink::{shrink_in_place, ThresholdFlavor};
use crate::wavelet::Wavelet;

/// Descriptive, non-binding estimates of what a [`DenoiserPreset`] costs and
/// buys: how many samples of latency the window/hop choice introduces, a
/// rough expected SNR improvement for typical additive noise, and the
/// worker thread's steady-state scratch memory footprint. These are
/// reported to callers deciding between presets, not consulted by the
/// pipeline itself.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerformanceProfile {
    pub expected_latency_samples: usize,
    pub expected_snr_improvement_db: f64,
    pub memory_footprint_bytes: usize,
}

/// A named starting point for [`DenoiserConfig`], analogous to an encoder's
/// speed/quality preset: pick one, then override individual fields via the
/// struct update syntax if needed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DenoiserPreset {
    Fast,
    Quality,
}

impl DenoiserPreset {
    pub fn into_config(self) -> DenoiserConfig {
        match self {
            DenoiserPreset::Fast => DenoiserConfig {
                wavelet: Wavelet::haar(),
                window_size: 128,
                hop_size: 64,
                threshold_method: ThresholdMethod::Minimax,
                threshold_flavor: ThresholdFlavor::Hard,
                poll_interval: Duration::from_micros(250),
            },
            DenoiserPreset::Quality => DenoiserConfig {
                wavelet: Wavelet::db4(),
                window_size: 512,
                hop_size: 128,
                threshold_method: ThresholdMethod::Universal,
                threshold_flavor: ThresholdFlavor::Soft,
                poll_interval: Duration::from_millis(2),
            },
        }
    }

    /// Rough, advertised cost/benefit numbers for this preset; see
    /// [`PerformanceProfile`].
    pub fn performance_profile(self) -> PerformanceProfile {
        let cfg = self.into_config();
        match self {
            DenoiserPreset::Fast => PerformanceProfile {
                expected_latency_samples: cfg.hop_size,
                expected_snr_improvement_db: 3.0,
                memory_footprint_bytes: estimated_footprint_bytes(&cfg),
            },
            DenoiserPreset::Quality => PerformanceProfile {
                expected_latency_samples: cfg.hop_size,
                expected_snr_improvement_db: 6.0,
                memory_footprint_bytes: estimated_footprint_bytes(&cfg),
            },
        }
    }
}

fn estimated_footprint_bytes(cfg: &DenoiserConfig) -> usize {
    let sample = std::mem::size_of::<f64>();
    // Ring buffer (2x window) + single-level scratch (approximation,
    // detail, reconstruction).
    (2 * cfg.window_size) * sample + 3 * cfg.window_size * sample
}

/// Configuration for a [`StreamingDenoiser`].
#[derive(Debug, Clone)]
pub struct DenoiserConfig {
    pub wavelet: Wavelet,
    /// Samples processed per MODWT call.
    pub window_size: usize,
    /// Samples the window advances per block.
    pub hop_size: usize,
    pub threshold_method: ThresholdMethod,
    pub threshold_flavor: ThresholdFlavor,
    /// How long the worker thread sleeps between ring-buffer polls when a
    /// full window is not yet available.
    pub poll_interval: Duration,
}

impl Default for DenoiserConfig {
    fn default() -> DenoiserConfig {
        DenoiserPreset::Quality.into_config()
    }
}

impl DenoiserConfig {
    fn validate(&self) -> Result<(), WaveletError> {
        if self.window_size == 0 || self.hop_size == 0 {
            return Err(WaveletError::ConfigConflict {
                detail: "window_size and hop_size must both be nonzero".to_string(),
            });
        }
        if self.hop_size > self.window_size {
            return Err(WaveletError::ConfigConflict {
                detail: format!(
                    "hop_size ({}) must not exceed window_size ({})",
                    self.hop_size, self.window_size
                ),
            });
        }
        let admissible = crate::multilevel::max_level(self.window_size, &self.wavelet);
        if admissible < 1 {
            return Err(WaveletError::MaxLevelExceeded {
                requested: 1,
                admissible,
                signal_length: self.window_size,
            });
        }
        Ok(())
    }
}

/// A real-time wavelet denoiser: samples pushed in on one side emerge,
/// shrunk, on the other, processed on a dedicated background thread so the
/// producer's `push` call never blocks on a MODWT call.
///
/// The pipeline per window: pop the ring's current window, run a
/// single-level MODWT forward pass, update the [`NoiseEstimator`] from the
/// raw detail coefficients, shrink the detail with the resulting threshold,
/// invert, and emit the full, `window_size`-length reconstructed window;
/// the ring then advances by `hop_size`, leaving `window_size - hop_size`
/// samples of overlap in place for the next window. Consecutive emitted
/// blocks therefore overlap rather than concatenating into a deduplicated
/// stream — a caller that wants one continuous signal back is responsible
/// for combining the overlap (e.g. keeping only the newest `hop_size`
/// samples of each block, or blending it with the previous block's tail).
pub struct StreamingDenoiser {
    ring: Arc<ResizableRingBuffer>,
    output_rx: Receiver<Vec<f64>>,
    worker: Option<JoinHandle<()>>,
}

impl StreamingDenoiser {
    pub fn new(config: DenoiserConfig) -> Result<StreamingDenoiser, WaveletError> {
        config.validate()?;
        Self::spawn(config)
    }

    /// Constructs a denoiser directly from a named preset, bypassing
    /// `DenoiserConfig` construction entirely.
    pub fn with_preset(preset: DenoiserPreset) -> Result<StreamingDenoiser, WaveletError> {
        Self::spawn(preset.into_config())
    }

    fn spawn(config: DenoiserConfig) -> Result<StreamingDenoiser, WaveletError> {
        let ring = Arc::new(ResizableRingBuffer::new(
            2 * config.window_size,
            2 * config.window_size,
            config.window_size,
            config.hop_size,
        ));
        let (tx, rx) = sync_channel(16);

        let worker_ring = ring.clone();
        let worker = std::thread::spawn(move || run_worker(worker_ring, tx, config));

        Ok(StreamingDenoiser {
            ring,
            output_rx: rx,
            worker: Some(worker),
        })
    }

    /// Pushes new input samples into the ring buffer for the worker thread
    /// to consume. Fails with [`WaveletError::StateClosed`] once
    /// [`StreamingDenoiser::close`] has been called.
    pub fn push(&self, samples: &[f64]) -> Result<(), WaveletError> {
        self.ring.push_slice(samples)
    }

    /// Returns the next denoised block if one is ready, without blocking.
    pub fn try_recv_block(&self) -> Option<Vec<f64>> {
        self.output_rx.try_recv().ok()
    }

    /// Blocks until the next denoised block is ready, or the worker thread
    /// has shut down with nothing left to emit.
    pub fn recv_block(&self) -> Option<Vec<f64>> {
        self.output_rx.recv().ok()
    }

    /// Signals the worker thread to stop accepting new windows once the
    /// ring drains. Further calls to [`StreamingDenoiser::push`] fail with
    /// [`WaveletError::StateClosed`].
    pub fn close(&self) {
        self.ring.close();
    }
}

impl Drop for StreamingDenoiser {
    fn drop(&mut self) {
        self.close();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("streaming denoiser worker thread panicked during shutdown");
            }
        }
    }
}

fn run_worker(ring: Arc<ResizableRingBuffer>, output: SyncSender<Vec<f64>>, config: DenoiserConfig) {
    let mut noise_estimator = NoiseEstimator::new();
    let poll_interval = config.poll_interval;

    debug!(
        "streaming denoiser worker started: window={}, hop={}",
        config.window_size, config.hop_size
    );

    loop {
        let window = match ring.current_window() {
            Some(window) => window,
            None => {
                if ring.is_closed() {
                    trace!("streaming denoiser worker draining with an incomplete final window");
                    break;
                }
                std::thread::sleep(poll_interval);
                continue;
            }
        };

        match process_window(&window, &config, &mut noise_estimator) {
            Ok(denoised) => {
                ring.advance();
                if output.send(denoised).is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!("streaming denoiser dropped a window: {err}");
                ring.advance();
            }
        }
    }

    debug!("streaming denoiser worker stopped");
}

/// Runs the single-level MODWT forward/shrink/inverse pipeline over one
/// window, returning the full reconstructed window.
fn process_window(
    window: &[f64],
    config: &DenoiserConfig,
    noise_estimator: &mut NoiseEstimator,
) -> Result<Vec<f64>, WaveletError> {
    let n = window.len();
    let r = kernel::forward(window, &config.wavelet, BoundaryMode::Periodic, 1)?;
    noise_estimator.update(&r.detail);
    let tau = noise_estimator.threshold(config.threshold_method, n);

    let mut detail = r.detail;
    shrink_in_place(&mut detail, tau, config.threshold_flavor);

    kernel::inverse(
        &r.approximation,
        &detail,
        &config.wavelet,
        BoundaryMode::Periodic,
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_quality_preset() {
        let cfg = DenoiserConfig::default();
        assert_eq!(cfg.window_size, 512);
        assert_eq!(cfg.hop_size, 128);
    }

    #[test]
    fn performance_profile_reports_hop_size_as_latency() {
        let fast = DenoiserPreset::Fast.performance_profile();
        let quality = DenoiserPreset::Quality.performance_profile();
        assert_eq!(fast.expected_latency_samples, 64);
        assert_eq!(quality.expected_latency_samples, 128);
        assert!(quality.expected_snr_improvement_db > fast.expected_snr_improvement_db);
        assert!(quality.memory_footprint_bytes > fast.memory_footprint_bytes);
    }

    #[test]
    fn with_preset_constructs_a_working_denoiser() {
        let denoiser = StreamingDenoiser::with_preset(DenoiserPreset::Fast).unwrap();
        denoiser.push(&[0.0; 256]).unwrap();
    }

    #[test]
    fn validate_rejects_hop_larger_than_window() {
        let mut cfg = DenoiserPreset::Fast.into_config();
        cfg.hop_size = cfg.window_size + 1;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            WaveletError::ConfigConflict { .. }
        ));
    }

    #[test]
    fn validate_rejects_a_window_too_short_for_even_one_level() {
        let mut cfg = DenoiserPreset::Fast.into_config();
        cfg.window_size = 1;
        cfg.hop_size = 1;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            WaveletError::MaxLevelExceeded { .. }
        ));
    }

    #[test]
    fn process_window_reduces_energy_of_pure_gaussian_noise() {
        let mut state: u64 = 123456789;
        let mut next_uniform = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state >> 11) as f64) / ((1u64 << 53) as f64)
        };
        let window: Vec<f64> = (0..256)
            .map(|_| {
                let u1 = next_uniform().max(1e-12);
                let u2 = next_uniform();
                (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
            })
            .collect();

        let cfg = DenoiserPreset::Quality.into_config();
        let mut estimator = NoiseEstimator::new();
        let denoised = process_window(&window, &cfg, &mut estimator).unwrap();

        let energy_in: f64 = window.iter().map(|v| v * v).sum();
        let energy_out: f64 = denoised.iter().map(|v| v * v).sum();
        assert!(
            energy_out < energy_in,
            "denoised energy {energy_out} should be below raw noise energy {energy_in}"
        );
    }

    #[test]
    fn streaming_denoiser_emits_blocks_for_pushed_samples() {
        let cfg = DenoiserPreset::Fast.into_config();
        let denoiser = StreamingDenoiser::new(cfg.clone()).unwrap();

        let signal: Vec<f64> = (0..cfg.window_size * 4)
            .map(|i| (i as f64 * 0.1).sin())
            .collect();
        denoiser.push(&signal).unwrap();

        let mut received = 0;
        for _ in 0..50 {
            if denoiser.try_recv_block().is_some() {
                received += 1;
            }
            if received >= 2 {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(received >= 2, "expected at least two denoised blocks");
    }

    #[test]
    fn push_after_close_is_rejected() {
        let denoiser = StreamingDenoiser::new(DenoiserPreset::Fast.into_config()).unwrap();
        denoiser.close();
        let err = denoiser.push(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, WaveletError::StateClosed { .. }));
    }
}
