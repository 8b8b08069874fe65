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

/// Policy for indexing past a signal's edge during convolution.
///
/// `Symmetric` and `Constant` extension exist in the wider wavelet
/// literature for decimated, downsampling transforms only; they are not
/// modeled here because the MODWT kernel (non-decimated, shift-invariant)
/// only ever needs the two boundary modes below, and `kernel::inverse`
/// rejects any mode beyond `Periodic`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoundaryMode {
    /// Wraps the index around modulo the signal length.
    Periodic,
    /// Treats any out-of-range access as zero.
    ZeroPadding,
}

impl BoundaryMode {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            BoundaryMode::Periodic => "PERIODIC",
            BoundaryMode::ZeroPadding => "ZERO_PADDING",
        }
    }
}

/// Maps a convolution tap index `i` (which may be negative or `>= n`) to a
/// source-array index under the given boundary mode.
///
/// `#[inline(always)]`: this is called at every boundary-crossing tap of
/// every inner loop; the interior (non-boundary-crossing) fast paths in
/// `kernel`/`simd` avoid calling it at all by constructing ranges where
/// every tap is provably in `[0, n)`.
#[inline(always)]
pub(crate) fn src_index(i: isize, n: usize, mode: BoundaryMode) -> Option<usize> {
    debug_assert!(n > 0);
    match mode {
        BoundaryMode::Periodic => {
            let n = n as isize;
            Some((((i % n) + n) % n) as usize)
        }
        BoundaryMode::ZeroPadding => {
            if i >= 0 && (i as usize) < n {
                Some(i as usize)
            } else {
                None
            }
        }
    }
}

/// Reads `x[src_index(i, n, mode)]`, substituting `0.0` for an
/// out-of-range tap (only possible under `ZeroPadding`).
#[inline(always)]
pub(crate) fn x_at(x: &[f64], i: isize, mode: BoundaryMode) -> f64 {
    match src_index(i, x.len(), mode) {
        Some(idx) => x[idx],
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_wraps_both_directions() {
        assert_eq!(src_index(-1, 8, BoundaryMode::Periodic), Some(7));
        assert_eq!(src_index(8, 8, BoundaryMode::Periodic), Some(0));
        assert_eq!(src_index(-9, 8, BoundaryMode::Periodic), Some(7));
        assert_eq!(src_index(3, 8, BoundaryMode::Periodic), Some(3));
    }

    #[test]
    fn zero_padding_returns_none_out_of_range() {
        assert_eq!(src_index(-1, 8, BoundaryMode::ZeroPadding), None);
        assert_eq!(src_index(8, 8, BoundaryMode::ZeroPadding), None);
        assert_eq!(src_index(0, 8, BoundaryMode::ZeroPadding), Some(0));
        assert_eq!(src_index(7, 8, BoundaryMode::ZeroPadding), Some(7));
    }

    #[test]
    fn x_at_substitutes_zero_under_zero_padding() {
        let x = [1.0, 2.0, 3.0];
        assert_eq!(x_at(&x, -1, BoundaryMode::ZeroPadding), 0.0);
        assert_eq!(x_at(&x, 3, BoundaryMode::ZeroPadding), 0.0);
        assert_eq!(x_at(&x, 1, BoundaryMode::ZeroPadding), 2.0);
    }
}
