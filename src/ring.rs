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
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

use crate::err::WaveletError;

/// A single-producer/single-consumer ring buffer of `f64` samples with no
/// locks on the push/pop path: the write and read cursors are independent
/// atomics, advanced with release stores and read back with acquire loads.
///
/// Carries an immutable `window_size`/`hop_size` pair describing the
/// overlapping window a consumer slides across the buffered samples, plus a
/// one-way `closed` flag: once closed, further writes are rejected, letting
/// a consumer drain the remaining windows and then observe
/// [`RingBuffer::has_window`] go false for good.
///
/// Safety contract: at most one thread may call [`RingBuffer::push_slice`]
/// at a time, and at most one (possibly different) thread may call
/// [`RingBuffer::pop_slice`] at a time. This is a caller discipline, not
/// something the type enforces — `&self` methods are used on both sides so
/// the buffer can be shared behind an `Arc` without requiring `&mut`.
pub struct RingBuffer {
    buf: Box<[UnsafeCell<f64>]>,
    capacity: u64,
    write: AtomicU64,
    read: AtomicU64,
    window_size: u64,
    hop_size: u64,
    closed: AtomicBool,
}

unsafe impl Sync for RingBuffer {}

impl RingBuffer {
    pub fn new(capacity: usize, window_size: usize, hop_size: usize) -> RingBuffer {
        assert!(capacity > 0, "ring buffer capacity must be nonzero");
        assert!(window_size > 0, "window_size must be nonzero");
        assert!(hop_size > 0, "hop_size must be nonzero");
        let buf = (0..capacity).map(|_| UnsafeCell::new(0.0)).collect();
        RingBuffer {
            buf,
            capacity: capacity as u64,
            write: AtomicU64::new(0),
            read: AtomicU64::new(0),
            window_size: window_size as u64,
            hop_size: hop_size as u64,
            closed: AtomicBool::new(false),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    pub fn window_size(&self) -> usize {
        self.window_size as usize
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size as usize
    }

    /// Number of samples currently buffered and unread.
    pub fn len(&self) -> usize {
        let w = self.write.load(Ordering::Acquire);
        let r = self.read.load(Ordering::Acquire);
        (w - r) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn available(&self) -> usize {
        self.capacity() - self.len()
    }

    fn ensure_open(&self, operation: &'static str) -> Result<(), WaveletError> {
        if self.is_closed() {
            return Err(WaveletError::StateClosed { operation });
        }
        Ok(())
    }

    /// Marks the buffer closed: further [`RingBuffer::push_slice`] calls
    /// fail with [`WaveletError::StateClosed`], while already-buffered
    /// samples remain readable until drained.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Whether a full `window_size` window is currently available to read.
    pub fn has_window(&self) -> bool {
        self.len() >= self.window_size as usize
    }

    /// A copy of the current window, if [`RingBuffer::has_window`] holds;
    /// does not consume anything. Advance past it with
    /// [`RingBuffer::advance`].
    pub fn current_window(&self) -> Option<Vec<f64>> {
        if !self.has_window() {
            return None;
        }
        let mut out = vec![0.0; self.window_size as usize];
        self.peek_slice(&mut out);
        Some(out)
    }

    /// Slides the window forward by `hop_size`, discarding the samples that
    /// fall out of it. Unaffected by [`RingBuffer::close`]: a closed buffer
    /// must still be drainable, so only writes are rejected once closed.
    pub fn advance(&self) {
        self.advance_read(self.hop_size as usize);
    }

    /// Appends `data` to the buffer, or fails with
    /// [`WaveletError::RingOverflow`] if there is not enough free capacity,
    /// or [`WaveletError::StateClosed`] if [`RingBuffer::close`] was called.
    pub fn push_slice(&self, data: &[f64]) -> Result<(), WaveletError> {
        self.ensure_open("RingBuffer::push_slice")?;
        let available = self.available();
        if data.len() > available {
            return Err(WaveletError::RingOverflow {
                requested: data.len(),
                available,
            });
        }
        let w = self.write.load(Ordering::Relaxed);
        for (i, &v) in data.iter().enumerate() {
            let idx = ((w + i as u64) % self.capacity) as usize;
            unsafe {
                *self.buf[idx].get() = v;
            }
        }
        self.write.store(w + data.len() as u64, Ordering::Release);
        Ok(())
    }

    /// Copies up to `out.len()` buffered samples into `out`, advancing the
    /// read cursor, and returns how many were actually copied.
    pub fn pop_slice(&self, out: &mut [f64]) -> usize {
        let r = self.read.load(Ordering::Relaxed);
        let w = self.write.load(Ordering::Acquire);
        let available = (w - r) as usize;
        let n = out.len().min(available);
        for (i, slot) in out.iter_mut().enumerate().take(n) {
            let idx = ((r + i as u64) % self.capacity) as usize;
            *slot = unsafe { *self.buf[idx].get() };
        }
        self.read.store(r + n as u64, Ordering::Release);
        n
    }

    /// Copies up to `out.len()` buffered samples into `out` without
    /// advancing the read cursor. Paired with [`RingBuffer::advance_read`]
    /// to support overlapping windows, where a window must be inspected
    /// before deciding how much of it to actually consume.
    pub fn peek_slice(&self, out: &mut [f64]) -> usize {
        let r = self.read.load(Ordering::Relaxed);
        let w = self.write.load(Ordering::Acquire);
        let available = (w - r) as usize;
        let n = out.len().min(available);
        for (i, slot) in out.iter_mut().enumerate().take(n) {
            let idx = ((r + i as u64) % self.capacity) as usize;
            *slot = unsafe { *self.buf[idx].get() };
        }
        n
    }

    /// Advances the read cursor by `n` without copying anything out,
    /// discarding the first `n` buffered samples.
    pub fn advance_read(&self, n: usize) {
        let r = self.read.load(Ordering::Relaxed);
        self.read.store(r + n as u64, Ordering::Release);
    }
}

/// Wraps a [`RingBuffer`] in an [`RwLock`] so the buffer's capacity can grow
/// or shrink in response to observed producer/consumer imbalance, while the
/// common-case push/pop calls only ever take the (cheap, shared) read lock.
///
/// Resizing itself takes the exclusive write lock and is rate-limited to
/// once per [`ResizableRingBuffer::DEFAULT_MIN_RESIZE_INTERVAL`] so a
/// bursty producer cannot thrash the allocator. `window_size`/`hop_size`
/// are immutable and carried across every internal resize.
pub struct ResizableRingBuffer {
    inner: RwLock<RingBuffer>,
    last_resize: Mutex<Instant>,
    min_resize_interval: Duration,
    min_capacity: usize,
    window_size: usize,
    hop_size: usize,
}

impl ResizableRingBuffer {
    pub const DEFAULT_MIN_RESIZE_INTERVAL: Duration = Duration::from_secs(5);
    const GROW_UTILIZATION: f64 = 0.85;
    const SHRINK_UTILIZATION: f64 = 0.25;

    pub fn new(
        initial_capacity: usize,
        min_capacity: usize,
        window_size: usize,
        hop_size: usize,
    ) -> ResizableRingBuffer {
        let min_capacity = min_capacity.max(1);
        ResizableRingBuffer {
            inner: RwLock::new(RingBuffer::new(
                initial_capacity.max(min_capacity),
                window_size,
                hop_size,
            )),
            last_resize: Mutex::new(Instant::now() - Self::DEFAULT_MIN_RESIZE_INTERVAL),
            min_resize_interval: Self::DEFAULT_MIN_RESIZE_INTERVAL,
            min_capacity,
            window_size,
            hop_size,
        }
    }

    pub fn push_slice(&self, data: &[f64]) -> Result<(), WaveletError> {
        self.maybe_resize();
        self.inner.read().unwrap().push_slice(data)
    }

    pub fn pop_slice(&self, out: &mut [f64]) -> usize {
        self.maybe_resize();
        self.inner.read().unwrap().pop_slice(out)
    }

    pub fn peek_slice(&self, out: &mut [f64]) -> usize {
        self.inner.read().unwrap().peek_slice(out)
    }

    pub fn advance_read(&self, n: usize) {
        self.inner.read().unwrap().advance_read(n)
    }

    pub fn has_window(&self) -> bool {
        self.inner.read().unwrap().has_window()
    }

    pub fn current_window(&self) -> Option<Vec<f64>> {
        self.inner.read().unwrap().current_window()
    }

    pub fn advance(&self) {
        self.inner.read().unwrap().advance()
    }

    pub fn close(&self) {
        self.inner.read().unwrap().close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().unwrap().is_closed()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().unwrap().capacity()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    fn maybe_resize(&self) {
        let mut last = self.last_resize.lock().unwrap();
        if last.elapsed() < self.min_resize_interval {
            return;
        }
        let (len, cap) = {
            let guard = self.inner.read().unwrap();
            (guard.len(), guard.capacity())
        };
        let utilization = len as f64 / cap as f64;
        if utilization > Self::GROW_UTILIZATION {
            self.resize_to((cap * 2).max(1));
            *last = Instant::now();
        } else if utilization < Self::SHRINK_UTILIZATION && cap > self.min_capacity {
            let shrunk = ((cap as f64 * 0.5) as usize).max(self.min_capacity);
            if shrunk < cap {
                self.resize_to(shrunk);
                *last = Instant::now();
            }
        }
    }

    fn resize_to(&self, new_capacity: usize) {
        let mut guard = self.inner.write().unwrap();
        let pending = guard.len();
        let new_capacity = new_capacity.max(pending).max(self.window_size);
        let closed = guard.is_closed();
        let mut replacement = RingBuffer::new(new_capacity, self.window_size, self.hop_size);
        let mut staging = vec![0.0; pending];
        let moved = guard.pop_slice(&mut staging);
        replacement
            .push_slice(&staging[..moved])
            .expect("freshly allocated buffer sized to hold its predecessor's contents");
        if closed {
            replacement.close();
        }
        *guard = replacement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_round_trips_in_order() {
        let rb = RingBuffer::new(8, 4, 2);
        rb.push_slice(&[1.0, 2.0, 3.0]).unwrap();
        let mut out = [0.0; 3];
        let n = rb.pop_slice(&mut out);
        assert_eq!(n, 3);
        assert_eq!(out, [1.0, 2.0, 3.0]);
        assert!(rb.is_empty());
    }

    #[test]
    fn wraps_around_capacity() {
        let rb = RingBuffer::new(4, 2, 1);
        rb.push_slice(&[1.0, 2.0, 3.0]).unwrap();
        let mut out = [0.0; 2];
        rb.pop_slice(&mut out);
        rb.push_slice(&[4.0, 5.0]).unwrap();
        let mut rest = [0.0; 3];
        let n = rb.pop_slice(&mut rest);
        assert_eq!(n, 3);
        assert_eq!(rest, [3.0, 4.0, 5.0]);
    }

    #[test]
    fn push_beyond_capacity_overflows() {
        let rb = RingBuffer::new(4, 2, 1);
        let err = rb.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap_err();
        assert!(matches!(err, WaveletError::RingOverflow { .. }));
    }

    #[test]
    fn pop_returns_fewer_than_requested_when_underfull() {
        let rb = RingBuffer::new(8, 4, 2);
        rb.push_slice(&[1.0, 2.0]).unwrap();
        let mut out = [0.0; 5];
        let n = rb.pop_slice(&mut out);
        assert_eq!(n, 2);
    }

    #[test]
    fn push_after_close_is_rejected() {
        let rb = RingBuffer::new(8, 4, 2);
        rb.close();
        let err = rb.push_slice(&[1.0]).unwrap_err();
        assert!(matches!(err, WaveletError::StateClosed { .. }));
    }

    /// Scenario: capacity=8, windowSize=4, hopSize=2. Write [1..=8], then
    /// slide the window across the buffered samples two at a time.
    #[test]
    fn sliding_window_sequence_matches_capacity_eight_window_four_hop_two() {
        let rb = RingBuffer::new(8, 4, 2);
        rb.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();

        assert!(rb.has_window());
        assert_eq!(rb.current_window().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);

        rb.advance();
        assert!(rb.has_window());
        assert_eq!(rb.current_window().unwrap(), vec![3.0, 4.0, 5.0, 6.0]);

        rb.advance();
        assert!(rb.has_window());
        assert_eq!(rb.current_window().unwrap(), vec![5.0, 6.0, 7.0, 8.0]);

        rb.advance();
        assert!(!rb.has_window());
        assert!(rb.current_window().is_none());
    }

    #[test]
    fn resizable_ring_buffer_preserves_contents_across_manual_resize() {
        let rb = ResizableRingBuffer::new(4, 4, 2, 1);
        rb.push_slice(&[1.0, 2.0, 3.0]).unwrap();
        rb.resize_to(16);
        assert_eq!(rb.capacity(), 16);
        let mut out = [0.0; 3];
        let n = rb.pop_slice(&mut out);
        assert_eq!(n, 3);
        assert_eq!(out, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn resizable_ring_buffer_grows_when_utilization_crosses_threshold() {
        let rb = ResizableRingBuffer::new(4, 4, 2, 1);
        *rb.last_resize.lock().unwrap() = Instant::now() - Duration::from_secs(10);
        rb.push_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        rb.maybe_resize();
        assert!(rb.capacity() > 4);
    }

    #[test]
    fn resizable_ring_buffer_carries_window_and_close_state_across_resize() {
        let rb = ResizableRingBuffer::new(4, 4, 2, 1);
        rb.push_slice(&[1.0, 2.0]).unwrap();
        rb.close();
        rb.resize_to(16);
        assert_eq!(rb.window_size(), 2);
        assert!(rb.is_closed());
        assert!(rb.push_slice(&[3.0]).is_err());
    }
}
