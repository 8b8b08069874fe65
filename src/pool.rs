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
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::sync::Mutex;

/// Cache-line alignment used for every buffer this pool hands out, so a
/// buffer never shares a line with an unrelated allocation and SIMD loads
/// over it can use the widest aligned instruction available.
const ALIGNMENT: usize = 64;

/// A heap buffer of `f64` aligned to [`ALIGNMENT`] bytes, freed with the
/// matching `Layout` on drop rather than via the global allocator's default
/// alignment.
pub struct AlignedBuffer {
    ptr: *mut f64,
    len: usize,
    layout: Layout,
}

unsafe impl Send for AlignedBuffer {}

impl AlignedBuffer {
    fn allocate(len: usize) -> AlignedBuffer {
        let layout = Layout::from_size_align(len * std::mem::size_of::<f64>(), ALIGNMENT)
            .expect("buffer size/alignment combination must be valid");
        let ptr = unsafe { alloc_zeroed(layout) } as *mut f64;
        assert!(!ptr.is_null(), "global allocator returned null");
        AlignedBuffer { ptr, len, layout }
    }

    pub fn as_slice(&self) -> &[f64] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn zero(&mut self) {
        self.as_mut_slice().fill(0.0);
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        unsafe {
            dealloc(self.ptr as *mut u8, self.layout);
        }
    }
}

/// Size-bucketed pool of [`AlignedBuffer`]s so the hot path (single-level
/// forward/inverse calls inside a streaming denoiser) can reuse scratch
/// memory instead of allocating on every block.
///
/// Buffers are bucketed by exact length; a request for a length with no
/// free buffer in its bucket allocates directly rather than rounding up to
/// a larger bucket, trading a little memory reuse for predictable sizes.
pub struct AlignedMemoryPool {
    buckets: Mutex<Vec<(usize, Vec<AlignedBuffer>)>>,
    bucket_capacity: usize,
}

impl AlignedMemoryPool {
    pub const DEFAULT_BUCKET_CAPACITY: usize = 8;

    pub fn new(bucket_capacity: usize) -> AlignedMemoryPool {
        AlignedMemoryPool {
            buckets: Mutex::new(Vec::new()),
            bucket_capacity: bucket_capacity.clamp(4, 10),
        }
    }

    /// Acquires a zeroed buffer of exactly `len` `f64`s, reusing a pooled
    /// one if this pool has one of that exact length, and falling back to
    /// a direct allocation otherwise.
    pub fn acquire(&self, len: usize) -> AlignedBuffer {
        let mut buckets = self.buckets.lock().unwrap();
        if let Some((_, bucket)) = buckets.iter_mut().find(|(l, _)| *l == len) {
            if let Some(mut buf) = bucket.pop() {
                buf.zero();
                return buf;
            }
        }
        AlignedBuffer::allocate(len)
    }

    /// Returns a buffer to the pool for future reuse. Dropped instead if
    /// its size bucket is already at [`Self::DEFAULT_BUCKET_CAPACITY`]-style
    /// capacity.
    pub fn release(&self, buf: AlignedBuffer) {
        let mut buckets = self.buckets.lock().unwrap();
        match buckets.iter_mut().find(|(l, _)| *l == buf.len()) {
            Some((_, bucket)) => {
                if bucket.len() < self.bucket_capacity {
                    bucket.push(buf);
                }
            }
            None => {
                buckets.push((buf.len(), vec![buf]));
            }
        }
    }

    pub fn pooled_buffer_count(&self, len: usize) -> usize {
        self.buckets
            .lock()
            .unwrap()
            .iter()
            .find(|(l, _)| *l == len)
            .map(|(_, bucket)| bucket.len())
            .unwrap_or(0)
    }
}

impl Default for AlignedMemoryPool {
    fn default() -> AlignedMemoryPool {
        AlignedMemoryPool::new(Self::DEFAULT_BUCKET_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_buffer_is_zeroed_and_correctly_sized() {
        let pool = AlignedMemoryPool::default();
        let buf = pool.acquire(128);
        assert_eq!(buf.len(), 128);
        assert!(buf.as_slice().iter().all(|&v| v == 0.0));
        assert_eq!(buf.as_slice().as_ptr() as usize % 64, 0);
    }

    #[test]
    fn released_buffer_is_reused_on_next_acquire_of_same_length() {
        let pool = AlignedMemoryPool::default();
        let mut first = pool.acquire(64);
        first.as_mut_slice()[0] = 42.0;
        let ptr_before = first.as_slice().as_ptr();
        pool.release(first);
        assert_eq!(pool.pooled_buffer_count(64), 1);

        let second = pool.acquire(64);
        assert_eq!(second.as_slice().as_ptr(), ptr_before);
        assert_eq!(second.as_slice()[0], 0.0, "reused buffer must be rezeroed");
    }

    #[test]
    fn bucket_capacity_caps_retained_buffers() {
        let pool = AlignedMemoryPool::new(4);
        for _ in 0..10 {
            pool.release(AlignedBuffer::allocate(32));
        }
        assert_eq!(pool.pooled_buffer_count(32), 4);
    }

    #[test]
    fn acquiring_an_unseen_length_allocates_directly() {
        let pool = AlignedMemoryPool::default();
        let buf = pool.acquire(17);
        assert_eq!(buf.len(), 17);
    }
}
