use core::ptr::NonNull;
use core::sync::atomic::{AtomicU32, Ordering};

use crossbeam_utils::Backoff;

use crate::cache::CacheMaintenance;
use crate::event::Event;
use crate::flags::{RingFlags, READ_MAX_CHUNK, WRITE_MAX_CHUNK};
use crate::invariants::{
    debug_assert_index_in_bounds, debug_assert_nonzero_len, debug_assert_request_fits,
    debug_assert_resize_within,
};
use crate::spinlock::{SpinGuard, SpinLock};

// =============================================================================
// LOCKING & EVENT PROTOCOL
// =============================================================================
//
// One spin lock per ring guards head, tail, the active length, and the cache
// ops. The flags word lives outside the lock as an atomic: mutations happen
// under the lock and are published with a release store, queries are plain
// acquire loads (every consumer of flag state re-takes the lock before acting
// on it).
//
// The event is edge-triggered:
//
// - write paths signal after the copy, under the lock, whenever the ring is
//   nonempty on exit (a partial write still signals);
// - read paths unsignal under the lock when they take the ring empty;
// - a blocking read waits *outside* the lock, then locks, drains, and
//   re-waits if it raced another consumer and got nothing. The wait → lock →
//   validate → loop order is what makes a spurious or stolen wake harmless.
//
// Bulk transfers that opt into chunking re-acquire the lock per chunk, so the
// interrupt-masked window is bounded by one chunk's copy.
//
// Index arithmetic is exact modulo `len` (never `len_max`), with a bitmask
// fast path when `len` is a power of two.
//
// =============================================================================

/// A single-producer single-consumer circular byte buffer.
///
/// The ring reserves one slot to tell empty from full: `head == tail` means
/// empty, so a ring of length `len` holds at most `len - 1` bytes. Either
/// side may be declared hardware (a DMA engine) via [`RingFlags`]; transfers
/// on a hardware side move indices without touching bytes, and crossing a
/// hardware boundary on cacheable memory triggers the installed
/// [`CacheMaintenance`] hooks.
///
/// # Example
///
/// ```
/// use bytering::ByteRing;
///
/// let ring = ByteRing::new(8);
/// assert_eq!(ring.write(b"ABCDEF", false), 6);
///
/// let mut out = [0u8; 4];
/// assert_eq!(ring.read(&mut out, false), 4);
/// assert_eq!(&out, b"ABCD");
/// ```
pub struct ByteRing {
    state: SpinLock<State>,
    event: Event,
    flags: AtomicU32,
}

struct State {
    buf: Storage,
    /// Currently active size; `1 <= len <= len_max`.
    len: usize,
    len_max: usize,
    /// log2 of `len` when it is a power of two, else 0 (modulo path).
    len_pow2: u32,
    /// Producer index; next write position.
    head: usize,
    /// Consumer index; next read position.
    tail: usize,
    cache: Option<Box<dyn CacheMaintenance>>,
}

enum Storage {
    Owned(Box<[u8]>),
    External { ptr: NonNull<u8>, len: usize },
}

// SAFETY: External storage is exclusively owned by the ring per the
// `from_raw` contract; the raw pointer is only dereferenced under the ring
// lock, so moving the ring between threads is sound.
unsafe impl Send for Storage {}

impl Storage {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Owned(buf) => buf,
            // SAFETY: `from_raw` guarantees the region is valid for `len`
            // bytes for the ring's lifetime.
            Storage::External { ptr, len } => unsafe {
                core::slice::from_raw_parts(ptr.as_ptr(), *len)
            },
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Owned(buf) => buf,
            // SAFETY: as above, plus the ring lock serializes mutation.
            Storage::External { ptr, len } => unsafe {
                core::slice::from_raw_parts_mut(ptr.as_ptr(), *len)
            },
        }
    }
}

/// What a write copies into the ring.
enum WriteSource<'a> {
    Data(&'a [u8]),
    Zeros(usize),
}

impl WriteSource<'_> {
    fn len(&self) -> usize {
        match self {
            WriteSource::Data(data) => data.len(),
            WriteSource::Zeros(len) => *len,
        }
    }
}

/// Where a read puts the bytes it consumes.
enum ReadSink<'a> {
    Buffer(&'a mut [u8]),
    Discard(usize),
}

impl ReadSink<'_> {
    fn len(&self) -> usize {
        match self {
            ReadSink::Buffer(out) => out.len(),
            ReadSink::Discard(len) => *len,
        }
    }
}

impl State {
    /// `(p + n) mod len`, on the mask fast path when available.
    #[inline]
    fn inc(&self, p: usize, n: usize) -> usize {
        if self.len_pow2 != 0 {
            p.wrapping_add(n) & (self.len - 1)
        } else {
            (p + n) % self.len
        }
    }

    /// `(p - n) mod len`. Callers keep `n <= len`.
    #[inline]
    fn dec(&self, p: usize, n: usize) -> usize {
        if self.len_pow2 != 0 {
            p.wrapping_sub(n) & (self.len - 1)
        } else {
            (p + self.len - n) % self.len
        }
    }

    #[inline]
    fn space_used(&self) -> usize {
        if self.len_pow2 != 0 {
            self.head.wrapping_sub(self.tail) & (self.len - 1)
        } else {
            (self.head + self.len - self.tail) % self.len
        }
    }

    #[inline]
    fn space_avail(&self) -> usize {
        self.len - self.space_used() - 1
    }

    /// Largest run writable from `head` without wrapping, capped at
    /// `remaining`.
    fn contiguous_free(&self, remaining: usize) -> usize {
        let run = if self.head >= self.tail {
            if self.tail == 0 {
                // Writing to the physical end would land head on tail == 0
                // and read back as empty; stop one short.
                self.len - self.head - 1
            } else {
                self.len - self.head
            }
        } else {
            self.tail - self.head - 1
        };
        run.min(remaining)
    }

    /// Largest run readable from `tail` without wrapping, capped at
    /// `remaining`.
    fn contiguous_used(&self, remaining: usize) -> usize {
        let run = if self.head > self.tail {
            self.head - self.tail
        } else {
            self.len - self.tail
        };
        run.min(remaining)
    }

    fn set_size(&mut self, len: usize) {
        debug_assert_nonzero_len!(len);
        if !len.is_power_of_two() {
            tracing::warn!(
                len,
                "ring length is not a power of two; index arithmetic degrades to modulo"
            );
        }
        self.len = len;
        self.len_pow2 = if len.is_power_of_two() {
            len.trailing_zeros()
        } else {
            0
        };
    }
}

impl ByteRing {
    // ---------------------------------------------------------------------
    // CONSTRUCTION
    // ---------------------------------------------------------------------

    /// Create a ring over a freshly allocated, zero-filled buffer of exactly
    /// `len` bytes.
    ///
    /// A power-of-two `len` keeps index arithmetic on the mask fast path.
    pub fn new(len: usize) -> Self {
        debug_assert_nonzero_len!(len);
        Self::init(Storage::Owned(vec![0u8; len].into_boxed_slice()), len)
    }

    /// Create a ring over caller-supplied owned storage.
    pub fn with_storage(buf: Box<[u8]>) -> Self {
        let len = buf.len();
        Self::init(Storage::Owned(buf), len)
    }

    /// Create a ring over external memory, typically a DMA-visible region
    /// the caller allocated elsewhere and keeps responsibility for.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes for the whole
    /// lifetime of the ring, and no other CPU code may access the region
    /// except through the ring. A peripheral may access it only under the
    /// declared-peer and cache-maintenance contract.
    pub unsafe fn from_raw(ptr: *mut u8, len: usize) -> Self {
        debug_assert!(!ptr.is_null());
        debug_assert_nonzero_len!(len);
        // SAFETY: non-null per the caller contract (debug-checked above).
        let ptr = unsafe { NonNull::new_unchecked(ptr) };
        Self::init(Storage::External { ptr, len }, len)
    }

    fn init(buf: Storage, len: usize) -> Self {
        let mut state = State {
            buf,
            len: 0,
            len_max: len,
            len_pow2: 0,
            head: 0,
            tail: 0,
            cache: None,
        };
        state.set_size(len);

        Self {
            state: SpinLock::new(state),
            // Manual-reset, non-signaled: the event stays raised while the
            // ring holds data so a late waiter passes straight through.
            event: Event::new(true, false),
            flags: AtomicU32::new(RingFlags::DEFAULT.bits()),
        }
    }

    /// Shrink the active size to `new_len` (`new_len <= max_size()`),
    /// discarding any buffered data and rehoming both indices to zero.
    pub fn adjust_size(&self, new_len: usize) {
        debug_assert_nonzero_len!(new_len);
        let mut guard = self.state.lock();
        let state = &mut *guard;
        debug_assert_resize_within!(new_len, state.len_max);

        state.head = 0;
        state.tail = 0;
        state.set_size(new_len);

        if !self.flags().contains(RingFlags::NO_EVENT) {
            self.event.unsignal();
        }
    }

    /// Install the platform's cache-maintenance hooks.
    ///
    /// A ring with a cacheable buffer and a declared hardware peer performs
    /// maintenance only once hooks are installed.
    pub fn set_cache_maintenance(&self, ops: Box<dyn CacheMaintenance>) {
        self.state.lock().cache = Some(ops);
    }

    // ---------------------------------------------------------------------
    // QUERIES
    // ---------------------------------------------------------------------

    /// Currently active size of the ring.
    pub fn size(&self) -> usize {
        self.state.lock().len
    }

    /// Size of the backing allocation; the upper bound for
    /// [`adjust_size`](Self::adjust_size).
    pub fn max_size(&self) -> usize {
        self.state.lock().len_max
    }

    /// Bytes that can currently be written.
    pub fn space_avail(&self) -> usize {
        self.state.lock().space_avail()
    }

    /// Bytes that can currently be read.
    pub fn space_used(&self) -> usize {
        self.state.lock().space_used()
    }

    /// Lock-free snapshot of the configuration flags.
    pub fn flags(&self) -> RingFlags {
        RingFlags::from_bits_truncate(self.flags.load(Ordering::Acquire))
    }

    /// Set the given flag bits. Takes the lock; the release store is the
    /// publication barrier for lock-free queries.
    pub fn set_flags(&self, flags: RingFlags) {
        let _guard = self.state.lock();
        self.flags.fetch_or(flags.bits(), Ordering::Release);
    }

    /// Clear the given flag bits.
    pub fn clear_flags(&self, flags: RingFlags) {
        let _guard = self.state.lock();
        self.flags.fetch_and(!flags.bits(), Ordering::Release);
    }

    /// The composed-in empty→nonempty event, for callers integrating the
    /// ring with external wake machinery.
    pub fn event(&self) -> &Event {
        &self.event
    }

    // ---------------------------------------------------------------------
    // WRITE PATH
    // ---------------------------------------------------------------------

    /// Enqueue up to `data.len()` bytes; returns how many were accepted.
    ///
    /// Never blocks: a full ring short-counts, down to zero. The single
    /// request must be smaller than the ring length (debug-asserted); note
    /// that a request of exactly `len - 1` still short-writes unless the
    /// ring is empty.
    ///
    /// With [`RingFlags::USE_MAX_CHUNK_W`] the copy is split into
    /// [`WRITE_MAX_CHUNK`] segments and the lock is yielded between them.
    /// `canreschedule` marks the caller for cooperative preemption once the
    /// lock is dropped.
    pub fn write(&self, data: &[u8], canreschedule: bool) -> usize {
        debug_assert_request_fits!(data.len(), self.size());

        let written = if self.flags().contains(RingFlags::USE_MAX_CHUNK_W) {
            self.write_chunked(data)
        } else {
            let mut guard = self.state.lock();
            self.write_locked(&mut guard, WriteSource::Data(data))
        };

        if canreschedule {
            std::thread::yield_now();
        }
        written
    }

    /// Advance `head` by up to `len` bytes of zeros; returns how many.
    ///
    /// The physical zero-fill is elided while the ring is still in its
    /// post-reset zero state, or when the declared writer is hardware.
    /// Chunking never applies to zero writes.
    pub fn write_zeros(&self, len: usize, canreschedule: bool) -> usize {
        debug_assert_request_fits!(len, self.size());

        let written = {
            let mut guard = self.state.lock();
            self.write_locked(&mut guard, WriteSource::Zeros(len))
        };

        if canreschedule {
            std::thread::yield_now();
        }
        written
    }

    /// Single-byte fast path for per-character console traffic: one lock
    /// hold, no chunking, no cache maintenance.
    ///
    /// Returns false when the ring is full. The event is signaled with the
    /// caller's reschedule hint.
    pub fn write_byte(&self, byte: u8, canreschedule: bool) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if state.space_avail() == 0 {
            return false;
        }

        let head = state.head;
        state.buf.as_mut_slice()[head] = byte;
        state.head = state.inc(head, 1);
        debug_assert_index_in_bounds!("head", state.head, state.len);

        let flags = self.flags();
        if flags.contains(RingFlags::IS_RESET) {
            self.flags
                .fetch_and(!RingFlags::IS_RESET.bits(), Ordering::Release);
        }
        if !flags.contains(RingFlags::NO_EVENT) && state.head != state.tail {
            self.event.signal(canreschedule);
        }
        true
    }

    fn write_chunked(&self, data: &[u8]) -> usize {
        let mut written = 0;
        while written < data.len() {
            let upper = (written + WRITE_MAX_CHUNK).min(data.len());
            let chunk = {
                let mut guard = self.state.lock();
                self.write_locked(&mut guard, WriteSource::Data(&data[written..upper]))
            };
            if chunk == 0 {
                break;
            }
            written += chunk;
        }
        written
    }

    /// One lock-hold's worth of writing: at most two passes (pre-wrap and
    /// post-wrap) over the contiguous runs.
    fn write_locked(&self, guard: &mut SpinGuard<'_, State>, src: WriteSource<'_>) -> usize {
        let state = &mut **guard;
        let flags = self.flags();
        let sw_writer = flags.writer().is_software();
        let want = src.len();
        let mut pos = 0;

        while pos < want && state.space_avail() > 0 {
            let seg = state.contiguous_free(want - pos);
            if seg == 0 {
                break;
            }
            let head = state.head;

            match src {
                WriteSource::Data(data) => {
                    // A hardware writer already placed the bytes; only move
                    // the index for it.
                    if sw_writer {
                        state.buf.as_mut_slice()[head..head + seg]
                            .copy_from_slice(&data[pos..pos + seg]);
                    }
                }
                WriteSource::Zeros(_) => {
                    if sw_writer && !flags.contains(RingFlags::IS_RESET) {
                        state.buf.as_mut_slice()[head..head + seg].fill(0);
                    }
                }
            }

            if flags.cacheable() && flags.reader().is_hardware() {
                if let Some(cache) = &state.cache {
                    cache.clean_invalidate(state.buf.as_slice()[head..].as_ptr(), seg);
                }
            }

            state.head = state.inc(head, seg);
            debug_assert_index_in_bounds!("head", state.head, state.len);
            pos += seg;
        }

        if pos > 0 && matches!(src, WriteSource::Data(_)) && flags.contains(RingFlags::IS_RESET) {
            self.flags
                .fetch_and(!RingFlags::IS_RESET.bits(), Ordering::Release);
        }

        // A partial write that leaves data behind must still wake readers.
        if !flags.contains(RingFlags::NO_EVENT) && state.head != state.tail {
            self.event.signal(false);
        }
        pos
    }

    // ---------------------------------------------------------------------
    // READ PATH
    // ---------------------------------------------------------------------

    /// Dequeue up to `out.len()` bytes into `out`; returns how many.
    ///
    /// With `block` set, waits for the empty→nonempty event before taking
    /// the lock and retries until at least one byte arrives; otherwise an
    /// empty ring returns zero immediately.
    ///
    /// With [`RingFlags::USE_MAX_CHUNK_R`] the copy is split into
    /// [`READ_MAX_CHUNK`] segments and the lock is yielded between them.
    pub fn read(&self, out: &mut [u8], block: bool) -> usize {
        if out.is_empty() {
            return 0;
        }

        let backoff = Backoff::new();
        loop {
            let no_event = self.flags().contains(RingFlags::NO_EVENT);

            // Block outside the lock; the wake may be early or stolen, so
            // the drain below revalidates.
            if block && !no_event {
                self.event.wait();
            }

            let read = if self.flags().contains(RingFlags::USE_MAX_CHUNK_R) {
                self.read_chunked(&mut *out)
            } else {
                let mut guard = self.state.lock();
                self.read_locked(&mut guard, ReadSink::Buffer(&mut *out))
            };

            if read > 0 || !block {
                return read;
            }
            // Raced another consumer to an empty ring; with no event to
            // park on, back off before retrying.
            if no_event {
                backoff.snooze();
            }
        }
    }

    /// Advance `tail` by up to `len` bytes without copying; returns how
    /// many were dropped. Never blocks.
    pub fn discard(&self, len: usize) -> usize {
        let mut guard = self.state.lock();
        self.read_locked(&mut guard, ReadSink::Discard(len))
    }

    /// Single-byte fast path; see [`write_byte`](Self::write_byte).
    ///
    /// Returns `None` when the ring is empty and `block` is false.
    pub fn read_byte(&self, block: bool) -> Option<u8> {
        let backoff = Backoff::new();
        loop {
            let no_event = self.flags().contains(RingFlags::NO_EVENT);
            if block && !no_event {
                self.event.wait();
            }

            {
                let mut guard = self.state.lock();
                let state = &mut *guard;
                if state.tail != state.head {
                    let tail = state.tail;
                    let byte = state.buf.as_slice()[tail];
                    state.tail = state.inc(tail, 1);
                    debug_assert_index_in_bounds!("tail", state.tail, state.len);
                    if !no_event && state.tail == state.head {
                        self.event.unsignal();
                    }
                    return Some(byte);
                }
            }

            if !block {
                return None;
            }
            if no_event {
                backoff.snooze();
            }
        }
    }

    fn read_chunked(&self, out: &mut [u8]) -> usize {
        let mut read = 0;
        while read < out.len() {
            let upper = (read + READ_MAX_CHUNK).min(out.len());
            let chunk = {
                let mut guard = self.state.lock();
                self.read_locked(&mut guard, ReadSink::Buffer(&mut out[read..upper]))
            };
            if chunk == 0 {
                break;
            }
            read += chunk;
        }
        read
    }

    /// One lock-hold's worth of reading; at most two passes for wraparound.
    fn read_locked(&self, guard: &mut SpinGuard<'_, State>, mut sink: ReadSink<'_>) -> usize {
        let state = &mut **guard;
        let flags = self.flags();
        let sw_reader = flags.reader().is_software();
        let want = sink.len();

        if state.tail == state.head {
            return 0;
        }

        let mut pos = 0;
        while pos < want && state.tail != state.head {
            let seg = state.contiguous_used(want - pos);
            let tail = state.tail;

            // The peripheral may have written behind the CPU's cache; miss
            // to memory before copying out.
            if flags.cacheable() && flags.writer().is_hardware() {
                if let Some(cache) = &state.cache {
                    cache.invalidate(state.buf.as_slice()[tail..].as_ptr(), seg);
                }
            }

            if let ReadSink::Buffer(out) = &mut sink {
                if sw_reader {
                    out[pos..pos + seg].copy_from_slice(&state.buf.as_slice()[tail..tail + seg]);
                }
            }

            state.tail = state.inc(tail, seg);
            debug_assert_index_in_bounds!("tail", state.tail, state.len);
            pos += seg;
        }

        if !flags.contains(RingFlags::NO_EVENT) && state.tail == state.head {
            debug_assert!(pos > 0);
            // Took the ring empty; consume the edge.
            self.event.unsignal();
        }
        pos
    }

    // ---------------------------------------------------------------------
    // PEEK
    // ---------------------------------------------------------------------

    /// Snapshot the readable run without consuming it.
    ///
    /// The returned [`Peek`] holds the ring lock, so the views it hands out
    /// stay coherent exactly until it is dropped; every other ring
    /// operation blocks in the meantime.
    pub fn peek(&self) -> Peek<'_> {
        Peek {
            guard: self.state.lock(),
        }
    }

    // ---------------------------------------------------------------------
    // INDEX SURGERY: skip / trash / rewind
    // ---------------------------------------------------------------------

    /// Unconditionally advance `head` (`is_write`) or `tail` by `len`,
    /// reconciling the indices after an external party (typically DMA)
    /// moved the physical frontier. Does not touch the event.
    pub fn skip(&self, is_write: bool, len: usize) {
        debug_assert_request_fits!(len, self.size());
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if is_write {
            state.head = state.inc(state.head, len);
        } else {
            state.tail = state.inc(state.tail, len);
        }
    }

    /// Slide the whole window forward by `len`: drops the oldest `len`
    /// bytes while keeping `space_used` unchanged (the bytes entering at
    /// the head are whatever the memory holds).
    ///
    /// Declined on a ring with any hardware peer; the ring cannot move a
    /// peripheral's pointer.
    pub fn trash(&self, len: usize) {
        if self.flags().has_hardware_peer() {
            tracing::debug!(len, "trash declined: ring has a hardware peer");
            return;
        }
        debug_assert_request_fits!(len, self.size());

        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.head = state.inc(state.head, len);
        state.tail = state.inc(state.tail, len);
    }

    /// Drop everything written but not yet read (`head := tail`); returns
    /// the number of bytes removed.
    pub fn rewind(&self) -> usize {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let removed = state.space_used();
        state.head = state.tail;
        if removed > 0 && !self.flags().contains(RingFlags::NO_EVENT) {
            self.event.unsignal();
        }
        removed
    }

    /// Move `head` backward by `min(len, space_used)`; returns the number
    /// of bytes removed.
    pub fn rewind_len(&self, len: usize) -> usize {
        debug_assert_request_fits!(len, self.size());
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let removed = len.min(state.space_used());
        state.head = state.dec(state.head, removed);
        debug_assert_index_in_bounds!("head", state.head, state.len);

        if removed > 0 && state.head == state.tail && !self.flags().contains(RingFlags::NO_EVENT) {
            self.event.unsignal();
        }
        removed
    }

    // ---------------------------------------------------------------------
    // RESET FAMILY
    // ---------------------------------------------------------------------

    /// Discard all buffered data (`tail → head`), leaving the bytes in
    /// place.
    pub fn reset(&self) {
        let mut guard = self.state.lock();
        let len = guard.len;
        self.read_locked(&mut guard, ReadSink::Discard(len));
    }

    /// [`reset`](Self::reset), then rehome both indices to zero.
    pub fn reset_indexes(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.head = 0;
        state.tail = 0;
        if !self.flags().contains(RingFlags::NO_EVENT) {
            self.event.unsignal();
        }
    }

    /// Zero the active region, rehome the indices, and mark the ring as
    /// reset so subsequent zero writes can skip redundant fills. Performs
    /// cache maintenance when a hardware reader is declared on cacheable
    /// memory.
    pub fn reset_with_zero(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let len = state.len;

        state.buf.as_mut_slice()[..len].fill(0);
        state.head = 0;
        state.tail = 0;

        let flags = self.flags();
        if flags.cacheable() && flags.reader().is_hardware() {
            if let Some(cache) = &state.cache {
                cache.clean_invalidate(state.buf.as_slice().as_ptr(), len);
            }
        }
        if !flags.contains(RingFlags::NO_EVENT) {
            self.event.unsignal();
        }
        self.flags
            .fetch_or(RingFlags::IS_RESET.bits(), Ordering::Release);
    }
}

/// Zero, one, or two contiguous views of the readable run, lock held.
///
/// Returned by [`ByteRing::peek`]. Drop it to let other parties at the
/// ring again.
pub struct Peek<'a> {
    guard: SpinGuard<'a, State>,
}

impl Peek<'_> {
    /// Bytes available to read at snapshot time.
    pub fn len(&self) -> usize {
        self.guard.space_used()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The readable run as `(first, wrapped)` segments: `(None, None)` when
    /// empty, the second segment present only when the run crosses the
    /// physical end of the buffer.
    pub fn regions(&self) -> (Option<&[u8]>, Option<&[u8]>) {
        let used = self.guard.space_used();
        if used == 0 {
            return (None, None);
        }

        let tail = self.guard.tail;
        let len = self.guard.len;
        let buf = self.guard.buf.as_slice();

        if tail + used <= len {
            (Some(&buf[tail..tail + used]), None)
        } else {
            (Some(&buf[tail..len]), Some(&buf[..used - (len - tail)]))
        }
    }
}
