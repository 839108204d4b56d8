//! Data-cache maintenance seam for rings shared with DMA peripherals.

/// Cache maintenance over byte ranges of the ring's backing memory.
///
/// Implementations wrap the platform's cache operations. The ring invokes
/// them under its lock, only when the buffer is declared cacheable and the
/// opposite side of the transfer is hardware:
///
/// - software writer, hardware reader: the just-written range is
///   clean-invalidated after the copy, before the head advances, so the
///   peripheral reads committed data;
/// - hardware writer, software reader: the about-to-be-read range is
///   invalidated before the copy, so the CPU misses to memory.
pub trait CacheMaintenance: Send {
    /// Flush dirty lines covering `len` bytes at `addr` to memory, then drop
    /// them from the cache.
    fn clean_invalidate(&self, addr: *const u8, len: usize);

    /// Drop lines covering `len` bytes at `addr` so the next CPU read misses
    /// to memory.
    fn invalidate(&self, addr: *const u8, len: usize);
}
