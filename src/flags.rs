use bitflags::bitflags;

/// Largest number of bytes copied per lock hold when read chunking is enabled.
pub const READ_MAX_CHUNK: usize = 16 << 10;
/// Largest number of bytes copied per lock hold when write chunking is enabled.
pub const WRITE_MAX_CHUNK: usize = 16 << 10;

bitflags! {
    /// Configuration bits for a [`ByteRing`](crate::ByteRing).
    ///
    /// The flags word is mutated under the ring lock and published with a
    /// release store, so lock-free queries see a consistent word. Consumers
    /// that act on flag state take the lock before acting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RingFlags: u32 {
        /// Suppress event signaling and waiting entirely.
        const NO_EVENT          = 1 << 0;
        /// Informational: the backing buffer is in its post-reset zero state.
        const IS_RESET          = 1 << 1;
        /// The producer is software (CPU). Absent means a DMA engine writes.
        const SW_IS_WRITER      = 1 << 2;
        /// The consumer is software (CPU). Absent means a DMA engine reads.
        const SW_IS_READER      = 1 << 3;
        /// The backing memory is CPU-cached; maintenance is required when a
        /// transfer crosses a hardware boundary.
        const BUF_IS_CACHEABLE  = 1 << 4;
        /// Split bulk reads into [`READ_MAX_CHUNK`] segments, yielding the
        /// lock between them.
        const USE_MAX_CHUNK_R   = 1 << 5;
        /// Split bulk writes into [`WRITE_MAX_CHUNK`] segments, yielding the
        /// lock between them.
        const USE_MAX_CHUNK_W   = 1 << 6;

        /// Chunk in both directions.
        const USE_MAX_CHUNK_RW = Self::USE_MAX_CHUNK_R.bits() | Self::USE_MAX_CHUNK_W.bits();
        /// Initial flags: software on both sides, cacheable memory.
        const DEFAULT = Self::SW_IS_WRITER.bits() | Self::SW_IS_READER.bits() | Self::BUF_IS_CACHEABLE.bits();
    }
}

/// Which kind of actor drives one side of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peer {
    /// A CPU-executed actor: a thread or an interrupt handler.
    Software,
    /// A DMA engine or peripheral touching the backing buffer directly.
    Hardware,
}

impl Peer {
    #[inline]
    pub fn is_hardware(self) -> bool {
        matches!(self, Peer::Hardware)
    }

    #[inline]
    pub fn is_software(self) -> bool {
        matches!(self, Peer::Software)
    }
}

impl RingFlags {
    /// The declared producer.
    #[inline]
    pub fn writer(self) -> Peer {
        if self.contains(RingFlags::SW_IS_WRITER) {
            Peer::Software
        } else {
            Peer::Hardware
        }
    }

    /// The declared consumer.
    #[inline]
    pub fn reader(self) -> Peer {
        if self.contains(RingFlags::SW_IS_READER) {
            Peer::Software
        } else {
            Peer::Hardware
        }
    }

    #[inline]
    pub fn cacheable(self) -> bool {
        self.contains(RingFlags::BUF_IS_CACHEABLE)
    }

    /// True when either side is driven by hardware.
    #[inline]
    pub fn has_hardware_peer(self) -> bool {
        self.writer().is_hardware() || self.reader().is_hardware()
    }
}
