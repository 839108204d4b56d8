//! ByteRing - Lock-Guarded SPSC Circular Byte Buffer
//!
//! A single-producer single-consumer byte FIFO for driver-style plumbing:
//! console queues, DMA descriptor streams, and other places where one side
//! of the buffer may be a peripheral instead of a thread.
//!
//! # Key Features
//!
//! - Blocking reads over an edge-triggered event (wait → lock → validate →
//!   retry, no lost wakeups)
//! - Chunked bulk transfers that yield the lock every 16 KiB, bounding the
//!   interrupt-masked window
//! - Hardware peers: either side may be a DMA engine, with clean/invalidate
//!   cache-maintenance interlocks on cacheable memory
//! - Power-of-two mask fast path with a modulo fallback for odd sizes
//! - Index surgery for driver edge cases: skip, trash (sliding-window drop),
//!   rewind, and a zero-fill reset family
//!
//! # Example
//!
//! ```
//! use bytering::ByteRing;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let ring = Arc::new(ByteRing::new(64));
//!
//! let consumer = {
//!     let ring = Arc::clone(&ring);
//!     thread::spawn(move || {
//!         let mut out = [0u8; 5];
//!         let n = ring.read(&mut out, true);
//!         (out, n)
//!     })
//! };
//!
//! ring.write(b"hello", false);
//! let (out, n) = consumer.join().unwrap();
//! assert_eq!(&out[..n], b"hello");
//! ```

mod cache;
mod event;
mod flags;
mod invariants;
mod ring;
mod spinlock;

pub use cache::CacheMaintenance;
pub use event::Event;
pub use flags::{Peer, RingFlags, READ_MAX_CHUNK, WRITE_MAX_CHUNK};
pub use ring::{ByteRing, Peek};
