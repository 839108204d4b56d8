//! Property-based tests: random operation sequences against a shadow model.
//!
//! The model is a `VecDeque<Option<u8>>`: `Some` for bytes with known
//! values, `None` for bytes whose value is implementation-defined (the
//! garbage that slides in at the head after `trash`). Checked after every
//! operation:
//!
//! - `space_used` equals the model length and `space_used + space_avail`
//!   equals `len - 1`;
//! - every byte read matches the model where the model knows the value;
//! - the event is signaled exactly when the ring is nonempty.

use bytering::{ByteRing, RingFlags};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Write(Vec<u8>),
    WriteZeros(usize),
    WriteByte(u8),
    Read(usize),
    ReadByte,
    Discard(usize),
    Rewind,
    RewindLen(usize),
    Trash(usize),
    Peek,
}

fn op_strategy(len: usize) -> impl Strategy<Value = Op> {
    let cap = len - 1;
    prop_oneof![
        vec(any::<u8>(), 0..cap).prop_map(Op::Write),
        (0..cap).prop_map(Op::WriteZeros),
        any::<u8>().prop_map(Op::WriteByte),
        (0..len + 4).prop_map(Op::Read),
        Just(Op::ReadByte),
        (0..len + 4).prop_map(Op::Discard),
        Just(Op::Rewind),
        (0..cap).prop_map(Op::RewindLen),
        (0..cap).prop_map(Op::Trash),
        Just(Op::Peek),
    ]
}

fn sequences() -> impl Strategy<Value = (usize, Vec<Op>)> {
    prop_oneof![Just(8usize), Just(10), Just(16), Just(100), Just(128)]
        .prop_flat_map(|len| (Just(len), vec(op_strategy(len), 1..200)))
}

fn slide_window(model: &mut VecDeque<Option<u8>>, n: usize) {
    let dropped = n.min(model.len());
    for _ in 0..dropped {
        model.pop_front();
        model.push_back(None);
    }
}

proptest! {
    #[test]
    fn ring_matches_shadow_model((len, ops) in sequences()) {
        let ring = ByteRing::new(len);
        let cap = len - 1;
        let mut model: VecDeque<Option<u8>> = VecDeque::new();

        for op in ops {
            match op {
                Op::Write(data) => {
                    let expect = data.len().min(cap - model.len());
                    let n = ring.write(&data, false);
                    prop_assert_eq!(n, expect);
                    model.extend(data[..n].iter().copied().map(Some));
                }
                Op::WriteZeros(want) => {
                    let expect = want.min(cap - model.len());
                    let n = ring.write_zeros(want, false);
                    prop_assert_eq!(n, expect);
                    model.extend(std::iter::repeat(Some(0)).take(n));
                }
                Op::WriteByte(b) => {
                    let fits = model.len() < cap;
                    prop_assert_eq!(ring.write_byte(b, false), fits);
                    if fits {
                        model.push_back(Some(b));
                    }
                }
                Op::Read(want) => {
                    let expect = want.min(model.len());
                    let mut out = vec![0u8; want];
                    let n = ring.read(&mut out, false);
                    prop_assert_eq!(n, expect);
                    for byte in out.iter().take(n) {
                        if let Some(Some(known)) = model.pop_front() {
                            prop_assert_eq!(*byte, known);
                        }
                    }
                }
                Op::ReadByte => {
                    let got = ring.read_byte(false);
                    match model.pop_front() {
                        Some(Some(known)) => prop_assert_eq!(got, Some(known)),
                        Some(None) => prop_assert!(got.is_some()),
                        None => prop_assert_eq!(got, None),
                    }
                }
                Op::Discard(want) => {
                    let expect = want.min(model.len());
                    prop_assert_eq!(ring.discard(want), expect);
                    model.drain(..expect);
                }
                Op::Rewind => {
                    prop_assert_eq!(ring.rewind(), model.len());
                    model.clear();
                }
                Op::RewindLen(want) => {
                    let expect = want.min(model.len());
                    prop_assert_eq!(ring.rewind_len(want), expect);
                    for _ in 0..expect {
                        model.pop_back();
                    }
                }
                Op::Trash(n) => {
                    ring.trash(n);
                    slide_window(&mut model, n);
                }
                Op::Peek => {
                    let peek = ring.peek();
                    prop_assert_eq!(peek.len(), model.len());
                    let (first, second) = peek.regions();
                    let visible: Vec<u8> = first
                        .unwrap_or(&[])
                        .iter()
                        .chain(second.unwrap_or(&[]).iter())
                        .copied()
                        .collect();
                    prop_assert_eq!(visible.len(), model.len());
                    for (byte, known) in visible.iter().zip(model.iter()) {
                        if let Some(known) = known {
                            prop_assert_eq!(byte, known);
                        }
                    }
                }
            }

            prop_assert_eq!(ring.space_used(), model.len());
            prop_assert_eq!(ring.space_used() + ring.space_avail(), len - 1);
            prop_assert_eq!(ring.event().is_signaled(), !model.is_empty());
        }
    }

    #[test]
    fn chunked_write_read_round_trip(payload in vec(any::<u8>(), 1..40_000usize)) {
        let ring = ByteRing::new(1 << 16);
        ring.set_flags(RingFlags::USE_MAX_CHUNK_RW);

        prop_assert_eq!(ring.write(&payload, false), payload.len());

        let mut out = vec![0u8; payload.len()];
        prop_assert_eq!(ring.read(&mut out, false), payload.len());
        prop_assert_eq!(out, payload);
    }

    #[test]
    fn rewind_reports_pre_call_occupancy(
        first in vec(any::<u8>(), 0..60usize),
        second in vec(any::<u8>(), 0..60usize),
    ) {
        let ring = ByteRing::new(128);

        let written = ring.write(&first, false) + ring.write(&second, false);
        prop_assert_eq!(ring.rewind(), written);
        prop_assert_eq!(ring.space_used(), 0);
    }
}
