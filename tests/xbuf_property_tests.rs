//! Property tests for append/inspect invariants

use gvbuf::{Located, XBuf};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Byte(u8),
    Bytes(Vec<u8>),
    Print(u32, String),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Byte),
        4 => proptest::collection::vec(any::<u8>(), 0..80).prop_map(Op::Bytes),
        2 => (any::<u32>(), "[a-z ]{0,24}").prop_map(|(n, s)| Op::Print(n, s)),
        1 => Just(Op::Pop),
    ]
}

fn mode_rank(mode: Located) -> u8 {
    match mode {
        Located::Inline | Located::OnStack => 0,
        Located::OnHeap => 1,
    }
}

/// Apply `op` to both the buffer and a plain model of its content.
fn apply(xb: &mut XBuf<'_>, model: &mut Vec<u8>, op: &Op) {
    match op {
        Op::Byte(c) => {
            let dropped = *c == 0 && xb.located() == Located::Inline;
            xb.append_byte(*c);
            if !dropped {
                model.push(*c);
            }
        }
        Op::Bytes(bytes) => {
            assert_eq!(xb.append_bytes(bytes), bytes.len());
            model.extend_from_slice(bytes);
        }
        Op::Print(n, s) => {
            let text = format!("{n}:{s}");
            let written = xb.print(format_args!("{n}:{s}")).unwrap();
            assert_eq!(written, text.len());
            model.extend_from_slice(text.as_bytes());
        }
        Op::Pop => assert_eq!(xb.pop(), model.pop()),
    }
}

proptest! {
    #[test]
    fn prop_content_matches_model(ops in proptest::collection::vec(op(), 0..64)) {
        let mut xb = XBuf::new();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut xb, &mut model, op);
            prop_assert_eq!(xb.len(), model.len());
            prop_assert_eq!(xb.as_bytes(), &model[..]);
            prop_assert!(xb.capacity() >= xb.len());
        }
        prop_assert_eq!(xb.disown().into_vec(), model);
        prop_assert!(xb.is_empty());
    }

    #[test]
    fn prop_stack_backing_matches_model(
        size in 1usize..48,
        ops in proptest::collection::vec(op(), 0..32),
    ) {
        let mut backing = vec![0xaa; size];
        let mut xb = XBuf::with_backing(&mut backing);
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut xb, &mut model, op);
            prop_assert_eq!(xb.as_bytes(), &model[..]);
        }
    }

    #[test]
    fn prop_migration_is_monotonic(ops in proptest::collection::vec(op(), 0..64)) {
        let mut xb = XBuf::new();
        let mut model = Vec::new();
        let mut rank = mode_rank(xb.located());
        for op in &ops {
            apply(&mut xb, &mut model, op);
            let now = mode_rank(xb.located());
            prop_assert!(now >= rank);
            rank = now;
        }
    }

    #[test]
    fn prop_inspection_is_idempotent(bytes in proptest::collection::vec(1u8..=255, 0..200)) {
        let mut xb = XBuf::new();
        xb.append_bytes(&bytes);
        let first = xb.as_bytes().to_vec();
        prop_assert_eq!(xb.as_bytes(), &first[..]);
        let terminated = xb.terminate().to_vec();
        prop_assert_eq!(&terminated[..first.len()], &first[..]);
        prop_assert_eq!(terminated.last(), Some(&0));
        prop_assert_eq!(xb.as_bytes(), &first[..]);
    }

    #[test]
    fn prop_use_and_reset_returns_content(
        chunks in proptest::collection::vec(proptest::collection::vec(1u8..=255, 0..60), 1..8),
    ) {
        let mut xb = XBuf::new();
        for chunk in &chunks {
            xb.append_bytes(chunk);
            prop_assert_eq!(xb.use_and_reset(), &chunk[..]);
            prop_assert!(xb.is_empty());
        }
    }
}
