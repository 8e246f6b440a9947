use std::collections::VecDeque;

use proptest::prelude::*;
use ringfifo::{Fifo, InlineFifo, Storage, TransferError};

#[derive(Clone, Debug)]
enum Op {
    Push(u16),
    Pop,
    DropOne,
    DropMulti(usize),
    Peek,
    PeekAt(usize),
    PushArray(Vec<u16>),
    PopArray(usize),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u16>().prop_map(Op::Push),
        3 => Just(Op::Pop),
        1 => Just(Op::DropOne),
        1 => (0usize..12).prop_map(Op::DropMulti),
        1 => Just(Op::Peek),
        1 => (0usize..12).prop_map(Op::PeekAt),
        3 => prop::collection::vec(any::<u16>(), 0..12).prop_map(Op::PushArray),
        3 => (0usize..12).prop_map(Op::PopArray),
        1 => Just(Op::Reset),
    ]
}

// Applies `ops` to both the fifo and a `VecDeque` model and checks that every
// answer and the occupancy agree after each step.
fn check<S: Storage<Item = u16>>(fifo: &mut Fifo<S>, ops: &[Op]) -> Result<(), TestCaseError> {
    let cap = fifo.capacity();
    let mut model: VecDeque<u16> = VecDeque::new();

    for op in ops {
        match op {
            Op::Push(v) => {
                let res = fifo.push(*v);
                if model.len() < cap {
                    prop_assert!(res.is_ok());
                    model.push_back(*v);
                } else {
                    prop_assert_eq!(res.map_err(|e| e.element), Err(*v));
                }
            }
            Op::Pop => prop_assert_eq!(fifo.pop(), model.pop_front()),
            Op::DropOne => prop_assert_eq!(fifo.drop_one(), model.pop_front().is_some()),
            Op::DropMulti(n) => {
                let res = fifo.drop_multi(*n);
                if *n <= model.len() {
                    prop_assert_eq!(res, Ok(()));
                    model.drain(..*n);
                } else {
                    let err = TransferError::InsufficientData {
                        requested: *n,
                        available: model.len(),
                    };
                    prop_assert_eq!(res, Err(err));
                }
            }
            Op::Peek => prop_assert_eq!(fifo.peek(), model.front().copied()),
            Op::PeekAt(i) => prop_assert_eq!(fifo.peek_at(*i), model.get(*i).copied()),
            Op::PushArray(items) => {
                let res = fifo.push_array(items);
                let free = cap - model.len();
                if items.len() <= free {
                    prop_assert_eq!(res, Ok(()));
                    model.extend(items.iter().copied());
                } else {
                    let err = TransferError::InsufficientSpace {
                        requested: items.len(),
                        available: free,
                    };
                    prop_assert_eq!(res, Err(err));
                }
            }
            Op::PopArray(n) => {
                let mut out = vec![0xBEEF; *n];
                let res = fifo.pop_array(&mut out);
                if *n <= model.len() {
                    prop_assert_eq!(res, Ok(()));
                    let expected: Vec<u16> = model.drain(..*n).collect();
                    prop_assert_eq!(out, expected);
                } else {
                    prop_assert!(res.is_err());
                    prop_assert!(out.iter().all(|&v| v == 0xBEEF));
                }
            }
            Op::Reset => {
                fifo.reset();
                model.clear();
            }
        }

        prop_assert_eq!(fifo.count(), model.len());
        prop_assert!(fifo.count() <= cap);
        prop_assert_eq!(fifo.is_empty(), model.is_empty());
        prop_assert_eq!(fifo.is_full(), model.len() == cap);
    }
    Ok(())
}

proptest! {
    #[test]
    fn inline_matches_model(ops in prop::collection::vec(op(), 1..200)) {
        let mut fifo: InlineFifo<u16, 8> = Fifo::new();
        check(&mut fifo, &ops)?;
    }

    #[test]
    fn external_matches_model(ops in prop::collection::vec(op(), 1..200)) {
        let mut buf = [0u16; 4];
        let mut fifo = Fifo::with_buffer(&mut buf).unwrap();
        check(&mut fifo, &ops)?;
    }
}
