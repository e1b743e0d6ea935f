use alloc::vec::Vec;
use core::cmp::Ordering;

use quickcheck::{QuickCheck, TestResult};

use super::quickcheck_tests;
use crate::ByteBuffer;

/// Property: the interchange form rebuilds an equal buffer.
#[test]
fn json_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let buf = ByteBuffer::from_vec(bytes.clone());
        let rebuilt = ByteBuffer::from_array(buf.to_json().data);
        rebuilt == buf && rebuilt.to_vec() == bytes
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Property: `compare` agrees with slice ordering, is antisymmetric, and a
/// proper prefix always orders first.
#[test]
fn compare_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(a: Vec<u8>, b: Vec<u8>, tail: Vec<u8>) -> bool {
        let x = ByteBuffer::from_vec(a.clone());
        let y = ByteBuffer::from_vec(b.clone());
        let forward = x.compare(&y);
        let antisymmetric = forward == y.compare(&x).reverse();
        let agrees = forward == a.as_slice().cmp(b.as_slice());

        let mut longer = a.clone();
        longer.extend_from_slice(&tail);
        let prefix_rule =
            tail.is_empty() || x.compare(&ByteBuffer::from_vec(longer)) == Ordering::Less;

        antisymmetric && agrees && prefix_rule
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, Vec<u8>, Vec<u8>) -> bool);
}

/// Property: `compare` is transitive.
#[test]
fn compare_transitive_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(a: Vec<u8>, b: Vec<u8>, c: Vec<u8>) -> TestResult {
        let (a, b, c) = (
            ByteBuffer::from_vec(a),
            ByteBuffer::from_vec(b),
            ByteBuffer::from_vec(c),
        );
        if a.compare(&b) == Ordering::Greater || b.compare(&c) == Ordering::Greater {
            return TestResult::discard();
        }
        TestResult::from_bool(a.compare(&c) != Ordering::Greater)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, Vec<u8>, Vec<u8>) -> TestResult);
}

/// Property: concatenation preserves length and order, and never aliases its
/// inputs.
#[test]
fn concat_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(a: Vec<u8>, b: Vec<u8>) -> bool {
        let x = ByteBuffer::from_vec(a.clone());
        let y = ByteBuffer::from_vec(b.clone());
        let joined = ByteBuffer::concat([&x, &y]);

        let mut expected = a;
        expected.extend_from_slice(&b);
        joined.len() == x.len() + y.len()
            && joined.to_vec() == expected
            && !joined.shares_storage(&x)
            && !joined.shares_storage(&y)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, Vec<u8>) -> bool);
}

/// Property: copying within one buffer, with arbitrary overlap, matches a copy
/// made through a temporary.
#[test]
fn overlapping_copy_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, source_start: usize, source_end: usize, target_start: usize) -> TestResult {
        if bytes.is_empty() {
            return TestResult::discard();
        }
        let len = bytes.len();
        let source_start = source_start % (len + 1);
        let source_end = source_start + source_end % (len - source_start + 1);
        let target_start = target_start % (len + 1);

        let buf = ByteBuffer::from_vec(bytes.clone());
        let Ok(copied) = buf.copy(&buf, target_start, source_start..source_end) else {
            return TestResult::failed();
        };

        let mut expected = bytes.clone();
        let count = (source_end - source_start).min(len - target_start);
        let aside = bytes[source_start..source_start + count].to_vec();
        expected[target_start..target_start + count].copy_from_slice(&aside);

        TestResult::from_bool(copied == count && buf.to_vec() == expected)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, usize, usize, usize) -> TestResult);
}

/// Property: writes through a slice are visible through its source and the
/// other way round.
#[test]
fn slice_aliasing_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>, start: usize, index: usize, value: u8) -> TestResult {
        if bytes.is_empty() {
            return TestResult::discard();
        }
        let buf = ByteBuffer::from_vec(bytes);
        let start = start % buf.len();
        let view = buf.slice(start..);
        let index = index % view.len();

        if view.set(index, value).is_err() || buf.get(start + index) != Some(value) {
            return TestResult::failed();
        }
        let flipped = value.wrapping_add(1);
        if buf.set(start + index, flipped).is_err() {
            return TestResult::failed();
        }
        TestResult::from_bool(view.get(index) == Some(flipped))
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, usize, usize, u8) -> TestResult);
}
