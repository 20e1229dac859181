use std::cmp::{max, min};
use std::collections::TryReserveError;

const MIN_CAPACITY: usize = 4 * 1024;
const INFLATE_RATIO: usize = 4;

// Same bound zlib's compressBound() gives for the default window and level.
pub fn compress_bound(len: usize) -> usize {
    len.saturating_add(len >> 12)
        .saturating_add(len >> 14)
        .saturating_add(len >> 25)
        .saturating_add(13)
}

pub fn initial_inflate_capacity(input_len: usize, ceiling: usize) -> usize {
    min(max(input_len.saturating_mul(INFLATE_RATIO), MIN_CAPACITY), ceiling)
}

/// Doubles the capacity of `buf`, never past `ceiling` total bytes.
/// Does nothing once `buf` already holds `ceiling` bytes.
pub fn grow(buf: &mut Vec<u8>, ceiling: usize) -> Result<(), TryReserveError> {
    let target = min(max(buf.capacity().saturating_mul(2), MIN_CAPACITY), ceiling);
    if target > buf.len() {
        buf.try_reserve_exact(target - buf.len())?;
    }

    Ok(())
}

pub fn read_u32_le(bytes: &[u8]) -> Option<u32> {
    let arr: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(arr))
}

#[test]
fn test_compress_bound() {
    assert_eq!(compress_bound(0), 13);
    assert_eq!(compress_bound(4096), 4096 + 1 + 13);
    assert_eq!(compress_bound(usize::MAX), usize::MAX);
}

#[test]
fn test_initial_inflate_capacity() {
    assert_eq!(initial_inflate_capacity(0, usize::MAX), MIN_CAPACITY);
    assert_eq!(initial_inflate_capacity(10_000, usize::MAX), 40_000);
    assert_eq!(initial_inflate_capacity(10_000, 100), 100);
}

#[test]
fn test_grow() {
    let mut buf = Vec::new();
    grow(&mut buf, usize::MAX).unwrap();
    assert!(buf.capacity() >= MIN_CAPACITY);

    let mut buf = Vec::with_capacity(10);
    buf.extend_from_slice(&[0; 10]);
    grow(&mut buf, 11).unwrap();
    assert!(buf.capacity() >= 11);

    buf.push(0);
    let cap = buf.capacity();
    grow(&mut buf, 11).unwrap();
    assert_eq!(buf.capacity(), cap);
}

#[test]
fn test_read_u32_le() {
    assert_eq!(read_u32_le(&[1, 0, 0, 0, 9]), Some(1));
    assert_eq!(read_u32_le(&[0xff, 0xff, 0xff, 0xff]), Some(u32::MAX));
    assert_eq!(read_u32_le(&[1, 2, 3]), None);
}
