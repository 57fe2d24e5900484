//! Record patterns shared by the section codecs: counted arrays,
//! fixed-capacity padded slots, sentinel separators, flag-gated blocks and
//! NUL-terminated text.

use std::borrow::Cow;

use crate::cursor::ByteCursor;
use crate::error::{Result, ScxError};

/// Separator written between (and inside) several sections.
pub const SENTINEL: u32 = 0xFFFF_FF9D;

pub fn read_sentinel(c: &mut ByteCursor, context: &str) -> Result<()> {
    let offset = c.position();
    let value = c.read_u32()?;
    if value != SENTINEL {
        return Err(ScxError::violation(format!(
            "{context}: expected separator 0x{SENTINEL:08X} at offset {offset}, found 0x{value:08X}"
        )));
    }
    Ok(())
}

pub fn write_sentinel(c: &mut ByteCursor) {
    c.write_u32(SENTINEL);
}

/// Read a signed 32-bit element count; negative counts are corrupt input.
pub fn read_count(c: &mut ByteCursor, what: &str) -> Result<usize> {
    let offset = c.position();
    let count = c.read_i32()?;
    usize::try_from(count).map_err(|_| {
        ScxError::violation(format!("negative {what} count {count} at offset {offset}"))
    })
}

/// Read a signed 32-bit element count, treating negative values as zero.
///
/// Only used at the sites where the format is known to carry `-1` counts.
pub fn read_clamped_count(c: &mut ByteCursor) -> Result<usize> {
    let count = c.read_i32()?;
    Ok(usize::try_from(count).unwrap_or(0))
}

pub fn write_count(c: &mut ByteCursor, len: usize, what: &str) -> Result<()> {
    let count = i32::try_from(len)
        .map_err(|_| ScxError::violation(format!("{what} count {len} overflows i32")))?;
    c.write_i32(count);
    Ok(())
}

pub fn read_vec<T>(
    c: &mut ByteCursor,
    count: usize,
    mut read: impl FnMut(&mut ByteCursor) -> Result<T>,
) -> Result<Vec<T>> {
    // Cap the preallocation: a corrupt count must fail on OutOfData, not on allocation.
    let mut out = Vec::with_capacity(count.min(c.remaining()));
    for _ in 0..count {
        out.push(read(c)?);
    }
    Ok(out)
}

/// Read an i32 count followed by that many records.
pub fn read_counted<T>(
    c: &mut ByteCursor,
    what: &str,
    read: impl FnMut(&mut ByteCursor) -> Result<T>,
) -> Result<Vec<T>> {
    let count = read_count(c, what)?;
    read_vec(c, count, read)
}

pub fn write_counted<T>(
    c: &mut ByteCursor,
    items: &[T],
    what: &str,
    mut write: impl FnMut(&mut ByteCursor, &T) -> Result<()>,
) -> Result<()> {
    write_count(c, items.len(), what)?;
    for item in items {
        write(c, item)?;
    }
    Ok(())
}

pub fn expect_len(actual: usize, expected: usize, what: &str) -> Result<()> {
    if actual != expected {
        return Err(ScxError::violation(format!(
            "{what} has {actual} entries, expected exactly {expected}"
        )));
    }
    Ok(())
}

pub fn expect_paired(left: usize, right: usize, what: &str) -> Result<()> {
    if left != right {
        return Err(ScxError::violation(format!(
            "{what}: {left} records but {right} display indices"
        )));
    }
    Ok(())
}

/// Read per-slot id lists stored as `slots` counts followed by `slots`
/// fixed-stride blocks of `capacity` u32 values, zero padded.
pub fn read_padded_lists(
    c: &mut ByteCursor,
    slots: usize,
    capacity: usize,
    what: &str,
) -> Result<Vec<Vec<u32>>> {
    let mut counts = Vec::with_capacity(slots);
    for _ in 0..slots {
        counts.push(read_clamped_count(c)?);
    }

    let mut lists = Vec::with_capacity(slots);
    for (slot, count) in counts.into_iter().enumerate() {
        if count > capacity {
            return Err(ScxError::violation(format!(
                "{what} slot {slot} holds {count} ids, capacity is {capacity}"
            )));
        }
        let ids = read_vec(c, count, ByteCursor::read_u32)?;
        c.skip(4 * (capacity - count))?;
        lists.push(ids);
    }
    Ok(lists)
}

/// Check slot count and per-slot capacity without writing anything.
pub fn check_padded_lists(
    lists: &[Vec<u32>],
    slots: usize,
    capacity: usize,
    what: &str,
) -> Result<()> {
    expect_len(lists.len(), slots, what)?;
    for (slot, ids) in lists.iter().enumerate() {
        if ids.len() > capacity {
            return Err(ScxError::violation(format!(
                "{what} slot {slot} holds {} ids, capacity is {capacity}",
                ids.len()
            )));
        }
    }
    Ok(())
}

pub fn write_padded_lists(
    c: &mut ByteCursor,
    lists: &[Vec<u32>],
    slots: usize,
    capacity: usize,
    what: &str,
) -> Result<()> {
    check_padded_lists(lists, slots, capacity, what)?;

    for ids in lists {
        write_count(c, ids.len(), what)?;
    }
    for ids in lists {
        for &id in ids {
            c.write_u32(id);
        }
        c.write_zeros(4 * (capacity - ids.len()));
    }
    Ok(())
}

/// Decode a flag-gated block: `read` only runs when `present` is set.
pub fn read_if<T>(
    c: &mut ByteCursor,
    present: bool,
    read: impl FnOnce(&mut ByteCursor) -> Result<T>,
) -> Result<Option<T>> {
    if present { read(c).map(Some) } else { Ok(None) }
}

/// The 32-bit "included" flag implied by an optional block.
pub fn presence_flag<T>(value: &Option<T>) -> u32 {
    u32::from(value.is_some())
}

/// `s` with exactly one trailing NUL appended when it does not already end in one.
pub fn with_terminator(s: &str) -> Cow<'_, str> {
    if s.ends_with('\0') {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("{s}\0"))
    }
}

pub fn write_terminated_string_i32(c: &mut ByteCursor, s: &str) -> Result<()> {
    c.write_string_i32(&with_terminator(s))
}
