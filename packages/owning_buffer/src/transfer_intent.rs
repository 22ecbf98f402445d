/// Declares what the caller allows a callee to do with a buffer it hands over.
///
/// Generic code that stores a buffer on behalf of a caller must not guess. A caller that still
/// needs its buffer afterwards passes [`TransferIntent::Copy`]; a caller that is done with it
/// passes [`TransferIntent::Move`] and accepts that its buffer is left empty.
///
/// # Examples
///
/// ```
/// use owning_buffer::{BufferStore, OwningBuffer, TransferIntent};
///
/// let mut store = BufferStore::new();
///
/// let mut kept = OwningBuffer::with_len(16);
/// let mut given_away = OwningBuffer::with_len(16);
///
/// store.insert_forwarded(&mut kept, TransferIntent::Copy).unwrap();
/// store.insert_forwarded(&mut given_away, TransferIntent::Move).unwrap();
///
/// assert_eq!(kept.len(), 16);
/// assert!(given_away.is_empty());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TransferIntent {
    /// The value is persistent: the callee duplicates it and the caller's value is unchanged.
    /// This is the default because it never invalidates anything the caller holds.
    #[default]
    Copy,

    /// The value is transferable: the callee adopts its region and the caller's value becomes
    /// empty. No bytes are copied and nothing is allocated.
    Move,
}

impl TransferIntent {
    /// Whether honoring this intent leaves the caller's buffer empty.
    #[must_use]
    #[inline]
    pub fn empties_source(self) -> bool {
        matches!(self, Self::Move)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_is_copy() {
        assert_eq!(TransferIntent::default(), TransferIntent::Copy);
    }

    #[test]
    fn only_move_empties_source() {
        assert!(TransferIntent::Move.empties_source());
        assert!(!TransferIntent::Copy.empties_source());
    }
}
