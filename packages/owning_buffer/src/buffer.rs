use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;

use tracing::{debug, trace};

use crate::{Error, OwningBufferBuilder, Result, TransferIntent, stats};

/// A byte buffer that exclusively owns its heap region and makes every transfer explicit.
///
/// The buffer either owns a region of exactly [`len()`](Self::len) bytes or owns nothing, in
/// which case its length is zero. A region is never shared between two buffers.
///
/// Ownership can leave a buffer in two ways:
///
/// * **Duplication** ([`Clone`], [`try_clone()`](Self::try_clone),
///   [`copy_from()`](Self::copy_from)) allocates a new region and copies the bytes. The source
///   is unchanged. Cost is proportional to the length.
/// * **Ownership transfer** ([`take()`](Self::take), [`take_from()`](Self::take_from)) adopts
///   the source's region and leaves the source empty. Nothing is allocated or copied.
///
/// An emptied buffer remains fully usable: it can be inspected, dropped, released again or
/// assigned a new value.
///
/// Every allocation, copy, move and release is recorded in the per-thread
/// [`TransferStats`][crate::TransferStats] and published as `nm` metrics events.
///
/// # Examples
///
/// ```
/// use owning_buffer::OwningBuffer;
///
/// let mut a = OwningBuffer::with_len(100);
///
/// // Transfer ownership; `a` is left empty but valid.
/// let b = OwningBuffer::take(&mut a);
/// assert_eq!(a.len(), 0);
/// assert_eq!(b.len(), 100);
///
/// // Duplicate; `b` is unchanged and `c` owns a distinct region.
/// let c = b.clone();
/// assert_eq!(b.len(), 100);
/// assert_eq!(c.len(), 100);
/// assert_ne!(b.as_ptr(), c.as_ptr());
/// ```
///
/// # Self-assignment
///
/// Copy-assignment and move-assignment borrow the target mutably and the source separately,
/// so a buffer cannot be assigned to itself. Where aliasing can be expressed through indexes,
/// [`BufferStore`][crate::BufferStore] detects it at runtime.
pub struct OwningBuffer {
    // Only `Some` for regions of non-zero length.
    region: Option<Box<[u8]>>,
}

impl OwningBuffer {
    /// Creates an empty buffer that owns no region.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self { region: None }
    }

    /// Starts building a buffer with non-default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use owning_buffer::OwningBuffer;
    ///
    /// let buffer = OwningBuffer::builder().len(4).fill(0xAB).build().unwrap();
    ///
    /// assert_eq!(buffer.as_slice(), &[0xAB; 4]);
    /// ```
    #[inline]
    pub fn builder() -> OwningBufferBuilder {
        OwningBufferBuilder::new()
    }

    /// Creates a buffer owning a zero-filled region of `len` bytes.
    ///
    /// A length of zero creates a buffer that owns no region.
    ///
    /// # Panics
    ///
    /// Panics if the region cannot be allocated. Use [`try_with_len()`](Self::try_with_len)
    /// to handle allocation failure.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self::try_with_len(len).unwrap_or_else(|error| panic!("{error}"))
    }

    /// Creates a buffer owning a zero-filled region of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the region cannot be allocated. No buffer
    /// is created in that case.
    pub fn try_with_len(len: usize) -> Result<Self> {
        Self::filled(len, 0)
    }

    pub(crate) fn filled(len: usize, fill: u8) -> Result<Self> {
        let region = allocate_region(len, fill)?;

        trace!(len, "buffer created");

        Ok(Self { region })
    }

    /// Creates a new buffer with a region of its own, holding the same bytes as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the region cannot be allocated.
    pub fn try_clone(&self) -> Result<Self> {
        let region = duplicate_region(self.as_slice())?;
        stats::record_copy(self.len());

        trace!(len = self.len(), "buffer created from copy");

        Ok(Self { region })
    }

    /// Creates a buffer that adopts the region of `source`, leaving `source` empty.
    ///
    /// This is the explicit form of move construction: the caller hands over exclusive access
    /// to `source` and gets back a buffer with the same length and contents without any bytes
    /// being allocated or copied.
    ///
    /// # Examples
    ///
    /// ```
    /// use owning_buffer::OwningBuffer;
    ///
    /// let mut source = OwningBuffer::with_len(10);
    /// let destination = OwningBuffer::take(&mut source);
    ///
    /// assert!(source.is_empty());
    /// assert!(!source.is_allocated());
    /// assert_eq!(destination.len(), 10);
    /// ```
    #[must_use]
    pub fn take(source: &mut Self) -> Self {
        let region = source.region.take();
        let taken = Self { region };
        stats::record_move(taken.len());

        trace!(len = taken.len(), "buffer created from move");

        taken
    }

    /// Creates a buffer from `source` by either duplicating it or adopting its region,
    /// as declared by `intent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if `intent` is [`TransferIntent::Copy`] and the
    /// new region cannot be allocated. `source` is unchanged in that case.
    pub fn transfer(source: &mut Self, intent: TransferIntent) -> Result<Self> {
        match intent {
            TransferIntent::Copy => source.try_clone(),
            TransferIntent::Move => Ok(Self::take(source)),
        }
    }

    /// Replaces the contents of `self` with a duplicate of `source`.
    ///
    /// # Panics
    ///
    /// Panics if the new region cannot be allocated. Use
    /// [`try_copy_from()`](Self::try_copy_from) to handle allocation failure.
    pub fn copy_from(&mut self, source: &Self) {
        self.try_copy_from(source).unwrap_or_else(|error| panic!("{error}"));
    }

    /// Replaces the contents of `self` with a duplicate of `source`.
    ///
    /// The new region is allocated before the current one is released.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the new region cannot be allocated. `self` still
    /// owns its previous region in that case.
    pub fn try_copy_from(&mut self, source: &Self) -> Result<()> {
        let region = duplicate_region(source.as_slice())?;
        stats::record_copy(source.len());

        trace!(
            previous_len = self.len(),
            len = source.len(),
            "buffer assigned from copy"
        );

        release_region(mem::replace(&mut self.region, region));
        Ok(())
    }

    /// Releases the region of `self` and adopts the region of `source`, leaving `source` empty.
    ///
    /// This is the explicit form of move assignment.
    ///
    /// # Examples
    ///
    /// ```
    /// use owning_buffer::OwningBuffer;
    ///
    /// let mut target = OwningBuffer::with_len(20);
    /// let mut source = OwningBuffer::with_len(10);
    ///
    /// target.take_from(&mut source);
    ///
    /// assert_eq!(target.len(), 10);
    /// assert!(source.is_empty());
    /// ```
    pub fn take_from(&mut self, source: &mut Self) {
        let region = source.region.take();
        let len = region.as_ref().map_or(0, |region| region.len());
        stats::record_move(len);

        trace!(previous_len = self.len(), len, "buffer assigned from move");

        release_region(mem::replace(&mut self.region, region));
    }

    /// Releases the owned region, if any, leaving the buffer empty.
    ///
    /// Calling this on a buffer that owns no region does nothing, so it is safe to call any
    /// number of times. Dropping a buffer performs the same release.
    pub fn release(&mut self) {
        release_region(self.region.take());
    }

    /// Number of bytes in the owned region. Zero if no region is owned.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.region.as_ref().map_or(0, |region| region.len())
    }

    /// Whether the buffer has a length of zero.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
    }

    /// Whether the buffer owns a heap region. Always the opposite of
    /// [`is_empty()`](Self::is_empty).
    #[must_use]
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.region.is_some()
    }

    /// The owned bytes, or an empty slice if no region is owned.
    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.region.as_deref().unwrap_or(&[])
    }

    /// The owned bytes, or an empty slice if no region is owned.
    #[must_use]
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.region.as_deref_mut() {
            Some(region) => region,
            None => &mut [],
        }
    }

    /// Address of the owned region, or null if no region is owned.
    ///
    /// Useful for checking whether two buffers own distinct allocations.
    #[must_use]
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.region.as_ref().map_or(ptr::null(), |region| region.as_ptr())
    }
}

fn reserve_region(len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(len).map_err(|source| {
        debug!(requested_len = len, "byte region allocation failed");
        Error::AllocationFailure {
            requested_len: len,
            source,
        }
    })?;
    Ok(bytes)
}

fn allocate_region(len: usize, fill: u8) -> Result<Option<Box<[u8]>>> {
    if len == 0 {
        return Ok(None);
    }

    let mut bytes = reserve_region(len)?;
    bytes.resize(len, fill);

    stats::record_allocation(len);
    Ok(Some(bytes.into_boxed_slice()))
}

fn duplicate_region(source: &[u8]) -> Result<Option<Box<[u8]>>> {
    if source.is_empty() {
        return Ok(None);
    }

    let mut bytes = reserve_region(source.len())?;
    bytes.extend_from_slice(source);

    stats::record_allocation(source.len());
    Ok(Some(bytes.into_boxed_slice()))
}

fn release_region(region: Option<Box<[u8]>>) {
    if let Some(region) = region {
        trace!(len = region.len(), "buffer region released");
        stats::record_release();
        drop(region);
    }
}

impl Default for OwningBuffer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OwningBuffer {
    /// # Panics
    ///
    /// Panics if the new region cannot be allocated.
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|error| panic!("{error}"))
    }

    fn clone_from(&mut self, source: &Self) {
        self.copy_from(source);
    }
}

impl Drop for OwningBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl Deref for OwningBuffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl DerefMut for OwningBuffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl AsRef<[u8]> for OwningBuffer {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for OwningBuffer {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl PartialEq for OwningBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for OwningBuffer {}

impl fmt::Debug for OwningBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwningBuffer")
            .field("len", &self.len())
            .field("is_allocated", &self.is_allocated())
            .finish()
    }
}
