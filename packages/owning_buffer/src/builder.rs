use crate::{OwningBuffer, Result};

/// Builder for creating an instance of [`OwningBuffer`] with non-default settings.
///
/// All settings are optional. Without any settings, the builder creates an empty buffer.
///
/// # Examples
///
/// ```
/// use owning_buffer::OwningBuffer;
///
/// let buffer = OwningBuffer::builder().len(1024).fill(0xFF).build().unwrap();
///
/// assert_eq!(buffer.len(), 1024);
/// assert!(buffer.iter().all(|b| *b == 0xFF));
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct OwningBufferBuilder {
    len: usize,
    fill: u8,
}

impl OwningBufferBuilder {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the number of bytes in the region the buffer will own.
    ///
    /// Defaults to zero, in which case the buffer owns no region.
    #[inline]
    pub fn len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Sets the value every byte of the region is initialized to. Defaults to zero.
    #[inline]
    pub fn fill(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }

    /// Allocates the region and creates the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if the region
    /// cannot be allocated.
    pub fn build(self) -> Result<OwningBuffer> {
        OwningBuffer::filled(self.len, self.fill)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_builds_empty_buffer() {
        let buffer = OwningBuffer::builder().build().unwrap();

        assert!(buffer.is_empty());
        assert!(!buffer.is_allocated());
    }

    #[test]
    fn fill_without_len_stays_empty() {
        let buffer = OwningBuffer::builder().fill(9).build().unwrap();

        assert!(buffer.is_empty());
    }

    #[test]
    fn len_and_fill_are_applied() {
        let buffer = OwningBuffer::builder().len(16).fill(0x5A).build().unwrap();

        assert_eq!(buffer.len(), 16);
        assert_eq!(buffer.as_slice(), &[0x5A; 16]);
    }

    #[test]
    fn build_reports_allocation_failure() {
        let result = OwningBuffer::builder().len(usize::MAX).build();

        assert!(result.is_err());
    }
}
