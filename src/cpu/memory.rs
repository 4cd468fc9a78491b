//! Flat byte memory with ring addressing.
//!
//! The buffer size is chosen by the host when the machine is created and is
//! fixed for the lifetime of the context. Every address is reduced modulo
//! the size before dereferencing, so no access can touch bytes outside the
//! buffer. Words are four little-endian bytes, and each byte offset wraps
//! around the ring independently: a word starting at the last byte continues
//! at offset zero.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte-addressable machine memory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Create a zero-filled buffer of `size` bytes.
    ///
    /// # Panics
    /// Panics if `size` is zero; a machine needs at least one byte of memory.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "memory size must be nonzero");
        Self {
            bytes: vec![0; size],
        }
    }

    /// Buffer size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; the constructor rejects empty buffers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Wrap an address plus a byte offset onto the ring.
    #[inline]
    fn index(&self, addr: u32, offset: u32) -> usize {
        ((addr as u64 + offset as u64) % self.bytes.len() as u64) as usize
    }

    /// Read one byte at the wrapped address.
    #[inline]
    pub fn load8(&self, addr: u32) -> u8 {
        self.bytes[self.index(addr, 0)]
    }

    /// Read a little-endian 32-bit word starting at the wrapped address.
    pub fn load32(&self, addr: u32) -> u32 {
        let mut word = 0u32;
        for i in 0..4 {
            word |= (self.bytes[self.index(addr, i)] as u32) << (8 * i);
        }
        word
    }

    /// Write a little-endian 32-bit word starting at the wrapped address.
    pub fn store32(&mut self, addr: u32, value: u32) {
        for i in 0..4 {
            let index = self.index(addr, i);
            self.bytes[index] = (value >> (8 * i)) as u8;
        }
    }

    /// Zero the whole buffer.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Copy a program image into memory starting at address zero.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        if image.len() > self.bytes.len() {
            return Err(MemoryError::ImageTooLarge {
                size: image.len(),
                available: self.bytes.len(),
            });
        }
        self.bytes[..image.len()].copy_from_slice(image);
        Ok(())
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only summarize; buffers can be large
        let non_zero = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .field("non_zero_bytes", &non_zero)
            .finish()
    }
}

/// Errors that can occur while loading memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Program image does not fit in the buffer.
    #[error("image size {size} exceeds memory size {available}")]
    ImageTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_store_load_roundtrip() {
        let mut mem = Memory::new(64);
        mem.store32(12, 0xCAFEBABE);
        assert_eq!(mem.load32(12), 0xCAFEBABE);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut mem = Memory::new(16);
        mem.store32(0, 0x04030201);
        assert_eq!(mem.load8(0), 0x01);
        assert_eq!(mem.load8(1), 0x02);
        assert_eq!(mem.load8(2), 0x03);
        assert_eq!(mem.load8(3), 0x04);
    }

    #[test]
    fn test_word_wraps_around_end_of_buffer() {
        let mut mem = Memory::new(8);
        mem.store32(6, 0xDDCCBBAA);
        assert_eq!(mem.load8(6), 0xAA);
        assert_eq!(mem.load8(7), 0xBB);
        assert_eq!(mem.load8(0), 0xCC);
        assert_eq!(mem.load8(1), 0xDD);
        assert_eq!(mem.load32(6), 0xDDCCBBAA);
    }

    #[test]
    fn test_load_image() {
        let mut mem = Memory::new(8);
        mem.load_image(&[1, 2, 3]).unwrap();
        assert_eq!(mem.load8(0), 1);
        assert_eq!(mem.load8(2), 3);
        assert_eq!(mem.load8(3), 0);

        let err = mem.load_image(&[0; 9]).unwrap_err();
        assert_eq!(
            err,
            MemoryError::ImageTooLarge {
                size: 9,
                available: 8
            }
        );
    }

    proptest! {
        #[test]
        fn prop_store_load_roundtrip(addr: u32, value: u32) {
            let mut mem = Memory::new(256);
            mem.store32(addr, value);
            prop_assert_eq!(mem.load32(addr), value);
        }

        #[test]
        fn prop_wraparound_idempotence(addr in 0u32..10_000, k in 0u32..40, value: u32) {
            // load32(addr) == load32(addr + k * size)
            let size = 100u32;
            let mut mem = Memory::new(size as usize);
            mem.store32(addr, value);
            prop_assert_eq!(mem.load32(addr + k * size), value);
        }
    }
}
