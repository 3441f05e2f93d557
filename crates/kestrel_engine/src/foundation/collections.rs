//! Specialized collection types
//!
//! [`DynArray`] is a growable buffer of fixed-size, type-erased elements. It backs
//! the engine's subsystem member lists and mesh vertex/index storage, where the
//! element layout is decided at runtime and the bytes are handed to a backend
//! without re-packing.

use bytemuck::Pod;
use thiserror::Error;

/// Number of element slots allocated by [`DynArray::new`]
pub const INITIAL_CAPACITY: usize = 8;

/// Errors reported by [`DynArray`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// Index outside `0..len`
    #[error("index {index} out of range for array of length {len}")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Element count at the time of the call
        len: usize,
    },

    /// Element passed in does not match the array's element size
    #[error("element is {actual} bytes but the array stores {expected}-byte elements")]
    ElementSizeMismatch {
        /// Element size fixed at creation
        expected: usize,
        /// Size of the rejected element
        actual: usize,
    },

    /// Arrays of zero-sized elements are not supported
    #[error("element size must be greater than zero")]
    ZeroElementSize,
}

/// Growable array of fixed-size elements stored as raw bytes
///
/// Capacity starts at [`INITIAL_CAPACITY`] and doubles when an append finds the
/// array full. Growth moves every element into a new allocation, so slices
/// returned by [`get`](Self::get) or [`append`](Self::append) never outlive the
/// next append (the borrow checker enforces this).
#[derive(Debug, Clone)]
pub struct DynArray {
    element_size: usize,
    len: usize,
    capacity: usize,
    data: Vec<u8>,
}

impl DynArray {
    /// Create an empty array for elements of `element_size` bytes
    pub fn new(element_size: usize) -> Result<Self, ArrayError> {
        if element_size == 0 {
            return Err(ArrayError::ZeroElementSize);
        }

        Ok(Self {
            element_size,
            len: 0,
            capacity: INITIAL_CAPACITY,
            data: Vec::with_capacity(INITIAL_CAPACITY * element_size),
        })
    }

    /// Create an empty array sized for values of type `T`
    pub fn for_type<T: Pod>() -> Result<Self, ArrayError> {
        Self::new(std::mem::size_of::<T>())
    }

    /// Size in bytes of every element
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no elements are stored
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements that fit before the next growth
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy `element` into the next free slot, growing if the array is full
    ///
    /// Returns the stored copy.
    pub fn append(&mut self, element: &[u8]) -> Result<&mut [u8], ArrayError> {
        if element.len() != self.element_size {
            return Err(ArrayError::ElementSizeMismatch {
                expected: self.element_size,
                actual: element.len(),
            });
        }

        if self.len == self.capacity {
            self.grow();
        }

        let start = self.len * self.element_size;
        self.data.extend_from_slice(element);
        self.len += 1;
        Ok(&mut self.data[start..start + self.element_size])
    }

    /// Remove the element at `index`, shifting later elements down one slot
    pub fn remove_at(&mut self, index: usize) -> Result<(), ArrayError> {
        self.check_index(index)?;

        let start = index * self.element_size;
        self.data.drain(start..start + self.element_size);
        self.len -= 1;
        Ok(())
    }

    /// Borrow the element at `index`
    pub fn get(&self, index: usize) -> Result<&[u8], ArrayError> {
        self.check_index(index)?;
        let start = index * self.element_size;
        Ok(&self.data[start..start + self.element_size])
    }

    /// Mutably borrow the element at `index`
    pub fn get_mut(&mut self, index: usize) -> Result<&mut [u8], ArrayError> {
        self.check_index(index)?;
        let start = index * self.element_size;
        Ok(&mut self.data[start..start + self.element_size])
    }

    /// Remove every element, keeping the current capacity
    pub fn clear(&mut self) {
        self.data.clear();
        self.len = 0;
    }

    /// Iterate over element slices in index order
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(self.element_size)
    }

    /// The whole populated region as one contiguous byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Append a plain-old-data value
    ///
    /// Returns the index the value was stored at.
    pub fn push_value<T: Pod>(&mut self, value: &T) -> Result<usize, ArrayError> {
        self.append(bytemuck::bytes_of(value))?;
        Ok(self.len - 1)
    }

    /// Read the element at `index` as a plain-old-data value
    pub fn read_value<T: Pod>(&self, index: usize) -> Result<T, ArrayError> {
        self.check_value_size::<T>()?;
        Ok(bytemuck::pod_read_unaligned(self.get(index)?))
    }

    /// Index of the first element equal to `value`
    pub fn position_of<T: Pod + PartialEq>(&self, value: &T) -> Option<usize> {
        if self.check_value_size::<T>().is_err() {
            return None;
        }
        self.iter()
            .position(|bytes| bytemuck::pod_read_unaligned::<T>(bytes) == *value)
    }

    fn check_index(&self, index: usize) -> Result<(), ArrayError> {
        if index < self.len {
            Ok(())
        } else {
            Err(ArrayError::OutOfRange { index, len: self.len })
        }
    }

    fn check_value_size<T: Pod>(&self) -> Result<(), ArrayError> {
        let actual = std::mem::size_of::<T>();
        if actual == self.element_size {
            Ok(())
        } else {
            Err(ArrayError::ElementSizeMismatch {
                expected: self.element_size,
                actual,
            })
        }
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        let mut data = Vec::with_capacity(new_capacity * self.element_size);
        data.extend_from_slice(&self.data);
        self.data = data;
        self.capacity = new_capacity;
        log::trace!(
            "DynArray grew to {} elements of {} bytes",
            new_capacity,
            self.element_size
        );
    }
}
