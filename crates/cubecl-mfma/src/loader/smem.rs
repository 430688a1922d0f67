use bytemuck::Pod;

use crate::{
    elem::{ElemType, Scalar},
    error::MfmaLoadError,
};

/// Access to the shared memory holding an operand tile.
///
/// Every method must be side effect free: the loader may call them in any order and any number
/// of times.
pub trait SharedMemory {
    /// Address of the tile before swizzling, in elements, for the given contiguous axis.
    fn base_pointer(&self, axis: u32) -> usize;

    /// Swizzle adjustment applied by the allocator for the given contiguous axis.
    fn swizzle_offset(&self, axis: u32) -> u32;

    /// Read the element of type `elem` at `address`, in elements.
    fn load(&self, elem: ElemType, address: usize) -> Result<Scalar, MfmaLoadError>;
}

/// A shared memory image held on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedBuffer {
    data: Vec<u8>,
    base: usize,
    swizzle_offsets: [u32; 2],
}

impl SharedBuffer {
    /// Create a buffer from typed data. `T` must have the layout of the element type later read.
    pub fn from_slice<T: Pod>(values: &[T]) -> Self {
        Self {
            data: bytemuck::cast_slice(values).to_vec(),
            base: 0,
            swizzle_offsets: [0; 2],
        }
    }

    /// Place the tile `base` elements into the buffer.
    pub fn with_base(mut self, base: usize) -> Self {
        self.base = base;
        self
    }

    pub fn with_swizzle_offsets(mut self, swizzle_offsets: [u32; 2]) -> Self {
        self.swizzle_offsets = swizzle_offsets;
        self
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl SharedMemory for SharedBuffer {
    fn base_pointer(&self, _axis: u32) -> usize {
        self.base
    }

    fn swizzle_offset(&self, axis: u32) -> u32 {
        self.swizzle_offsets[axis as usize]
    }

    fn load(&self, elem: ElemType, address: usize) -> Result<Scalar, MfmaLoadError> {
        let start = address * elem.size();
        let bytes = self
            .data
            .get(start..start + elem.size())
            .ok_or(MfmaLoadError::SharedMemoryOutOfBounds {
                address,
                size: self.data.len(),
            })?;

        Ok(Scalar::from_le_bytes(elem, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elem::{FloatKind, IntKind};
    use half::f16;

    #[test]
    fn reads_typed_elements() {
        let values = [f16::from_f32(1.0), f16::from_f32(2.0), f16::from_f32(3.0)];
        let buffer = SharedBuffer::from_slice(&values);

        assert_eq!(buffer.size(), 6);
        assert_eq!(
            buffer.load(ElemType::Float(FloatKind::F16), 2),
            Ok(Scalar::F16(f16::from_f32(3.0)))
        );
    }

    #[test]
    fn base_and_swizzle_are_reported() {
        let buffer = SharedBuffer::from_slice(&[0i8; 16])
            .with_base(4)
            .with_swizzle_offsets([3, 7]);

        assert_eq!(buffer.base_pointer(1), 4);
        assert_eq!(buffer.swizzle_offset(1), 7);
        assert_eq!(buffer.load(ElemType::Int(IntKind::I8), 15), Ok(Scalar::I8(0)));
    }

    #[test]
    fn reads_past_the_end_are_errors() {
        let buffer = SharedBuffer::from_slice(&[f16::ZERO; 4]);

        assert_eq!(
            buffer.load(ElemType::Float(FloatKind::F16), 4),
            Err(MfmaLoadError::SharedMemoryOutOfBounds {
                address: 4,
                size: 8
            })
        );
        // A wider element straddling the end.
        assert!(buffer.load(ElemType::Float(FloatKind::F32), 2).is_err());
    }
}
