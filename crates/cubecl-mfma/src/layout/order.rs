use crate::error::MfmaLoadError;

/// Storage order of a rank 2 shared memory tile, fastest varying axis first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageOrder([u32; 2]);

impl StorageOrder {
    /// Row major: columns (axis 1) are contiguous.
    pub const ROW_MAJOR: Self = Self([1, 0]);
    /// Column major: rows (axis 0) are contiguous.
    pub const COL_MAJOR: Self = Self([0, 1]);

    /// Validate an order coming from a tile descriptor.
    pub fn new(order: &[u32]) -> Result<Self, MfmaLoadError> {
        match order {
            [0, 1] => Ok(Self::COL_MAJOR),
            [1, 0] => Ok(Self::ROW_MAJOR),
            _ => Err(MfmaLoadError::InvalidOrder {
                order: order.to_vec(),
            }),
        }
    }

    /// The contiguous axis.
    pub fn fastest(&self) -> u32 {
        self.0[0]
    }

    /// Whether the slowest logical axis (rows) is the contiguous one.
    pub fn is_transposed(&self) -> bool {
        self.0[0] == 0
    }

    pub fn as_array(&self) -> [u32; 2] {
        self.0
    }

    /// Logical `(row, col)` of the element stored at `offset` in a `shape` tile.
    pub fn coordinates(&self, offset: u32, shape: [u32; 2]) -> [u32; 2] {
        if self.is_transposed() {
            [offset % shape[0], offset / shape[0]]
        } else {
            [offset / shape[1], offset % shape[1]]
        }
    }
}
