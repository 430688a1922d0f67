use thiserror::Error;

use crate::{arch::AMDArchitecture, elem::ElemType, geometry::MatrixIdent};

/// Errors raised while lowering a shared memory tile to MFMA dot operand registers.
///
/// Every variant is a compiler construction error: the conversion is aborted before any offset
/// is computed, a partially correct layout is never produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MfmaLoadError {
    /// The storage order isn't a permutation of `{0, 1}`.
    #[error("Invalid storage order {order:?}, expected a permutation of [0, 1]")]
    InvalidOrder {
        /// The rejected order.
        order: Vec<u32>,
    },

    /// Only rank 2 operand tiles are supported.
    #[error("Operand tiles must have rank 2, got rank {rank}")]
    NotRank2 {
        /// The rank of the rejected tile.
        rank: usize,
    },

    /// The tile doesn't evenly cover the instruction tiles of the participating warps.
    #[error(
        "Operand {ident} extent {extent} along axis {axis} is not a multiple of the coverage {coverage}"
    )]
    UnalignedShape {
        /// The operand being loaded.
        ident: MatrixIdent,
        /// The offending axis.
        axis: usize,
        /// Tile extent along the axis.
        extent: u32,
        /// Required coverage along the axis.
        coverage: u32,
    },

    /// The tile has more elements than 32 bit offsets can address.
    #[error("Tile of shape {0:?} is too large to be addressed with 32 bit offsets")]
    TileTooLarge([u32; 2]),

    /// The address computation splits the wave into two 32 lane halves.
    #[error("MFMA operand loads require a wave size of 64, got {0}")]
    UnsupportedWaveSize(u32),

    /// The warp grid can't be empty.
    #[error("Invalid warp grid {0:?}")]
    InvalidWarpGrid([u32; 2]),

    /// The operand index is neither `0` (A) nor `1` (B).
    #[error("Unexpected operand index {0}")]
    UnexpectedOperandIndex(u32),

    /// No MFMA instruction exists for this combination.
    #[error("No MFMA geometry for operand {ident} of type {elem} on {arch}")]
    MissingGeometry {
        /// Target architecture.
        arch: AMDArchitecture,
        /// Element type of the tile.
        elem: ElemType,
        /// The operand being loaded.
        ident: MatrixIdent,
    },

    /// A narrow element type packs to more bits than a register pair can hold.
    #[error("Can't pack {count} elements of type {elem} in a single register")]
    PackingOverflow {
        /// Element type of the tile.
        elem: ElemType,
        /// Number of elements per lane.
        count: u32,
    },

    /// The shared memory service can't provide the element at `address`.
    #[error("Shared memory read at element {address} is outside of the {size} bytes available")]
    SharedMemoryOutOfBounds {
        /// Address of the element read, in elements.
        address: usize,
        /// Size of the shared memory, in bytes.
        size: usize,
    },

    /// A computed offset falls outside the tile. Only checked when bounds checking is enabled.
    #[error("Offset {offset} is outside of the tile extent {extent}")]
    OffsetOutOfBounds {
        /// The offending offset.
        offset: u32,
        /// Number of elements in the tile.
        extent: u32,
    },
}
