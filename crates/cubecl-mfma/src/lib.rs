//! Lowering of shared memory tiles to the operand registers of AMD MFMA instructions.
//!
//! For every lane of a wave, the loader computes the shared memory offsets of its share of an
//! operand tile and packs the elements it reads into the register layout the matrix core expects.

#[macro_use]
extern crate derive_new;

/// AMD target architectures.
pub mod arch;
/// Configuration of the lowering.
pub mod config;
/// Element types and scalar values.
pub mod elem;
/// MFMA instruction tables and operand geometry.
pub mod geometry;
/// Storage order, wave decomposition and offset computation.
pub mod layout;
/// Shared memory access and register assembly.
pub mod loader;

mod error;

pub use error::MfmaLoadError;
pub use geometry::MatrixIdent;
pub use loader::{
    MfmaLayout, OperandLoader, PackedRegister, RegisterValue, SharedBuffer, SharedMemory,
    SharedTile, convert_layout,
};
