//! Per-architecture MFMA instruction tables and the operand geometry derived from them.
//!
//! Tables are pure data: supporting a new matrix core generation means adding rows to
//! [supported_mfma_instructions], the address arithmetic stays untouched.

use core::fmt::Display;
use hashbrown::HashMap;

use crate::{
    arch::AMDArchitecture,
    elem::{ElemType, FloatKind, IntKind},
    error::MfmaLoadError,
};

/// Size of the non reduction dimension of every supported MFMA instruction.
pub const MFMA_NON_K_DIM: u32 = 32;

/// Which operand of `D = A * B + C` is being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixIdent {
    A,
    B,
}

impl MatrixIdent {
    /// Operand `0` is A, operand `1` is B.
    pub fn from_index(index: u32) -> Result<Self, MfmaLoadError> {
        match index {
            0 => Ok(MatrixIdent::A),
            1 => Ok(MatrixIdent::B),
            other => Err(MfmaLoadError::UnexpectedOperandIndex(other)),
        }
    }

    /// The tile axis that isn't reduced by the multiply: rows for A, columns for B.
    pub fn non_k_axis(&self) -> usize {
        match self {
            MatrixIdent::A => 0,
            MatrixIdent::B => 1,
        }
    }

    pub fn k_axis(&self) -> usize {
        1 - self.non_k_axis()
    }
}

impl Display for MatrixIdent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MatrixIdent::A => f.write_str("a"),
            MatrixIdent::B => f.write_str("b"),
        }
    }
}

/// Shape of one MFMA instruction, independent of the operand.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MfmaInstruction {
    pub non_k: u32,
    pub k: u32,
}

/// MFMA instructions available on `arch`, keyed by input element type.
pub fn supported_mfma_instructions(arch: &AMDArchitecture) -> Vec<(ElemType, MfmaInstruction)> {
    let float32 = ElemType::Float(FloatKind::F32);
    let float16 = ElemType::Float(FloatKind::F16);
    let bfloat16 = ElemType::Float(FloatKind::BF16);
    let int8 = ElemType::Int(IntKind::I8);
    let instr = |k| MfmaInstruction::new(MFMA_NON_K_DIM, k);

    if !arch.is_mfma_capable() {
        return vec![];
    }

    match arch {
        // v_mfma_f32_32x32x2f32, v_mfma_f32_32x32x8f16, v_mfma_f32_32x32x4bf16, v_mfma_i32_32x32x8i8
        AMDArchitecture::GFX908 => vec![
            (float32, instr(2)),
            (float16, instr(8)),
            (bfloat16, instr(4)),
            (int8, instr(8)),
        ],
        // bf16 moves to v_mfma_f32_32x32x8bf16_1k
        AMDArchitecture::GFX90A => vec![
            (float32, instr(2)),
            (float16, instr(8)),
            (bfloat16, instr(8)),
            (int8, instr(8)),
        ],
        // v_mfma_i32_32x32x16_i8 and the fp8 variants
        AMDArchitecture::GFX94 => vec![
            (float32, instr(2)),
            (float16, instr(8)),
            (bfloat16, instr(8)),
            (int8, instr(16)),
            (ElemType::Float(FloatKind::E4M3), instr(16)),
            (ElemType::Float(FloatKind::E5M2), instr(16)),
        ],
        AMDArchitecture::GFX10 | AMDArchitecture::GFX11 | AMDArchitecture::Other => vec![],
    }
}

/// Lookup structure for the MFMA instructions of one architecture.
#[derive(Debug, Clone)]
pub struct MfmaGeometry {
    arch: AMDArchitecture,
    wave_size: u32,
    instructions: HashMap<ElemType, MfmaInstruction>,
}

impl MfmaGeometry {
    pub fn new(arch: AMDArchitecture) -> Self {
        Self::from_instructions(arch, arch.warp_size(), supported_mfma_instructions(&arch))
    }

    /// Build a geometry from an explicit table.
    pub fn from_instructions(
        arch: AMDArchitecture,
        wave_size: u32,
        instructions: impl IntoIterator<Item = (ElemType, MfmaInstruction)>,
    ) -> Self {
        Self {
            arch,
            wave_size,
            instructions: instructions.into_iter().collect(),
        }
    }

    pub fn arch(&self) -> AMDArchitecture {
        self.arch
    }

    pub fn wave_size(&self) -> u32 {
        self.wave_size
    }

    /// Tile consumed by one instruction for `ident`: `(non_k, k)` for A and `(k, non_k)` for B.
    pub fn instr_tile(&self, elem: ElemType, ident: MatrixIdent) -> Result<[u32; 2], MfmaLoadError> {
        let instr = self
            .instructions
            .get(&elem)
            .ok_or(MfmaLoadError::MissingGeometry {
                arch: self.arch,
                elem,
                ident,
            })?;

        Ok(match ident {
            MatrixIdent::A => [instr.non_k, instr.k],
            MatrixIdent::B => [instr.k, instr.non_k],
        })
    }

    /// Number of elements a single lane holds for one instruction.
    pub fn elems_per_lane(&self, instr_tile: [u32; 2]) -> u32 {
        if self.wave_size == 0 {
            return 1;
        }
        u32::max(instr_tile[0] * instr_tile[1] / self.wave_size, 1)
    }
}

/// Number of elements of a `shape` tile.
pub fn tile_extent(shape: [u32; 2]) -> Result<u32, MfmaLoadError> {
    shape[0]
        .checked_mul(shape[1])
        .ok_or(MfmaLoadError::TileTooLarge(shape))
}

/// Everything about an operand tile the address computation needs.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandGeometry {
    pub ident: MatrixIdent,
    /// Tile consumed by one instruction, in logical `(dim0, dim1)` order.
    pub instr_tile: [u32; 2],
    /// Instruction repetitions along `(dim0, dim1)`.
    pub reps: [u32; 2],
    /// Warps sharing the non-k axis, clipped to the number of instruction tiles along it.
    pub warps_per_group: u32,
    pub elems_per_lane: u32,
}

impl OperandGeometry {
    /// Derive the geometry for a `shape` tile of `elem` loaded by a `warps_per_cta` warp grid.
    ///
    /// The tile must be an exact multiple of the area covered by the participating warps.
    pub fn compute(
        geometry: &MfmaGeometry,
        ident: MatrixIdent,
        elem: ElemType,
        shape: [u32; 2],
        warps_per_cta: [u32; 2],
    ) -> Result<Self, MfmaLoadError> {
        if warps_per_cta.contains(&0) {
            return Err(MfmaLoadError::InvalidWarpGrid(warps_per_cta));
        }

        let instr_tile = geometry.instr_tile(elem, ident)?;
        // Offsets never exceed the tile extent once it fits in 32 bits.
        tile_extent(shape)?;
        let non_k = ident.non_k_axis();
        let k = ident.k_axis();

        let unaligned = |axis: usize, coverage: u32| MfmaLoadError::UnalignedShape {
            ident,
            axis,
            extent: shape[axis],
            coverage,
        };

        for axis in [non_k, k] {
            if shape[axis] == 0 || shape[axis] % instr_tile[axis] != 0 {
                return Err(unaligned(axis, instr_tile[axis]));
            }
        }

        let max_num_warps = shape[non_k] / instr_tile[non_k];
        let warps_per_group = u32::min(warps_per_cta[non_k], max_num_warps);
        let coverage = instr_tile[non_k] * warps_per_group;
        if shape[non_k] % coverage != 0 {
            return Err(unaligned(non_k, coverage));
        }

        let mut reps = [0; 2];
        reps[non_k] = shape[non_k] / coverage;
        reps[k] = shape[k] / instr_tile[k];

        Ok(Self {
            ident,
            instr_tile,
            reps,
            warps_per_group,
            elems_per_lane: geometry.elems_per_lane(instr_tile),
        })
    }

    /// Instruction repetitions as `(non_k, k)`.
    pub fn reps_non_k_major(&self) -> [u32; 2] {
        [self.reps[self.ident.non_k_axis()], self.reps[self.ident.k_axis()]]
    }
}
