use crate::{
    config::{LoadLogLevel, MfmaConfig},
    elem::ElemType,
    error::MfmaLoadError,
    geometry::{MatrixIdent, MfmaGeometry, OperandGeometry, tile_extent},
    layout::{StorageOrder, operand_offsets, wave_lane, wave_m, wave_n},
};

use super::{PackedRegister, RegisterValue, SharedMemory};

/// Wave size the offset computation is written for.
pub const MFMA_WAVE_SIZE: u32 = 64;

/// Descriptor of an operand tile resident in shared memory.
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct SharedTile {
    pub elem: ElemType,
    /// Logical shape, `(rows, cols)`.
    pub shape: Vec<u32>,
    /// Storage order, fastest varying axis first.
    pub order: Vec<u32>,
}

/// Matrix core layout of the dot operation consuming the operands.
#[derive(new, Debug, Clone)]
pub struct MfmaLayout {
    pub geometry: MfmaGeometry,
    /// Warps along `(M, N)`.
    pub warps_per_cta: [u32; 2],
}

impl MfmaLayout {
    /// Layout targeting the architecture named in `config`.
    pub fn from_config(config: &MfmaConfig, warps_per_cta: [u32; 2]) -> Self {
        let arch = config.architecture();
        if !arch.is_mfma_capable() {
            log::warn!("Target {} ({arch}) has no MFMA instructions", config.arch);
        }

        Self::new(MfmaGeometry::new(arch), warps_per_cta)
    }

    /// Layout targeting the architecture of the global [MfmaConfig].
    pub fn from_global_config(warps_per_cta: [u32; 2]) -> Self {
        Self::from_config(&MfmaConfig::get(), warps_per_cta)
    }
}

/// Loads operand tiles from shared memory into MFMA operand registers.
#[derive(Debug, Clone)]
pub struct OperandLoader {
    layout: MfmaLayout,
    check_bounds: bool,
    log_level: LoadLogLevel,
}

impl OperandLoader {
    /// Create a loader using the global [MfmaConfig].
    pub fn new(layout: MfmaLayout) -> Self {
        Self::with_config(layout, &MfmaConfig::get())
    }

    pub fn with_config(layout: MfmaLayout, config: &MfmaConfig) -> Self {
        Self {
            layout,
            check_bounds: config.check_bounds,
            log_level: config.logger.level,
        }
    }

    pub fn layout(&self) -> &MfmaLayout {
        &self.layout
    }

    fn log_enabled(&self, level: LoadLogLevel) -> bool {
        level != LoadLogLevel::Disabled && self.log_level >= level
    }

    /// Load operand `0` (A) or `1` (B).
    pub fn convert_layout<S: SharedMemory>(
        &self,
        operand_index: u32,
        tile: &SharedTile,
        smem: &S,
        thread: u32,
    ) -> Result<PackedRegister, MfmaLoadError> {
        let ident = MatrixIdent::from_index(operand_index)?;
        self.load(ident, tile, smem, thread)
    }

    /// Gather the registers `thread` contributes to the instruction operand `ident`.
    ///
    /// Every precondition is checked before shared memory is touched.
    pub fn load<S: SharedMemory>(
        &self,
        ident: MatrixIdent,
        tile: &SharedTile,
        smem: &S,
        thread: u32,
    ) -> Result<PackedRegister, MfmaLoadError> {
        let shape: [u32; 2] = tile
            .shape
            .as_slice()
            .try_into()
            .map_err(|_| MfmaLoadError::NotRank2 {
                rank: tile.shape.len(),
            })?;
        let order = StorageOrder::new(&tile.order)?;

        let geometry = &self.layout.geometry;
        let warps_per_cta = self.layout.warps_per_cta;
        let operand = OperandGeometry::compute(geometry, ident, tile.elem, shape, warps_per_cta)?;

        let wave_size = geometry.wave_size();
        if wave_size != MFMA_WAVE_SIZE {
            return Err(MfmaLoadError::UnsupportedWaveSize(wave_size));
        }

        let (wave, lane) = wave_lane(thread, wave_size);
        let non_k = ident.non_k_axis();
        let wave_coord = match ident {
            MatrixIdent::A => wave_m(wave, warps_per_cta, operand.instr_tile[non_k], shape[non_k]),
            MatrixIdent::B => wave_n(wave, warps_per_cta, operand.instr_tile[non_k], shape[non_k]),
        };

        if self.log_enabled(LoadLogLevel::Full) {
            log::trace!(
                "Thread {thread}: wave {wave} lane {lane}, operand {ident} wave coordinate {wave_coord}"
            );
        }

        let (offset_layout, offsets) = operand_offsets(order, &operand, wave_coord, lane);

        if self.check_bounds {
            let extent = tile_extent(shape)?;
            if let Some(&offset) = offsets.iter().find(|&&offset| offset >= extent) {
                return Err(MfmaLoadError::OffsetOutOfBounds { offset, extent });
            }
        }

        let axis = order.fastest();
        let base = smem.base_pointer(axis);
        let swizzle_offset = smem.swizzle_offset(axis);

        let [num_outer, num_inner] = operand.reps_non_k_major();
        let num_elems = operand.elems_per_lane as usize;

        if self.log_enabled(LoadLogLevel::Basic) {
            log::debug!(
                "Loading operand {ident} on {}: {} {:?} order {:?}, {offset_layout:?}, reps {num_outer}x{num_inner}, {num_elems} elements per lane",
                geometry.arch(),
                tile.elem,
                shape,
                order.as_array(),
            );
        }

        let registers = offsets
            .chunks(num_elems)
            .map(|chunk| {
                let values = chunk
                    .iter()
                    .map(|&offset| smem.load(tile.elem, base + offset as usize))
                    .collect::<Result<Vec<_>, _>>()?;
                RegisterValue::assemble(tile.elem, values)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PackedRegister::new(
            registers,
            num_inner as usize,
            swizzle_offset,
        ))
    }
}

/// Load operand `operand_index` of the dot operation described by `layout`.
pub fn convert_layout<S: SharedMemory>(
    operand_index: u32,
    tile: &SharedTile,
    layout: &MfmaLayout,
    smem: &S,
    thread: u32,
) -> Result<PackedRegister, MfmaLoadError> {
    OperandLoader::new(layout.clone()).convert_layout(operand_index, tile, smem, thread)
}
