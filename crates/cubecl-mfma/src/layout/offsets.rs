use super::wave::HALF_WAVE;

/// How the lanes of a wave stripe over the contiguous axis of shared memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetLayout {
    /// Each half wave owns a stripe of contiguous rows, the halves are shifted along the
    /// contiguous axis by the elements held per lane.
    ///
    /// Used for operand A stored row major and operand B stored column major.
    RowStripes,
    /// Lanes walk the contiguous axis, the per lane elements are strided across lines.
    ///
    /// Used for operand B stored row major and operand A stored column major.
    ColumnStripes,
}

impl OffsetLayout {
    /// The other layout, used when the tile is stored transposed.
    pub fn transposed(&self) -> Self {
        match self {
            OffsetLayout::RowStripes => OffsetLayout::ColumnStripes,
            OffsetLayout::ColumnStripes => OffsetLayout::RowStripes,
        }
    }

    /// Split `reps` into `(outer, inner)` counts. The outer loop always runs over the non-k axis.
    pub fn outer_inner(&self, reps: [u32; 2]) -> (u32, u32) {
        match self {
            OffsetLayout::RowStripes => (reps[0], reps[1]),
            OffsetLayout::ColumnStripes => (reps[1], reps[0]),
        }
    }
}

/// Inputs of the offset computation, already expressed in the axis roles of the chosen layout.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetParams {
    /// Tile consumed by one instruction.
    pub elems_per_instr: [u32; 2],
    /// Wave coordinate along the non-k axis.
    pub wave_id: u32,
    /// Lane id in `[0, 64)`.
    pub lane_id: u32,
    /// Warps cooperating along the non-k axis.
    pub warps_per_group: u32,
    /// Elements accessed by a lane per instruction.
    pub elems_per_lane: u32,
    /// Instruction repetitions needed to cover the operand.
    pub reps: [u32; 2],
}

impl OffsetParams {
    pub fn num_offsets(&self) -> usize {
        (self.reps[0] * self.reps[1] * self.elems_per_lane) as usize
    }
}

/// Compute the shared memory offsets read by one lane, in elements.
///
/// Offsets are ordered `(outer, inner, elem)` with the non-k repetition outermost, so the
/// offset of element `elem` in repetition `(outer, inner)` sits at
/// `outer * num_inner * elems_per_lane + inner * elems_per_lane + elem`.
///
/// Both layouts assume a wave of 64 lanes split into two halves of 32.
pub fn compute_offsets(layout: OffsetLayout, params: &OffsetParams) -> Vec<u32> {
    let [instr_0, instr_1] = params.elems_per_instr;
    let num_elems = params.elems_per_lane;
    let warps = params.warps_per_group;
    let (num_outer, num_inner) = layout.outer_inner(params.reps);

    let wave_half = params.lane_id / HALF_WAVE;
    let lane_in_half = params.lane_id % HALF_WAVE;

    let (line_size, wave_stride, outer_stride, inner_stride) = match layout {
        OffsetLayout::RowStripes => {
            let line_size = instr_1 * num_inner;
            (
                line_size,
                instr_0 * line_size,
                instr_0 * warps * line_size,
                instr_1,
            )
        }
        OffsetLayout::ColumnStripes => {
            let line_size = warps * instr_1 * num_outer;
            (line_size, instr_1, instr_1 * warps, instr_0 * line_size)
        }
    };

    // The upper half wave starts `num_elems` further along the k axis.
    let half_offset = wave_half * num_elems;
    let lane_offset = |elem: u32| match layout {
        OffsetLayout::RowStripes => lane_in_half * line_size + elem + half_offset,
        OffsetLayout::ColumnStripes => (elem + half_offset) * line_size + lane_in_half,
    };

    let wave_offset = params.wave_id * wave_stride;
    let mut offsets = Vec::with_capacity(params.num_offsets());

    for outer in 0..num_outer {
        let outer_offset = outer * outer_stride;
        for inner in 0..num_inner {
            let inner_offset = inner * inner_stride;
            for elem in 0..num_elems {
                offsets.push(wave_offset + outer_offset + inner_offset + lane_offset(elem));
            }
        }
    }

    offsets
}
