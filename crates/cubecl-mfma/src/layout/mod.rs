mod offsets;
mod order;
mod wave;

pub use offsets::*;
pub use order::*;
pub use wave::*;

use crate::geometry::{MatrixIdent, OperandGeometry};

/// Layout used when the operand is stored in its natural order.
pub fn natural_layout(ident: MatrixIdent) -> OffsetLayout {
    match ident {
        MatrixIdent::A => OffsetLayout::RowStripes,
        MatrixIdent::B => OffsetLayout::ColumnStripes,
    }
}

/// Pick the offset layout for `operand` stored with `order`.
///
/// A transposed tile uses the other layout, with the instruction tile and the repetitions
/// exchanged so the contiguous axis keeps its role in the address formula.
pub fn select_layout(
    order: StorageOrder,
    operand: &OperandGeometry,
) -> (OffsetLayout, [u32; 2], [u32; 2]) {
    let natural = natural_layout(operand.ident);
    let [instr_0, instr_1] = operand.instr_tile;
    let [reps_0, reps_1] = operand.reps;

    if order.is_transposed() {
        (natural.transposed(), [instr_1, instr_0], [reps_1, reps_0])
    } else {
        (natural, operand.instr_tile, operand.reps)
    }
}

/// Offsets read by `lane_id` of the wave at `wave_coord` along the non-k axis.
pub fn operand_offsets(
    order: StorageOrder,
    operand: &OperandGeometry,
    wave_coord: u32,
    lane_id: u32,
) -> (OffsetLayout, Vec<u32>) {
    let (layout, elems_per_instr, reps) = select_layout(order, operand);
    let params = OffsetParams::new(
        elems_per_instr,
        wave_coord,
        lane_id,
        operand.warps_per_group,
        operand.elems_per_lane,
        reps,
    );

    (layout, compute_offsets(layout, &params))
}
