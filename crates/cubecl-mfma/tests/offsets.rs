use std::collections::HashSet;

use cubecl_mfma::{
    MatrixIdent,
    arch::AMDArchitecture,
    elem::{ElemType, FloatKind, IntKind},
    geometry::{MfmaGeometry, OperandGeometry},
    layout::{OffsetLayout, StorageOrder, operand_offsets},
};
use pretty_assertions::assert_eq;

const F16: ElemType = ElemType::Float(FloatKind::F16);

struct Case {
    arch: AMDArchitecture,
    elem: ElemType,
    ident: MatrixIdent,
    shape: [u32; 2],
    warps_per_cta: [u32; 2],
}

fn cases() -> Vec<Case> {
    let elems = [
        (AMDArchitecture::GFX908, ElemType::Float(FloatKind::F32)),
        (AMDArchitecture::GFX908, ElemType::Float(FloatKind::BF16)),
        (AMDArchitecture::GFX90A, F16),
        (AMDArchitecture::GFX90A, ElemType::Int(IntKind::I8)),
        (AMDArchitecture::GFX94, ElemType::Int(IntKind::I8)),
        (AMDArchitecture::GFX94, ElemType::Float(FloatKind::E5M2)),
    ];
    let grids = [[1, 1], [2, 1], [1, 2], [2, 2], [4, 1], [1, 4]];
    let mut cases = Vec::new();

    for (arch, elem) in elems {
        let geometry = MfmaGeometry::new(arch);
        for ident in [MatrixIdent::A, MatrixIdent::B] {
            let instr = geometry.instr_tile(elem, ident).unwrap();
            for warps_per_cta in grids {
                for (non_k_tiles, k_tiles) in [(1, 1), (2, 3), (4, 2)] {
                    let mut shape = [0; 2];
                    shape[ident.non_k_axis()] = instr[ident.non_k_axis()] * non_k_tiles;
                    shape[ident.k_axis()] = instr[ident.k_axis()] * k_tiles;
                    cases.push(Case {
                        arch,
                        elem,
                        ident,
                        shape,
                        warps_per_cta,
                    });
                }
            }
        }
    }

    cases.retain(|case| case.operand().is_ok());
    cases
}

impl Case {
    fn operand(&self) -> Result<OperandGeometry, cubecl_mfma::MfmaLoadError> {
        OperandGeometry::compute(
            &MfmaGeometry::new(self.arch),
            self.ident,
            self.elem,
            self.shape,
            self.warps_per_cta,
        )
    }
}

const ORDERS: [StorageOrder; 2] = [StorageOrder::ROW_MAJOR, StorageOrder::COL_MAJOR];

#[test]
fn offsets_have_expected_length_and_stay_in_tile() {
    for case in cases() {
        let operand = case.operand().unwrap();
        let extent = case.shape[0] * case.shape[1];
        let expected_len = operand.reps[0] * operand.reps[1] * operand.elems_per_lane;

        for order in ORDERS {
            for wave in 0..operand.warps_per_group {
                for lane in 0..64 {
                    let (_, offsets) = operand_offsets(order, &operand, wave, lane);

                    assert_eq!(offsets.len() as u32, expected_len);
                    assert!(
                        offsets.iter().all(|&offset| offset < extent),
                        "{:?} {:?} {:?}: offset out of tile for lane {lane}",
                        case.ident,
                        case.shape,
                        order,
                    );
                }
            }
        }
    }
}

#[test]
fn lanes_never_share_an_element() {
    for case in cases() {
        let operand = case.operand().unwrap();
        let num_elems = operand.elems_per_lane as usize;

        for order in ORDERS {
            let lanes: Vec<Vec<u32>> = (0..64)
                .map(|lane| operand_offsets(order, &operand, 0, lane).1)
                .collect();

            for index in 0..lanes[0].len() {
                let distinct: HashSet<u32> = lanes.iter().map(|offsets| offsets[index]).collect();
                assert_eq!(distinct.len(), 64);
            }

            // A wave reads every element of an instruction tile exactly once.
            for repetition in 0..lanes[0].len() / num_elems {
                let range = repetition * num_elems..(repetition + 1) * num_elems;
                let tile: HashSet<u32> = lanes
                    .iter()
                    .flat_map(|offsets| offsets[range.clone()].iter().copied())
                    .collect();
                assert_eq!(tile.len(), 64 * num_elems);
            }
        }
    }
}

#[test]
fn warp_group_covers_the_tile_exactly_once() {
    for case in cases() {
        let operand = case.operand().unwrap();
        let extent = (case.shape[0] * case.shape[1]) as usize;

        for order in ORDERS {
            let mut seen = HashSet::new();
            for wave in 0..operand.warps_per_group {
                for lane in 0..64 {
                    for offset in operand_offsets(order, &operand, wave, lane).1 {
                        assert!(seen.insert(offset), "offset {offset} read twice");
                    }
                }
            }
            assert_eq!(seen.len(), extent);
        }
    }
}

#[test]
fn storage_order_does_not_change_logical_elements() {
    for case in cases() {
        let operand = case.operand().unwrap();

        for lane in 0..64 {
            let (row_layout, row_major) =
                operand_offsets(StorageOrder::ROW_MAJOR, &operand, 0, lane);
            let (col_layout, col_major) =
                operand_offsets(StorageOrder::COL_MAJOR, &operand, 0, lane);
            assert_eq!(row_layout.transposed(), col_layout);

            let row_coords: Vec<[u32; 2]> = row_major
                .iter()
                .map(|&offset| StorageOrder::ROW_MAJOR.coordinates(offset, case.shape))
                .collect();
            let col_coords: Vec<[u32; 2]> = col_major
                .iter()
                .map(|&offset| StorageOrder::COL_MAJOR.coordinates(offset, case.shape))
                .collect();
            assert_eq!(row_coords, col_coords);
        }
    }
}

#[test]
fn transposed_a_reads_like_row_major_b() {
    let geometry = MfmaGeometry::new(AMDArchitecture::GFX90A);
    let a = OperandGeometry::compute(&geometry, MatrixIdent::A, F16, [64, 16], [2, 1]).unwrap();
    let b = OperandGeometry::compute(&geometry, MatrixIdent::B, F16, [16, 64], [1, 2]).unwrap();

    for wave in 0..2 {
        for lane in 0..64 {
            let (a_layout, a_offsets) = operand_offsets(StorageOrder::COL_MAJOR, &a, wave, lane);
            let (b_layout, b_offsets) = operand_offsets(StorageOrder::ROW_MAJOR, &b, wave, lane);

            assert_eq!(a_layout, OffsetLayout::ColumnStripes);
            assert_eq!(a_layout, b_layout);
            assert_eq!(a_offsets, b_offsets);
        }
    }
}

#[test]
fn single_wave_boundary() {
    let geometry = MfmaGeometry::new(AMDArchitecture::GFX90A);
    let operand =
        OperandGeometry::compute(&geometry, MatrixIdent::A, F16, [64, 8], [1, 1]).unwrap();

    assert_eq!(operand.instr_tile, [32, 8]);
    assert_eq!(operand.reps, [2, 1]);

    let (layout, lane_0) = operand_offsets(StorageOrder::ROW_MAJOR, &operand, 0, 0);
    let (_, lane_32) = operand_offsets(StorageOrder::ROW_MAJOR, &operand, 0, 32);

    assert_eq!(layout, OffsetLayout::RowStripes);
    assert_eq!(lane_0[0], 0);
    assert_eq!(lane_32[0], operand.elems_per_lane);
}
