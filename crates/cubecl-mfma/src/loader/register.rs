use crate::{
    elem::{ElemType, Scalar},
    error::MfmaLoadError,
};

/// One operand register for a single instruction repetition.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterValue {
    /// A lane holding a single element.
    Scalar(Scalar),
    /// A vector of `elems_per_lane` elements.
    Vector(Vec<Scalar>),
    /// Narrow elements packed little endian into one integer register of `width` bits.
    Packed { width: u32, bits: u64 },
}

impl RegisterValue {
    /// Build the register for the elements a lane read for one repetition.
    pub fn assemble(elem: ElemType, values: Vec<Scalar>) -> Result<Self, MfmaLoadError> {
        if elem.is_narrow() {
            return Self::pack(elem, &values);
        }

        match <[Scalar; 1]>::try_from(values) {
            Ok([value]) => Ok(RegisterValue::Scalar(value)),
            Err(values) => Ok(RegisterValue::Vector(values)),
        }
    }

    fn pack(elem: ElemType, values: &[Scalar]) -> Result<Self, MfmaLoadError> {
        let elem_bits = elem.size_bits();
        let width = elem_bits * values.len() as u32;
        if width > u64::BITS {
            return Err(MfmaLoadError::PackingOverflow {
                elem,
                count: values.len() as u32,
            });
        }

        let bits = values
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, value)| {
                acc | (value.to_bits() << (i as u32 * elem_bits))
            });

        Ok(RegisterValue::Packed { width, bits })
    }

    /// Number of bits of the register.
    pub fn width(&self) -> u32 {
        match self {
            RegisterValue::Scalar(value) => value.elem().size_bits(),
            RegisterValue::Vector(values) => values
                .iter()
                .map(|value| value.elem().size_bits())
                .sum(),
            RegisterValue::Packed { width, .. } => *width,
        }
    }
}

/// The registers of one lane for a whole operand, ordered non-k repetition major.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRegister {
    values: Vec<RegisterValue>,
    num_inner: usize,
    swizzle_offset: u32,
}

impl PackedRegister {
    pub(crate) fn new(values: Vec<RegisterValue>, num_inner: usize, swizzle_offset: u32) -> Self {
        Self {
            values,
            num_inner,
            swizzle_offset,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The register of repetition `outer` along the non-k axis and `inner` along k.
    pub fn get(&self, outer: usize, inner: usize) -> Option<&RegisterValue> {
        if inner >= self.num_inner {
            return None;
        }
        self.values.get(outer * self.num_inner + inner)
    }

    pub fn values(&self) -> &[RegisterValue] {
        &self.values
    }

    /// Swizzle adjustment reported by shared memory, left for the code generator to apply.
    pub fn swizzle_offset(&self) -> u32 {
        self.swizzle_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elem::{FloatKind, IntKind};
    use half::f16;
    use pretty_assertions::assert_eq;

    #[test]
    fn int8_packs_into_32_bits() {
        let values = vec![Scalar::I8(1), Scalar::I8(2), Scalar::I8(3), Scalar::I8(-1)];
        let register = RegisterValue::assemble(ElemType::Int(IntKind::I8), values).unwrap();

        assert_eq!(
            register,
            RegisterValue::Packed {
                width: 32,
                bits: 0xff03_0201
            }
        );
    }

    #[test]
    fn fp8_packs_into_64_bits() {
        let values = (0..8).map(Scalar::E4M3).collect();
        let register = RegisterValue::assemble(ElemType::Float(FloatKind::E4M3), values).unwrap();

        assert_eq!(
            register,
            RegisterValue::Packed {
                width: 64,
                bits: 0x0706_0504_0302_0100
            }
        );
    }

    #[test]
    fn too_many_narrow_elements() {
        let values = vec![Scalar::I8(0); 16];

        assert_eq!(
            RegisterValue::assemble(ElemType::Int(IntKind::I8), values),
            Err(MfmaLoadError::PackingOverflow {
                elem: ElemType::Int(IntKind::I8),
                count: 16
            })
        );
    }

    #[test]
    fn single_element_is_not_a_vector() {
        let register =
            RegisterValue::assemble(ElemType::Float(FloatKind::F32), vec![Scalar::F32(2.0)])
                .unwrap();

        assert_eq!(register, RegisterValue::Scalar(Scalar::F32(2.0)));
        assert_eq!(register.width(), 32);
    }

    #[test]
    fn half_precision_stays_a_vector() {
        let values = vec![Scalar::F16(f16::ONE); 4];
        let register =
            RegisterValue::assemble(ElemType::Float(FloatKind::F16), values.clone()).unwrap();

        assert_eq!(register, RegisterValue::Vector(values));
        assert_eq!(register.width(), 64);
    }

    #[test]
    fn registers_are_indexed_outer_major() {
        let values = (0..6)
            .map(|i| RegisterValue::Scalar(Scalar::I32(i)))
            .collect();
        let registers = PackedRegister::new(values, 3, 0);

        assert_eq!(
            registers.get(1, 0),
            Some(&RegisterValue::Scalar(Scalar::I32(3)))
        );
        assert_eq!(registers.get(0, 3), None);
        assert_eq!(registers.get(2, 0), None);
    }
}
