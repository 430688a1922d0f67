use core::fmt::Display;

use half::{bf16, f16};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum FloatKind {
    E4M3,
    E5M2,
    F16,
    BF16,
    F32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum IntKind {
    I8,
    I32,
}

/// Element type of a tile held in shared memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum ElemType {
    Float(FloatKind),
    Int(IntKind),
}

impl ElemType {
    pub fn size_bits(&self) -> u32 {
        match self {
            ElemType::Float(FloatKind::E4M3 | FloatKind::E5M2) => 8,
            ElemType::Float(FloatKind::F16 | FloatKind::BF16) => 16,
            ElemType::Float(FloatKind::F32) => 32,
            ElemType::Int(IntKind::I8) => 8,
            ElemType::Int(IntKind::I32) => 32,
        }
    }

    pub fn size(&self) -> usize {
        self.size_bits() as usize / 8
    }

    /// Elements narrower than 16 bits are handed to the matrix core as packed integers rather
    /// than as vectors.
    pub fn is_narrow(&self) -> bool {
        self.size_bits() < 16
    }
}

impl Display for ElemType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ElemType::Float(FloatKind::E4M3) => f.write_str("e4m3"),
            ElemType::Float(FloatKind::E5M2) => f.write_str("e5m2"),
            ElemType::Float(FloatKind::F16) => f.write_str("f16"),
            ElemType::Float(FloatKind::BF16) => f.write_str("bf16"),
            ElemType::Float(FloatKind::F32) => f.write_str("f32"),
            ElemType::Int(IntKind::I8) => f.write_str("i8"),
            ElemType::Int(IntKind::I32) => f.write_str("i32"),
        }
    }
}

/// A single element read from shared memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// fp8 values have no host arithmetic, they are kept as raw bits.
    E4M3(u8),
    E5M2(u8),
    F16(f16),
    BF16(bf16),
    F32(f32),
    I8(i8),
    I32(i32),
}

impl Scalar {
    /// Decode a little-endian element of type `elem`.
    ///
    /// `bytes` must hold exactly `elem.size()` bytes.
    pub fn from_le_bytes(elem: ElemType, bytes: &[u8]) -> Self {
        match elem {
            ElemType::Float(FloatKind::E4M3) => Scalar::E4M3(bytes[0]),
            ElemType::Float(FloatKind::E5M2) => Scalar::E5M2(bytes[0]),
            ElemType::Float(FloatKind::F16) => Scalar::F16(bytemuck::pod_read_unaligned(bytes)),
            // bf16 is addressed through 16 bit words and reinterpreted.
            ElemType::Float(FloatKind::BF16) => {
                Scalar::BF16(bf16::from_bits(bytemuck::pod_read_unaligned::<u16>(bytes)))
            }
            ElemType::Float(FloatKind::F32) => Scalar::F32(bytemuck::pod_read_unaligned(bytes)),
            ElemType::Int(IntKind::I8) => Scalar::I8(bytes[0] as i8),
            ElemType::Int(IntKind::I32) => Scalar::I32(bytemuck::pod_read_unaligned(bytes)),
        }
    }

    pub fn elem(&self) -> ElemType {
        match self {
            Scalar::E4M3(_) => ElemType::Float(FloatKind::E4M3),
            Scalar::E5M2(_) => ElemType::Float(FloatKind::E5M2),
            Scalar::F16(_) => ElemType::Float(FloatKind::F16),
            Scalar::BF16(_) => ElemType::Float(FloatKind::BF16),
            Scalar::F32(_) => ElemType::Float(FloatKind::F32),
            Scalar::I8(_) => ElemType::Int(IntKind::I8),
            Scalar::I32(_) => ElemType::Int(IntKind::I32),
        }
    }

    /// Raw bit pattern, zero extended.
    pub fn to_bits(&self) -> u64 {
        match self {
            Scalar::E4M3(bits) | Scalar::E5M2(bits) => *bits as u64,
            Scalar::F16(val) => val.to_bits() as u64,
            Scalar::BF16(val) => val.to_bits() as u64,
            Scalar::F32(val) => val.to_bits() as u64,
            Scalar::I8(val) => *val as u8 as u64,
            Scalar::I32(val) => *val as u32 as u64,
        }
    }
}
