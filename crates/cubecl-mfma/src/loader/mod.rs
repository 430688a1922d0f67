mod operand;
mod register;
mod smem;

pub use operand::*;
pub use register::*;
pub use smem::*;
