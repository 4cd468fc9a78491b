//! Errors reported by the execution engine.

use thiserror::Error;

/// Errors that can occur while executing an instruction.
///
/// `InvalidOpcode` is the only sticky error: it latches the machine status
/// to [`Status::BadOpcode`](crate::cpu::Status::BadOpcode), and every later
/// step fails the same way until the host resets the context. The other two
/// reject the offending instruction and leave all state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VmError {
    /// The register-pair byte names a reserved register id.
    #[error("invalid register id: {0:#x}")]
    InvalidRegister(u8),

    /// The opcode byte matches no instruction.
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    /// A jump or call target lies outside the memory buffer.
    #[error("invalid jump target: {0:#010x}")]
    InvalidAddress(u32),
}
