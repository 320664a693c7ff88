//! Swift calling-convention register tables.
//!
//! Each table lists register names in ABI order: return registers, argument
//! registers, then the special registers for the hidden `self`,
//! error-return and async-context arguments.
//!
//! Sources: <https://github.com/swiftlang/swift/blob/main/docs/ABI/CallConvSummary.rst>

/// x86-64 (System V AMD64 with Swift extensions).
pub mod x86_64 {
    pub const RETURN: &[&str] = &["rax", "rdx", "rcx", "r8"];
    pub const ARGUMENT: &[&str] = &["rdi", "rsi", "rdx", "rcx", "r8", "r9"];
    /// Indexed by [`HiddenRole`](crate::HiddenRole): self, error, async context.
    pub const SPECIAL: &[&str] = &["r13", "r12", "r14"];
}

/// AArch64 (AAPCS64 with Swift extensions).
pub mod arm64 {
    pub const RETURN: &[&str] = &["x0", "x1", "x2", "x3", "x4", "x5", "x6", "x7"];
    pub const ARGUMENT: &[&str] = &["x0", "x1", "x2", "x3", "x4", "x5", "x6", "x7"];
    /// Indexed by [`HiddenRole`](crate::HiddenRole): self, error, async context.
    pub const SPECIAL: &[&str] = &["x20", "x21", "x22"];
}
