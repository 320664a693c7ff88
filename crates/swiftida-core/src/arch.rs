//! Architecture identification and Swift ABI register profiles.

use crate::register;
use std::fmt;

/// Supported CPU architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Architecture {
    /// x86-64 / AMD64
    X86_64,
    /// ARM 64-bit (AArch64)
    Arm64,
}

impl Architecture {
    /// Identify an architecture from a processor module name and bitness.
    ///
    /// Names are matched case-insensitively. Both the host database
    /// spelling (`metapc`, `arm`) and the usual target names are accepted.
    /// Only 64-bit targets have a Swift register profile, so every 32-bit
    /// pair yields `None`.
    pub fn from_processor(name: &str, is_64bit: bool) -> Option<Self> {
        if !is_64bit {
            return None;
        }
        match name.to_ascii_lowercase().as_str() {
            "metapc" | "x86_64" | "x86-64" | "amd64" | "x64" => Some(Self::X86_64),
            "arm" | "arm64" | "aarch64" => Some(Self::Arm64),
            _ => None,
        }
    }

    /// Returns the name of this architecture.
    pub fn name(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hidden arguments the Swift ABI passes in fixed registers.
///
/// The discriminant is the index into [`ArchProfile::special_registers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HiddenRole {
    /// The `self` context.
    SelfContext = 0,
    /// The error-return slot.
    ErrorReturn = 1,
    /// The async context.
    AsyncContext = 2,
}

impl HiddenRole {
    /// All roles in register-table order.
    pub const ALL: [HiddenRole; 3] = [Self::SelfContext, Self::ErrorReturn, Self::AsyncContext];

    /// Index into the special register table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable short name, used in command identifiers.
    pub fn name(self) -> &'static str {
        match self {
            Self::SelfContext => "self",
            Self::ErrorReturn => "error_return",
            Self::AsyncContext => "async_context",
        }
    }
}

impl fmt::Display for HiddenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register assignment rules for one target.
///
/// Built once at startup and handed by reference to every parse and edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchProfile {
    arch: Architecture,
    return_registers: &'static [&'static str],
    argument_registers: &'static [&'static str],
    special_registers: &'static [&'static str],
}

impl ArchProfile {
    /// Resolve the profile for a processor name and bitness.
    ///
    /// `None` means the target is unsupported.
    pub fn resolve(arch_name: &str, is_64bit: bool) -> Option<Self> {
        Architecture::from_processor(arch_name, is_64bit).map(Self::for_architecture)
    }

    /// The profile of a known architecture.
    pub fn for_architecture(arch: Architecture) -> Self {
        match arch {
            Architecture::X86_64 => Self {
                arch,
                return_registers: register::x86_64::RETURN,
                argument_registers: register::x86_64::ARGUMENT,
                special_registers: register::x86_64::SPECIAL,
            },
            Architecture::Arm64 => Self {
                arch,
                return_registers: register::arm64::RETURN,
                argument_registers: register::arm64::ARGUMENT,
                special_registers: register::arm64::SPECIAL,
            },
        }
    }

    pub fn architecture(&self) -> Architecture {
        self.arch
    }

    /// Registers holding successive words of a return value.
    pub fn return_registers(&self) -> &'static [&'static str] {
        self.return_registers
    }

    /// Registers for positional arguments.
    pub fn argument_registers(&self) -> &'static [&'static str] {
        self.argument_registers
    }

    /// Registers for hidden arguments, indexed by [`HiddenRole`].
    pub fn special_registers(&self) -> &'static [&'static str] {
        self.special_registers
    }

    /// The register a scalar return value lives in.
    pub fn primary_return_register(&self) -> &'static str {
        self.return_registers[0]
    }

    pub fn special_register(&self, role: HiddenRole) -> &'static str {
        self.special_registers[role.index()]
    }

    /// Largest tuple that can be returned entirely in registers.
    pub fn max_tuple_words(&self) -> usize {
        self.return_registers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported_targets() {
        for (name, arch) in [
            ("metapc", Architecture::X86_64),
            ("METAPC", Architecture::X86_64),
            ("x86_64", Architecture::X86_64),
            ("arm", Architecture::Arm64),
            ("ARM", Architecture::Arm64),
            ("aarch64", Architecture::Arm64),
        ] {
            let profile = ArchProfile::resolve(name, true).unwrap();
            assert_eq!(profile.architecture(), arch);
            assert!(!profile.return_registers().is_empty());
            assert!(!profile.argument_registers().is_empty());
            assert!(!profile.special_registers().is_empty());
        }
    }

    #[test]
    fn test_resolve_unsupported_targets() {
        assert!(ArchProfile::resolve("metapc", false).is_none());
        assert!(ArchProfile::resolve("arm", false).is_none());
        assert!(ArchProfile::resolve("mips", true).is_none());
        assert!(ArchProfile::resolve("ppc", true).is_none());
        assert!(ArchProfile::resolve("", true).is_none());
    }

    #[test]
    fn test_x86_64_profile() {
        let profile = ArchProfile::for_architecture(Architecture::X86_64);
        assert_eq!(profile.primary_return_register(), "rax");
        assert_eq!(profile.argument_registers()[1], "rsi");
        assert_eq!(profile.special_register(HiddenRole::SelfContext), "r13");
        assert_eq!(profile.special_register(HiddenRole::ErrorReturn), "r12");
        assert_eq!(profile.special_register(HiddenRole::AsyncContext), "r14");
        assert_eq!(profile.max_tuple_words(), 4);
    }

    #[test]
    fn test_arm64_profile() {
        let profile = ArchProfile::for_architecture(Architecture::Arm64);
        assert_eq!(profile.primary_return_register(), "x0");
        assert_eq!(profile.special_register(HiddenRole::SelfContext), "x20");
        assert_eq!(profile.special_register(HiddenRole::AsyncContext), "x22");
        assert_eq!(profile.max_tuple_words(), 8);
    }

    #[test]
    fn test_hidden_role_names() {
        assert_eq!(HiddenRole::SelfContext.name(), "self");
        assert_eq!(HiddenRole::ErrorReturn.to_string(), "error_return");
        assert_eq!(HiddenRole::AsyncContext.index(), 2);
    }

    #[test]
    fn test_architecture_display() {
        assert_eq!(Architecture::X86_64.to_string(), "x86_64");
        assert_eq!(Architecture::Arm64.name(), "arm64");
    }
}
