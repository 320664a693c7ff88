//! Edits applied to a parsed signature.

use crate::signature::{Argument, ParsedSignature, ReturnBinding};
use std::fmt;
use swiftida_core::{ArchProfile, Error, HiddenRole, Result};

/// Width in bytes of one register word in a tuple return.
pub const TUPLE_WORD_SIZE: u32 = 8;

/// Type given to hidden arguments.
pub const HIDDEN_ARGUMENT_TYPE: &str = "__int64";

/// Name of the synthetic struct returned in `words` registers.
pub fn tuple_struct_name(words: usize) -> String {
    format!("swiftida_tuple{}", words)
}

/// A single semantic edit of a function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditRequest {
    /// Re-emit the signature with explicit registers under `__usercall`.
    ConvertToExplicitCallingConvention,
    /// Append a hidden argument in the role's special register.
    AddHiddenArgument(HiddenRole),
    /// Return a tuple of this many words, one register each.
    MakeMultiRegisterReturn(usize),
}

impl EditRequest {
    /// Apply the edit to `sig`.
    pub fn apply(self, mut sig: ParsedSignature, profile: &ArchProfile) -> Result<ParsedSignature> {
        match self {
            // Parsing already normalized the registers.
            EditRequest::ConvertToExplicitCallingConvention => {}

            EditRequest::AddHiddenArgument(role) => {
                let register = profile.special_register(role);
                if !sig.arguments.iter().any(|a| a.is_annotated_with(register)) {
                    sig.arguments
                        .push(Argument::in_register(HIDDEN_ARGUMENT_TYPE, register));
                }
            }

            EditRequest::MakeMultiRegisterReturn(words) => {
                let registers = profile.return_registers();
                if words < 2 || words > registers.len() {
                    return Err(Error::RegisterCountExceeded {
                        requested: words,
                        available: registers.len(),
                    });
                }

                let name = tuple_struct_name(words);
                match sig.base_tokens.first_mut() {
                    Some(ret) => *ret = name,
                    None => sig.base_tokens.push(name),
                }
                sig.return_bindings = registers[..words]
                    .iter()
                    .zip((0..).step_by(TUPLE_WORD_SIZE as usize))
                    .map(|(reg, offset)| ReturnBinding::new(offset, *reg))
                    .collect();
            }
        }
        Ok(sig)
    }

    /// The tuple struct this edit needs to exist, as `(name, words)`.
    pub fn tuple_struct(&self) -> Option<(String, usize)> {
        match *self {
            EditRequest::MakeMultiRegisterReturn(words) => Some((tuple_struct_name(words), words)),
            _ => None,
        }
    }
}

impl fmt::Display for EditRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRequest::ConvertToExplicitCallingConvention => write!(f, "convert to usercall"),
            EditRequest::AddHiddenArgument(role) => write!(f, "add argument {}", role),
            EditRequest::MakeMultiRegisterReturn(words) => {
                write!(f, "make multi-return tuple{}", words)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftida_core::Architecture;

    fn x86() -> ArchProfile {
        ArchProfile::for_architecture(Architecture::X86_64)
    }

    fn arm() -> ArchProfile {
        ArchProfile::for_architecture(Architecture::Arm64)
    }

    fn parsed(raw: &str, profile: &ArchProfile) -> ParsedSignature {
        ParsedSignature::parse(raw, profile).unwrap()
    }

    #[test]
    fn test_convert_is_identity() {
        let profile = x86();
        let sig = parsed("int __fastcall(char*, int)", &profile);
        let out = EditRequest::ConvertToExplicitCallingConvention
            .apply(sig.clone(), &profile)
            .unwrap();
        assert_eq!(out, sig);
        assert_eq!(
            out.serialize(),
            "int __usercall func@<rax>(char*@<rdi>, int@<rsi>)"
        );
    }

    #[test]
    fn test_add_hidden_argument() {
        let profile = x86();
        let sig = parsed("void __fastcall(__int64)", &profile);
        let out = EditRequest::AddHiddenArgument(HiddenRole::SelfContext)
            .apply(sig, &profile)
            .unwrap();
        assert_eq!(out.serialize(), "void __usercall func(__int64@<rdi>, __int64@<r13>)");
    }

    #[test]
    fn test_add_hidden_argument_is_idempotent() {
        let profile = x86();
        let sig = parsed("int f(int)", &profile);
        let edit = EditRequest::AddHiddenArgument(HiddenRole::SelfContext);
        let once = edit.apply(sig, &profile).unwrap();
        let twice = edit.apply(once.clone(), &profile).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.serialize(), twice.serialize());
    }

    #[test]
    fn test_add_hidden_argument_detects_existing_register() {
        let profile = x86();
        let sig = parsed("int __usercall func@<rax>(void*@<r12>)", &profile);
        let out = EditRequest::AddHiddenArgument(HiddenRole::ErrorReturn)
            .apply(sig.clone(), &profile)
            .unwrap();
        assert_eq!(out, sig);
    }

    #[test]
    fn test_add_every_hidden_argument_arm64() {
        let profile = arm();
        let mut sig = parsed("void __usercall func()", &profile);
        for role in HiddenRole::ALL {
            sig = EditRequest::AddHiddenArgument(role).apply(sig, &profile).unwrap();
        }
        assert_eq!(
            sig.serialize(),
            "void __usercall func(__int64@<x20>, __int64@<x21>, __int64@<x22>)"
        );
    }

    #[test]
    fn test_make_multi_register_return() {
        let profile = x86();
        let sig = parsed("int f(int)", &profile);
        let out = EditRequest::MakeMultiRegisterReturn(3)
            .apply(sig, &profile)
            .unwrap();
        assert_eq!(out.base_tokens[0], "swiftida_tuple3");
        let rets: Vec<String> = out.return_bindings.iter().map(|b| b.to_string()).collect();
        assert_eq!(rets, vec!["0:rax", "8:rdx", "16:rcx"]);
    }

    #[test]
    fn test_make_multi_register_return_from_void() {
        let profile = arm();
        let sig = parsed("void __usercall func(__int64@<x20>)", &profile);
        let out = EditRequest::MakeMultiRegisterReturn(2)
            .apply(sig, &profile)
            .unwrap();
        assert_eq!(
            out.serialize(),
            "swiftida_tuple2 __usercall func@<0:x0, 8:x1>(__int64@<x20>)"
        );
    }

    #[test]
    fn test_make_multi_register_return_limits() {
        let profile = x86();
        for words in [0, 1, 5] {
            let sig = parsed("int f(int)", &profile);
            match EditRequest::MakeMultiRegisterReturn(words).apply(sig, &profile) {
                Err(Error::RegisterCountExceeded {
                    requested,
                    available,
                }) => {
                    assert_eq!(requested, words);
                    assert_eq!(available, 4);
                }
                other => panic!("expected RegisterCountExceeded, got {:?}", other),
            }
        }

        let sig = parsed("int f(int)", &profile);
        assert!(EditRequest::MakeMultiRegisterReturn(4).apply(sig, &profile).is_ok());
    }

    #[test]
    fn test_tuple_struct_request() {
        assert_eq!(
            EditRequest::MakeMultiRegisterReturn(4).tuple_struct(),
            Some(("swiftida_tuple4".to_string(), 4))
        );
        assert_eq!(
            EditRequest::ConvertToExplicitCallingConvention.tuple_struct(),
            None
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            EditRequest::AddHiddenArgument(HiddenRole::AsyncContext).to_string(),
            "add argument async_context"
        );
        assert_eq!(
            EditRequest::MakeMultiRegisterReturn(2).to_string(),
            "make multi-return tuple2"
        );
    }
}
