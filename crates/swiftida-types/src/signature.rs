//! The decomposed form of an annotated function type.
//!
//! A [`ParsedSignature`] is rebuilt from the persisted type string for every
//! edit and rendered back with [`ParsedSignature::serialize`]. Nothing in it
//! outlives a single edit.

use crate::parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use swiftida_core::{ArchProfile, Result};

/// Convention keyword every rewritten signature carries.
pub const USERCALL: &str = "__usercall";

/// Placeholder declarator name required by the type-string grammar.
///
/// The host drops it when the type is attached to a concrete function.
pub const PLACEHOLDER_NAME: &str = "func";

/// One word of the return value and the register holding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnBinding {
    /// Byte offset of this word inside the returned value.
    pub offset: u32,
    pub register: String,
}

impl ReturnBinding {
    pub fn new(offset: u32, register: impl Into<String>) -> Self {
        Self {
            offset,
            register: register.into(),
        }
    }
}

impl fmt::Display for ReturnBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.offset, self.register)
    }
}

/// A positional argument, optionally pinned to a register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    /// The argument type as written, e.g. `char*` or `unsigned int`.
    pub ty: String,
    pub register: Option<String>,
}

impl Argument {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            register: None,
        }
    }

    pub fn in_register(ty: impl Into<String>, register: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            register: Some(register.into()),
        }
    }

    /// Whether this argument carries the `@<register>` annotation.
    pub fn is_annotated_with(&self, register: &str) -> bool {
        self.register.as_deref() == Some(register)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some(reg) => write!(f, "{}@<{}>", self.ty, reg),
            None => f.write_str(&self.ty),
        }
    }
}

/// A function type split into return specifiers, return registers and
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSignature {
    /// Return type and remaining specifier keywords, pointer stars folded.
    pub base_tokens: Vec<String>,
    /// Explicit return registers; empty only for `void` returns.
    pub return_bindings: Vec<ReturnBinding>,
    pub arguments: Vec<Argument>,
}

impl ParsedSignature {
    /// Parse a raw type string for the given target.
    pub fn parse(raw: &str, profile: &ArchProfile) -> Result<Self> {
        parser::parse(raw, profile)
    }

    /// The leading return-type token.
    pub fn return_type(&self) -> &str {
        self.base_tokens.first().map(String::as_str).unwrap_or("")
    }

    pub fn returns_void(&self) -> bool {
        self.return_type().eq_ignore_ascii_case("void")
    }

    /// Render as an explicit `__usercall` type string.
    pub fn serialize(&self) -> String {
        let mut out = self.base_tokens.join(" ");
        out.push(' ');
        out.push_str(USERCALL);
        out.push(' ');
        out.push_str(PLACEHOLDER_NAME);

        match self.return_bindings.as_slice() {
            [] => {}
            [single] if single.offset == 0 => {
                out.push_str("@<");
                out.push_str(&single.register);
                out.push('>');
            }
            bindings => {
                let joined: Vec<String> = bindings.iter().map(|b| b.to_string()).collect();
                out.push_str("@<");
                out.push_str(&joined.join(", "));
                out.push('>');
            }
        }

        let args: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        out.push('(');
        out.push_str(&args.join(", "));
        out.push(')');
        out
    }
}

impl fmt::Display for ParsedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(base: &[&str], rets: Vec<ReturnBinding>, args: Vec<Argument>) -> ParsedSignature {
        ParsedSignature {
            base_tokens: base.iter().map(|s| s.to_string()).collect(),
            return_bindings: rets,
            arguments: args,
        }
    }

    #[test]
    fn test_serialize_single_return() {
        let s = sig(
            &["int"],
            vec![ReturnBinding::new(0, "rax")],
            vec![
                Argument::in_register("char*", "rdi"),
                Argument::in_register("int", "rsi"),
            ],
        );
        assert_eq!(s.serialize(), "int __usercall func@<rax>(char*@<rdi>, int@<rsi>)");
    }

    #[test]
    fn test_serialize_void_no_args() {
        let s = sig(&["void"], vec![], vec![]);
        assert_eq!(s.serialize(), "void __usercall func()");
    }

    #[test]
    fn test_serialize_multi_return() {
        let s = sig(
            &["swiftida_tuple2"],
            vec![ReturnBinding::new(0, "x0"), ReturnBinding::new(8, "x1")],
            vec![Argument::new("__int64")],
        );
        assert_eq!(
            s.serialize(),
            "swiftida_tuple2 __usercall func@<0:x0, 8:x1>(__int64)"
        );
    }

    #[test]
    fn test_serialize_lone_binding_with_offset() {
        let s = sig(&["int"], vec![ReturnBinding::new(8, "rdx")], vec![]);
        assert_eq!(s.serialize(), "int __usercall func@<8:rdx>()");
    }

    #[test]
    fn test_display_matches_serialize() {
        let s = sig(&["unsigned", "int"], vec![ReturnBinding::new(0, "rax")], vec![]);
        assert_eq!(s.to_string(), s.serialize());
    }

    #[test]
    fn test_binding_and_argument_display() {
        assert_eq!(ReturnBinding::new(16, "rcx").to_string(), "16:rcx");
        assert_eq!(Argument::new("int").to_string(), "int");
        assert_eq!(Argument::in_register("__int64", "r13").to_string(), "__int64@<r13>");
    }

    #[test]
    fn test_returns_void() {
        assert!(sig(&["VOID"], vec![], vec![]).returns_void());
        assert!(!sig(&["void*"], vec![], vec![]).returns_void());
    }

    #[test]
    fn test_is_annotated_with() {
        let arg = Argument::in_register("__int64", "r13");
        assert!(arg.is_annotated_with("r13"));
        assert!(!arg.is_annotated_with("r12"));
        assert!(!Argument::new("int").is_annotated_with("r13"));
    }
}
