//! # swiftida-types
//!
//! Function type signatures and their Swift calling-convention rewrites.
//!
//! This crate provides:
//! - A parser for annotated C function type strings (`@<reg>` hints)
//! - The edits: explicit `__usercall`, hidden arguments, tuple returns
//! - A serializer back to the annotated type string
//! - A [`TypeStore`] seam plus the JSON-backed [`TypeDatabase`]
//! - A command registry mirroring the host's menu actions
//!
//! # Example
//!
//! ```
//! use swiftida_core::{ArchProfile, HiddenRole};
//! use swiftida_types::{EditRequest, SignatureEditor};
//!
//! let profile = ArchProfile::resolve("metapc", true).unwrap();
//! let editor = SignatureEditor::new(&profile);
//!
//! let new_type = editor
//!     .rewrite("int __fastcall(char*, int)", EditRequest::ConvertToExplicitCallingConvention)
//!     .unwrap();
//! assert_eq!(new_type, "int __usercall func@<rax>(char*@<rdi>, int@<rsi>)");
//!
//! let with_self = editor
//!     .rewrite(&new_type, EditRequest::AddHiddenArgument(HiddenRole::SelfContext))
//!     .unwrap();
//! assert!(with_self.ends_with("__int64@<r13>)"));
//! ```

pub mod command;
pub mod database;
pub mod edit;
pub mod editor;
pub mod parser;
pub mod signature;
pub mod types;

pub use command::{Command, CommandRegistry};
pub use database::{DatabaseError, TypeDatabase, TypeStore};
pub use edit::EditRequest;
pub use editor::SignatureEditor;
pub use signature::{Argument, ParsedSignature, ReturnBinding};
pub use types::{StructField, StructType};
