//! Parser for annotated function type strings.
//!
//! Accepts the subset of C declarator syntax the host emits for function
//! types, including register annotations:
//!
//! ```text
//! signature   := base "(" [args] ")"
//! base        := decl (WS? "@<" retlist ">")?
//! decl        := token (WS token)*
//! token       := word ("<" any ">")?      e.g. __spoils<rax>
//! retlist     := regbind ("," WS regbind)*
//! regbind     := (offset ":")? register
//! args        := arg ("," WS arg)*
//! arg         := type ("@<" register ">")?
//! ```
//!
//! It does NOT handle:
//! - Nested function pointers
//! - Array declarators
//! - Templates or lambdas

use crate::signature::{Argument, ParsedSignature, ReturnBinding, PLACEHOLDER_NAME, USERCALL};
use swiftida_core::{ArchProfile, Error, Result};
use tracing::trace;

/// Convention whose arguments are renumbered onto the argument registers.
pub const FASTCALL: &str = "__fastcall";

/// Swift's own convention keyword; it cannot be rewritten in place.
pub const SWIFTCALL: &str = "__swiftcall";

/// Keywords dropped from the base; serialization re-adds `__usercall`.
const STRIPPED_CONVENTIONS: [&str; 2] = [FASTCALL, USERCALL];

/// Parse a raw type string into its components.
pub fn parse(raw: &str, profile: &ArchProfile) -> Result<ParsedSignature> {
    if raw.contains(SWIFTCALL) {
        return Err(Error::UnsupportedConvention {
            signature: raw.to_string(),
            convention: SWIFTCALL.to_string(),
        });
    }

    let pieces = SignatureParser::new(raw).parse()?;
    trace!(base = pieces.base, args = pieces.arguments.len(), "split signature");
    normalize(raw, pieces, profile)
}

/// The syntactic pieces of a signature, before any convention rules apply.
#[derive(Debug)]
struct RawSignature<'a> {
    base: &'a str,
    return_bindings: Option<Vec<ReturnBinding>>,
    arguments: Vec<Argument>,
}

/// Character cursor over the input.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Consume a run of characters allowed in register names and offsets.
    fn take_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if is_word_char(ch) {
                self.next_char();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Recursive-descent parser for the signature grammar.
struct SignatureParser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> SignatureParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    fn error(&self, pos: usize, message: impl Into<String>) -> Error {
        Error::MalformedSignature {
            signature: self.cursor.input.to_string(),
            pos,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.cursor.peek_char() {
            Some(ch) if ch == expected => {
                self.cursor.next_char();
                Ok(())
            }
            Some(ch) => Err(self.error(
                self.cursor.pos,
                format!("expected '{}', got '{}'", expected, ch),
            )),
            None => Err(self.error(
                self.cursor.pos,
                format!("expected '{}', got end of input", expected),
            )),
        }
    }

    fn parse(mut self) -> Result<RawSignature<'a>> {
        let base = self.parse_base()?;

        let return_bindings = if self.cursor.at("@<") {
            self.cursor.pos += 2;
            let bindings = self.parse_return_bindings()?;
            self.cursor.skip_whitespace();
            Some(bindings)
        } else {
            None
        };

        self.expect('(')?;
        let arguments = self.parse_arguments()?;

        Ok(RawSignature {
            base,
            return_bindings,
            arguments,
        })
    }

    /// Everything up to the return-binding list or the argument list.
    fn parse_base(&mut self) -> Result<&'a str> {
        let start = self.cursor.pos;
        while let Some(ch) = self.cursor.peek_char() {
            if ch == '(' || self.cursor.at("@<") {
                break;
            }
            match ch {
                '<' => self.skip_angle_group()?,
                ')' | ',' | '>' | '@' => {
                    return Err(self.error(self.cursor.pos, format!("unexpected '{}'", ch)));
                }
                _ => {
                    self.cursor.next_char();
                }
            }
        }

        let base = self.cursor.input[start..self.cursor.pos].trim();
        if base.is_empty() {
            return Err(self.error(start, "expected return type"));
        }
        Ok(base)
    }

    /// A `<...>` group inside a specifier, such as a `__spoils<...>` list.
    fn skip_angle_group(&mut self) -> Result<()> {
        let open = self.cursor.pos;
        self.expect('<')?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.cursor.next_char() {
                Some('<') => depth += 1,
                Some('>') => depth -= 1,
                Some('(') | Some(')') | None => {
                    return Err(self.error(open, "unterminated '<'"));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn parse_return_bindings(&mut self) -> Result<Vec<ReturnBinding>> {
        let mut bindings = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            bindings.push(self.parse_return_binding()?);
            self.cursor.skip_whitespace();

            match self.cursor.next_char() {
                Some(',') => continue,
                Some('>') => break,
                Some(ch) => {
                    let pos = self.cursor.pos - ch.len_utf8();
                    return Err(self.error(pos, format!("expected ',' or '>', got '{}'", ch)));
                }
                None => return Err(self.error(self.cursor.pos, "unterminated return registers")),
            }
        }
        Ok(bindings)
    }

    fn parse_return_binding(&mut self) -> Result<ReturnBinding> {
        let start = self.cursor.pos;
        let first = self.cursor.take_word();

        if self.cursor.peek_char() == Some(':') {
            let offset: u32 = first
                .parse()
                .map_err(|_| self.error(start, format!("invalid offset: {}", first)))?;
            self.cursor.next_char();
            let reg_start = self.cursor.pos;
            let register = self.cursor.take_word();
            if register.is_empty() {
                return Err(self.error(reg_start, "expected register name"));
            }
            Ok(ReturnBinding::new(offset, register))
        } else if first.is_empty() {
            Err(self.error(start, "expected register name"))
        } else {
            Ok(ReturnBinding::new(0, first))
        }
    }

    /// The argument list up to the closing parenthesis, which must end the
    /// input.
    fn parse_arguments(&mut self) -> Result<Vec<Argument>> {
        let start = self.cursor.pos;
        let rest = self.cursor.rest();

        let close = rest
            .trim_end()
            .strip_suffix(')')
            .map(str::len)
            .ok_or_else(|| match rest.rfind(')') {
                Some(idx) => self.error(start + idx + 1, "unexpected text after ')'"),
                None => self.error(self.cursor.input.len(), "expected ')'"),
            })?;

        let text = &rest[..close];
        if let Some(idx) = text.find(|c: char| c == '(' || c == ')') {
            return Err(self.error(start + idx, "nested parentheses are not supported"));
        }

        self.cursor.pos = self.cursor.input.len();

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut arguments = Vec::new();
        let mut offset = start;
        for piece in text.split(',') {
            arguments.push(self.parse_argument(piece, offset)?);
            offset += piece.len() + 1;
        }

        if let [only] = arguments.as_slice() {
            if only.register.is_none() && only.ty.eq_ignore_ascii_case("void") {
                arguments.clear();
            }
        }
        Ok(arguments)
    }

    fn parse_argument(&self, piece: &str, pos: usize) -> Result<Argument> {
        let arg = piece.trim();
        if arg.is_empty() {
            return Err(self.error(pos, "empty argument"));
        }

        let Some(at) = arg.rfind("@<") else {
            return Ok(Argument::new(arg));
        };

        let ty = arg[..at].trim_end();
        let Some(register) = arg[at + 2..].strip_suffix('>') else {
            return Err(self.error(pos, "unterminated register annotation"));
        };
        let register = register.trim();

        if ty.is_empty() {
            return Err(self.error(pos, "expected argument type"));
        }
        if register.is_empty() || !register.chars().all(is_word_char) {
            return Err(self.error(pos, format!("invalid register name: '{}'", register)));
        }
        Ok(Argument::in_register(ty, register))
    }
}

/// Split `base` on whitespace and attach leading `*`s to the previous token.
///
/// `char * * x` becomes `["char**", "x"]`.
pub fn fold_pointer_stars(base: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in base.split_whitespace() {
        let rest = word.trim_start_matches('*');
        let stars = &word[..word.len() - rest.len()];

        match tokens.last_mut() {
            Some(prev) if !stars.is_empty() => {
                prev.push_str(stars);
                if !rest.is_empty() {
                    tokens.push(rest.to_string());
                }
            }
            _ => tokens.push(word.to_string()),
        }
    }
    tokens
}

/// Apply the convention rules to the syntactic pieces.
fn normalize(raw: &str, pieces: RawSignature<'_>, profile: &ArchProfile) -> Result<ParsedSignature> {
    let mut base_tokens = fold_pointer_stars(pieces.base);
    let mut arguments = pieces.arguments;

    if base_tokens.iter().any(|t| t == FASTCALL) {
        let registers = profile.argument_registers();
        if arguments.len() > registers.len() {
            return Err(Error::TooManyArguments {
                signature: raw.to_string(),
                count: arguments.len(),
                available: registers.len(),
            });
        }
        for (arg, reg) in arguments.iter_mut().zip(registers) {
            arg.register = Some(reg.to_string());
        }
    }

    // Serialization ends the base with `__usercall func`.
    let has_convention = base_tokens
        .iter()
        .any(|t| STRIPPED_CONVENTIONS.contains(&t.as_str()));
    if has_convention && base_tokens.last().map(String::as_str) == Some(PLACEHOLDER_NAME) {
        base_tokens.pop();
    }
    base_tokens.retain(|t| !STRIPPED_CONVENTIONS.contains(&t.as_str()));

    if base_tokens.is_empty() {
        return Err(Error::MalformedSignature {
            signature: raw.to_string(),
            pos: 0,
            message: "missing return type".to_string(),
        });
    }

    let mut sig = ParsedSignature {
        base_tokens,
        return_bindings: pieces.return_bindings.unwrap_or_default(),
        arguments,
    };
    if sig.return_bindings.is_empty() && !sig.returns_void() {
        sig.return_bindings
            .push(ReturnBinding::new(0, profile.primary_return_register()));
    }
    Ok(sig)
}
