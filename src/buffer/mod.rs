//! # Command Buffer
//!
//! Print operations are collected as [`Directive`]s in a [`CommandBuffer`]
//! and only compiled to bytes when the session flushes.
//!
//! ## Architecture
//!
//! ```text
//! append_*  ──►  CommandBuffer  ──►  codegen  ──►  Transport::write_raw
//!               (Vec<Directive>)     (bytes)       (one write per flush)
//! ```
//!
//! The buffer is append-only. Style and character-set directives are
//! position dependent: they affect only what comes after them.
//!
//! ## Example
//!
//! ```
//! use recibo::buffer::{CommandBuffer, Directive};
//! use recibo::protocol::commands::CutMode;
//!
//! let mut buffer = CommandBuffer::new();
//! buffer.push(Directive::TextLine("HELLO".into()));
//! buffer.push(Directive::Cut(CutMode::Full));
//!
//! assert_eq!(buffer.descriptions(), vec!["Print line: HELLO", "Cut paper"]);
//! assert!(buffer.to_bytes().starts_with(b"HELLO\n"));
//! ```

mod codegen;
mod directive;

pub use directive::Directive;

/// Ordered, append-only sequence of directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuffer {
    directives: Vec<Directive>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter()
    }

    pub fn as_slice(&self) -> &[Directive] {
        &self.directives
    }

    /// One line per directive, for print queue listings
    pub fn descriptions(&self) -> Vec<String> {
        self.directives.iter().map(Directive::describe).collect()
    }
}

impl FromIterator<Directive> for CommandBuffer {
    fn from_iter<T: IntoIterator<Item = Directive>>(iter: T) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CommandBuffer {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}
