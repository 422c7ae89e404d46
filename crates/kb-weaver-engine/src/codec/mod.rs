//! Bidirectional mapping between an [`Article`](crate::models::Article) and a
//! single Markdown document.
//!
//! The two halves are deliberately asymmetric:
//!
//! - [`compose_markdown`] is total and emits sections in a fixed canonical
//!   order with canonical heading spellings.
//! - [`parse_markdown`] is permissive: it accepts heading aliases
//!   case-insensitively, merges repeated sections, and drops unrecognized
//!   sections without error.
//!
//! Parsing a canonical serialization recovers the field values, but
//! `compose_markdown(parse_markdown(md))` is **not** byte-identity for
//! arbitrary `md` — alias spellings, whitespace, and unrecognized sections are
//! not preserved. This is by contract, not an accident; see the tests in
//! `tests/editing_flow.rs`.

pub mod grammar;
mod parse;
mod serialize;

pub use grammar::Section;
pub use parse::{ParseWarning, ParsedArticle, parse_markdown, parse_markdown_with_warnings};
pub use serialize::compose_markdown;
