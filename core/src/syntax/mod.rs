//! Literal syntax helpers shared by the parser, the interpreter and value
//! formatting.

pub mod blob_literal;
pub mod string_literal;
