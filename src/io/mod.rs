//! Codecs between remote payloads and the untyped table form.

pub mod csv;
pub mod excel;
