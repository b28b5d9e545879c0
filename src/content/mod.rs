//! Article content: HTML fragments in, typed blocks out.

pub mod assemble;
pub mod marker;
pub mod parser;
pub mod sections;

pub use assemble::ArticleAssembler;
pub use parser::parse;
