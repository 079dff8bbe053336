pub(crate) mod char_utils;
mod parser;
mod reader;
mod scanner;
mod source;

pub use parser::Parser;
pub use reader::Reader;
pub use scanner::{Scanner, SkipTabs};
pub use source::Source;
