pub mod filter;
pub mod limit;
pub mod parse;
