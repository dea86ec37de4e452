pub mod assemble;
pub mod url;

pub use assemble::ResultAssembler;
