pub mod generation;
pub mod records;

pub use generation::*;
pub use records::*;
