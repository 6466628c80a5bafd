pub mod dose;
pub mod medicine;

pub use dose::*;
pub use medicine::*;
