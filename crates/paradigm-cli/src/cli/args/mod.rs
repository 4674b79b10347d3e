pub mod current;
pub mod legacy;
pub use current::*;
pub use legacy::*;
