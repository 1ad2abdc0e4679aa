pub mod fault;
pub mod health;
pub mod target;

pub use fault::*;
pub use health::*;
pub use target::*;
