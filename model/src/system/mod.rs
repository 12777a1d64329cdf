pub mod hardware;
pub mod machine;
pub mod processor;

pub use hardware::*;
pub use machine::*;
pub use processor::*;
