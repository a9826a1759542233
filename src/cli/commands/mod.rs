mod command_result;
pub mod context;
pub mod init;
pub mod sort;
pub mod sync;

pub use command_result::*;
