pub mod bench;
pub mod init;
pub mod render;

pub use bench::{bench, BenchArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
