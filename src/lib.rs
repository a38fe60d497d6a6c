//! # bmp_stash 库
//!
//! 本库包含 BMP LSB 隐写工具的核心逻辑：位编解码、容量规划，
//! 以及互为镜像的编码/解码流水线。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod handler;
pub mod secret;
pub mod steganography;

pub use error::StegoError;
