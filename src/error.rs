//! # 错误类型模块
//!
//! 定义隐写与恢复流程中可能出现的所有错误。

use std::io;
use thiserror::Error;

/// 隐写/恢复流程的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 读写数据流失败。
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 载体图像不是 24 位的非压缩 BMP。
    #[error("The carrier is not a 24-bit BMP image: {0}")]
    InvalidCarrier(String),

    /// 秘密文件的扩展名无法写入帧中。
    #[error("Invalid secret file extension: {0}")]
    InvalidExtension(String),

    /// 秘密文件超出了 32 位长度字段能表示的范围。
    #[error("The secret file is too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// 图像的像素字节不足以容纳整个帧。
    #[error("Not enough space in the image to hide the file. Required: {required}, Available: {available}")]
    CapacityExceeded { required: u64, available: u64 },

    /// 图像开头没有隐写标记。
    #[error("This image is not encoded properly (magic marker mismatch)")]
    MarkerMismatch,

    /// 帧中的长度或扩展名字段不合理。
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}
