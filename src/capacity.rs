//! # 容量规划模块
//!
//! 根据 BMP 头部声明的几何尺寸计算可用的载体字节数，
//! 并计算嵌入一个秘密文件所需的位数。

use crate::constants::{
    BITS_PER_PIXEL_OFFSET, BMP_HEADER_SIZE, BYTES_PER_CHAR, BYTES_PER_PIXEL, HEIGHT_OFFSET,
    LENGTH_HIDING_BYTES, MAGIC_STRING, WIDTH_OFFSET,
};
use crate::error::StegoError;
use image::ImageFormat;

/// BMP 头部中声明的图像尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpGeometry {
    pub width: u32,
    pub height: u32,
}

impl BmpGeometry {
    /// 从 54 字节的 BMP 头部读取宽度和高度。
    ///
    /// 自顶向下存储的位图高度为负数，这里取其绝对值。
    ///
    /// # Errors
    ///
    /// 头部签名不是 `BM`、或者每像素位数不是 24 时返回 [`StegoError::InvalidCarrier`]。
    pub fn from_header(header: &[u8; BMP_HEADER_SIZE]) -> Result<Self, StegoError> {
        match image::guess_format(header) {
            Ok(ImageFormat::Bmp) => {}
            _ => {
                return Err(StegoError::InvalidCarrier(
                    "missing 'BM' signature".to_string(),
                ));
            }
        }

        let bits_per_pixel = u16::from_le_bytes([
            header[BITS_PER_PIXEL_OFFSET],
            header[BITS_PER_PIXEL_OFFSET + 1],
        ]);
        if bits_per_pixel != 24 {
            return Err(StegoError::InvalidCarrier(format!(
                "{bits_per_pixel} bits per pixel"
            )));
        }

        let width = read_i32(header, WIDTH_OFFSET).unsigned_abs();
        let height = read_i32(header, HEIGHT_OFFSET).unsigned_abs();

        Ok(Self { width, height })
    }

    /// 像素数据的字节数，即可用的载体字节数。
    pub fn pixel_byte_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * BYTES_PER_PIXEL
    }

    /// 实际可用的载体字节数：头部声明的像素字节数与图像流中真实存在的像素字节数取较小者。
    ///
    /// `image_len` 为包含头部在内的整个图像的字节数。
    pub fn carrier_bytes(&self, image_len: u64) -> u64 {
        self.pixel_byte_count()
            .min(image_len.saturating_sub(BMP_HEADER_SIZE as u64))
    }
}

fn read_i32(header: &[u8; BMP_HEADER_SIZE], offset: usize) -> i32 {
    let mut field = [0u8; 4];
    field.copy_from_slice(&header[offset..offset + 4]);
    i32::from_le_bytes(field)
}

/// 嵌入整个帧所需的位数 (也就是需要的载体字节数)。
///
/// 标记、扩展名与内容每字节占 8 位，两个长度字段各占 32 位。
pub fn required_bits(extension_len: u32, payload_len: u32) -> u64 {
    let per_char = BYTES_PER_CHAR as u64;
    let length_field = LENGTH_HIDING_BYTES as u64;

    MAGIC_STRING.len() as u64 * per_char
        + length_field
        + extension_len as u64 * per_char
        + length_field
        + payload_len as u64 * per_char
}

/// 检查可用载体字节是否足够。
///
/// 恰好装满也会被拒绝：必须 `available > required`。
///
/// # Errors
///
/// 空间不足时返回 [`StegoError::CapacityExceeded`]。
pub fn check_capacity(available: u64, required: u64) -> Result<(), StegoError> {
    if available > required {
        Ok(())
    } else {
        Err(StegoError::CapacityExceeded {
            required,
            available,
        })
    }
}
