//! # 隐写编码流水线
//!
//! 先读取载体头部并检查容量 ([`Encoder::prepare`])，
//! 通过后再把头部、帧以及剩余像素写入目标流 ([`Encoder::embed_into`])。
//! 容量检查失败时目标流一个字节都不会被写入。

use crate::capacity::{BmpGeometry, check_capacity, required_bits};
use crate::constants::{BMP_HEADER_SIZE, BYTES_PER_CHAR, LENGTH_HIDING_BYTES, MAGIC_STRING};
use crate::error::StegoError;
use crate::secret::SecretFile;
use crate::steganography::{pack_byte, pack_u32};
use log::debug;
use std::io::{self, Read, Write};

/// 编码完成后的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    /// 被帧占用的载体字节数。
    pub carrier_bytes_used: u64,
    /// 载体字节总数。
    pub carrier_bytes_available: u64,
}

/// 已通过容量检查、尚未写出的编码上下文。
pub struct Encoder<R> {
    source: R,
    header: [u8; BMP_HEADER_SIZE],
    extension: Vec<u8>,
    extension_len: u32,
    content: Vec<u8>,
    payload_len: u32,
    report: EncodeReport,
}

impl<R: Read> Encoder<R> {
    /// 读取载体头部，计算容量并与秘密文件所需的位数比较。
    ///
    /// # Errors
    ///
    /// * 头部无法读取或不是 24 位 BMP。
    /// * 秘密文件超过 `u32` 能表示的长度。
    /// * 载体空间不足 ([`StegoError::CapacityExceeded`])。
    ///
    /// `image_len` 是整个源图像的实际字节数；头部声明的尺寸超过实际数据时以实际数据为准。
    pub fn prepare(
        mut source: R,
        image_len: u64,
        secret: SecretFile,
    ) -> Result<Self, StegoError> {
        let mut header = [0u8; BMP_HEADER_SIZE];
        source.read_exact(&mut header)?;
        let geometry = BmpGeometry::from_header(&header)?;
        debug!("carrier geometry: {}x{}", geometry.width, geometry.height);

        let SecretFile { extension, content } = secret;
        let extension_len = u32::try_from(extension.len())
            .map_err(|_| StegoError::InvalidExtension(extension.clone()))?;
        let payload_len =
            u32::try_from(content.len()).map_err(|_| StegoError::PayloadTooLarge(content.len()))?;

        let required = required_bits(extension_len, payload_len);
        let available = geometry.carrier_bytes(image_len);
        check_capacity(available, required)?;
        debug!("capacity ok: {required} of {available} carrier bytes");

        Ok(Self {
            source,
            header,
            extension: extension.into_bytes(),
            extension_len,
            content,
            payload_len,
            report: EncodeReport {
                carrier_bytes_used: required,
                carrier_bytes_available: available,
            },
        })
    }

    /// 将头部、帧和剩余像素依次写入 `dest`。
    ///
    /// # Errors
    ///
    /// 任何读写失败都会中止编码，`dest` 中已写入的内容不保证有效。
    pub fn embed_into<W: Write>(mut self, mut dest: W) -> Result<EncodeReport, StegoError> {
        dest.write_all(&self.header)?;

        for &ch in MAGIC_STRING {
            self.embed_byte(ch, &mut dest)?;
        }
        debug!("magic marker embedded");

        self.embed_u32(self.extension_len, &mut dest)?;
        for ch in std::mem::take(&mut self.extension) {
            self.embed_byte(ch, &mut dest)?;
        }
        debug!("extension embedded ({} chars)", self.extension_len);

        self.embed_u32(self.payload_len, &mut dest)?;
        for byte in std::mem::take(&mut self.content) {
            self.embed_byte(byte, &mut dest)?;
        }
        debug!("payload embedded ({} bytes)", self.payload_len);

        let copied = io::copy(&mut self.source, &mut dest)?;
        debug!("copied {copied} remaining image bytes");
        dest.flush()?;

        Ok(self.report)
    }

    fn embed_byte<W: Write>(&mut self, value: u8, dest: &mut W) -> Result<(), StegoError> {
        let mut carrier = [0u8; BYTES_PER_CHAR];
        self.source.read_exact(&mut carrier)?;
        dest.write_all(&pack_byte(value, carrier))?;
        Ok(())
    }

    fn embed_u32<W: Write>(&mut self, value: u32, dest: &mut W) -> Result<(), StegoError> {
        let mut carrier = [0u8; LENGTH_HIDING_BYTES];
        self.source.read_exact(&mut carrier)?;
        dest.write_all(&pack_u32(value, carrier))?;
        Ok(())
    }
}

/// 对内存中的数据执行完整的编码流程。
#[cfg(test)]
pub(crate) fn encode_to_vec(image: &[u8], secret: SecretFile) -> Result<Vec<u8>, StegoError> {
    let mut out = Vec::with_capacity(image.len());
    Encoder::prepare(image, image.len() as u64, secret)?.embed_into(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HEIGHT_OFFSET, WIDTH_OFFSET};
    use crate::steganography::unpack_byte;

    fn carrier(width: u32, height: u32) -> Vec<u8> {
        let mut image = vec![0u8; BMP_HEADER_SIZE];
        image[0..2].copy_from_slice(b"BM");
        image[WIDTH_OFFSET..WIDTH_OFFSET + 4].copy_from_slice(&width.to_le_bytes());
        image[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&height.to_le_bytes());
        image[28] = 24;
        image.extend((0..width * height * 3).map(|i| (i % 251) as u8));
        image
    }

    #[test]
    fn header_and_trailing_pixels_are_copied_verbatim() -> anyhow::Result<()> {
        let image = carrier(10, 10);
        let secret = SecretFile::new("txt", b"abcd".to_vec())?;
        let stego = encode_to_vec(&image, secret)?;

        assert_eq!(stego.len(), image.len());
        assert_eq!(stego[..BMP_HEADER_SIZE], image[..BMP_HEADER_SIZE]);

        let used = BMP_HEADER_SIZE + required_bits(3, 4) as usize;
        assert_eq!(stego[used..], image[used..]);
        Ok(())
    }

    #[test]
    fn only_lsbs_change() -> anyhow::Result<()> {
        let image = carrier(10, 10);
        let stego = encode_to_vec(&image, SecretFile::new("bin", vec![0xA5; 4])?)?;

        for (new, old) in stego.iter().zip(image.iter()) {
            assert_eq!(new & 0xFE, old & 0xFE);
        }
        Ok(())
    }

    #[test]
    fn marker_is_first_field() -> anyhow::Result<()> {
        let image = carrier(10, 10);
        let stego = encode_to_vec(&image, SecretFile::new("txt", b"x".to_vec())?)?;

        let first: [u8; BYTES_PER_CHAR] = stego[BMP_HEADER_SIZE..BMP_HEADER_SIZE + 8].try_into()?;
        let second: [u8; BYTES_PER_CHAR] =
            stego[BMP_HEADER_SIZE + 8..BMP_HEADER_SIZE + 16].try_into()?;
        assert_eq!([unpack_byte(&first), unpack_byte(&second)], *b"##");
        Ok(())
    }

    #[test]
    fn capacity_is_checked_before_writing() -> anyhow::Result<()> {
        // 10x10 -> 300 carrier bytes, 104 + 8 * 25 = 304 required.
        let image = carrier(10, 10);
        let secret = SecretFile::new("txt", vec![0; 25])?;

        let mut out = Vec::new();
        let result = Encoder::prepare(image.as_slice(), image.len() as u64, secret)
            .map(|e| e.embed_into(&mut out));
        assert!(matches!(
            result,
            Err(StegoError::CapacityExceeded {
                required: 304,
                available: 300
            })
        ));
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn truncated_pixel_data_limits_capacity() -> anyhow::Result<()> {
        let mut image = carrier(10, 10);
        image.truncate(BMP_HEADER_SIZE + 40);

        let result = encode_to_vec(&image, SecretFile::new("txt", b"abcd".to_vec())?);
        assert!(matches!(
            result,
            Err(StegoError::CapacityExceeded {
                required: 136,
                available: 40
            })
        ));
        Ok(())
    }

    #[test]
    fn short_stream_behind_a_long_length_is_an_io_error() -> anyhow::Result<()> {
        let mut image = carrier(10, 10);
        let claimed = image.len() as u64;
        image.truncate(BMP_HEADER_SIZE + 40);

        let secret = SecretFile::new("txt", b"abcd".to_vec())?;
        let result = Encoder::prepare(image.as_slice(), claimed, secret)?.embed_into(Vec::new());
        assert!(matches!(result, Err(StegoError::Io(_))));
        Ok(())
    }
}
