//! # 隐写解码流水线
//!
//! 按与编码相同的顺序读取帧：标记、扩展名长度、扩展名、内容长度，
//! 每个长度字段都在使用前校验。帧头全部通过后才会写出内容。

use crate::capacity::BmpGeometry;
use crate::constants::{
    BMP_HEADER_SIZE, BYTES_PER_CHAR, LENGTH_HIDING_BYTES, MAGIC_STRING, MAX_EXTENSION_LEN,
};
use crate::error::StegoError;
use crate::secret::validate_extension;
use crate::steganography::{unpack_byte, unpack_u32};
use log::debug;
use std::io::{Read, Write};

/// 已读完帧头、等待输出内容的解码上下文。
pub struct Decoder<R> {
    source: R,
    extension: String,
    payload_len: u32,
}

impl<R: Read> Decoder<R> {
    /// 读取并校验帧头。
    ///
    /// # Errors
    ///
    /// * 标记不匹配时返回 [`StegoError::MarkerMismatch`]，不会再读取后续字段。
    /// * 扩展名长度超过 [`MAX_EXTENSION_LEN`]、扩展名含非法字符，
    ///   或内容长度超出剩余像素时返回 [`StegoError::MalformedFrame`]。
    /// * 头部不是 24 位 BMP 时返回 [`StegoError::InvalidCarrier`] (在标记之后检查)。
    /// * 读取失败。
    ///
    /// `image_len` 是整个图像流的实际字节数，用于限制内容长度。
    pub fn open(mut source: R, image_len: u64) -> Result<Self, StegoError> {
        let mut header = [0u8; BMP_HEADER_SIZE];
        source.read_exact(&mut header)?;

        let mut marker = Vec::with_capacity(MAGIC_STRING.len());
        for _ in 0..MAGIC_STRING.len() {
            marker.push(read_byte(&mut source)?);
        }
        if marker != MAGIC_STRING {
            return Err(StegoError::MarkerMismatch);
        }
        debug!("magic marker found");

        let geometry = BmpGeometry::from_header(&header)?;
        let mut remaining = geometry.carrier_bytes(image_len);

        let extension_len = read_u32(&mut source)? as usize;
        if extension_len > MAX_EXTENSION_LEN {
            return Err(StegoError::MalformedFrame(format!(
                "extension length {extension_len} exceeds {MAX_EXTENSION_LEN}"
            )));
        }

        let mut extension = Vec::with_capacity(extension_len);
        for _ in 0..extension_len {
            extension.push(read_byte(&mut source)?);
        }
        let extension = String::from_utf8(extension)
            .map_err(|_| StegoError::MalformedFrame("extension is not ASCII".to_string()))?;
        validate_extension(&extension).map_err(StegoError::MalformedFrame)?;
        debug!("extension: {extension:?}");

        let payload_len = read_u32(&mut source)?;
        let consumed = ((MAGIC_STRING.len() + extension_len) * BYTES_PER_CHAR
            + 2 * LENGTH_HIDING_BYTES) as u64;
        remaining = remaining.saturating_sub(consumed);
        if payload_len as u64 * BYTES_PER_CHAR as u64 > remaining {
            return Err(StegoError::MalformedFrame(format!(
                "payload length {payload_len} does not fit in {remaining} remaining carrier bytes"
            )));
        }
        debug!("payload length: {payload_len} bytes");

        Ok(Self {
            source,
            extension,
            payload_len,
        })
    }

    /// 恢复出的扩展名 (不含 `.`)。
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn payload_len(&self) -> u32 {
        self.payload_len
    }

    /// 逐字节解出内容并写入 `dest`，返回写出的字节数。
    ///
    /// # Errors
    ///
    /// 读写失败时中止，`dest` 中保留已写出的部分。
    pub fn write_payload<W: Write>(mut self, mut dest: W) -> Result<u64, StegoError> {
        for _ in 0..self.payload_len {
            let byte = read_byte(&mut self.source)?;
            dest.write_all(&[byte])?;
        }
        dest.flush()?;
        Ok(self.payload_len as u64)
    }
}

fn read_byte<R: Read>(source: &mut R) -> Result<u8, StegoError> {
    let mut carrier = [0u8; BYTES_PER_CHAR];
    source.read_exact(&mut carrier)?;
    Ok(unpack_byte(&carrier))
}

fn read_u32<R: Read>(source: &mut R) -> Result<u32, StegoError> {
    let mut carrier = [0u8; LENGTH_HIDING_BYTES];
    source.read_exact(&mut carrier)?;
    Ok(unpack_u32(&carrier))
}

/// 对内存中的隐写图像执行完整的解码，返回扩展名和内容。
#[cfg(test)]
pub(crate) fn decode_from_slice(image: &[u8]) -> Result<(String, Vec<u8>), StegoError> {
    let decoder = Decoder::open(image, image.len() as u64)?;
    let extension = decoder.extension().to_string();
    let mut content = Vec::with_capacity(decoder.payload_len() as usize);
    decoder.write_payload(&mut content)?;
    Ok((extension, content))
}
