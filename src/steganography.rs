//! # 位编解码模块
//!
//! 把一个值的每一位依次写入若干载体字节的最低有效位 (LSB)，以及反向操作。
//! 位序为 LSB 优先：值的第 `i` 位对应第 `i` 个载体字节。

use crate::constants::{BYTES_PER_CHAR, LENGTH_HIDING_BYTES};

fn modify(mut value: u32, carrier: &mut [u8]) {
    for byte in carrier.iter_mut() {
        *byte = ((value & 0x1) as u8) | (*byte & 0xFE);
        value >>= 1;
    }
}

fn recover(carrier: &[u8]) -> u32 {
    carrier
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &byte)| acc | (((byte & 0x1) as u32) << i))
}

/// 将 `value` 的 8 位写入 8 个载体字节的 LSB，高 7 位保持不变。
pub fn pack_byte(value: u8, mut carrier: [u8; BYTES_PER_CHAR]) -> [u8; BYTES_PER_CHAR] {
    modify(value as u32, &mut carrier);
    carrier
}

/// 从 8 个载体字节的 LSB 还原一个字节。
pub fn unpack_byte(carrier: &[u8; BYTES_PER_CHAR]) -> u8 {
    recover(carrier) as u8
}

/// 将 32 位长度写入 32 个载体字节的 LSB。
pub fn pack_u32(value: u32, mut carrier: [u8; LENGTH_HIDING_BYTES]) -> [u8; LENGTH_HIDING_BYTES] {
    modify(value, &mut carrier);
    carrier
}

/// 从 32 个载体字节的 LSB 还原 32 位长度。
pub fn unpack_u32(carrier: &[u8; LENGTH_HIDING_BYTES]) -> u32 {
    recover(carrier)
}
