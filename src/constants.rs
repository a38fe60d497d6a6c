/// BMP 文件的标准头部大小 (字节)。
/// 隐写操作将跳过这个头部，从像素数据开始。
pub const BMP_HEADER_SIZE: usize = 54;

/// 头部中图像宽度字段的偏移量 (4 字节，小端序)。
pub const WIDTH_OFFSET: usize = 18;

/// 头部中图像高度字段的偏移量 (4 字节，小端序)。
pub const HEIGHT_OFFSET: usize = 22;

/// 头部中每像素位数字段的偏移量 (2 字节，小端序)。
pub const BITS_PER_PIXEL_OFFSET: usize = 28;

/// 每个像素占用的字节数 (B, G, R)。
pub const BYTES_PER_PIXEL: u64 = 3;

/// 嵌入在像素数据最前面的标记，用于识别经过隐写的图像。
pub const MAGIC_STRING: &[u8] = b"##";

/// 隐藏单个字节需要的像素字节数。每个像素字节只存储 1 bit。
pub const BYTES_PER_CHAR: usize = 8;

/// 隐藏一个 `u32` 长度字段需要的像素字节数。
pub const LENGTH_HIDING_BYTES: usize = 32;

/// 秘密文件扩展名的最大长度 (不含 `.`)。
pub const MAX_EXTENSION_LEN: usize = 9;

/// 未指定输出路径时，隐写图像的默认文件名。
pub const DEFAULT_STEGO_NAME: &str = "stego.bmp";

/// 未指定输出名时，恢复文件的默认基础名。
pub const DEFAULT_DECODED_NAME: &str = "decoded_output";
