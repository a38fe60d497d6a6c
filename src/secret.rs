//! # 秘密文件模块
//!
//! 负责读取要隐藏的文件，并校验其扩展名能够安全地写入帧中，
//! 以及在恢复时重新拼出文件名。

use crate::constants::MAX_EXTENSION_LEN;
use crate::error::StegoError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 一个完整读入内存的秘密文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretFile {
    /// 不含 `.` 的扩展名，可能为空。
    pub extension: String,
    pub content: Vec<u8>,
}

impl SecretFile {
    pub fn new(extension: impl Into<String>, content: Vec<u8>) -> Result<Self, StegoError> {
        let extension = extension.into();
        validate_extension(&extension).map_err(StegoError::InvalidExtension)?;
        Ok(Self { extension, content })
    }

    /// 读取 `path` 指向的文件，扩展名取自文件名。
    ///
    /// # Errors
    ///
    /// * 扩展名不是 ASCII 字母数字，或超过 [`MAX_EXTENSION_LEN`] 个字符。
    /// * 文件名以 `.` 结尾，扩展名为空。
    /// * 无法读取文件。
    pub fn read(path: &Path) -> Result<Self, StegoError> {
        let extension = match path.extension() {
            Some(ext) if ext.is_empty() => {
                return Err(StegoError::InvalidExtension(format!(
                    "'{}' ends with '.' but has no extension",
                    path.to_string_lossy()
                )));
            }
            Some(ext) => ext
                .to_str()
                .ok_or_else(|| {
                    StegoError::InvalidExtension(ext.to_string_lossy().into_owned())
                })?
                .to_string(),
            None => String::new(),
        };
        validate_extension(&extension).map_err(StegoError::InvalidExtension)?;

        let content = fs::read(path)?;
        Ok(Self { extension, content })
    }
}

/// 检查扩展名是否可以放入帧中，并能在恢复时安全地作为文件名的一部分。
pub(crate) fn validate_extension(extension: &str) -> Result<(), String> {
    if extension.len() > MAX_EXTENSION_LEN {
        return Err(format!(
            "'{extension}' is longer than {MAX_EXTENSION_LEN} characters"
        ));
    }
    if !extension.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(format!("'{extension}' contains non-alphanumeric characters"));
    }
    Ok(())
}

/// 由基础名和扩展名拼出恢复文件的路径：`<base>.<extension>`。
pub fn output_path(base: &Path, extension: &str) -> PathBuf {
    if extension.is_empty() {
        return base.to_path_buf();
    }
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
