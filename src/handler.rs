//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 子命令的高级业务逻辑。
//! 本模块负责校验参数、打开文件、调用编码/解码流水线以及向用户报告结果。

use crate::cli::{DecodeArgs, EncodeArgs};
use crate::constants::{DEFAULT_DECODED_NAME, DEFAULT_STEGO_NAME};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::secret::{SecretFile, output_path};
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 处理 'Encode' 命令的执行逻辑。
///
/// 先校验所有路径并读取秘密文件，再读取载体头部检查容量，
/// 全部通过后才创建目标图像，因此容量不足时不会留下任何输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 源图像或目标路径不是 `.bmp` 文件。
/// * 目标路径与源图像是同一个文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或秘密文件，或其扩展名无法隐藏。
/// * 图像文件没有足够的空间来隐藏秘密文件。
/// * 无法写入到目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    ensure_bmp(&args.image)?;
    let dest = args
        .dest
        .unwrap_or_else(|| sibling(&args.image, DEFAULT_STEGO_NAME));
    ensure_bmp(&dest)?;
    ensure_distinct(&args.image, &dest)?;
    ensure_writable(&dest, args.force)?;

    let secret = SecretFile::read(&args.secret).with_context(|| {
        format!(
            "Unable to read secret file: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;

    let source = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let image_len = file_len(&source, &args.image)?;
    let encoder = Encoder::prepare(BufReader::new(source), image_len, secret).with_context(|| {
        format!(
            "Cannot hide {} in {}",
            args.secret.to_string_lossy().red().bold(),
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let target = create_output(&dest, args.force)?;
    let report = encoder.embed_into(BufWriter::new(target)).with_context(|| {
        format!(
            "Failed to write stego image: {}. \nThe output file is incomplete and should be discarded.",
            dest.to_string_lossy().red().bold()
        )
    })?;
    info!(
        "used {} of {} carrier bytes",
        report.carrier_bytes_used, report.carrier_bytes_available
    );

    println!(
        "The file has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 先读取并校验帧头 (标记、扩展名、长度)，校验通过后才创建输出文件，
/// 因此对未经隐写的图像不会产生任何输出。
///
/// # Arguments
///
/// * `args` - 包含输入路径和输出基础名的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入图像不是 `.bmp` 文件或无法读取。
/// * 图像中没有隐写标记，或帧数据已损坏。
/// * 输出文件就是输入图像本身。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法写入到输出文件。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    ensure_bmp(&args.image)?;
    let base = args
        .output
        .unwrap_or_else(|| sibling(&args.image, DEFAULT_DECODED_NAME));

    let source = File::open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let image_len = file_len(&source, &args.image)?;
    let decoder = Decoder::open(BufReader::new(source), image_len).with_context(|| {
        format!(
            "Failed to recover a hidden file from '{}'. \nThe image may not contain a hidden file or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let dest = output_path(&base, decoder.extension());
    ensure_distinct(&args.image, &dest)?;
    ensure_writable(&dest, args.force)?;
    let target = create_output(&dest, args.force)?;

    let written = decoder.write_payload(BufWriter::new(target)).with_context(|| {
        format!(
            "Failed to write recovered file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    info!("recovered {written} bytes");

    println!(
        "The file has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

fn ensure_bmp(path: &Path) -> Result<()> {
    let is_bmp = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
    let has_stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| !stem.is_empty() && !stem.starts_with('.'));

    anyhow::ensure!(
        is_bmp && has_stem,
        "Invalid image file: {}. \nThe file name must end with '.bmp'.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 输出会截断目标文件，因此它不能和仍在读取的输入是同一个文件。
fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }
    let same = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    };
    anyhow::ensure!(
        !same,
        "Output file is the input image: {}. \nChoose a different output path.",
        output.to_string_lossy().red().bold()
    );
    Ok(())
}

fn file_len(file: &File, path: &Path) -> Result<u64> {
    let metadata = file.metadata().with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(metadata.len())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn create_output(path: &Path, force: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options.open(path).with_context(|| {
        format!(
            "Unable to create output file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 与 `path` 位于同一目录下、名为 `name` 的路径。
fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent()
        .map(|dir| dir.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}
