//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于把任意文件藏进 24 位 BMP 图像的像素数据中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于把任意文件藏进 24 位 BMP 图像的像素数据中，并在之后原样取回。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v: info, -vv: debug, -vvv: trace)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏) 和 decode (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 把秘密文件隐藏到 BMP 图像中。
    Encode(EncodeArgs),

    /// 从经过隐写的 BMP 图像中恢复秘密文件。
    Decode(DecodeArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用作载体的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径。其扩展名会一并被隐藏。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 隐写结果的输出路径 (必须以 .bmp 结尾)。默认为源图像所在目录下的 `stego.bmp`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 已隐藏文件的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文件的基础名，恢复出的扩展名会被追加在后面。
    /// 默认为图像所在目录下的 `decoded_output`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}
