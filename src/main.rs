//! # dvhtool - 放射治疗剂量体积分析工具
//!
//! 从三维剂量体和结构掩膜计算累积剂量体积直方图 (DVH)、
//! 剂量统计指标，并进行跨数据集比较和临床约束合规检查。
//!
//! ## 子命令
//! - `single`        - 单剂量 + 单套分割：DVH、汇总、合规检查
//! - `segmentations` - 单剂量 + 多套分割比较
//! - `doses`         - 多剂量计划 + 单套分割比较
//! - `constraints`   - 查看 / 导出默认约束表
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (NIfTI 与约束表解析)
//!   │     ├── batch/     (掩膜批量读取)
//!   │     ├── dvh/       (DVH 计算、统计、比较、合规)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod dvh;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
