//! # 批量执行器
//!
//! 并行读取批量体数据文件。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，结果保持输入顺序
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/inputs.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{DvhError, Result};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult<T> {
    /// 处理成功
    Success(String, T), // (文件路径, 结果)
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

impl<T> ProcessResult<T> {
    /// 由 `Result` 构造，失败时记录文件路径
    pub fn from_result(path: &std::path::Path, result: Result<T>) -> Self {
        match result {
            Ok(value) => ProcessResult::Success(path.display().to_string(), value),
            Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
        }
    }
}

/// 批量处理结果
#[derive(Debug)]
pub struct BatchResult<T> {
    /// 成功结果，顺序与输入文件一致
    pub items: Vec<(String, T)>,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchResult<T> {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult<T>) {
        match result {
            ProcessResult::Success(path, value) => self.items.push((path, value)),
            ProcessResult::Failed(path, err) => self.failures.push((path, err)),
        }
    }

    pub fn success(&self) -> usize {
        self.items.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success() + self.failed()
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs = 0` 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行处理文件列表
    pub fn run<T, F>(&self, files: Vec<PathBuf>, message: &str, processor: F) -> Result<BatchResult<T>>
    where
        T: Send,
        F: Fn(&PathBuf) -> ProcessResult<T> + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, message);

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| DvhError::Other(format!("Failed to build thread pool: {}", e)))?;

        let results: Vec<ProcessResult<T>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        // 汇总结果
        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_preserves_order_and_collects_failures() {
        let files: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("f{:02}", i))).collect();
        let runner = BatchRunner::new(4);

        let result = runner
            .run(files, "Testing", |path| {
                let name = path.display().to_string();
                if name.ends_with('3') {
                    ProcessResult::Failed(name, "bad".to_string())
                } else {
                    ProcessResult::Success(name.clone(), name.len())
                }
            })
            .unwrap();

        assert_eq!(result.total(), 20);
        assert_eq!(result.failed(), 2);
        assert_eq!(result.failures[0].0, "f03");
        assert_eq!(result.failures[1].0, "f13");

        let names: Vec<&str> = result.items.iter().map(|(p, _)| p.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_zero_jobs_uses_all_cpus() {
        assert_eq!(BatchRunner::new(0).jobs, num_cpus::get());
        assert_eq!(BatchRunner::new(3).jobs, 3);
    }

    #[test]
    fn test_from_result() {
        let ok: ProcessResult<u8> = ProcessResult::from_result(std::path::Path::new("a"), Ok(1));
        assert!(matches!(ok, ProcessResult::Success(_, 1)));

        let err: ProcessResult<u8> = ProcessResult::from_result(
            std::path::Path::new("b"),
            Err(DvhError::Other("boom".to_string())),
        );
        assert!(matches!(err, ProcessResult::Failed(ref p, ref e) if p == "b" && e == "boom"));
    }
}
