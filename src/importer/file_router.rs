// ==========================================
// 表格导入工具 - 文件转移
// ==========================================
// 成功 → success 目录；失败 → error 目录
// 未配置目录时文件原地保留
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct FileRouter {
    success_directory: Option<PathBuf>,
    error_directory: Option<PathBuf>,
}

impl FileRouter {
    pub fn new(success_directory: Option<PathBuf>, error_directory: Option<PathBuf>) -> Self {
        Self {
            success_directory,
            error_directory,
        }
    }

    /// 导入成功后的转移
    ///
    /// # 返回
    /// - Ok(Some(path)): 新位置
    /// - Ok(None): 未配置 success 目录，文件原地保留
    pub fn route_success(&self, file: &Path) -> ImportResult<Option<PathBuf>> {
        route_into(self.success_directory.as_deref(), file)
    }

    /// 导入失败后的转移
    pub fn route_failure(&self, file: &Path) -> ImportResult<Option<PathBuf>> {
        route_into(self.error_directory.as_deref(), file)
    }
}

fn route_into(directory: Option<&Path>, file: &Path) -> ImportResult<Option<PathBuf>> {
    let Some(directory) = directory else {
        return Ok(None);
    };

    ensure_directory_exists(directory)?;

    let file_name = file
        .file_name()
        .ok_or_else(|| ImportError::FileNotFound(file.display().to_string()))?;
    let target = directory.join(file_name);

    move_file(file, &target)?;
    info!(from = %file.display(), to = %target.display(), "文件已转移");

    Ok(Some(target))
}

/// 确保目录存在且可写，不存在则创建
///
/// 可写性通过在目录中实际创建一个临时文件来检测（按当前进程的权限）。
pub fn ensure_directory_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    if !path.is_dir() {
        return Err(ImportError::DirectoryNotWritable(path.display().to_string()));
    }

    tempfile::tempfile_in(path).map_err(|e| {
        warn!(dir = %path.display(), error = %e, "目录写入检测失败");
        ImportError::DirectoryNotWritable(path.display().to_string())
    })?;

    Ok(())
}

/// 移动文件（跨设备时退化为复制 + 删除）
fn move_file(from: &Path, to: &Path) -> ImportResult<()> {
    let move_error = |e: std::io::Error| ImportError::FileMoveError {
        from: from.display().to_string(),
        to: to.display().to_string(),
        message: e.to_string(),
    };

    if let Err(e) = fs::rename(from, to) {
        warn!(error = %e, "rename 失败，改用复制 + 删除");
        fs::copy(from, to).map_err(move_error)?;
        fs::remove_file(from).map_err(move_error)?;
    }

    Ok(())
}
