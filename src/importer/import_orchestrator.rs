// ==========================================
// 表格导入工具 - 导入编排器
// ==========================================
// 流程（每个文件）:
// 1. BEGIN
// 2. 读取表头 → 列分配 → 表结构校验
// 3. 逐行: 拼接原始行 → 构建实体 → 必填校验 → 插入 / 更新
// 4. 全部成功 → COMMIT + 计数并入总计 + 转移到 success 目录
//    任一致命错误 → ROLLBACK + 转移到 error 目录，继续下一个文件
// ==========================================
// 约束: 单线程顺序执行；一个文件一个事务
// ==========================================

use crate::config::ImportOptions;
use crate::domain::import::{
    FileReport, FileState, ImportCounters, RawRow, RunSummary,
};
use crate::importer::column_resolver::{validate_against_schema, ColumnResolver};
use crate::importer::entity_builder::EntityBuilder;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_validator::{entity_snapshot, RequiredFieldValidator};
use crate::importer::file_router::FileRouter;
use crate::importer::importer_trait::{SheetRow, SpreadsheetReader};
use crate::importer::upsert_decider::UpsertDecider;
use crate::repository::TableRepository;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

/// 目录导入时匹配的扩展名
const DIRECTORY_EXTENSION: &str = "xlsx";

// ==========================================
// ImportOrchestrator
// ==========================================
pub struct ImportOrchestrator<R, P>
where
    R: TableRepository,
    P: SpreadsheetReader,
{
    repo: R,
    reader: P,
    options: ImportOptions,
    entity_builder: EntityBuilder,
    router: FileRouter,
}

/// 单个文件内的进度
#[derive(Debug, Default)]
struct FileProgress {
    counters: ImportCounters,
    skipped_rows: usize,
}

impl<R, P> ImportOrchestrator<R, P>
where
    R: TableRepository,
    P: SpreadsheetReader,
{
    /// 创建编排器
    ///
    /// # 返回
    /// - Err: 选项未通过校验（在读取任何文件之前）
    pub fn new(repo: R, reader: P, options: ImportOptions) -> ImportResult<Self> {
        options.validate()?;

        let entity_builder = EntityBuilder::new(
            options.defaults.clone(),
            options.value_mappings.clone(),
            options.trim,
        );
        let router = FileRouter::new(
            options.success_directory.clone(),
            options.error_directory.clone(),
        );

        Ok(Self {
            repo,
            reader,
            options,
            entity_builder,
            router,
        })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 导入单个文件或目录
    ///
    /// 总计只包含已提交文件的计数。数据路径不存在或目录无法列出时，
    /// 汇总中记录一个 Unreadable 报告，计数为零。
    pub fn run(&self, data_file: &Path) -> RunSummary {
        let mut summary = RunSummary::default();

        let files = match collect_data_files(data_file) {
            Ok(files) => files,
            Err(e) => {
                error!("Unable to read {}", data_file.display());
                error!("Error: {}", e);
                summary.files.push(unreadable_report(data_file, &e));
                return summary;
            }
        };
        info!(count = files.len(), path = %data_file.display(), "开始导入");

        for file in files {
            let report = self.import_file(&file);
            if report.is_committed() {
                summary.counters.merge(report.counters);
            }
            summary.files.push(report);
        }

        info!(
            updated = summary.counters.updated,
            created = summary.counters.created,
            committed_files = summary.committed_files(),
            failed_files = summary.failed_files(),
            "导入完成"
        );

        summary
    }

    /// 在独立事务中导入一个文件
    ///
    /// 失败不会向上传播，而是记录在返回的报告中。
    #[instrument(skip(self, path), fields(batch_id, file = %path.display()))]
    pub fn import_file(&self, path: &Path) -> FileReport {
        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());

        info!("Import file {}", path.display());

        let mut report = FileReport {
            batch_id,
            path: path.to_path_buf(),
            state: FileState::Processing,
            counters: ImportCounters::default(),
            skipped_rows: 0,
            error: None,
            routed_to: None,
        };

        let mut progress = FileProgress::default();
        let outcome = self.run_in_transaction(path, &mut progress);
        report.counters = progress.counters;
        report.skipped_rows = progress.skipped_rows;

        match outcome {
            Ok(()) => {
                report.state = FileState::Committed;
                info!(
                    created = report.counters.created,
                    updated = report.counters.updated,
                    skipped = report.skipped_rows,
                    "Successfully imported file {}",
                    path.display()
                );

                match self.router.route_success(path) {
                    Ok(target) => report.routed_to = target,
                    Err(e) => {
                        error!(error = %e, "文件已提交，但转移失败");
                        report.error = Some(e.to_string());
                    }
                }
            }
            Err(e) => {
                report.state = FileState::RolledBack;
                error!(
                    "Unable to import file {}. All rows were rolled back",
                    path.display()
                );
                error!("Error: {}", e);
                report.error = Some(e.to_string());

                match self.router.route_failure(path) {
                    Ok(target) => report.routed_to = target,
                    Err(route_err) => warn!(error = %route_err, "失败文件转移失败"),
                }
            }
        }

        report
    }

    /// BEGIN → 导入所有行 → COMMIT；任一步失败则 ROLLBACK
    fn run_in_transaction(&self, path: &Path, progress: &mut FileProgress) -> ImportResult<()> {
        self.repo.begin()?;

        let result = self
            .import_rows(path, progress)
            .and_then(|()| self.repo.commit().map_err(ImportError::from));

        if result.is_err() {
            if let Err(rollback_err) = self.repo.rollback() {
                warn!(error = %rollback_err, "回滚失败");
            }
        }

        result
    }

    fn import_rows(&self, path: &Path, progress: &mut FileProgress) -> ImportResult<()> {
        let table = self.options.table.as_str();

        // === 步骤 1: 表头与列分配 ===
        let header = self.reader.read_header(path)?;
        let assignment = ColumnResolver::new(&self.options.column_mappings).resolve(&header);
        debug!(columns = assignment.len(), "列分配完成");

        // === 步骤 2: 表结构校验 ===
        let table_columns = self.repo.list_columns(table)?;
        validate_against_schema(&assignment, table, &table_columns)?;

        // === 步骤 3: 逐行导入 ===
        let validator = RequiredFieldValidator::new(self.options.required_fields());
        let decider = UpsertDecider::new(&self.repo, table, &self.options.unique_fields);

        for row in self.reader.open_rows(path)?.skip(1) {
            let SheetRow { number, cells } = row?;
            let raw_row = zip_row(&header, cells);
            let entity = self.entity_builder.build(&raw_row, &assignment);

            if !validator.validate(number, &entity) {
                progress.skipped_rows += 1;
                continue;
            }

            debug!("Import row #{}: {}", number, entity_snapshot(&entity));
            decider.decide(&entity, &mut progress.counters)?;
        }

        Ok(())
    }
}

fn unreadable_report(path: &Path, err: &ImportError) -> FileReport {
    FileReport {
        batch_id: Uuid::new_v4().to_string(),
        path: path.to_path_buf(),
        state: FileState::Unreadable,
        counters: ImportCounters::default(),
        skipped_rows: 0,
        error: Some(err.to_string()),
        routed_to: None,
    }
}

/// 表头与数据行按位置拼接
///
/// 缺失的单元格不出现在结果中；超出表头宽度的单元格被忽略；
/// 重复表头时后出现的列覆盖先出现的列。
pub fn zip_row(header: &[String], cells: Vec<String>) -> RawRow {
    header.iter().cloned().zip(cells).collect()
}

/// 展开数据路径
///
/// - 文件: 原样返回
/// - 目录: 目录下所有 *.xlsx 文件（不递归，按目录列出顺序）
pub fn collect_data_files(data_file: &Path) -> ImportResult<Vec<PathBuf>> {
    if data_file.is_file() {
        return Ok(vec![data_file.to_path_buf()]);
    }

    if !data_file.is_dir() {
        return Err(ImportError::FileNotFound(data_file.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(data_file)? {
        let path = entry?.path();
        let is_xlsx = path.extension().and_then(|e| e.to_str()) == Some(DIRECTORY_EXTENSION);
        if path.is_file() && is_xlsx {
            files.push(path);
        }
    }

    Ok(files)
}
