// ==========================================
// 表格导入工具 - 插入 / 更新决策器
// ==========================================
// 规则: 按唯一字段等值合取查询存在性
//       存在 → UPDATE 整个实体（唯一键子集作 WHERE）
//       不存在 → INSERT 整个实体
// 约束: 每行恰好一次存在性查询 + 一次写入
// ==========================================

use crate::domain::import::{CandidateEntity, ImportCounters, UniqueKeySubset, UpsertOutcome};
use crate::importer::error::ImportResult;
use crate::repository::TableRepository;
use tracing::trace;

pub struct UpsertDecider<'a, R: TableRepository> {
    repo: &'a R,
    table: &'a str,
    unique_fields: &'a [String],
}

impl<'a, R: TableRepository> UpsertDecider<'a, R> {
    pub fn new(repo: &'a R, table: &'a str, unique_fields: &'a [String]) -> Self {
        Self {
            repo,
            table,
            unique_fields,
        }
    }

    /// 候选实体在唯一字段上的投影
    pub fn unique_subset(&self, entity: &CandidateEntity) -> UniqueKeySubset {
        entity
            .iter()
            .filter(|(field, _)| self.unique_fields.iter().any(|u| u == *field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    /// 决定插入或更新，并累加对应计数
    ///
    /// # 返回
    /// - Ok(UpsertOutcome): 本行结果
    /// - Err: 数据库错误（由调用方触发整个文件回滚）
    pub fn decide(
        &self,
        entity: &CandidateEntity,
        counters: &mut ImportCounters,
    ) -> ImportResult<UpsertOutcome> {
        let unique_data = self.unique_subset(entity);

        let outcome = if self.repo.exists(self.table, &unique_data)? {
            self.repo.update(self.table, entity, &unique_data)?;
            UpsertOutcome::Updated
        } else {
            self.repo.insert(self.table, entity)?;
            UpsertOutcome::Inserted
        };

        trace!(outcome = ?outcome, "行落库完成");
        counters.record(outcome);
        Ok(outcome)
    }
}
