// ==========================================
// 表格导入工具 - 实体构建器
// ==========================================
// 职责: 原始行 → 候选实体
// 顺序: 默认值 → 列分配 → 值替换 → TRIM（后一步覆盖前一步）
// ==========================================

use crate::domain::import::{
    CandidateEntity, ColumnAssignment, DefaultValue, RawRow, ValueMapping,
};
use chrono::{DateTime, Local};

pub struct EntityBuilder {
    defaults: Vec<DefaultValue>,
    value_mappings: Vec<ValueMapping>,
    trim: bool,
}

impl EntityBuilder {
    pub fn new(defaults: Vec<DefaultValue>, value_mappings: Vec<ValueMapping>, trim: bool) -> Self {
        Self {
            defaults,
            value_mappings,
            trim,
        }
    }

    /// 以当前时间构建候选实体
    pub fn build(&self, row: &RawRow, assignment: &ColumnAssignment) -> CandidateEntity {
        self.build_at(row, assignment, Local::now())
    }

    /// 以指定时间构建候选实体（动态默认值按 `now` 求值）
    ///
    /// 不会失败：行中缺失的源列得到 None，留给必填校验处理。
    pub fn build_at(
        &self,
        row: &RawRow,
        assignment: &ColumnAssignment,
        now: DateTime<Local>,
    ) -> CandidateEntity {
        let mut entity = self.default_entity(now);

        for (db_column, source_column) in assignment.iter() {
            entity.insert(db_column.to_string(), row.get(source_column).cloned());
        }

        self.apply_value_mappings(&mut entity);

        if self.trim {
            trim_values(&mut entity);
        }

        entity
    }

    /// 默认实体（动态默认值在此刻求值）
    fn default_entity(&self, now: DateTime<Local>) -> CandidateEntity {
        self.defaults
            .iter()
            .map(|default| (default.field.clone(), Some(default.source.resolve(now))))
            .collect()
    }

    /// 值替换: 当前值与源值完全相等时替换为目标值
    ///
    /// 规则按配置顺序逐条独立匹配。
    fn apply_value_mappings(&self, entity: &mut CandidateEntity) {
        for mapping in &self.value_mappings {
            if let Some(value) = entity.get_mut(&mapping.field) {
                if value.as_deref() == Some(mapping.source.as_str()) {
                    *value = Some(mapping.target.clone());
                }
            }
        }
    }
}

fn trim_values(entity: &mut CandidateEntity) {
    for value in entity.values_mut().flatten() {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            *value = trimmed.to_string();
        }
    }
}
