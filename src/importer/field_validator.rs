// ==========================================
// 表格导入工具 - 必填字段校验器
// ==========================================
// 规则: 必填字段 = 唯一字段；存在且非空才通过
// 失败: 跳过整行（不修补），仅在 verbose 下输出诊断
// ==========================================

use crate::domain::import::CandidateEntity;
use tracing::debug;

pub struct RequiredFieldValidator<'a> {
    required_fields: &'a [String],
}

impl<'a> RequiredFieldValidator<'a> {
    pub fn new(required_fields: &'a [String]) -> Self {
        Self { required_fields }
    }

    /// 校验候选实体
    ///
    /// # 参数
    /// - row_index: 行号（表头为第 1 行）
    /// - entity: 候选实体
    ///
    /// # 返回
    /// - true: 全部必填字段存在且非空
    /// - false: 遇到第一个缺失字段即停止
    pub fn validate(&self, row_index: usize, entity: &CandidateEntity) -> bool {
        match self.first_missing(entity) {
            Some(field) => {
                debug!(
                    row = row_index,
                    field = %field,
                    entity = %entity_snapshot(entity),
                    "必填字段未设置，跳过该行"
                );
                false
            }
            None => true,
        }
    }

    /// 第一个缺失或为空的必填字段
    pub fn first_missing(&self, entity: &CandidateEntity) -> Option<&'a str> {
        self.required_fields
            .iter()
            .find(|field| {
                entity
                    .get(field.as_str())
                    .and_then(|v| v.as_deref())
                    .map_or(true, str::is_empty)
            })
            .map(String::as_str)
    }
}

/// 实体快照（诊断输出用）: 值以逗号连接
pub fn entity_snapshot(entity: &CandidateEntity) -> String {
    entity
        .values()
        .map(|v| v.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",")
}
