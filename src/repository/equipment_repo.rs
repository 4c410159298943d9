// ==========================================
// 设备维护排程系统 - 设备记录 Repository Trait
// ==========================================
// 职责: 定义设备记录数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
//       唯一性/顺序号/状态派生由 EquipmentService 负责
// ==========================================

use crate::domain::equipment::EquipmentRecord;
use crate::domain::types::RecordType;
use crate::repository::error::RepositoryResult;

// ==========================================
// EquipmentRepository Trait
// ==========================================
// 实现者: SqliteEquipmentRepository（使用 rusqlite）
pub trait EquipmentRepository: Send + Sync {
    // ===== 查询 =====

    /// 查询某类型全部记录（按 seq_no 升序）
    fn list(&self, record_type: RecordType) -> RepositoryResult<Vec<EquipmentRecord>>;

    /// 按序列号查询
    ///
    /// # 返回
    /// - Ok(Some(record)): 找到
    /// - Ok(None): 不存在
    fn find_by_serial(
        &self,
        record_type: RecordType,
        serial: &str,
    ) -> RepositoryResult<Option<EquipmentRecord>>;

    /// 当前最大顺序号（无记录时为 0）
    fn max_seq_no(&self, record_type: RecordType) -> RepositoryResult<i64>;

    // ===== 写入 =====

    /// 插入新记录
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): (record_type, serial) 已存在
    fn insert(&self, record: &EquipmentRecord) -> RepositoryResult<()>;

    /// 整体替换 serial 对应的记录（record 中的 serial 可与原 serial 不同）
    ///
    /// # 返回
    /// - Ok(true): 已替换
    /// - Ok(false): 原 serial 不存在
    fn replace(&self, serial: &str, record: &EquipmentRecord) -> RepositoryResult<bool>;

    /// 删除记录
    ///
    /// # 返回
    /// - Ok(true): 记录存在且已删除
    /// - Ok(false): 记录不存在
    fn delete(&self, record_type: RecordType, serial: &str) -> RepositoryResult<bool>;
}
