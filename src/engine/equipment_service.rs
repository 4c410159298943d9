// ==========================================
// 设备维护排程系统 - 设备记录服务(身份与唯一性守卫)
// ==========================================
// 职责: 创建/更新/删除/批量删除/状态刷新/到期选择
// 红线:
//   - 创建: 同类型下 serial 已存在 → DuplicateKey
//   - 更新: serial 不存在 → NotFound; seq_no 原样保留
//   - 删除: 不存在返回 false,不报错
//   - 状态: 未显式固定时一律由 StatusEngine 重新派生
// 顺序号: 创建时 max(seq_no) + 1,删除后不重排
// ==========================================

use crate::domain::equipment::{EquipmentDraft, EquipmentRecord};
use crate::domain::import::{BulkDeleteSummary, DueItem};
use crate::domain::settings::ReminderTiming;
use crate::domain::types::{MaintenanceStatus, RecordType};
use crate::engine::error::{EquipmentError, EquipmentResult};
use crate::engine::status::StatusEngine;
use crate::engine::validation::EquipmentValidator;
use crate::repository::equipment_repo::EquipmentRepository;
use crate::repository::error::RepositoryError;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// EquipmentService
// ==========================================
pub struct EquipmentService<R>
where
    R: EquipmentRepository,
{
    repo: Arc<R>,
    fixed_today: Option<NaiveDate>,
}

impl<R> EquipmentService<R>
where
    R: EquipmentRepository,
{
    /// 创建服务实例（状态派生基准日为本地当天）
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            fixed_today: None,
        }
    }

    /// 固定状态派生基准日(测试/回放使用)
    pub fn with_fixed_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// 状态派生基准日
    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 查询某类型全部记录（按 seq_no 升序）
    pub fn get_all_entries(&self, record_type: RecordType) -> EquipmentResult<Vec<EquipmentRecord>> {
        Ok(self.repo.list(record_type)?)
    }

    /// 按序列号查询
    pub fn get_entry(
        &self,
        record_type: RecordType,
        serial: &str,
    ) -> EquipmentResult<Option<EquipmentRecord>> {
        Ok(self.repo.find_by_serial(record_type, serial.trim())?)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 创建记录
    ///
    /// # 返回
    /// - Ok(record): 已分配 seq_no 并派生状态的记录
    /// - Err(Validation / DuplicateKey / Repository)
    pub fn add_entry(&self, draft: &EquipmentDraft) -> EquipmentResult<EquipmentRecord> {
        let record_type = draft.record_type();
        let today = self.today();

        // 先做无副作用的字段校验,seq_no 稍后分配
        let mut record = EquipmentValidator::build(draft, 0, today)?;
        let serial = record.serial().to_string();

        if self.repo.find_by_serial(record_type, &serial)?.is_some() {
            warn!(record_type = %record_type, serial = %serial, "创建失败: 序列号已存在");
            return Err(EquipmentError::DuplicateKey {
                record_type,
                serial,
            });
        }

        let seq_no = self.repo.max_seq_no(record_type)? + 1;
        record.base_mut().seq_no = seq_no;
        Self::apply_pinned_status(&mut record, draft);

        self.repo.insert(&record).map_err(|e| match e {
            RepositoryError::UniqueConstraintViolation(_) => EquipmentError::DuplicateKey {
                record_type,
                serial: serial.clone(),
            },
            other => other.into(),
        })?;

        info!(
            record_type = %record_type,
            serial = %serial,
            seq_no = seq_no,
            status = %record.status(),
            "设备记录已创建"
        );
        Ok(record)
    }

    /// 更新记录（整体替换,seq_no 保留）
    ///
    /// # 参数
    /// - record_type: 记录类型(须与草稿类型一致)
    /// - serial: 被更新记录的当前序列号
    /// - draft: 新内容(可修改 serial,但不可与同类型其他记录冲突)
    pub fn update_entry(
        &self,
        record_type: RecordType,
        serial: &str,
        draft: &EquipmentDraft,
    ) -> EquipmentResult<EquipmentRecord> {
        let serial = serial.trim();
        if draft.record_type() != record_type {
            return Err(EquipmentError::validation(
                "record_type",
                format!("记录类型不一致: 期望 {}，实际 {}", record_type, draft.record_type()),
            ));
        }

        let existing = self
            .repo
            .find_by_serial(record_type, serial)?
            .ok_or_else(|| EquipmentError::NotFound {
                record_type,
                serial: serial.to_string(),
            })?;

        let mut record = EquipmentValidator::build(draft, existing.seq_no(), self.today())?;
        Self::apply_pinned_status(&mut record, draft);

        let new_serial = record.serial().to_string();
        if new_serial != serial && self.repo.find_by_serial(record_type, &new_serial)?.is_some() {
            warn!(record_type = %record_type, from = %serial, to = %new_serial, "更新失败: 新序列号已被占用");
            return Err(EquipmentError::DuplicateKey {
                record_type,
                serial: new_serial,
            });
        }

        let replaced = self.repo.replace(serial, &record).map_err(|e| match e {
            RepositoryError::UniqueConstraintViolation(_) => EquipmentError::DuplicateKey {
                record_type,
                serial: new_serial.clone(),
            },
            other => other.into(),
        })?;
        if !replaced {
            return Err(EquipmentError::NotFound {
                record_type,
                serial: serial.to_string(),
            });
        }

        info!(
            record_type = %record_type,
            serial = %new_serial,
            seq_no = record.seq_no(),
            status = %record.status(),
            "设备记录已更新"
        );
        Ok(record)
    }

    /// 删除记录
    ///
    /// # 返回
    /// - Ok(true): 记录存在且已删除
    /// - Ok(false): 记录不存在
    pub fn delete_entry(&self, record_type: RecordType, serial: &str) -> EquipmentResult<bool> {
        let deleted = self.repo.delete(record_type, serial.trim())?;
        if deleted {
            info!(record_type = %record_type, serial = %serial, "设备记录已删除");
        } else {
            debug!(record_type = %record_type, serial = %serial, "删除: 记录不存在");
        }
        Ok(deleted)
    }

    /// 批量删除（非事务,逐个执行）
    ///
    /// 存储失败时立即返回错误,此前已删除的记录不回滚
    pub fn bulk_delete(
        &self,
        record_type: RecordType,
        serials: &[String],
    ) -> EquipmentResult<BulkDeleteSummary> {
        let mut summary = BulkDeleteSummary::default();
        for serial in serials {
            if self.delete_entry(record_type, serial)? {
                summary.deleted_count += 1;
            } else {
                summary.not_found += 1;
                summary.not_found_serials.push(serial.clone());
            }
        }

        info!(
            record_type = %record_type,
            deleted = summary.deleted_count,
            not_found = summary.not_found,
            "批量删除完成"
        );
        Ok(summary)
    }

    // ==========================================
    // 状态刷新 / 到期选择
    // ==========================================

    /// 重新派生某类型全部记录的状态,仅写回发生变化的记录
    ///
    /// # 返回
    /// - 状态发生变化的记录数
    pub fn refresh_statuses(&self, record_type: RecordType) -> EquipmentResult<usize> {
        let today = self.today();
        let mut changed = 0usize;

        for mut record in self.repo.list(record_type)? {
            let derived = StatusEngine::derive(&record, today);
            if derived == record.status() {
                continue;
            }

            debug!(
                serial = %record.serial(),
                from = %record.status(),
                to = %derived,
                "状态变化"
            );
            record.base_mut().status = derived;
            let serial = record.serial().to_string();
            if self.repo.replace(&serial, &record)? {
                changed += 1;
            }
        }

        info!(record_type = %record_type, changed = changed, "状态刷新完成");
        Ok(changed)
    }

    /// 到期天数落在 [min_days, max_days] 内的维护项
    ///
    /// PPM 按未完成检查点逐项列出; OCM 已完成(Maintained)的记录不列出
    pub fn due_within(
        &self,
        record_type: RecordType,
        min_days: i64,
        max_days: i64,
    ) -> EquipmentResult<Vec<DueItem>> {
        let today = self.today();
        let mut items = Vec::new();

        for record in self.repo.list(record_type)? {
            match &record {
                EquipmentRecord::Ppm(ppm) => {
                    for cp in ppm.checkpoints.iter().filter(|cp| !cp.is_satisfied()) {
                        items.push(DueItem {
                            record_type,
                            serial: ppm.base.serial.clone(),
                            equipment: ppm.base.equipment.clone(),
                            department: ppm.base.department.clone(),
                            quarter: Some(cp.quarter),
                            due_date: cp.target_date,
                            engineer: cp.engineer.clone(),
                            days_until_due: StatusEngine::days_until(cp.target_date, today),
                            window: None,
                        });
                    }
                }
                EquipmentRecord::Ocm(ocm) => {
                    if StatusEngine::ocm_status(ocm, today) == MaintenanceStatus::Maintained {
                        continue;
                    }
                    items.push(DueItem {
                        record_type,
                        serial: ocm.base.serial.clone(),
                        equipment: ocm.base.equipment.clone(),
                        department: ocm.base.department.clone(),
                        quarter: None,
                        due_date: ocm.next_maintenance,
                        engineer: Some(ocm.engineer.clone()),
                        days_until_due: StatusEngine::days_until(ocm.next_maintenance, today),
                        window: None,
                    });
                }
            }
        }

        items.retain(|item| item.days_until_due >= min_days && item.days_until_due <= max_days);
        items.sort_by(|a, b| {
            a.days_until_due
                .cmp(&b.days_until_due)
                .then_with(|| a.serial.cmp(&b.serial))
        });
        Ok(items)
    }

    /// 落入已启用提醒窗口(60/14/1 天)的维护项,附带最紧的窗口
    pub fn due_reminders(
        &self,
        record_type: RecordType,
        timing: &ReminderTiming,
    ) -> EquipmentResult<Vec<DueItem>> {
        let mut items = self.due_within(record_type, 0, i64::MAX)?;
        items.retain_mut(|item| {
            item.window = StatusEngine::reminder_window(item.days_until_due, timing);
            item.window.is_some()
        });
        Ok(items)
    }

    fn apply_pinned_status(record: &mut EquipmentRecord, draft: &EquipmentDraft) {
        if let Some(status) = draft.pinned_status {
            record.base_mut().status = status;
        }
    }
}
