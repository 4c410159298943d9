// ==========================================
// 设备维护排程系统 - 批量导入对账引擎
// ==========================================
// 流程: 解析(整表读入) → 逐行映射 → 校验 → 新增/更新 → 汇总 → 批次审计
// 红线:
//   - 读取失败(流/文件/表头) → 整体中止,不落任何一行
//   - 单行失败只跳过该行,错误按行号顺序收集
//   - 序列号已存在 → 更新(保留 seq_no); 不存在 → 新增
//   - 同一批次内后出现的同序列号行覆盖先出现的行
//   - 状态一律由日期重新派生,导入值不采信
// ==========================================

use crate::domain::import::{ImportBatch, ImportSummary, RowOutcome};
use crate::domain::types::RecordType;
use crate::engine::equipment_service::EquipmentService;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::mapper_for;
use crate::importer::file_parser::{CsvParser, UniversalFileParser};
use crate::importer::importer_trait::{FieldMapper, FileParser, RawRow, RawTable};
use crate::repository::equipment_repo::EquipmentRepository;
use crate::repository::import_batch_repo::ImportBatchRepository;
use chrono::Utc;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// EquipmentImporter
// ==========================================
pub struct EquipmentImporter<R>
where
    R: EquipmentRepository,
{
    service: Arc<EquipmentService<R>>,
    batch_repo: Option<Arc<ImportBatchRepository>>,
}

impl<R> EquipmentImporter<R>
where
    R: EquipmentRepository,
{
    /// 创建导入器(不写批次审计)
    pub fn new(service: Arc<EquipmentService<R>>) -> Self {
        Self {
            service,
            batch_repo: None,
        }
    }

    /// 启用批次审计
    pub fn with_batch_repo(mut self, batch_repo: Arc<ImportBatchRepository>) -> Self {
        self.batch_repo = Some(batch_repo);
        self
    }

    /// 从 CSV 字节流导入
    ///
    /// # 参数
    /// - record_type: 导入目标类型
    /// - reader: CSV 数据流(第一行为表头)
    /// - source_name: 审计用来源名称
    ///
    /// # 返回
    /// - Ok(summary): 全部行已处理(可能部分成功)
    /// - Err: 流无法读取,未落任何一行
    #[instrument(skip_all, fields(record_type = %record_type))]
    pub fn import_reader<Rd: Read>(
        &self,
        record_type: RecordType,
        reader: Rd,
        source_name: Option<&str>,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let table = CsvParser.parse_reader(reader).map_err(|e| {
            error!(error = %e, "数据流读取失败，导入中止");
            e
        })?;
        Ok(self.reconcile(record_type, table, source_name, start_time))
    }

    /// 从文件导入(.csv / .xlsx / .xls)
    #[instrument(skip_all, fields(record_type = %record_type))]
    pub fn import_file<P: AsRef<Path>>(
        &self,
        record_type: RecordType,
        file_path: P,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let path = file_path.as_ref();
        let source_name = path.file_name().and_then(|n| n.to_str()).map(str::to_string);

        info!(file_path = %path.display(), "开始导入设备数据");
        let table = UniversalFileParser.parse_file(path).map_err(|e| {
            error!(error = %e, "文件解析失败，导入中止");
            e
        })?;
        Ok(self.reconcile(record_type, table, source_name.as_deref(), start_time))
    }

    // ==========================================
    // 对账主流程
    // ==========================================
    fn reconcile(
        &self,
        record_type: RecordType,
        table: RawTable,
        source_name: Option<&str>,
        start_time: Instant,
    ) -> ImportSummary {
        let batch_id = Uuid::new_v4().to_string();
        let mapper = mapper_for(record_type);
        let mut summary = ImportSummary::new(batch_id.clone());

        info!(
            batch_id = %batch_id,
            rows = table.rows.len(),
            columns = table.headers.len(),
            "解析完成，开始逐行对账"
        );

        for row in &table.rows {
            let outcome = self.process_row(mapper.as_ref(), row);
            if let RowOutcome::Failed { row_number, reason } = &outcome {
                warn!(row_number = *row_number, reason = %reason, "行导入失败，已跳过");
            }
            summary.record(&outcome);
        }

        summary.elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            total = summary.total_rows,
            added = summary.added_count,
            updated = summary.updated_count,
            skipped = summary.skipped_count,
            elapsed_ms = summary.elapsed_ms,
            "导入完成"
        );

        self.write_batch_log(record_type, source_name, &summary);
        summary
    }

    /// 处理单行: 存储层错误同样记为行级失败
    fn process_row(&self, mapper: &dyn FieldMapper, row: &RawRow) -> RowOutcome {
        let row_number = row.row_number;
        let cells = match &row.cells {
            Ok(cells) => cells,
            Err(reason) => {
                return RowOutcome::Failed {
                    row_number,
                    reason: reason.clone(),
                }
            }
        };

        let draft = mapper.map_row(cells);
        let record_type = mapper.record_type();

        let existing = match draft.serial() {
            Some(serial) => match self.service.get_entry(record_type, serial) {
                Ok(found) => found,
                Err(e) => {
                    return RowOutcome::Failed {
                        row_number,
                        reason: e.to_string(),
                    }
                }
            },
            None => None,
        };

        let result = match existing {
            Some(record) => {
                debug!(row_number, serial = %record.serial(), "序列号已存在，按更新处理");
                self.service
                    .update_entry(record_type, record.serial(), &draft)
                    .map(|record| RowOutcome::Updated { row_number, record })
            }
            None => self
                .service
                .add_entry(&draft)
                .map(|record| RowOutcome::Added { row_number, record }),
        };

        result.unwrap_or_else(|e| RowOutcome::Failed {
            row_number,
            reason: e.to_string(),
        })
    }

    /// 写入批次审计(失败只告警,不影响导入结果)
    fn write_batch_log(
        &self,
        record_type: RecordType,
        source_name: Option<&str>,
        summary: &ImportSummary,
    ) {
        let Some(batch_repo) = &self.batch_repo else {
            return;
        };

        let errors_json = match serde_json::to_string(&summary.errors) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "错误列表序列化失败");
                "[]".to_string()
            }
        };

        let batch = ImportBatch {
            batch_id: summary.batch_id.clone(),
            record_type,
            source_name: source_name.map(str::to_string),
            total_rows: summary.total_rows as i64,
            added_rows: summary.added_count as i64,
            updated_rows: summary.updated_count as i64,
            skipped_rows: summary.skipped_count as i64,
            errors_json,
            imported_at: Utc::now(),
            elapsed_ms: summary.elapsed_ms as i64,
        };

        if let Err(e) = batch_repo.insert(&batch) {
            warn!(batch_id = %batch.batch_id, error = %e, "批次审计写入失败");
        }
    }
}
