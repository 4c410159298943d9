// ==========================================
// 设备维护排程系统 - 设备记录 Repository 实现
// ==========================================
// 存储: equipment 表
//   公共字段 → 独立列
//   类型专属字段(PPM 检查点 / OCM 维护信息) → detail_json
// 主键: (record_type, serial)
// ==========================================

use crate::domain::equipment::{
    Checkpoint, EquipmentBase, EquipmentRecord, OcmRecord, PpmRecord,
};
use crate::domain::types::{MaintenanceStatus, RecordType};
use crate::repository::equipment_repo::EquipmentRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const DB_DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = r#"
    record_type, serial, seq_no, equipment, name, model, manufacturer,
    department, log_number, installation_date, warranty_end, status, detail_json
"#;

// ===== detail_json 载荷 =====
#[derive(Debug, Serialize, Deserialize)]
struct PpmDetail {
    checkpoints: [Checkpoint; 4],
}

#[derive(Debug, Serialize, Deserialize)]
struct OcmDetail {
    service_date: Option<NaiveDate>,
    next_maintenance: NaiveDate,
    engineer: String,
    linked_ppm: Option<String>,
}

// ===== 原始行(先取出,再在闭包外做类型转换) =====
struct EquipmentRow {
    record_type: String,
    serial: String,
    seq_no: i64,
    equipment: String,
    name: Option<String>,
    model: String,
    manufacturer: String,
    department: String,
    log_number: String,
    installation_date: Option<String>,
    warranty_end: Option<String>,
    status: String,
    detail_json: String,
}

impl EquipmentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            record_type: row.get(0)?,
            serial: row.get(1)?,
            seq_no: row.get(2)?,
            equipment: row.get(3)?,
            name: row.get(4)?,
            model: row.get(5)?,
            manufacturer: row.get(6)?,
            department: row.get(7)?,
            log_number: row.get(8)?,
            installation_date: row.get(9)?,
            warranty_end: row.get(10)?,
            status: row.get(11)?,
            detail_json: row.get(12)?,
        })
    }

    fn into_record(self) -> RepositoryResult<EquipmentRecord> {
        let record_type: RecordType = self.record_type.parse().map_err(|msg| {
            RepositoryError::FieldValueError {
                field: "record_type".to_string(),
                message: msg,
            }
        })?;
        let status: MaintenanceStatus =
            self.status
                .parse()
                .map_err(|msg| RepositoryError::FieldValueError {
                    field: "status".to_string(),
                    message: msg,
                })?;

        let base = EquipmentBase {
            seq_no: self.seq_no,
            serial: self.serial,
            equipment: self.equipment,
            name: self.name,
            model: self.model,
            manufacturer: self.manufacturer,
            department: self.department,
            log_number: self.log_number,
            installation_date: parse_db_date("installation_date", self.installation_date)?,
            warranty_end: parse_db_date("warranty_end", self.warranty_end)?,
            status,
        };

        let record = match record_type {
            RecordType::Ppm => {
                let detail: PpmDetail = serde_json::from_str(&self.detail_json)?;
                EquipmentRecord::Ppm(PpmRecord {
                    base,
                    checkpoints: detail.checkpoints,
                })
            }
            RecordType::Ocm => {
                let detail: OcmDetail = serde_json::from_str(&self.detail_json)?;
                EquipmentRecord::Ocm(OcmRecord {
                    base,
                    service_date: detail.service_date,
                    next_maintenance: detail.next_maintenance,
                    engineer: detail.engineer,
                    linked_ppm: detail.linked_ppm,
                })
            }
        };
        Ok(record)
    }
}

fn parse_db_date(field: &str, value: Option<String>) -> RepositoryResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, DB_DATE_FORMAT)
            .map(Some)
            .map_err(|e| RepositoryError::FieldValueError {
                field: field.to_string(),
                message: format!("{} ({})", e, s),
            }),
    }
}

fn detail_json(record: &EquipmentRecord) -> RepositoryResult<String> {
    let json = match record {
        EquipmentRecord::Ppm(ppm) => serde_json::to_string(&PpmDetail {
            checkpoints: ppm.checkpoints.clone(),
        })?,
        EquipmentRecord::Ocm(ocm) => serde_json::to_string(&OcmDetail {
            service_date: ocm.service_date,
            next_maintenance: ocm.next_maintenance,
            engineer: ocm.engineer.clone(),
            linked_ppm: ocm.linked_ppm.clone(),
        })?,
    };
    Ok(json)
}

fn format_db_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DB_DATE_FORMAT).to_string())
}

// ==========================================
// SqliteEquipmentRepository
// ==========================================
pub struct SqliteEquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEquipmentRepository {
    /// 创建新的仓储实例（自动建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl EquipmentRepository for SqliteEquipmentRepository {
    fn list(&self, record_type: RecordType) -> RepositoryResult<Vec<EquipmentRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM equipment WHERE record_type = ?1 ORDER BY seq_no ASC, serial ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![record_type.as_str()], EquipmentRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(EquipmentRow::into_record).collect()
    }

    fn find_by_serial(
        &self,
        record_type: RecordType,
        serial: &str,
    ) -> RepositoryResult<Option<EquipmentRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM equipment WHERE record_type = ?1 AND serial = ?2",
            SELECT_COLUMNS
        );
        let row = conn
            .query_row(&sql, params![record_type.as_str(), serial], EquipmentRow::from_row)
            .optional()?;

        row.map(EquipmentRow::into_record).transpose()
    }

    fn max_seq_no(&self, record_type: RecordType) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let max: Option<i64> = conn.query_row(
            "SELECT MAX(seq_no) FROM equipment WHERE record_type = ?1",
            params![record_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    fn insert(&self, record: &EquipmentRecord) -> RepositoryResult<()> {
        let detail = detail_json(record)?;
        let base = record.base();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO equipment (
                record_type, serial, seq_no, equipment, name, model, manufacturer,
                department, log_number, installation_date, warranty_end, status, detail_json,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, datetime('now'))
            "#,
            params![
                record.record_type().as_str(),
                base.serial,
                base.seq_no,
                base.equipment,
                base.name,
                base.model,
                base.manufacturer,
                base.department,
                base.log_number,
                format_db_date(base.installation_date),
                format_db_date(base.warranty_end),
                base.status.to_string(),
                detail,
            ],
        )?;
        Ok(())
    }

    fn replace(&self, serial: &str, record: &EquipmentRecord) -> RepositoryResult<bool> {
        let detail = detail_json(record)?;
        let base = record.base();
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE equipment SET
                serial = ?3, seq_no = ?4, equipment = ?5, name = ?6, model = ?7,
                manufacturer = ?8, department = ?9, log_number = ?10,
                installation_date = ?11, warranty_end = ?12, status = ?13,
                detail_json = ?14, updated_at = datetime('now')
            WHERE record_type = ?1 AND serial = ?2
            "#,
            params![
                record.record_type().as_str(),
                serial,
                base.serial,
                base.seq_no,
                base.equipment,
                base.name,
                base.model,
                base.manufacturer,
                base.department,
                base.log_number,
                format_db_date(base.installation_date),
                format_db_date(base.warranty_end),
                base.status.to_string(),
                detail,
            ],
        )?;
        Ok(affected > 0)
    }

    fn delete(&self, record_type: RecordType, serial: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM equipment WHERE record_type = ?1 AND serial = ?2",
            params![record_type.as_str(), serial],
        )?;
        Ok(affected > 0)
    }
}
