use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::error::AppError;
use crate::domain::settings::AppSettings;
use crate::domain::types::{HistoryKind, HistoryRecord};

const RECORD_COLUMNS: &str =
    "id, title, data, is_favourite, is_scanned, created_at, last_updated_at";

/// SQLiteストレージ（QR履歴 + 設定）
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// 新規接続（ファイルパス指定）
    pub fn open(path: &str) -> Result<Self, AppError> {
        let conn = Connection::open(path)
            .map_err(|e| AppError::storage(format!("DB接続に失敗: {e}")))?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    /// in-memory DB（テスト用）
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::storage(format!("in-memory DB作成に失敗: {e}")))?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    /// スキーママイグレーション
    fn migrate(&self) -> Result<(), AppError> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS qr_history (
                    id              INTEGER PRIMARY KEY AUTOINCREMENT,
                    title           TEXT,
                    data            TEXT NOT NULL,
                    is_favourite    INTEGER NOT NULL DEFAULT 0,
                    is_scanned      INTEGER NOT NULL,
                    created_at      INTEGER NOT NULL,
                    last_updated_at INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_qr_history_scanned
                    ON qr_history(is_scanned, created_at DESC);

                CREATE TABLE IF NOT EXISTS settings (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );
                ",
            )
            .map_err(|e| AppError::storage(format!("マイグレーション失敗: {e}")))?;
        Ok(())
    }

    // --- History ---

    /// 新規レコードを挿入し、採番されたIDを返す（`record.id` は無視）
    pub fn insert_record(&self, record: &HistoryRecord) -> Result<i64, AppError> {
        self.conn
            .execute(
                "INSERT INTO qr_history (title, data, is_favourite, is_scanned, created_at, last_updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.custom_title,
                    record.raw_data,
                    record.is_favourite,
                    record.is_scanned,
                    record.created_at.timestamp_millis(),
                    record.last_updated_at.timestamp_millis(),
                ],
            )
            .map_err(|e| AppError::storage(format!("履歴挿入失敗: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// 指定タブの履歴（新しい順）
    pub fn list_records(&self, kind: HistoryKind) -> Result<Vec<HistoryRecord>, AppError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM qr_history
                 WHERE is_scanned = ?1
                 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| AppError::storage(format!("クエリ準備失敗: {e}")))?;

        let records = stmt
            .query_map(params![kind == HistoryKind::Scanned], Self::map_record_row)
            .map_err(|e| AppError::storage(format!("クエリ実行失敗: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::storage(format!("行読み取り失敗: {e}")))?;

        Ok(records)
    }

    pub fn list_all(&self) -> Result<Vec<HistoryRecord>, AppError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM qr_history ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| AppError::storage(format!("クエリ準備失敗: {e}")))?;

        let records = stmt
            .query_map([], Self::map_record_row)
            .map_err(|e| AppError::storage(format!("クエリ実行失敗: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::storage(format!("行読み取り失敗: {e}")))?;

        Ok(records)
    }

    pub fn get_record(&self, id: i64) -> Result<Option<HistoryRecord>, AppError> {
        self.conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM qr_history WHERE id = ?1"),
                params![id],
                Self::map_record_row,
            )
            .optional()
            .map_err(|e| AppError::storage(format!("履歴取得失敗: {e}")))
    }

    /// レコード全体を書き戻す（存在しなければ同じIDで挿入）
    pub fn update_record(&self, record: &HistoryRecord) -> Result<(), AppError> {
        self.conn
            .execute(
                "INSERT INTO qr_history (id, title, data, is_favourite, is_scanned, created_at, last_updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    data = excluded.data,
                    is_favourite = excluded.is_favourite,
                    is_scanned = excluded.is_scanned,
                    created_at = excluded.created_at,
                    last_updated_at = excluded.last_updated_at",
                params![
                    record.id,
                    record.custom_title,
                    record.raw_data,
                    record.is_favourite,
                    record.is_scanned,
                    record.created_at.timestamp_millis(),
                    record.last_updated_at.timestamp_millis(),
                ],
            )
            .map_err(|e| AppError::storage(format!("履歴更新失敗: {e}")))?;
        Ok(())
    }

    pub fn update_title(
        &self,
        id: i64,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let affected = self
            .conn
            .execute(
                "UPDATE qr_history SET title = ?1, last_updated_at = ?2 WHERE id = ?3",
                params![title, now.timestamp_millis(), id],
            )
            .map_err(|e| AppError::storage(format!("タイトル更新失敗: {e}")))?;
        Ok(affected > 0)
    }

    pub fn update_favourite(
        &self,
        id: i64,
        is_favourite: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let affected = self
            .conn
            .execute(
                "UPDATE qr_history SET is_favourite = ?1, last_updated_at = ?2 WHERE id = ?3",
                params![is_favourite, now.timestamp_millis(), id],
            )
            .map_err(|e| AppError::storage(format!("お気に入り更新失敗: {e}")))?;
        Ok(affected > 0)
    }

    pub fn delete_record(&self, id: i64) -> Result<bool, AppError> {
        let affected = self
            .conn
            .execute("DELETE FROM qr_history WHERE id = ?1", params![id])
            .map_err(|e| AppError::storage(format!("履歴削除失敗: {e}")))?;
        Ok(affected > 0)
    }

    fn map_record_row(row: &rusqlite::Row) -> rusqlite::Result<HistoryRecord> {
        Ok(HistoryRecord {
            id: row.get(0)?,
            custom_title: row.get(1)?,
            raw_data: row.get(2)?,
            is_favourite: row.get(3)?,
            is_scanned: row.get(4)?,
            created_at: from_millis(row.get(5)?),
            last_updated_at: from_millis(row.get(6)?),
        })
    }

    // --- Settings ---

    pub fn get_settings(&self) -> Result<AppSettings, AppError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings")
            .map_err(|e| AppError::storage(format!("クエリ準備失敗: {e}")))?;

        let rows: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| AppError::storage(format!("クエリ実行失敗: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::storage(format!("行読み取り失敗: {e}")))?;

        if rows.is_empty() {
            return Ok(AppSettings::default());
        }

        // key-value をJSONに組み立ててデシリアライズ
        let mut map = serde_json::Map::new();
        for (key, value) in rows {
            let value = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            map.insert(key, value);
        }

        // 欠けているキーは既定値、壊れていれば全体を既定値に戻す
        match serde_json::from_value::<AppSettings>(serde_json::Value::Object(map)) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!("設定の読み込みに失敗、既定値を使用: {e}");
                Ok(AppSettings::default())
            }
        }
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), AppError> {
        let json = serde_json::to_value(settings)
            .map_err(|e| AppError::internal(format!("settings serialize: {e}")))?;

        if let Some(obj) = json.as_object() {
            for (key, value) in obj {
                self.conn
                    .execute(
                        "INSERT INTO settings (key, value) VALUES (?1, ?2)
                         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                        params![key, value.to_string()],
                    )
                    .map_err(|e| AppError::storage(format!("設定保存失敗: {e}")))?;
            }
        }

        Ok(())
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
