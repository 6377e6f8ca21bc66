//! SQLite-backed person store.

use crate::domain::model::{NewPerson, Person};
use crate::domain::ports::PersonStore;
use crate::utils::error::{BatchError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Initialize the person table
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
        [],
    )?;
    Ok(())
}

pub struct SqlitePersonStore {
    db: Arc<Mutex<Connection>>,
}

impl SqlitePersonStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| {
            BatchError::store(format!(
                "Failed to open database {}: {}",
                db_path.display(),
                e
            ))
        })?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|e| BatchError::store(format!("Failed to acquire database lock: {}", e)))
    }
}

#[async_trait]
impl PersonStore for SqlitePersonStore {
    async fn save_all(&self, people: &[NewPerson]) -> Result<Vec<Person>> {
        let mut conn = self.lock()?;
        // tx 未 commit 即 drop 時自動回滾
        let tx = conn.transaction()?;

        let mut saved = Vec::with_capacity(people.len());
        {
            let mut stmt = tx.prepare_cached("INSERT INTO person (name) VALUES (?1)")?;
            for person in people {
                stmt.execute(params![person.name])?;
                saved.push(Person {
                    id: tx.last_insert_rowid(),
                    name: person.name.clone(),
                });
            }
        }

        tx.commit()?;
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Person>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name FROM person ORDER BY id")?;
        let people = stmt
            .query_map([], |row| {
                Ok(Person {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(people)
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM person", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
