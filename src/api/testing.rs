//! An in-memory backend that behaves like the real one and remembers every request.

use crate::{
    api::{DirectoryBackend, EntityBackend},
    data::{Directory, Entity, EntityKind, NamedRow},
    error::{AcademiaResult, DecodeSnafu, UnexpectedStatusSnafu},
};
use async_trait::async_trait;
use serde_json::Value;
use snafu::ResultExt;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicI64, Ordering},
    },
};

#[derive(Debug)]
pub struct MockBackend {
    tables: Mutex<HashMap<EntityKind, Vec<Value>>>,
    failing: Mutex<HashSet<EntityKind>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicI64,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            tables: Mutex::default(),
            failing: Mutex::default(),
            calls: Mutex::default(),
            next_id: AtomicI64::new(100),
        }
    }

    pub fn with_rows(self, kind: EntityKind, rows: Vec<Value>) -> Self {
        self.tables.lock().unwrap().insert(kind, rows);
        self
    }

    ///every following request to that collection gets a 500
    pub fn fail(&self, kind: EntityKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn recover(&self, kind: EntityKind) {
        self.failing.lock().unwrap().remove(&kind);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rows(&self, kind: EntityKind) -> Vec<Value> {
        self.tables.lock().unwrap().get(&kind).cloned().unwrap_or_default()
    }

    fn record(&self, kind: EntityKind, call: String) -> AcademiaResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&kind) {
            return UnexpectedStatusSnafu {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Falha ao acessar {}", kind.plural()),
            }
            .fail();
        }
        Ok(())
    }

    fn not_found<T>(kind: EntityKind) -> AcademiaResult<T> {
        UnexpectedStatusSnafu {
            status: reqwest::StatusCode::NOT_FOUND,
            message: format!("{} não encontrado", kind.singular()),
        }
        .fail()
    }

    fn write_row<E: Entity>(&self, id: i64, draft: &E::Draft) -> AcademiaResult<E> {
        let mut row = serde_json::to_value(draft).expect("drafts serialise to objects");
        row["id"] = Value::from(id);
        let record = serde_json::from_value(row.clone()).context(DecodeSnafu { kind: E::KIND })?;

        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(E::KIND).or_default();
        match table.iter_mut().find(|existing| existing["id"] == id) {
            Some(existing) => *existing = row,
            None => table.push(row),
        }
        Ok(record)
    }
}

#[async_trait]
impl<E: Entity> EntityBackend<E> for MockBackend {
    async fn list(&self) -> AcademiaResult<Vec<E>> {
        self.record(E::KIND, format!("GET /{}", E::KIND.path()))?;
        self.rows(E::KIND)
            .into_iter()
            .map(|row| serde_json::from_value(row).context(DecodeSnafu { kind: E::KIND }))
            .collect()
    }

    async fn create(&self, draft: &E::Draft) -> AcademiaResult<E> {
        self.record(E::KIND, format!("POST /{}", E::KIND.path()))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.write_row(id, draft)
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> AcademiaResult<E> {
        self.record(E::KIND, format!("PUT /{}/{id}", E::KIND.path()))?;
        if !self.rows(E::KIND).iter().any(|row| row["id"] == id) {
            return Self::not_found(E::KIND);
        }
        self.write_row(id, draft)
    }

    async fn delete(&self, id: i64) -> AcademiaResult<()> {
        self.record(E::KIND, format!("DELETE /{}/{id}", E::KIND.path()))?;
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(E::KIND).or_default();
        let before = table.len();
        table.retain(|row| row["id"] != id);
        if table.len() == before {
            return Self::not_found(E::KIND);
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryBackend for MockBackend {
    async fn directory(&self, kind: EntityKind) -> AcademiaResult<Directory> {
        self.record(kind, format!("GET /{}", kind.path()))?;
        self.rows(kind)
            .into_iter()
            .map(|row| {
                serde_json::from_value::<NamedRow>(row)
                    .map(|row| (row.id, row.nome))
                    .context(DecodeSnafu { kind })
            })
            .collect()
    }
}
