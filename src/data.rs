use crate::{api::Backend, error::AcademiaResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;

pub mod instructor;
pub mod payment;
pub mod student;
pub mod wire;
pub mod workout;

#[derive(Deserialize)]
pub struct IdForm {
    pub id: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Students,
    Instructors,
    Payments,
    Workouts,
}

impl EntityKind {
    pub const ALL: [Self; 4] = [
        Self::Students,
        Self::Instructors,
        Self::Payments,
        Self::Workouts,
    ];

    ///the backend collection, also used for our own routes
    pub const fn path(self) -> &'static str {
        match self {
            Self::Students => "alunos",
            Self::Instructors => "instrutores",
            Self::Payments => "pagamentos",
            Self::Workouts => "treinos",
        }
    }

    pub const fn singular(self) -> &'static str {
        match self {
            Self::Students => "aluno",
            Self::Instructors => "instrutor",
            Self::Payments => "pagamento",
            Self::Workouts => "treino",
        }
    }

    pub const fn plural(self) -> &'static str {
        self.path()
    }

    pub const fn singular_title(self) -> &'static str {
        match self {
            Self::Students => "Aluno",
            Self::Instructors => "Instrutor",
            Self::Payments => "Pagamento",
            Self::Workouts => "Treino",
        }
    }

    pub const fn plural_title(self) -> &'static str {
        match self {
            Self::Students => "Alunos",
            Self::Instructors => "Instrutores",
            Self::Payments => "Pagamentos",
            Self::Workouts => "Treinos",
        }
    }

    pub fn sse_event_name(self) -> String {
        format!("crud_{}", self.path())
    }
}

/// A record type that lives in one backend collection.
///
/// `Form` holds the raw field strings a user is editing, `Draft` is the
/// validated body we send on create/update, and `Lookups` is whatever
/// related data the list and form need to render (student names for
/// payments, for example).
#[async_trait]
pub trait Entity: Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: Debug + Clone + Serialize + Send + Sync;
    type Form: Debug + Clone + Default + DeserializeOwned + Send + Sync;
    type Lookups: Debug + Default + Send + Sync;

    const KIND: EntityKind;

    fn id(&self) -> i64;

    fn to_form(&self) -> Self::Form;

    fn blank_form(lookups: &Self::Lookups) -> Self::Form;

    ///on failure, every problem found, in field order
    fn validate(form: &Self::Form, lookups: &Self::Lookups) -> Result<Self::Draft, Vec<String>>;

    ///used when the backend acknowledges a write without echoing the record
    fn from_draft(id: i64, draft: Self::Draft) -> Self;

    fn reconcile(&mut self, _lookups: &Self::Lookups) {}

    ///the update that deactivates this record instead of deleting it, if the entity has such a thing
    fn deactivated(&self) -> Option<Self::Draft> {
        None
    }

    fn matches_filter(&self, _needle: &str) -> bool {
        true
    }

    async fn load_lookups<B: Backend + ?Sized>(backend: &B) -> AcademiaResult<Self::Lookups>;
}

/// Id → display name, in backend order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Directory(Vec<(i64, String)>);

impl Directory {
    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.name_of(id).is_some()
    }

    pub fn first_id(&self) -> Option<i64> {
        self.0.first().map(|(id, _)| *id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (i64, &str)> {
        self.0.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, String)> for Directory {
    fn from_iter<T: IntoIterator<Item = (i64, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The two columns we need from any person-like collection. The backends
/// disagree on naming, hence the aliases.
#[derive(Deserialize, Debug)]
pub struct NamedRow {
    #[serde(alias = "id_aluno", alias = "id_instrutor")]
    pub id: i64,
    #[serde(alias = "nome_completo")]
    pub nome: String,
}

pub fn blank_to_none(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_lookups() {
        let directory: Directory = [(1, "João da Silva".to_string()), (2, "Maria".to_string())]
            .into_iter()
            .collect();

        assert_eq!(directory.name_of(2), Some("Maria"));
        assert_eq!(directory.name_of(3), None);
        assert_eq!(directory.first_id(), Some(1));
        assert!(Directory::default().first_id().is_none());
    }

    #[test]
    fn named_rows_accept_either_naming() {
        let rows: Vec<NamedRow> = serde_json::from_str(
            r#"[{"id_aluno": 4, "nome_completo": "Ana", "email": "a@b.c"}, {"id": 5, "nome": "Bia"}]"#,
        )
        .unwrap();

        assert_eq!(rows[0].id, 4);
        assert_eq!(rows[0].nome, "Ana");
        assert_eq!(rows[1].nome, "Bia");
    }

    #[test]
    fn blank_strings_become_none() {
        assert_eq!(blank_to_none("   "), None);
        assert_eq!(blank_to_none(" 1199 "), Some("1199".to_string()));
    }
}
