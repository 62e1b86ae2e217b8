use crate::{
    config::ApiConfig,
    data::{
        Directory, Entity, EntityKind, NamedRow, instructor::Instructor, payment::Payment,
        student::Student, workout::Workout,
    },
    error::{
        AcademiaResult, BuildClientSnafu, DecodeSnafu, MissingCreatedIdSnafu, RequestSnafu,
        UnexpectedStatusSnafu,
    },
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use snafu::{OptionExt, ResultExt};
use std::sync::Arc;

#[cfg(test)]
pub mod testing;

/// The four REST verbs for one collection.
#[async_trait]
pub trait EntityBackend<E: Entity>: Send + Sync {
    async fn list(&self) -> AcademiaResult<Vec<E>>;
    async fn create(&self, draft: &E::Draft) -> AcademiaResult<E>;
    async fn update(&self, id: i64, draft: &E::Draft) -> AcademiaResult<E>;
    async fn delete(&self, id: i64) -> AcademiaResult<()>;
}

#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    ///just ids and names, for dropdowns and joins
    async fn directory(&self, kind: EntityKind) -> AcademiaResult<Directory>;
}

pub trait Backend:
    EntityBackend<Student>
    + EntityBackend<Instructor>
    + EntityBackend<Payment>
    + EntityBackend<Workout>
    + DirectoryBackend
{
}

impl<T> Backend for T where
    T: EntityBackend<Student>
        + EntityBackend<Instructor>
        + EntityBackend<Payment>
        + EntityBackend<Workout>
        + DirectoryBackend
{
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

///the backends put their complaint in either `error` or `message`
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    let ErrorBody { error, message } = serde_json::from_slice(body).ok()?;
    error.or(message).filter(|msg| !msg.trim().is_empty())
}

#[derive(Deserialize)]
struct CreatedId {
    #[serde(alias = "insertId", alias = "id_aluno", alias = "id_instrutor", alias = "id_pagamento", alias = "id_treino")]
    id: i64,
}

/// Talks to the gym backend over HTTP+JSON.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: Client,
    base_url: Arc<str>,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> AcademiaResult<Self> {
        let client = Client::builder().build().context(BuildClientSnafu)?;
        Ok(Self {
            client,
            base_url: config.base_url().into(),
        })
    }

    pub fn url(&self, kind: EntityKind, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}/{}/{id}", self.base_url, kind.path()),
            None => format!("{}/{}", self.base_url, kind.path()),
        }
    }

    ///sends the request, returning the body of any 2xx response
    async fn send(&self, request: RequestBuilder, url: String) -> AcademiaResult<Vec<u8>> {
        let response = request.send().await.context(RequestSnafu { url: url.clone() })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .context(RequestSnafu { url: url.clone() })?;

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Erro desconhecido")
                    .to_string()
            });
            warn!(%url, %status, %message, "Backend refused request");
            return UnexpectedStatusSnafu { status, message }.fail();
        }

        trace!(%url, %status, len = body.len(), "Backend responded");
        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, kind: EntityKind) -> AcademiaResult<T> {
        let url = self.url(kind, None);
        let body = self.send(self.client.get(&url), url).await?;
        serde_json::from_slice(&body).context(DecodeSnafu { kind })
    }

    ///writes may echo the record, only its id, or nothing at all
    fn interpret_write<E: Entity>(
        body: &[u8],
        known_id: Option<i64>,
        draft: &E::Draft,
    ) -> AcademiaResult<E> {
        if let Ok(record) = serde_json::from_slice::<E>(body) {
            return Ok(record);
        }

        let echoed_id = serde_json::from_slice::<CreatedId>(body).ok().map(|c| c.id);
        let id = known_id
            .or(echoed_id)
            .context(MissingCreatedIdSnafu { kind: E::KIND })?;
        Ok(E::from_draft(id, draft.clone()))
    }
}

#[async_trait]
impl<E: Entity> EntityBackend<E> for RestClient {
    async fn list(&self) -> AcademiaResult<Vec<E>> {
        self.get_json(E::KIND).await
    }

    async fn create(&self, draft: &E::Draft) -> AcademiaResult<E> {
        let url = self.url(E::KIND, None);
        let body = self.send(self.client.post(&url).json(draft), url).await?;
        Self::interpret_write(&body, None, draft)
    }

    async fn update(&self, id: i64, draft: &E::Draft) -> AcademiaResult<E> {
        let url = self.url(E::KIND, Some(id));
        let body = self.send(self.client.put(&url).json(draft), url).await?;
        Self::interpret_write(&body, Some(id), draft)
    }

    async fn delete(&self, id: i64) -> AcademiaResult<()> {
        let url = self.url(E::KIND, Some(id));
        self.send(self.client.delete(&url), url).await?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryBackend for RestClient {
    async fn directory(&self, kind: EntityKind) -> AcademiaResult<Directory> {
        let rows: Vec<NamedRow> = self.get_json(kind).await?;
        Ok(rows.into_iter().map(|row| (row.id, row.nome)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        container::DeleteMode,
        data::instructor::InstructorDraft,
    };

    fn draft() -> InstructorDraft {
        InstructorDraft {
            nome: "Ana Souza".into(),
            especialidade: None,
            telefone: None,
            email: "ana@academia.com".into(),
        }
    }

    #[test]
    fn error_message_comes_from_either_field() {
        assert_eq!(
            extract_error_message(r#"{"error": "Aluno já existe"}"#.as_bytes()).as_deref(),
            Some("Aluno já existe")
        );
        assert_eq!(
            extract_error_message(r#"{"message": "Pagamento inválido"}"#.as_bytes()).as_deref(),
            Some("Pagamento inválido")
        );
        assert_eq!(extract_error_message(br#"{"error": ""}"#), None);
        assert_eq!(extract_error_message(b"<html>oops</html>"), None);
    }

    #[test]
    fn urls_always_carry_the_id_for_writes() {
        let client = RestClient::new(&ApiConfig::from_parts("http://localhost:8000/api/", DeleteMode::Hard)).unwrap();
        assert_eq!(client.url(EntityKind::Students, None), "http://localhost:8000/api/alunos");
        assert_eq!(client.url(EntityKind::Workouts, Some(4)), "http://localhost:8000/api/treinos/4");
    }

    #[test]
    fn writes_fall_back_to_the_draft() {
        let full = br#"{"id": 3, "nome": "Ana S.", "especialidade": null, "telefone": null, "email": "ana@academia.com"}"#;
        let echoed: Instructor = RestClient::interpret_write(full, None, &draft()).unwrap();
        assert_eq!(echoed.nome, "Ana S.");

        let id_only: Instructor =
            RestClient::interpret_write(br#"{"insertId": 12, "message": "ok"}"#, None, &draft()).unwrap();
        assert_eq!(id_only.id, 12);
        assert_eq!(id_only.nome, "Ana Souza");

        let empty: Instructor = RestClient::interpret_write(b"", Some(5), &draft()).unwrap();
        assert_eq!(empty.id, 5);

        assert!(RestClient::interpret_write::<Instructor>(b"", None, &draft()).is_err());
    }
}
