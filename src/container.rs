use crate::{
    api::{Backend, EntityBackend},
    data::Entity,
    error::{AcademiaResult, MissingRecordSnafu},
};
use snafu::OptionExt;
use std::str::FromStr;

/// What `remove` does to a record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DeleteMode {
    #[default]
    Hard,
    ///flip the record to inactive, for entities that have a status
    SoftStatus,
}

impl FromStr for DeleteMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hard" | "delete" => Ok(Self::Hard),
            "soft" | "status" => Ok(Self::SoftStatus),
            _ => Err(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: String) -> Self {
        Self {
            kind: NoticeKind::Success,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            kind: NoticeKind::Error,
            message,
        }
    }
}

#[derive(Clone, Debug)]
pub enum View<E: Entity> {
    List,
    Form {
        ///`None` while adding
        target: Option<i64>,
        form: E::Form,
        problems: Vec<String>,
    },
}

/// Owns one collection and everything the screen shows for it.
#[derive(Debug)]
pub struct EntityContainer<E: Entity> {
    records: Vec<E>,
    lookups: E::Lookups,
    view: View<E>,
    error: Option<String>,
    notice: Option<Notice>,
    delete_mode: DeleteMode,
    loaded: bool,
}

impl<E: Entity> Default for EntityContainer<E> {
    fn default() -> Self {
        Self::new(DeleteMode::default())
    }
}

impl<E: Entity> EntityContainer<E> {
    pub fn new(delete_mode: DeleteMode) -> Self {
        Self {
            records: vec![],
            lookups: E::Lookups::default(),
            view: View::List,
            error: None,
            notice: None,
            delete_mode,
            loaded: false,
        }
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn filtered<'a>(&'a self, needle: Option<&'a str>) -> impl Iterator<Item = &'a E> + 'a {
        let needle = needle.map(str::trim).filter(|needle| !needle.is_empty());
        self.records
            .iter()
            .filter(move |record| needle.is_none_or(|needle| record.matches_filter(needle)))
    }

    pub const fn lookups(&self) -> &E::Lookups {
        &self.lookups
    }

    pub const fn view(&self) -> &View<E> {
        &self.view
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    ///notices are shown once
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Fetches the collection and its lookups together. If any request
    /// fails, nothing is kept and the error is stored for display.
    pub async fn load<B: Backend + EntityBackend<E> + ?Sized>(&mut self, backend: &B) {
        let kind = E::KIND;
        let fetched = tokio::try_join!(EntityBackend::<E>::list(backend), E::load_lookups(backend));

        self.loaded = true;
        match fetched {
            Ok((mut records, lookups)) => {
                for record in &mut records {
                    record.reconcile(&lookups);
                }
                info!(?kind, n = records.len(), "Loaded collection");
                self.records = records;
                self.lookups = lookups;
                self.error = None;
            }
            Err(e) => {
                warn!(?e, ?kind, "Failed to load collection");
                self.records.clear();
                self.lookups = E::Lookups::default();
                self.error = Some(format!("Erro ao carregar {}: {e}", kind.plural()));
            }
        }
    }

    pub fn add_new(&mut self) {
        self.view = View::Form {
            target: None,
            form: E::blank_form(&self.lookups),
            problems: vec![],
        };
    }

    pub fn edit(&mut self, id: i64) -> AcademiaResult<()> {
        let record = self
            .records
            .iter()
            .find(|record| record.id() == id)
            .context(MissingRecordSnafu { kind: E::KIND, id })?;

        self.view = View::Form {
            target: Some(id),
            form: record.to_form(),
            problems: vec![],
        };
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.view = View::List;
    }

    /// Validates what the user typed, then saves it under `target`, the
    /// record the form was opened for (`None` when adding). Invalid input
    /// goes back to the form untouched, without a request.
    ///
    /// Returns whether the collection changed.
    pub async fn submit<B: Backend + EntityBackend<E> + ?Sized>(
        &mut self,
        backend: &B,
        target: Option<i64>,
        form: E::Form,
    ) -> bool {
        match E::validate(&form, &self.lookups) {
            Ok(draft) => {
                let saved = self.save(backend, target, draft).await;
                if !saved {
                    self.view = View::Form {
                        target,
                        form,
                        problems: vec![],
                    };
                }
                saved
            }
            Err(problems) => {
                debug!(kind = ?E::KIND, ?target, ?problems, "Rejected form");
                self.view = View::Form {
                    target,
                    form,
                    problems,
                };
                false
            }
        }
    }

    /// POSTs without a target, PUTs with one, then merges whatever the
    /// backend hands back. On failure the view stays as it was.
    ///
    /// Returns whether the collection changed.
    pub async fn save<B: Backend + EntityBackend<E> + ?Sized>(
        &mut self,
        backend: &B,
        target: Option<i64>,
        draft: E::Draft,
    ) -> bool {
        let kind = E::KIND;
        let result = match target {
            Some(id) => EntityBackend::<E>::update(backend, id, &draft).await,
            None => EntityBackend::<E>::create(backend, &draft).await,
        };

        match result {
            Ok(mut record) => {
                record.reconcile(&self.lookups);
                let id = record.id();
                match target.and_then(|target| self.records.iter().position(|r| r.id() == target)) {
                    Some(index) => self.records[index] = record,
                    None => self.records.push(record),
                }

                info!(?kind, id, updated = target.is_some(), "Saved record");
                self.view = View::List;
                let verb = if target.is_some() { "atualizado" } else { "criado" };
                self.notice = Some(Notice::success(format!(
                    "{} {verb} com sucesso!",
                    kind.singular_title()
                )));
                true
            }
            Err(e) => {
                warn!(?e, ?kind, ?target, "Failed to save record");
                let verb = if target.is_some() { "atualizar" } else { "criar" };
                self.notice = Some(Notice::error(format!(
                    "Erro ao {verb} {}: {e}",
                    kind.singular()
                )));
                false
            }
        }
    }

    /// Deletes the record, or deactivates it when the container is in
    /// soft mode and the entity supports it. Nothing changes locally unless
    /// the backend agreed.
    ///
    /// Returns whether the collection changed.
    pub async fn remove<B: Backend + EntityBackend<E> + ?Sized>(&mut self, backend: &B, id: i64) -> bool {
        let kind = E::KIND;
        let Some(index) = self.records.iter().position(|record| record.id() == id) else {
            self.notice = Some(Notice::error(format!(
                "{} não encontrado.",
                kind.singular_title()
            )));
            return false;
        };

        let deactivation = match self.delete_mode {
            DeleteMode::SoftStatus => self.records[index].deactivated(),
            DeleteMode::Hard => None,
        };

        let result = match deactivation {
            Some(draft) => EntityBackend::<E>::update(backend, id, &draft)
                .await
                .map(Some),
            None => EntityBackend::<E>::delete(backend, id).await.map(|()| None),
        };

        match result {
            Ok(Some(mut replacement)) => {
                replacement.reconcile(&self.lookups);
                self.records[index] = replacement;
                info!(?kind, id, "Deactivated record");
                self.notice = Some(Notice::success(format!(
                    "{} desativado com sucesso!",
                    kind.singular_title()
                )));
            }
            Ok(None) => {
                self.records.remove(index);
                info!(?kind, id, "Deleted record");
                self.notice = Some(Notice::success(format!(
                    "{} excluído com sucesso!",
                    kind.singular_title()
                )));
            }
            Err(e) => {
                warn!(?e, ?kind, id, "Failed to remove record");
                self.notice = Some(Notice::error(format!("Erro ao excluir {}: {e}", kind.singular())));
                return false;
            }
        }

        //a record we were editing is gone now
        if matches!(self.view, View::Form { target: Some(target), .. } if target == id) {
            self.view = View::List;
        }
        true
    }
}
