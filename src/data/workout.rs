use crate::{
    api::Backend,
    data::{
        Directory, Entity, EntityKind, blank_to_none, contains_ignoring_case,
        wire::{self, input_date, parse_date},
    },
    error::AcademiaResult,
};
use async_trait::async_trait;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(alias = "id_treino")]
    pub id: i64,
    pub nome_treino: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(with = "wire::date")]
    pub data_inicio: Date,
    #[serde(default, with = "wire::optional_date")]
    pub data_fim: Option<Date>,
    pub aluno_id: i64,
    #[serde(default)]
    pub aluno_nome: Option<String>,
    pub instrutor_id: i64,
    #[serde(default)]
    pub instrutor_nome: Option<String>,
}

///the display names are the backend's business, so they never go out
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkoutDraft {
    pub nome_treino: String,
    pub descricao: Option<String>,
    #[serde(with = "wire::date")]
    pub data_inicio: Date,
    #[serde(with = "wire::optional_date")]
    pub data_fim: Option<Date>,
    pub aluno_id: i64,
    pub instrutor_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkoutForm {
    pub nome_treino: String,
    pub descricao: String,
    pub data_inicio: String,
    pub data_fim: String,
    pub aluno_id: String,
    pub instrutor_id: String,
}

#[derive(Debug, Default)]
pub struct WorkoutLookups {
    pub students: Directory,
    pub instructors: Directory,
}

#[async_trait]
impl Entity for Workout {
    type Draft = WorkoutDraft;
    type Form = WorkoutForm;
    type Lookups = WorkoutLookups;

    const KIND: EntityKind = EntityKind::Workouts;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> WorkoutForm {
        WorkoutForm {
            nome_treino: self.nome_treino.clone(),
            descricao: self.descricao.clone().unwrap_or_default(),
            data_inicio: input_date(self.data_inicio),
            data_fim: self.data_fim.map(input_date).unwrap_or_default(),
            aluno_id: self.aluno_id.to_string(),
            instrutor_id: self.instrutor_id.to_string(),
        }
    }

    fn blank_form(_lookups: &WorkoutLookups) -> WorkoutForm {
        WorkoutForm::default()
    }

    fn validate(form: &WorkoutForm, lookups: &WorkoutLookups) -> Result<WorkoutDraft, Vec<String>> {
        let mut problems = vec![];

        let nome_treino = form.nome_treino.trim();
        if nome_treino.is_empty() {
            problems.push("O nome do treino é obrigatório.".to_string());
        }
        let data_inicio = parse_date(&form.data_inicio)
            .inspect_err(|_| problems.push("Data de início inválida.".to_string()))
            .ok();
        let data_fim = if form.data_fim.trim().is_empty() {
            Some(None)
        } else {
            parse_date(&form.data_fim)
                .inspect_err(|_| problems.push("Data de fim inválida.".to_string()))
                .ok()
                .map(Some)
        };
        if let (Some(inicio), Some(Some(fim))) = (data_inicio, data_fim) {
            if fim < inicio {
                problems.push("A data de fim não pode ser anterior à data de início.".to_string());
            }
        }

        let pick = |raw: &str, directory: &Directory| {
            raw.trim()
                .parse::<i64>()
                .ok()
                .filter(|id| directory.is_empty() || directory.contains(*id))
        };
        let aluno_id = pick(&form.aluno_id, &lookups.students);
        let instrutor_id = pick(&form.instrutor_id, &lookups.instructors);
        if aluno_id.is_none() || instrutor_id.is_none() {
            problems.push("Por favor, selecione um aluno e um instrutor.".to_string());
        }

        match (data_inicio, data_fim, aluno_id, instrutor_id) {
            (Some(data_inicio), Some(data_fim), Some(aluno_id), Some(instrutor_id))
                if problems.is_empty() =>
            {
                Ok(WorkoutDraft {
                    nome_treino: nome_treino.to_string(),
                    descricao: blank_to_none(&form.descricao),
                    data_inicio,
                    data_fim,
                    aluno_id,
                    instrutor_id,
                })
            }
            _ => Err(problems),
        }
    }

    fn from_draft(id: i64, draft: WorkoutDraft) -> Self {
        Self {
            id,
            nome_treino: draft.nome_treino,
            descricao: draft.descricao,
            data_inicio: draft.data_inicio,
            data_fim: draft.data_fim,
            aluno_id: draft.aluno_id,
            aluno_nome: None,
            instrutor_id: draft.instrutor_id,
            instrutor_nome: None,
        }
    }

    fn reconcile(&mut self, lookups: &WorkoutLookups) {
        if self.aluno_nome.as_deref().is_none_or(str::is_empty) {
            self.aluno_nome = lookups.students.name_of(self.aluno_id).map(ToString::to_string);
        }
        if self.instrutor_nome.as_deref().is_none_or(str::is_empty) {
            self.instrutor_nome = lookups
                .instructors
                .name_of(self.instrutor_id)
                .map(ToString::to_string);
        }
    }

    fn matches_filter(&self, needle: &str) -> bool {
        [
            Some(self.nome_treino.as_str()),
            self.aluno_nome.as_deref(),
            self.instrutor_nome.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|haystack| contains_ignoring_case(haystack, needle))
    }

    async fn load_lookups<B: Backend + ?Sized>(backend: &B) -> AcademiaResult<WorkoutLookups> {
        let (students, instructors) = tokio::try_join!(
            backend.directory(EntityKind::Students),
            backend.directory(EntityKind::Instructors),
        )?;
        Ok(WorkoutLookups {
            students,
            instructors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn lookups() -> WorkoutLookups {
        WorkoutLookups {
            students: [(1, "João da Silva".to_string())].into_iter().collect(),
            instructors: [(9, "Ana Souza".to_string())].into_iter().collect(),
        }
    }

    fn form() -> WorkoutForm {
        WorkoutForm {
            nome_treino: "Hipertrofia A".into(),
            descricao: String::new(),
            data_inicio: "2024-03-01".into(),
            data_fim: String::new(),
            aluno_id: "1".into(),
            instrutor_id: "9".into(),
        }
    }

    #[test]
    fn open_ended_workouts_validate() {
        let draft = Workout::validate(&form(), &lookups()).unwrap();
        assert_eq!(draft.data_fim, None);
        assert_eq!(draft.descricao, None);

        let json = serde_json::to_value(&draft).unwrap();
        assert!(json["data_fim"].is_null());
        assert!(json.get("aluno_nome").is_none());
    }

    #[test]
    fn student_and_instructor_must_be_picked() {
        let form = WorkoutForm {
            instrutor_id: String::new(),
            ..form()
        };
        assert_eq!(
            Workout::validate(&form, &lookups()).unwrap_err(),
            vec!["Por favor, selecione um aluno e um instrutor.".to_string()]
        );
    }

    #[test]
    fn end_cannot_precede_start() {
        let form = WorkoutForm {
            data_fim: "2024-02-01".into(),
            ..form()
        };
        assert_eq!(Workout::validate(&form, &lookups()).unwrap_err().len(), 1);
    }

    #[test]
    fn reconcile_fills_missing_names_only() {
        let mut workout = Workout::from_draft(3, Workout::validate(&form(), &lookups()).unwrap());
        workout.reconcile(&lookups());
        assert_eq!(workout.aluno_nome.as_deref(), Some("João da Silva"));
        assert_eq!(workout.instrutor_nome.as_deref(), Some("Ana Souza"));

        workout.aluno_nome = Some("Nome do backend".into());
        workout.reconcile(&lookups());
        assert_eq!(workout.aluno_nome.as_deref(), Some("Nome do backend"));
    }

    #[test]
    fn filter_looks_at_names_too() {
        let mut workout = Workout::from_draft(3, Workout::validate(&form(), &lookups()).unwrap());
        workout.reconcile(&lookups());
        assert!(workout.matches_filter("hipertrofia"));
        assert!(workout.matches_filter("souza"));
        assert!(!workout.matches_filter("cardio"));
    }

    #[test]
    fn backend_rows_parse_with_nulls() {
        let workout: Workout = serde_json::from_str(
            r#"{"id": 1, "nome_treino": "Cardio", "descricao": null, "data_inicio": "2024-01-02T00:00:00.000Z",
                "data_fim": null, "aluno_id": 1, "aluno_nome": "João da Silva", "instrutor_id": 9, "instrutor_nome": "Ana Souza"}"#,
        )
        .unwrap();
        assert_eq!(workout.data_inicio, date(2024, 1, 2));
        assert_eq!(workout.data_fim, None);
    }
}
