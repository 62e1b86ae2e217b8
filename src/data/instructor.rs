use crate::{
    api::Backend,
    data::{Entity, EntityKind, blank_to_none, contains_ignoring_case},
    error::AcademiaResult,
};
use async_trait::async_trait;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(alias = "id_instrutor")]
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub especialidade: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstructorDraft {
    pub nome: String,
    pub especialidade: Option<String>,
    pub telefone: Option<String>,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstructorForm {
    pub nome: String,
    pub especialidade: String,
    pub telefone: String,
    pub email: String,
}

#[async_trait]
impl Entity for Instructor {
    type Draft = InstructorDraft;
    type Form = InstructorForm;
    type Lookups = ();

    const KIND: EntityKind = EntityKind::Instructors;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> InstructorForm {
        InstructorForm {
            nome: self.nome.clone(),
            especialidade: self.especialidade.clone().unwrap_or_default(),
            telefone: self.telefone.clone().unwrap_or_default(),
            email: self.email.clone(),
        }
    }

    fn blank_form((): &()) -> InstructorForm {
        InstructorForm::default()
    }

    fn validate(form: &InstructorForm, (): &()) -> Result<InstructorDraft, Vec<String>> {
        let mut problems = vec![];

        let nome = form.nome.trim();
        if nome.is_empty() {
            problems.push("O nome é obrigatório.".to_string());
        }
        let email = form.email.trim();
        if email.is_empty() {
            problems.push("O email é obrigatório.".to_string());
        } else if !EmailAddress::is_valid(email) {
            problems.push("Email inválido.".to_string());
        }

        if !problems.is_empty() {
            return Err(problems);
        }

        Ok(InstructorDraft {
            nome: nome.to_string(),
            especialidade: blank_to_none(&form.especialidade),
            telefone: blank_to_none(&form.telefone),
            email: email.to_string(),
        })
    }

    fn from_draft(id: i64, draft: InstructorDraft) -> Self {
        let InstructorDraft {
            nome,
            especialidade,
            telefone,
            email,
        } = draft;
        Self {
            id,
            nome,
            especialidade,
            telefone,
            email,
        }
    }

    fn matches_filter(&self, needle: &str) -> bool {
        contains_ignoring_case(&self.nome, needle)
    }

    async fn load_lookups<B: Backend + ?Sized>(_backend: &B) -> AcademiaResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instructor(id: i64, nome: &str) -> Instructor {
        Instructor {
            id,
            nome: nome.to_string(),
            especialidade: Some("Musculação".to_string()),
            telefone: None,
            email: format!("{id}@academia.com"),
        }
    }

    #[test]
    fn filter_is_by_name_and_ignores_case() {
        let ana = instructor(1, "Ana Souza");
        assert!(ana.matches_filter("souza"));
        assert!(ana.matches_filter("ANA"));
        assert!(!ana.matches_filter("Musculação"));
    }

    #[test]
    fn name_and_email_are_required() {
        let problems = Instructor::validate(&InstructorForm::default(), &()).unwrap_err();
        assert_eq!(problems.len(), 2);

        let form = InstructorForm {
            nome: "Ana".into(),
            email: "ana@".into(),
            ..InstructorForm::default()
        };
        assert_eq!(
            Instructor::validate(&form, &()).unwrap_err(),
            vec!["Email inválido.".to_string()]
        );
    }

    #[test]
    fn optional_fields_go_out_as_null() {
        let form = InstructorForm {
            nome: "Ana".into(),
            email: "ana@academia.com".into(),
            ..InstructorForm::default()
        };
        let json = serde_json::to_value(Instructor::validate(&form, &()).unwrap()).unwrap();
        assert!(json["especialidade"].is_null());
        assert!(json["telefone"].is_null());
    }
}
