use crate::{
    api::Backend,
    data::{
        Entity, EntityKind, blank_to_none, contains_ignoring_case,
        wire::{self, input_date, parse_date},
    },
    error::AcademiaResult,
};
use async_trait::async_trait;
use email_address::EmailAddress;
use jiff::{Zoned, civil::Date};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Sex {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Masculino",
            Self::Female => "Feminino",
            Self::Other => "Outro",
        }
    }
}

impl FromStr for Sex {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|sex| sex.code() == s).ok_or(())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Ativo,
    Inativo,
}

impl Status {
    pub const ALL: [Self; 2] = [Self::Ativo, Self::Inativo];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Ativo => "ativo",
            Self::Inativo => "inativo",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ativo => "Ativo",
            Self::Inativo => "Inativo",
        }
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.code() == s).ok_or(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(alias = "id_aluno")]
    pub id: i64,
    #[serde(alias = "nome")]
    pub nome_completo: String,
    #[serde(with = "wire::date")]
    pub data_nascimento: Date,
    #[serde(default)]
    pub sexo: Sex,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(with = "wire::date")]
    pub data_matricula: Date,
    #[serde(default)]
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentDraft {
    pub nome_completo: String,
    #[serde(with = "wire::date")]
    pub data_nascimento: Date,
    pub sexo: Sex,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    #[serde(with = "wire::date")]
    pub data_matricula: Date,
    pub status: Status,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub nome_completo: String,
    pub data_nascimento: String,
    pub sexo: String,
    pub telefone: String,
    pub email: String,
    pub endereco: String,
    pub data_matricula: String,
    pub status: String,
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            nome_completo: student.nome_completo.clone(),
            data_nascimento: student.data_nascimento,
            sexo: student.sexo,
            telefone: student.telefone.clone(),
            email: student.email.clone(),
            endereco: student.endereco.clone(),
            data_matricula: student.data_matricula,
            status: student.status,
        }
    }
}

#[async_trait]
impl Entity for Student {
    type Draft = StudentDraft;
    type Form = StudentForm;
    type Lookups = ();

    const KIND: EntityKind = EntityKind::Students;

    fn id(&self) -> i64 {
        self.id
    }

    fn to_form(&self) -> StudentForm {
        StudentForm {
            nome_completo: self.nome_completo.clone(),
            data_nascimento: input_date(self.data_nascimento),
            sexo: self.sexo.code().to_string(),
            telefone: self.telefone.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            endereco: self.endereco.clone().unwrap_or_default(),
            data_matricula: input_date(self.data_matricula),
            status: self.status.code().to_string(),
        }
    }

    fn blank_form((): &()) -> StudentForm {
        let today = input_date(Zoned::now().date());
        StudentForm {
            data_nascimento: today.clone(),
            sexo: Sex::default().code().to_string(),
            data_matricula: today,
            status: Status::default().code().to_string(),
            ..StudentForm::default()
        }
    }

    fn validate(form: &StudentForm, (): &()) -> Result<StudentDraft, Vec<String>> {
        let mut problems = vec![];

        let nome_completo = form.nome_completo.trim().to_string();
        if nome_completo.is_empty() {
            problems.push("O nome completo é obrigatório.".to_string());
        }
        let data_nascimento = parse_date(&form.data_nascimento)
            .inspect_err(|_| problems.push("Data de nascimento inválida.".to_string()))
            .ok();
        let sexo = form
            .sexo
            .parse::<Sex>()
            .inspect_err(|()| problems.push("Selecione o sexo.".to_string()))
            .ok();
        let email = blank_to_none(&form.email);
        if email.as_deref().is_some_and(|email| !EmailAddress::is_valid(email)) {
            problems.push("Email inválido.".to_string());
        }
        let data_matricula = parse_date(&form.data_matricula)
            .inspect_err(|_| problems.push("Data de matrícula inválida.".to_string()))
            .ok();
        //the status selector only shows up when editing
        let status = if form.status.is_empty() {
            Some(Status::default())
        } else {
            form.status
                .parse::<Status>()
                .inspect_err(|()| problems.push("Status inválido.".to_string()))
                .ok()
        };

        match (data_nascimento, sexo, data_matricula, status) {
            (Some(data_nascimento), Some(sexo), Some(data_matricula), Some(status))
                if problems.is_empty() =>
            {
                Ok(StudentDraft {
                    nome_completo,
                    data_nascimento,
                    sexo,
                    telefone: blank_to_none(&form.telefone),
                    email,
                    endereco: blank_to_none(&form.endereco),
                    data_matricula,
                    status,
                })
            }
            _ => Err(problems),
        }
    }

    fn from_draft(id: i64, draft: StudentDraft) -> Self {
        Self {
            id,
            nome_completo: draft.nome_completo,
            data_nascimento: draft.data_nascimento,
            sexo: draft.sexo,
            telefone: draft.telefone,
            email: draft.email,
            endereco: draft.endereco,
            data_matricula: draft.data_matricula,
            status: draft.status,
        }
    }

    fn deactivated(&self) -> Option<StudentDraft> {
        Some(StudentDraft {
            status: Status::Inativo,
            ..StudentDraft::from(self)
        })
    }

    fn matches_filter(&self, needle: &str) -> bool {
        contains_ignoring_case(&self.nome_completo, needle)
    }

    async fn load_lookups<B: Backend + ?Sized>(_backend: &B) -> AcademiaResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn filled_form() -> StudentForm {
        StudentForm {
            nome_completo: "  João da Silva ".into(),
            data_nascimento: "1995-03-15".into(),
            sexo: "M".into(),
            telefone: "11987654321".into(),
            email: "joao.silva@example.com".into(),
            endereco: String::new(),
            data_matricula: "2023-01-10".into(),
            status: String::new(),
        }
    }

    #[test]
    fn deserialises_either_backend_shape() {
        let student: Student = serde_json::from_str(
            r#"{"id_aluno": 1, "nome_completo": "João da Silva", "data_nascimento": "1995-03-15T03:00:00.000Z",
                "sexo": "M", "telefone": null, "email": "joao.silva@example.com", "endereco": null,
                "data_matricula": "2023-01-10", "status": "ativo"}"#,
        )
        .unwrap();
        assert_eq!(student.id, 1);
        assert_eq!(student.data_nascimento, date(1995, 3, 15));
        assert_eq!(student.telefone, None);

        let older: Student = serde_json::from_str(
            r#"{"id": 3, "nome_completo": "Carlos Pereira", "email": "carlos.pereira@example.com",
                "telefone": "31988889999", "data_nascimento": "1988-11-05", "data_matricula": "2022-11-30",
                "status": "inativo"}"#,
        )
        .unwrap();
        assert_eq!(older.sexo, Sex::Male);
        assert_eq!(older.status, Status::Inativo);
    }

    #[test]
    fn drafts_serialise_with_plain_dates() {
        let draft = Student::validate(&filled_form(), &()).unwrap();
        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(json["nome_completo"], "João da Silva");
        assert_eq!(json["data_nascimento"], "1995-03-15");
        assert_eq!(json["sexo"], "M");
        assert_eq!(json["status"], "ativo");
        assert!(json["endereco"].is_null());
    }

    #[test]
    fn validation_reports_every_problem() {
        let form = StudentForm {
            nome_completo: " ".into(),
            data_nascimento: "ontem".into(),
            email: "not-an-email".into(),
            ..filled_form()
        };

        let problems = Student::validate(&form, &()).unwrap_err();
        assert_eq!(
            problems,
            vec![
                "O nome completo é obrigatório.".to_string(),
                "Data de nascimento inválida.".to_string(),
                "Email inválido.".to_string(),
            ]
        );
    }

    #[test]
    fn editing_round_trips_through_the_form() {
        let student = Student::from_draft(7, Student::validate(&filled_form(), &()).unwrap());
        let again = Student::validate(&student.to_form(), &()).unwrap();
        assert_eq!(Student::from_draft(7, again), student);
    }

    #[test]
    fn deactivating_only_touches_status() {
        let student = Student::from_draft(1, Student::validate(&filled_form(), &()).unwrap());
        let draft = student.deactivated().unwrap();
        assert_eq!(draft.status, Status::Inativo);
        assert_eq!(draft.nome_completo, student.nome_completo);
    }
}
