use crate::{
    container::EntityContainer,
    data::{
        student::{Sex, Status, Student, StudentForm},
        wire::display_date,
    },
    maud_conveniences::{select_element, simple_form_element},
    routes::screen::Screen,
    state::AcademiaState,
};
use maud::{Markup, html};
use tokio::sync::Mutex;

impl Screen for Student {
    const HEADERS: &'static [&'static str] =
        &["Nome", "Email", "Telefone", "Nascimento", "Matrícula", "Status"];
    const FILTERABLE: bool = true;

    fn container(state: &AcademiaState) -> &Mutex<EntityContainer<Self>> {
        state.students()
    }

    fn render_cells(&self, (): &()) -> Vec<Markup> {
        let status_colour = match self.status {
            Status::Ativo => "bg-green-700",
            Status::Inativo => "bg-gray-600",
        };

        vec![
            html! {(self.nome_completo)},
            html! {(self.email.as_deref().unwrap_or("-"))},
            html! {(self.telefone.as_deref().unwrap_or("-"))},
            html! {(display_date(self.data_nascimento))},
            html! {(display_date(self.data_matricula))},
            html! {
                span class={"px-2 py-1 rounded text-sm " (status_colour)} {(self.status.label())}
            },
        ]
    }

    fn render_fields(form: &StudentForm, (): &(), editing: bool) -> Markup {
        html! {
            (simple_form_element("nome_completo", "Nome Completo", true, None, &form.nome_completo))
            div class="grid grid-cols-2 gap-4" {
                (simple_form_element("data_nascimento", "Data de Nascimento", true, Some("date"), &form.data_nascimento))
                (select_element(
                    "sexo",
                    "Sexo",
                    true,
                    None,
                    Sex::ALL.into_iter().map(|sex| (sex.code().to_string(), sex.label())),
                    &form.sexo,
                ))
            }
            div class="grid grid-cols-2 gap-4" {
                (simple_form_element("telefone", "Telefone", false, Some("tel"), &form.telefone))
                (simple_form_element("email", "Email", false, Some("email"), &form.email))
            }
            (simple_form_element("endereco", "Endereço", false, None, &form.endereco))
            div class="grid grid-cols-2 gap-4" {
                (simple_form_element("data_matricula", "Data de Matrícula", true, Some("date"), &form.data_matricula))
                @if editing {
                    (select_element(
                        "status",
                        "Status",
                        true,
                        None,
                        Status::ALL.into_iter().map(|status| (status.code().to_string(), status.label())),
                        &form.status,
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::testing::MockBackend,
        container::DeleteMode,
        data::{Entity, EntityKind},
        routes::screen::render_view,
    };
    use serde_json::json;

    #[tokio::test]
    async fn students_can_be_filtered_by_name() {
        let backend = MockBackend::new().with_rows(
            EntityKind::Students,
            vec![
                json!({"id": 1, "nome_completo": "João da Silva", "data_nascimento": "1995-03-15", "data_matricula": "2023-01-10"}),
                json!({"id": 2, "nome_completo": "Maria Oliveira", "data_nascimento": "2000-07-22", "data_matricula": "2023-02-20"}),
            ],
        );
        let mut container = EntityContainer::<Student>::new(DeleteMode::Hard);
        container.load(&backend).await;

        let html = render_view(&mut container, Some("maria")).into_string();
        assert!(html.contains(r#"name="filter""#));
        assert!(html.contains("Maria Oliveira"));
        assert!(!html.contains("João da Silva"));
    }

    #[test]
    fn status_only_editable_when_editing() {
        let form = Student::blank_form(&());

        let adding = Student::render_fields(&form, &(), false).into_string();
        let editing = Student::render_fields(&form, &(), true).into_string();
        assert!(!adding.contains("name=\"status\""));
        assert!(editing.contains("name=\"status\""));
    }
}
