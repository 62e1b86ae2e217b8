use crate::{
    container::EntityContainer,
    data::instructor::{Instructor, InstructorForm},
    maud_conveniences::simple_form_element,
    routes::screen::Screen,
    state::AcademiaState,
};
use maud::{Markup, html};
use tokio::sync::Mutex;

impl Screen for Instructor {
    const HEADERS: &'static [&'static str] = &["Nome", "Especialidade", "Telefone", "Email"];
    const FILTERABLE: bool = true;

    fn container(state: &AcademiaState) -> &Mutex<EntityContainer<Self>> {
        state.instructors()
    }

    fn render_cells(&self, (): &()) -> Vec<Markup> {
        vec![
            html! {(self.nome)},
            html! {(self.especialidade.as_deref().unwrap_or("-"))},
            html! {(self.telefone.as_deref().unwrap_or("-"))},
            html! {(self.email)},
        ]
    }

    fn render_fields(form: &InstructorForm, (): &(), _editing: bool) -> Markup {
        html! {
            (simple_form_element("nome", "Nome", true, None, &form.nome))
            (simple_form_element("especialidade", "Especialidade", false, None, &form.especialidade))
            div class="grid grid-cols-2 gap-4" {
                (simple_form_element("telefone", "Telefone", false, Some("tel"), &form.telefone))
                (simple_form_element("email", "Email", true, Some("email"), &form.email))
            }
        }
    }
}
