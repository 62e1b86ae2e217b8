use crate::{
    container::EntityContainer,
    data::{
        wire::display_date,
        workout::{Workout, WorkoutForm, WorkoutLookups},
    },
    maud_conveniences::{select_element, simple_form_element, textarea_element},
    routes::screen::Screen,
    state::AcademiaState,
};
use maud::{Markup, html};
use tokio::sync::Mutex;

impl Screen for Workout {
    const HEADERS: &'static [&'static str] = &["Treino", "Aluno", "Instrutor", "Período"];
    const FILTERABLE: bool = true;

    fn container(state: &AcademiaState) -> &Mutex<EntityContainer<Self>> {
        state.workouts()
    }

    fn render_cells(&self, _lookups: &WorkoutLookups) -> Vec<Markup> {
        let period_end = self.data_fim.map_or_else(|| "Atual".to_string(), display_date);

        vec![
            html! {
                p class="font-semibold" {(self.nome_treino)}
                @if let Some(descricao) = &self.descricao {
                    p class="text-sm text-gray-400" {(descricao)}
                }
            },
            html! {(self.aluno_nome.as_deref().unwrap_or("-"))},
            html! {(self.instrutor_nome.as_deref().unwrap_or("-"))},
            html! {(display_date(self.data_inicio)) " a " (period_end)},
        ]
    }

    fn render_fields(form: &WorkoutForm, lookups: &WorkoutLookups, _editing: bool) -> Markup {
        html! {
            (simple_form_element("nome_treino", "Nome do Treino", true, None, &form.nome_treino))
            (textarea_element("descricao", "Descrição", &form.descricao))
            div class="grid grid-cols-2 gap-4" {
                (simple_form_element("data_inicio", "Data de Início", true, Some("date"), &form.data_inicio))
                (simple_form_element("data_fim", "Data de Fim", false, Some("date"), &form.data_fim))
            }
            div class="grid grid-cols-2 gap-4" {
                (select_element(
                    "aluno_id",
                    "Aluno",
                    true,
                    Some("Selecione um aluno"),
                    lookups.students.entries().map(|(id, name)| (id.to_string(), name)),
                    &form.aluno_id,
                ))
                (select_element(
                    "instrutor_id",
                    "Instrutor",
                    true,
                    Some("Selecione um instrutor"),
                    lookups.instructors.entries().map(|(id, name)| (id.to_string(), name)),
                    &form.instrutor_id,
                ))
            }
        }
    }
}
