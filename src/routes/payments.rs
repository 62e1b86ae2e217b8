use crate::{
    container::EntityContainer,
    data::{
        Directory,
        payment::{Payment, PaymentForm, PaymentMethod},
        wire::display_date,
    },
    maud_conveniences::{form_element, select_element, simple_form_element},
    routes::screen::Screen,
    state::AcademiaState,
};
use maud::{Markup, html};
use tokio::sync::Mutex;

impl Screen for Payment {
    const HEADERS: &'static [&'static str] = &["Aluno", "Data Pag.", "Valor", "Método"];

    fn container(state: &AcademiaState) -> &Mutex<EntityContainer<Self>> {
        state.payments()
    }

    fn render_cells(&self, students: &Directory) -> Vec<Markup> {
        vec![
            html! {
                @match students.name_of(self.aluno_id) {
                    Some(name) => {
                        (name)
                    }
                    None => {
                        span class="text-red-400 italic" {"Aluno não encontrado"}
                    }
                }
            },
            html! {(display_date(self.data_pagamento))},
            html! {(self.valor)},
            html! {(self.metodo_pagamento.label())},
        ]
    }

    fn render_fields(form: &PaymentForm, students: &Directory, _editing: bool) -> Markup {
        html! {
            (select_element(
                "aluno_id",
                "Aluno",
                true,
                Some("Selecione um aluno"),
                students.entries().map(|(id, name)| (id.to_string(), name)),
                &form.aluno_id,
            ))
            div class="grid grid-cols-2 gap-4" {
                (simple_form_element("data_pagamento", "Data do Pagamento", true, Some("date"), &form.data_pagamento))
                (form_element("valor", "Valor (R$)", true, html! {
                    input type="number" id="valor" name="valor" step="0.01" min="0.01" value=(form.valor) required
                        class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
                }))
            }
            (select_element(
                "metodo_pagamento",
                "Método de Pagamento",
                true,
                None,
                PaymentMethod::ALL.into_iter().map(|method| (method.code().to_string(), method.label())),
                &form.metodo_pagamento,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Entity;

    #[test]
    fn first_student_is_preselected() {
        let students: Directory = [(3, "Ana".to_string()), (4, "Bia".to_string())]
            .into_iter()
            .collect();
        let html = Payment::render_fields(&Payment::blank_form(&students), &students, false).into_string();

        assert!(html.contains(r#"<option value="3" selected>Ana</option>"#));
        assert!(html.contains(r#"<option value="4">Bia</option>"#));
    }
}
