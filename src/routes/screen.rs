use crate::{
    container::{EntityContainer, View},
    data::Entity,
    maud_conveniences::{error_alert, form_submit_button, notification, table, title},
    state::AcademiaState,
};
use maud::{Markup, html};
use tokio::sync::Mutex;

/// How one entity shows up in the browser. Everything else about a screen
/// (loading, forms, deleting) is shared.
pub trait Screen: Entity {
    ///column titles, without the trailing actions column
    const HEADERS: &'static [&'static str];
    const FILTERABLE: bool = false;

    fn container(state: &AcademiaState) -> &Mutex<EntityContainer<Self>>;

    ///one cell per header
    fn render_cells(&self, lookups: &Self::Lookups) -> Vec<Markup>;

    fn render_fields(form: &Self::Form, lookups: &Self::Lookups, editing: bool) -> Markup;
}

fn screen_id<S: Screen>() -> String {
    format!("screen-{}", S::KIND.path())
}

/// The static frame of a screen: it loads itself once mounted, and
/// re-renders whenever the SSE feed says its collection changed.
pub fn screen_shell<S: Screen>() -> Markup {
    let kind = S::KIND;
    let path = kind.path();
    let id = screen_id::<S>();

    html! {
        section class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-5xl w-full flex flex-col space-y-4 mb-8" {
            h2 class="text-3xl font-bold text-center" {"Gerenciamento de " (kind.plural_title())}
            div id=(id) hx-get={"/internal/" (path) "/load"} hx-trigger="load" {
                p class="text-gray-400 italic" {"Carregando " (kind.plural()) "..."}
            }
            div hidden hx-get={"/internal/" (path)} hx-trigger={"sse:" (kind.sse_event_name())} hx-target={"#" (id)} {}
        }
    }
}

pub fn render_view<S: Screen>(container: &mut EntityContainer<S>, filter: Option<&str>) -> Markup {
    let notice = container.take_notice();

    html! {
        @if let Some(notice) = notice {
            (notification(&notice))
        }
        @match container.view() {
            View::List => {
                (render_list(container, filter))
            }
            View::Form { target, form, problems } => {
                (render_form::<S>(*target, form, problems, container.lookups()))
            }
        }
    }
}

fn render_list<S: Screen>(container: &EntityContainer<S>, filter: Option<&str>) -> Markup {
    let kind = S::KIND;
    let path = kind.path();
    let id = screen_id::<S>();
    let rows_id = format!("rows-{path}");

    let rows: Vec<Vec<Markup>> = container
        .filtered(filter)
        .map(|record| {
            let mut cells = record.render_cells(container.lookups());
            cells.push(html! {
                div class="flex flex-row space-x-2" {
                    button class="bg-yellow-600 hover:bg-yellow-800 font-bold py-1 px-3 rounded" hx-get={"/internal/" (path) "/edit"} hx-vals={"{\"id\": " (record.id()) "}"} hx-target={"#" (id)} {
                        "Editar"
                    }
                    button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-delete={"/internal/" (path)} hx-vals={"{\"id\": " (record.id()) "}"} hx-confirm={"Tem certeza que deseja excluir este " (kind.singular()) "?"} hx-target={"#" (id)} {
                        "Excluir"
                    }
                }
            });
            cells
        })
        .collect();

    let headers = S::HEADERS.iter().copied().chain(std::iter::once("Ações"));

    html! {
        div class="flex flex-row justify-between items-center" {
            (title(html! {"Lista de " (kind.plural_title())}))
            div class="flex flex-row space-x-2" {
                a href={"/" (path) "/export.csv"} class="bg-gray-600 hover:bg-gray-700 font-bold py-2 px-4 rounded" {"Exportar CSV"}
                button class="bg-green-600 hover:bg-green-800 font-bold py-2 px-4 rounded" hx-get={"/internal/" (path) "/new"} hx-target={"#" (id)} {
                    "Adicionar " (kind.singular_title())
                }
            }
        }
        @if let Some(error) = container.error() {
            (error_alert(error))
        }
        @if S::FILTERABLE {
            input type="search" name="filter" value=(filter.unwrap_or_default()) placeholder={"Filtrar " (kind.plural()) "..."}
                class="w-full bg-gray-700 text-gray-100 rounded px-4 py-2 border border-gray-600 focus:outline-none focus:ring focus:ring-blue-500 placeholder-gray-400"
                hx-get={"/internal/" (path)} hx-trigger="input changed delay:500ms, keyup[key=='Enter']"
                hx-target={"#" (rows_id)} hx-select={"#" (rows_id)} hx-swap="outerHTML";
        }
        div id=(rows_id) {
            (table(headers, rows, &format!("Nenhum {} encontrado.", kind.singular())))
        }
    }
}

fn render_form<S: Screen>(
    target: Option<i64>,
    form: &S::Form,
    problems: &[String],
    lookups: &S::Lookups,
) -> Markup {
    let kind = S::KIND;
    let path = kind.path();
    let id = screen_id::<S>();
    let editing = target.is_some();
    //the target travels with the form, never read back from the shared view
    let save_url = match target {
        Some(target) => format!("/internal/{path}/save?id={target}"),
        None => format!("/internal/{path}/save"),
    };

    html! {
        @if editing {
            (title(html! {"Editar " (kind.singular_title())}))
        } @else {
            (title(html! {"Cadastrar Novo " (kind.singular_title())}))
        }
        @if !problems.is_empty() {
            (error_alert(html! {
                ul class="list-disc list-inside" {
                    @for problem in problems {
                        li {(problem)}
                    }
                }
            }))
        }
        form hx-post=(save_url) hx-target={"#" (id)} class="p-4" {
            (S::render_fields(form, lookups, editing))
            div class="flex flex-row justify-end space-x-2" {
                button type="button" class="bg-gray-600 hover:bg-gray-700 font-bold py-2 px-4 rounded" hx-post={"/internal/" (path) "/cancel"} hx-target={"#" (id)} {
                    "Cancelar"
                }
                (form_submit_button(if editing { "Atualizar" } else { "Salvar" }))
            }
        }
    }
}
