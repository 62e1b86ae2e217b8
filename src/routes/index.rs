use crate::{
    data::{instructor::Instructor, payment::Payment, student::Student, workout::Workout},
    routes::screen::screen_shell,
    state::AcademiaState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<AcademiaState>) -> Markup {
    state.render(
        "Início",
        html! {
            div class="w-full flex flex-col items-center" {
                (screen_shell::<Student>())
                (screen_shell::<Instructor>())
                (screen_shell::<Payment>())
                (screen_shell::<Workout>())
            }
        },
    )
}

pub async fn not_found(State(state): State<AcademiaState>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        state.render(
            "Página não encontrada",
            html! {
                div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full text-center" {
                    h1 class="text-4xl font-bold mb-4" {"404"}
                    p class="text-gray-300 mb-6" {"A página que você procura não existe."}
                    a href="/" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {
                        "Voltar ao início"
                    }
                }
            },
        ),
    )
}
