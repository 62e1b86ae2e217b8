use crate::{
    routes::{
        crud::{
            get_screen, internal_delete, internal_get_edit_form, internal_get_new_form,
            internal_get_view, internal_load, internal_post_cancel, internal_post_save,
        },
        export::get_export_csv,
        screen::Screen,
    },
    state::AcademiaState,
};
use axum::{
    Router,
    routing::{get, post},
};

pub mod crud;
pub mod export;
pub mod index;
pub mod instructors;
pub mod payments;
pub mod screen;
pub mod sse;
pub mod students;
pub mod workouts;

/// Every route one screen needs, all under its collection path.
pub fn crud_router<S: Screen>() -> Router<AcademiaState> {
    let path = S::KIND.path();

    Router::new()
        .route(&format!("/{path}"), get(get_screen::<S>))
        .route(&format!("/{path}/export.csv"), get(get_export_csv::<S>))
        .route(
            &format!("/internal/{path}"),
            get(internal_get_view::<S>).delete(internal_delete::<S>),
        )
        .route(&format!("/internal/{path}/load"), get(internal_load::<S>))
        .route(&format!("/internal/{path}/new"), get(internal_get_new_form::<S>))
        .route(&format!("/internal/{path}/edit"), get(internal_get_edit_form::<S>))
        .route(&format!("/internal/{path}/save"), post(internal_post_save::<S>))
        .route(&format!("/internal/{path}/cancel"), post(internal_post_cancel::<S>))
}
