use crate::{
    data::IdForm,
    error::AcademiaResult,
    routes::screen::{Screen, render_view, screen_shell},
    state::AcademiaState,
};
use axum::{
    Form,
    extract::{Query, State},
};
use maud::Markup;
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub struct FilterQuery {
    filter: Option<String>,
}

///which record a submitted form was opened for, absent when adding
#[derive(Deserialize, Debug, Default)]
pub struct TargetQuery {
    id: Option<i64>,
}

pub async fn get_screen<S: Screen>(State(state): State<AcademiaState>) -> Markup {
    state.render(S::KIND.plural_title(), screen_shell::<S>())
}

///always refetches, so this is also how a screen recovers from a failed load
pub async fn internal_load<S: Screen>(State(state): State<AcademiaState>) -> Markup {
    let mut container = S::container(&state).lock().await;
    container.load(state.api()).await;
    render_view(&mut *container, None)
}

pub async fn internal_get_view<S: Screen>(
    State(state): State<AcademiaState>,
    Query(FilterQuery { filter }): Query<FilterQuery>,
) -> Markup {
    let mut container = S::container(&state).lock().await;
    render_view(&mut *container, filter.as_deref())
}

pub async fn internal_get_new_form<S: Screen>(State(state): State<AcademiaState>) -> Markup {
    let mut container = S::container(&state).lock().await;
    container.add_new();
    render_view(&mut *container, None)
}

pub async fn internal_get_edit_form<S: Screen>(
    State(state): State<AcademiaState>,
    Query(IdForm { id }): Query<IdForm>,
) -> AcademiaResult<Markup> {
    let mut container = S::container(&state).lock().await;
    container.edit(id)?;
    Ok(render_view(&mut *container, None))
}

pub async fn internal_post_save<S: Screen>(
    State(state): State<AcademiaState>,
    Query(TargetQuery { id }): Query<TargetQuery>,
    Form(form): Form<S::Form>,
) -> Markup {
    let mut container = S::container(&state).lock().await;
    let changed = container.submit(state.api(), id, form).await;
    let markup = render_view(&mut *container, None);
    drop(container);

    if changed {
        state.send_sse_event(S::KIND);
    }
    markup
}

pub async fn internal_post_cancel<S: Screen>(State(state): State<AcademiaState>) -> Markup {
    let mut container = S::container(&state).lock().await;
    container.cancel();
    render_view(&mut *container, None)
}

pub async fn internal_delete<S: Screen>(
    State(state): State<AcademiaState>,
    Query(IdForm { id }): Query<IdForm>,
) -> Markup {
    let mut container = S::container(&state).lock().await;
    let changed = container.remove(state.api(), id).await;
    let markup = render_view(&mut *container, None);
    drop(container);

    //other open screens re-render from the feed
    if changed {
        state.send_sse_event(S::KIND);
    }
    markup
}
