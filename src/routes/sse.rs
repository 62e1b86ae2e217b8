use crate::{data::EntityKind, state::AcademiaState};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use std::convert::Infallible;
use tokio::sync::broadcast::Receiver;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

///lagging receivers skip what they missed, the next event re-renders anyway
fn change_events(rx: Receiver<EntityKind>) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|kind| {
        kind.ok()
            .map(|kind| Ok(Event::default().event(kind.sse_event_name()).data("changed")))
    })
}

pub async fn sse_feed(
    State(state): State<AcademiaState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(change_events(state.subscribe_to_sse_feed())).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::channel;

    #[tokio::test]
    async fn every_change_becomes_an_event() {
        let (tx, rx) = channel(4);
        let events = change_events(rx);
        tokio::pin!(events);

        tx.send(EntityKind::Payments).unwrap();
        tx.send(EntityKind::Workouts).unwrap();
        drop(tx);

        let mut count = 0;
        while let Some(event) = events.next().await {
            assert!(event.is_ok());
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
