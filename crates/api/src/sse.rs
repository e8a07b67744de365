//! Server-Sent Events for the admin consoles.
//!
//! One stream per console carrying registrant change events plus the
//! periodic reconciliation hint pushed by the server.

#![allow(missing_docs)]

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream};
use techsprint_core::RegistrantEvent;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::{extractors::AuthAdmin, middleware::AppState};

/// Registrant change event stream.
async fn registrant_events(
    AuthAdmin(_admin): AuthAdmin,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    // Add initial connected event
    let initial = stream::once(async {
        Ok(Event::default()
            .json_data(&RegistrantEvent::Connected)
            .unwrap_or_else(|_| Event::default().data("connected")))
    });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/registrants", get(registrant_events))
}
