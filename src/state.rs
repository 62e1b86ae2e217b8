use crate::{
    api::RestClient,
    config::RuntimeConfiguration,
    container::{DeleteMode, EntityContainer},
    data::{
        EntityKind, instructor::Instructor, payment::Payment, student::Student, workout::Workout,
    },
    error::AcademiaResult,
};
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;
use tokio::sync::{
    Mutex,
    broadcast::{Receiver, Sender, channel},
};

#[derive(Clone, Debug)]
pub struct AcademiaState {
    api: RestClient,
    students: Arc<Mutex<EntityContainer<Student>>>,
    instructors: Arc<Mutex<EntityContainer<Instructor>>>,
    payments: Arc<Mutex<EntityContainer<Payment>>>,
    workouts: Arc<Mutex<EntityContainer<Workout>>>,
    sse_events_sender: Sender<EntityKind>,
}

impl AcademiaState {
    pub fn new(config: &RuntimeConfiguration) -> AcademiaResult<Self> {
        let api_config = config.api_config();
        let api = RestClient::new(&api_config)?;
        let (tx, _rx) = channel(16);

        Ok(Self {
            api,
            students: Arc::new(Mutex::new(EntityContainer::new(
                api_config.student_delete_mode(),
            ))),
            instructors: Arc::new(Mutex::new(EntityContainer::new(DeleteMode::Hard))),
            payments: Arc::new(Mutex::new(EntityContainer::new(DeleteMode::Hard))),
            workouts: Arc::new(Mutex::new(EntityContainer::new(DeleteMode::Hard))),
            sse_events_sender: tx,
        })
    }

    #[allow(clippy::unused_self)]
    pub fn render(&self, page_title: &str, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="pt-BR" {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Academia | " (page_title) }
                }
                body hx-ext="sse" sse-connect="/sse_feed" class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (render_nav())
                    main class="w-full flex flex-col items-center px-4 py-8" {
                        (markup)
                    }
                }
            }
        }
    }

    pub const fn api(&self) -> &RestClient {
        &self.api
    }

    pub fn students(&self) -> &Mutex<EntityContainer<Student>> {
        &self.students
    }

    pub fn instructors(&self) -> &Mutex<EntityContainer<Instructor>> {
        &self.instructors
    }

    pub fn payments(&self) -> &Mutex<EntityContainer<Payment>> {
        &self.payments
    }

    pub fn workouts(&self) -> &Mutex<EntityContainer<Workout>> {
        &self.workouts
    }

    pub fn subscribe_to_sse_feed(&self) -> Receiver<EntityKind> {
        self.sse_events_sender.subscribe()
    }

    pub fn send_sse_event(&self, kind: EntityKind) {
        //no open pages means no receivers, which is fine
        let _ = self.sse_events_sender.send(kind);
    }
}

fn render_nav() -> Markup {
    html! {
        nav class="w-full bg-gray-800 shadow-md px-8 py-4 flex flex-row items-center justify-between" {
            a href="/" class="text-xl font-extrabold tracking-tight" {
                "Sistema da " span class="text-indigo-400" {"Academia"}
            }
            div class="flex flex-row space-x-4" {
                @for kind in EntityKind::ALL {
                    a href={"/" (kind.path())} class="hover:text-blue-300 underline" {(kind.plural_title())}
                }
            }
        }
    }
}
