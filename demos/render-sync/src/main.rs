//! Render-sync demo
//!
//! Simulates the server-side rendering use case: fetch intents spawn async
//! handlers that report back with `Did*` result actions, and rendering is
//! gated on a wait for both results. Run with `cargo run -p render-sync`.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;
use wait_dispatch::prelude::*;

#[derive(Clone, Debug)]
enum AppAction {
    UserFetch,
    UserDidLoad(String),
    PostsFetch,
    PostsDidLoad(Vec<String>),
    Wait(WaitFor),
}

impl Action for AppAction {
    fn name(&self) -> &'static str {
        match self {
            AppAction::UserFetch => "UserFetch",
            AppAction::UserDidLoad(_) => "UserDidLoad",
            AppAction::PostsFetch => "PostsFetch",
            AppAction::PostsDidLoad(_) => "PostsDidLoad",
            AppAction::Wait(_) => WAIT_FOR_ACTIONS,
        }
    }

    fn wait_for(&self) -> Option<&WaitFor> {
        match self {
            AppAction::Wait(request) => Some(request),
            _ => None,
        }
    }
}

#[derive(Default, Debug)]
struct AppState {
    user: Option<String>,
    posts: Vec<String>,
}

fn reducer(state: &mut AppState, action: AppAction) {
    match action {
        AppAction::UserDidLoad(user) => state.user = Some(user),
        AppAction::PostsDidLoad(posts) => state.posts = posts,
        _ => {}
    }
}

/// Fetch intents spawn async work; results come back through the channel.
fn handle_async(action: &AppAction, tx: mpsc::UnboundedSender<AppAction>) {
    match action {
        AppAction::UserFetch => {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(120)).await;
                let _ = tx.send(AppAction::UserDidLoad("ada".into()));
            });
        }
        AppAction::PostsFetch => {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(250)).await;
                let _ = tx.send(AppAction::PostsDidLoad(vec![
                    "Notes on the Analytical Engine".into(),
                    "On computable numbers".into(),
                ]));
            });
        }
        _ => {}
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut store =
        StoreWithMiddleware::new(AppState::default(), reducer, WaitForMiddleware::new());

    // Kick off the fetches, then register the render gate.
    for action in [AppAction::UserFetch, AppAction::PostsFetch] {
        handle_async(&action, tx.clone());
        store.dispatch(action);
    }

    let mut gate = store
        .dispatch(AppAction::Wait(
            wait_for(["UserDidLoad", "PostsDidLoad"]).with_timeout(Duration::from_secs(2)),
        ))
        .expect("wait dispatch returns a handle");

    info!(pending = store.middleware().len(), "waiting for data");

    let outcome = loop {
        tokio::select! {
            outcome = &mut gate => break outcome,
            Some(action) = rx.recv() => {
                handle_async(&action, tx.clone());
                store.dispatch(action);
            }
        }
    };

    match outcome {
        Ok(()) => info!(state = ?store.state(), "state ready, rendering"),
        Err(error) => info!(%error, "rendering without complete state"),
    }
}
