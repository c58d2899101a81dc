use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use client::ApiError;
use shared::types::{Assignment, LoginResponse};

/// Outcome of a backend call made on a background task.
#[derive(Debug)]
pub enum ApiEvent {
    Login(Result<LoginResponse, ApiError>),
    Register(Result<(), ApiError>),
    Assignments(Result<Vec<Assignment>, ApiError>),
    AssignmentCreated(Result<(), ApiError>),
    Submitted {
        assignment_id: i64,
        result: Result<(), ApiError>,
    },
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// `generation` identifies the screen that issued the request; results
    /// for a screen the user already left are dropped.
    Api { generation: u64, event: ApiEvent },
}

/// Merges terminal input, the redraw tick and request results into one
/// channel.
pub struct EventHandler {
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let input_tx = tx.clone();
        std::thread::spawn(move || read_terminal(input_tx));

        let tick_tx = tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { tx, rx }
    }

    pub fn sender(&self) -> UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Blocking crossterm reader. Exits once the receiver is gone.
fn read_terminal(tx: UnboundedSender<AppEvent>) {
    loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => {}
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            Err(e) => {
                error!("Terminal poll failed: {}", e);
                break;
            }
        }

        let forwarded = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(AppEvent::Key(key)),
            Ok(Event::Resize(_, _)) => tx.send(AppEvent::Resize),
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Terminal read failed: {}", e);
                break;
            }
        };

        if forwarded.is_err() {
            break;
        }
    }
    debug!("Terminal reader stopped");
}
