//! Application state and input handling.
//!
//! The app owns the router and one view model per screen. Backend calls run
//! on spawned tasks and report back through [`AppEvent::Api`]; leaving a
//! screen aborts its tasks and bumps the generation so that anything still
//! arriving for it is ignored.

use std::future::Future;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use client::views::landing::FEATURES;
use client::views::{
    AssignmentsView, LandingView, LoginView, NavAction, RegisterView, SubmissionsView, nav_links,
};
use client::{ApiClient, AuthState, Route, Router, Transport};
use shared::types::UiConfig;

use crate::event::{ApiEvent, AppEvent};
use crate::input::{FocusRing, edit};

// Focus slots per screen.
pub const LOGIN_USERNAME: usize = 0;
pub const LOGIN_PASSWORD: usize = 1;
pub const LOGIN_SUBMIT: usize = 2;
pub const LOGIN_REGISTER_LINK: usize = 3;

pub const REGISTER_USERNAME: usize = 0;
pub const REGISTER_PASSWORD: usize = 1;
pub const REGISTER_ROLE: usize = 2;
pub const REGISTER_SUBMIT: usize = 3;
pub const REGISTER_LOGIN_LINK: usize = 4;

pub const TEACHER_SEARCH: usize = 0;
pub const TEACHER_TITLE: usize = 1;
pub const TEACHER_DESCRIPTION: usize = 2;
pub const TEACHER_DUE_DATE: usize = 3;
pub const TEACHER_CREATE: usize = 4;

pub const STUDENT_LIST: usize = 0;
pub const STUDENT_SEARCH: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Nav,
    Page,
}

pub struct App<T> {
    pub router: Router,
    api: ApiClient<T>,
    ui: UiConfig,
    tx: UnboundedSender<AppEvent>,
    generation: u64,
    tasks: Vec<JoinHandle<()>>,

    pub pane: Pane,
    pub nav_focus: usize,
    pub focus: FocusRing,
    pub selected: usize,
    pub should_quit: bool,

    pub landing: LandingView,
    pub login: LoginView,
    pub register: RegisterView,
    pub assignments: AssignmentsView,
    pub submissions: SubmissionsView,
}

impl<T: Transport> App<T> {
    pub fn new(
        router: Router,
        api: ApiClient<T>,
        ui: UiConfig,
        tx: UnboundedSender<AppEvent>,
    ) -> Self {
        let now = Instant::now();
        let mut app = Self {
            landing: LandingView::new(ui.carousel_interval(), now),
            login: LoginView::new(),
            register: RegisterView::new(ui.register_redirect()),
            assignments: AssignmentsView::new(),
            submissions: SubmissionsView::new(ui.success_flash()),
            router,
            api,
            ui,
            tx,
            generation: 0,
            tasks: Vec::new(),
            pane: Pane::Page,
            nav_focus: 0,
            focus: FocusRing::default(),
            selected: 0,
            should_quit: false,
        };
        let current = app.router.current();
        app.enter(current);
        app
    }

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn auth_state(&self) -> AuthState {
        self.router.auth_state()
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    // -----------------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------------

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize => {}
            AppEvent::Tick => self.tick(Instant::now()),
            AppEvent::Api { generation, event } => self.handle_api(generation, event),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        match self.route() {
            Route::Landing => {
                self.landing.carousel.tick(now);
            }
            Route::Register if self.register.redirect_due(now) => {
                info!("Registration complete, moving to /login");
                self.go(Route::Login);
            }
            Route::StudentSubmissions => self.submissions.expire_flash(now),
            _ => {}
        }
    }

    pub fn handle_api(&mut self, generation: u64, event: ApiEvent) {
        if generation != self.generation {
            debug!(
                "Dropping result for generation {} (now {})",
                generation, self.generation
            );
            return;
        }

        match event {
            ApiEvent::Login(result) => {
                if let Some(landed) = self.login.finish_login(&mut self.router, result) {
                    self.enter(landed);
                }
            }
            ApiEvent::Register(result) => self.register.finish_register(result, Instant::now()),
            ApiEvent::Assignments(result) => match self.route() {
                Route::Teacher => self.assignments.finish_load(result),
                Route::StudentSubmissions => {
                    self.submissions.finish_load(result);
                    self.clamp_selection();
                }
                _ => {}
            },
            ApiEvent::AssignmentCreated(result) => {
                if self.assignments.finish_create(result) {
                    self.focus.set_len(self.teacher_slots());
                    self.load_assignments();
                }
            }
            ApiEvent::Submitted {
                assignment_id,
                result,
            } => self
                .submissions
                .finish_submit(assignment_id, result, Instant::now()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        if key.code == KeyCode::Esc {
            self.pane = match self.pane {
                Pane::Nav => Pane::Page,
                Pane::Page => Pane::Nav,
            };
            return;
        }

        match self.pane {
            Pane::Nav => self.handle_nav_key(key),
            Pane::Page => match self.route() {
                Route::Landing => self.handle_landing_key(key),
                Route::Login => self.handle_login_key(key),
                Route::Register => self.handle_register_key(key),
                Route::Teacher => self.handle_teacher_key(key),
                Route::StudentSubmissions => self.handle_student_key(key),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn go(&mut self, route: Route) {
        let landed = self.router.go(route);
        self.enter(landed);
    }

    pub fn logout(&mut self) {
        let landed = self.router.logout();
        self.enter(landed);
    }

    /// Set up a freshly shown screen.
    fn enter(&mut self, route: Route) {
        self.abort_tasks();
        self.generation += 1;

        self.pane = Pane::Page;
        self.selected = 0;
        let links = nav_links(&self.auth_state(), route);
        self.nav_focus = links.iter().position(|l| l.active).unwrap_or(0);

        match route {
            Route::Landing => {
                self.landing = LandingView::new(self.ui.carousel_interval(), Instant::now());
                let actions = LandingView::call_to_action(&self.auth_state()).len();
                self.focus = FocusRing::new(actions);
            }
            Route::Login => {
                self.login = LoginView::new();
                self.focus = FocusRing::new(4);
            }
            Route::Register => {
                self.register = RegisterView::new(self.ui.register_redirect());
                self.focus = FocusRing::new(5);
            }
            Route::Teacher => {
                self.assignments = AssignmentsView::new();
                self.focus = FocusRing::new(self.teacher_slots());
                self.load_assignments();
            }
            Route::StudentSubmissions => {
                self.submissions = SubmissionsView::new(self.ui.success_flash());
                self.focus = FocusRing::new(2);
                self.load_assignments();
            }
        }

        debug!("Entered {} (generation {})", route, self.generation);
    }

    fn abort_tasks(&mut self) {
        for task in self.tasks.drain(..) {
            if !task.is_finished() {
                debug!("Aborting in-flight request");
                task.abort();
            }
        }
    }

    /// Run a backend call in the background and deliver its outcome as an
    /// [`AppEvent::Api`] tagged with the current generation.
    fn spawn<F, Fut>(&mut self, job: F)
    where
        F: FnOnce(ApiClient<T>) -> Fut,
        Fut: Future<Output = ApiEvent> + Send + 'static,
    {
        let generation = self.generation;
        let tx = self.tx.clone();
        let request = job(self.api.clone());

        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(async move {
            let event = request.await;
            let _ = tx.send(AppEvent::Api { generation, event });
        }));
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    fn load_assignments(&mut self) {
        let started = match self.route() {
            Route::Teacher => self.assignments.begin_load(),
            Route::StudentSubmissions => self.submissions.begin_load(),
            _ => false,
        };

        if started {
            self.spawn(|api| async move { ApiEvent::Assignments(api.list_assignments().await) });
        }
    }

    // -----------------------------------------------------------------------
    // Navbar
    // -----------------------------------------------------------------------

    fn handle_nav_key(&mut self, key: KeyEvent) {
        let links = nav_links(&self.auth_state(), self.route());
        if links.is_empty() {
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::BackTab => {
                self.nav_focus = (self.nav_focus + links.len() - 1) % links.len();
            }
            KeyCode::Right | KeyCode::Tab => {
                self.nav_focus = (self.nav_focus + 1) % links.len();
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => self.go(Route::Landing),
            KeyCode::Enter => match links[self.nav_focus.min(links.len() - 1)].action {
                NavAction::Go(route) => self.go(route),
                NavAction::Logout => self.logout(),
            },
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Landing
    // -----------------------------------------------------------------------

    fn handle_landing_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        let carousel = &mut self.landing.carousel;

        match key.code {
            KeyCode::Left => {
                let index = (carousel.index() + FEATURES.len() - 1) % FEATURES.len();
                carousel.select(index, now);
            }
            KeyCode::Right => carousel.select(carousel.index() + 1, now),
            KeyCode::Tab | KeyCode::Down => self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus.prev(),
            KeyCode::Enter => {
                let actions = LandingView::call_to_action(&self.auth_state());
                if let Some(action) = actions.get(self.focus.index()) {
                    self.go(action.target);
                }
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------------

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus.prev(),
            KeyCode::Enter if self.focus.is(LOGIN_REGISTER_LINK) => self.go(Route::Register),
            KeyCode::Enter => self.submit_login(),
            _ => {
                let field = match self.focus.index() {
                    LOGIN_USERNAME => &mut self.login.form.user_name,
                    LOGIN_PASSWORD => &mut self.login.form.password,
                    _ => return,
                };
                edit(field, &key);
            }
        }
    }

    pub fn submit_login(&mut self) {
        if let Some(data) = self.login.begin_login() {
            self.spawn(move |api| async move { ApiEvent::Login(api.login(&data).await) });
        }
    }

    // -----------------------------------------------------------------------
    // Register
    // -----------------------------------------------------------------------

    fn handle_register_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus.prev(),
            KeyCode::Enter if self.focus.is(REGISTER_LOGIN_LINK) => self.go(Route::Login),
            KeyCode::Enter | KeyCode::Char(' ') if self.focus.is(REGISTER_ROLE) => {
                self.register.toggle_role();
            }
            KeyCode::Left | KeyCode::Right if self.focus.is(REGISTER_ROLE) => {
                self.register.toggle_role();
            }
            KeyCode::Enter => self.submit_register(),
            _ => {
                let field = match self.focus.index() {
                    REGISTER_USERNAME => &mut self.register.form.user_name,
                    REGISTER_PASSWORD => &mut self.register.form.password,
                    _ => return,
                };
                edit(field, &key);
            }
        }
    }

    pub fn submit_register(&mut self) {
        if let Some(data) = self.register.begin_register() {
            self.spawn(move |api| async move { ApiEvent::Register(api.register(&data).await) });
        }
    }

    // -----------------------------------------------------------------------
    // Teacher dashboard
    // -----------------------------------------------------------------------

    fn teacher_slots(&self) -> usize {
        if self.assignments.show_form {
            TEACHER_CREATE + 1
        } else {
            TEACHER_SEARCH + 1
        }
    }

    fn handle_teacher_key(&mut self, key: KeyEvent) {
        if self.handle_list_chord(&key) {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('n') if ctrl => {
                self.assignments.toggle_form();
                self.focus.set_len(self.teacher_slots());
                self.focus
                    .focus(if self.assignments.show_form { TEACHER_TITLE } else { TEACHER_SEARCH });
            }
            KeyCode::Tab | KeyCode::Down => self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus.prev(),
            KeyCode::Enter if self.focus.index() >= TEACHER_TITLE => self.submit_assignment(),
            KeyCode::Enter => {}
            _ => {
                let field = match self.focus.index() {
                    TEACHER_SEARCH => &mut self.assignments.query.search,
                    TEACHER_TITLE => &mut self.assignments.form.title,
                    TEACHER_DESCRIPTION => &mut self.assignments.form.description,
                    TEACHER_DUE_DATE => &mut self.assignments.form.due_date,
                    _ => return,
                };
                edit(field, &key);
            }
        }
    }

    pub fn submit_assignment(&mut self) {
        if let Some(data) = self.assignments.begin_create() {
            self.spawn(move |api| async move {
                ApiEvent::AssignmentCreated(api.create_assignment(&data).await)
            });
        }
    }

    // -----------------------------------------------------------------------
    // Student submissions
    // -----------------------------------------------------------------------

    /// Assignment id under the cursor, after filtering and sorting.
    pub fn selected_assignment(&self) -> Option<i64> {
        self.submissions
            .visible(self.today())
            .get(self.selected)
            .map(|a| a.id)
    }

    fn clamp_selection(&mut self) {
        let visible = self.submissions.visible(self.today()).len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    fn handle_student_key(&mut self, key: KeyEvent) {
        if self.handle_list_chord(&key) {
            self.clamp_selection();
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => self.focus.next(),
            KeyCode::Up if self.focus.is(STUDENT_LIST) => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down if self.focus.is(STUDENT_LIST) => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Enter if self.focus.is(STUDENT_LIST) => self.submit_selected(),
            KeyCode::Enter | KeyCode::Down => self.focus.focus(STUDENT_LIST),
            _ if self.focus.is(STUDENT_SEARCH) => {
                edit(&mut self.submissions.query.search, &key);
                self.clamp_selection();
            }
            _ => {
                if let Some(id) = self.selected_assignment()
                    && !self.submissions.is_submitting(id)
                {
                    edit(self.submissions.draft_mut(id), &key);
                }
            }
        }
    }

    pub fn submit_selected(&mut self) {
        let Some(assignment_id) = self.selected_assignment() else {
            return;
        };

        if let Some(submission) = self.submissions.begin_submit(assignment_id) {
            self.spawn(move |api| async move {
                ApiEvent::Submitted {
                    assignment_id,
                    result: api.submit(&submission).await,
                }
            });
        }
    }

    // -----------------------------------------------------------------------
    // Shared list chords
    // -----------------------------------------------------------------------

    /// Ctrl+R reload, Ctrl+F status filter, Ctrl+S sort key, Ctrl+D order.
    fn handle_list_chord(&mut self, key: &KeyEvent) -> bool {
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        let query = match self.route() {
            Route::Teacher => &mut self.assignments.query,
            Route::StudentSubmissions => &mut self.submissions.query,
            _ => return false,
        };

        match key.code {
            KeyCode::Char('f') => query.status = query.status.next(),
            KeyCode::Char('s') => query.sort = query.sort.next(),
            KeyCode::Char('d') => query.descending = !query.descending,
            KeyCode::Char('r') => self.load_assignments(),
            _ => return false,
        }
        true
    }
}

impl<T> Drop for App<T> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use bytes::Bytes;
    use http::{Request, Response, StatusCode};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use client::{ApiError, MemoryStore, SessionStore};

    /// Answers every request with the same status and body.
    #[derive(Clone)]
    struct Canned {
        status: StatusCode,
        body: Bytes,
        calls: Arc<AtomicUsize>,
    }

    impl Canned {
        fn new(status: StatusCode, body: impl Into<String>) -> Self {
            Self {
                status,
                body: Bytes::from(body.into()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Transport for Canned {
        async fn send(&self, _request: Request<Bytes>) -> Result<Response<Bytes>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Response::builder()
                .status(self.status)
                .body(self.body.clone())
                .unwrap())
        }
    }

    fn token(payload: &str) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
    }

    fn app_with(
        store: MemoryStore,
        start: &str,
        transport: Canned,
    ) -> (App<Canned>, UnboundedReceiver<AppEvent>, Arc<MemoryStore>) {
        let store = Arc::new(store);
        let dyn_store: Arc<dyn SessionStore> = store.clone();
        let router = Router::new(dyn_store.clone(), start);
        let api = ApiClient::new("http://api.test", transport, dyn_store);
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(router, api, UiConfig::default(), tx), rx, store)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<T: Transport>(app: &mut App<T>, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    async fn pump<T: Transport>(app: &mut App<T>, rx: &mut UnboundedReceiver<AppEvent>) {
        let event = rx.recv().await.unwrap();
        app.handle_event(event);
    }

    #[tokio::test]
    async fn typing_then_enter_logs_in_as_teacher() {
        let body = format!(r#"{{"token":"{}"}}"#, token(r#"{"sub":"t","role":"TEACHER"}"#));
        let (mut app, mut rx, store) =
            app_with(MemoryStore::new(), "/login", Canned::new(StatusCode::OK, body));

        type_text(&mut app, "tina");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "pw");
        assert_eq!(app.login.form.user_name, "tina");
        assert_eq!(app.login.form.password, "pw");

        app.handle_key(key(KeyCode::Enter));
        assert!(app.login.state.loading);

        pump(&mut app, &mut rx).await;
        assert_eq!(app.route(), Route::Teacher);
        assert!(store.credential().is_some());
    }

    #[tokio::test]
    async fn stale_results_are_dropped_after_navigation() {
        let (mut app, _rx, _) = app_with(
            MemoryStore::new(),
            "/register",
            Canned::new(StatusCode::OK, "{}"),
        );
        let old = app.generation();

        app.go(Route::Login);
        assert_ne!(app.generation(), old);

        app.handle_api(old, ApiEvent::Register(Ok(())));
        assert_eq!(app.register.state.success, None);
        assert_eq!(app.route(), Route::Login);
    }

    #[tokio::test]
    async fn empty_submission_sends_nothing() {
        let student = token(r#"{"sub":"s","role":"STUDENT"}"#);
        let transport = Canned::new(
            StatusCode::OK,
            r#"[{"id":4,"title":"Essay","description":"","dueDate":"2099-01-01"}]"#,
        );
        let calls = Arc::clone(&transport.calls);
        let (mut app, mut rx, _) =
            app_with(MemoryStore::with_credential(student), "/student", transport);

        pump(&mut app, &mut rx).await;
        assert_eq!(app.selected_assignment(), Some(4));
        let after_load = calls.load(Ordering::SeqCst);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(calls.load(Ordering::SeqCst), after_load);
        assert_eq!(
            app.submissions.state.error.as_deref(),
            Some("Please provide a file URL before submitting!")
        );
    }

    #[tokio::test]
    async fn register_redirects_to_login_after_delay() {
        let (mut app, mut rx, _) = app_with(
            MemoryStore::new(),
            "/register",
            Canned::new(StatusCode::OK, "{}"),
        );

        type_text(&mut app, "newbie");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "pw");
        app.handle_key(key(KeyCode::Enter));
        pump(&mut app, &mut rx).await;

        assert!(app.register.state.success.is_some());
        app.tick(Instant::now() + app.ui.register_redirect());
        assert_eq!(app.route(), Route::Login);
    }

    #[tokio::test]
    async fn navbar_logout_returns_to_login() {
        let teacher = token(r#"{"sub":"t","role":"TEACHER"}"#);
        let (mut app, _rx, store) = app_with(
            MemoryStore::with_credential(teacher),
            "/teacher",
            Canned::new(StatusCode::OK, "[]"),
        );

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.pane, Pane::Nav);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.route(), Route::Login);
        assert_eq!(store.credential(), None);
    }

    #[tokio::test]
    async fn anonymous_start_on_teacher_lands_on_login() {
        let (app, _rx, _) = app_with(
            MemoryStore::new(),
            "/teacher",
            Canned::new(StatusCode::OK, "[]"),
        );
        assert_eq!(app.route(), Route::Login);
        assert_eq!(app.in_flight(), 0);
    }
}
