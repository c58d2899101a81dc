use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Wrap};

use client::views::landing::{FEATURES, HERO_SUBTITLE, HERO_TITLE};
use client::views::{LandingView, ListQuery, ViewState, nav_links};
use client::{Route, Transport};
use shared::types::{DueStatus, Role};

use crate::app::*;
use crate::input::masked;

const ACCENT: Color = Color::Cyan;
const FOCUS: Color = Color::Yellow;

pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let [nav, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_navbar(frame, nav, app);

    match app.route() {
        Route::Landing => render_landing(frame, body, app),
        Route::Login => render_login(frame, body, app),
        Route::Register => render_register(frame, body, app),
        Route::Teacher => render_teacher(frame, body, app),
        Route::StudentSubmissions => render_student(frame, body, app),
    }

    render_footer(frame, footer, app);
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn render_navbar<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let auth = app.auth_state();
    let mut spans = vec![
        Span::styled(
            " EduHub ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    for (i, link) in nav_links(&auth, app.route()).iter().enumerate() {
        let mut style = Style::default();
        if link.active {
            style = style.fg(ACCENT).add_modifier(Modifier::UNDERLINED);
        }
        if app.pane == Pane::Nav && i == app.nav_focus {
            style = style.fg(FOCUS).add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!(" {} ", link.label), style));
        spans.push(Span::raw(" "));
    }

    if let Some(session) = auth.session() {
        let who = if session.subject.is_empty() {
            session.role.to_string()
        } else {
            format!("{} ({})", session.subject, session.role)
        };
        spans.push(Span::styled(
            format!("  signed in as {}", who),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::bordered()
        .title(format!(" {} ", app.route().title()))
        .border_style(border(app.pane == Pane::Nav));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_footer<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let hints = match (app.pane, app.route()) {
        (Pane::Nav, _) => "←/→ choose  Enter open  h home  q quit  Esc back to page",
        (_, Route::Landing) => "←/→ features  Tab choose  Enter go  Esc menu  Ctrl+C quit",
        (_, Route::Login | Route::Register) => {
            "Tab next field  Enter submit  Esc menu  Ctrl+C quit"
        }
        (_, Route::Teacher) => {
            "Ctrl+N new  Ctrl+F filter  Ctrl+S sort  Ctrl+D order  Ctrl+R reload  Esc menu"
        }
        (_, Route::StudentSubmissions) => {
            "↑/↓ select  type URL  Enter submit  Tab search  Ctrl+F/S/D list  Esc menu"
        }
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::DarkGray))];
    let pending = app.in_flight();
    if pending > 0 {
        spans.push(Span::styled(
            format!("  ⟳ {} request(s)", pending),
            Style::default().fg(FOCUS),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Landing
// ---------------------------------------------------------------------------

fn render_landing<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let [hero, carousel, actions] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Min(3),
    ])
    .areas(area);

    let hero_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            HERO_TITLE,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(HERO_SUBTITLE),
    ];
    frame.render_widget(
        Paragraph::new(hero_text).alignment(Alignment::Center),
        hero,
    );

    let feature = app.landing.carousel.current();
    let dots: String = (0..FEATURES.len())
        .map(|i| if i == app.landing.carousel.index() { "● " } else { "○ " })
        .collect();
    let feature_text = vec![
        Line::from(Span::styled(
            feature.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(feature.description),
        Line::from(""),
        Line::from(dots),
    ];
    frame.render_widget(
        Paragraph::new(feature_text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" Features ")),
        centered(carousel, 70, carousel.height),
    );

    let buttons: Vec<Span> = LandingView::call_to_action(&app.auth_state())
        .iter()
        .enumerate()
        .flat_map(|(i, action)| {
            [
                button(action.label, app.pane == Pane::Page && app.focus.is(i)),
                Span::raw("   "),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), Line::from(buttons)]).alignment(Alignment::Center),
        actions,
    );
}

// ---------------------------------------------------------------------------
// Login / Register
// ---------------------------------------------------------------------------

fn render_login<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let view = &app.login;
    let page = app.pane == Pane::Page;
    let card = centered(area, 50, 16);
    frame.render_widget(Block::bordered().title(" Sign In "), card);

    let [user, pass, submit, link, messages] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(inset(card));

    render_field(
        frame,
        user,
        "Username",
        &view.form.user_name,
        page && app.focus.is(LOGIN_USERNAME),
        false,
    );
    render_field(
        frame,
        pass,
        "Password",
        &view.form.password,
        page && app.focus.is(LOGIN_PASSWORD),
        true,
    );

    let label = if view.state.loading { "Signing in..." } else { "Sign In" };
    frame.render_widget(
        Paragraph::new(button(label, page && app.focus.is(LOGIN_SUBMIT)))
            .alignment(Alignment::Center),
        submit,
    );
    frame.render_widget(
        Paragraph::new(link_span(
            "Don't have an account? Register",
            page && app.focus.is(LOGIN_REGISTER_LINK),
        ))
        .alignment(Alignment::Center),
        link,
    );
    render_messages(frame, messages, &view.state);
}

fn render_register<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let view = &app.register;
    let page = app.pane == Pane::Page;
    let card = centered(area, 50, 19);
    frame.render_widget(Block::bordered().title(" Create Account "), card);

    let [user, pass, role, submit, link, messages] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(inset(card));

    render_field(
        frame,
        user,
        "Username",
        &view.form.user_name,
        page && app.focus.is(REGISTER_USERNAME),
        false,
    );
    render_field(
        frame,
        pass,
        "Password",
        &view.form.password,
        page && app.focus.is(REGISTER_PASSWORD),
        true,
    );

    let role_focused = page && app.focus.is(REGISTER_ROLE);
    let choice = |r: Role| {
        let selected = view.form.role == r;
        let text = if selected {
            format!("[x] {:?}", r)
        } else {
            format!("[ ] {:?}", r)
        };
        let mut style = Style::default();
        if selected {
            style = style.fg(ACCENT).add_modifier(Modifier::BOLD);
        }
        Span::styled(text, style)
    };
    let role_line = Line::from(vec![
        Span::styled(
            "I am a  ",
            if role_focused {
                Style::default().fg(FOCUS)
            } else {
                Style::default()
            },
        ),
        choice(Role::Student),
        Span::raw("   "),
        choice(Role::Teacher),
    ]);
    frame.render_widget(Paragraph::new(role_line), role);

    let label = if view.state.loading {
        "Creating account..."
    } else {
        "Create Account"
    };
    frame.render_widget(
        Paragraph::new(button(label, page && app.focus.is(REGISTER_SUBMIT)))
            .alignment(Alignment::Center),
        submit,
    );
    frame.render_widget(
        Paragraph::new(link_span(
            "Already have an account? Sign in",
            page && app.focus.is(REGISTER_LOGIN_LINK),
        ))
        .alignment(Alignment::Center),
        link,
    );
    render_messages(frame, messages, &view.state);
}

// ---------------------------------------------------------------------------
// Teacher dashboard
// ---------------------------------------------------------------------------

fn render_teacher<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let view = &app.assignments;
    let page = app.pane == Pane::Page;
    let today = app.today();
    let stats = view.stats(today);

    let form_height = if view.show_form { 12 } else { 0 };
    let [stats_area, filter_area, form_area, messages, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(form_height),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Total ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(stats.total.to_string()),
            Span::styled("   Active ", Style::default().fg(Color::Green)),
            Span::raw(stats.active.to_string()),
            Span::styled("   Overdue ", Style::default().fg(Color::Red)),
            Span::raw(stats.overdue.to_string()),
        ])),
        stats_area,
    );

    render_filter_bar(
        frame,
        filter_area,
        &view.query,
        page && app.focus.is(TEACHER_SEARCH),
    );

    if view.show_form {
        let [title, description, due, create] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .areas(form_area);

        render_field(
            frame,
            title,
            "Title",
            &view.form.title,
            page && app.focus.is(TEACHER_TITLE),
            false,
        );
        render_field(
            frame,
            description,
            "Description",
            &view.form.description,
            page && app.focus.is(TEACHER_DESCRIPTION),
            false,
        );
        render_field(
            frame,
            due,
            "Due date (YYYY-MM-DD)",
            &view.form.due_date,
            page && app.focus.is(TEACHER_DUE_DATE),
            false,
        );
        let label = if view.creating {
            "Creating..."
        } else {
            "Create Assignment"
        };
        frame.render_widget(
            Paragraph::new(button(label, page && app.focus.is(TEACHER_CREATE)))
                .alignment(Alignment::Center),
            create,
        );
    }

    render_messages(frame, messages, &view.state);

    let items: Vec<ListItem> = view
        .visible(today)
        .into_iter()
        .map(|a| {
            let status = a.due_status(today);
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(a.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    status_span(status),
                ]),
                Line::from(Span::styled(
                    format!("  Due {}  {}", a.formatted_due_date(), a.description),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let title = if view.state.loading {
        " Assignments (loading...) ".to_string()
    } else {
        format!(" Assignments ({}) ", items.len())
    };
    let empty = items.is_empty() && !view.state.loading;
    let list = List::new(items).block(Block::bordered().title(title));
    frame.render_widget(list, list_area);

    if empty {
        frame.render_widget(
            Paragraph::new("No assignments yet. Press Ctrl+N to create one.")
                .alignment(Alignment::Center),
            inset(list_area),
        );
    }
}

// ---------------------------------------------------------------------------
// Student submissions
// ---------------------------------------------------------------------------

fn render_student<T: Transport>(frame: &mut Frame, area: Rect, app: &App<T>) {
    let view = &app.submissions;
    let page = app.pane == Pane::Page;
    let today = app.today();
    let stats = view.stats(today);

    let [stats_area, filter_area, messages, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Your Progress  ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled("Total ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(stats.total.to_string()),
            Span::styled("   Active ", Style::default().fg(Color::Green)),
            Span::raw(stats.active.to_string()),
            Span::styled("   Due soon ", Style::default().fg(Color::Yellow)),
            Span::raw(stats.due_soon.to_string()),
            Span::styled("   Overdue ", Style::default().fg(Color::Red)),
            Span::raw(stats.overdue.to_string()),
        ])),
        stats_area,
    );

    render_filter_bar(
        frame,
        filter_area,
        &view.query,
        page && app.focus.is(STUDENT_SEARCH),
    );
    render_messages(frame, messages, &view.state);

    let list_focused = page && app.focus.is(STUDENT_LIST);
    let items: Vec<ListItem> = view
        .visible(today)
        .into_iter()
        .map(|a| {
            let submitting = view.is_submitting(a.id);
            let draft = view.draft(a.id);
            let url_line = if submitting {
                Span::styled("  Submitting...", Style::default().fg(FOCUS))
            } else if draft.is_empty() {
                Span::styled(
                    "  File URL: (type to enter)",
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::raw(format!("  File URL: {}", draft))
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(a.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    status_span(a.due_status(today)),
                ]),
                Line::from(Span::styled(
                    format!("  Due {}  {}", a.formatted_due_date(), a.description),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(url_line),
            ])
        })
        .collect();

    let title = if view.state.loading {
        " My Assignments (loading...) ".to_string()
    } else {
        format!(" My Assignments ({}) ", items.len())
    };
    let empty = items.is_empty() && !view.state.loading;

    let list = List::new(items)
        .block(Block::bordered().title(title).border_style(border(list_focused)))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, list_area, &mut state);

    if empty {
        frame.render_widget(
            Paragraph::new("No assignments available.").alignment(Alignment::Center),
            inset(list_area),
        );
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    secret: bool,
) {
    let shown = if secret {
        masked(value)
    } else {
        value.to_string()
    };
    let text = if focused { format!("{}▏", shown) } else { shown };
    let block = Block::bordered()
        .title(format!(" {} ", label))
        .border_style(border(focused));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_filter_bar(frame: &mut Frame, area: Rect, query: &ListQuery, focused: bool) {
    let search = if focused {
        format!("{}▏", query.search)
    } else {
        query.search.clone()
    };
    let line = Line::from(vec![
        Span::raw(search),
        Span::styled(
            format!(
                "   [{}] sort: {} {}",
                query.status.label(),
                query.sort.label(),
                if query.descending { "↓" } else { "↑" }
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::bordered()
        .title(" Search ")
        .border_style(border(focused));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_messages(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = if let Some(error) = &state.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
    } else if let Some(success) = &state.success {
        Line::from(Span::styled(success.clone(), Style::default().fg(Color::Green)))
    } else {
        Line::from("")
    };
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn status_span(status: DueStatus) -> Span<'static> {
    let color = match status {
        DueStatus::Overdue => Color::Red,
        DueStatus::DueSoon(_) => Color::Yellow,
        DueStatus::Active => Color::Green,
    };
    Span::styled(format!("[{}]", status.label()), Style::default().fg(color))
}

fn button(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(FOCUS)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    };
    Span::styled(format!("[ {} ]", label), style)
}

fn link_span(label: &str, focused: bool) -> Span<'static> {
    let mut style = Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::UNDERLINED);
    if focused {
        style = style.fg(FOCUS).add_modifier(Modifier::BOLD);
    }
    Span::styled(label.to_string(), style)
}

fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUS)
    } else {
        Style::default()
    }
}

/// A `width` x `height` rect centered in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Inner area of a bordered block.
fn inset(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}
