//! Server-rendered HTML pages.
//!
//! Every piece of user-supplied text goes through [`escape`].

use axum::response::Html;
use forms::{FormError, FormErrors, LoginForm, SignupForm, SleepRecordForm};
use std::fmt::Write;
use storage::SleepRecord;

use crate::auth::{CSRF_FIELD, LOGIN_URL};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Per-request values the layout needs
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Logged-in username, if any
    pub username: Option<&'a str>,
    pub csrf_token: &'a str,
}

/// Escape text for HTML bodies and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, ctx: &PageContext<'_>, body: &str) -> Html<String> {
    let nav = match ctx.username {
        Some(username) => format!(
            r#"<span>Signed in as <strong>{user}</strong></span>
      <a href="/">My sleep</a> <a href="/add/">Add record</a>
      <form method="post" action="/accounts/logout/" class="inline">{csrf}<button type="submit">Log out</button></form>"#,
            user = escape(username),
            csrf = csrf_input(ctx.csrf_token),
        ),
        None => format!(r#"<a href="{LOGIN_URL}">Log in</a> <a href="/signup/">Sign up</a>"#),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} | SleepLog</title>
</head>
<body>
  <header>
    <h1>SleepLog</h1>
    <nav>
      {nav}
    </nav>
  </header>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn csrf_input(token: &str) -> String {
    format!(
        r#"<input type="hidden" name="{CSRF_FIELD}" value="{}">"#,
        escape(token)
    )
}

fn error_list(errors: &[FormError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<ul class="errorlist">"#);
    for error in errors {
        let _ = write!(out, "<li>{}</li>", escape(&error.to_string()));
    }
    out.push_str("</ul>");
    out
}

fn field(
    label: &str,
    name: &str,
    input_type: &str,
    value: &str,
    errors: &FormErrors,
) -> String {
    format!(
        r#"    <p>
      <label for="id_{name}">{label}</label>
      <input type="{input_type}" name="{name}" id="id_{name}" value="{value}">
      {errors}
    </p>
"#,
        value = escape(value),
        errors = error_list(errors.field(name)),
    )
}

pub fn signup_page(ctx: &PageContext<'_>, form: &SignupForm, errors: &FormErrors) -> Html<String> {
    let mut body = String::from("    <h2>Sign up</h2>\n");
    let _ = write!(
        body,
        r#"    <form method="post" action="/signup/">
    {csrf}
    {non_field}
{username}{password1}{password2}    <button type="submit">Sign up</button>
    </form>
"#,
        csrf = csrf_input(ctx.csrf_token),
        non_field = error_list(errors.non_field()),
        username = field("Username", "username", "text", &form.username, errors),
        password1 = field("Password", "password1", "password", "", errors),
        password2 = field("Password confirmation", "password2", "password", "", errors),
    );
    layout("Sign up", ctx, &body)
}

pub fn login_page(ctx: &PageContext<'_>, form: &LoginForm, errors: &FormErrors) -> Html<String> {
    let mut body = String::from("    <h2>Log in</h2>\n");
    let _ = write!(
        body,
        r#"    <form method="post" action="{LOGIN_URL}">
    {csrf}
    <input type="hidden" name="next" value="{next}">
    {non_field}
{username}{password}    <button type="submit">Log in</button>
    </form>
    <p>No account yet? <a href="/signup/">Sign up</a></p>
"#,
        csrf = csrf_input(ctx.csrf_token),
        next = escape(&form.next),
        non_field = error_list(errors.non_field()),
        username = field("Username", "username", "text", &form.username, errors),
        password = field("Password", "password", "password", "", errors),
    );
    layout("Log in", ctx, &body)
}

pub fn list_page(
    ctx: &PageContext<'_>,
    records: &[SleepRecord],
    date_filter: Option<&str>,
) -> Html<String> {
    let mut body = String::from("    <h2>My sleep records</h2>\n");
    let _ = write!(
        body,
        r#"    <form method="get" action="/">
      <label for="id_date">Date</label>
      <input type="date" name="date" id="id_date" value="{date}">
      <button type="submit">Filter</button>
      <a href="/">Clear</a>
    </form>
"#,
        date = escape(date_filter.unwrap_or("")),
    );

    if records.is_empty() {
        body.push_str("    <p>No sleep records found.</p>\n");
    } else {
        body.push_str(
            "    <table>\n      <thead><tr><th>Sleep</th><th>Wake</th><th>Duration</th><th>Notes</th></tr></thead>\n      <tbody>\n",
        );
        for record in records {
            let _ = writeln!(
                body,
                "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                record.sleep_time.format(DISPLAY_FORMAT),
                record.wake_time.format(DISPLAY_FORMAT),
                escape(&record.duration_display()),
                escape(record.notes.as_deref().unwrap_or("")),
            );
        }
        body.push_str("      </tbody>\n    </table>\n");
    }
    body.push_str(r#"    <p><a href="/add/">Add a record</a></p>"#);
    body.push('\n');
    layout("My sleep", ctx, &body)
}

pub fn add_page(ctx: &PageContext<'_>, form: &SleepRecordForm, errors: &FormErrors) -> Html<String> {
    let mut body = String::from("    <h2>Add sleep record</h2>\n");
    let _ = write!(
        body,
        r#"    <form method="post" action="/add/">
    {csrf}
    {non_field}
{sleep_time}{wake_time}    <p>
      <label for="id_notes">Notes</label>
      <textarea name="notes" id="id_notes">{notes}</textarea>
      {notes_errors}
    </p>
    <button type="submit">Save</button>
    </form>
"#,
        csrf = csrf_input(ctx.csrf_token),
        non_field = error_list(errors.non_field()),
        sleep_time = field("Sleep time", "sleep_time", "datetime-local", &form.sleep_time, errors),
        wake_time = field("Wake time", "wake_time", "datetime-local", &form.wake_time, errors),
        notes = escape(&form.notes),
        notes_errors = error_list(errors.field("notes")),
    );
    layout("Add record", ctx, &body)
}

pub fn forbidden_page() -> Html<String> {
    let ctx = PageContext {
        username: None,
        csrf_token: "",
    };
    layout(
        "Forbidden",
        &ctx,
        "    <h2>403 Forbidden</h2>\n    <p>CSRF verification failed. Request aborted.</p>\n",
    )
}

pub fn error_page() -> Html<String> {
    let ctx = PageContext {
        username: None,
        csrf_token: "",
    };
    layout(
        "Server error",
        &ctx,
        "    <h2>Server error</h2>\n    <p>Something went wrong. Please try again later.</p>\n",
    )
}
