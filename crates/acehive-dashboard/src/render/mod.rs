//! Server-rendered HTML pages
//!
//! Pages are plain strings built with `format!`. Every value that comes from
//! the backend or the user goes through [`escape`] first.

mod browse;
mod editor;
mod summary;

use crate::components::{ActiveView, Shell, View};

/// Escape text for use in element content and quoted attributes
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// A form with one submit button posting to `action`
fn post_button(action: &str, label: &str, class: &str, disabled: bool) -> String {
    format!(
        r#"<form method="post" action="{action}" class="d-inline"><button type="submit" class="{class}"{disabled}>{label}</button></form>"#,
        action = escape(action),
        disabled = if disabled { " disabled" } else { "" },
        label = escape(label),
    )
}

/// Spinner shown while a fetch is outstanding
fn spinner() -> &'static str {
    r#"<div class="d-flex justify-content-center my-4"><div class="spinner-border" role="status"><span class="visually-hidden">Loading...</span></div></div>"#
}

/// Alert box
fn alert(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="alert alert-{kind}" role="alert">{message}</div>"#,
        message = escape(message),
    )
}

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body class="bg-light">
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

/// Sign-in screen
#[must_use]
pub fn entry_page(email: &str, error: Option<&str>) -> String {
    let error = error.map(|message| alert("danger", message)).unwrap_or_default();
    let body = format!(
        r#"<main class="container" style="max-width: 420px; margin-top: 10vh;">
<h1 class="h3 mb-4 text-center">Acehive Admin</h1>
{error}
<form method="post" action="/login" class="card card-body shadow-sm">
<div class="mb-3"><label class="form-label" for="email">Email</label><input class="form-control" type="email" id="email" name="email" value="{email}" autocomplete="username"></div>
<div class="mb-3"><label class="form-label" for="password">Password</label><input class="form-control" type="password" id="password" name="password" autocomplete="current-password"></div>
<button type="submit" class="btn btn-primary w-100">Sign in</button>
</form>
</main>"#,
        email = escape(email),
    );
    document("Acehive Admin - Sign in", &body)
}

/// Navbar, sidebar and the mounted view
#[must_use]
pub fn dashboard_page(shell: &Shell, backend: &str) -> String {
    let current = shell.view();
    let sidebar: String = View::ALL
        .into_iter()
        .map(|view| {
            let class = if view == current {
                "btn btn-link nav-link text-white fw-bold"
            } else {
                "btn btn-link nav-link text-white-50"
            };
            format!(
                r#"<li class="nav-item">{}</li>"#,
                post_button(&format!("/view/{}", view.as_str()), view.label(), class, false)
            )
        })
        .collect();

    let main = match shell.active() {
        ActiveView::Summary(panel) => summary::render(panel),
        ActiveView::Browse(view) => browse::render(view),
        ActiveView::Edit(view) => editor::render(view),
    };

    let body = format!(
        r#"<nav class="navbar navbar-dark bg-dark px-3">
<span class="navbar-brand">Acehive</span>
<span class="navbar-text small text-white-50">{backend}</span>
{logout}
</nav>
<div class="container-fluid">
<div class="row">
<aside class="col-md-2 bg-secondary min-vh-100 py-3"><ul class="nav flex-column">{sidebar}</ul></aside>
<main class="col-md-10 p-4" data-view="{view}">
{main}
</main>
</div>
</div>"#,
        backend = escape(backend),
        logout = post_button("/logout", "Logout", "btn btn-outline-light btn-sm", false),
        view = current.as_str(),
    );
    document(&format!("Acehive Admin - {}", current.label()), &body)
}

/// Minimal page for a failed action
#[must_use]
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        r#"<main class="container mt-5">
<h1 class="h4">Error {status}</h1>
{alert}
<a class="btn btn-primary" href="/dashboard">Back to dashboard</a>
</main>"#,
        alert = alert("danger", message),
    );
    document("Acehive Admin - Error", &body)
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_entry_page_escapes_email_and_error() {
        let html = entry_page("<x>@y", Some("Invalid <login>"));
        assert!(html.contains("value=\"&lt;x&gt;@y\""));
        assert!(html.contains("Invalid &lt;login&gt;"));
        assert!(html.contains(r#"action="/login""#));
    }

    #[test]
    fn test_dashboard_page_has_navigation() {
        let html = dashboard_page(&Shell::new(), "memory");
        assert!(html.contains(r#"action="/view/database""#));
        assert!(html.contains(r#"action="/view/edit""#));
        assert!(html.contains(r#"action="/logout""#));
        assert!(html.contains(r#"data-view="content""#));
    }
}
