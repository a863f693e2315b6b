/// HTML rendering
///
/// Pages are assembled from plain strings. Every value that came from a
/// user (usernames, list names, item text, submitted form values) passes
/// through [`escape_html`] before it is written.

use axum::response::Html;
use listkeeper_shared::models::{item::Item, todo_list::TodoList};

use crate::{forms::FieldErrors, session::PageFrame};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #222; }
nav { background: #2f6f4f; padding: 0.6rem 1.5rem; }
nav a { color: #fff; margin-right: 1rem; text-decoration: none; }
main { max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
.flash { padding: 0.6rem 1rem; border-radius: 4px; margin-bottom: 0.6rem; }
.flash-success { background: #dff0d8; }
.flash-info { background: #d9edf7; }
.flash-danger { background: #f2dede; }
.field { margin-bottom: 0.8rem; }
.field label { display: block; font-weight: 600; }
.error { color: #a94442; font-size: 0.9rem; }
.done { text-decoration: line-through; color: #777; }
ul.items { list-style: none; padding: 0; }
"#;

/// Escapes text for use in element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, frame: &PageFrame, body: &str) -> Html<String> {
    let nav = if frame.authenticated {
        r#"<a href="/view/">My lists</a><a href="/create/">New list</a><a href="/logout">Logout</a>"#
    } else {
        r#"<a href="/login">Login</a><a href="/register">Register</a>"#
    };

    let mut flashes = String::new();
    for flash in &frame.flashes {
        flashes.push_str(&format!(
            r#"<div class="flash flash-{}">{}</div>"#,
            flash.level.as_str(),
            escape_html(&flash.message)
        ));
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Listkeeper</title>
<style>{STYLE}</style>
</head>
<body>
<nav>{nav}</nav>
<main>
{flashes}
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
    ))
}

fn csrf_input(frame: &PageFrame) -> String {
    format!(
        r#"<input type="hidden" name="csrf_token" value="{}">"#,
        escape_html(&frame.csrf_token)
    )
}

fn field(label: &str, name: &str, kind: &str, value: &str, errors: &FieldErrors) -> String {
    let mut html = format!(
        r#"<div class="field"><label for="{name}">{label}</label><input id="{name}" type="{kind}" name="{name}" value="{value}">"#,
        value = escape_html(value),
    );
    for message in errors.get(name) {
        html.push_str(&format!(r#"<div class="error">{}</div>"#, escape_html(message)));
    }
    html.push_str("</div>");
    html
}

fn form_errors(errors: &FieldErrors) -> String {
    errors
        .get("csrf_token")
        .iter()
        .map(|message| format!(r#"<div class="error">{}</div>"#, escape_html(message)))
        .collect()
}

pub fn register_page(frame: &PageFrame, username: &str, errors: &FieldErrors) -> Html<String> {
    let body = format!(
        r#"<h1>Register</h1>
<form method="post" action="/register">
{csrf}{form_errors}
{username}
{password}
{password2}
<button type="submit">submit</button>
</form>"#,
        csrf = csrf_input(frame),
        form_errors = form_errors(errors),
        username = field("Username", "username", "text", username, errors),
        password = field("Password", "password", "password", "", errors),
        password2 = field("Confirm Password", "password2", "password", "", errors),
    );

    layout("Register", frame, &body)
}

/// Login page; failed attempts come back here with only the username kept
pub fn login_page(frame: &PageFrame, username: &str) -> Html<String> {
    let no_errors = FieldErrors::new();
    let body = format!(
        r#"<h1>Login</h1>
<form method="post" action="/login">
{csrf}
{username}
{password}
<button type="submit">Login</button>
</form>"#,
        csrf = csrf_input(frame),
        username = field("Username", "username", "text", username, &no_errors),
        password = field("Password", "password", "password", "", &no_errors),
    );

    layout("Login", frame, &body)
}

pub fn create_page(frame: &PageFrame, name: &str, errors: &FieldErrors) -> Html<String> {
    let body = format!(
        r#"<h1>New todo list</h1>
<form method="post" action="/create/">
{csrf}{form_errors}
{name}
<button type="submit">Create</button>
</form>"#,
        csrf = csrf_input(frame),
        form_errors = form_errors(errors),
        name = field("Name", "name", "text", name, errors),
    );

    layout("New todo list", frame, &body)
}

pub fn lists_page(frame: &PageFrame, username: &str, lists: &[TodoList]) -> Html<String> {
    let mut body = format!("<h1>Todo lists of {}</h1>\n", escape_html(username));

    if lists.is_empty() {
        body.push_str(r#"<p>No lists yet. <a href="/create/">Create one</a>.</p>"#);
    } else {
        body.push_str("<ul>");
        for list in lists {
            body.push_str(&format!(
                r#"<li><a href="/index/{}">{}</a></li>"#,
                list.id,
                escape_html(&list.name)
            ));
        }
        body.push_str("</ul>");
    }

    layout("My lists", frame, &body)
}

/// A single list with its completion checkboxes and the new item box
pub fn list_page(frame: &PageFrame, list: &TodoList, items: &[Item]) -> Html<String> {
    let mut rows = String::new();
    for item in items {
        rows.push_str(&format!(
            r#"<li><label class="{class}"><input type="checkbox" name="c{id}" value="clicked"{checked}> {text}</label></li>"#,
            class = if item.complete { "done" } else { "" },
            id = item.id,
            checked = if item.complete { " checked" } else { "" },
            text = escape_html(&item.text),
        ));
    }

    let body = format!(
        r#"<h1>{name}</h1>
<form method="post" action="/index/{id}">
{csrf}
<ul class="items">{rows}</ul>
<button type="submit" name="save" value="save">Save</button>
<div class="field">
<input type="text" name="new" placeholder="New item">
<button type="submit" name="newItem" value="newItem">Add item</button>
</div>
</form>"#,
        name = escape_html(&list.name),
        id = list.id,
        csrf = csrf_input(frame),
    );

    layout(&list.name, frame, &body)
}

fn bare_frame() -> PageFrame {
    PageFrame {
        flashes: Vec::new(),
        authenticated: false,
        csrf_token: String::new(),
    }
}

pub fn not_found_page() -> Html<String> {
    layout(
        "Page not found",
        &bare_frame(),
        r#"<h1>Page not found</h1><p>The page you asked for does not exist. <a href="/view/">Back to your lists</a>.</p>"#,
    )
}

pub fn server_error_page() -> Html<String> {
    layout(
        "Server error",
        &bare_frame(),
        r#"<h1>Something went wrong</h1><p>Your last change was not saved. Please try again.</p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use listkeeper_shared::auth::session::{Flash, FlashLevel};

    fn frame() -> PageFrame {
        PageFrame {
            flashes: vec![Flash {
                level: FlashLevel::Info,
                message: "item(s) updated".to_string(),
            }],
            authenticated: true,
            csrf_token: "tok".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_list_page_renders_items() {
        let list = TodoList {
            id: 4,
            name: "Groceries <3".to_string(),
            user_id: 1,
            created_at: Utc::now(),
        };
        let items = vec![
            Item {
                id: 10,
                text: "eggs".to_string(),
                complete: false,
                todolist_id: 4,
                created_at: Utc::now(),
            },
            Item {
                id: 11,
                text: "<script>".to_string(),
                complete: true,
                todolist_id: 4,
                created_at: Utc::now(),
            },
        ];

        let Html(html) = list_page(&frame(), &list, &items);

        assert!(html.contains(r#"action="/index/4""#));
        assert!(html.contains("Groceries &lt;3"));
        assert!(html.contains(r#"name="c10" value="clicked">"#));
        assert!(html.contains(r#"name="c11" value="clicked" checked>"#));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"name="csrf_token" value="tok""#));
        assert!(html.contains(r#"class="flash flash-info">item(s) updated"#));
    }

    #[test]
    fn test_lists_page_links_each_list() {
        let lists = vec![
            TodoList {
                id: 1,
                name: "Groceries".to_string(),
                user_id: 7,
                created_at: Utc::now(),
            },
            TodoList {
                id: 2,
                name: "Tom & Jerry".to_string(),
                user_id: 7,
                created_at: Utc::now(),
            },
        ];

        let Html(html) = lists_page(&frame(), "alice", &lists);

        assert!(html.contains("Todo lists of alice"));
        assert!(html.contains(r#"<li><a href="/index/1">Groceries</a></li>"#));
        assert!(html.contains(r#"<li><a href="/index/2">Tom &amp; Jerry</a></li>"#));

        let Html(empty) = lists_page(&frame(), "alice", &[]);
        assert!(empty.contains("No lists yet."));
    }

    #[test]
    fn test_register_page_shows_field_errors() {
        let mut errors = FieldErrors::new();
        errors.add("username", "User already exists, please choose a different username.");

        let Html(html) = register_page(&frame(), "alice", &errors);

        assert!(html.contains(r#"value="alice""#));
        assert!(html.contains("User already exists"));
    }

    #[test]
    fn test_nav_depends_on_authentication() {
        let Html(html) = login_page(&bare_frame(), "");
        assert!(html.contains(r#"href="/register""#));
        assert!(!html.contains(r#"href="/logout""#));

        let Html(html) = lists_page(&frame(), "alice", &[]);
        assert!(html.contains(r#"href="/logout""#));
    }
}
