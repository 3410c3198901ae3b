//! Server-rendered HTML pages.
//!
//! Markup is assembled from small functions; every interpolated value goes
//! through [`escape`] except project bodies, which hold the administrator's
//! rich text.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;

use crate::domain::forms::{Form, FormErrors};
use crate::domain::{Actor, Category, Project};

/// Escape text for use in HTML content and quoted attributes.
///
/// # Examples
/// ```
/// use portfolio::inbound::http::views::escape;
///
/// assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
/// ```
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Chrome shared by every page.
pub struct Layout<'a> {
    pub title: &'a str,
    pub actor: &'a Actor,
    pub flashes: &'a [String],
}

impl Layout<'_> {
    /// Wrap `body` in the document shell.
    #[must_use]
    pub fn render(&self, body: &str) -> String {
        let mut page = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n</head>\n<body>\n{}",
            escape(self.title),
            nav(self.actor)
        );
        if !self.flashes.is_empty() {
            page.push_str("<ul class=\"flashes\">\n");
            for message in self.flashes {
                page.push_str(&format!("<li>{}</li>\n", escape(message)));
            }
            page.push_str("</ul>\n");
        }
        page.push_str(&format!("<main>\n{body}\n</main>\n</body>\n</html>\n"));
        page
    }
}

fn nav(actor: &Actor) -> String {
    let mut links = vec![
        ("/", "Home"),
        ("/projects", "Projects"),
        ("/resume", "Resume"),
        ("/contact", "Contact"),
    ];
    if actor.is_admin() {
        links.push(("/new-project", "New Project"));
    }
    if actor.is_authenticated() {
        links.push(("/logout", "Log Out"));
    } else {
        links.push(("/login", "Login"));
        links.push(("/register", "Register"));
    }

    let mut nav = String::from("<nav>\n");
    for (href, text) in links {
        nav.push_str(&format!("<a href=\"{href}\">{text}</a>\n"));
    }
    if let Some(user) = actor.user() {
        nav.push_str(&format!(
            "<span class=\"user\">{}</span>\n",
            escape(user.name().as_ref())
        ));
    }
    nav.push_str("</nav>\n");
    nav
}

/// `text/html` response with `markup` as the body.
#[must_use]
pub fn html(status: StatusCode, markup: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(markup)
}

#[must_use]
pub fn home_body() -> String {
    "<h1>Welcome</h1>\n<p>Software projects, experience and a way to get in touch.</p>\n\
     <p><a href=\"/projects\">Browse projects</a></p>"
        .to_owned()
}

#[must_use]
pub fn resume_body() -> String {
    "<h1>Resume</h1>\n<p><a href=\"/download\">Download CV</a></p>".to_owned()
}

fn admin_controls(project: &Project) -> String {
    format!(
        "<a href=\"/edit-project/{id}\">Edit</a>\n\
         <form method=\"post\" action=\"/delete/{id}\"><button type=\"submit\">Delete</button></form>",
        id = project.id
    )
}

/// Project listing with category filters.
#[must_use]
pub fn projects_body(projects: &[Project], filter: Option<Category>, is_admin: bool) -> String {
    let mut body = String::from("<h1>Projects</h1>\n<p class=\"filters\">");
    body.push_str("<a href=\"/projects\">All</a>");
    for category in Category::ALL {
        body.push_str(&format!(
            " <a href=\"/projects?category={category}\">{category}</a>"
        ));
    }
    body.push_str("</p>\n");
    if let Some(category) = filter {
        body.push_str(&format!("<h2>{category}</h2>\n"));
    }
    if projects.is_empty() {
        body.push_str("<p>No projects yet.</p>");
        return body;
    }
    body.push_str("<ul class=\"projects\">\n");
    for project in projects {
        body.push_str(&format!(
            "<li>\n<img src=\"{img}\" alt=\"\">\n<a href=\"/project/{id}\">{title}</a>\n\
             <span class=\"category\">{category}</span>\n<span class=\"date\">{date}</span>\n",
            img = escape(project.draft.img_url.as_ref()),
            id = project.id,
            title = escape(&project.draft.title),
            category = project.draft.category,
            date = project.display_date(),
        ));
        if is_admin {
            body.push_str(&admin_controls(project));
        }
        body.push_str("</li>\n");
    }
    body.push_str("</ul>");
    body
}

/// Single project page.
#[must_use]
pub fn project_body(project: &Project, is_admin: bool) -> String {
    let mut body = format!(
        "<article>\n<h1>{title}</h1>\n<p class=\"meta\">{category} · {date} · {author}</p>\n\
         <img src=\"{img}\" alt=\"\">\n<div class=\"content\">{content}</div>\n\
         <p><a href=\"{url}\">Visit project</a></p>\n",
        title = escape(&project.draft.title),
        category = project.draft.category,
        date = project.display_date(),
        author = escape(project.author.name.as_ref()),
        img = escape(project.draft.img_url.as_ref()),
        content = project.draft.body,
        url = escape(project.draft.project_url.as_ref()),
    );
    if is_admin {
        body.push_str(&admin_controls(project));
    }
    body.push_str("\n</article>");
    body
}

fn field_markup<F: Form>(input: &F, name: &str, label: &str) -> String {
    let value = escape(input.value(name));
    match name {
        "password" => format!("<input type=\"password\" id=\"{name}\" name=\"{name}\">"),
        "body" | "message" => format!(
            "<textarea id=\"{name}\" name=\"{name}\" aria-label=\"{label}\">{value}</textarea>"
        ),
        "category" => {
            let mut select = format!("<select id=\"{name}\" name=\"{name}\">");
            for category in Category::ALL {
                let selected = if input.value(name) == category.as_str() {
                    " selected"
                } else {
                    ""
                };
                select.push_str(&format!(
                    "<option value=\"{category}\"{selected}>{category}</option>"
                ));
            }
            select.push_str("</select>");
            select
        }
        _ => {
            let kind = match name {
                "email" => "email",
                "project_url" | "img_url" => "url",
                _ => "text",
            };
            format!("<input type=\"{kind}\" id=\"{name}\" name=\"{name}\" value=\"{value}\">")
        }
    }
}

/// A form with inline per-field errors.
#[must_use]
pub fn form_body<F: Form>(
    heading: &str,
    action: &str,
    input: &F,
    errors: &FormErrors,
    submit: &str,
) -> String {
    let mut body = format!(
        "<h1>{}</h1>\n<form method=\"post\" action=\"{}\">\n",
        escape(heading),
        escape(action)
    );
    for field in F::FIELDS {
        body.push_str(&format!(
            "<p>\n<label for=\"{name}\">{label}</label>\n{control}\n",
            name = field.name,
            label = field.label,
            control = field_markup(input, field.name, field.label)
        ));
        for message in errors.messages(field.name) {
            body.push_str(&format!("<span class=\"error\">{}</span>\n", escape(message)));
        }
        body.push_str("</p>\n");
    }
    body.push_str(&format!(
        "<button type=\"submit\">{}</button>\n</form>",
        escape(submit)
    ));
    body
}

/// Summary lines of the form `Error in {label}: {message}`.
#[must_use]
pub fn error_summary<F: Form>(errors: &FormErrors) -> Vec<String> {
    errors
        .iter()
        .flat_map(|(field, messages)| {
            let label = F::label(field);
            messages
                .iter()
                .map(move |message| format!("Error in {label}: {message}"))
        })
        .collect()
}

/// Error page body; includes the trace id when known.
#[must_use]
pub fn error_body(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let mut body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error"),
        escape(message)
    );
    if let Some(trace_id) = trace_id {
        body.push_str(&format!(
            "\n<p class=\"trace\">Reference: {}</p>",
            escape(trace_id)
        ));
    }
    body
}
