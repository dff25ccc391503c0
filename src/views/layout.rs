use maud::{html, Markup, DOCTYPE};

use crate::config;

/// `"<page> | <app name>"`
pub fn page_title(title: &str) -> String {
    format!("{} | {}", title, config::config().app.name)
}

pub fn default_header(title: &str) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            title { (page_title(title)) }
            link rel="stylesheet" href="/static/app.css";
        }
    }
}

pub struct Crumb<'a> {
    pub label: &'a str,
    pub href: &'a str,
}

pub fn breadcrumbs(crumbs: &[Crumb<'_>]) -> Markup {
    html! {
        nav.breadcrumbs aria-label="Breadcrumb" {
            ol {
                @for crumb in crumbs {
                    li { a href=(crumb.href) { (crumb.label) } }
                }
            }
        }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (default_header(title))
            body {
                main.container { (body) }
            }
        }
    }
}
