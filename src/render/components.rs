use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::db::EntryRecord;
use crate::service::entries::EntryView;

pub const SHARE_BUTTON: &str = r#"<input type="submit" value="Share" name="Share"/>"#;

pub const EMPTY_LISTING: &str = "No entries here so far";

pub const LOGIN_FAILED: &str = "Login Failed";

pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:Georgia,"Times New Roman",serif;line-height:1.6;color:#222;background:#fdfcf9;padding:1.5rem 1rem}
header,main{max-width:720px;margin:0 auto}
header{display:flex;justify-content:space-between;align-items:baseline;margin-bottom:2rem;border-bottom:1px solid #ddd;padding-bottom:.5rem}
header a{color:#222;text-decoration:none}
nav a{margin-left:1rem;font-size:.9rem}
a{color:#8a3b12}
.entry{margin-bottom:2rem}
.entryTitle{font-size:1.4rem}
.dateline{color:#888;font-size:.85rem;margin-bottom:.5rem}
.entry_body p{margin:.5rem 0}
.field{margin:.5rem 0}
.field label{display:block;font-size:.85rem;color:#555}
.field input,.field textarea{width:100%;font:inherit;padding:.3rem}
.error{color:#b00020;font-weight:bold;margin-bottom:1rem}
.codehilite{background:#f4f1ea;border-radius:4px;padding:.75rem;margin:.75rem 0;overflow-x:auto}
.codehilite pre{font-family:"SF Mono",Menlo,monospace;font-size:.85rem}
.codehilite .comment{color:#8a8a7a;font-style:italic}
.codehilite .keyword,.codehilite .storage{color:#8a3b12;font-weight:bold}
.codehilite .string{color:#3f6e2b}
.codehilite .constant{color:#1d5a8a}
.codehilite .entity.name{color:#6b3a8a}
"#;

/// Wrap `body` in the shared page chrome.
pub fn layout(title: &str, authenticated: bool, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Learning Journal" }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                header {
                    h1 { a href="/" { "Learning Journal" } }
                    nav {
                        @if authenticated {
                            a href="/logout" { "Logout" }
                        } @else {
                            a href="/login" { "Login" }
                        }
                    }
                }
                main { (body) }
            }
        }
    }
}

pub fn entry_article(entry: &EntryView, authenticated: bool) -> Markup {
    html! {
        article class="entry" id=(format!("entry{}", entry.id)) {
            h3 class="entryTitle" {
                a href=(format!("/detail/{}", entry.id)) { (entry.title) }
            }
            p class="dateline" { (entry.created.format("%b %-d, %Y").to_string()) }
            div class="entry_body" { (PreEscaped(&entry.text)) }
            @if authenticated {
                a class="edit_link" href=(format!("/edit/{}", entry.id)) { "Edit" }
            }
        }
    }
}

/// Form posting to `action`, pre-filled from `source` when editing.
pub fn entry_form(action: &str, class: &str, source: Option<&EntryRecord>) -> Markup {
    html! {
        form action=(action) method="POST" class=(class) {
            div class="field" {
                label for="title" { "Title" }
                input type="text" size="30" name="title" id="title" maxlength="127"
                    value=[source.map(|s| s.title.as_str())];
            }
            div class="field" {
                label for="text" { "Text" }
                textarea name="text" id="text" rows="5" cols="80" {
                    @if let Some(s) = source { (s.text) }
                }
            }
            div class="control_row" { (PreEscaped(SHARE_BUTTON)) }
        }
    }
}
