use maud::{Markup, html};

use super::components::{EMPTY_LISTING, LOGIN_FAILED, entry_article, entry_form, layout};
use crate::db::EntryRecord;
use crate::service::entries::EntryView;

pub fn listing_page(entries: &[EntryView], authenticated: bool) -> Markup {
    let body = html! {
        @if authenticated {
            aside { (entry_form("/new", "add_entry", None)) }
        }
        h2 id="entriesTitle" { "Entries" }
        @if entries.is_empty() {
            div class="entry" { p { em { (EMPTY_LISTING) } } }
        } @else {
            @for entry in entries {
                (entry_article(entry, authenticated))
            }
        }
    };
    layout("Home", authenticated, body)
}

pub fn detail_page(entry: &EntryView, authenticated: bool) -> Markup {
    let body = html! {
        div id="entryContent" { (entry_article(entry, authenticated)) }
    };
    layout(&entry.title, authenticated, body)
}

pub fn edit_page(entry: &EntryRecord) -> Markup {
    let action = format!("/edit/{}", entry.id);
    let body = html! {
        h2 { "Edit entry" }
        (entry_form(&action, "edit_entry", Some(entry)))
    };
    layout(&entry.title, true, body)
}

pub fn login_page(failed: bool) -> Markup {
    let body = html! {
        @if failed {
            p class="error" { (LOGIN_FAILED) }
        }
        form action="/login" method="POST" class="login" {
            div class="field" {
                label for="username" { "Username" }
                input type="text" name="username" id="username";
            }
            div class="field" {
                label for="password" { "Password" }
                input type="password" name="password" id="password";
            }
            div class="control_row" {
                input type="submit" value="Log In";
            }
        }
    };
    layout("Login", false, body)
}
