//! Server-rendered pages.
//!
//! Every page shares [`layout`]; the fragments readers and scripts rely on
//! (`No entries here so far`, `Login Failed`, the Share control) are emitted
//! verbatim.

pub mod components;
pub mod pages;

pub use pages::{detail_page, edit_page, listing_page, login_page};
