//! # Localization
//!
//! Turns a message id plus named arguments into display text.
//!
//! Localized text only ever feeds log lines and terminal output; no
//! decision in the pipeline depends on it. Unknown ids fall back to the
//! English catalog and then to the id itself.
//!
//! ```rust,ignore
//! let localizer = Catalog::for_language("de");
//! let text = localizer.translate(
//!     "SummaryDuplicatesFound",
//!     &MessageArgs::new().with("Groups", 3).with("Files", 7),
//! );
//! ```

mod catalog;

pub use catalog::{Catalog, Language};

use std::collections::BTreeMap;
use std::fmt::Display;

/// Named arguments substituted into `{Name}` placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageArgs {
    values: BTreeMap<&'static str, String>,
}

impl MessageArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument
    pub fn with(mut self, name: &'static str, value: impl Display) -> Self {
        self.values.insert(name, value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Message-id to human string translation
pub trait Localizer: Send + Sync {
    /// Render a message
    fn translate(&self, id: &str, args: &MessageArgs) -> String;

    /// Language code currently in use
    fn language(&self) -> &str;
}

/// Replace every `{Name}` in `template` with the matching argument.
///
/// Placeholders without an argument are left untouched.
pub fn render(template: &str, args: &MessageArgs) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match args.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
