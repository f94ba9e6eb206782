//! Prompt records and the operations the picker runs on them.

pub mod filter;
pub mod insert;
pub mod store;

use serde::{Deserialize, Serialize};

pub use filter::filter_prompts;
pub use insert::{insert_at_cursor, Insertion};
pub use store::{CatalogStore, CatalogSubscription};

/// A named, reusable text template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub name: String,
    pub prompt: String,
}

impl Prompt {
    pub fn new(id: impl Into<String>, name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prompt: prompt.into(),
        }
    }
}

/// Library shipped with a fresh config
pub fn default_library() -> Vec<Prompt> {
    vec![
        Prompt::new(
            "default-translate",
            "English Translator",
            "Translate the following text into English. Keep the meaning, \
             fix grammar, and reply with the translation only:",
        ),
        Prompt::new(
            "default-proofread",
            "Proofreader",
            "Proofread the text below. List each correction with a short reason, \
             then give the corrected version:",
        ),
        Prompt::new(
            "default-summarize",
            "Summarize",
            "Summarize the following in five bullet points or fewer:",
        ),
        Prompt::new(
            "default-explain",
            "Explain Code",
            "Explain what this code does, step by step, and point out anything surprising:",
        ),
        Prompt::new(
            "default-tests",
            "Write Unit Tests",
            "Write unit tests for the following function. Cover edge cases:",
        ),
    ]
}
