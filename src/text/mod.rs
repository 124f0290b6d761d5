//! Turning raw uploads and bodies into classifiable text.

pub mod clean;
pub mod extract;

pub use clean::{clean_text, extract_keywords, remove_stop_words};
pub use extract::{ALLOWED_EXTENSIONS, extract_text_from_file, is_allowed_file};
