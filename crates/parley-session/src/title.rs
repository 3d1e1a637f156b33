use serde::{Serialize, Serializer};

/// Title every thread shows until its first message is sent
pub const DEFAULT_TITLE: &str = "New Chat";

/// Length of a title derived from a first message, in characters
pub const TITLE_MAX_CHARS: usize = 30;

/// Display title of a thread
///
/// `Untitled` renders as [`DEFAULT_TITLE`]; once `Named` it never goes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadTitle {
    Untitled,
    Named(String),
}

impl ThreadTitle {
    pub fn as_str(&self) -> &str {
        match self {
            ThreadTitle::Untitled => DEFAULT_TITLE,
            ThreadTitle::Named(title) => title,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ThreadTitle::Untitled)
    }

    /// Title taken from the first message sent on a thread
    pub fn from_first_message(message: &str) -> Self {
        ThreadTitle::Named(truncate_chars(message, TITLE_MAX_CHARS).to_string())
    }
}

impl Serialize for ThreadTitle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Prefix of at most `max` characters, never splitting a character
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_message() {
        let title = ThreadTitle::from_first_message("Hello there, how are you doing today friend");
        assert_eq!(title.as_str(), "Hello there, how are you doing");
        assert_eq!(title.as_str().chars().count(), 30);
    }

    #[test]
    fn test_short_message_kept_whole() {
        assert_eq!(ThreadTitle::from_first_message("Hi").as_str(), "Hi");
    }

    #[test]
    fn test_truncate_multibyte() {
        let s = "é".repeat(40);
        assert_eq!(truncate_chars(&s, 30).chars().count(), 30);
        assert_eq!(truncate_chars("日本語", 2), "日本");
    }

    #[test]
    fn test_untitled_renders_default() {
        assert_eq!(ThreadTitle::Untitled.as_str(), "New Chat");
        assert!(ThreadTitle::Untitled.is_default());
        // A first message that happens to read "New Chat" still names the thread
        assert!(!ThreadTitle::from_first_message("New Chat").is_default());
    }
}
