use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One guest book entry, as stored in `comments.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub date: String,
    pub name: String,
    pub comment: String,
}

impl Comment {
    /// A comment stamped with the current time.
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::at(Utc::now(), name, comment)
    }

    pub fn at(date: DateTime<Utc>, name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
            name: name.into(),
            comment: comment.into(),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<p>{}: <strong>{}</strong> : {}</p>",
            self.date, self.name, self.comment
        )
    }
}

/// Renders the list most-recent-first, one paragraph per line.
pub fn render_comments_html(comments: &[Comment]) -> String {
    comments
        .iter()
        .rev()
        .map(Comment::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}
