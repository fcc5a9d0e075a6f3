use crate::models::Movie;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DialogKind {
    #[default]
    Danger,
    Warning,
    Info,
}

impl DialogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DialogKind::Danger => "danger",
            DialogKind::Warning => "warning",
            DialogKind::Info => "info",
        }
    }
}

/// A yes/no confirmation. While `loading` both buttons are disabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub kind: DialogKind,
    pub loading: bool,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
            kind: DialogKind::Danger,
            loading: false,
        }
    }

    pub fn delete_movie(movie: &Movie) -> Self {
        Self {
            confirm_text: "Delete".to_string(),
            ..Self::new(
                "Delete Movie",
                format!(
                    "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                    movie.title
                ),
            )
        }
    }

    pub fn confirm_label(&self) -> &str {
        if self.loading { "Processing..." } else { &self.confirm_text }
    }
}
