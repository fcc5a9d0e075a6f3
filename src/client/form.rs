//! Add/edit form state for a single movie.
//!
//! Validation runs locally before anything touches the network. On submit a
//! newly picked image is uploaded first; if that fails the save is skipped and
//! the entered values stay put so the user can retry.

use tracing::{debug, warn};

use super::api::{ClientError, ImageFile, MovieApi};
use crate::models::{Field, FieldErrors, Movie, MovieInput};

pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];
/// Shown next to the picker; nothing enforces it.
pub const ADVISED_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const IMAGE_HINT: &str = "PNG, JPG or JPEG (MAX. 5MB)";

const ADD_CANCEL_PROMPT: &str = "You have unsaved changes. Are you sure you want to cancel?";
const EDIT_CANCEL_PROMPT: &str =
    "Are you sure you want to cancel editing? Any changes will be lost.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Add,
    Edit,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("some fields are invalid")]
    Invalid,
    #[error("Failed to upload image: {0}")]
    Upload(#[source] ClientError),
    #[error("Failed to add movie. Please try again.")]
    Create(#[source] ClientError),
    #[error("Failed to update movie. Please try again.")]
    Update(#[source] ClientError),
}

impl SubmitError {
    /// Blocking alert text, if this failure warrants one. Validation errors
    /// render inline instead.
    pub fn alert(&self) -> Option<String> {
        match self {
            SubmitError::Invalid => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MovieForm {
    mode: FormMode,
    movie: Option<Movie>,
    values: MovieInput,
    errors: FieldErrors,
    image: Option<ImageFile>,
    preview: Option<String>,
    uploading: bool,
    submitting: bool,
}

impl MovieForm {
    pub fn add() -> Self {
        Self::default()
    }

    pub fn edit(movie: Movie) -> Self {
        let mut values = movie.to_input();
        values.image_url = None;
        Self {
            mode: FormMode::Edit,
            preview: movie.image_url.clone(),
            values,
            movie: Some(movie),
            ..Self::default()
        }
    }

    /// Edit mode only sticks when there is a movie to edit.
    pub fn open(mode: FormMode, movie: Option<Movie>) -> Self {
        match (mode, movie) {
            (FormMode::Edit, Some(movie)) => Self::edit(movie),
            _ => Self::add(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn values(&self) -> &MovieInput {
        &self.values
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(field).unwrap_or_default()
    }

    /// Updates a text field. An inline error on that field is re-checked so it
    /// disappears as soon as the field is filled.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        if field == Field::ImageUrl {
            return;
        }
        self.values.set(field, value);
        if self.errors.get(field).is_some() {
            match self.values.validate_field(field) {
                Some(message) => self.errors.insert(field, message),
                None => self.errors.remove(field),
            }
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn selected_image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    /// Either the data URL of a freshly picked file or the hosted URL of the
    /// movie being edited.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn select_image(&mut self, file: ImageFile) {
        if !ACCEPTED_IMAGE_TYPES.contains(&file.content_type.as_str())
            || file.bytes.len() > ADVISED_MAX_IMAGE_BYTES
        {
            debug!(name = %file.name, size = file.bytes.len(), "image outside advised limits");
        }
        self.preview = Some(file.data_url());
        self.image = Some(file);
    }

    pub fn validate(&mut self) -> bool {
        self.errors = FieldErrors::default();
        for field in Field::REQUIRED {
            if let Some(message) = self.values.validate_field(field) {
                self.errors.insert(field, message);
            }
        }
        self.errors.is_empty()
    }

    /// The question to ask before discarding the form, if any.
    pub fn cancel_prompt(&self) -> Option<&'static str> {
        match self.mode {
            FormMode::Edit => Some(EDIT_CANCEL_PROMPT),
            FormMode::Add if self.values.has_any_text() => Some(ADD_CANCEL_PROMPT),
            FormMode::Add => None,
        }
    }

    /// Returns true when the form should close. `confirmed` is the user's
    /// answer to [`cancel_prompt`](Self::cancel_prompt) and is ignored when
    /// there was nothing to ask.
    pub fn cancel(&mut self, confirmed: bool) -> bool {
        if self.cancel_prompt().is_some() && !confirmed {
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        *self = Self::open(self.mode, self.movie.take());
    }

    /// Runs the upload-then-save sequence and returns the saved movie.
    pub async fn submit<A: MovieApi + ?Sized>(&mut self, api: &A) -> Result<Movie, SubmitError> {
        if !self.validate() {
            return Err(SubmitError::Invalid);
        }

        self.submitting = true;
        let result = self.save(api).await;
        self.submitting = false;

        match result {
            Ok(movie) => {
                self.reset();
                Ok(movie)
            },
            Err(err) => {
                warn!(mode = ?self.mode, error = %err, "movie form submission failed");
                Err(err)
            },
        }
    }

    async fn save<A: MovieApi + ?Sized>(&mut self, api: &A) -> Result<Movie, SubmitError> {
        let mut image_url = self.movie.as_ref().and_then(|m| m.image_url.clone());

        if let Some(image) = self.image.as_ref() {
            self.uploading = true;
            let uploaded = api.upload(image).await;
            self.uploading = false;
            image_url = Some(uploaded.map_err(SubmitError::Upload)?);
        }

        let input = MovieInput { image_url, ..self.values.clone() };

        match (self.mode, self.movie.as_ref()) {
            (FormMode::Edit, Some(movie)) => {
                api.update(movie.id, &input).await.map_err(SubmitError::Update)
            },
            _ => api.create(&input).await.map_err(SubmitError::Create),
        }
    }
}
