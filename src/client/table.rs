use tracing::{debug, warn};

use super::{
    api::{ClientError, MovieApi},
    dialog::ConfirmDialog,
    form::{FormMode, MovieForm, SubmitError},
};
use crate::models::{Movie, Page};

pub const LOAD_ERROR: &str = "Failed to load movies. Make sure the backend server is running.";

/// Which of the mutually exclusive list renderings applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableView {
    Loading,
    Error(String),
    Empty,
    Populated(Vec<Movie>),
}

impl TableView {
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        if movies.is_empty() { TableView::Empty } else { TableView::Populated(movies) }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to delete movie. Please try again.")]
pub struct DeleteError(#[source] pub ClientError);

/// The shared add/edit modal. `editing` is only set in edit mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalState {
    pub open: bool,
    pub mode: FormMode,
    pub editing: Option<Movie>,
}

impl ModalState {
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Edit => "Edit Movie",
            FormMode::Add => "Add New Movie",
        }
    }
}

#[derive(Clone, Debug)]
struct PendingDelete {
    movie: Movie,
    dialog: ConfirmDialog,
}

/// Owns the movie list plus every piece of modal state around it.
pub struct MovieTable<A> {
    api: A,
    page: Page,
    movies: Vec<Movie>,
    loading: bool,
    error: Option<String>,
    modal: ModalState,
    form: MovieForm,
    pending_delete: Option<PendingDelete>,
}

impl<A: MovieApi> MovieTable<A> {
    /// Starts in the loading state; call [`load`](Self::load) to fetch.
    pub fn new(api: A) -> Self {
        Self {
            api,
            page: Page::default(),
            movies: Vec::new(),
            loading: true,
            error: None,
            modal: ModalState::default(),
            form: MovieForm::add(),
            pending_delete: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Full re-fetch; also the "Try Again" action of the error view.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.api.list(self.page).await {
            Ok(movies) => {
                debug!(count = movies.len(), "movies loaded");
                self.movies = movies;
            },
            Err(err) => {
                warn!(error = %err, "failed to load movies");
                self.error = Some(LOAD_ERROR.to_string());
            },
        }

        self.loading = false;
    }

    pub fn view(&self) -> TableView {
        if self.loading {
            TableView::Loading
        } else if let Some(err) = &self.error {
            TableView::Error(err.clone())
        } else {
            TableView::from_movies(self.movies.clone())
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn form(&self) -> &MovieForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut MovieForm {
        &mut self.form
    }

    pub fn open_add(&mut self) {
        self.modal = ModalState { open: true, mode: FormMode::Add, editing: None };
        self.form = MovieForm::add();
    }

    pub fn open_edit(&mut self, movie: Movie) {
        self.form = MovieForm::edit(movie.clone());
        self.modal = ModalState { open: true, mode: FormMode::Edit, editing: Some(movie) };
    }

    /// Every close path lands here: success, cancel, or the close button.
    pub fn close_modal(&mut self) {
        self.modal = ModalState::default();
        self.form = MovieForm::add();
    }

    /// Submits the open form; on success the modal closes and the list reloads.
    pub async fn submit_form(&mut self) -> Result<Movie, SubmitError> {
        let saved = self.form.submit(&self.api).await?;
        self.close_modal();
        self.load().await;
        Ok(saved)
    }

    /// See [`MovieForm::cancel`]. Returns true when the modal closed.
    pub fn cancel_form(&mut self, confirmed: bool) -> bool {
        let closed = self.form.cancel(confirmed);
        if closed {
            self.close_modal();
        }
        closed
    }

    pub fn request_delete(&mut self, movie: Movie) {
        let dialog = ConfirmDialog::delete_movie(&movie);
        self.pending_delete = Some(PendingDelete { movie, dialog });
    }

    pub fn delete_dialog(&self) -> Option<&ConfirmDialog> {
        self.pending_delete.as_ref().map(|p| &p.dialog)
    }

    pub fn delete_target(&self) -> Option<&Movie> {
        self.pending_delete.as_ref().map(|p| &p.movie)
    }

    /// No-op while a delete is in flight.
    pub fn cancel_delete(&mut self) {
        if self.pending_delete.as_ref().is_some_and(|p| p.dialog.loading) {
            return;
        }
        self.pending_delete = None;
    }

    /// Deletes the pending target. On failure the dialog stays open, no longer
    /// loading, so the user can retry or cancel.
    pub async fn confirm_delete(&mut self) -> Result<(), DeleteError> {
        let Some(pending) = self.pending_delete.as_mut() else {
            return Ok(());
        };
        pending.dialog.loading = true;
        let id = pending.movie.id;

        let result = self.api.delete(id).await;

        if let Some(pending) = self.pending_delete.as_mut() {
            pending.dialog.loading = false;
        }

        match result {
            Ok(()) => {
                self.load().await;
                self.pending_delete = None;
                Ok(())
            },
            Err(err) => {
                warn!(id, error = %err, "failed to delete movie");
                Err(DeleteError(err))
            },
        }
    }
}

pub fn count_label(count: usize) -> String {
    format!("{count} {}", if count == 1 { "Movie" } else { "Movies" })
}
