//! Client-side state for the movie collection UI, independent of any
//! rendering toolkit. Views read the state, user actions call the methods,
//! and every network round trip goes through [`MovieApi`].

mod api;
mod dialog;
mod form;
mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ClientError, ClientResult, HttpMovieApi, ImageFile, MovieApi};
pub use dialog::{ConfirmDialog, DialogKind};
pub use form::{
    ACCEPTED_IMAGE_TYPES, ADVISED_MAX_IMAGE_BYTES, FormMode, IMAGE_HINT, MovieForm, SubmitError,
};
pub use table::{DeleteError, LOAD_ERROR, ModalState, MovieTable, TableView, count_label};
