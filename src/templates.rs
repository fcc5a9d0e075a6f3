use maud::{DOCTYPE, Markup, html};

use crate::{
    client::{
        ConfirmDialog, DialogKind, IMAGE_HINT, ModalState, MovieApi, MovieForm, MovieTable,
        TableView, count_label,
    },
    models::{Field, Movie},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const COLUMNS: [&str; 7] = ["Movie", "Type", "Director", "Budget", "Location", "Duration", "Year"];

const SPINNER_CLASS: &str =
    "mx-auto h-12 w-12 rounded-full border-4 border-blue-200 border-t-blue-600 animate-spin";
const RETRY_CLASS: &str =
    "mt-6 inline-block rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";
const HEADER_CELL_CLASS: &str = "px-6 py-3 text-left text-xs font-semibold uppercase text-gray-600";

pub fn movies_page(view: &TableView) -> String {
    page(
        "Movie Collection",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-6xl mx-auto px-6 py-12" {
                    (table_fragment(view))
                }
            }
        },
    )
}

pub fn table_fragment(view: &TableView) -> Markup {
    html! {
        div id="content" {
            @match view {
                TableView::Loading => {
                    div class="bg-white shadow rounded-lg p-8 text-center" {
                        div class=(SPINNER_CLASS) {}
                        p class="mt-4 text-gray-600" { "Loading your movie collection..." }
                    }
                },
                TableView::Error(message) => {
                    div class="bg-white shadow rounded-lg p-8 text-center" {
                        h2 class="text-xl font-semibold text-gray-900" { "Connection Error" }
                        p class="mt-2 text-gray-700" { (message) }
                        a class=(RETRY_CLASS) href="/" { "Try Again" }
                    }
                },
                TableView::Empty => {
                    div class="bg-white shadow rounded-lg p-8 text-center" {
                        h3 class="text-xl font-semibold text-gray-800" { "No Movies Yet" }
                        p class="mt-2 text-gray-600" {
                            "Start building your collection by adding your first movie."
                        }
                    }
                },
                TableView::Populated(movies) => {
                    (collection_header(movies.len()))
                    div class="mt-6 overflow-x-auto bg-white shadow rounded-lg" {
                        table class="min-w-full divide-y divide-gray-200" {
                            thead class="bg-gray-50" {
                                tr {
                                    @for col in COLUMNS {
                                        th class=(HEADER_CELL_CLASS) { (col) }
                                    }
                                }
                            }
                            tbody class="divide-y divide-gray-100" {
                                @for movie in movies {
                                    (movie_row(movie))
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

fn collection_header(count: usize) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            h2 class="text-2xl font-bold text-gray-900" { "Your Collection" }
            span class="text-sm text-gray-600" { (count_label(count)) }
        }
    }
}

fn movie_row(movie: &Movie) -> Markup {
    html! {
        tr class="hover:bg-gray-50" data-movie-id=(movie.id) {
            td class="px-6 py-4" {
                div class="flex items-center gap-3" {
                    @if let Some(url) = &movie.image_url {
                        img class="h-16 w-12 rounded object-cover" src=(url) alt=(movie.title);
                    } @else {
                        div class="h-16 w-12 rounded bg-gray-200" {}
                    }
                    span class="font-medium text-gray-900" { (movie.title) }
                }
            }
            td class="px-6 py-4" {
                span class="rounded-full bg-blue-100 px-2 py-1 text-xs text-blue-800" {
                    (movie.kind)
                }
            }
            td class="px-6 py-4 text-gray-700" { (movie.director) }
            td class="px-6 py-4 text-gray-700" { (movie.budget) }
            td class="px-6 py-4 text-gray-700" { (movie.location) }
            td class="px-6 py-4 text-gray-700" { (movie.duration) }
            td class="px-6 py-4 text-gray-700" { (movie.year_time) }
        }
    }
}

/// Everything a [`MovieTable`] currently shows: the list, the add/edit modal
/// when open, and the delete confirmation while one is pending. Front ends
/// re-render this after each controller call.
pub fn collection_view<A: MovieApi>(table: &MovieTable<A>) -> Markup {
    html! {
        (table_fragment(&table.view()))
        (form_modal(table.modal(), table.form()))
        @if let Some(dialog) = table.delete_dialog() {
            (confirm_dialog(dialog))
        }
    }
}

/// The add/edit modal with inline validation messages.
fn form_modal(modal: &ModalState, form: &MovieForm) -> Markup {
    html! {
        @if modal.open {
            div class="fixed inset-0 z-50 flex items-center justify-center bg-black/60 p-4" {
                div class="w-full max-w-2xl rounded-2xl bg-white shadow-2xl" {
                    div class="flex items-center justify-between border-b p-6" {
                        h2 class="text-xl font-bold text-gray-900" { (modal.title()) }
                        button type="button" aria-label="Close modal" { "×" }
                    }
                    form class="space-y-4 p-6" {
                        @if let Some(src) = form.preview() {
                            img class="mx-auto h-48 rounded object-contain"
                                src=(src)
                                alt="Movie poster preview";
                        }
                        label class="block text-sm text-gray-600" {
                            input type="file" name="image" accept="image/*";
                            span class="ml-2 text-xs text-gray-500" { (IMAGE_HINT) }
                        }
                        @for field in Field::REQUIRED {
                            div {
                                input class="w-full rounded-md border border-gray-300 px-3 py-2"
                                    name=(field.key())
                                    placeholder=(field.placeholder())
                                    value=(form.value(field));
                                @if let Some(message) = form.error(field) {
                                    p class="mt-1 text-sm text-red-600" { (message) }
                                }
                            }
                        }
                        div class="flex justify-end gap-3" {
                            button type="button" { "Cancel" }
                            button type="submit" disabled[form.is_submitting()] {
                                @if form.is_uploading() {
                                    "Uploading..."
                                } @else if form.is_submitting() {
                                    "Saving..."
                                } @else {
                                    (modal.title())
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn confirm_dialog(dialog: &ConfirmDialog) -> Markup {
    let color = match dialog.kind {
        DialogKind::Danger => "bg-red-600 hover:bg-red-700",
        DialogKind::Warning => "bg-yellow-600 hover:bg-yellow-700",
        DialogKind::Info => "bg-blue-600 hover:bg-blue-700",
    };

    html! {
        div
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/60 p-4"
            data-kind=(dialog.kind.as_str())
        {
            div class="w-full max-w-md rounded-2xl bg-white shadow-2xl" {
                h3 class="p-6 text-xl font-bold text-gray-900" { (dialog.title) }
                p class="px-6 pb-4 text-gray-700" { (dialog.message) }
                div class="flex justify-end gap-3 px-6 py-4" {
                    button type="button" disabled[dialog.loading] { (dialog.cancel_text) }
                    button
                        type="button"
                        class=(format!("rounded-lg px-6 py-2 text-white {color}"))
                        disabled[dialog.loading]
                    {
                        (dialog.confirm_label())
                    }
                }
            }
        }
    }
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i32, title: &str, image_url: Option<&str>) -> Movie {
        Movie {
            id,
            title: title.into(),
            kind: "Movie".into(),
            director: "Denis Villeneuve".into(),
            budget: "$165M".into(),
            location: "Jordan".into(),
            duration: "155 min".into(),
            year_time: "2021".into(),
            image_url: image_url.map(str::to_string),
            created_at: jiff::Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn populated_table_shows_rows_and_posters() {
        let view = TableView::Populated(vec![
            movie(2, "Dune", Some("https://img.test/dune.jpg")),
            movie(1, "Arrival", None),
        ]);
        let html = table_fragment(&view).into_string();

        assert!(html.contains("2 Movies"));
        assert!(html.contains(r#"src="https://img.test/dune.jpg""#));
        assert!(html.contains(r#"data-movie-id="1""#));
        assert!(html.find("Dune").unwrap() < html.find("Arrival").unwrap());
    }

    #[test]
    fn titles_are_escaped() {
        let view = TableView::Populated(vec![movie(1, "<script>x</script>", None)]);
        let html = table_fragment(&view).into_string();
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_and_error_branches() {
        assert!(table_fragment(&TableView::Empty).into_string().contains("No Movies Yet"));

        let err = table_fragment(&TableView::Error("down".into())).into_string();
        assert!(err.contains("down"));
        assert!(err.contains("Try Again"));
    }

    #[test]
    fn form_modal_shows_inline_errors_and_hint() {
        let modal = ModalState { open: true, ..Default::default() };
        let mut form = MovieForm::add();
        form.set_value(Field::Title, "Dune");
        form.validate();

        let html = form_modal(&modal, &form).into_string();
        assert!(html.contains("Add New Movie"));
        assert!(html.contains(r#"value="Dune""#));
        assert!(html.contains("Director is required"));
        assert!(!html.contains("Title is required"));
        assert!(html.contains(IMAGE_HINT));
    }

    #[test]
    fn closed_modal_renders_nothing() {
        assert!(form_modal(&ModalState::default(), &MovieForm::add()).into_string().is_empty());
    }

    #[test]
    fn delete_dialog_disables_buttons_while_loading() {
        let mut dialog = ConfirmDialog::delete_movie(&movie(1, "Ran", None));
        let idle = confirm_dialog(&dialog).into_string();
        assert!(idle.contains(r#"data-kind="danger""#));
        assert!(idle.contains(">Delete<"));
        assert!(!idle.contains("disabled"));

        dialog.loading = true;
        let busy = confirm_dialog(&dialog).into_string();
        assert!(busy.contains("Processing..."));
        assert!(busy.contains("disabled"));
    }

    #[test]
    fn page_wraps_fragment() {
        let html = movies_page(&TableView::Loading);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Loading your movie collection..."));
    }
}
