use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use super::api::{ClientError, ClientResult, ImageFile, MovieApi};
use crate::models::{Movie, MovieInput, Page};

/// In-memory stand-in for the HTTP API with switchable failures.
#[derive(Default)]
pub struct FakeApi {
    movies: Mutex<Vec<Movie>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    uploads: AtomicUsize,
    upload_error: Mutex<Option<String>>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
}

fn server_error(message: &str) -> ClientError {
    ClientError::Status { status: 500, message: message.to_string() }
}

impl FakeApi {
    pub fn seed(&self, title: &str, image_url: Option<&str>) -> Movie {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let movie = Movie {
            id,
            title: title.to_string(),
            kind: "Movie".into(),
            director: "Director".into(),
            budget: "Budget".into(),
            location: "Location".into(),
            duration: "Duration".into(),
            year_time: "Year".into(),
            image_url: image_url.map(str::to_string),
            created_at: jiff::Timestamp::UNIX_EPOCH,
        };
        self.movies.lock().unwrap().push(movie.clone());
        movie
    }

    pub fn stored(&self) -> Vec<Movie> {
        self.movies.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn fail_uploads(&self, message: &str) {
        *self.upload_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn writes_fail(&self) -> bool {
        *self.fail_writes.lock().unwrap()
    }
}

#[async_trait]
impl MovieApi for FakeApi {
    async fn list(&self, page: Page) -> ClientResult<Vec<Movie>> {
        self.tick();
        if *self.fail_reads.lock().unwrap() {
            return Err(server_error("Failed to fetch movies"));
        }
        let mut movies = self.stored();
        movies.sort_by_key(|m| std::cmp::Reverse(m.id));
        Ok(movies.into_iter().skip(page.skip as usize).take(page.take as usize).collect())
    }

    async fn create(&self, input: &MovieInput) -> ClientResult<Movie> {
        self.tick();
        if self.writes_fail() {
            return Err(server_error("Failed to create movie"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let movie = Movie { id, ..movie_from(input) };
        self.movies.lock().unwrap().push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i32, input: &MovieInput) -> ClientResult<Movie> {
        self.tick();
        if self.writes_fail() {
            return Err(server_error("Failed to update movie"));
        }
        let mut movies = self.movies.lock().unwrap();
        let stored = movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| server_error("Failed to update movie"))?;
        *stored = Movie { id, created_at: stored.created_at, ..movie_from(input) };
        Ok(stored.clone())
    }

    async fn delete(&self, id: i32) -> ClientResult<()> {
        self.tick();
        if self.writes_fail() {
            return Err(server_error("Failed to delete movie"));
        }
        let mut movies = self.movies.lock().unwrap();
        let before = movies.len();
        movies.retain(|m| m.id != id);
        if movies.len() == before {
            return Err(server_error("Failed to delete movie"));
        }
        Ok(())
    }

    async fn upload(&self, image: &ImageFile) -> ClientResult<String> {
        self.tick();
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.upload_error.lock().unwrap().clone() {
            return Err(ClientError::Status { status: 500, message });
        }
        Ok(format!("https://img.test/{}", image.name))
    }
}

fn movie_from(input: &MovieInput) -> Movie {
    Movie {
        id: 0,
        title: input.title.clone(),
        kind: input.kind.clone(),
        director: input.director.clone(),
        budget: input.budget.clone(),
        location: input.location.clone(),
        duration: input.duration.clone(),
        year_time: input.year_time.clone(),
        image_url: input.image_url.clone(),
        created_at: jiff::Timestamp::UNIX_EPOCH,
    }
}
