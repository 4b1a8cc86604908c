//! Typed access to a song catalog served as plain JSON over HTTP under `/api/canciones`.

mod client;
pub mod error;
pub mod song;

pub use client::{Client, ClientOptions};
pub use error::ApiError;
pub use song::{Acknowledgement, Song, SongDuration, SongId};

pub type Result<T, E = ApiError> = ::core::result::Result<T, E>;

/// The five calls a catalog backend answers.
///
/// [`Client`] speaks HTTP; anything else (an in-memory fake, a cache) can stand in for it.
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /api/canciones`, filtered with `?q=` when `query` is non-empty.
    async fn list(&self, query: Option<&str>) -> Result<Vec<Song>>;
    /// `GET /api/canciones/{id}`
    async fn get(&self, id: &SongId) -> Result<Song>;
    /// `POST /api/canciones`; the song's id is never sent.
    async fn create(&self, song: &Song) -> Result<Acknowledgement>;
    /// `PUT /api/canciones/{id}` with a full replacement payload.
    async fn update(&self, id: &SongId, song: &Song) -> Result<Acknowledgement>;
    /// `DELETE /api/canciones/{id}`
    async fn delete(&self, id: &SongId) -> Result<Acknowledgement>;
}
