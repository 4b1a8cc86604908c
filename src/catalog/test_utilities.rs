use std::{collections::HashMap, sync::{atomic::{AtomicBool, AtomicU64, Ordering}, Mutex}};

use catalog_api::{Acknowledgement, ApiError, CatalogApi, Song, SongId};
use tokio::sync::oneshot;

/// A request the fake backend received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Option<String>),
    Get(SongId),
    Create(Song),
    Update(SongId, Song),
    Delete(SongId),
}

/// In-memory catalog that filters the way the real backend does and records every call.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    songs: Mutex<Vec<Song>>,
    calls: Mutex<Vec<Call>>,
    held: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    next_id: AtomicU64,
    failing: AtomicBool,
}
impl FakeCatalog {
    pub fn with_songs(songs: Vec<Song>) -> Self {
        Self {
            next_id: AtomicU64::new(songs.len() as u64),
            songs: Mutex::new(songs),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn songs(&self) -> Vec<Song> {
        self.songs.lock().unwrap().clone()
    }

    /// Every following call fails with a 500 until turned off again.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The next list request for `query` does not answer until the returned sender fires.
    pub fn hold(&self, query: &str) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.held.lock().unwrap().insert(query.to_owned(), receiver);
        sender
    }

    fn record(&self, call: Call) -> catalog_api::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Status { status: reqwest::StatusCode::INTERNAL_SERVER_ERROR, message: Some("backend down".into()) });
        }
        Ok(())
    }

    fn not_found() -> ApiError {
        ApiError::Status { status: reqwest::StatusCode::NOT_FOUND, message: Some("Canción no encontrada".into()) }
    }
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn list(&self, query: Option<&str>) -> catalog_api::Result<Vec<Song>> {
        self.record(Call::List(query.map(str::to_owned)))?;
        let held = self.held.lock().unwrap().remove(query.unwrap_or_default());
        if let Some(held) = held {
            let _ = held.await;
        }

        let query = query.unwrap_or_default().to_lowercase();
        Ok(self.songs().into_iter().filter(|song| {
            query.is_empty()
                || song.titulo.to_lowercase().contains(&query)
                || song.artista.to_lowercase().contains(&query)
                || song.album.to_lowercase().contains(&query)
        }).collect())
    }

    async fn get(&self, id: &SongId) -> catalog_api::Result<Song> {
        self.record(Call::Get(id.clone()))?;
        self.songs().into_iter().find(|song| song.id.as_ref() == Some(id)).ok_or_else(Self::not_found)
    }

    async fn create(&self, song: &Song) -> catalog_api::Result<Acknowledgement> {
        self.record(Call::Create(song.clone()))?;
        let id = SongId::new(format!("C{:03}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1));
        self.songs.lock().unwrap().push(Song { id: Some(id.clone()), ..song.clone() });
        Ok(Acknowledgement { id: Some(id), message: Some("Canción añadida con éxito".into()), song: None })
    }

    async fn update(&self, id: &SongId, song: &Song) -> catalog_api::Result<Acknowledgement> {
        self.record(Call::Update(id.clone(), song.clone()))?;
        let mut songs = self.songs.lock().unwrap();
        let stored = songs.iter_mut().find(|stored| stored.id.as_ref() == Some(id)).ok_or_else(Self::not_found)?;
        *stored = Song { id: Some(id.clone()), ..song.clone() };
        Ok(Acknowledgement { id: None, message: Some(format!("Canción {id} actualizada con éxito")), song: None })
    }

    async fn delete(&self, id: &SongId) -> catalog_api::Result<Acknowledgement> {
        self.record(Call::Delete(id.clone()))?;
        let mut songs = self.songs.lock().unwrap();
        let index = songs.iter().position(|song| song.id.as_ref() == Some(id)).ok_or_else(Self::not_found)?;
        songs.remove(index);
        Ok(Acknowledgement { id: None, message: Some(format!("Canción {id} eliminada")), song: None })
    }
}
