use catalog_api::{Acknowledgement, ApiError, CatalogApi, Song, SongId};
use tokio::sync::Mutex;

pub mod confirm;
pub mod form;
pub mod render;
mod sequence;
#[cfg(test)]
pub mod test_utilities;

pub use confirm::{Confirmation, Preapproved, TerminalPrompt};
pub use form::{FormMode, FormState, SongField, SongForm};
pub use render::Screen;
use sequence::RequestSequence;

/// What happened to a list response once it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rendered; carries the number of songs shown.
    Applied(usize),
    /// A later request was issued before this one answered, so it was dropped.
    Superseded,
}

#[derive(Debug)]
pub enum Deletion {
    Declined,
    Deleted(Acknowledgement),
}

#[derive(Debug, Default)]
struct ViewState {
    screen: Screen,
    form: FormState,
    /// Query of the most recently issued load; deletes reload with it.
    current_query: Option<String>,
    sequence: RequestSequence,
}

/// The catalog controller: wires list, search, form and delete actions to backend calls.
///
/// Failures are logged where they happen and otherwise leave what is on screen alone. Nothing is retried.
pub struct CatalogClient<A: CatalogApi> {
    api: A,
    confirmation: Box<dyn Confirmation>,
    placeholder: String,
    state: Mutex<ViewState>,
}
impl<A: CatalogApi> CatalogClient<A> {
    pub fn new(api: A, confirmation: Box<dyn Confirmation>, placeholder: impl Into<String>) -> Self {
        Self {
            api,
            confirmation,
            placeholder: placeholder.into(),
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn screen(&self) -> Screen {
        self.state.lock().await.screen.clone()
    }

    pub async fn form(&self) -> FormState {
        self.state.lock().await.form.clone()
    }

    pub async fn current_query(&self) -> Option<String> {
        self.state.lock().await.current_query.clone()
    }

    /// Fetch the collection, filtered by `query` when it is non-empty, and replace the rendered list with it.
    ///
    /// An unfiltered load also rebuilds the artist and album views. A response is only rendered
    /// if no other load was issued while it was in flight.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn load(&self, query: Option<&str>) -> Result<LoadOutcome, ApiError> {
        let query = query.filter(|query| !query.is_empty());
        let ticket = {
            let mut state = self.state.lock().await;
            state.current_query = query.map(str::to_owned);
            state.sequence.issue()
        };

        let songs = match self.api.list(query).await {
            Ok(songs) => songs,
            Err(error) => {
                tracing::error!(?error, "failed to load songs");
                return Err(error);
            }
        };

        let mut state = self.state.lock().await;
        if !state.sequence.is_latest(ticket) {
            tracing::debug!(?ticket, latest = ?state.sequence.latest(), "discarding superseded song list");
            return Ok(LoadOutcome::Superseded);
        }
        state.screen.replace(&songs, query.is_none(), &self.placeholder);
        Ok(LoadOutcome::Applied(songs.len()))
    }

    /// Live search: one fresh load per keystroke, no debounce, no cancellation.
    pub async fn search(&self, query: &str) -> Result<LoadOutcome, ApiError> {
        self.load(Some(query)).await
    }

    /// Load again with whatever query was last issued.
    pub async fn reload(&self) -> Result<LoadOutcome, ApiError> {
        let query = self.current_query().await;
        self.load(query.as_deref()).await
    }

    #[tracing::instrument(skip(self, song), fields(titulo = %song.titulo), level = "debug")]
    pub async fn create(&self, song: &Song) -> Result<Acknowledgement, ApiError> {
        match self.api.create(song).await {
            Ok(ack) => {
                tracing::info!(id = ?ack.id, message = ?ack.message, "created song");
                self.after_mutation().await;
                Ok(ack)
            }
            Err(error) => {
                tracing::error!(?error, "failed to create song");
                Err(error)
            }
        }
    }

    #[tracing::instrument(skip(self, song), level = "debug")]
    pub async fn update(&self, id: &SongId, song: &Song) -> Result<Acknowledgement, ApiError> {
        match self.api.update(id, song).await {
            Ok(ack) => {
                tracing::info!(message = ?ack.message, "updated song");
                self.after_mutation().await;
                Ok(ack)
            }
            Err(error) => {
                tracing::error!(?error, "failed to update song");
                Err(error)
            }
        }
    }

    /// Clear the form back to create mode and show the full collection again.
    async fn after_mutation(&self) {
        self.state.lock().await.form.reset();
        // failures are logged by `load` itself
        let _ = self.load(None).await;
    }

    /// Submit the form: a `PUT` to the edited song in edit mode, a `POST` otherwise.
    /// The form keeps its contents if the request fails.
    pub async fn submit(&self) -> Result<Acknowledgement, ApiError> {
        let FormState { fields, mode } = self.form().await;
        let song = fields.to_song();
        match mode {
            FormMode::Create => self.create(&song).await,
            FormMode::Editing(id) => self.update(&id, &song).await,
        }
    }

    /// Delete a song after asking for confirmation; a declined prompt sends nothing.
    pub async fn delete(&self, id: &SongId) -> Result<Deletion, ApiError> {
        self.delete_with(id, self.confirmation.as_ref()).await
    }

    /// [`Self::delete`], with the confirmation answered by someone other than the configured prompt.
    #[tracing::instrument(skip(self, confirmation), level = "debug")]
    pub async fn delete_with(&self, id: &SongId, confirmation: &dyn Confirmation) -> Result<Deletion, ApiError> {
        if !confirmation.confirm(&format!("Delete song {id}?")) {
            tracing::debug!("deletion declined");
            return Ok(Deletion::Declined);
        }

        match self.api.delete(id).await {
            Ok(ack) => {
                tracing::info!(message = ?ack.message, "deleted song");
                let _ = self.reload().await;
                Ok(Deletion::Deleted(ack))
            }
            Err(error) => {
                tracing::error!(?error, "failed to delete song");
                Err(error)
            }
        }
    }

    /// Fetch one song and fill the form with it for editing.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn enter_edit_mode(&self, id: &SongId) -> Result<(), ApiError> {
        let song = match self.api.get(id).await {
            Ok(song) => song,
            Err(error) => {
                tracing::error!(?error, "failed to fetch song for editing");
                return Err(error);
            }
        };

        let mut state = self.state.lock().await;
        state.form = FormState {
            fields: SongForm::from_song(&song),
            mode: FormMode::Editing(id.clone()),
        };
        Ok(())
    }

    pub async fn exit_edit_mode(&self) {
        self.state.lock().await.form.reset();
    }

    pub async fn set_field(&self, field: SongField, value: impl Into<String>) {
        self.state.lock().await.form.fields.set(field, value);
    }
}
