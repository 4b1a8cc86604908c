use catalog_api::{Song, SongDuration, SongId};

/// Which request a form submission turns into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    /// Submitting creates a new song (`POST`).
    #[default]
    Create,
    /// Submitting replaces the song with this id (`PUT`).
    Editing(SongId),
}
impl FormMode {
    pub const fn submit_label(&self) -> &'static str {
        match self {
            Self::Create => "Add song",
            Self::Editing(_) => "Update song",
        }
    }

    pub fn editing(&self) -> Option<&SongId> {
        match self {
            Self::Create => None,
            Self::Editing(id) => Some(id),
        }
    }
}

/// One input of the create/update form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SongField {
    Titulo,
    Artista,
    Album,
    Genero,
    Duracion,
    Compositor,
    Escritor,
    Productor,
    Discografica,
}
impl SongField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Titulo => "Title",
            Self::Artista => "Artist",
            Self::Album => "Album",
            Self::Genero => "Genre",
            Self::Duracion => "Duration",
            Self::Compositor => "Composer",
            Self::Escritor => "Writer",
            Self::Productor => "Producer",
            Self::Discografica => "Label",
        }
    }

    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Compositor | Self::Escritor | Self::Productor | Self::Discografica)
    }
}

/// The text currently typed into each form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongForm {
    pub titulo: String,
    pub artista: String,
    pub album: String,
    pub genero: String,
    pub duracion: String,
    pub compositor: String,
    pub escritor: String,
    pub productor: String,
    pub discografica: String,
}
impl SongForm {
    /// Populate every input from a song; absent credits become empty inputs.
    pub fn from_song(song: &Song) -> Self {
        Self {
            titulo: song.titulo.clone(),
            artista: song.artista.clone(),
            album: song.album.clone(),
            genero: song.genero.clone(),
            duracion: song.duracion.to_string(),
            compositor: song.compositor.clone().unwrap_or_default(),
            escritor: song.escritor.clone().unwrap_or_default(),
            productor: song.productor.clone().unwrap_or_default(),
            discografica: song.discografica.clone().unwrap_or_default(),
        }
    }

    /// The payload a submission sends. Empty credit inputs are left out; nothing is validated.
    pub fn to_song(&self) -> Song {
        fn optional(value: &str) -> Option<String> {
            Some(value).filter(|value| !value.is_empty()).map(str::to_owned)
        }

        Song {
            id: None,
            titulo: self.titulo.clone(),
            artista: self.artista.clone(),
            album: self.album.clone(),
            genero: self.genero.clone(),
            duracion: SongDuration::new(self.duracion.clone()),
            compositor: optional(&self.compositor),
            escritor: optional(&self.escritor),
            productor: optional(&self.productor),
            discografica: optional(&self.discografica),
        }
    }

    pub fn get(&self, field: SongField) -> &str {
        match field {
            SongField::Titulo => &self.titulo,
            SongField::Artista => &self.artista,
            SongField::Album => &self.album,
            SongField::Genero => &self.genero,
            SongField::Duracion => &self.duracion,
            SongField::Compositor => &self.compositor,
            SongField::Escritor => &self.escritor,
            SongField::Productor => &self.productor,
            SongField::Discografica => &self.discografica,
        }
    }

    pub fn set(&mut self, field: SongField, value: impl Into<String>) {
        let slot = match field {
            SongField::Titulo => &mut self.titulo,
            SongField::Artista => &mut self.artista,
            SongField::Album => &mut self.album,
            SongField::Genero => &mut self.genero,
            SongField::Duracion => &mut self.duracion,
            SongField::Compositor => &mut self.compositor,
            SongField::Escritor => &mut self.escritor,
            SongField::Productor => &mut self.productor,
            SongField::Discografica => &mut self.discografica,
        };
        *slot = value.into();
    }
}

/// The form together with the mode it submits in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub fields: SongForm,
    pub mode: FormMode,
}
impl FormState {
    pub fn submit_label(&self) -> &'static str {
        self.mode.submit_label()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
impl core::fmt::Display for FormState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use strum::IntoEnumIterator;
        if let Some(id) = self.mode.editing() {
            writeln!(f, "Editing song {id}")?;
        }
        for field in SongField::iter() {
            let value = self.fields.get(field);
            if value.is_empty() && field.is_optional() {
                writeln!(f, "{:>9}: (optional)", field.label())?;
            } else {
                writeln!(f, "{:>9}: {value}", field.label())?;
            }
        }
        write!(f, "[{}]", self.submit_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn labels_follow_mode() {
        assert_eq!(FormMode::Create.submit_label(), "Add song");
        assert_eq!(FormMode::Editing(SongId::new("1")).submit_label(), "Update song");
    }

    #[test]
    fn missing_credits_populate_as_empty() {
        let song = Song {
            id: Some(SongId::new("1")),
            titulo: "X".into(),
            artista: "Y".into(),
            album: "Z".into(),
            genero: "Pop".into(),
            duracion: SongDuration::new("200"),
            compositor: Some("C".into()),
            ..Default::default()
        };
        let form = SongForm::from_song(&song);
        assert_eq!(form.compositor, "C");
        assert_eq!(form.escritor, "");
        assert_eq!(form.discografica, "");
        assert_eq!(form.to_song(), Song { id: None, ..song });
    }

    #[test]
    fn field_names() {
        assert_eq!("Discografica".parse::<SongField>(), Ok(SongField::Discografica));
        assert_eq!(SongField::Duracion.to_string(), "duracion");
        assert_eq!(SongField::iter().filter(|field| field.is_optional()).count(), 4);

        let mut form = SongForm::default();
        for field in SongField::iter() {
            form.set(field, field.as_ref());
        }
        assert!(SongField::iter().all(|field| form.get(field) == field.as_ref()));
    }

    #[test]
    fn display_marks_blank_credits() {
        let mut state = FormState::default();
        state.fields.set(SongField::Titulo, "X");
        state.fields.set(SongField::Escritor, "W");
        let shown = state.to_string();
        assert!(shown.lines().any(|line| line == "    Title: X"));
        assert!(shown.lines().any(|line| line == "    Genre: "));
        assert!(shown.lines().any(|line| line == "   Writer: W"));
        assert!(shown.lines().any(|line| line == " Composer: (optional)"));
        assert!(shown.ends_with("[Add song]"));
    }
}
