use catalog_api::{Song, SongId};
use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_PLACEHOLDER: &str = "-";

/// Key used to decide whether two artist or album names are the same entry.
fn normalize(string: &str) -> String {
    string.trim().nfkc().collect::<String>().to_lowercase()
}

/// Visible text of one song in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRow {
    pub id: Option<SongId>,
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
impl SongRow {
    pub const HEADERS: [&'static str; 10] = ["ID", "Title", "Artist", "Album", "Genre", "Duration", "Composer", "Writer", "Producer", "Label"];

    pub fn new(song: &Song, placeholder: &str) -> Self {
        let credit = |value: &Option<String>| value.as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(placeholder)
            .to_owned();

        Self {
            id: song.id.clone(),
            titulo: song.titulo.clone(),
            artista: song.artista.clone(),
            album: song.album.clone(),
            genero: song.genero.clone(),
            duracion: song.duracion.to_string(),
            compositor: credit(&song.compositor),
            escritor: credit(&song.escritor),
            productor: credit(&song.productor),
            discografica: credit(&song.discografica),
        }
    }

    pub fn cells(&self) -> [&str; 10] {
        [
            self.id.as_ref().map(SongId::as_str).unwrap_or_default(),
            &self.titulo,
            &self.artista,
            &self.album,
            &self.genero,
            &self.duracion,
            &self.compositor,
            &self.escritor,
            &self.productor,
            &self.discografica,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRow {
    pub album: String,
    /// Artist of the first song seen on this album.
    pub artista: String,
    pub songs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRow {
    pub artista: String,
    pub songs: usize,
}

/// Artists in first-seen order, one per distinct name.
pub fn artists(songs: &[Song]) -> Vec<ArtistRow> {
    let mut rows: Vec<(String, ArtistRow)> = Vec::new();
    for song in songs.iter().filter(|song| !song.artista.trim().is_empty()) {
        let key = normalize(&song.artista);
        match rows.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, row)) => row.songs += 1,
            None => rows.push((key, ArtistRow { artista: song.artista.clone(), songs: 1 })),
        }
    }
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Albums in first-seen order, one per distinct title.
pub fn albums(songs: &[Song]) -> Vec<AlbumRow> {
    let mut rows: Vec<(String, AlbumRow)> = Vec::new();
    for song in songs.iter().filter(|song| !song.album.trim().is_empty()) {
        let key = normalize(&song.album);
        match rows.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, row)) => row.songs += 1,
            None => rows.push((key, AlbumRow { album: song.album.clone(), artista: song.artista.clone(), songs: 1 })),
        }
    }
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Everything the catalog currently shows, rebuilt from scratch on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub rows: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
    pub albums: Vec<AlbumRow>,
}
impl Screen {
    /// Replace the song list. Artist and album views are only recomputed for the unfiltered collection.
    pub fn replace(&mut self, songs: &[Song], unfiltered: bool, placeholder: &str) {
        self.rows = songs.iter().map(|song| SongRow::new(song, placeholder)).collect();
        if unfiltered {
            self.artists = artists(songs);
            self.albums = albums(songs);
        }
    }

    pub fn songs_table(&self) -> String {
        table(&SongRow::HEADERS, self.rows.iter().map(|row| row.cells().map(str::to_owned).to_vec()))
    }

    pub fn artists_table(&self) -> String {
        table(&["Artist", "Songs"], self.artists.iter().map(|row| vec![row.artista.clone(), row.songs.to_string()]))
    }

    pub fn albums_table(&self) -> String {
        table(&["Album", "Artist", "Songs"], self.albums.iter().map(|row| vec![row.album.clone(), row.artista.clone(), row.songs.to_string()]))
    }
}

/// Left-aligned text table with a header rule. Widths are measured in terminal columns.
fn table(headers: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = headers.iter().map(|header| header.width()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = line(&widths, headers.iter().copied());
    out.push('\n');
    out += &widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join("  ");
    for row in &rows {
        out.push('\n');
        out += &line(&widths, row.iter().map(String::as_str));
    }
    out
}

/// The last cell is left unpadded, so its own trailing whitespace survives.
fn line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<&str> = cells.collect();
    let last = cells.len().saturating_sub(1);
    cells.iter().zip(widths).enumerate()
        .map(|(index, (cell, width))| match index == last {
            true => cell.to_string(),
            false => format!("{cell}{}", " ".repeat(width.saturating_sub(cell.width()))),
        })
        .collect::<Vec<_>>()
        .join("  ")
}
