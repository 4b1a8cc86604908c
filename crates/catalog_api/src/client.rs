use reqwest::{header, Method, Url};

use crate::{Acknowledgement, ApiError, CatalogApi, Result, Song, SongId};

const COLLECTION_PATH: [&str; 2] = ["api", "canciones"];
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub user_agent: Option<String>,
    /// No timeout unless one is given; a hung request simply never resolves.
    pub timeout: Option<core::time::Duration>,
}

/// HTTP implementation of [`CatalogApi`] for a backend rooted at some base url.
#[derive(Debug, Clone)]
pub struct Client {
    pub net: reqwest::Client, // exposed for re-use
    base: Url,
}
impl Client {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_owned()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_owned()));
        }

        let mut net = reqwest::Client::builder()
            .user_agent(options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));
        if let Some(timeout) = options.timeout {
            net = net.timeout(timeout);
        }

        Ok(Self { net: net.build()?, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// The collection url, or the url of a single song when given an id.
    /// Ids are percent-encoded as one path segment.
    pub fn endpoint(&self, id: Option<&SongId>) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // `new` rejects cannot-be-a-base urls, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(COLLECTION_PATH);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    pub fn search_url(&self, query: Option<&str>) -> Url {
        let mut url = self.endpoint(None);
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            url.query_pairs_mut().append_pair("q", query);
        }
        url
    }

    /// Send a request and return the body of a successful response.
    async fn dispatch(&self, method: Method, url: Url, body: Option<&Song>) -> Result<String> {
        let mut request = self.net.request(method.clone(), url.clone())
            .header(header::ACCEPT, "application/json");
        if let Some(song) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_string(&song.clone().into_payload())?);
        }

        tracing::trace!(%method, %url, "dispatching request");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl CatalogApi for Client {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Song>> {
        let body = self.dispatch(Method::GET, self.search_url(query), None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get(&self, id: &SongId) -> Result<Song> {
        let body = self.dispatch(Method::GET, self.endpoint(Some(id)), None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn create(&self, song: &Song) -> Result<Acknowledgement> {
        let body = self.dispatch(Method::POST, self.endpoint(None), Some(song)).await?;
        Ok(Acknowledgement::from_body(&body))
    }

    async fn update(&self, id: &SongId, song: &Song) -> Result<Acknowledgement> {
        let body = self.dispatch(Method::PUT, self.endpoint(Some(id)), Some(song)).await?;
        Ok(Acknowledgement::from_body(&body))
    }

    async fn delete(&self, id: &SongId) -> Result<Acknowledgement> {
        let body = self.dispatch(Method::DELETE, self.endpoint(Some(id)), None).await?;
        Ok(Acknowledgement::from_body(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Client {
        Client::new(base, ClientOptions::default()).expect("valid base url")
    }

    #[test]
    fn endpoints() {
        let client = client("http://127.0.0.1:5000");
        assert_eq!(client.endpoint(None).as_str(), "http://127.0.0.1:5000/api/canciones");
        assert_eq!(client.endpoint(Some(&SongId::new("C001"))).as_str(), "http://127.0.0.1:5000/api/canciones/C001");
        assert_eq!(client.endpoint(Some(&SongId::new("a/b c"))).as_str(), "http://127.0.0.1:5000/api/canciones/a%2Fb%20c");
    }

    #[test]
    fn endpoints_under_prefix() {
        let client = client("https://example.com/catalogo/?stale=1");
        assert_eq!(client.endpoint(None).as_str(), "https://example.com/catalogo/api/canciones");
    }

    #[test]
    fn search_query() {
        let client = client("http://localhost");
        assert_eq!(client.search_url(None).as_str(), "http://localhost/api/canciones");
        assert_eq!(client.search_url(Some("")).as_str(), "http://localhost/api/canciones");
        assert_eq!(client.search_url(Some("la bamba&co")).as_str(), "http://localhost/api/canciones?q=la+bamba%26co");
    }

    #[test]
    fn rejects_bad_base() {
        assert!(matches!(Client::new("not a url", ClientOptions::default()), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(Client::new("mailto:someone@example.com", ClientOptions::default()), Err(ApiError::InvalidUrl(_))));
    }

    /// What a one-shot local server saw of the single request it accepted.
    struct Received {
        request_line: String,
        body: String,
    }

    /// Serve exactly one request, answering with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> (Client, tokio::task::JoinHandle<Received>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut client = client(&format!("http://{}", listener.local_addr().unwrap()));
        client.net = reqwest::Client::builder().no_proxy().build().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buffer = Vec::new();
            let mut chunk = [0u8; 1024];
            let head_end = loop {
                let read = stream.read(&mut chunk).await.unwrap();
                assert_ne!(read, 0, "connection closed mid-request");
                buffer.extend_from_slice(&chunk[..read]);
                if let Some(position) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                    break position + 4;
                }
            };
            let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
            let length = head.lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buffer.len() < head_end + length {
                let read = stream.read(&mut chunk).await.unwrap();
                assert_ne!(read, 0, "connection closed mid-body");
                buffer.extend_from_slice(&chunk[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            Received {
                request_line: head.lines().next().unwrap_or_default().to_owned(),
                body: String::from_utf8_lossy(&buffer[head_end..head_end + length]).into_owned(),
            }
        });
        (client, server)
    }

    fn song() -> Song {
        Song {
            id: Some(SongId::new("C001")),
            titulo: "Persiana Americana".into(),
            artista: "Soda Stereo".into(),
            album: "Signos".into(),
            genero: "Rock".into(),
            duracion: crate::SongDuration::new("4:51"),
            productor: Some("Soda Stereo".into()),
            ..Default::default()
        }
    }

    fn json(body: &str) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::from_str(body).unwrap() {
            serde_json::Value::Object(object) => object,
            other => panic!("expected a json object, got {other}"),
        }
    }

    #[tokio::test]
    async fn create_posts_to_collection_without_id() {
        let (client, server) = serve_once("201 Created", r#"{"mensaje":"Canción añadida con éxito","id":"C005"}"#).await;
        let ack = client.create(&song()).await.unwrap();
        let received = server.await.unwrap();

        assert_eq!(received.request_line, "POST /api/canciones HTTP/1.1");
        let body = json(&received.body);
        assert!(!body.contains_key("id"));
        assert_eq!(body["titulo"], "Persiana Americana");
        assert_eq!(body["productor"], "Soda Stereo");
        assert_eq!(ack.id, Some(SongId::new("C005")));
        assert_eq!(ack.message.as_deref(), Some("Canción añadida con éxito"));
    }

    #[tokio::test]
    async fn update_puts_to_song_path() {
        let (client, server) = serve_once("200 OK", r#"{"mensaje":"Canción C001 actualizada con éxito"}"#).await;
        client.update(&SongId::new("C001"), &song()).await.unwrap();
        let received = server.await.unwrap();

        assert_eq!(received.request_line, "PUT /api/canciones/C001 HTTP/1.1");
        let body = json(&received.body);
        assert!(!body.contains_key("id"));
        assert_eq!(body["duracion"], "4:51");
    }

    #[tokio::test]
    async fn delete_sends_no_body() {
        let (client, server) = serve_once("200 OK", r#"{"mensaje":"Canción C001 eliminada"}"#).await;
        let ack = client.delete(&SongId::new("C001")).await.unwrap();
        let received = server.await.unwrap();

        assert_eq!(received.request_line, "DELETE /api/canciones/C001 HTTP/1.1");
        assert!(received.body.is_empty());
        assert_eq!(ack.message.as_deref(), Some("Canción C001 eliminada"));
    }

    #[tokio::test]
    async fn list_sends_query() {
        let (client, server) = serve_once("200 OK", r#"[{"id":"C001","titulo":"Persiana Americana","artista":"Soda Stereo","album":"Signos","genero":"Rock","duracion":"4:51"}]"#).await;
        let songs = client.list(Some("soda stereo")).await.unwrap();
        let received = server.await.unwrap();

        assert_eq!(received.request_line, "GET /api/canciones?q=soda+stereo HTTP/1.1");
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, Some(SongId::new("C001")));
    }

    #[tokio::test]
    async fn missing_song_maps_to_status_error() {
        let (client, server) = serve_once("404 Not Found", r#"{"error":"Canción no encontrada"}"#).await;
        let error = client.get(&SongId::new("C999")).await.unwrap_err();
        let received = server.await.unwrap();

        assert_eq!(received.request_line, "GET /api/canciones/C999 HTTP/1.1");
        assert!(error.is_not_found());
        assert!(matches!(error, ApiError::Status { message: Some(ref message), .. } if message == "Canción no encontrada"));
    }
}
