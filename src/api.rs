// Server API seam. `HttpApi` talks to the real endpoints with reqwest; tests use a scripted fake.
// Non-2xx bodies carry a FastAPI-style `detail` (string or list of `{msg}`) or a `message`.

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::auth::{Credentials, Registration};
use crate::error::UiError;
use crate::search::SearchQuery;
use crate::types::{MovieId, MovieRecord, StatsSummary};

/// Form fields of an add-to-list submission, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoriteForm {
    pub fields: Vec<(String, String)>,
}

impl FavoriteForm {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        FavoriteForm { fields }
    }

    /// The fields a rendered add form carries for `record`.
    /// `rating` and `release_date` are required by the endpoint and always present.
    pub fn from_record(record: &MovieRecord) -> Self {
        let rating = record.rating.filter(|r| r.is_finite()).unwrap_or(0.0);
        let mut fields = vec![
            ("id".to_string(), record.id.to_string()),
            ("title".to_string(), record.title.clone()),
            ("rating".to_string(), rating.to_string()),
            (
                "release_date".to_string(),
                record.release_date.clone().unwrap_or_default(),
            ),
        ];
        let optional = [
            ("poster_url", record.poster_url.clone()),
            ("director", record.director.clone()),
            ("runtime", record.runtime.map(|r| r.to_string())),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                fields.push((name.to_string(), value));
            }
        }
        if !record.genres.is_empty() {
            fields.push(("genres".to_string(), record.genres.join(", ")));
        }
        FavoriteForm { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Result of a successful add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStatus {
    Added,
    AlreadyListed,
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FavoritesResponse {
    #[serde(default)]
    favorites: Vec<MovieRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    movies: Vec<MovieRecord>,
}

/// Endpoints the client consumes.
#[allow(async_fn_in_trait)]
pub trait MovieApi {
    async fn add_favorite(&self, form: &FavoriteForm) -> Result<AddStatus, UiError>;
    async fn remove_favorite(&self, id: MovieId) -> Result<(), UiError>;
    async fn list_favorites(&self) -> Result<Vec<MovieRecord>, UiError>;
    async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, UiError>;
    async fn login(&self, credentials: &Credentials) -> Result<(), UiError>;
    async fn register(&self, registration: &Registration) -> Result<(), UiError>;
    async fn wrapped(&self) -> Result<StatsSummary, UiError>;
}

impl<T: MovieApi + ?Sized> MovieApi for &T {
    async fn add_favorite(&self, form: &FavoriteForm) -> Result<AddStatus, UiError> {
        (**self).add_favorite(form).await
    }

    async fn remove_favorite(&self, id: MovieId) -> Result<(), UiError> {
        (**self).remove_favorite(id).await
    }

    async fn list_favorites(&self) -> Result<Vec<MovieRecord>, UiError> {
        (**self).list_favorites().await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, UiError> {
        (**self).search(query).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), UiError> {
        (**self).login(credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), UiError> {
        (**self).register(registration).await
    }

    async fn wrapped(&self) -> Result<StatsSummary, UiError> {
        (**self).wrapped().await
    }
}

/// Pull a human-readable message out of an error body.
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let text = |v: &serde_json::Value| v.as_str().map(str::to_string);

    match value.get("detail") {
        Some(serde_json::Value::Array(items)) => {
            if let Some(msg) = items.first().and_then(|item| item.get("msg")).and_then(text) {
                return Some(msg);
            }
        }
        Some(detail) => {
            if let Some(msg) = text(detail) {
                return Some(msg);
            }
        }
        None => {}
    }
    value.get("message").and_then(text)
}

/// reqwest-backed client for the same-origin API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    /// `base` is the API origin, e.g. `https://movies.example`.
    pub fn new(base: impl Into<String>) -> Self {
        HttpApi {
            client: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, UiError> {
        let response = request
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(UiError::Server {
            status: status.as_u16(),
            message: server_message(&body),
        })
    }
}

impl MovieApi for HttpApi {
    async fn add_favorite(&self, form: &FavoriteForm) -> Result<AddStatus, UiError> {
        let response = self
            .send(self.client.post(self.url("/api/favorites")).form(&form.fields))
            .await?;
        let body = response.text().await?;
        // An empty or non-JSON 2xx body still means the movie was added.
        let status = serde_json::from_str::<AddResponse>(&body)
            .ok()
            .and_then(|r| r.status);
        Ok(match status.as_deref() {
            Some("exists") => AddStatus::AlreadyListed,
            _ => AddStatus::Added,
        })
    }

    async fn remove_favorite(&self, id: MovieId) -> Result<(), UiError> {
        self.send(self.client.delete(self.url(&format!("/api/favorites/{}", id))))
            .await?;
        Ok(())
    }

    async fn list_favorites(&self) -> Result<Vec<MovieRecord>, UiError> {
        let response = self.send(self.client.get(self.url("/api/favorites"))).await?;
        let body: FavoritesResponse = response.json().await?;
        Ok(body.favorites)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, UiError> {
        let request = self
            .client
            .get(self.url("/api/search"))
            .query(&[("q", query.text()), ("type", query.kind().as_str())]);
        let body: SearchResponse = self.send(request).await?.json().await?;
        Ok(body.movies)
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), UiError> {
        let fields = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        self.send(self.client.post(self.url("/api/auth/login")).form(&fields))
            .await?;
        Ok(())
    }

    async fn register(&self, registration: &Registration) -> Result<(), UiError> {
        let fields = [
            ("username", registration.username.as_str()),
            ("password", registration.password.as_str()),
            ("confirm", registration.confirm.as_str()),
        ];
        self.send(self.client.post(self.url("/api/auth/register")).form(&fields))
            .await?;
        Ok(())
    }

    async fn wrapped(&self) -> Result<StatsSummary, UiError> {
        let response = self.send(self.client.get(self.url("/api/wrapped"))).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    type Scripted<T> = RefCell<Option<Result<T, UiError>>>;

    /// Scripted API. Unscripted calls succeed with empty data.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub add: Scripted<AddStatus>,
        pub remove: Scripted<()>,
        pub favorites: Scripted<Vec<MovieRecord>>,
        pub search: Scripted<Vec<MovieRecord>>,
        pub login: Scripted<()>,
        pub register: Scripted<()>,
        pub wrapped: Scripted<StatsSummary>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl MovieApi for FakeApi {
        async fn add_favorite(&self, form: &FavoriteForm) -> Result<AddStatus, UiError> {
            self.record(format!("POST /api/favorites id={}", form.get("id").unwrap_or("")));
            self.add.borrow_mut().take().unwrap_or(Ok(AddStatus::Added))
        }

        async fn remove_favorite(&self, id: MovieId) -> Result<(), UiError> {
            self.record(format!("DELETE /api/favorites/{}", id));
            self.remove.borrow_mut().take().unwrap_or(Ok(()))
        }

        async fn list_favorites(&self) -> Result<Vec<MovieRecord>, UiError> {
            self.record("GET /api/favorites".to_string());
            self.favorites.borrow_mut().take().unwrap_or(Ok(Vec::new()))
        }

        async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, UiError> {
            self.record(format!("GET /api/search q={} type={}", query.text(), query.kind().as_str()));
            self.search.borrow_mut().take().unwrap_or(Ok(Vec::new()))
        }

        async fn login(&self, credentials: &Credentials) -> Result<(), UiError> {
            self.record(format!("POST /api/auth/login {}", credentials.username));
            self.login.borrow_mut().take().unwrap_or(Ok(()))
        }

        async fn register(&self, registration: &Registration) -> Result<(), UiError> {
            self.record(format!("POST /api/auth/register {}", registration.username));
            self.register.borrow_mut().take().unwrap_or(Ok(()))
        }

        async fn wrapped(&self) -> Result<StatsSummary, UiError> {
            self.record("GET /api/wrapped".to_string());
            self.wrapped.borrow_mut().take().unwrap_or_else(|| Ok(StatsSummary::default()))
        }
    }
}
