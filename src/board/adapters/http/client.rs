//! `reqwest`-backed implementation of [`TiddlerStore`].
//!
//! Reads and writes go through the `default` recipe; deletes go to the
//! `default` bag. Titles and filter expressions are percent-encoded.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::debug;

use crate::board::{
    domain::Tiddler,
    ports::{StoreOperation, TiddlerStore, TiddlerStoreError, TiddlerStoreResult},
};
use crate::config::{ConfigError, StoreSettings};

const CLIENT_HEADER: &str = "X-Requested-With";

#[derive(Debug, Clone)]
struct Credentials {
    user: String,
    password: String,
}

/// Document store client speaking the recipe/bag REST interface.
#[derive(Debug, Clone)]
pub struct HttpTiddlerStore {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    client_header: String,
}

impl HttpTiddlerStore {
    /// Creates a client from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] when no base address is
    /// configured or [`ConfigError::InvalidBaseUrl`] when it is not an
    /// absolute URL.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, ConfigError> {
        Self::with_client(Client::new(), settings)
    }

    /// Creates a store around an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// See [`Self::from_settings`].
    pub fn with_client(client: Client, settings: &StoreSettings) -> Result<Self, ConfigError> {
        let base_url = settings.base_url()?;
        Url::parse(base_url).map_err(|_| ConfigError::InvalidBaseUrl(base_url.to_owned()))?;
        let credentials = settings.credentials().map(|(user, password)| Credentials {
            user: user.to_owned(),
            password: password.to_owned(),
        });
        Ok(Self {
            client,
            base_url: base_url.to_owned(),
            credentials,
            client_header: settings.client_header.clone(),
        })
    }

    /// Returns the normalised base address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, title: &str) -> String {
        format!(
            "{}/recipes/default/tiddlers/{}",
            self.base_url,
            urlencoding::encode(title)
        )
    }

    fn bag_item_url(&self, title: &str) -> String {
        format!(
            "{}/bags/default/tiddlers/{}",
            self.base_url,
            urlencoding::encode(title)
        )
    }

    fn query_url(&self, filter: &str) -> String {
        format!(
            "{}/recipes/default/tiddlers.json?filter={}",
            self.base_url,
            urlencoding::encode(filter)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.user, Some(&credentials.password))
            }
            None => request,
        }
    }

    fn mutating(&self, request: RequestBuilder) -> RequestBuilder {
        self.authorize(request)
            .header(CLIENT_HEADER, self.client_header.as_str())
    }

    async fn send(
        request: RequestBuilder,
        operation: StoreOperation,
        target: &str,
    ) -> TiddlerStoreResult<Response> {
        let response = request.send().await.map_err(TiddlerStoreError::transport)?;
        let status = response.status();
        debug!(
            %operation,
            document = target,
            status = status.as_u16(),
            "store request completed"
        );

        if status.is_success() {
            return Ok(response);
        }
        if operation == StoreOperation::Get && status == StatusCode::NOT_FOUND {
            return Err(TiddlerStoreError::NotFound(target.to_owned()));
        }
        Err(TiddlerStoreError::Remote {
            operation,
            target: target.to_owned(),
            status: status.as_u16(),
        })
    }

    async fn query(&self, filter: &str) -> TiddlerStoreResult<Vec<Tiddler>> {
        let request = self.authorize(self.client.get(self.query_url(filter)));
        let response = Self::send(request, StoreOperation::Query, filter).await?;
        response.json().await.map_err(TiddlerStoreError::decode)
    }
}

#[async_trait]
impl TiddlerStore for HttpTiddlerStore {
    async fn get_tiddler(&self, title: &str) -> TiddlerStoreResult<Tiddler> {
        let request = self.authorize(self.client.get(self.item_url(title)));
        let response = Self::send(request, StoreOperation::Get, title).await?;
        response.json().await.map_err(TiddlerStoreError::decode)
    }

    async fn put_tiddler(&self, tiddler: &Tiddler) -> TiddlerStoreResult<()> {
        let request = self
            .mutating(self.client.put(self.item_url(&tiddler.title)))
            .json(tiddler);
        Self::send(request, StoreOperation::Put, &tiddler.title).await?;
        Ok(())
    }

    async fn delete_tiddler(&self, title: &str) -> TiddlerStoreResult<()> {
        let request = self.mutating(self.client.delete(self.bag_item_url(title)));
        Self::send(request, StoreOperation::Delete, title).await?;
        Ok(())
    }

    async fn query_by_tag(&self, tag: &str) -> TiddlerStoreResult<Vec<Tiddler>> {
        self.query(&format!("[tag[{tag}]]")).await
    }

    async fn query_by_list(&self, container: &str) -> TiddlerStoreResult<Vec<Tiddler>> {
        self.query(&format!("[list[{container}]]")).await
    }
}
