//! Request wrapper shared by every CRUD operation.
//!
//! `ApiService` pairs a `CatalogClient` with a `Transport`. Transport
//! failures are logged with their raw cause and surfaced as
//! `ApiError::Transport`, whose message is a fixed connectivity hint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Book, Record};

/// HTTP verb used to submit an edited record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMethod {
    #[default]
    Put,
    Patch,
}

impl From<UpdateMethod> for HttpMethod {
    fn from(method: UpdateMethod) -> Self {
        match method {
            UpdateMethod::Put => HttpMethod::Put,
            UpdateMethod::Patch => HttpMethod::Patch,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiService<T> {
    client: CatalogClient,
    transport: T,
    update_method: UpdateMethod,
}

impl<T: Transport> ApiService<T> {
    pub fn new(client: CatalogClient, transport: T) -> Self {
        Self {
            client,
            transport,
            update_method: UpdateMethod::default(),
        }
    }

    pub fn with_update_method(mut self, method: UpdateMethod) -> Self {
        self.update_method = method;
        self
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue `method` against `path` (relative to the base URL) and parse the
    /// JSON reply. Returns `None` for deletes and empty success bodies.
    pub fn request<B, R>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let req = self.client.build_request(method, path, body)?;
        let response = self.execute(&req)?;
        if method == HttpMethod::Delete {
            return self.client.parse_empty(response).map(|()| None);
        }
        self.client.parse_optional(response)
    }

    pub fn list<R: Record>(&self) -> Result<Vec<R>, ApiError> {
        let response = self.execute(&self.client.build_list(R::RESOURCE))?;
        self.client.parse_list(response)
    }

    pub fn get<R: Record>(&self, id: i64) -> Result<R, ApiError> {
        let response = self.execute(&self.client.build_get(R::RESOURCE, id))?;
        self.client.parse_record(response)
    }

    pub fn create<R: Record>(&self, input: &R::Input) -> Result<R, ApiError> {
        let req = self.client.build_create(R::RESOURCE, input)?;
        let response = self.execute(&req)?;
        self.client.parse_record(response)
    }

    pub fn update<R: Record>(&self, id: i64, input: &R::Input) -> Result<R, ApiError> {
        let req = self
            .client
            .build_update(R::RESOURCE, id, self.update_method.into(), input)?;
        let response = self.execute(&req)?;
        self.client.parse_record(response)
    }

    pub fn delete<R: Record>(&self, id: i64) -> Result<(), ApiError> {
        let response = self.execute(&self.client.build_delete(R::RESOURCE, id))?;
        self.client.parse_empty(response)
    }

    pub fn search_books(&self, title: &str) -> Result<Vec<Book>, ApiError> {
        let response = self.execute(&self.client.build_search_books(title))?;
        self.client.parse_search_books(response)
    }

    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %req.method, url = %req.path, "api request");
        self.transport.execute(req).map_err(|e| {
            tracing::error!(error = %e, "api request did not complete");
            ApiError::Transport(e.cause)
        })
    }
}
