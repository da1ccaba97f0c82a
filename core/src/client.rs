//! Stateless HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Every resource shares the same builders; the only per-resource logic is
//! the path segment taken from `Record::RESOURCE`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Book, Resource};

const API_PREFIX: &str = "/api";

/// Synchronous, stateless client for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path`, which is relative to the base URL and must
    /// start with `/`. A body is sent as JSON.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let (headers, body) = match body {
            Some(b) => {
                let json = serde_json::to_string(b).map_err(|e| ApiError::Serialization(e.to_string()))?;
                (vec![("content-type".to_string(), "application/json".to_string())], Some(json))
            }
            None => (Vec::new(), None),
        };
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            query: Vec::new(),
            headers,
            body,
        })
    }

    pub fn build_list(&self, resource: Resource) -> HttpRequest {
        self.bodiless(HttpMethod::Get, &collection_path(resource))
    }

    pub fn build_get(&self, resource: Resource, id: i64) -> HttpRequest {
        self.bodiless(HttpMethod::Get, &item_path(resource, id))
    }

    pub fn build_create<B: Serialize>(&self, resource: Resource, input: &B) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, &collection_path(resource), Some(input))
    }

    /// `method` is `Put` for full replacement or `Patch` for partial update.
    pub fn build_update<B: Serialize>(
        &self,
        resource: Resource,
        id: i64,
        method: HttpMethod,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(method, &item_path(resource, id), Some(input))
    }

    pub fn build_delete(&self, resource: Resource, id: i64) -> HttpRequest {
        self.bodiless(HttpMethod::Delete, &item_path(resource, id))
    }

    pub fn build_search_books(&self, title: &str) -> HttpRequest {
        let mut req = self.bodiless(
            HttpMethod::Get,
            &format!("{}/search/title", collection_path(Resource::Books)),
        );
        req.query.push(("title".to_string(), title.to_string()));
        req
    }

    pub fn parse_list<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        self.parse_record(response)
    }

    pub fn parse_record<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_search_books(&self, response: HttpResponse) -> Result<Vec<Book>, ApiError> {
        self.parse_list(response)
    }

    /// Deletes return no content; any success body is ignored.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// Parse a success body if there is one. An empty body yields `None`.
    pub fn parse_optional<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<Option<R>, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn bodiless(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }
}

pub fn collection_path(resource: Resource) -> String {
    format!("{API_PREFIX}/{}", resource.path())
}

pub fn item_path(resource: Resource, id: i64) -> String {
    format!("{API_PREFIX}/{}/{id}", resource.path())
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let err = ApiError::from_response(response);
    tracing::debug!(status = response.status, error = %err, "request failed");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookInput, Student, StudentInput};

    fn client() -> CatalogClient {
        CatalogClient::new("http://localhost:8080")
    }

    fn book_input() -> BookInput {
        BookInput {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            isbn: Some("1234567890".to_string()),
            price: Some(18.5),
            publish_date: Some("1965-08-01".to_string()),
        }
    }

    #[test]
    fn build_list_produces_correct_request() {
        let req = client().build_list(Resource::Books);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/books");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_uses_item_path() {
        let req = client().build_get(Resource::Students, 42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/students/42");
    }

    #[test]
    fn build_create_sends_json_body() {
        let req = client().build_create(Resource::Books, &book_input()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/books");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Dune");
        assert_eq!(body["publishDate"], "1965-08-01");
        assert_eq!(body["price"], 18.5);
    }

    #[test]
    fn build_update_honours_method() {
        let input = StudentInput {
            name: Some("Kim".to_string()),
            student_number: Some("A12345".to_string()),
            date_of_birth: None,
        };
        let req = client()
            .build_update(Resource::Students, 3, HttpMethod::Patch, &input)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:8080/api/students/3");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["studentNumber"], "A12345");
        assert!(body.get("dateOfBirth").is_none());
    }

    #[test]
    fn build_delete_has_no_body() {
        let req = client().build_delete(Resource::Books, 9);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8080/api/books/9");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_search_books_keeps_title_as_query() {
        let req = client().build_search_books("war & peace");
        assert_eq!(req.path, "http://localhost:8080/api/books/search/title");
        assert_eq!(req.query, vec![("title".to_string(), "war & peace".to_string())]);
    }

    #[test]
    fn build_request_without_body() {
        let req = client()
            .build_request::<()>(HttpMethod::Get, "/api/books/1", None)
            .unwrap();
        assert_eq!(req.path, "http://localhost:8080/api/books/1");
        assert!(req.headers.is_empty());
    }

    #[test]
    fn parse_list_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":1,"name":"Kim","studentNumber":"A12345","dateOfBirth":null}]"#,
        );
        let students: Vec<Student> = client().parse_list(response).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].student_number, "A12345");
    }

    #[test]
    fn parse_record_not_found() {
        let response = HttpResponse::new(404, r#"{"message":"book 5 does not exist"}"#);
        let err = client().parse_record::<Book>(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "book 5 does not exist"));
    }

    #[test]
    fn create_accepts_200_and_201() {
        let body = r#"{"id":1,"title":"Dune","author":"Frank Herbert","isbn":"1234567890","price":18.5,"publishDate":"1965-08-01"}"#;
        for status in [200, 201] {
            let book: Book = client().parse_record(HttpResponse::new(status, body)).unwrap();
            assert_eq!(book.id, 1);
        }
    }

    #[test]
    fn parse_empty_accepts_204_and_200() {
        assert!(client().parse_empty(HttpResponse::new(204, "")).is_ok());
        assert!(client().parse_empty(HttpResponse::new(200, "{}")).is_ok());
    }

    #[test]
    fn parse_empty_maps_not_found() {
        let err = client().parse_empty(HttpResponse::new(404, "{}")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn parse_optional_empty_body_is_none() {
        let value: Option<serde_json::Value> = client().parse_optional(HttpResponse::new(204, "")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = CatalogClient::new("http://localhost:8080/");
        let req = client.build_list(Resource::Books);
        assert_eq!(req.path, "http://localhost:8080/api/books");
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client()
            .parse_list::<Book>(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
