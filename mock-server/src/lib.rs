use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: f64,
    pub publish_date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub price: Option<f64>,
    pub publish_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub student_number: String,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: Option<String>,
    pub student_number: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Deserialize)]
pub struct TitleSearch {
    #[serde(default)]
    pub title: String,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    books: BTreeMap<i64, Book>,
    students: BTreeMap<i64, Student>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Non-2xx reply carrying the `{"message": ...}` body clients expect.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(kind: &str, id: i64) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{kind} {id} does not exist"))
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, message = %self.message, "request rejected");
        (self.status, Json(serde_json::json!({ "message": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiFailure {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// `Json` body whose rejections are reported as `{"message": ...}`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Numeric `{id}` path segment; a malformed id is a 400 with a message body.
pub struct Id(pub i64);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/search/title", get(search_books))
        .route(
            "/api/books/{id}",
            get(get_book).put(replace_book).patch(patch_book).delete(delete_book),
        )
        .route("/api/students", get(list_students).post(create_student))
        .route(
            "/api/students/{id}",
            get(get_student)
                .put(replace_student)
                .patch(patch_student)
                .delete(delete_student),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiFailure> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiFailure::bad_request(format!("{field} is required")))
}

/// A field absent from a partial update is left alone; a present one must
/// not be blank.
fn if_present(value: Option<String>, field: &str) -> Result<Option<String>, ApiFailure> {
    value.map(|v| required(Some(v), field)).transpose()
}

fn valid_price(price: Option<f64>) -> Result<f64, ApiFailure> {
    match price {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(p),
        Some(_) => Err(ApiFailure::bad_request("price must be a non-negative number")),
        None => Err(ApiFailure::bad_request("price is required")),
    }
}

// --- books ---

async fn list_books(State(db): State<Db>) -> Json<Vec<Book>> {
    let store = db.read().await;
    Json(store.books.values().cloned().collect())
}

async fn search_books(State(db): State<Db>, Query(search): Query<TitleSearch>) -> Json<Vec<Book>> {
    let needle = search.title.trim().to_lowercase();
    let store = db.read().await;
    Json(
        store
            .books
            .values()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}

async fn get_book(State(db): State<Db>, Id(id): Id) -> Result<Json<Book>, ApiFailure> {
    let store = db.read().await;
    store
        .books
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("book", id))
}

async fn create_book(
    State(db): State<Db>,
    JsonBody(input): JsonBody<BookPayload>,
) -> Result<(StatusCode, Json<Book>), ApiFailure> {
    let title = required(input.title, "title")?;
    let author = required(input.author, "author")?;
    let isbn = required(input.isbn, "isbn")?;
    let price = valid_price(input.price)?;
    let publish_date = required(input.publish_date, "publishDate")?;

    let mut store = db.write().await;
    if store.books.values().any(|b| b.isbn == isbn) {
        return Err(ApiFailure::conflict(format!("duplicate isbn {isbn}")));
    }
    let book = Book {
        id: store.next_id(),
        title,
        author,
        isbn,
        price,
        publish_date,
    };
    store.books.insert(book.id, book.clone());
    tracing::info!(id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn replace_book(
    State(db): State<Db>,
    Id(id): Id,
    JsonBody(input): JsonBody<BookPayload>,
) -> Result<Json<Book>, ApiFailure> {
    let title = required(input.title, "title")?;
    let author = required(input.author, "author")?;
    let isbn = required(input.isbn, "isbn")?;
    let price = valid_price(input.price)?;
    let publish_date = required(input.publish_date, "publishDate")?;
    apply_book(db, id, BookPayload {
        title: Some(title),
        author: Some(author),
        isbn: Some(isbn),
        price: Some(price),
        publish_date: Some(publish_date),
    })
    .await
}

async fn patch_book(
    State(db): State<Db>,
    Id(id): Id,
    JsonBody(input): JsonBody<BookPayload>,
) -> Result<Json<Book>, ApiFailure> {
    let input = BookPayload {
        title: if_present(input.title, "title")?,
        author: if_present(input.author, "author")?,
        isbn: if_present(input.isbn, "isbn")?,
        price: input.price.map(|p| valid_price(Some(p))).transpose()?,
        publish_date: if_present(input.publish_date, "publishDate")?,
    };
    apply_book(db, id, input).await
}

async fn apply_book(db: Db, id: i64, input: BookPayload) -> Result<Json<Book>, ApiFailure> {
    let mut store = db.write().await;
    if !store.books.contains_key(&id) {
        return Err(ApiFailure::not_found("book", id));
    }
    if let Some(isbn) = &input.isbn {
        if store.books.values().any(|b| b.id != id && &b.isbn == isbn) {
            return Err(ApiFailure::conflict(format!("duplicate isbn {isbn}")));
        }
    }
    let book = store.books.get_mut(&id).ok_or_else(|| ApiFailure::not_found("book", id))?;
    if let Some(title) = input.title {
        book.title = title;
    }
    if let Some(author) = input.author {
        book.author = author;
    }
    if let Some(isbn) = input.isbn {
        book.isbn = isbn;
    }
    if let Some(price) = input.price {
        book.price = price;
    }
    if let Some(publish_date) = input.publish_date {
        book.publish_date = publish_date;
    }
    Ok(Json(book.clone()))
}

async fn delete_book(State(db): State<Db>, Id(id): Id) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    store
        .books
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("book", id))
}

// --- students ---

async fn list_students(State(db): State<Db>) -> Json<Vec<Student>> {
    let store = db.read().await;
    Json(store.students.values().cloned().collect())
}

async fn get_student(State(db): State<Db>, Id(id): Id) -> Result<Json<Student>, ApiFailure> {
    let store = db.read().await;
    store
        .students
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("student", id))
}

async fn create_student(
    State(db): State<Db>,
    JsonBody(input): JsonBody<StudentPayload>,
) -> Result<(StatusCode, Json<Student>), ApiFailure> {
    let name = required(input.name, "name")?;
    let student_number = required(input.student_number, "studentNumber")?;

    let mut store = db.write().await;
    if store.students.values().any(|s| s.student_number == student_number) {
        return Err(ApiFailure::conflict(format!("duplicate student number {student_number}")));
    }
    let student = Student {
        id: store.next_id(),
        name,
        student_number,
        date_of_birth: input.date_of_birth,
    };
    store.students.insert(student.id, student.clone());
    tracing::info!(id = student.id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

async fn replace_student(
    State(db): State<Db>,
    Id(id): Id,
    JsonBody(input): JsonBody<StudentPayload>,
) -> Result<Json<Student>, ApiFailure> {
    let name = required(input.name, "name")?;
    let student_number = required(input.student_number, "studentNumber")?;
    let mut store = db.write().await;
    if !store.students.contains_key(&id) {
        return Err(ApiFailure::not_found("student", id));
    }
    if store
        .students
        .values()
        .any(|s| s.id != id && s.student_number == student_number)
    {
        return Err(ApiFailure::conflict(format!("duplicate student number {student_number}")));
    }
    let student = Student {
        id,
        name,
        student_number,
        date_of_birth: input.date_of_birth,
    };
    store.students.insert(id, student.clone());
    Ok(Json(student))
}

async fn patch_student(
    State(db): State<Db>,
    Id(id): Id,
    JsonBody(input): JsonBody<StudentPayload>,
) -> Result<Json<Student>, ApiFailure> {
    let name = if_present(input.name, "name")?;
    let student_number = if_present(input.student_number, "studentNumber")?;

    let mut store = db.write().await;
    if !store.students.contains_key(&id) {
        return Err(ApiFailure::not_found("student", id));
    }
    if let Some(number) = &student_number {
        if store.students.values().any(|s| s.id != id && &s.student_number == number) {
            return Err(ApiFailure::conflict(format!("duplicate student number {number}")));
        }
    }
    let student = store
        .students
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::not_found("student", id))?;
    if let Some(name) = name {
        student.name = name;
    }
    if let Some(number) = student_number {
        student.student_number = number;
    }
    if input.date_of_birth.is_some() {
        student.date_of_birth = input.date_of_birth;
    }
    Ok(Json(student.clone()))
}

async fn delete_student(State(db): State<Db>, Id(id): Id) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    store
        .students
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiFailure::not_found("student", id))
}
