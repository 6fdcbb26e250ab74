use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;

use common::Catalog;
use server::config::{AppConfig, AuthConfig, CorsConfig, ServerConfig, StorageConfig};
use server::state::AppState;

pub const PASSWORD: &str = "test-upload-password";
const TOKEN_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const YEARS: &str = "/api/v1/years";
    pub const PAPERS: &str = "/api/v1/papers";
    pub const LOGIN: &str = "/api/v1/admin/login";
    pub const LOGOUT: &str = "/api/v1/admin/logout";
    pub const SESSION: &str = "/api/v1/admin/session";
    pub const RECONCILE: &str = "/api/v1/admin/reconcile";

    pub fn semesters(year: &str) -> String {
        format!("/api/v1/years/{year}/semesters")
    }

    pub fn subjects(year: &str, semester: &str) -> String {
        format!("/api/v1/years/{year}/semesters/{semester}/subjects")
    }

    pub fn paper(id: u64) -> String {
        format!("/api/v1/papers/{id}")
    }

    pub fn file(stored_path: &str) -> String {
        format!("/files/{stored_path}")
    }
}

/// Multipart metadata for an upload request.
pub struct Upload<'a> {
    pub subject: &'a str,
    pub exam_type: &'a str,
    pub year: &'a str,
    pub semester: &'a str,
    pub exam_year: &'a str,
}

impl<'a> Upload<'a> {
    pub fn new(subject: &'a str, exam_type: &'a str, exam_year: &'a str) -> Self {
        Self {
            subject,
            exam_type,
            year: "1",
            semester: "1",
            exam_year,
        }
    }

    pub fn term(mut self, year: &'a str, semester: &'a str) -> Self {
        self.year = year;
        self.semester = semester;
        self
    }

    fn form(&self, files: &[(&str, &[u8])]) -> Form {
        let mut form = Form::new()
            .text("subject", self.subject.to_string())
            .text("exam_type", self.exam_type.to_string())
            .text("year", self.year.to_string())
            .text("semester", self.semester.to_string())
            .text("exam_year", self.exam_year.to_string());
        for (name, data) in files {
            let part = Part::bytes(data.to_vec()).file_name(name.to_string());
            form = form.part("files", part);
        }
        form
    }
}

/// A running test server backed by a temporary upload root and store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub catalog: Arc<Catalog>,
    pub dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_limit(50 * 1024 * 1024).await
    }

    pub async fn spawn_with_limit(max_request_bytes: usize) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("uploads");
        let data_file = dir.path().join("data/papers.json");

        let catalog = Catalog::open(upload_dir.clone(), data_file.clone())
            .await
            .expect("Failed to open catalog");
        let catalog = Arc::new(catalog);

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            storage: StorageConfig {
                upload_dir,
                data_file,
                max_request_bytes,
            },
            auth: AuthConfig {
                upload_password: PASSWORD.to_string(),
                token_secret: TOKEN_SECRET.to_string(),
                session_hours: 12,
            },
        };

        let state =
            AppState::new(catalog.clone(), app_config).expect("Failed to build app state");

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::builder().cookie_store(true).build().unwrap(),
            catalog,
            dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn upload_root(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_empty(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = Client::new()
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Upload `files` under `upload`, authenticating with `token` when given.
    ///
    /// Without a token the request goes out on a fresh client so the
    /// session cookie is not sent either.
    pub async fn upload(
        &self,
        upload: &Upload<'_>,
        files: &[(&str, &[u8])],
        token: Option<&str>,
    ) -> TestResponse {
        let form = upload.form(files);
        let req = match token {
            Some(token) => self
                .client
                .post(self.url(routes::PAPERS))
                .header("Authorization", format!("Bearer {token}")),
            None => Client::new().post(self.url(routes::PAPERS)),
        };
        let res = req
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Upload relying on the session cookie held by the shared client.
    pub async fn upload_with_cookie(
        &self,
        upload: &Upload<'_>,
        files: &[(&str, &[u8])],
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(routes::PAPERS))
            .multipart(upload.form(files))
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Log in with the shared password and return the session token.
    pub async fn login(&self) -> String {
        let res = self
            .post_json(routes::LOGIN, &serde_json::json!({ "password": PASSWORD }))
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Upload one PDF and return its record.
    pub async fn upload_one(&self, token: &str, upload: &Upload<'_>, name: &str) -> Value {
        let res = self.upload(upload, &[(name, b"%PDF-1.4")], Some(token)).await;
        assert_eq!(res.status, 201, "upload failed: {}", res.text);
        res.body["papers"][0].clone()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}
