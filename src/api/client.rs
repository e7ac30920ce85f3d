use crate::api::error::{ApiError, ApiResult};
use crate::api::types::*;
use crate::config::ServerConfig;
use reqwest::header::{COOKIE, LOCATION};
use reqwest::multipart;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::{debug, instrument};

pub const ANALYSTS_PATH: &str = "/app/analysts/by-dept";
pub const SUGGEST_PATH: &str = "/app/ai/suggest";
pub const CREATE_PATH: &str = "/app/create";

/// HTTP client for the Incidex web endpoints.
///
/// Redirects are not followed: the create and detail forms answer with a
/// 302 and the `Location` header is the only result we need.
#[derive(Clone)]
pub struct IncidexClient {
    http: reqwest::Client,
    pub base_url: String,
    csrf_token: String,
    session_cookie: Option<String>,
}

impl IncidexClient {
    pub fn new(server: &ServerConfig, timeout_secs: u64) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(Policy::none())
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            csrf_token: server.csrf_token.clone(),
            session_cookie: server.session_cookie.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn detail_url(&self, ticket_id: i64) -> String {
        self.url(&format!("/app/detail/{ticket_id}"))
    }

    fn with_session(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => req.header(COOKIE, cookie),
            None => req,
        }
    }

    async fn send(&self, endpoint: &str, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        self.with_session(req)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        let text = response.text().await.map_err(|source| ApiError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Department → analysts map used to preselect the assignee.
    #[instrument(skip(self))]
    pub async fn analysts_by_dept(&self) -> ApiResult<AnalystMap> {
        let response = self.send(ANALYSTS_PATH, self.http.get(self.url(ANALYSTS_PATH))).await?;
        let map: AnalystMap = Self::read_json(ANALYSTS_PATH, response).await?;
        debug!(departments = map.len(), "analyst map loaded");
        Ok(map)
    }

    /// Ask the server for category/priority/department suggestions.
    #[instrument(skip(self, description), fields(title_len = title.len()))]
    pub async fn suggest(&self, title: &str, description: &str) -> ApiResult<Suggestion> {
        let body = SuggestRequest { title, description };
        let req = self
            .http
            .post(self.url(SUGGEST_PATH))
            .header("X-CSRFToken", &self.csrf_token)
            .json(&body);

        let response = self.send(SUGGEST_PATH, req).await?;
        let suggestion: Suggestion = Self::read_json(SUGGEST_PATH, response).await?;
        if let Some(err) = suggestion.error {
            return Err(ApiError::Suggestion(err));
        }
        Ok(suggestion)
    }

    /// Submit the creation wizard as a multipart form.
    #[instrument(skip(self, ticket), fields(files = ticket.files.len()))]
    pub async fn create_ticket(&self, ticket: &TicketSubmission) -> ApiResult<CreatedTicket> {
        let mut form = multipart::Form::new()
            .text("csrf_token", self.csrf_token.clone())
            .text("subject", ticket.subject.clone())
            .text("details", ticket.details.clone())
            .text("category_id", ticket.category_id.clone())
            .text("department_id", ticket.department_id.clone())
            .text("priority_id", ticket.priority_id.clone())
            .text("assignee_id", ticket.assignee_id.clone());

        for file in &ticket.files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| ApiError::Attachment {
                    path: file.path.display().to_string(),
                    source,
                })?;
            form = form.part("files", multipart::Part::bytes(bytes).file_name(file.name.clone()));
        }

        let req = self.http.post(self.url(CREATE_PATH)).multipart(form);
        let response = self.send(CREATE_PATH, req).await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::MissingRedirect)?;
            return Ok(CreatedTicket::from_location(location));
        }
        if status.is_success() {
            // The server re-renders the form when its validation rejects it.
            return Err(ApiError::MissingRedirect);
        }
        Err(ApiError::Status {
            endpoint: CREATE_PATH.to_string(),
            status: status.as_u16(),
        })
    }

    /// Post one of the detail-page forms (status change or reassignment).
    #[instrument(skip(self, note))]
    pub async fn submit_detail(
        &self,
        ticket_id: i64,
        form: DetailForm,
        value: &str,
        note: &str,
    ) -> ApiResult<()> {
        let endpoint = format!("/app/detail/{ticket_id}/{}", form.path_segment());
        let fields = [
            (form.value_field(), value),
            ("note", note),
            ("csrf_token", self.csrf_token.as_str()),
        ];
        let req = self.http.post(self.url(&endpoint)).form(&fields);
        let response = self.send(&endpoint, req).await?;
        let status = response.status();
        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one connection, answer with `response`, and hand back the raw request.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let chunked = text[..header_end]
                        .to_ascii_lowercase()
                        .contains("transfer-encoding: chunked");
                    if chunked {
                        if text.ends_with("0\r\n\r\n") {
                            break;
                        }
                        continue;
                    }
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn client_for(base_url: String) -> IncidexClient {
        let server = ServerConfig {
            base_url,
            csrf_token: "tok-123".to_string(),
            session_cookie: Some("session=abc".to_string()),
        };
        IncidexClient::new(&server, 5).unwrap()
    }

    #[tokio::test]
    async fn test_analysts_by_dept_parses_map() {
        let (base, server) =
            serve_once(json_response("200 OK", r#"{"3": [{"id": 7, "name": "Ana"}]}"#)).await;
        let client = client_for(base);

        let map = client.analysts_by_dept().await.unwrap();
        assert_eq!(map["3"][0].id, 7);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /app/analysts/by-dept"));
        assert!(request.to_ascii_lowercase().contains("cookie: session=abc"));
    }

    #[tokio::test]
    async fn test_analysts_by_dept_rejects_non_json() {
        let (base, _server) = serve_once(json_response("200 OK", "<html>login</html>")).await;
        let client = client_for(base);

        let err = client.analysts_by_dept().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_suggest_sends_csrf_header_and_body() {
        let (base, server) = serve_once(json_response(
            "200 OK",
            r#"{"category_id": 1, "priority_id": 2, "department_id": 3, "reason": "red"}"#,
        ))
        .await;
        let client = client_for(base);

        let suggestion = client.suggest("VPN caida", "No conecta").await.unwrap();
        assert_eq!(suggestion.department_id, Some(3));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /app/ai/suggest"));
        assert!(request.to_ascii_lowercase().contains("x-csrftoken: tok-123"));
        assert!(request.contains(r#""title":"VPN caida""#));
        assert!(request.contains(r#""description":"No conecta""#));
    }

    #[tokio::test]
    async fn test_suggest_error_field_is_an_error() {
        let (base, _server) =
            serve_once(json_response("200 OK", r#"{"error": "modelo no disponible"}"#)).await;
        let client = client_for(base);

        let err = client.suggest("t", "d").await.unwrap_err();
        assert!(matches!(err, ApiError::Suggestion(msg) if msg == "modelo no disponible"));
    }

    #[tokio::test]
    async fn test_suggest_non_ok_status() {
        let (base, _server) = serve_once(json_response("500 Internal Server Error", "{}")).await;
        let client = client_for(base);

        let err = client.suggest("t", "d").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_create_ticket_reads_redirect_location() {
        let response = "HTTP/1.1 302 FOUND\r\nLocation: /app/detail/123\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string();
        let (base, server) = serve_once(response).await;
        let client = client_for(base);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captura.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let ticket = TicketSubmission {
            subject: "Error en login".into(),
            details: "No puedo entrar con mi usuario.".into(),
            category_id: "1".into(),
            department_id: "2".into(),
            priority_id: "3".into(),
            assignee_id: "42".into(),
            files: vec![UploadFile { path, name: "captura.png".into() }],
        };

        let created = client.create_ticket(&ticket).await.unwrap();
        assert_eq!(created.ticket_id, Some(123));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /app/create"));
        assert!(request.contains("name=\"subject\""));
        assert!(request.contains("name=\"csrf_token\"\r\n\r\ntok-123"));
        assert!(request.contains("filename=\"captura.png\""));
        assert!(request.contains("png-bytes"));
    }

    #[tokio::test]
    async fn test_create_ticket_without_redirect_is_rejected() {
        let (base, _server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;
        let client = client_for(base);

        let ticket = TicketSubmission {
            subject: String::new(),
            details: String::new(),
            category_id: String::new(),
            department_id: String::new(),
            priority_id: String::new(),
            assignee_id: "0".into(),
            files: vec![],
        };
        let err = client.create_ticket(&ticket).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingRedirect));
    }

    #[tokio::test]
    async fn test_submit_detail_posts_form_fields() {
        let response = "HTTP/1.1 302 FOUND\r\nLocation: /app/detail/5\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string();
        let (base, server) = serve_once(response).await;
        let client = client_for(base);

        client
            .submit_detail(5, DetailForm::State, "2", "Comenzando")
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /app/detail/5/status"));
        assert!(request.contains("to_status_id=2"));
        assert!(request.contains("note=Comenzando"));
        assert!(request.contains("csrf_token=tok-123"));
    }
}
