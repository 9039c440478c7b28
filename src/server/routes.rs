use crate::analysis::AnalysisCache;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(method: &str, path: &str, body: &str, cache: &AnalysisCache) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/catalog") => match api::catalog_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/archetypes") => match api::archetypes_payload(body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => api_error_response(&err),
        },
        ("POST", "/api/analyze") => match api::analyze_payload(body, cache) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => {
                if !err.is_client_error() {
                    tracing::error!(error = %err, "analysis request failed");
                }
                api_error_response(&err)
            }
        },
        (_, "/api/health" | "/api/catalog" | "/api/archetypes" | "/api/analyze") => {
            error_response(405, "Method Not Allowed", "Method not allowed")
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn api_error_response(err: &api::ApiError) -> HttpResponse {
    if let api::ApiError::Validation(details) = err {
        return HttpResponse {
            status_code: 400,
            status_text: "Bad Request",
            content_type: "application/json",
            body: serde_json::to_string_pretty(details)
                .unwrap_or_else(|_| "{\"status\":\"error\"}".to_string()),
        };
    }
    if err.is_client_error() {
        error_response(400, "Bad Request", &err.to_string())
    } else {
        error_response(500, "Internal Server Error", &err.to_string())
    }
}

pub(crate) fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
