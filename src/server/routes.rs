use std::io::{self, Write};

use crate::server::api::{ApiError, App};

pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            content_type: "application/json",
            body,
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        let body = serde_json::json!({ "status": "error", "message": message });
        Self::json(status_code, body.to_string())
    }

    pub fn reason(&self) -> &'static str {
        match self.status_code {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }

    /// Serialize as an HTTP/1.1 response that closes the connection.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        write!(
            out,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status_code,
            self.reason(),
            self.content_type,
            self.body.len()
        )?;
        out.write_all(self.body.as_bytes())?;
        out.flush()
    }
}

pub fn route_request(app: &mut App, method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    let result = match (method, path) {
        ("GET", "/") => {
            return HttpResponse {
                status_code: 200,
                content_type: "text/html; charset=utf-8",
                body: index_html(),
            }
        }
        ("GET", "/api/health") => app.health_payload(),
        ("GET", "/api/catalog") => app.catalog_payload(),
        ("GET", "/api/state") => app.state_payload(),
        ("GET", "/api/usage") => app.usage_payload(),
        ("GET", "/api/recommended") => app.recommended_payload(),
        ("GET", "/api/selected") => app.selected_payload(),
        ("POST", "/api/selection/toggle") => app.toggle_team_payload(body),
        ("POST", "/api/filters/toggle") => app.toggle_filter_payload(body),
        ("POST", "/api/filters/mode") => app.toggle_mode_payload(),
        ("DELETE", "/api/filters") => app.clear_filters_payload(),
        _ => return HttpResponse::error(404, "Route not found"),
    };

    match result {
        Ok(payload) => HttpResponse::json(200, payload),
        Err(err @ ApiError::Parse(_)) => HttpResponse::error(400, &err.to_string()),
        Err(err) => {
            tracing::error!(%method, %path, "request failed: {err}");
            HttpResponse::error(500, &err.to_string())
        }
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Rift Teams API</title>
</head>
<body>
  <h1>Rift Teams Local API</h1>
  <ul>
    <li>GET /api/catalog</li>
    <li>GET /api/recommended</li>
    <li>GET /api/selected</li>
    <li>GET /api/usage</li>
    <li>GET /api/state</li>
    <li>POST /api/selection/toggle {"index": 0}</li>
    <li>POST /api/filters/toggle {"kind": "hero", "value": "Astar"}</li>
    <li>POST /api/filters/mode</li>
    <li>DELETE /api/filters</li>
  </ul>
</body>
</html>
"#
    .to_string()
}
