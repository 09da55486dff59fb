use std::io::{self, BufRead, BufReader, Read};
use std::net::{TcpListener, TcpStream};

use thiserror::Error;

use crate::config::AppConfig;
use crate::data::catalog::{load_catalog, CatalogError};
use crate::data::state::JsonFileStore;

pub mod api;
pub mod routes;

use api::App;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),
}

pub fn run_server(config: &AppConfig) -> Result<(), ServerError> {
    let catalog = load_catalog(&config.catalog_path)?;
    let store = JsonFileStore::new(&config.state_path, config.default_hero_mode);
    let mut app = App::new(catalog, Box::new(store));

    let listener = TcpListener::bind(&config.bind_addr)?;
    tracing::info!("riftteams server listening on http://{}", config.bind_addr);

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut app, &mut stream) {
                    tracing::warn!("request error: {err}");
                }
            }
            Err(err) => tracing::warn!("connection failed: {err}"),
        }
    }

    Ok(())
}

/// Declared body lengths above this are refused before any allocation.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Read one request: the request line, headers up to the blank line, then exactly
/// `Content-Length` body bytes however many reads they arrive in. `None` when the peer sent nothing.
pub fn read_request(reader: &mut impl BufRead) -> io::Result<Option<Request>> {
    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(None);
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("GET").to_string();
    let path = parts.next().unwrap_or("/").to_string();

    let mut content_length = 0_usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        let Some((name, value)) = header.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            content_length = value.trim().parse().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid Content-Length '{}'", value.trim()),
                )
            })?;
        }
    }

    if content_length > MAX_BODY_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("request body of {content_length} bytes exceeds {MAX_BODY_BYTES}"),
        ));
    }
    let mut body = vec![0_u8; content_length];
    reader.read_exact(&mut body)?;

    Ok(Some(Request {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    }))
}

fn handle_connection(app: &mut App, stream: &mut TcpStream) -> io::Result<()> {
    let response = match read_request(&mut BufReader::new(&*stream)) {
        Ok(Some(request)) => {
            let response = routes::route_request(app, &request.method, &request.path, &request.body);
            tracing::debug!(method = %request.method, path = %request.path, status = response.status_code, "handled request");
            response
        }
        Ok(None) => return Ok(()),
        Err(err) if err.kind() == io::ErrorKind::InvalidData => routes::HttpResponse::error(400, &err.to_string()),
        Err(err) => return Err(err),
    };
    response.write_to(stream)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn body_split_across_reads_is_read_in_full() {
        let body = r#"{"kind":"hero","value":"Astar [sp]"}"#;
        let head = format!(
            "POST /api/filters/toggle HTTP/1.1\r\nHost: localhost\r\ncontent-length: {}\r\n\r\n",
            body.len()
        );
        let mut reader = BufReader::new(Cursor::new(head).chain(Cursor::new(body)));

        let request = read_request(&mut reader)
            .expect("request reads")
            .expect("request present");
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/filters/toggle");
        assert_eq!(request.body, body);
    }

    #[test]
    fn request_without_content_length_has_empty_body() {
        let mut reader = BufReader::new(Cursor::new("GET /api/health HTTP/1.1\r\n\r\n"));
        let request = read_request(&mut reader)
            .expect("request reads")
            .expect("request present");
        assert_eq!(request.method, "GET");
        assert!(request.body.is_empty());
    }

    #[test]
    fn empty_connection_and_bad_lengths() {
        assert_eq!(read_request(&mut BufReader::new(Cursor::new(""))).expect("empty reads"), None);

        let oversized = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY_BYTES + 1);
        let err = read_request(&mut BufReader::new(Cursor::new(oversized))).expect_err("too large");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let garbled = "POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n";
        let err = read_request(&mut BufReader::new(Cursor::new(garbled))).expect_err("not a number");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let truncated = "POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        let err = read_request(&mut BufReader::new(Cursor::new(truncated))).expect_err("short body");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
