//! Minimal HTTP/1.1 server speaking the slice of the GCS JSON API the client uses.
//!
//! Serves object listings (two items per page, `nextPageToken` = next index)
//! and media downloads at `/media/<index>`. Requests without the expected
//! bearer token get 401. `POST /token` issues that token with a 30 second
//! lifetime, so clients refresh it on every use.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub const TOKEN: &str = "test-token";
const PAGE_SIZE: usize = 2;

pub struct ServerState {
    pub bucket: String,
    pub objects: Vec<(String, Vec<u8>)>,
    /// Number of upcoming list requests to answer with 503.
    pub list_failures: AtomicUsize,
    /// Media requests answered with a truncated body, then served normally.
    pub truncated_media: AtomicUsize,
    pub requests: AtomicUsize,
    pub token_requests: AtomicUsize,
}

impl ServerState {
    pub fn new(bucket: &str, objects: &[(&str, &str)]) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: objects
                .iter()
                .map(|(n, b)| (n.to_string(), b.as_bytes().to_vec()))
                .collect(),
            list_failures: AtomicUsize::new(0),
            truncated_media: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
            token_requests: AtomicUsize::new(0),
        }
    }
}

/// Starts the server in a background thread; returns its base URL (`http://127.0.0.1:<port>`).
pub fn start(state: Arc<ServerState>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    let base_for_thread = base.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            let base = base_for_thread.clone();
            thread::spawn(move || handle(stream, &state, &base));
        }
    });
    base
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8], length: usize) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status, content_type, length
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

fn handle(mut stream: TcpStream, state: &ServerState, base: &str) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]).to_string();
    state.requests.fetch_add(1, Ordering::SeqCst);

    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    if target == "/token" {
        state.token_requests.fetch_add(1, Ordering::SeqCst);
        let body = serde_json::to_vec(&serde_json::json!({
            "access_token": TOKEN,
            "expires_in": 30,
            "token_type": "Bearer",
        }))
        .unwrap();
        respond(&mut stream, "200 OK", "application/json", &body, body.len());
        return;
    }

    let authorized = request
        .lines()
        .any(|l| l.eq_ignore_ascii_case(&format!("authorization: bearer {}", TOKEN)));
    if !authorized {
        let body = br#"{"error":{"code":401}}"#;
        respond(&mut stream, "401 Unauthorized", "application/json", body, body.len());
        return;
    }

    let url = url::Url::parse(&format!("http://local{}", target)).unwrap();
    let segments: Vec<String> = url
        .path_segments()
        .map(|s| s.map(str::to_string).collect())
        .unwrap_or_default();

    if segments.first().map(String::as_str) == Some("media") {
        let idx: usize = segments.get(1).and_then(|s| s.parse().ok()).unwrap_or(usize::MAX);
        match state.objects.get(idx) {
            Some((_, body)) => {
                let truncate = state
                    .truncated_media
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok();
                if truncate {
                    // Announce the full length but send half, then close.
                    respond(
                        &mut stream,
                        "200 OK",
                        "application/zip",
                        &body[..body.len() / 2],
                        body.len(),
                    );
                } else {
                    respond(&mut stream, "200 OK", "application/zip", body, body.len());
                }
            }
            None => respond(&mut stream, "404 Not Found", "text/plain", b"", 0),
        }
        return;
    }

    let list_path = ["storage", "v1", "b", state.bucket.as_str(), "o"];
    if segments.iter().map(String::as_str).eq(list_path.iter().copied()) {
        let failing = state
            .list_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            respond(&mut stream, "503 Service Unavailable", "text/plain", b"", 0);
            return;
        }

        let mut prefix = String::new();
        let mut start = 0usize;
        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "prefix" => prefix = v.to_string(),
                "pageToken" => start = v.parse().unwrap_or(0),
                _ => {}
            }
        }
        let matching: Vec<(usize, &(String, Vec<u8>))> = state
            .objects
            .iter()
            .enumerate()
            .filter(|(_, (name, _))| name.starts_with(&prefix))
            .collect();
        let page: Vec<serde_json::Value> = matching
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|(idx, (name, body))| {
                serde_json::json!({
                    "name": name,
                    "size": body.len().to_string(),
                    "mediaLink": format!("{}/media/{}", base, idx),
                    "generation": "1",
                })
            })
            .collect();
        let mut listing = serde_json::json!({ "kind": "storage#objects" });
        if !page.is_empty() {
            listing["items"] = serde_json::Value::Array(page);
        }
        if start + PAGE_SIZE < matching.len() {
            listing["nextPageToken"] = serde_json::Value::String((start + PAGE_SIZE).to_string());
        }
        let body = serde_json::to_vec(&listing).unwrap();
        respond(&mut stream, "200 OK", "application/json", &body, body.len());
        return;
    }

    respond(&mut stream, "404 Not Found", "text/plain", b"", 0);
}
