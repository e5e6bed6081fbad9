//! Minimal HTTP/1.1 GET server for integration tests.
//!
//! Serves fixed routes and counts every request it receives, so tests can
//! assert how many network round trips an import made.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with the full body.
    Body(Vec<u8>),
    /// Bare status with an empty body (e.g. 500, 404).
    Status(u16),
    /// Declares `declared_len` bytes but sends only `body`, then closes.
    Truncated { body: Vec<u8>, declared_len: usize },
    /// 302 to the given path on the same server.
    Redirect(String),
    /// Declares `declared_len` bytes, sends `head` of the body, then goes
    /// quiet for `hold` before closing.
    Stall {
        head: Vec<u8>,
        declared_len: usize,
        hold: Duration,
    },
    /// Reads the request and sends nothing for `hold`.
    Silent(Duration),
}

pub struct TestServer {
    base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    total: Arc<AtomicUsize>,
}

impl TestServer {
    /// Absolute URL for `path` (which should start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Total requests received.
    pub fn hits(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Requests received for `path` (query ignored).
    pub fn hits_for(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let total = Arc::new(AtomicUsize::new(0));
    {
        let hits = Arc::clone(&hits);
        let total = Arc::clone(&total);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits);
                let total = Arc::clone(&total);
                thread::spawn(move || handle(stream, &routes, &hits, &total));
            }
        });
    }
    TestServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
        total,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<HashMap<String, usize>>,
    total: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = match request_path(request) {
        Some(p) => p,
        None => return,
    };
    // Count before responding so the client can never observe a stale total.
    *hits.lock().unwrap().entry(path.to_string()).or_insert(0) += 1;
    total.fetch_add(1, Ordering::SeqCst);

    match routes.get(path) {
        Some(Route::Body(body)) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Route::Status(code)) => {
            let head = format!(
                "HTTP/1.1 {} Test\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            );
            let _ = stream.write_all(head.as_bytes());
        }
        Some(Route::Truncated { body, declared_len }) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                declared_len
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Route::Redirect(target)) => {
            let head = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                target
            );
            let _ = stream.write_all(head.as_bytes());
        }
        Some(Route::Stall {
            head,
            declared_len,
            hold,
        }) => {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                declared_len
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(head);
            let _ = stream.flush();
            thread::sleep(*hold);
        }
        Some(Route::Silent(hold)) => thread::sleep(*hold),
        None => {
            let _ = stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    }
    let _ = stream.flush();
}

/// Path of a `GET <path> HTTP/1.1` request line, without the query string.
fn request_path(request: &str) -> Option<&str> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    let target = parts.next()?;
    Some(target.split('?').next().unwrap_or(target))
}
