//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one static body at every path and counts the GET requests it
//! receives, so tests can assert how many downloads actually happened.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Handle to a running server. The server runs until the process exits.
pub struct FileServer {
    base_url: String,
    gets: Arc<AtomicUsize>,
}

impl FileServer {
    /// URL for `path` on this server (e.g. "data.txt" -> "http://127.0.0.1:PORT/data.txt").
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Number of GET requests served so far.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

/// Starts a server answering every GET with `200 OK` and `body`.
pub fn start(body: Vec<u8>) -> FileServer {
    start_with_status(body, "200 OK")
}

/// How the server answers a GET.
#[derive(Debug, Clone, Copy)]
struct Reply {
    status: &'static str,
    /// Send only this many body bytes, wait, then drop the connection.
    cut_off: Option<(usize, Duration)>,
}

/// Starts a server answering every GET with `status` (e.g. "404 Not Found") and `body`.
pub fn start_with_status(body: Vec<u8>, status: &'static str) -> FileServer {
    serve(
        body,
        Reply {
            status,
            cut_off: None,
        },
    )
}

/// Starts a server that advertises the full `body` length but sends only the
/// first `sent` bytes, stalls for `stall`, and then closes the connection.
pub fn start_stalling(body: Vec<u8>, sent: usize, stall: Duration) -> FileServer {
    serve(
        body,
        Reply {
            status: "200 OK",
            cut_off: Some((sent, stall)),
        },
    )
}

fn serve(body: Vec<u8>, reply: Reply) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let gets = Arc::new(AtomicUsize::new(0));
    let gets_srv = Arc::clone(&gets);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let gets = Arc::clone(&gets_srv);
            thread::spawn(move || handle(stream, &body, reply, &gets));
        }
    });
    FileServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        gets,
    }
}

fn handle(mut stream: TcpStream, body: &[u8], reply: Reply, gets: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let method = request.split_whitespace().next().unwrap_or("");
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    gets.fetch_add(1, Ordering::SeqCst);
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    match reply.cut_off {
        None => {
            let _ = stream.write_all(body);
        }
        Some((sent, stall)) => {
            let _ = stream.write_all(&body[..sent.min(body.len())]);
            let _ = stream.flush();
            thread::sleep(stall);
        }
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(data))
}
