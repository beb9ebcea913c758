//! One-shot HTTP responder for exercising the client against a real socket.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

pub struct Reply {
    status: u16,
    reason: &'static str,
    body: String,
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Reply {
            status: 200,
            reason: "OK",
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Reply {
            status,
            reason: "Error",
            body: body.into(),
        }
    }
}

pub struct TestServer {
    port: u16,
    handle: JoinHandle<String>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/table.px", self.port)
    }

    /// Wait for the single request and return it as text (head and body).
    pub fn request(self) -> String {
        self.handle.join().expect("test server thread panicked")
    }
}

/// Answer exactly one request with `reply`, then close.
pub fn serve_once(reply: Reply) -> TestServer {
    serve_sequence(vec![reply])
}

/// Answer one request per reply, in order. `request()` returns the last one.
pub fn serve_sequence(replies: Vec<Reply>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let port = listener.local_addr().expect("local addr").port();
    let handle = std::thread::spawn(move || {
        let mut last = String::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().expect("accept");
            last = read_request(&mut stream);
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                reply.status,
                reply.reason,
                reply.body.len()
            );
            stream.write_all(head.as_bytes()).expect("write head");
            stream.write_all(reply.body.as_bytes()).expect("write body");
            stream.flush().expect("flush");
        }
        last
    });
    TestServer { port, handle }
}

/// A URL on a port nothing listens on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/table.px")
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(head_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
