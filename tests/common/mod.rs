// One-shot HTTP responder for exercising the real client without the
// network.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// A request as the responder saw it.
#[derive(Debug)]
pub struct Captured {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Accept exactly `replies.len()` connections, answering each with the
/// matching `(status line, body)`. Returns the base URL to configure the
/// client with and a handle yielding the captured requests.
pub fn serve(replies: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<Captured>>) {
    let raw = replies
        .into_iter()
        .map(|(status, body)| {
            format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
        })
        .collect();
    serve_raw(raw)
}

/// Like `serve`, but each reply is written byte for byte, so a test can
/// send a response that breaks off early.
pub fn serve_raw(replies: Vec<String>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let base_url = format!("http://{}/api/trpc", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut captured = Vec::new();
        for reply in replies {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    let (name, value) = (name.trim().to_string(), value.trim().to_string());
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.parse().unwrap();
                    }
                    headers.push((name, value));
                }
            }
            let mut buf = vec![0u8; content_length];
            reader.read_exact(&mut buf).unwrap();

            let mut stream = stream;
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();

            captured.push(Captured {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8(buf).unwrap(),
            });
        }
        captured
    });
    (base_url, handle)
}
