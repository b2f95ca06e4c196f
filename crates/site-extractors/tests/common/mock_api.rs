//! Minimal HTTP/1.1 server standing in for the platform API in integration tests.
//!
//! Routes match on the request path (query ignored). Each route replies with
//! its queued responses in order and repeats the last one once the queue is
//! drained. Unknown paths get 404.

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone)]
struct Reply {
    status: u16,
    location: Option<String>,
    body: String,
}

impl Reply {
    fn status(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: String::new(),
        }
    }
}

#[derive(Default)]
struct Route {
    responses: VecDeque<Reply>,
}

impl Route {
    fn next(&mut self) -> Reply {
        if self.responses.len() > 1 {
            self.responses
                .pop_front()
                .unwrap_or_else(|| Reply::status(500))
        } else {
            self.responses
                .front()
                .cloned()
                .unwrap_or_else(|| Reply::status(500))
        }
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Route>,
    requests: Vec<String>,
}

pub struct MockApi {
    base_url: String,
    state: Arc<Mutex<State>>,
}

impl MockApi {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));

        let server_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&server_state);
                thread::spawn(move || handle(stream, &state));
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Queues one more response for `path`.
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.push(
            path,
            Reply {
                status,
                location: None,
                body: body.into(),
            },
        );
    }

    /// Queues a `302 Found` pointing at `location` for `path`.
    pub fn redirect(&self, path: &str, location: impl Into<String>) {
        self.push(
            path,
            Reply {
                status: 302,
                location: Some(location.into()),
                body: String::new(),
            },
        );
    }

    fn push(&self, path: &str, reply: Reply) {
        let mut state = self.state.lock().unwrap();

        state
            .routes
            .entry(path.to_string())
            .or_default()
            .responses
            .push_back(reply);
    }

    /// Request targets (path and query) received for `path`, in arrival order.
    pub fn requests(&self, path: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();

        state
            .requests
            .iter()
            .filter(|target| target_path(target) == path)
            .cloned()
            .collect()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests(path).len()
    }
}

fn target_path(target: &str) -> &str {
    target.split('?').next().unwrap_or(target)
}

fn read_request_head(stream: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 4096];

    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    String::from_utf8(head).ok()
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let head = match read_request_head(&mut stream) {
        Some(head) => head,
        None => return,
    };

    let target = match head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    {
        Some(target) => target.to_string(),
        None => return,
    };

    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(target.clone());

        match state.routes.get_mut(target_path(&target)) {
            Some(route) => route.next(),
            None => Reply::status(404),
        }
    };

    let location = reply
        .location
        .map(|location| format!("Location: {}\r\n", location))
        .unwrap_or_default();

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        location,
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes());
}
