use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Mutex, Once};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{LevelFilter, Log, Metadata, Record};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use crate::apis::icanhazdadjoke::{FetchFailed, JokeRecord};
use crate::joke_fetcher::JokeSource;

pub enum StubResponse {
    Reply { status: u16, content_type: &'static str, body: &'static str },
    /// Accept the connection, read the request and never answer.
    Hang,
}

impl StubResponse {
    pub const fn new(status: u16, content_type: &'static str, body: &'static str) -> Self {
        Self::Reply { status, content_type, body }
    }

    pub const fn json(status: u16, body: &'static str) -> Self {
        Self::new(status, "application/json", body)
    }
}

/// Loopback HTTP/1.1 server answering one connection per scripted response, in order.
pub struct StubServer {
    pub url: String,
    requests: mpsc::UnboundedReceiver<String>,
}

impl StubServer {
    pub async fn next_request(&mut self) -> String {
        self.requests.recv().await.unwrap()
    }
}

pub async fn serve(responses: Vec<StubResponse>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            tx.send(read_request(&mut stream).await).ok();

            match response {
                StubResponse::Reply { status, content_type, body } => {
                    let response = format!(
                        "HTTP/1.1 {status} Stub\r\ncontent-type: {content_type}\r\n\
                         content-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    stream.write_all(response.as_bytes()).await.unwrap();
                    stream.shutdown().await.ok();
                }
                StubResponse::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    drop(stream);
                }
            }
        }
    });

    StubServer { url, requests: rx }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buffer = [0; 1024];

    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = stream.read(&mut buffer).await.unwrap();
        if read == 0 {
            break;
        }
        request.extend_from_slice(&buffer[..read]);
    }

    String::from_utf8(request).unwrap()
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// URL of a loopback port nothing listens on.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{address}/")
}

pub fn joke(id: &str, text: &str) -> JokeRecord {
    JokeRecord::new(id, text, 200)
}

pub fn decode_error() -> FetchFailed {
    JokeRecord::from_json(br#"{"joke":"..."}"#).unwrap_err()
}

/// Answers fetches from a script. An entry with a gate completes only once the gate is released.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<(Option<oneshot::Receiver<()>>, Result<JokeRecord, FetchFailed>)>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(results: impl IntoIterator<Item = Result<JokeRecord, FetchFailed>>) -> Self {
        let source = Self::default();
        for result in results {
            source.push(None, result);
        }
        source
    }

    pub fn push(
        &self,
        gate: Option<oneshot::Receiver<()>>,
        result: Result<JokeRecord, FetchFailed>,
    ) {
        self.script.lock().unwrap().push_back((gate, result));
    }

    /// Queues a result and returns the sender releasing it.
    pub fn push_gated(&self, result: Result<JokeRecord, FetchFailed>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Some(rx), result);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JokeSource for ScriptedSource {
    async fn fetch(&self) -> Result<JokeRecord, FetchFailed> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (gate, result) =
            self.script.lock().unwrap().pop_front().expect("fetch called more often than scripted");

        if let Some(gate) = gate {
            gate.await.unwrap();
        }

        result
    }
}

thread_local! {
    static CAPTURED_LOGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Records log lines per thread, so parallel tests only see their own.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = format!("{} {}", record.level(), record.args());
        CAPTURED_LOGS.with_borrow_mut(|logs| logs.push(line));
    }

    fn flush(&self) {}
}

/// Starts capturing log lines emitted on the current thread, dropping earlier ones.
pub fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_boxed_logger(Box::new(CaptureLogger)).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });

    CAPTURED_LOGS.with_borrow_mut(Vec::clear);
}

pub fn captured_logs() -> Vec<String> {
    CAPTURED_LOGS.with_borrow(Clone::clone)
}
