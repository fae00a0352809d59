#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use getload::{RequestError, Transport};
use reqwest::Url;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub enum Behavior {
    Succeed,
    Fail(&'static str),
    /// Fail from the n-th call on, naming the call in the error.
    FailFrom(usize),
    Slow(Duration),
}

pub struct MockTransport {
    calls: AtomicUsize,
    behavior: Behavior,
}

impl MockTransport {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            behavior,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn get<'a>(&'a self, _url: &'a Url) -> BoxFuture<'a, Result<(), RequestError>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            tokio::task::yield_now().await;
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail(msg) => Err(RequestError::Other(msg.into())),
                Behavior::FailFrom(from) if n >= from => {
                    Err(RequestError::Other(format!("call {n} failed").into()))
                }
                Behavior::FailFrom(_) => Ok(()),
                Behavior::Slow(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(())
                }
            }
        }
        .boxed()
    }
}

pub fn target() -> Url {
    Url::parse("http://127.0.0.1:1/").unwrap()
}

/// Answers every request with `body`, counting the requests served.
pub async fn start_backend(body: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    start_responder(response).await
}

/// Promises a 100 byte body, sends 5 bytes and hangs up.
pub async fn start_truncating_backend() -> (SocketAddr, Arc<AtomicUsize>) {
    let response =
        "HTTP/1.1 200 OK\r\ncontent-length: 100\r\nconnection: close\r\n\r\nhello".to_owned();
    start_responder(response).await
}

async fn start_responder(response: String) -> (SocketAddr, Arc<AtomicUsize>) {
    let response = Arc::new(response);
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicUsize::new(0));
    let counter = served.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let counter = counter.clone();
            let response = response.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    (addr, served)
}

pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
