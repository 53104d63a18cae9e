use std::{
    collections::HashMap,
    fmt::Display,
    sync::Arc,
    time::{Duration, SystemTime},
};

use futures::{Sink, SinkExt, Stream, StreamExt, future};
use parking_lot::Mutex;
use reqwest_retry::{RetryDecision, RetryPolicy, policies::ExponentialBackoff};
use serde::Deserialize;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_tungstenite::tungstenite::Message;

use super::{SerializedRequest, Transport};
use crate::{RpcClientConfig, TransportError, jsonrpc::Id};

type ResponseSender = oneshot::Sender<Result<String, TransportError>>;

/// Requests awaiting a response, keyed by id.
#[derive(Default)]
struct PendingRequests {
    senders: HashMap<u64, ResponseSender>,
    /// Set once the connection has ended. No request is accepted after.
    closed: bool,
}

impl PendingRequests {
    fn close(&mut self) {
        self.closed = true;
        for (_id, sender) in self.senders.drain() {
            // The caller may have given up already.
            let _ = sender.send(Err(TransportError::Closed));
        }
    }
}

/// Removes the entry of an abandoned request.
struct PendingGuard<'a> {
    pending: &'a Mutex<PendingRequests>,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.lock().senders.remove(&self.id);
    }
}

/// Many concurrent requests over one persistent connection.
///
/// Responses are matched to callers by id and may arrive in any order. A
/// caller that stops awaiting its response only removes its own entry;
/// other requests are unaffected.
pub struct MultiplexedTransport {
    outgoing: mpsc::UnboundedSender<String>,
    pending: Arc<Mutex<PendingRequests>>,
    request_timeout: Duration,
    retry_policy: ExponentialBackoff,
    tasks: [JoinHandle<()>; 2],
}

impl MultiplexedTransport {
    /// Starts the reader and writer tasks over a duplex of text frames.
    ///
    /// Must be called within a Tokio runtime.
    pub fn new<SinkT, StreamT, SinkErrorT, StreamErrorT>(
        sink: SinkT,
        stream: StreamT,
        config: &RpcClientConfig,
    ) -> Self
    where
        SinkT: Sink<String, Error = SinkErrorT> + Send + Unpin + 'static,
        StreamT: Stream<Item = Result<String, StreamErrorT>> + Send + Unpin + 'static,
        SinkErrorT: Display + Send + 'static,
        StreamErrorT: Display + Send + 'static,
    {
        let pending = Arc::new(Mutex::new(PendingRequests::default()));
        let (outgoing, receiver) = mpsc::unbounded_channel();

        let writer = tokio::spawn(write_requests(sink, receiver, Arc::clone(&pending)));
        let reader = tokio::spawn(read_responses(stream, Arc::clone(&pending)));

        Self {
            outgoing,
            pending,
            request_timeout: config.request_timeout(),
            retry_policy: config.retry.policy(),
            tasks: [writer, reader],
        }
    }

    /// Number of requests awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.pending.lock().senders.len()
    }

    /// Whether the connection has ended.
    pub fn is_closed(&self) -> bool {
        self.pending.lock().closed
    }

    async fn send_once(&self, request: &SerializedRequest) -> Result<String, TransportError> {
        let (sender, receiver) = oneshot::channel();
        {
            let mut pending = self.pending.lock();
            if pending.closed {
                return Err(TransportError::Closed);
            }
            pending.senders.insert(request.id, sender);
        }
        let _guard = PendingGuard {
            pending: &self.pending,
            id: request.id,
        };

        self.outgoing
            .send(request.body.clone())
            .map_err(|_error| TransportError::Closed)?;

        match tokio::time::timeout(self.request_timeout, receiver).await {
            Ok(Ok(response)) => response,
            Ok(Err(_dropped)) => Err(TransportError::Closed),
            Err(_elapsed) => Err(TransportError::Timeout(self.request_timeout)),
        }
    }
}

impl Transport for MultiplexedTransport {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(id = request.id))
    )]
    async fn send(
        &self,
        request: SerializedRequest,
        idempotent: bool,
    ) -> Result<String, TransportError> {
        let start = SystemTime::now();
        let mut retries = 0;

        loop {
            let error = match self.send_once(&request).await {
                Ok(response) => return Ok(response),
                Err(error) if idempotent && error.is_transient() => error,
                Err(error) => return Err(error),
            };

            let RetryDecision::Retry { execute_after } =
                self.retry_policy.should_retry(start, retries)
            else {
                return Err(error);
            };

            let delay = execute_after
                .duration_since(SystemTime::now())
                .unwrap_or_default();
            log::warn!(
                "Retrying request {} after {delay:?} (attempt {}): {error}",
                request.id,
                retries + 2
            );

            tokio::time::sleep(delay).await;
            retries += 1;
        }
    }
}

impl Drop for MultiplexedTransport {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        self.pending.lock().close();
    }
}

impl std::fmt::Debug for MultiplexedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiplexedTransport")
            .field("pending_requests", &self.pending_requests())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

async fn write_requests<SinkT, ErrorT>(
    mut sink: SinkT,
    mut requests: mpsc::UnboundedReceiver<String>,
    pending: Arc<Mutex<PendingRequests>>,
) where
    SinkT: Sink<String, Error = ErrorT> + Unpin,
    ErrorT: Display,
{
    while let Some(request) = requests.recv().await {
        if let Err(error) = sink.send(request).await {
            log::error!("Connection lost while sending a request: {error}");
            pending.lock().close();
            return;
        }
    }
}

#[derive(Deserialize)]
struct ResponseId {
    id: Option<Id>,
}

async fn read_responses<StreamT, ErrorT>(mut stream: StreamT, pending: Arc<Mutex<PendingRequests>>)
where
    StreamT: Stream<Item = Result<String, ErrorT>> + Unpin,
    ErrorT: Display,
{
    while let Some(message) = stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(error) => {
                log::error!("Connection lost: {error}");
                break;
            }
        };

        let id = match serde_json::from_str::<ResponseId>(&message) {
            Ok(ResponseId {
                id: Some(Id::Num(id)),
            }) => id,
            Ok(_) => {
                log::debug!("Ignoring message without a numeric id: {message}");
                continue;
            }
            Err(error) => {
                log::debug!("Ignoring unparsable message: {error}");
                continue;
            }
        };

        let sender = pending.lock().senders.remove(&id);
        match sender {
            Some(sender) => {
                if sender.send(Ok(message)).is_err() {
                    log::debug!("Request {id} was cancelled before its response arrived");
                }
            }
            None => log::debug!("Dropping response to unknown or cancelled request {id}"),
        }
    }

    log::error!("Connection closed; failing pending requests");
    pending.lock().close();
}

/// Opens a WebSocket connection and multiplexes requests over it.
pub async fn connect_ws(
    url: &str,
    config: &RpcClientConfig,
) -> Result<MultiplexedTransport, TransportError> {
    let url = url::Url::parse(url)?;
    let (socket, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
    let (sink, stream) = socket.split();

    let sink = sink.with(|text: String| {
        future::ready(Ok::<_, tokio_tungstenite::tungstenite::Error>(Message::Text(
            text.into(),
        )))
    });
    let stream = stream.filter_map(|message| {
        future::ready(match message {
            Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
            Ok(Message::Binary(bytes)) => String::from_utf8(bytes.to_vec()).ok().map(Ok),
            Ok(_) => None,
            Err(error) => Some(Err(error)),
        })
    });

    Ok(MultiplexedTransport::new(
        Box::pin(sink),
        Box::pin(stream),
        config,
    ))
}
