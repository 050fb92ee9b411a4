//! Turns a strategy request into a stream of [`ResultState`] snapshots.
//!
//! The stream is lazy: nothing is sent until it is first polled. Dropping it
//! at any point drops the response body, which releases the connection.

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::{Stream, StreamExt as _, stream};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::protocol::decode::LineDecoder;
use crate::protocol::parse::parse_line;
use crate::protocol::types::{StrategyRequest, StreamEvent};
use crate::session::state::{
    ResultState, TRANSPORT_FAILURE_MESSAGE, VALIDATION_MESSAGE, rounded_secs,
};
use crate::transport::{ByteStream, Transport, TransportError};

/// Snapshots for one submission, in the order their lines arrived.
pub type ResultStream = Pin<Box<dyn Stream<Item = ResultState> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", VALIDATION_MESSAGE)]
    MissingClientOrRegion,
}

/// Check that client and region are present. Returns the request with both
/// trimmed.
pub fn validate(request: StrategyRequest) -> Result<StrategyRequest, ValidationError> {
    let client = request.client.trim();
    let region = request.region.trim();
    if client.is_empty() || region.is_empty() {
        return Err(ValidationError::MissingClientOrRegion);
    }
    Ok(StrategyRequest {
        client: client.to_string(),
        region: region.to_string(),
        industry: request.industry,
    })
}

/// Map one stream event to the snapshot it produces.
///
/// Returns `None` for [`StreamEvent::Done`], which ends the stream without a
/// snapshot of its own.
pub fn apply_event(event: StreamEvent, elapsed_secs: u64) -> Option<ResultState> {
    match event {
        StreamEvent::Status { message } => Some(ResultState::with_status(message, elapsed_secs)),
        StreamEvent::Content { text, complete } => Some(ResultState::with_content(
            Some(text),
            complete,
            elapsed_secs,
        )),
        StreamEvent::Finished => Some(ResultState::with_content(None, true, elapsed_secs)),
        StreamEvent::Error { message } => Some(ResultState::failed(message, elapsed_secs)),
        StreamEvent::Done => None,
    }
}

/// Issues requests through a [`Transport`] and decodes the responses.
#[derive(Clone)]
pub struct StreamConsumer {
    transport: Arc<dyn Transport>,
}

impl StreamConsumer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Submit a request.
    ///
    /// An invalid request yields a single failed snapshot with zero elapsed
    /// time and never reaches the transport.
    pub fn submit(&self, request: StrategyRequest) -> ResultStream {
        let started = Instant::now();
        let request = match validate(request) {
            Ok(request) => request,
            Err(e) => {
                debug!("rejecting submission: {e}");
                return Box::pin(stream::iter([ResultState::failed(e.to_string(), 0)]));
            }
        };
        info!(
            industry = %request.industry,
            client = %request.client,
            region = %request.region,
            "submitting strategy request"
        );
        let transport = Arc::clone(&self.transport);
        let opening: BoxFuture<'static, Result<ByteStream, TransportError>> =
            Box::pin(async move { transport.open(&request).await });
        decode_loop(Source::Opening(opening), started)
    }
}

/// Run the decode loop over a body that is already open.
pub fn consume(body: ByteStream) -> ResultStream {
    decode_loop(Source::Open(body), Instant::now())
}

enum Source {
    Opening(BoxFuture<'static, Result<ByteStream, TransportError>>),
    Open(ByteStream),
    Closed,
}

struct DecodeLoop {
    source: Source,
    lines: LineDecoder,
    pending: VecDeque<ResultState>,
    started: Instant,
}

impl DecodeLoop {
    fn elapsed_secs(&self) -> u64 {
        rounded_secs(self.started.elapsed())
    }

    /// Drop the body. Nothing more is read after this.
    fn close(&mut self) {
        self.source = Source::Closed;
    }

    fn fail(&mut self, error: &TransportError) {
        warn!("strategy stream failed: {error}");
        let elapsed = self.elapsed_secs();
        self.pending
            .push_back(ResultState::failed(TRANSPORT_FAILURE_MESSAGE, elapsed));
        self.close();
    }

    fn process_lines(&mut self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            if self.process_line(&line).is_break() {
                self.close();
                return;
            }
        }
    }

    fn process_line(&mut self, line: &str) -> ControlFlow<()> {
        let events = match parse_line(line) {
            Ok(Some(events)) => events,
            Ok(None) => return ControlFlow::Continue(()),
            Err(e) => {
                debug!(error = %e, line, "skipping malformed payload");
                return ControlFlow::Continue(());
            }
        };
        for event in events {
            let Some(state) = apply_event(event, self.elapsed_secs()) else {
                debug!("received end-of-stream sentinel");
                return ControlFlow::Break(());
            };
            let terminal = state.is_terminal();
            if terminal {
                info!(
                    success = state.success,
                    elapsed_secs = state.elapsed_secs,
                    "strategy stream finished"
                );
            }
            self.pending.push_back(state);
            if terminal {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}

fn decode_loop(source: Source, started: Instant) -> ResultStream {
    let state = DecodeLoop {
        source,
        lines: LineDecoder::new(),
        pending: VecDeque::from([ResultState::streaming()]),
        started,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(snapshot) = state.pending.pop_front() {
                return Some((snapshot, state));
            }
            match &mut state.source {
                Source::Closed => return None,
                Source::Opening(opening) => match opening.await {
                    Ok(body) => state.source = Source::Open(body),
                    Err(e) => state.fail(&e),
                },
                Source::Open(body) => match body.next().await {
                    Some(Ok(chunk)) => {
                        let lines = state.lines.push_chunk(&chunk);
                        state.process_lines(lines);
                    }
                    Some(Err(e)) => state.fail(&e),
                    None => {
                        let rest = state.lines.finish();
                        state.process_lines(rest);
                        state.close();
                    }
                },
            }
        }
    }))
}
