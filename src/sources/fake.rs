use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::sources::httpclient::HttpClient;
use crate::sources::sources::Source;

/// Canned upstream for tests and offline runs.  Queued replies are served
/// first; after that every call gets the fallback reply.
#[derive(Debug)]
pub struct FakeHttpClient {
    queued: Mutex<VecDeque<FakeReply>>,
    fallback: FakeReply,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
pub enum FakeReply {
    Body(String),
    Status(u16),
    Transport(String),
}

impl FakeHttpClient {
    pub fn new(fallback: FakeReply) -> Self {
        Self { queued: Mutex::new(VecDeque::new()), fallback, calls: AtomicUsize::new(0) }
    }

    pub fn with_body(body: impl Into<String>) -> Self {
        Self::new(FakeReply::Body(body.into()))
    }

    pub fn push(&self, reply: FakeReply) {
        self.queued.lock().unwrap_or_else(PoisonError::into_inner).push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get(&self, _source: &Source) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.queued.lock().unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            FakeReply::Body(body) => Ok(body),
            FakeReply::Status(status) => Err(Error::upstream_status(status)),
            FakeReply::Transport(message) => Err(Error::upstream_transport(message)),
        }
    }
}
