pub mod caching;
pub mod fake;
pub mod httpclient;
#[allow(clippy::module_inception)]
pub mod sources;

pub use caching::ResponseCache;
pub use fake::{FakeHttpClient, FakeReply};
pub use httpclient::{HttpClient, ReqwestClient};
pub use sources::{Credentials, Source, SourceProvider};
