//! Response construction for each routing outcome

use crate::payload::Payload;
use crate::{Error, Result};
use bytes::Bytes;
use hello_router::Outcome;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, DATE, SERVER};
use http::{HeaderValue, StatusCode};
use http_body_util::Full;

/// Response type written back by hyper
pub type HttpResponse = hyper::Response<Full<Bytes>>;

/// Builds responses from values computed once at startup
///
/// The only per-request input is the date header.
#[derive(Debug, Clone)]
pub struct Responder {
    server: HeaderValue,
    plaintext: Payload,
    json: Payload,
}

impl Responder {
    pub fn new(server_name: &str) -> Result<Self> {
        let server = HeaderValue::from_str(server_name)
            .map_err(|_| Error::InvalidHeader(format!("server name {:?}", server_name)))?;
        Ok(Self {
            server,
            plaintext: Payload::plaintext(),
            json: Payload::json()?,
        })
    }

    /// Response for `outcome`, stamped with `date`
    pub fn respond(&self, outcome: Outcome, date: HeaderValue) -> HttpResponse {
        match outcome {
            Outcome::Plaintext => self.ok(&self.plaintext, date),
            Outcome::Json => self.ok(&self.json, date),
            Outcome::NotFound => not_found(),
        }
    }

    fn ok(&self, payload: &Payload, date: HeaderValue) -> HttpResponse {
        let mut res = hyper::Response::new(Full::new(payload.body()));
        let headers = res.headers_mut();
        headers.reserve(4);
        headers.insert(CONTENT_TYPE, payload.content_type().clone());
        headers.insert(SERVER, self.server.clone());
        headers.insert(DATE, date);
        headers.insert(CONTENT_LENGTH, payload.content_length().clone());
        res
    }
}

fn not_found() -> HttpResponse {
    let mut res = hyper::Response::new(Full::new(Bytes::new()));
    *res.status_mut() = StatusCode::NOT_FOUND;
    res
}
