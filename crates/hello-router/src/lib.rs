//! hello-router: Zero-dependency exact-path router
//!
//! Maps a request path to one of a fixed set of outcomes. There is no
//! parameter or wildcard matching: a path either equals one of the routes
//! in [`ROUTES`] byte for byte, or it is [`Outcome::NotFound`].
//!
//! The request method is not consulted. Every method on a matched path is
//! served the same way.
//!
//! ## Example
//! ```
//! use hello_router::Outcome;
//!
//! assert_eq!(Outcome::classify("/plaintext"), Outcome::Plaintext);
//! assert_eq!(Outcome::classify("/json"), Outcome::Json);
//! assert_eq!(Outcome::classify("/favicon.ico"), Outcome::NotFound);
//! ```

use std::fmt;

/// Path served by the plaintext responder
pub const PATH_PLAINTEXT: &str = "/plaintext";

/// Path served by the JSON responder
pub const PATH_JSON: &str = "/json";

/// The fixed route table, in match order
pub const ROUTES: [(&str, Outcome); 2] = [
    (PATH_PLAINTEXT, Outcome::Plaintext),
    (PATH_JSON, Outcome::Json),
];

/// Classification of an inbound request path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// `GET /plaintext`
    Plaintext,
    /// `GET /json`
    Json,
    /// Anything else
    NotFound,
}

impl Outcome {
    /// Classify a path (without query string) into an outcome
    ///
    /// # Example
    /// ```
    /// use hello_router::Outcome;
    ///
    /// assert_eq!(Outcome::classify("/json"), Outcome::Json);
    /// assert_eq!(Outcome::classify("/json/"), Outcome::NotFound);
    /// ```
    #[inline]
    pub fn classify(path: &str) -> Outcome {
        match path {
            PATH_PLAINTEXT => Outcome::Plaintext,
            PATH_JSON => Outcome::Json,
            _ => Outcome::NotFound,
        }
    }

    /// Whether a responder exists for this outcome
    #[inline]
    pub fn is_found(&self) -> bool {
        !matches!(self, Outcome::NotFound)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Plaintext => "plaintext",
            Outcome::Json => "json",
            Outcome::NotFound => "not-found",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
