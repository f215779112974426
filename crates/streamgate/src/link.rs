//! Parsing issued links.

/// The parts of an issued stream link.
///
/// # Examples
///
/// ```
/// use streamgate::ParsedLink;
///
/// let link = ParsedLink::parse("http://host:8080/stream/777?hash=a1b2c3&d=true").unwrap();
/// assert_eq!(link.stable_message_id, 777);
/// assert_eq!(link.hash, "a1b2c3");
/// assert!(link.download);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// Message ID inside the archive channel
    pub stable_message_id: i32,
    /// Short hash from the query string
    pub hash: String,
    /// Whether the link asks for a download instead of inline playback
    pub download: bool,
}

impl ParsedLink {
    /// Parse `<host>/stream/<id>?hash=<hash>[&d=true]`.
    ///
    /// Returns `None` when the path or the hash parameter is missing.
    pub fn parse(url: &str) -> Option<Self> {
        let (_, rest) = url.split_once("/stream/")?;
        let (id, query) = rest.split_once('?')?;
        let stable_message_id = id.trim_end_matches('/').parse().ok()?;

        let mut hash = None;
        let mut download = false;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("hash", value)) if !value.is_empty() => hash = Some(value.to_string()),
                Some(("d", value)) => download = value == "true",
                _ => {}
            }
        }

        Some(Self {
            stable_message_id,
            hash: hash?,
            download,
        })
    }
}
