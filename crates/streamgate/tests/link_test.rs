//! Parsing issued links and checking them against descriptors.

use streamgate::{
    FileDescriptorBuilder, FileLocation, HashLength, LinkToken, ParsedLink, verify_token,
};

fn descriptor() -> streamgate::FileDescriptor {
    FileDescriptorBuilder::default()
        .id(99)
        .name("a.mp4")
        .size(1_048_576u64)
        .mime_type("video/mp4")
        .location(FileLocation::Document {
            id: 99,
            access_hash: 1,
            file_reference: vec![],
            thumb_size: String::new(),
        })
        .build()
        .unwrap()
}

#[test]
fn test_parse_stream_link() {
    let link = ParsedLink::parse("http://host:8080/stream/777?hash=abc123").unwrap();
    assert_eq!(
        link,
        ParsedLink {
            stable_message_id: 777,
            hash: "abc123".to_string(),
            download: false,
        }
    );
}

#[test]
fn test_parse_rejects_other_urls() {
    for url in [
        "http://host:8080/watch/777?hash=abc123",
        "http://host:8080/stream/777",
        "http://host:8080/stream/abc?hash=abc123",
        "http://host:8080/stream/777?d=true",
        "http://host:8080/stream/777?hash=",
    ] {
        assert!(ParsedLink::parse(url).is_none(), "{url}");
    }
}

#[test]
fn test_issued_link_verifies() {
    let file = descriptor();
    let token = LinkToken::for_file(&file, HashLength::DEFAULT);
    let url = format!("https://files.example.com/stream/777?hash={}&d=true", token.short());

    let link = ParsedLink::parse(&url).unwrap();
    assert!(link.download);
    assert!(verify_token(link.stable_message_id, &file, &link.hash, HashLength::DEFAULT).is_ok());
}

#[test]
fn test_tampered_link_fails() {
    let file = descriptor();
    let token = LinkToken::for_file(&file, HashLength::DEFAULT);
    let mut hash = token.short().as_str().to_string();
    let last = if hash.ends_with('0') { '1' } else { '0' };
    hash.pop();
    hash.push(last);

    assert!(verify_token(777, &file, &hash, HashLength::DEFAULT).is_err());
}
