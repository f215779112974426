//! Tests for the link token codec.

use rand::Rng;
use rand::distributions::Alphanumeric;
use std::collections::HashSet;
use streamgate_core::{
    FileDescriptor, FileDescriptorBuilder, FileLocation, HashLength, LinkToken, pack, shorten,
    verify_token,
};
use streamgate_error::TokenErrorKind;

fn descriptor(id: i64, name: &str, size: u64, mime: &str) -> FileDescriptor {
    FileDescriptorBuilder::default()
        .id(id)
        .name(name)
        .size(size)
        .mime_type(mime)
        .location(FileLocation::Document {
            id,
            access_hash: 42,
            file_reference: vec![0xde, 0xad],
            thumb_size: String::new(),
        })
        .build()
        .unwrap()
}

fn random_string(rng: &mut impl Rng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (&mut *rng)
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[test]
fn test_single_field_mutations_do_not_collide() {
    let mut rng = rand::thread_rng();
    let mut seen = HashSet::new();
    let mut collisions = 0;

    for _ in 0..10_000 {
        let name = random_string(&mut rng, 24);
        let size: u64 = rng.r#gen();
        let mime = random_string(&mut rng, 16);
        let id: i64 = rng.r#gen();

        let base = pack(&name, size, &mime, id);
        let mutated = match rng.gen_range(0..4) {
            0 => pack(&format!("{name}x"), size, &mime, id),
            1 => pack(&name, size.wrapping_add(1), &mime, id),
            2 => pack(&name, size, &format!("{mime}x"), id),
            _ => pack(&name, size, &mime, id.wrapping_add(1)),
        };
        if base == mutated {
            collisions += 1;
        }
        seen.insert(base);
    }

    assert_eq!(collisions, 0);
    // Random inputs almost never repeat; allow for a handful of identical draws.
    assert!(seen.len() > 9_990);
}

#[test]
fn test_equal_identity_gives_equal_tokens() {
    let a = descriptor(99, "a.mp4", 1_048_576, "video/mp4");
    let b = descriptor(99, "a.mp4", 1_048_576, "video/mp4");
    let length = HashLength::clamped(6);
    assert_eq!(LinkToken::for_file(&a, length), LinkToken::for_file(&b, length));
}

#[test]
fn test_token_is_prefix_of_full_hash() {
    let file = descriptor(99, "a.mp4", 1_048_576, "video/mp4");
    let token = LinkToken::for_file(&file, HashLength::clamped(6));
    assert_eq!(token.short().as_str().len(), 6);
    assert!(token.full().as_str().starts_with(token.short().as_str()));
    assert!(token.short().as_str().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_verify_accepts_matching_token() {
    let file = descriptor(99, "a.mp4", 1_048_576, "video/mp4");
    let length = HashLength::clamped(8);
    let full = pack("a.mp4", 1_048_576, "video/mp4", 99);
    let token = shorten(&full, length);
    assert!(verify_token(777, &file, token.as_str(), length).is_ok());
}

#[test]
fn test_verify_rejects_changed_descriptor() {
    let original = descriptor(99, "a.mp4", 1_048_576, "video/mp4");
    let length = HashLength::default();
    let token = LinkToken::for_file(&original, length);

    let renamed = descriptor(99, "b.mp4", 1_048_576, "video/mp4");
    let err = verify_token(777, &renamed, token.short().as_str(), length).unwrap_err();
    assert_eq!(
        err.kind(),
        &TokenErrorKind::TokenMismatch {
            stable_message_id: 777
        }
    );
}

#[test]
fn test_verify_rejects_truncated_token() {
    let file = descriptor(99, "a.mp4", 1_048_576, "video/mp4");
    let length = HashLength::clamped(6);
    let token = LinkToken::for_file(&file, length);
    let truncated = &token.short().as_str()[..5];
    assert!(verify_token(777, &file, truncated, length).is_err());
}
