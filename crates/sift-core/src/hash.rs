use xxhash_rust::xxh64::xxh64;

const BASE62_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Encode a u64 value as a base62 string (11 chars, zero-padded).
fn base62_encode(mut value: u64) -> String {
    let mut result = vec![b'0'; 11];
    let mut idx = result.len();
    while value > 0 {
        idx -= 1;
        result[idx] = BASE62_CHARS[(value % 62) as usize];
        value /= 62;
    }
    result.into_iter().map(char::from).collect()
}

/// Fingerprint of a submitted source text.
///
/// fingerprint = base62(xxhash64(language + '\0' + source))
///
/// Stable across processes, so callers can use it as a cache or storage key
/// for every result derived from the same submission.
pub fn source_fingerprint(language: &str, source: &str) -> String {
    let mut input = String::with_capacity(language.len() + source.len() + 1);
    input.push_str(language);
    input.push('\0'); // separator
    input.push_str(source);
    base62_encode(xxh64(input.as_bytes(), 0))
}
