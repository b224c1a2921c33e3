//! Form-style percent decoding.

/// Decode an `application/x-www-form-urlencoded` value.
///
/// `+` becomes a space, then `%XX` escapes are decoded. Malformed escapes
/// are kept literally and invalid UTF-8 is replaced with U+FFFD.
pub fn decode_form(input: &str) -> String {
    let spaced = input.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}
