//! Selection fingerprints
//!
//! A 32-bit rolling hash (`acc * 31 + unit` over UTF-16 code units) used to
//! keep partial exports of different selections from overwriting each
//! other. Not collision resistant.

/// Hash `text` into a signed 32-bit fingerprint
pub fn fingerprint(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |acc, unit| {
        acc.wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit))
    })
}
