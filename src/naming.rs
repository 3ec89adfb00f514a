//! Destination naming for derivatives
//!
//! A derivative lives next to its source with a short tag inserted before
//! the extension:
//!
//! ```text
//! https://account.example.net/images/2024/pic.png
//!   + "-b" → https://account.example.net/images/2024/pic-b.png
//!   → object key "2024/pic-b.png" (container "images" stripped)
//! ```

use std::net::IpAddr;
use url::Url;

/// Insert `tag` before the extension of `source_url`
///
/// Only the last `.` counts. When there is none, or it sits directly after
/// `/`, `?` or `#`, the tag is appended to the end instead.
pub fn derive_name(source_url: &str, tag: &str) -> String {
    if let Some(dot) = source_url.rfind('.') {
        let preceding = source_url[..dot].chars().next_back();
        if let Some(c) = preceding {
            if !matches!(c, '/' | '?' | '#') {
                let mut name = String::with_capacity(source_url.len() + tag.len());
                name.push_str(&source_url[..dot]);
                name.push_str(tag);
                name.push_str(&source_url[dot..]);
                return name;
            }
        }
    }

    format!("{}{}", source_url, tag)
}

/// Extension of a reference, including the leading dot
///
/// The whole reference is treated as a path: the extension runs from the
/// last `.` to the end, unless a `/` or `\` follows it. A query or
/// fragment therefore stays part of the extension, and such references
/// match no encoder. Returns an empty string when there is no extension.
pub fn extension_of(reference: &str) -> &str {
    let segment = match reference.rfind(|c: char| c == '/' || c == '\\') {
        Some(idx) => &reference[idx + 1..],
        None => reference,
    };

    match segment.rfind('.') {
        Some(dot) if dot + 1 < segment.len() => &segment[dot..],
        _ => "",
    }
}

/// Storage key of a reference inside its container
///
/// For URLs the first path segment is the container and the rest is the
/// key. Path-style hosts (IP addresses, `localhost`) carry the account name
/// as an extra leading segment. Plain paths lose their leading `/` only.
pub fn object_key(reference: &str) -> String {
    match Url::parse(reference) {
        Ok(url) if url.has_host() => {
            let skip = if url.host_str().map(is_path_style_host).unwrap_or(false) {
                2
            } else {
                1
            };
            key_after(url.path(), skip)
        }
        _ => match reference.split_once("://") {
            // Unparseable URL: drop the authority, query and fragment
            Some((_, rest)) => {
                let path = rest
                    .split(|c: char| c == '?' || c == '#')
                    .next()
                    .unwrap_or_default();
                key_after(path.split_once('/').map(|(_, p)| p).unwrap_or(""), 1)
            }
            None => percent_decode(reference.trim_start_matches('/')),
        },
    }
}

/// Path remainder after `skip` leading segments, percent-decoded
fn key_after(path: &str, skip: usize) -> String {
    path.trim_start_matches('/')
        .splitn(skip + 1, '/')
        .nth(skip)
        .map(percent_decode)
        .unwrap_or_default()
}

fn is_path_style_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost") || host.parse::<IpAddr>().is_ok()
}

fn percent_decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
