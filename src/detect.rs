//! String-kind detection
//!
//! An ordered cascade of detectors, each a cheap structural pre-check
//! followed by parser-backed validation. The first match wins, so the
//! ordering is a contract:
//!
//! - `[host]:port` must be tried before `host:port` (the bracket form is
//!   otherwise ambiguous with a bare IPv6 address),
//! - UUID must be tried before the base64 variants (32 hex chars are a
//!   subset of the base64url alphabet),
//! - hex must be tried before base64 for the same reason.
//!
//! A detector either returns a kind or declines; a declined cascade
//! returns plain `string`.

use std::net::{IpAddr, Ipv4Addr, SocketAddrV4, SocketAddrV6};

use base64::engine::general_purpose;
use base64::engine::GeneralPurpose;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::types::DetectedType;

static RE_UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static RE_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").unwrap());

static RE_MAC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9a-f]{2}:){5}[0-9a-f]{2}$").unwrap());

static RE_WIN_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]:[/\\]").unwrap());

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static RE_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$").unwrap());

static RE_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-f]+$").unwrap());

static RE_BASE64_STD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$").unwrap()
});

static RE_BASE64_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2}==|[A-Za-z0-9_-]{3}=)?$").unwrap()
});

static RE_BASE64_RAW_STD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2,3})?$").unwrap());

static RE_BASE64_RAW_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2,3})?$").unwrap());

struct Base64Variant {
    kind: DetectedType,
    pattern: &'static Lazy<Regex>,
    engine: &'static GeneralPurpose,
}

/// Tried in order: padded variants first, raw variants after.
static BASE64_VARIANTS: &[Base64Variant] = &[
    Base64Variant {
        kind: DetectedType::Base64Std,
        pattern: &RE_BASE64_STD,
        engine: &general_purpose::STANDARD,
    },
    Base64Variant {
        kind: DetectedType::Base64Url,
        pattern: &RE_BASE64_URL,
        engine: &general_purpose::URL_SAFE,
    },
    Base64Variant {
        kind: DetectedType::Base64RawStd,
        pattern: &RE_BASE64_RAW_STD,
        engine: &general_purpose::STANDARD_NO_PAD,
    },
    Base64Variant {
        kind: DetectedType::Base64RawUrl,
        pattern: &RE_BASE64_RAW_URL,
        engine: &general_purpose::URL_SAFE_NO_PAD,
    },
];

/// The ordered cascade: specific → generic, cheap → expensive.
const DETECTORS: &[fn(&str) -> Option<DetectedType>] = &[
    // Networking (highest priority, most specific)
    detect_ipv6_port_pair,
    detect_ipv4_port_pair,
    detect_ipv4_with_mask,
    detect_ipv6,
    detect_ipv4,
    detect_mac,
    // Identifiers (UUID must come before base64url)
    detect_uuid,
    detect_email,
    detect_phone,
    // URLs and domains
    detect_link,
    detect_domain,
    // Encodings (must come after UUID and networking)
    detect_hex,
    detect_base64,
    // Paths
    detect_windows_path,
];

/// Detect the refined kind of a string value; `string` if nothing matches.
pub fn detect_str_type(s: &str) -> DetectedType {
    if s.is_empty() {
        return DetectedType::String;
    }

    for detect in DETECTORS {
        if let Some(kind) = detect(s) {
            return kind;
        }
    }

    DetectedType::String
}

// ============= Networking detectors =============

fn detect_ipv6_port_pair(s: &str) -> Option<DetectedType> {
    if !s.starts_with('[') {
        return None;
    }
    let addr: SocketAddrV6 = s.parse().ok()?;
    if addr.ip().to_ipv4_mapped().is_none() {
        Some(DetectedType::Ipv6PortPair)
    } else {
        None
    }
}

fn detect_ipv4_port_pair(s: &str) -> Option<DetectedType> {
    if !s.contains(':') {
        return None;
    }
    if s.starts_with('[') {
        // [::ffff:a.b.c.d]:port carries an IPv4 host in bracket syntax
        let addr: SocketAddrV6 = s.parse().ok()?;
        return addr
            .ip()
            .to_ipv4_mapped()
            .map(|_| DetectedType::Ipv4PortPair);
    }
    s.parse::<SocketAddrV4>()
        .ok()
        .map(|_| DetectedType::Ipv4PortPair)
}

fn detect_ipv4_with_mask(s: &str) -> Option<DetectedType> {
    let (addr, mask) = s.split_once('/')?;
    addr.parse::<Ipv4Addr>().ok()?;
    if !mask.is_empty() && mask.bytes().all(|b| b.is_ascii_digit()) {
        let bits: u8 = mask.parse().ok()?;
        if bits <= 32 {
            return Some(DetectedType::Ipv4WithMask);
        }
    }
    None
}

fn detect_ipv6(s: &str) -> Option<DetectedType> {
    if !s.contains(':') {
        return None;
    }
    match s.parse::<IpAddr>().ok()? {
        IpAddr::V6(v6) if v6.to_ipv4_mapped().is_none() => Some(DetectedType::Ipv6),
        _ => None,
    }
}

fn detect_ipv4(s: &str) -> Option<DetectedType> {
    if !s.contains('.') {
        return None;
    }
    match s.parse::<IpAddr>().ok()? {
        IpAddr::V4(_) => Some(DetectedType::Ipv4),
        IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => Some(DetectedType::Ipv4),
        IpAddr::V6(_) => None,
    }
}

fn detect_mac(s: &str) -> Option<DetectedType> {
    // Fixed length: xx:xx:xx:xx:xx:xx
    if s.len() != 17 {
        return None;
    }
    RE_MAC
        .is_match(&s.to_ascii_lowercase())
        .then_some(DetectedType::Mac)
}

// ============= Identifier detectors =============

fn detect_uuid(s: &str) -> Option<DetectedType> {
    // Fixed length: 8-4-4-4-12
    if s.len() != 36 {
        return None;
    }
    RE_UUID
        .is_match(&s.to_ascii_lowercase())
        .then_some(DetectedType::Uuid)
}

fn detect_email(s: &str) -> Option<DetectedType> {
    // Exactly one '@', bare address form only (no display names)
    if s.bytes().filter(|&b| b == b'@').count() != 1 {
        return None;
    }
    RE_EMAIL.is_match(s).then_some(DetectedType::Email)
}

fn detect_phone(s: &str) -> Option<DetectedType> {
    // E.164: '+', a leading digit 1-9, 7-14 more digits
    if s.len() < 9 || s.len() > 16 || !s.starts_with('+') {
        return None;
    }
    RE_PHONE.is_match(s).then_some(DetectedType::Phone)
}

// ============= URL/domain detectors =============

fn detect_link(s: &str) -> Option<DetectedType> {
    let lower = s.to_ascii_lowercase();
    let has_scheme = lower.starts_with("http://") || lower.starts_with("https://");

    if !has_scheme {
        // Scheme-less links like "google.com/search" need both dot and slash
        if !s.contains('.') || !s.contains('/') {
            return None;
        }
        let b = s.as_bytes();
        if b.len() >= 3 && b[1] == b':' && (b[2] == b'/' || b[2] == b'\\') {
            // Windows drive path
            return None;
        }
    }

    let url = if has_scheme {
        Url::parse(s).ok()?
    } else {
        Url::parse(s)
            .or_else(|_| Url::parse(&format!("https://{s}")))
            .ok()?
    };

    if url.host_str().is_some_and(|h| !h.is_empty()) {
        Some(DetectedType::Link)
    } else {
        None
    }
}

fn detect_domain(s: &str) -> Option<DetectedType> {
    if !s.contains('.') || s.contains('/') || s.contains(':') {
        return None;
    }
    RE_DOMAIN
        .is_match(&s.to_ascii_lowercase())
        .then_some(DetectedType::Domain)
}

// ============= Encoding detectors =============

fn detect_hex(s: &str) -> Option<DetectedType> {
    // Even length and at least 8 chars to avoid false positives
    if s.len() < 8 || s.len() % 2 != 0 {
        return None;
    }
    RE_HEX
        .is_match(&s.to_ascii_lowercase())
        .then_some(DetectedType::Hex)
}

fn detect_base64(s: &str) -> Option<DetectedType> {
    // Minimum 8 chars to reduce false positives
    if s.len() < 8 {
        return None;
    }
    for variant in BASE64_VARIANTS {
        if !variant.pattern.is_match(s) {
            continue;
        }
        let Ok(decoded) = variant.engine.decode(s) else {
            continue;
        };
        // The UTF-8 gate: suppresses matches on random ASCII text
        if std::str::from_utf8(&decoded).is_ok() {
            return Some(variant.kind);
        }
    }
    None
}

// ============= Path detectors =============

fn detect_windows_path(s: &str) -> Option<DetectedType> {
    if s.len() < 3 {
        return None;
    }
    RE_WIN_PATH
        .is_match(s)
        .then_some(DetectedType::FilepathWindows)
}
