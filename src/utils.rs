use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use sha2::{Digest, Sha256};

pub fn parse_size(s: &str) -> u64 {
    let s = s.trim().to_lowercase();
    let units = [
        ("gib", 1024u64.pow(3)),
        ("mib", 1024u64.pow(2)),
        ("kib", 1024),
        ("gb", 1000u64.pow(3)),
        ("mb", 1000u64.pow(2)),
        ("kb", 1000),
        ("g", 1000u64.pow(3)),
        ("m", 1000u64.pow(2)),
        ("k", 1000),
        ("b", 1),
    ];

    for (unit, mult) in units {
        if let Some(number) = s.strip_suffix(unit) {
            if let Ok(val) = number.trim().parse::<f64>() {
                return (val * mult as f64) as u64;
            }
        }
    }
    s.parse().unwrap_or(0)
}

pub fn is_probably_binary(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return true,
    };
    let mut buffer = [0u8; 4096];
    let n = match file.read(&mut buffer) {
        Ok(n) => n,
        Err(_) => return true,
    };
    if n == 0 {
        return false;
    }

    // invalid UTF-8 is left to the Windows-1252 fallback of the reader
    buffer[..n].contains(&0)
}

/// Reads a text file as UTF-8, falling back to Windows-1252.
pub fn read_text_best_effort(path: &Path, normalize_eol: bool) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Can't open document {path:?}"))?;
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            let (res, _, _) = WINDOWS_1252.decode(err.as_bytes());
            res.into_owned()
        }
    };

    if normalize_eol {
        Ok(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Ok(content)
    }
}

pub fn file_bytes_equal(p1: &Path, p2: &Path) -> bool {
    let hash_file = |p: &Path| -> Option<String> {
        let mut file = File::open(p).ok()?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher).ok()?;
        Some(hex::encode(hasher.finalize()))
    };

    match (hash_file(p1), hash_file(p2)) {
        (Some(h1), Some(h2)) => h1 == h2,
        _ => false,
    }
}
