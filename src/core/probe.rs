use crate::error::ScanError;

/// Parse a probe string given on the command line into the raw bytes sent
/// on the wire. Backslash escapes let operators spell control characters in
/// a textual flag: `\n`, `\r`, `\t`, `\0`, `\\`, `\"` and `\xHH`. A
/// malformed escape is a configuration error, raised before any scanning
/// begins.
pub fn parse(probe: &str) -> Result<Vec<u8>, ScanError> {
    let mut result = Vec::new();
    let mut chars = probe.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            result.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => result.push(b'\n'),
            Some('r') => result.push(b'\r'),
            Some('t') => result.push(b'\t'),
            Some('0') => result.push(0),
            Some('\\') => result.push(b'\\'),
            Some('"') => result.push(b'"'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        let pair = format!("{}{}", hi, lo);
                        match u8::from_str_radix(&pair, 16) {
                            Ok(byte) => result.push(byte),
                            Err(_) => {
                                return Err(ScanError::Probe(format!(
                                    "bad hex escape \\x{} in {:?}",
                                    pair, probe
                                )));
                            }
                        }
                    }
                    _ => {
                        return Err(ScanError::Probe(format!(
                            "truncated hex escape in {:?}",
                            probe
                        )));
                    }
                }
            }
            Some(other) => {
                return Err(ScanError::Probe(format!(
                    "unknown escape \\{} in {:?}",
                    other, probe
                )));
            }
            None => {
                return Err(ScanError::Probe(format!(
                    "trailing backslash in {:?}",
                    probe
                )));
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_is_newline() {
        assert_eq!(parse("\\n").unwrap(), b"\n");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(parse("PING").unwrap(), b"PING");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse("\\r\\n").unwrap(), b"\r\n");
        assert_eq!(parse("\\t\\0\\\\").unwrap(), b"\t\0\\");
        assert_eq!(parse("\\x00\\xfeab").unwrap(), vec![0x00, 0xfe, b'a', b'b']);
    }

    #[test]
    fn test_malformed_escapes_are_errors() {
        assert!(matches!(parse("\\q").unwrap_err(), ScanError::Probe(_)));
        assert!(matches!(parse("abc\\").unwrap_err(), ScanError::Probe(_)));
        assert!(matches!(parse("\\xZZ").unwrap_err(), ScanError::Probe(_)));
        assert!(matches!(parse("\\x1").unwrap_err(), ScanError::Probe(_)));
    }
}
