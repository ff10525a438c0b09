//! Controller command encoding and response cleanup

use regex::Regex;
use std::sync::OnceLock;

use super::ControllerError;

/// Status request understood by the controller
pub const STATUS_COMMAND: &str = "PTC";

/// Line terminator expected after every command
pub const COMMAND_TERMINATOR: &str = "\r\n";

/// Encode `text` as an ASCII command terminated by CRLF.
///
/// Trailing line breaks in `text` are replaced by the terminator.
pub fn encode_command(text: &str) -> Result<Vec<u8>, ControllerError> {
    let text = text.trim_end_matches(['\r', '\n']);
    if !text.is_ascii() {
        return Err(ControllerError::NonAscii(text.to_string()));
    }

    let mut bytes = Vec::with_capacity(text.len() + COMMAND_TERMINATOR.len());
    bytes.extend_from_slice(text.as_bytes());
    bytes.extend_from_slice(COMMAND_TERMINATOR.as_bytes());
    Ok(bytes)
}

fn blank_runs() -> &'static Regex {
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    BLANK_RUNS.get_or_init(|| Regex::new(r"\n\s*\n").expect("static regex"))
}

/// Split a raw controller response into display lines.
///
/// Non-ASCII bytes are replaced, runs of blank lines are collapsed, and CR/LF
/// terminators are removed.
pub fn clean_response(raw: &[u8]) -> Vec<String> {
    let text: String = raw
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
        .collect();
    let collapsed = blank_runs().replace_all(&text, "\n");
    collapsed.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_command() {
        assert_eq!(encode_command("PTC").unwrap(), b"PTC\r\n");
        assert_eq!(encode_command("SET 77\n").unwrap(), b"SET 77\r\n");
        assert!(matches!(
            encode_command("T1 −5"),
            Err(ControllerError::NonAscii(_))
        ));
    }

    #[test]
    fn test_clean_response_collapses_blank_runs() {
        let raw = b"T1 -12.5\r\n\r\nS1 -10.0\r\n\r\n\r\nC1 3.0\r\n";
        assert_eq!(
            clean_response(raw),
            vec!["T1 -12.5", "S1 -10.0", "C1 3.0"]
        );
    }

    #[test]
    fn test_clean_response_empty() {
        assert!(clean_response(b"").is_empty());
    }
}
