use std::io::{self, Write};

use super::exchange::{Exchange, Outcome};

/// Indent a JSON body, keeping every number literal as the server wrote it.
/// Returns `None` when the body is not JSON.
pub fn pretty_body(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// Status line for an exchange
pub fn status_line(exchange: &Exchange) -> String {
    match exchange.outcome() {
        Outcome::Success => format!("✅ HTTP {}", exchange.status),
        Outcome::ServerError => format!("⚠️ HTTP {}", exchange.status),
    }
}

/// Print an exchange: the status line (stderr for failures), then the body on `out`
pub fn render_exchange(
    exchange: &Exchange,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    let line = status_line(exchange);
    match exchange.outcome() {
        Outcome::Success => writeln!(out, "{}", line)?,
        Outcome::ServerError => writeln!(err, "{}", line)?,
    }
    match pretty_body(&exchange.body) {
        Some(pretty) => writeln!(out, "{}", pretty)?,
        None => {
            out.write_all(&exchange.body)?;
            writeln!(out)?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn render_bytes(exchange: &Exchange) -> (Vec<u8>, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        render_exchange(exchange, &mut out, &mut err).unwrap();
        (out, String::from_utf8(err).unwrap())
    }

    fn render(exchange: &Exchange) -> (String, String) {
        let (out, err) = render_bytes(exchange);
        (String::from_utf8(out).unwrap(), err)
    }

    #[test]
    fn test_pretty_body_preserves_structure() {
        let raw = br#"{"id":7,"status":{"value":"Active"},"balances":[1.5,2],"closed":null}"#;
        let pretty = pretty_body(raw).unwrap();

        assert!(pretty.contains("\n  \"id\": 7"));
        let reparsed: Value = serde_json::from_str(&pretty).unwrap();
        let original: Value = serde_json::from_slice(raw).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_pretty_body_keeps_key_order() {
        let pretty = pretty_body(br#"{"zeta":1,"alpha":2}"#).unwrap();
        assert!(pretty.find("zeta").unwrap() < pretty.find("alpha").unwrap());
    }

    #[test]
    fn test_number_literals_kept_exactly() {
        let raw = br#"{"id":123456789012345678901234,"amount":1500.50,"bal":100.000000,"rate":1e2}"#;
        assert_eq!(
            pretty_body(raw).unwrap(),
            "{\n  \"id\": 123456789012345678901234,\n  \"amount\": 1500.50,\n  \"bal\": 100.000000,\n  \"rate\": 1e2\n}"
        );
    }

    #[test]
    fn test_non_json_body_printed_verbatim() {
        assert_eq!(pretty_body(b"Internal Server Error"), None);

        let (out, _) = render(&Exchange::new(500, "Internal Server Error"));
        assert_eq!(out, "Internal Server Error\n");
        let (out, _) = render(&Exchange::new(204, ""));
        assert_eq!(out, "✅ HTTP 204\n\n");
    }

    #[test]
    fn test_non_utf8_body_bytes_untouched() {
        let body: &[u8] = &[0x66, 0x6f, 0xff, 0xfe, 0x6f];
        let (out, err) = render_bytes(&Exchange::new(502, body.to_vec()));
        assert_eq!(err, "⚠️ HTTP 502\n");
        assert_eq!(out, [body, &b"\n"[..]].concat());
    }

    #[test]
    fn test_success_rendering() {
        let (out, err) = render(&Exchange::new(200, r#"{"reply":"ok"}"#));
        assert_eq!(out, "✅ HTTP 200\n{\n  \"reply\": \"ok\"\n}\n");
        assert_eq!(err, "");
    }

    #[test]
    fn test_failure_still_prints_body() {
        let (out, err) = render(&Exchange::new(404, r#"{"detail":"Loan not found"}"#));
        assert_eq!(err, "⚠️ HTTP 404\n");
        assert_eq!(out, "{\n  \"detail\": \"Loan not found\"\n}\n");
    }
}
