//! Line filtering for fetched whoami pages.
//!
//! A remote body is reduced to the lines that identify the responding host:
//! its hostname and any non-loopback IP addresses.

const INDENT: &str = "    ";

/// Returns true if `line` should appear in the rendered report.
///
/// The `"IP"` rule is a plain substring check, so a line such as
/// `"ZIP code 1.5"` also matches.
pub fn expected_line(line: &str) -> bool {
    if line.contains("Hostname") {
        return true;
    }

    line.contains("IP") && line.contains('.') && !line.contains("127.0.0.")
}

/// Prefixes a line with the report indentation.
pub fn indent_line(line: &str) -> String {
    format!("{INDENT}{line}")
}

/// Keeps the interesting lines of `body`, indented, in their original order.
pub fn parse_content(body: &str) -> String {
    body.split('\n')
        .filter(|line| expected_line(line))
        .map(indent_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_line_hostname() {
        assert!(expected_line("Hostname: x"));
        assert!(expected_line("Hostname"));
    }

    #[test]
    fn test_expected_line_ip() {
        assert!(expected_line("IP: 10.0.0.5"));
        assert!(expected_line("RemoteAddr IP: 172.17.0.1:5678"));
        assert!(!expected_line("IP: 127.0.0.1"));
        assert!(!expected_line("IP: ::1"));
    }

    #[test]
    fn test_expected_line_rejects_everything_else() {
        assert!(!expected_line("nothing relevant"));
        assert!(!expected_line(""));
        assert!(!expected_line("ip: 10.0.0.5"));
        assert!(!expected_line("GET / HTTP/1.1"));
    }

    #[test]
    fn test_expected_line_hostname_wins_over_loopback() {
        assert!(expected_line("Hostname IP 127.0.0.1"));
    }

    #[test]
    fn test_expected_line_substring_heuristic() {
        assert!(expected_line("ZIP code 1.5"));
    }

    #[test]
    fn test_parse_content_keeps_order() {
        let parsed = parse_content("Hostname: a\nFoo\nIP: 1.2.3.4\n127.0.0.1");
        assert_eq!(parsed, "    Hostname: a\n    IP: 1.2.3.4");
    }

    #[test]
    fn test_parse_content_empty() {
        assert_eq!(parse_content(""), "");
        assert_eq!(parse_content("\n\n"), "");
        assert_eq!(parse_content("Foo\nBar"), "");
    }

    #[test]
    fn test_parse_content_whoami_page() {
        let body = "Hostname: srv1\nIP: 127.0.0.1\nIP: ::1\nIP: 10.0.0.9\nRemoteAddr: 10.0.0.1:41234\nGET / HTTP/1.1\n";
        assert_eq!(parse_content(body), "    Hostname: srv1\n    IP: 10.0.0.9");
    }

    #[test]
    fn test_parse_content_reparse_keeps_lines() {
        let once = parse_content("Hostname: srv1\nIP Address: 10.0.0.9\nLocal: 127.0.0.1");
        let twice = parse_content(&once);

        assert_eq!(once.lines().count(), 2);
        assert_eq!(twice.lines().count(), 2);
        assert!(twice.lines().all(|line| line.starts_with("        ")));
    }

    #[test]
    fn test_parse_content_keeps_carriage_return() {
        assert_eq!(parse_content("Hostname: a\r\nFoo\r\n"), "    Hostname: a\r");
    }
}
