use std::fmt;

/// Listen target resolved from the raw configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenTarget {
    /// Numeric TCP port. Zero asks the OS for an ephemeral port.
    Port(u64),
    /// Opaque Unix socket / named pipe path.
    Pipe(String),
    /// Parsed as an integer but negative.
    Invalid,
}

/// Resolve a configuration string into a listen target.
///
/// Values that parse as a non-negative base-10 integer are ports. Values
/// that do not parse as an integer at all are treated as an opaque socket
/// path. Negative integers are invalid, but are deliberately not rejected
/// here: the bind step fails on them with an unclassified error.
pub fn resolve(raw: &str) -> ListenTarget {
    match raw.parse::<i64>() {
        Ok(port) if port >= 0 => ListenTarget::Port(port as u64),
        Ok(_) => ListenTarget::Invalid,
        Err(_) => ListenTarget::Pipe(raw.to_string()),
    }
}

impl fmt::Display for ListenTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenTarget::Port(port) => write!(f, "port {}", port),
            ListenTarget::Pipe(path) => write!(f, "socket {}", path),
            ListenTarget::Invalid => f.write_str("invalid target"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_value_resolves_to_port() {
        assert_eq!(resolve("5051"), ListenTarget::Port(5051));
        assert_eq!(resolve("0"), ListenTarget::Port(0));
        assert_eq!(resolve("65536"), ListenTarget::Port(65536));
    }

    #[test]
    fn non_numeric_value_resolves_to_pipe() {
        assert_eq!(
            resolve("/tmp/app.sock"),
            ListenTarget::Pipe("/tmp/app.sock".to_string())
        );
        assert_eq!(resolve(""), ListenTarget::Pipe(String::new()));
        assert_eq!(
            resolve("8080 "),
            ListenTarget::Pipe("8080 ".to_string())
        );
    }

    #[test]
    fn negative_value_resolves_to_invalid() {
        assert_eq!(resolve("-3"), ListenTarget::Invalid);
        assert_eq!(resolve("-1"), ListenTarget::Invalid);
    }

    #[test]
    fn display_names_the_target() {
        assert_eq!(resolve("5051").to_string(), "port 5051");
        assert_eq!(resolve("/run/roost.sock").to_string(), "socket /run/roost.sock");
        assert_eq!(resolve("-3").to_string(), "invalid target");
    }
}
