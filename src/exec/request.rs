// src/exec/request.rs

/// One command invocation: the configured base command plus the message
/// payload as its final argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    command: Vec<String>,
    argument: String,
}

impl InvocationRequest {
    pub fn new(command: Vec<String>, argument: impl Into<String>) -> Self {
        Self {
            command,
            argument: argument.into(),
        }
    }

    /// Executable to launch (first command token), if any.
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Fixed arguments between the program and the payload.
    pub fn fixed_args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    /// Full argument vector in launch order. Nothing else is injected.
    pub fn argv(&self) -> Vec<&str> {
        self.command
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.argument.as_str()))
            .collect()
    }

    /// Base command joined with spaces, for log lines.
    pub fn display_command(&self) -> String {
        self.command.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_appended_last() {
        let req = InvocationRequest::new(vec!["handler.sh".to_string()], "abc123");
        assert_eq!(req.argv(), vec!["handler.sh", "abc123"]);
        assert_eq!(req.program(), Some("handler.sh"));
        assert!(req.fixed_args().is_empty());
    }

    #[test]
    fn fixed_args_keep_their_order() {
        let req = InvocationRequest::new(
            vec!["python".into(), "-m".into(), "handler".into()],
            "s3://bucket/key",
        );
        assert_eq!(req.argv(), vec!["python", "-m", "handler", "s3://bucket/key"]);
        assert_eq!(req.fixed_args(), ["-m".to_string(), "handler".to_string()]);
        assert_eq!(req.display_command(), "python -m handler");
    }

    #[test]
    fn empty_command_has_no_program() {
        let req = InvocationRequest::new(Vec::new(), "x");
        assert_eq!(req.program(), None);
        assert_eq!(req.argv(), vec!["x"]);
    }
}
