/// Destination for the user-facing progress lines roles emit.
pub trait ProgressSink: Send + Sync {
    fn line(&self, line: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn line(&self, line: &str) {
        println!("{}", line);
    }
}
