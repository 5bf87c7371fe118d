//! Text sinks: where an exported summary goes.

use std::io::Write;

use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

/// Receives exported text (the clipboard, stdout, a test buffer).
pub trait TextSink {
    /// Hands `text` to the sink.
    fn put_text(&mut self, text: &str) -> ClientResult<()>;

    /// Short name used in user feedback.
    fn name(&self) -> &'static str;
}

/// The system clipboard.
///
/// The clipboard handle is opened on first use and kept afterwards, so a
/// session without a copy never touches the display server.
#[derive(Default)]
pub struct ClipboardSink {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardSink {
    /// Creates a sink that opens the clipboard lazily.
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> ClientResult<&mut arboard::Clipboard> {
        if self.clipboard.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                ClientError::sink(format!("failed to access clipboard: {}", e))
            })?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| ClientError::sink("clipboard unavailable"))
    }
}

impl TextSink for ClipboardSink {
    fn put_text(&mut self, text: &str) -> ClientResult<()> {
        info!(chars = text.chars().count(), "copying summary to clipboard");
        let clipboard = self.clipboard()?;
        if let Err(e) = clipboard.set_text(text) {
            // Drop the handle so the next copy reconnects.
            self.clipboard = None;
            return Err(ClientError::sink(format!(
                "failed to copy to clipboard: {}",
                e
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "clipboard"
    }
}

/// Writes exported text to a writer, stdout by default.
pub struct WriterSink<W> {
    writer: W,
}

impl WriterSink<std::io::Stdout> {
    /// A sink printing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TextSink for WriterSink<W> {
    fn put_text(&mut self, text: &str) -> ClientResult<()> {
        debug!("writing summary to output");
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "output"
    }
}

/// Picks the sink for the current settings.
pub fn default_sink(clipboard_enabled: bool) -> Box<dyn TextSink> {
    if clipboard_enabled {
        Box::new(ClipboardSink::new())
    } else {
        Box::new(WriterSink::stdout())
    }
}

impl<S: TextSink + ?Sized> TextSink for Box<S> {
    fn put_text(&mut self, text: &str) -> ClientResult<()> {
        (**self).put_text(text)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_appends_newline() {
        let mut sink = WriterSink::new(Vec::new());
        sink.put_text("Meeting Cost Summary\n---").unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "Meeting Cost Summary\n---\n");
    }

    #[test]
    fn boxed_sink_delegates() {
        let mut sink: Box<dyn TextSink> = Box::new(WriterSink::new(Vec::new()));
        assert_eq!(sink.name(), "output");
        sink.put_text("x").unwrap();
    }

    #[test]
    fn default_sink_without_clipboard_is_output() {
        assert_eq!(default_sink(false).name(), "output");
        assert_eq!(default_sink(true).name(), "clipboard");
    }
}
