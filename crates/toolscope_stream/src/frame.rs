//! Frame classification.

use toolscope_models::Message;

/// Shape discriminator for stream elements.
///
/// Consumers only look at frames through this trait, so frames they do not
/// recognise are skipped rather than rejected.
pub trait Frame {
    /// Returns the text if this frame is non-empty assistant content.
    fn assistant_content(&self) -> Option<&str>;

    /// Returns `true` if this frame requests a tool call.
    fn has_tool_calls(&self) -> bool {
        false
    }
}

impl Frame for Message {
    fn assistant_content(&self) -> Option<&str> {
        self.assistant_text()
    }

    fn has_tool_calls(&self) -> bool {
        Message::has_tool_calls(self)
    }
}

impl<T: Frame + ?Sized> Frame for Box<T> {
    fn assistant_content(&self) -> Option<&str> {
        (**self).assistant_content()
    }

    fn has_tool_calls(&self) -> bool {
        (**self).has_tool_calls()
    }
}
