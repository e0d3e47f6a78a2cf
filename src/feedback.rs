/// One-shot feedback pulse on each scored second. Fire-and-forget:
/// implementations must not fail and must not block the event loop.
pub trait FeedbackSink {
    fn pulse(&mut self);
}

/// Swallows pulses. Useful when no feedback channel exists.
#[derive(Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn pulse(&mut self) {}
}

/// Terminal bell, the closest thing a shell has to a haptic tap.
#[derive(Debug, Default)]
pub struct TerminalFeedback;

impl FeedbackSink for TerminalFeedback {
    fn pulse(&mut self) {
        use std::io::Write;
        let mut out = std::io::stdout();
        // Failures ignored by contract.
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}
