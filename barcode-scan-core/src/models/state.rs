/// Scan session state machine.
///
/// State transitions:
/// ```text
/// start → success → preview ⟲ (decode failed)
///            ↑         │
///            └─────────┘ (decode succeeded)
///
/// any → done (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// A preview frame request is outstanding.
    Preview,
    /// Ready to arm the next preview request.
    Success,
    /// Session is shutting down; nothing more is requested.
    Done,
}

impl ScanState {
    pub fn is_previewing(&self) -> bool {
        matches!(self, Self::Preview)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
