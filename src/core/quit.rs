//=========================================================================
// Quit Signal
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::info;

//=== QuitReason ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitReason {
    /// A window's close button (`OnCloseButtonClicked`).
    CloseButton,
    /// The `quit` event.
    Command,
    /// The game asked to leave (ESC on the attract screen).
    Game,
    /// The platform went away underneath the app.
    PlatformLost,
}

//=== QuitSignal ==========================================================

/// Shared "please stop" flag.
///
/// Clones share one flag, so event callbacks can hold a clone without
/// borrowing the app. The first reason recorded wins.
#[derive(Debug, Clone, Default)]
pub struct QuitSignal {
    reason: Rc<Cell<Option<QuitReason>>>,
}

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, reason: QuitReason) {
        if self.reason.get().is_none() {
            info!(target: "app", "Quit requested ({:?})", reason);
            self.reason.set(Some(reason));
        }
    }

    pub fn is_requested(&self) -> bool {
        self.reason.get().is_some()
    }

    pub fn reason(&self) -> Option<QuitReason> {
        self.reason.get()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let signal = QuitSignal::new();
        let handle = signal.clone();

        assert!(!signal.is_requested());
        handle.request(QuitReason::CloseButton);
        assert!(signal.is_requested());
    }

    #[test]
    fn first_reason_wins() {
        let signal = QuitSignal::new();
        signal.request(QuitReason::Game);
        signal.request(QuitReason::PlatformLost);
        assert_eq!(signal.reason(), Some(QuitReason::Game));
    }
}
