//=========================================================================
// Error Types
//=========================================================================
//
// One error enum per collaborator, aggregated by `AppError` for startup.
//
// Frame-loop policy (decided by the caller, not encoded here):
//   PlatformError  - startup: abort | per frame: log, continue
//   RenderError    - startup: abort | swap chain: log, skip/retry window
//   AudioError     - startup: abort | playback: log, continue
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::audio::SoundId;
use crate::core::window::WindowHandle;

//=== PlatformError =======================================================

/// Window subsystem failures.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The OS event loop could not be created.
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// An operation was attempted before `startup` (or after `shutdown`).
    #[error("platform is not started")]
    NotStarted,

    /// The handle does not name a live window.
    #[error("unknown window {0}")]
    UnknownWindow(WindowHandle),

    /// The window's display context is already handed out.
    #[error("display context of window {0} is already acquired")]
    ContextInUse(WindowHandle),
}

//=== RenderError =========================================================

/// Renderer failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer is not started")]
    NotStarted,

    #[error("graphics device creation failed: {0}")]
    DeviceCreation(String),

    /// Swap chains cannot be sized to an empty client area (minimized window).
    #[error("invalid swap chain size {width}x{height} for window {handle}")]
    InvalidDimensions {
        handle: WindowHandle,
        width: i32,
        height: i32,
    },

    #[error("window {0} has no swap chain")]
    SwapChainMissing(WindowHandle),

    #[error("failed to load '{path}': {reason}")]
    ResourceLoad { path: String, reason: String },
}

//=== AudioError ==========================================================

/// Audio subsystem failures.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio system is not started")]
    NotStarted,

    #[error("unknown sound {0:?}")]
    UnknownSound(SoundId),

    #[error("failed to load sound '{path}': {reason}")]
    Load { path: String, reason: String },
}

//=== AppError ============================================================

/// Errors that abort application startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("platform startup failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("renderer startup failed: {0}")]
    Renderer(#[from] RenderError),

    #[error("audio startup failed: {0}")]
    Audio(#[from] AudioError),

    #[error("application is already started")]
    AlreadyStarted,
}

//=========================================================================
// Unit Tests
//=========================================================================
