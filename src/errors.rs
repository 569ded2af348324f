use crate::types::FramePath;

/// Custom error type that includes exit codes.
///
/// Frame-level degradations (a skipped frame, an approximate offset) are
/// not errors; they are attached to the result as warnings. This enum
/// carries only the conditions a caller must branch on.
#[derive(Debug, thiserror::Error)]
pub enum PagelensError {
    /// An identifier from a prior pass no longer resolves to a live
    /// element. The caller should request a fresh distillation rather
    /// than retry (exit code 2)
    #[error("Element {id} not found in frame {frame}: {reason}")]
    ElementNotFound {
        id: u32,
        frame: FramePath,
        reason: String,
    },
    /// An action supplied both an identifier and a selector, or neither
    /// (exit code 3)
    #[error("Supply exactly one of --id or --selector ({supplied} supplied)")]
    AmbiguousAddressing { supplied: usize },
    /// WebDriver connection failed (exit code 4)
    #[error("WebDriver connection failed: {0}")]
    WebDriverFailed(String),
    /// Operation timeout (exit code 5)
    #[error("Operation timed out: {0}")]
    Timeout(String),
    /// Every frame of the page failed evaluation; the caller should fall
    /// back to the outline capture (exit code 6)
    #[error("No frames could be processed: {0}")]
    NoFramesProcessed(String),
    /// Generic error (exit code 1)
    #[error("{0}")]
    Other(anyhow::Error),
}

impl PagelensError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PagelensError::ElementNotFound { .. } => 2,
            PagelensError::AmbiguousAddressing { .. } => 3,
            PagelensError::WebDriverFailed(_) => 4,
            PagelensError::Timeout(_) => 5,
            PagelensError::NoFramesProcessed(_) => 6,
            PagelensError::Other(_) => 1,
        }
    }
}

impl From<anyhow::Error> for PagelensError {
    fn from(err: anyhow::Error) -> Self {
        // Typed errors raised inside the library pass through unchanged
        match err.downcast::<PagelensError>() {
            Ok(e) => e,
            Err(err) => {
                let msg = err.to_string();
                if msg.contains("Failed to connect to WebDriver")
                    || msg.contains("WebDriver")
                    || msg.contains("geckodriver")
                    || msg.contains("chromedriver")
                {
                    PagelensError::WebDriverFailed(msg)
                } else if msg.contains("timeout") || msg.contains("timed out") {
                    PagelensError::Timeout(msg)
                } else {
                    PagelensError::Other(err)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
