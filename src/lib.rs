#![allow(clippy::uninlined_format_args)]

//! # pagelens
//!
//! Distills live web pages into compact, addressable summaries for LLM
//! agents, over the WebDriver protocol.
//!
//! A distillation pass walks the full frame tree (nested and cross-origin
//! frames included), collects interactive and structurally informative
//! elements, filters them by visibility with a configurable viewport
//! buffer, and assigns each retained element a numeric identifier. The
//! identifier is written onto the live element as a marker attribute, so
//! a later action can be addressed as "click element 7" and resolved back
//! to the exact element the agent was shown.
//!
//! Identifiers are pass-scoped: they are valid only against the
//! [`DistillResult`](types::DistillResult) that produced them, and only
//! until the page navigates or a newer pass overwrites the markers.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Distill a page into numbered fragments
//! pagelens distill "https://example.com"
//!
//! # Same, but fall back to a plain outline if distillation fails
//! pagelens snapshot "https://example.com"
//!
//! # Act on what was shown (runs a fresh pass, then resolves the id)
//! pagelens click "https://example.com" --id 7
//! pagelens type "https://example.com" --id 3 "query text"
//!
//! # Fallback addressing by CSS selector (exactly one scheme per call)
//! pagelens click "https://example.com" --selector "button.submit"
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use pagelens::{Browser, BrowserType, DistillConfig, ElementResolver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let browser = Browser::new(BrowserType::Firefox, None, None, true).await?;
//! browser.goto("https://example.com").await?;
//!
//! let pass = pagelens::distill::distill(&browser, &DistillConfig::default()).await?;
//! println!("{}", pass.text);
//!
//! let resolver = ElementResolver::new(&browser, &pass);
//! let element = resolver.resolve(1).await?;
//! element.click().await?;
//! # Ok(())
//! # }
//! ```

/// WebDriver browser control: the adapter to the automation host
pub mod browser;

/// Distillation pipeline and identifier resolution
pub mod distill;

/// Error taxonomy with CLI exit codes
pub mod errors;

/// Snapshot orchestration: distillation with outline fallback
pub mod snapshot;

/// Data model for distillation results and configuration
pub mod types;

pub use browser::{Browser, BrowserType};
pub use distill::{ActionTarget, ElementResolver, FrameOffset, IdAllocator, MARKER_ATTR};
pub use errors::PagelensError;
pub use snapshot::{PageOutline, PageSnapshot};
pub use types::{
    BoundingBox, DistillConfig, DistillResult, ElementDescriptor, FramePath, OutputFormat,
    PassWarning, ViewportSize, WarningKind,
};
