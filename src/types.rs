use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1920x1080")
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1920x1080)");
        }

        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        Ok(ViewportSize { width, height })
    }
}

/// Tuning knobs for one distillation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistillConfig {
    /// Pixels of tolerance above and below the visible viewport
    pub viewport_buffer: f64,
    /// Maximum length of an extracted label, in characters
    pub max_text_length: usize,
    /// Keep elements that are hidden or outside the buffered viewport
    pub include_hidden: bool,
    /// Minimum element width in pixels
    pub min_width: f64,
    /// Minimum element height in pixels
    pub min_height: f64,
    /// Per-frame evaluation timeout in milliseconds
    pub frame_timeout_ms: u64,
}

impl Default for DistillConfig {
    fn default() -> Self {
        DistillConfig {
            viewport_buffer: 1000.0,
            max_text_length: 100,
            include_hidden: false,
            min_width: 1.0,
            min_height: 1.0,
            frame_timeout_ms: 5000,
        }
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Location of a frame in the frame tree, as the chain of child indexes
/// from the main frame. The main frame is the empty path.
///
/// Paths follow WebDriver frame-index order, which is document order of
/// the embedding elements within each parent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FramePath(pub Vec<u16>);

impl FramePath {
    pub fn root() -> Self {
        FramePath(Vec::new())
    }

    pub fn child(&self, index: u16) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        FramePath(path)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Nesting depth below the main frame
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FramePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "main");
        }
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// One row of the distilled output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Identifier assigned during this pass, unique across all frames
    pub id: u32,
    /// Lowercase tag name
    pub tag: String,
    /// Explicit ARIA role, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Input type hint (e.g. "text", "submit")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Form name hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extracted label, whitespace-collapsed and truncated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Bounding box in top-level viewport coordinates
    pub bounds: BoundingBox,
    /// Owning frame
    pub frame: FramePath,
}

/// Kind of non-fatal degradation recorded during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A frame detached, threw, or timed out and was skipped
    FrameSkipped,
    /// An ancestor boundary element could not be inspected; the frame's
    /// cumulative offset (and the absolute bounds derived from it) are
    /// approximate
    OffsetApproximate,
    /// Frame nesting exceeded the maximum depth; descent was truncated
    DepthTruncated,
}

/// Non-fatal warning attached to a distillation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassWarning {
    pub frame: FramePath,
    pub kind: WarningKind,
    pub message: String,
}

/// Consolidated output of one distillation pass.
///
/// Identifiers in `elements` are valid only against this result and only
/// until the page navigates, the element is removed, or a newer pass
/// overwrites the markers. Each pass restarts identifiers at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistillResult {
    /// Retained elements in frame-traversal order, then document order
    pub elements: Vec<ElementDescriptor>,
    /// Compact textual rendering, one fragment per element
    pub text: String,
    /// Candidates discovered across all processed frames
    pub discovered: usize,
    /// Candidates retained after filtering (equals `elements.len()`)
    pub retained: usize,
    /// Non-fatal degradations observed during the pass
    pub warnings: Vec<PassWarning>,
}

/// Per-frame scroll and viewport state captured by the collect script
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEnv {
    pub scroll_top: f64,
    pub viewport_height: f64,
}

/// Computed style subset the visibility filter decides on
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CandidateStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
}

/// Raw candidate as reported by the in-frame collect script.
///
/// `seq` is a pass-scoped ordinal stamped on the live element so that the
/// mark script can find it again; it never leaves the pass.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCandidate {
    pub seq: u32,
    pub tag: String,
    pub role: Option<String>,
    pub input_type: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub text: String,
    pub aria_label: Option<String>,
    pub placeholder: Option<String>,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub value: Option<String>,
    pub rect: BoundingBox,
    pub style: CandidateStyle,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
