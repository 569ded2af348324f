use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::browser::Browser;
use crate::distill::offset::FrameOffset;
use crate::errors::PagelensError;
use crate::types::{BoundingBox, FramePath, PassWarning, WarningKind};

/// Maximum frame nesting depth below the main frame. Deeper frames are
/// not descended into; the truncation is reported as a warning, not a
/// failure.
pub const MAX_FRAME_DEPTH: usize = 8;

/// One frame discovered during traversal. Valid for the duration of the
/// pass only; the underlying frame may detach at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode {
    /// Child-index chain from the main frame
    pub path: FramePath,
    /// Cumulative offset of this frame's origin in top-level viewport
    /// coordinates
    pub offset: FrameOffset,
    /// True if any ancestor boundary element could not be inspected, in
    /// which case `offset` undercounts that link's contribution
    pub offset_approximate: bool,
}

impl FrameNode {
    pub fn main() -> Self {
        FrameNode {
            path: FramePath::root(),
            offset: FrameOffset::ZERO,
            offset_approximate: false,
        }
    }
}

/// Boundary-element geometry reported by the child probe script. A null
/// entry means the embedding element threw on inspection.
#[derive(Debug, Deserialize)]
struct ChildProbe {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Reads the embedding elements of all child frames of the current frame.
/// Runs in the parent's context, so cross-origin child documents are not
/// touched; only the boundary elements themselves are inspected.
const CHILD_PROBE_SCRIPT: &str = r#"
    return (function() {
        const out = [];
        document.querySelectorAll('iframe, frame').forEach(function(el) {
            try {
                const rect = el.getBoundingClientRect();
                out.push({
                    x: rect.x + (el.clientLeft || 0),
                    y: rect.y + (el.clientTop || 0),
                    width: rect.width,
                    height: rect.height
                });
            } catch (e) {
                out.push(null);
            }
        });
        return out;
    })();
"#;

/// Derive child frame nodes from a parent and its probe results. A
/// missing probe contributes zero offset and records an
/// `OffsetApproximate` warning for that branch.
fn child_nodes(
    parent: &FrameNode,
    probes: Vec<Option<BoundingBox>>,
) -> (Vec<FrameNode>, Vec<PassWarning>) {
    let mut children = Vec::with_capacity(probes.len());
    let mut warnings = Vec::new();

    for (index, probe) in probes.into_iter().enumerate() {
        let path = parent.path.child(index as u16);
        let (offset, missing) = parent.offset.compose(probe.as_ref());
        if missing {
            warnings.push(PassWarning {
                frame: path.clone(),
                kind: WarningKind::OffsetApproximate,
                message: format!(
                    "Boundary element of frame {} could not be inspected; absolute bounds in this branch are approximate",
                    path
                ),
            });
        }
        children.push(FrameNode {
            path,
            offset,
            offset_approximate: parent.offset_approximate || missing,
        });
    }

    (children, warnings)
}

/// Depth-bound decision for one node: a node at the maximum depth is
/// kept and evaluated, but not descended into, and the truncation is
/// recorded as a warning.
fn depth_truncation(node: &FrameNode) -> Option<PassWarning> {
    if node.path.depth() < MAX_FRAME_DEPTH {
        return None;
    }
    Some(PassWarning {
        frame: node.path.clone(),
        kind: WarningKind::DepthTruncated,
        message: format!(
            "Frame {} is at the maximum nesting depth ({}); frames below it were not enumerated",
            node.path, MAX_FRAME_DEPTH
        ),
    })
}

/// A failure on the main document means zero frames can be processed.
/// Callers branch on the no-frames condition to engage the fallback
/// capture, so it must carry that type rather than a generic error.
fn main_frame_failure(err: anyhow::Error) -> anyhow::Error {
    PagelensError::NoFramesProcessed(format!("main document enumeration failed: {}", err)).into()
}

/// Enumerate the frame tree depth-first: the main frame, then each child
/// subtree in frame-index order.
///
/// Per-frame probing is isolated: a frame whose context cannot be entered
/// or whose probe throws or times out is recorded as skipped and its
/// subtree dropped, while enumeration continues with its siblings. Only a
/// failure on the main frame itself propagates, as the no-frames
/// condition.
pub async fn enumerate_frames(
    browser: &Browser,
    probe_timeout: Duration,
) -> Result<(Vec<FrameNode>, Vec<PassWarning>)> {
    let mut frames = Vec::new();
    let mut warnings = Vec::new();
    // Depth-first with an explicit stack; pushed in reverse so siblings
    // pop in frame-index order.
    let mut stack = vec![FrameNode::main()];

    while let Some(node) = stack.pop() {
        let is_main = node.path.is_root();

        if let Some(warning) = depth_truncation(&node) {
            warnings.push(warning);
            frames.push(node);
            continue;
        }

        let probes = match tokio::time::timeout(probe_timeout, probe_children(browser, &node))
            .await
        {
            Ok(Ok(probes)) => probes,
            Ok(Err(e)) if is_main => return Err(main_frame_failure(e)),
            Err(_) if is_main => {
                return Err(main_frame_failure(anyhow::anyhow!(
                    "child probe timed out after {}ms",
                    probe_timeout.as_millis()
                )));
            }
            Ok(Err(e)) => {
                warn!("Skipping frame {}: {:#}", node.path, e);
                warnings.push(PassWarning {
                    frame: node.path.clone(),
                    kind: WarningKind::FrameSkipped,
                    message: format!("Frame {} could not be enumerated: {}", node.path, e),
                });
                continue;
            }
            Err(_) => {
                warn!(
                    "Frame {} probe timed out after {}ms",
                    node.path,
                    probe_timeout.as_millis()
                );
                warnings.push(PassWarning {
                    frame: node.path.clone(),
                    kind: WarningKind::FrameSkipped,
                    message: format!(
                        "Frame {} probe timed out after {}ms",
                        node.path,
                        probe_timeout.as_millis()
                    ),
                });
                continue;
            }
        };

        debug!("Frame {} has {} child frame(s)", node.path, probes.len());

        let (children, child_warnings) = child_nodes(&node, probes);
        warnings.extend(child_warnings);
        frames.push(node);
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }

    Ok((frames, warnings))
}

async fn probe_children(browser: &Browser, node: &FrameNode) -> Result<Vec<Option<BoundingBox>>> {
    browser.switch_to_frame(&node.path).await?;
    let raw = browser.execute(CHILD_PROBE_SCRIPT, vec![]).await?;
    let probes: Vec<Option<ChildProbe>> =
        serde_json::from_value(raw).context("Failed to parse frame probe result")?;
    Ok(probes
        .into_iter()
        .map(|p| {
            p.map(|probe| BoundingBox {
                x: probe.x,
                y: probe.y,
                width: probe.width,
                height: probe.height,
            })
        })
        .collect())
}

#[cfg(test)]
#[path = "frames_test.rs"]
mod frames_test;
