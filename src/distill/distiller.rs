use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::browser::Browser;
use crate::distill::frames::{self, FrameNode};
use crate::distill::ids::IdAllocator;
use crate::distill::visibility;
use crate::errors::PagelensError;
use crate::types::{
    DistillConfig, DistillResult, ElementDescriptor, FrameEnv, PassWarning, RawCandidate,
    WarningKind,
};

/// Marker attribute written to every retained element so the resolver can
/// find it again by identifier. Pass-scoped: a fresh pass overwrites the
/// markers of the previous one, and nothing survives navigation.
pub const MARKER_ATTR: &str = "data-pagelens-id";

/// Discovers candidate elements in the current frame: interactive or
/// structurally informative elements (links with a destination, buttons,
/// form controls, explicit ARIA roles, click handlers, headings, labels,
/// accessible names, tooltips). Clears markers left by an earlier pass,
/// stamps each candidate with its ordinal, and reports geometry, computed
/// style, and label sources for each.
const COLLECT_SCRIPT: &str = r#"
    return (function() {
        const MARKER = 'data-pagelens-id';
        const SEQ = 'data-pagelens-seq';

        document.querySelectorAll('[' + MARKER + ']').forEach(function(el) {
            el.removeAttribute(MARKER);
        });
        document.querySelectorAll('[' + SEQ + ']').forEach(function(el) {
            el.removeAttribute(SEQ);
        });

        const selector = [
            'a[href]', 'button', 'input', 'select', 'textarea',
            '[role]', '[onclick]',
            'h1', 'h2', 'h3', 'h4', 'h5', 'h6',
            'label', '[aria-label]', '[title]'
        ].join(', ');

        const candidates = [];
        let seq = 0;
        document.querySelectorAll(selector).forEach(function(el) {
            const rect = el.getBoundingClientRect();
            const styles = window.getComputedStyle(el);
            const opacity = parseFloat(styles.opacity);

            el.setAttribute(SEQ, String(seq));
            candidates.push({
                seq: seq,
                tag: el.tagName.toLowerCase(),
                role: el.getAttribute('role'),
                inputType: el.getAttribute('type'),
                name: el.getAttribute('name'),
                text: el.innerText || '',
                ariaLabel: el.getAttribute('aria-label'),
                placeholder: el.getAttribute('placeholder'),
                title: el.getAttribute('title'),
                alt: el.getAttribute('alt'),
                value: typeof el.value === 'string' ? el.value : null,
                rect: {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height
                },
                style: {
                    display: styles.display,
                    visibility: styles.visibility,
                    opacity: isNaN(opacity) ? 1 : opacity
                }
            });
            seq++;
        });

        return {
            env: {
                scrollTop: window.scrollY || 0,
                viewportHeight: window.innerHeight || 0
            },
            candidates: candidates
        };
    })();
"#;

/// Writes the marker attribute onto retained candidates (by their pass
/// ordinal) and strips all ordinals from the frame. Takes an array of
/// `[seq, id]` pairs.
const MARK_SCRIPT: &str = r#"
    return (function(assignments) {
        const MARKER = 'data-pagelens-id';
        const SEQ = 'data-pagelens-seq';
        let marked = 0;
        for (const pair of assignments) {
            const el = document.querySelector('[' + SEQ + '="' + pair[0] + '"]');
            if (el) {
                el.setAttribute(MARKER, String(pair[1]));
                marked++;
            }
        }
        document.querySelectorAll('[' + SEQ + ']').forEach(function(el) {
            el.removeAttribute(SEQ);
        });
        return marked;
    })(arguments[0]);
"#;

#[derive(Debug, Deserialize)]
struct CollectedFrame {
    env: FrameEnv,
    candidates: Vec<RawCandidate>,
}

/// Outcome of sifting one frame's candidates: the retained descriptors,
/// their textual fragments, the marker assignments still to be written
/// back, and the raw discovery count.
#[derive(Debug)]
pub struct FramePartial {
    pub descriptors: Vec<ElementDescriptor>,
    pub fragments: Vec<String>,
    /// `(seq, id)` pairs for the mark script
    pub assignments: Vec<(u32, u32)>,
    pub discovered: usize,
}

/// Pure core of per-frame processing: apply the visibility filter,
/// allocate identifiers for retained candidates, and build descriptors
/// and fragments. The allocator is taken by value and returned updated so
/// that identifier order across frames is a function of frame order
/// alone.
pub fn sift_candidates(
    frame: &FrameNode,
    env: &FrameEnv,
    candidates: Vec<RawCandidate>,
    config: &DistillConfig,
    mut ids: IdAllocator,
) -> (FramePartial, IdAllocator) {
    let discovered = candidates.len();
    let mut descriptors = Vec::new();
    let mut fragments = Vec::new();
    let mut assignments = Vec::new();

    for candidate in candidates {
        if !visibility::should_include(
            &candidate.rect,
            &candidate.style,
            env,
            frame.offset.y,
            config,
        ) {
            continue;
        }

        let (id, next) = ids.allocate();
        ids = next;

        let descriptor = ElementDescriptor {
            id,
            tag: candidate.tag.clone(),
            role: candidate.role.clone(),
            input_type: candidate.input_type.clone(),
            name: candidate.name.clone(),
            label: extract_label(&candidate, config.max_text_length),
            bounds: frame.offset.translate(&candidate.rect),
            frame: frame.path.clone(),
        };

        fragments.push(render_fragment(&descriptor));
        assignments.push((candidate.seq, id));
        descriptors.push(descriptor);
    }

    (
        FramePartial {
            descriptors,
            fragments,
            assignments,
            discovered,
        },
        ids,
    )
}

/// Extract a label for a candidate: rendered text, accessible name,
/// placeholder, tooltip, alt text, then form value, first non-empty wins.
/// Internal whitespace is collapsed and the result truncated to
/// `max_length` characters.
pub fn extract_label(candidate: &RawCandidate, max_length: usize) -> Option<String> {
    let sources = [
        Some(candidate.text.as_str()),
        candidate.aria_label.as_deref(),
        candidate.placeholder.as_deref(),
        candidate.title.as_deref(),
        candidate.alt.as_deref(),
        candidate.value.as_deref(),
    ];

    for source in sources.into_iter().flatten() {
        let collapsed = collapse_whitespace(source);
        if !collapsed.is_empty() {
            return Some(truncate_chars(&collapsed, max_length));
        }
    }
    None
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Render one element as a compact tag-like fragment, e.g.
/// `<button id=2 type=submit name=login>Sign in</button>` or, with no
/// label, `<input id=3 type=text name=q/>`.
pub fn render_fragment(descriptor: &ElementDescriptor) -> String {
    let mut fragment = format!("<{} id={}", descriptor.tag, descriptor.id);
    if let Some(role) = &descriptor.role {
        fragment.push_str(&format!(" role={}", role));
    }
    if let Some(input_type) = &descriptor.input_type {
        fragment.push_str(&format!(" type={}", input_type));
    }
    if let Some(name) = &descriptor.name {
        fragment.push_str(&format!(" name={}", name));
    }
    match &descriptor.label {
        Some(label) => fragment.push_str(&format!(">{}</{}>", label, descriptor.tag)),
        None => fragment.push_str("/>"),
    }
    fragment
}

/// Run one distillation pass over the current page.
///
/// Enumerates the frame tree, evaluates each frame in enumeration order
/// under a per-frame timeout, and concatenates the per-frame results.
/// Frame failures are skips with warnings; the pass fails only when no
/// frame at all could be processed.
pub async fn distill(browser: &Browser, config: &DistillConfig) -> Result<DistillResult> {
    let timeout = std::time::Duration::from_millis(config.frame_timeout_ms);
    let (frame_list, mut warnings) = frames::enumerate_frames(browser, timeout).await?;
    info!("Enumerated {} frame(s)", frame_list.len());

    let mut ids = IdAllocator::new();
    let mut elements = Vec::new();
    let mut fragments = Vec::new();
    let mut discovered = 0usize;
    let mut processed = 0usize;

    for frame in &frame_list {
        match tokio::time::timeout(timeout, evaluate_frame(browser, frame, config, ids)).await {
            Ok(Ok((partial, next_ids))) => {
                debug!(
                    "Frame {}: {} discovered, {} retained",
                    frame.path,
                    partial.discovered,
                    partial.descriptors.len()
                );
                ids = next_ids;
                discovered += partial.discovered;
                elements.extend(partial.descriptors);
                fragments.extend(partial.fragments);
                processed += 1;
            }
            Ok(Err(e)) => {
                warn!("Skipping frame {}: {:#}", frame.path, e);
                warnings.push(PassWarning {
                    frame: frame.path.clone(),
                    kind: WarningKind::FrameSkipped,
                    message: format!("Frame {} failed evaluation: {}", frame.path, e),
                });
            }
            Err(_) => {
                warn!("Frame {} timed out after {:?}", frame.path, timeout);
                warnings.push(PassWarning {
                    frame: frame.path.clone(),
                    kind: WarningKind::FrameSkipped,
                    message: format!(
                        "Frame {} timed out after {}ms",
                        frame.path, config.frame_timeout_ms
                    ),
                });
            }
        }
    }

    // Leave the session pointed at the main frame for whatever follows.
    if let Err(e) = browser.switch_to_top().await {
        debug!("Could not return to top-level frame: {:#}", e);
    }

    if processed == 0 {
        return Err(PagelensError::NoFramesProcessed(format!(
            "all {} frame(s) failed evaluation",
            frame_list.len()
        ))
        .into());
    }

    let retained = elements.len();
    info!(
        "Distillation complete: {} discovered, {} retained, {} warning(s)",
        discovered,
        retained,
        warnings.len()
    );

    Ok(DistillResult {
        text: fragments.join("\n"),
        elements,
        discovered,
        retained,
        warnings,
    })
}

async fn evaluate_frame(
    browser: &Browser,
    frame: &FrameNode,
    config: &DistillConfig,
    ids: IdAllocator,
) -> Result<(FramePartial, IdAllocator)> {
    browser.switch_to_frame(&frame.path).await?;

    let raw = browser.execute(COLLECT_SCRIPT, vec![]).await?;
    let collected: CollectedFrame =
        serde_json::from_value(raw).context("Failed to parse collected candidates")?;

    let (partial, ids) = sift_candidates(frame, &collected.env, collected.candidates, config, ids);

    // Always run the mark script: even with nothing retained it strips
    // the ordinals stamped during collection.
    browser
        .execute(MARK_SCRIPT, vec![json!(&partial.assignments)])
        .await
        .context("Failed to write element markers")?;

    Ok((partial, ids))
}

#[cfg(test)]
#[path = "distiller_test.rs"]
mod distiller_test;
