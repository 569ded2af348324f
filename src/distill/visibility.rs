use crate::types::{BoundingBox, CandidateStyle, DistillConfig, FrameEnv};

/// Decide whether a candidate element is eligible for inclusion.
///
/// Pure function of its inputs; `rect` is the element's bounding box in
/// its own frame, `offset_y` the frame's cumulative vertical offset.
///
/// Rules, in order:
/// 1. Reject anything smaller than the configured minimum size. This
///    applies even when `include_hidden` is set.
/// 2. Unless `include_hidden`: reject `display: none`,
///    `visibility: hidden`, and zero computed opacity.
/// 3. Unless `include_hidden`: reject elements whose absolute vertical
///    range misses `[scrollTop - buffer, scrollTop + viewportHeight +
///    buffer]`. Both boundaries are inclusive.
pub fn should_include(
    rect: &BoundingBox,
    style: &CandidateStyle,
    env: &FrameEnv,
    offset_y: f64,
    config: &DistillConfig,
) -> bool {
    if rect.width < config.min_width || rect.height < config.min_height {
        return false;
    }

    if config.include_hidden {
        return true;
    }

    if style.display == "none" || style.visibility == "hidden" || style.opacity == 0.0 {
        return false;
    }

    let top = rect.y + env.scroll_top + offset_y;
    let bottom = top + rect.height;
    let low = env.scroll_top - config.viewport_buffer;
    let high = env.scroll_top + env.viewport_height + config.viewport_buffer;

    bottom >= low && top <= high
}

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;
