// Unit tests for the distiller's pure core

use super::*;
use crate::distill::frames::FrameNode;
use crate::distill::offset::FrameOffset;
use crate::types::{BoundingBox, CandidateStyle, FramePath};
use pretty_assertions::assert_eq;

fn candidate(seq: u32, tag: &str, text: &str) -> RawCandidate {
    RawCandidate {
        seq,
        tag: tag.to_string(),
        role: None,
        input_type: None,
        name: None,
        text: text.to_string(),
        aria_label: None,
        placeholder: None,
        title: None,
        alt: None,
        value: None,
        rect: BoundingBox {
            x: 10.0,
            y: 10.0 + seq as f64 * 40.0,
            width: 100.0,
            height: 30.0,
        },
        style: CandidateStyle {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
        },
    }
}

fn env() -> FrameEnv {
    FrameEnv {
        scroll_top: 0.0,
        viewport_height: 800.0,
    }
}

#[test]
fn test_label_priority_prefers_rendered_text() {
    let mut c = candidate(0, "button", "Click me");
    c.aria_label = Some("accessible".to_string());
    assert_eq!(extract_label(&c, 100), Some("Click me".to_string()));
}

#[test]
fn test_label_falls_through_empty_sources() {
    let mut c = candidate(0, "input", "");
    c.aria_label = Some("   ".to_string());
    c.placeholder = Some("Search the docs".to_string());
    c.value = Some("stale".to_string());
    assert_eq!(extract_label(&c, 100), Some("Search the docs".to_string()));
}

#[test]
fn test_label_uses_value_as_last_resort() {
    let mut c = candidate(0, "input", "");
    c.value = Some("typed text".to_string());
    assert_eq!(extract_label(&c, 100), Some("typed text".to_string()));
}

#[test]
fn test_label_none_when_all_sources_empty() {
    let c = candidate(0, "input", "");
    assert_eq!(extract_label(&c, 100), None);
}

#[test]
fn test_label_collapses_internal_whitespace() {
    let c = candidate(0, "a", "  Sign\n\t  in   now ");
    assert_eq!(extract_label(&c, 100), Some("Sign in now".to_string()));
}

#[test]
fn test_label_truncates_to_max_chars() {
    let c = candidate(0, "h1", "abcdefghij");
    assert_eq!(extract_label(&c, 4), Some("abcd".to_string()));
    // Truncation counts characters, not bytes.
    let c = candidate(0, "h1", "héllo wörld");
    assert_eq!(extract_label(&c, 5), Some("héllo".to_string()));
}

#[test]
fn test_render_fragment_with_label() {
    let descriptor = ElementDescriptor {
        id: 2,
        tag: "button".to_string(),
        role: None,
        input_type: Some("submit".to_string()),
        name: Some("login".to_string()),
        label: Some("Sign in".to_string()),
        bounds: BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 80.0,
            height: 30.0,
        },
        frame: FramePath::root(),
    };
    assert_eq!(
        render_fragment(&descriptor),
        "<button id=2 type=submit name=login>Sign in</button>"
    );
}

#[test]
fn test_render_fragment_self_closing_without_label() {
    let descriptor = ElementDescriptor {
        id: 3,
        tag: "input".to_string(),
        role: Some("searchbox".to_string()),
        input_type: Some("text".to_string()),
        name: None,
        label: None,
        bounds: BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 80.0,
            height: 30.0,
        },
        frame: FramePath::root(),
    };
    assert_eq!(
        render_fragment(&descriptor),
        "<input id=3 role=searchbox type=text/>"
    );
}

#[test]
fn test_sift_hidden_button_is_discovered_but_not_retained() {
    let visible = candidate(0, "button", "Visible");
    let mut hidden = candidate(1, "button", "Hidden");
    hidden.style.display = "none".to_string();

    let (partial, _) = sift_candidates(
        &FrameNode::main(),
        &env(),
        vec![visible, hidden],
        &DistillConfig::default(),
        IdAllocator::new(),
    );

    assert_eq!(partial.discovered, 2);
    assert_eq!(partial.descriptors.len(), 1);
    assert_eq!(partial.descriptors[0].label, Some("Visible".to_string()));
    assert_eq!(partial.descriptors[0].id, 1);
}

#[test]
fn test_sift_never_issues_ids_for_undersized_elements() {
    let mut tiny = candidate(0, "button", "Tiny");
    tiny.rect.width = 0.0;
    let normal = candidate(1, "button", "Normal");

    let (partial, ids) = sift_candidates(
        &FrameNode::main(),
        &env(),
        vec![tiny, normal],
        &DistillConfig {
            include_hidden: true,
            ..DistillConfig::default()
        },
        IdAllocator::new(),
    );

    // The undersized element consumed no identifier even with the
    // include-hidden override set.
    assert_eq!(partial.descriptors.len(), 1);
    assert_eq!(partial.descriptors[0].id, 1);
    assert_eq!(ids.issued(), 1);
}

#[test]
fn test_sift_threads_allocator_across_frames() {
    let config = DistillConfig::default();
    let frame_a = FrameNode::main();
    let frame_b = FrameNode {
        path: FramePath(vec![0]),
        offset: FrameOffset { x: 10.0, y: 20.0 },
        offset_approximate: false,
    };

    let (first, ids) = sift_candidates(
        &frame_a,
        &env(),
        vec![candidate(0, "a", "one"), candidate(1, "a", "two")],
        &config,
        IdAllocator::new(),
    );
    let (second, _) = sift_candidates(
        &frame_b,
        &env(),
        vec![candidate(0, "a", "three")],
        &config,
        ids,
    );

    let all_ids: Vec<u32> = first
        .descriptors
        .iter()
        .chain(second.descriptors.iter())
        .map(|d| d.id)
        .collect();
    assert_eq!(all_ids, vec![1, 2, 3]);
    assert_eq!(second.descriptors[0].frame, FramePath(vec![0]));
}

#[test]
fn test_sift_translates_bounds_by_frame_offset() {
    let frame = FrameNode {
        path: FramePath(vec![0, 1]),
        offset: FrameOffset { x: 60.0, y: 120.0 },
        offset_approximate: false,
    };
    let mut c = candidate(0, "button", "Nested");
    c.rect.x = 5.0;
    c.rect.y = 5.0;

    let (partial, _) = sift_candidates(
        &frame,
        &env(),
        vec![c],
        &DistillConfig::default(),
        IdAllocator::new(),
    );

    assert_eq!(partial.descriptors[0].bounds.x, 65.0);
    assert_eq!(partial.descriptors[0].bounds.y, 125.0);
}

#[test]
fn test_sift_records_marker_assignments_for_retained_only() {
    let kept = candidate(0, "button", "Kept");
    let mut dropped = candidate(1, "button", "Dropped");
    dropped.style.opacity = 0.0;
    let also_kept = candidate(2, "a", "Also kept");

    let (partial, _) = sift_candidates(
        &FrameNode::main(),
        &env(),
        vec![kept, dropped, also_kept],
        &DistillConfig::default(),
        IdAllocator::new(),
    );

    assert_eq!(partial.assignments, vec![(0, 1), (2, 2)]);
}

#[test]
fn test_fragments_follow_document_order() {
    let (partial, _) = sift_candidates(
        &FrameNode::main(),
        &env(),
        vec![
            candidate(0, "h1", "Title"),
            candidate(1, "a", "First link"),
            candidate(2, "button", "Go"),
        ],
        &DistillConfig::default(),
        IdAllocator::new(),
    );

    assert_eq!(
        partial.fragments,
        vec![
            "<h1 id=1>Title</h1>",
            "<a id=2>First link</a>",
            "<button id=3>Go</button>",
        ]
    );
}
