// Unit tests for frame-node derivation

use super::*;

fn rect(x: f64, y: f64) -> BoundingBox {
    BoundingBox {
        x,
        y,
        width: 400.0,
        height: 300.0,
    }
}

#[test]
fn test_children_get_index_paths_in_order() {
    let parent = FrameNode::main();
    let (children, warnings) =
        child_nodes(&parent, vec![Some(rect(0.0, 0.0)), Some(rect(0.0, 500.0))]);

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].path, FramePath(vec![0]));
    assert_eq!(children[1].path, FramePath(vec![1]));
    assert!(warnings.is_empty());
}

#[test]
fn test_child_offset_composes_with_parent() {
    let parent = FrameNode {
        path: FramePath(vec![0]),
        offset: FrameOffset { x: 10.0, y: 20.0 },
        offset_approximate: false,
    };
    let (children, _) = child_nodes(&parent, vec![Some(rect(50.0, 100.0))]);

    assert_eq!(children[0].offset, FrameOffset { x: 60.0, y: 120.0 });
    assert_eq!(children[0].path, FramePath(vec![0, 0]));
    assert!(!children[0].offset_approximate);
}

#[test]
fn test_missing_probe_degrades_to_parent_offset() {
    let parent = FrameNode {
        path: FramePath(vec![2]),
        offset: FrameOffset { x: 5.0, y: 5.0 },
        offset_approximate: false,
    };
    let (children, warnings) = child_nodes(&parent, vec![None]);

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].offset, parent.offset);
    assert!(children[0].offset_approximate);

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::OffsetApproximate);
    assert_eq!(warnings[0].frame, FramePath(vec![2, 0]));
}

#[test]
fn test_approximation_propagates_to_descendants() {
    let parent = FrameNode {
        path: FramePath(vec![1]),
        offset: FrameOffset::ZERO,
        offset_approximate: true,
    };
    let (children, warnings) = child_nodes(&parent, vec![Some(rect(1.0, 1.0))]);

    // The child's own boundary was fine, but an ancestor's was not.
    assert!(children[0].offset_approximate);
    assert!(warnings.is_empty());
}

#[test]
fn test_depth_bound_keeps_node_but_stops_descent() {
    let shallow = FrameNode {
        path: FramePath(vec![0u16; MAX_FRAME_DEPTH - 1]),
        offset: FrameOffset::ZERO,
        offset_approximate: false,
    };
    assert!(depth_truncation(&shallow).is_none());

    let deep = FrameNode {
        path: FramePath(vec![0u16; MAX_FRAME_DEPTH]),
        offset: FrameOffset::ZERO,
        offset_approximate: false,
    };
    let warning = depth_truncation(&deep).expect("node at the bound must be truncated");
    assert_eq!(warning.kind, WarningKind::DepthTruncated);
    assert_eq!(warning.frame, deep.path);
}

#[test]
fn test_main_document_failure_is_the_no_frames_condition() {
    // A root-page enumeration failure processes zero frames, so callers
    // must be able to branch into the fallback capture on it.
    let err = main_frame_failure(anyhow::anyhow!("session dropped"));
    let classified = PagelensError::from(err);
    assert!(matches!(classified, PagelensError::NoFramesProcessed(_)));
    assert_eq!(classified.exit_code(), 6);
}

#[test]
fn test_main_frame_node() {
    let main = FrameNode::main();
    assert!(main.path.is_root());
    assert_eq!(main.offset, FrameOffset::ZERO);
    assert_eq!(main.path.depth(), 0);
}
