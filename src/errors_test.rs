// Unit tests for error classification and exit codes

use super::*;

#[test]
fn test_exit_codes() {
    let not_found = PagelensError::ElementNotFound {
        id: 3,
        frame: FramePath::root(),
        reason: "gone".to_string(),
    };
    assert_eq!(not_found.exit_code(), 2);
    assert_eq!(
        PagelensError::AmbiguousAddressing { supplied: 2 }.exit_code(),
        3
    );
    assert_eq!(
        PagelensError::WebDriverFailed("refused".to_string()).exit_code(),
        4
    );
    assert_eq!(PagelensError::Timeout("slow".to_string()).exit_code(), 5);
    assert_eq!(
        PagelensError::NoFramesProcessed("all failed".to_string()).exit_code(),
        6
    );
    assert_eq!(
        PagelensError::Other(anyhow::anyhow!("misc")).exit_code(),
        1
    );
}

#[test]
fn test_typed_errors_survive_anyhow_round_trip() {
    let original = PagelensError::NoFramesProcessed("all 3 frame(s) failed".to_string());
    let wrapped: anyhow::Error = original.into();
    let recovered = PagelensError::from(wrapped);
    assert!(matches!(recovered, PagelensError::NoFramesProcessed(_)));
    assert_eq!(recovered.exit_code(), 6);
}

#[test]
fn test_webdriver_errors_classified_from_message() {
    let err = anyhow::anyhow!("Failed to connect to WebDriver at http://localhost:4444");
    assert!(matches!(
        PagelensError::from(err),
        PagelensError::WebDriverFailed(_)
    ));

    let err = anyhow::anyhow!("geckodriver is not running");
    assert!(matches!(
        PagelensError::from(err),
        PagelensError::WebDriverFailed(_)
    ));
}

#[test]
fn test_timeout_classified_from_message() {
    let err = anyhow::anyhow!("frame evaluation timed out");
    assert!(matches!(PagelensError::from(err), PagelensError::Timeout(_)));
}

#[test]
fn test_unrecognized_errors_stay_generic() {
    let err = anyhow::anyhow!("something else entirely");
    let classified = PagelensError::from(err);
    assert!(matches!(classified, PagelensError::Other(_)));
    assert_eq!(classified.exit_code(), 1);
}

#[test]
fn test_element_not_found_message_names_frame() {
    let err = PagelensError::ElementNotFound {
        id: 12,
        frame: FramePath(vec![0, 2]),
        reason: "marker not present".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("12"));
    assert!(msg.contains("0.2"));
}
