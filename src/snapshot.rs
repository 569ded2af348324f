use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::browser::Browser;
use crate::distill;
use crate::errors::PagelensError;
use crate::types::{DistillConfig, DistillResult};

/// Plain page outline used when distillation cannot produce anything:
/// title, headings, and landmark regions, with no element addressing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOutline {
    pub title: String,
    pub url: String,
    pub headings: Vec<String>,
    pub landmarks: Vec<String>,
}

/// What a snapshot request produced: the distilled, addressable summary,
/// or the outline fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PageSnapshot {
    Distilled(DistillResult),
    Outline(PageOutline),
}

const OUTLINE_SCRIPT: &str = r#"
    return (function() {
        const headings = [];
        document.querySelectorAll('h1, h2, h3, h4, h5, h6').forEach(function(el) {
            const text = (el.innerText || '').trim();
            if (text) {
                headings.push(el.tagName.toLowerCase() + ' ' + text);
            }
        });
        const landmarks = [];
        document.querySelectorAll(
            'main, nav, header, footer, aside, [role="main"], [role="navigation"]'
        ).forEach(function(el) {
            landmarks.push(el.getAttribute('role') || el.tagName.toLowerCase());
        });
        return {
            title: document.title || '',
            url: window.location.href,
            headings: headings,
            landmarks: landmarks
        };
    })();
"#;

/// Capture a snapshot of the current page: run a distillation pass and,
/// if every frame failed, fall back to the outline capture so the caller
/// always receives a usable observation. Errors other than
/// [`PagelensError::NoFramesProcessed`] propagate unchanged.
pub async fn capture(browser: &Browser, config: &DistillConfig) -> Result<PageSnapshot> {
    match distill::distill(browser, config).await {
        Ok(result) => Ok(PageSnapshot::Distilled(result)),
        Err(e) if is_no_frames(&e) => {
            warn!("Distillation produced nothing; falling back to page outline");
            let outline = capture_outline(browser).await?;
            Ok(PageSnapshot::Outline(outline))
        }
        Err(e) => Err(e),
    }
}

fn is_no_frames(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PagelensError>(),
        Some(PagelensError::NoFramesProcessed(_))
    )
}

async fn capture_outline(browser: &Browser) -> Result<PageOutline> {
    browser.switch_to_top().await?;
    let raw = browser.execute(OUTLINE_SCRIPT, vec![]).await?;
    let outline: PageOutline = serde_json::from_value(raw)?;
    info!(
        "Captured outline: {} heading(s), {} landmark(s)",
        outline.headings.len(),
        outline.landmarks.len()
    );
    Ok(outline)
}
