use anyhow::Result;
use fantoccini::elements::Element;
use tracing::debug;

use crate::browser::Browser;
use crate::distill::distiller::MARKER_ATTR;
use crate::errors::PagelensError;
use crate::types::{DistillResult, FramePath};

/// How an action addresses its element: a distilled identifier or a raw
/// CSS selector. Exactly one scheme must be supplied per action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// Identifier issued by a distillation pass
    Id(u32),
    /// Fallback addressing against the main frame
    Selector(String),
}

impl ActionTarget {
    /// Validate the addressing flags of an action call. Supplying both or
    /// neither is a usage error, rejected before any page interaction.
    pub fn from_flags(
        id: Option<u32>,
        selector: Option<String>,
    ) -> Result<Self, PagelensError> {
        match (id, selector) {
            (Some(id), None) => Ok(ActionTarget::Id(id)),
            (None, Some(selector)) => Ok(ActionTarget::Selector(selector)),
            (Some(_), Some(_)) => Err(PagelensError::AmbiguousAddressing { supplied: 2 }),
            (None, None) => Err(PagelensError::AmbiguousAddressing { supplied: 0 }),
        }
    }
}

/// Resolves identifiers from a prior distillation pass back to live
/// elements.
///
/// Resolution looks for the marker attribute inside the owning frame
/// recorded at issuance time, never globally: two frames can carry the
/// same DOM shape, and markers are only unique within their frame's
/// document. Any miss is an [`PagelensError::ElementNotFound`], a signal
/// to request a fresh distillation rather than retry.
pub struct ElementResolver<'a> {
    browser: &'a Browser,
    pass: &'a DistillResult,
}

impl<'a> ElementResolver<'a> {
    pub fn new(browser: &'a Browser, pass: &'a DistillResult) -> Self {
        ElementResolver { browser, pass }
    }

    /// Resolve an identifier to the live element it was issued for. The
    /// session's frame context is left inside the owning frame so the
    /// returned handle stays usable.
    pub async fn resolve(&self, id: u32) -> Result<Element> {
        let descriptor = self
            .pass
            .elements
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| PagelensError::ElementNotFound {
                id,
                frame: FramePath::root(),
                reason: "identifier was not issued by this pass".to_string(),
            })?;

        debug!("Resolving element {} in frame {}", id, descriptor.frame);

        self.browser
            .switch_to_frame(&descriptor.frame)
            .await
            .map_err(|e| PagelensError::ElementNotFound {
                id,
                frame: descriptor.frame.clone(),
                reason: format!("owning frame is gone: {}", e),
            })?;

        let marker_selector = format!("[{}=\"{}\"]", MARKER_ATTR, id);
        let element = self
            .browser
            .find_css(&marker_selector)
            .await
            .map_err(|_| PagelensError::ElementNotFound {
                id,
                frame: descriptor.frame.clone(),
                reason: "marker not present; the page has changed since the pass".to_string(),
            })?;

        Ok(element)
    }

    /// Locate the element for an action target. Selector addressing
    /// searches the main frame.
    pub async fn locate(&self, target: &ActionTarget) -> Result<Element> {
        match target {
            ActionTarget::Id(id) => self.resolve(*id).await,
            ActionTarget::Selector(selector) => {
                self.browser.switch_to_top().await?;
                self.browser.find_css(selector).await
            }
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;
