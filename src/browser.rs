use anyhow::{Context, Result};
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::{debug, info};

use crate::types::{FramePath, ViewportSize};

/// Browser instance for WebDriver automation.
///
/// This is the adapter to the automation host: frame switching, in-frame
/// script execution, and element lookup all go through here. Frame
/// switching uses the WebDriver "Switch To Frame" command by index, which
/// works for cross-origin frames as well (the driver grants script access
/// inside the frame even where same-origin DOM reach-through would not).
pub struct Browser {
    pub(crate) client: Client,
    browser_type: BrowserType,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Get the default WebDriver URL for this browser type
    pub fn default_webdriver_url(&self) -> String {
        match self {
            BrowserType::Firefox => "http://localhost:4444".to_string(),
            BrowserType::Chrome => "http://localhost:9515".to_string(),
        }
    }
}

impl Browser {
    /// Connect to a running WebDriver and start a session.
    ///
    /// # Arguments
    /// * `browser_type` - Firefox or Chrome
    /// * `webdriver_url` - Override the default driver endpoint
    /// * `viewport` - Optional viewport dimensions
    /// * `headless` - Whether to run in headless mode
    pub async fn new(
        browser_type: BrowserType,
        webdriver_url: Option<String>,
        viewport: Option<ViewportSize>,
        headless: bool,
    ) -> Result<Self> {
        let webdriver_url =
            webdriver_url.unwrap_or_else(|| browser_type.default_webdriver_url());

        info!("Connecting to {:?} WebDriver at {}", browser_type, webdriver_url);

        if !Self::is_webdriver_running(&webdriver_url).await {
            let driver_name = match browser_type {
                BrowserType::Firefox => "geckodriver",
                BrowserType::Chrome => "chromedriver",
            };

            anyhow::bail!(
                "Cannot connect to {} WebDriver at {}.\n\
                Please ensure {} is running:\n\
                  For Firefox: geckodriver --port 4444\n\
                  For Chrome: chromedriver --port 9515",
                driver_name,
                webdriver_url,
                driver_name
            );
        }

        let mut caps = serde_json::Map::new();

        match &browser_type {
            BrowserType::Firefox => {
                let mut firefox_opts = serde_json::Map::new();
                let mut args = Vec::new();

                if headless {
                    args.push("--headless".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--width={}", vp.width));
                    args.push(format!("--height={}", vp.height));
                }

                firefox_opts.insert("args".to_string(), json!(args));
                caps.insert("moz:firefoxOptions".to_string(), json!(firefox_opts));
            }
            BrowserType::Chrome => {
                let mut chrome_opts = serde_json::Map::new();
                let mut args = vec!["--no-sandbox".to_string()];

                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }

                if let Some(vp) = &viewport {
                    args.push(format!("--window-size={},{}", vp.width, vp.height));
                }

                chrome_opts.insert("args".to_string(), json!(args));
                caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
            }
        }

        debug!("Connecting to WebDriver at {}", webdriver_url);

        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        // Set viewport size after connection if specified
        if let Some(vp) = viewport {
            debug!("Setting viewport to {}x{}", vp.width, vp.height);
            if let Err(e) = client.set_window_size(vp.width, vp.height).await {
                debug!("Note: Could not set window size: {}", e);
                // Continue anyway - viewport setting is best-effort
            }
        }

        Ok(Browser {
            client,
            browser_type,
        })
    }

    async fn is_webdriver_running(url: &str) -> bool {
        // Try to connect to the WebDriver status endpoint
        let status_url = format!("{}/status", url);

        match reqwest::get(&status_url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);

        self.client.goto(url).await?;

        // Wait for the page to be ready
        // This helps avoid stale element references
        let wait_script = r#"
            return document.readyState === 'complete';
        "#;

        // Try waiting for page to be ready (with timeout)
        for _ in 0..20 {
            // Max 2 seconds
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => {
                    break;
                }
                _ => {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }

        Ok(())
    }

    /// Get the current URL - useful for health checks
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// Execute a script in the current frame context
    pub async fn execute(
        &self,
        script: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.client
            .execute(script, args)
            .await
            .context("Failed to execute script")
    }

    /// Switch the session context back to the main frame
    pub async fn switch_to_top(&self) -> Result<()> {
        self.client
            .clone()
            .enter_frame(None)
            .await
            .context("Failed to switch to top-level frame")?;
        Ok(())
    }

    /// Switch the session context to the frame at `path`, walking the
    /// child-index chain down from the main frame. Fails if any link of
    /// the chain has detached.
    pub async fn switch_to_frame(&self, path: &FramePath) -> Result<()> {
        self.switch_to_top().await?;
        for index in &path.0 {
            self.client
                .clone()
                .enter_frame(Some(*index))
                .await
                .with_context(|| format!("Failed to enter frame {} of path {}", index, path))?;
        }
        Ok(())
    }

    /// Find one element by CSS selector within the current frame context
    pub async fn find_css(&self, selector: &str) -> Result<Element> {
        self.client
            .find(Locator::Css(selector))
            .await
            .with_context(|| format!("Element not found: {}", selector))
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
