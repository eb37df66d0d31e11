//! Headless Chromium renderer (`browser` feature).

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, warn};

use super::{pool_context_hrefs, BrowsingContext, Renderer};
use crate::config::{MAX_SCROLL_STEPS, NAVIGATION_TIMEOUT, SCROLL_PAUSE};
use crate::error_handling::RenderError;

const TOP_HREFS_JS: &str =
    "JSON.stringify(Array.from(document.querySelectorAll('a[href]'), a => a.href))";
const FRAME_COUNT_JS: &str = "document.querySelectorAll('iframe').length";
const SCROLL_JS: &str =
    "window.scrollTo(0, document.body.scrollHeight); document.body.scrollHeight";

/// Launches a fresh headless Chromium per render call.
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    navigation_timeout: Duration,
    max_scroll_steps: usize,
    scroll_pause: Duration,
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self {
            navigation_timeout: NAVIGATION_TIMEOUT,
            max_scroll_steps: MAX_SCROLL_STEPS,
            scroll_pause: SCROLL_PAUSE,
        }
    }
}

impl ChromeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigates and settles. The browser must outlive the tab.
    fn open(&self, url: &str, wait: Duration) -> Result<(Browser, Arc<Tab>), RenderError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;
        let browser = Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(e.to_string()))?;
        tab.set_default_timeout(self.navigation_timeout);

        let navigation = |e: anyhow::Error| RenderError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };
        tab.navigate_to(url).map_err(navigation)?;
        tab.wait_until_navigated().map_err(navigation)?;

        self.auto_scroll(&tab);
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        Ok((browser, tab))
    }

    /// Scrolls until the page stops growing or the step budget runs out.
    fn auto_scroll(&self, tab: &Tab) {
        let mut last_height = None;
        for step in 0..self.max_scroll_steps {
            let height = match evaluate(tab, SCROLL_JS) {
                Ok(value) => value.and_then(|v| v.as_u64()),
                Err(e) => {
                    warn!("Auto-scroll stopped at step {step}: {e}");
                    return;
                }
            };
            std::thread::sleep(self.scroll_pause);
            if height == last_height {
                debug!("Page height settled after {step} scroll steps");
                return;
            }
            last_height = height;
        }
    }
}

impl Renderer for ChromeRenderer {
    fn render_html(&self, url: &str, wait: Duration) -> Result<String, RenderError> {
        let (_browser, tab) = self.open(url, wait)?;
        tab.get_content()
            .map_err(|e| RenderError::Evaluation(e.to_string()))
    }

    fn render_hrefs(&self, url: &str, wait: Duration) -> Result<Vec<String>, RenderError> {
        let (_browser, tab) = self.open(url, wait)?;
        let frame_count = evaluate(&tab, FRAME_COUNT_JS)?
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize;

        pool_context_hrefs(frame_count, |context| match context {
            BrowsingContext::Top => {
                decode_hrefs(evaluate(&tab, TOP_HREFS_JS)?).ok_or_else(|| {
                    RenderError::Evaluation("top document returned no hrefs".to_string())
                })
            }
            BrowsingContext::Frame(index) => decode_hrefs(evaluate(&tab, &frame_hrefs_js(index))?)
                .ok_or(RenderError::FrameInaccessible(index)),
        })
    }
}

fn evaluate(tab: &Tab, expression: &str) -> Result<Option<serde_json::Value>, RenderError> {
    tab.evaluate(expression, false)
        .map(|remote| remote.value)
        .map_err(|e| RenderError::Evaluation(e.to_string()))
}

/// Cross-origin frames expose no `contentDocument`; the script returns null for them.
fn frame_hrefs_js(index: usize) -> String {
    format!(
        "(() => {{ const f = document.querySelectorAll('iframe')[{index}]; \
         const d = f && f.contentDocument; if (!d) return null; \
         try {{ return JSON.stringify(Array.from(d.querySelectorAll('a[href]'), a => a.href)); }} \
         catch (e) {{ return null; }} }})()"
    )
}

fn decode_hrefs(value: Option<serde_json::Value>) -> Option<Vec<String>> {
    let raw = value?;
    let text = raw.as_str()?;
    serde_json::from_str(text).ok()
}
