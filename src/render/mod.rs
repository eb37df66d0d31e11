//! Render capability for JavaScript-heavy pages.
//!
//! A [`Renderer`] performs navigation, settling, and extraction as one
//! blocking call. The orchestrator runs it on the blocking thread pool.
//!
//! Rendered pages may contain several browsing contexts (the top document
//! plus iframes). [`pool_context_hrefs`] fans out over them with a fixed
//! upper bound; each context is extracted independently, and a context that
//! cannot be read is skipped rather than failing the page.

#[cfg(feature = "browser")]
mod chrome;

use std::time::Duration;

use log::debug;

use crate::config::MAX_FRAMES;
use crate::error_handling::RenderError;

#[cfg(feature = "browser")]
pub use chrome::ChromeRenderer;

/// Headless-browser rendering, consumed as a black box.
pub trait Renderer: Send + Sync {
    /// Fully rendered HTML of the top document. Read when in-page href
    /// extraction fails.
    fn render_html(&self, url: &str, wait: Duration) -> Result<String, RenderError>;

    /// Absolute hrefs of every anchor across all accessible browsing contexts.
    fn render_hrefs(&self, url: &str, wait: Duration) -> Result<Vec<String>, RenderError>;
}

/// One browsing context of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowsingContext {
    /// The top-level document
    Top,
    /// The n-th iframe in document order
    Frame(usize),
}

/// Pools hrefs from the top document and up to `MAX_FRAMES` frames.
///
/// The top document must be readable; frame failures are logged and skipped.
pub fn pool_context_hrefs<F>(frame_count: usize, mut extract: F) -> Result<Vec<String>, RenderError>
where
    F: FnMut(BrowsingContext) -> Result<Vec<String>, RenderError>,
{
    let mut hrefs = extract(BrowsingContext::Top)?;

    let bounded = frame_count.min(MAX_FRAMES);
    if bounded < frame_count {
        debug!("Page has {frame_count} frames; inspecting the first {bounded}");
    }
    for index in 0..bounded {
        match extract(BrowsingContext::Frame(index)) {
            Ok(frame_hrefs) => hrefs.extend(frame_hrefs),
            Err(e) => debug!("Skipping frame {index}: {e}"),
        }
    }
    Ok(hrefs)
}
