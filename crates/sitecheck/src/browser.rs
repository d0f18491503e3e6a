//! Chromium page driver over the DevTools protocol.
//!
//! Locators are compiled to JavaScript ([`crate::locator::Selector::to_query`])
//! and evaluated in the page on every call, so each read sees the live DOM.

use crate::config::BrowserSettings;
use crate::driver::{BrowserInfo, PageDriver};
use crate::locator::Locator;
use crate::result::{SiteCheckError, SiteCheckResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Engine name reported in annotations and used for baseline directories
pub const ENGINE: &str = "chromium";

/// A launched chromium process
#[derive(Debug)]
pub struct ChromiumBrowser {
    settings: BrowserSettings,
    inner: Arc<Mutex<CdpBrowser>>,
    handle: tokio::task::JoinHandle<()>,
}

impl ChromiumBrowser {
    /// Launch chromium
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::BrowserLaunchError`] if chromium cannot be started
    pub async fn launch(settings: &BrowserSettings) -> SiteCheckResult<Self> {
        let mut builder = CdpConfig::builder().window_size(settings.viewport_width, settings.viewport_height);

        if !settings.headless {
            builder = builder.with_head();
        }

        if !settings.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = settings.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| SiteCheckError::BrowserLaunchError { message })?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
            SiteCheckError::BrowserLaunchError {
                message: e.to_string(),
            }
        })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!(error = %err, "cdp handler stopped");
                    break;
                }
            }
        });

        tracing::info!(headless = settings.headless, "chromium launched");
        Ok(Self {
            settings: settings.clone(),
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Launch settings
    #[must_use]
    pub const fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    /// Engine and version of the running browser
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::PageError`] if the browser does not answer
    pub async fn version(&self) -> SiteCheckResult<BrowserInfo> {
        let browser = self.inner.lock().await;
        let version = browser.version().await.map_err(|e| SiteCheckError::PageError {
            message: e.to_string(),
        })?;
        Ok(BrowserInfo::new(ENGINE, product_version(&version.product)))
    }

    /// Open a blank page
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::PageError`] if the page cannot be created
    pub async fn new_page(&self) -> SiteCheckResult<ChromiumPage> {
        let info = self.version().await?;
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SiteCheckError::PageError {
                message: e.to_string(),
            })?;
        Ok(ChromiumPage {
            inner: Arc::new(Mutex::new(page)),
            info,
        })
    }

    /// Close the browser
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::BrowserLaunchError`] if chromium does not shut down
    pub async fn close(self) -> SiteCheckResult<()> {
        {
            let mut browser = self.inner.lock().await;
            let _ = browser
                .close()
                .await
                .map_err(|e| SiteCheckError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
        }
        self.handle.abort();
        Ok(())
    }
}

/// `HeadlessChrome/131.0.6778.33` -> `131.0.6778.33`
fn product_version(product: &str) -> String {
    product
        .split_once('/')
        .map_or(product, |(_, version)| version)
        .to_string()
}

/// What the page reports about a locator's first match
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Probe {
    count: usize,
    visible: bool,
    text: Option<String>,
    attribute: Option<String>,
}

/// A chromium tab
#[derive(Debug, Clone)]
pub struct ChromiumPage {
    inner: Arc<Mutex<CdpPage>>,
    info: BrowserInfo,
}

impl ChromiumPage {
    async fn evaluate<T: DeserializeOwned>(&self, expression: String) -> SiteCheckResult<T> {
        let page = self.inner.lock().await;
        let result = page
            .evaluate(expression)
            .await
            .map_err(|e| SiteCheckError::PageError {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| SiteCheckError::PageError {
            message: e.to_string(),
        })
    }

    /// Evaluate `action` (a JS statement over `el`) on the first match and report it
    async fn probe(&self, locator: &Locator, action: &str) -> SiteCheckResult<Probe> {
        let expression = format!(
            "(() => {{ const els = {query}; \
             if (els.length === 0) return {{ count: 0 }}; \
             const el = els[0]; \
             const r = el.getBoundingClientRect(); \
             const s = window.getComputedStyle(el); \
             const visible = r.width > 0 && r.height > 0 && s.visibility !== 'hidden'; \
             const out = {{ count: els.length, visible, text: el.textContent, attribute: null }}; \
             {action} \
             return out; }})()",
            query = locator.selector().to_query(),
        );
        let probe: Probe = self.evaluate(expression).await?;
        if locator.is_strict() && probe.count > 1 {
            return Err(SiteCheckError::StrictModeViolation {
                selector: locator.to_string(),
                count: probe.count,
            });
        }
        tracing::debug!(%locator, count = probe.count, visible = probe.visible, "probed");
        Ok(probe)
    }

    async fn probe_one(&self, locator: &Locator, action: &str) -> SiteCheckResult<Probe> {
        let probe = self.probe(locator, action).await?;
        if probe.count == 0 {
            return Err(SiteCheckError::NoMatch {
                selector: locator.to_string(),
            });
        }
        Ok(probe)
    }
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn navigate(&self, url: &str) -> SiteCheckResult<()> {
        let page = self.inner.lock().await;
        let _ = page
            .goto(url)
            .await
            .map_err(|e| SiteCheckError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> SiteCheckResult<bool> {
        Ok(self.probe(locator, "").await?.visible)
    }

    async fn text_content(&self, locator: &Locator) -> SiteCheckResult<Option<String>> {
        Ok(self.probe_one(locator, "").await?.text)
    }

    async fn get_attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> SiteCheckResult<Option<String>> {
        let name = serde_json::to_string(name)?;
        let action = format!("out.attribute = el.getAttribute({name});");
        Ok(self.probe_one(locator, &action).await?.attribute)
    }

    async fn click(&self, locator: &Locator) -> SiteCheckResult<()> {
        let probe = self
            .probe_one(
                locator,
                "if (visible) { el.scrollIntoView({ block: 'center' }); el.click(); }",
            )
            .await?;
        if !probe.visible {
            return Err(SiteCheckError::PageError {
                message: format!("{locator} is not visible and cannot be clicked"),
            });
        }
        Ok(())
    }

    async fn screenshot(&self) -> SiteCheckResult<Vec<u8>> {
        let page = self.inner.lock().await;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .capture_beyond_viewport(true)
            .build();

        let screenshot = page
            .execute(params)
            .await
            .map_err(|e| SiteCheckError::ScreenshotError {
                message: e.to_string(),
            })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| SiteCheckError::ScreenshotError {
                message: e.to_string(),
            })
    }

    async fn browser_info(&self) -> SiteCheckResult<BrowserInfo> {
        Ok(self.info.clone())
    }
}
