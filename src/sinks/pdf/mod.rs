//! Printing the assembled HTML through a headless Chromium.
//!
//! The document is written into the run's working directory and loaded from
//! there, so relative references resolve the same way they would in a
//! browser. Once the page has settled (every image loaded) it is printed with
//! the configured geometry.

use crate::config::PdfSettings;
use crate::error::ProcessingError;
use anyhow::{anyhow, bail, Context, Result};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

const DOCUMENT_FILE: &str = "document.html";

const PAGE_SETTLED: &str = "document.readyState === 'complete' \
    && Array.from(document.images).every((img) => img.complete)";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Closes its tab when dropped. Declared after the browser so it is dropped
/// first; the browser process is killed by its own `Drop`.
struct TabGuard(Arc<Tab>);

impl Drop for TabGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.close(false) {
            log::debug!("failed to close browser tab: {e:#}");
        }
    }
}

/// Print options derived from the settings
pub fn print_options(settings: &PdfSettings) -> PrintToPdfOptions {
    PrintToPdfOptions {
        landscape: Some(false),
        display_header_footer: Some(true),
        print_background: Some(settings.print_background),
        paper_width: Some(settings.page_width_in),
        paper_height: Some(settings.page_height_in),
        margin_top: Some(settings.margin_in),
        margin_bottom: Some(settings.margin_in),
        margin_left: Some(settings.margin_in),
        margin_right: Some(settings.margin_in),
        header_template: Some(settings.header_template.clone()),
        footer_template: Some(settings.footer_template.clone()),
        ..Default::default()
    }
}

fn file_url(path: &Path) -> Result<String> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    Ok(format!("file://{}", path.display()))
}

/// Write `html` into `workdir`, returning the path it was written to
pub fn stage(html: &str, workdir: &Path) -> Result<PathBuf, ProcessingError> {
    let path = workdir.join(DOCUMENT_FILE);
    std::fs::write(&path, html).map_err(|e| {
        ProcessingError::Render(format!("Failed to write {}: {e}", path.display()))
    })?;
    Ok(path)
}

fn wait_until_settled(tab: &Tab, timeout: Duration) -> Result<()> {
    let started = Instant::now();
    loop {
        let result = tab
            .evaluate(PAGE_SETTLED, false)
            .with_context(|| "Failed to query page state")?;
        if result.value.as_ref().and_then(serde_json::Value::as_bool) == Some(true) {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            bail!(
                "Page did not finish loading within {} seconds",
                timeout.as_secs()
            );
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn print(document: &Path, settings: &PdfSettings) -> Result<Vec<u8>> {
    let timeout = Duration::from_secs(settings.timeout_secs);
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(settings.sandbox)
        .window_size(Some((settings.viewport_width, settings.viewport_height)))
        .idle_browser_timeout(timeout)
        .build()
        .map_err(|e| anyhow!("Invalid browser options: {e}"))?;

    let browser = Browser::new(options).with_context(|| "Failed to launch browser")?;
    let tab = TabGuard(browser.new_tab().with_context(|| "Failed to open browser tab")?);
    tab.0.set_default_timeout(timeout);

    let url = file_url(document)?;
    log::debug!("loading {url}");
    tab.0
        .navigate_to(&url)
        .and_then(|tab| tab.wait_until_navigated())
        .with_context(|| format!("Failed to load {url}"))?;
    wait_until_settled(&tab.0, timeout)?;

    tab.0
        .print_to_pdf(Some(print_options(settings)))
        .with_context(|| "Failed to print page")
}

/// Render `html` to `outfile`, returning the size of the written PDF in bytes.
pub fn render(
    html: &str,
    outfile: &Path,
    settings: &PdfSettings,
    workdir: &Path,
) -> Result<u64, ProcessingError> {
    let document = stage(html, workdir)?;
    let pdf = print(&document, settings).map_err(|e| ProcessingError::Render(format!("{e:#}")))?;

    std::fs::write(outfile, &pdf).map_err(|e| {
        ProcessingError::Render(format!("Failed to write {}: {e}", outfile.display()))
    })?;
    Ok(pdf.len() as u64)
}
