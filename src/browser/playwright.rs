//! Playwright integration for reading an element's computed style.
//!
//! This module contains the inline Playwright script, error mapping,
//! and availability checks for Node.js and Playwright.

use serde::Deserialize;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::computed::RawComputedStyle;
use crate::{Result, TpcError};

/// Resolves one selector and prints its computed style as JSON.
///
/// argv: url, selector, width, height, navTimeout, idleTimeout, headlessFlag
pub(crate) const COMPUTED_STYLE_SCRIPT: &str = r#"
const [, url, selector, width, height, navTimeout, idleTimeout, headlessFlag] = process.argv;

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: headlessFlag !== '0' });
    const context = await browser.newContext({
      viewport: {
        width: parseInt(width, 10),
        height: parseInt(height, 10)
      }
    });
    const page = await context.newPage();

    await page.goto(url, { waitUntil: 'networkidle', timeout: parseInt(navTimeout, 10) });
    await page.waitForLoadState('networkidle', { timeout: parseInt(idleTimeout, 10) });

    let handle;
    try {
      handle = await page.$(selector);
    } catch (err) {
      const message = err && err.message ? err.message : String(err);
      console.log(JSON.stringify({ status: 'not_found', message: `Selector ${selector} failed: ${message}` }));
      return;
    }
    if (!handle) {
      console.log(JSON.stringify({ status: 'not_found', message: `No element matches ${selector}` }));
      return;
    }

    let style;
    try {
      style = await handle.evaluate((el) => {
        if (!el.isConnected) {
          return null;
        }
        const cs = window.getComputedStyle(el);
        const pick = [
          'fontFamily', 'fontSize', 'fontWeight', 'fontStyle', 'fontVariant',
          'lineHeight', 'letterSpacing', 'textAlign', 'textDecorationLine',
          'textTransform', 'textIndent', 'color', 'opacity', 'backgroundColor',
          'borderTopStyle', 'borderRightStyle', 'borderBottomStyle', 'borderLeftStyle',
          'borderTopWidth', 'borderRightWidth', 'borderBottomWidth', 'borderLeftWidth',
          'borderTopColor', 'borderRightColor', 'borderBottomColor', 'borderLeftColor',
          'borderRadius', 'paddingTop', 'paddingRight', 'paddingBottom', 'paddingLeft',
          'marginTop', 'marginRight', 'marginBottom', 'marginLeft', 'textShadow'
        ];
        const out = {};
        for (const key of pick) {
          out[key] = cs[key] || null;
        }
        return out;
      });
    } catch (err) {
      const message = err && err.message ? err.message : String(err);
      console.log(JSON.stringify({ status: 'detached', message: `Element ${selector} could not be evaluated: ${message}` }));
      return;
    }

    if (!style) {
      console.log(JSON.stringify({ status: 'detached', message: `Element ${selector} is detached from the document` }));
      return;
    }

    console.log(JSON.stringify({ status: 'ok', style }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Env var naming a JSON file used in place of a real browser run.
pub const MOCK_COMPUTED_STYLE_ENV: &str = "TPC_MOCK_COMPUTED_STYLE";

/// Stdout payload of [`COMPUTED_STYLE_SCRIPT`].
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum ScriptOutcome {
    Ok { style: RawComputedStyle },
    NotFound { message: Option<String> },
    Detached { message: Option<String> },
}

/// Error result printed to stderr by the script.
#[derive(Debug, Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> TpcError {
    if err.kind() == io::ErrorKind::NotFound {
        TpcError::Browser(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        TpcError::Io(err)
    }
}

/// Maps Playwright stderr output to an appropriate TpcError.
pub(crate) fn map_playwright_error(status_text: impl Into<String>, stderr: &str) -> TpcError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr.trim()) {
        return map_playwright_status_error(&error.status, error.message);
    }

    let lower = stderr.to_ascii_lowercase();

    if lower.contains("cannot find module 'playwright'") {
        return missing_playwright();
    }

    if lower.contains("timeout") {
        return TpcError::Browser(
            "Playwright timed out; raise browser.navigation_timeout or browser.process_timeout and ensure the page finishes loading."
                .to_string(),
        );
    }

    TpcError::Browser(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

pub(crate) fn map_playwright_status_error(status: &str, message: String) -> TpcError {
    let lower = message.to_ascii_lowercase();
    if matches!(status, "not_found" | "detached")
        || lower.contains("not attached to the dom")
        || lower.contains("is not a valid selector")
    {
        TpcError::dom(message)
    } else if lower.contains("cannot find module 'playwright'") {
        missing_playwright()
    } else if lower.contains("timeout") {
        TpcError::Browser(format!(
            "Playwright error (status {}): {}. Hint: raise browser.navigation_timeout or browser.network_idle_timeout.",
            status, message
        ))
    } else {
        TpcError::Browser(format!("Playwright error (status {}): {}", status, message))
    }
}

fn missing_playwright() -> TpcError {
    TpcError::Browser(
        "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
    )
}

/// Turn script stdout into a computed style or an extraction error.
pub(crate) fn parse_script_output(stdout: &str, selector: &str) -> Result<RawComputedStyle> {
    let outcome: ScriptOutcome = serde_json::from_str(stdout.trim()).map_err(|e| {
        TpcError::Browser(format!(
            "Unexpected Playwright output: {} - raw: {}",
            e,
            stdout.trim()
        ))
    })?;

    match outcome {
        ScriptOutcome::Ok { style } => Ok(style),
        ScriptOutcome::NotFound { message } => Err(TpcError::dom(
            message.unwrap_or_else(|| format!("No element matches {selector}")),
        )),
        ScriptOutcome::Detached { message } => Err(TpcError::dom(
            message.unwrap_or_else(|| format!("Element {selector} is detached from the document")),
        )),
    }
}

pub(crate) fn mock_computed_style_path() -> Option<String> {
    std::env::var(MOCK_COMPUTED_STYLE_ENV)
        .ok()
        .filter(|path| !path.trim().is_empty())
}

pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            TpcError::Browser(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(TpcError::Browser(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            TpcError::Browser(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_playwright_error(
            format!("{:?}", output.status),
            &stderr,
        ));
    }

    Ok(())
}
