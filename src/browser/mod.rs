//! Live side of a typography comparison.
//!
//! The computed style of one element is read through Playwright via Node.js
//! and mapped into a [`CanonicalStyle`](crate::style::CanonicalStyle).
//!
//! # Module Structure
//!
//! - [`manager`] - Browser session management with concurrency control
//! - [`playwright`] - Playwright script and availability checks
//! - [`computed`] - Computed-style payload and its canonical mapping
//!
//! # Example
//!
//! ```no_run
//! use tpc_lib::{BrowserManager, BrowserOptions, ElementTarget};
//!
//! # async fn example() -> tpc_lib::Result<()> {
//! let manager = BrowserManager::new(BrowserOptions::default());
//! let target = ElementTarget::new("https://example.com", "h1");
//! let style = manager.extract_live_style(&target).await?;
//! println!("{} properties", style.len());
//! # Ok(())
//! # }
//! ```

pub mod computed;
mod manager;
mod playwright;

pub use computed::{live_style_from_computed, rewrite_text_shadow, RawComputedStyle};
pub use manager::{
    BrowserManager, BrowserOptions, ElementTarget, Viewport, DEFAULT_NAVIGATION_TIMEOUT,
    DEFAULT_NETWORK_IDLE_TIMEOUT, DEFAULT_PROCESS_TIMEOUT,
};
pub use playwright::MOCK_COMPUTED_STYLE_ENV;
