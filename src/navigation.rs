//! Navigation sink
//!
//! Where the fly-away ends: the browser location on wasm, a log line (and
//! an exit request) on native, a list in tests.

use crate::errors::Result;

pub trait Navigator {
    fn navigate(&mut self, url: &str) -> Result<()>;
}

/// Remembers every destination, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub visited: Vec<String>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.visited.push(url.to_string());
        Ok(())
    }
}

/// Native stand-in for a browser: logs the destination and flags that the
/// app should close.
#[derive(Debug, Clone, Default)]
pub struct LogNavigator {
    pub destination: Option<String>,
}

impl LogNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a destination was requested.
    #[must_use]
    pub fn should_exit(&self) -> bool {
        self.destination.is_some()
    }
}

impl Navigator for LogNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        log::info!("Opening {url}");
        self.destination = Some(url.to_string());
        Ok(())
    }
}

/// Sets `window.location.href`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        use crate::errors::KeyportalError;

        let window = web_sys::window().ok_or_else(|| KeyportalError::NavigationFailed {
            url: url.to_string(),
            reason: "no window".to_string(),
        })?;
        window
            .location()
            .set_href(url)
            .map_err(|err| KeyportalError::NavigationFailed {
                url: url.to_string(),
                reason: format!("{err:?}"),
            })
    }
}
