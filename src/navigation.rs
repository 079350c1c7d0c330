//! Page navigation

use crate::config::HOME_PAGE;

/// Something that can be sent to another page
pub trait Navigator {
    fn redirect(&mut self, location: &str);
}

/// Records every redirect and logs it. Used where there is no browser.
#[derive(Debug, Clone, Default)]
pub struct LoggingNavigator {
    history: Vec<String>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent redirect target
    pub fn location(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Navigator for LoggingNavigator {
    fn redirect(&mut self, location: &str) {
        log::info!("Redirecting to {}", location);
        self.history.push(location.to_string());
    }
}

/// Go to the home page
pub fn home<N: Navigator + ?Sized>(navigator: &mut N) {
    navigator.redirect(HOME_PAGE);
}
