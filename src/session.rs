//! Browser-style session: cookie-backed API access, navigation and logout

use crate::config::{ClientOptions, LOGIN_PAGE, LOGOUT_PATH, URL_COOKIE};
use crate::cookies::CookieStore;
use crate::error::Result;
use crate::http::{ApiClient, Transport};
use crate::navigation::{self, Navigator};
use crate::rejection::{handle_rejection, Notifier, Rejection};

/// Ties a transport to the session cookie store, the user-facing notifier
/// and the navigator.
pub struct Session<T, C, A, N> {
    transport: T,
    options: ClientOptions,
    cookies: C,
    notifier: A,
    navigator: N,
}

impl<T, C, A, N> Session<T, C, A, N>
where
    T: Transport,
    C: CookieStore,
    A: Notifier,
    N: Navigator,
{
    pub fn new(transport: T, options: ClientOptions, cookies: C, notifier: A, navigator: N) -> Self {
        Self {
            transport,
            options,
            cookies,
            notifier,
            navigator,
        }
    }

    /// Client for the API the session points at. An explicit base URL in
    /// the options wins; otherwise the `url` cookie is read on every call.
    pub fn client(&self) -> Result<ApiClient<&T>> {
        let options = self.options.clone().resolve_base_url(&self.cookies)?;
        Ok(ApiClient::new(&self.transport, &options))
    }

    pub fn home(&mut self) {
        navigation::home(&mut self.navigator);
    }

    /// Log out of the backend.
    ///
    /// The response payload is logged on success and any failure is
    /// alerted. Afterwards the `url` cookie is removed and the navigator is
    /// sent to the login page, exactly once, whatever the outcome.
    pub async fn logout(&mut self) {
        let options = self.options.clone().resolve_base_url(&self.cookies);
        let guard = LogoutGuard::new(&mut self.cookies, &mut self.navigator);

        let outcome = match options {
            Ok(options) => ApiClient::new(&self.transport, &options).get(LOGOUT_PATH).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(response) => log::info!("{}", response.data()),
            Err(err) => handle_rejection(&self.notifier, &Rejection::from_error(err)),
        }

        guard.release();
    }

    pub fn cookies(&self) -> &C {
        &self.cookies
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}

/// Clears the session and leaves for the login page when released or
/// dropped, whichever comes first.
pub struct LogoutGuard<'a, C: CookieStore, N: Navigator> {
    cookies: &'a mut C,
    navigator: &'a mut N,
    released: bool,
}

impl<'a, C: CookieStore, N: Navigator> LogoutGuard<'a, C, N> {
    pub fn new(cookies: &'a mut C, navigator: &'a mut N) -> Self {
        Self {
            cookies,
            navigator,
            released: false,
        }
    }

    pub fn release(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(err) = self.cookies.remove(URL_COOKIE) {
            log::warn!("Failed to remove the {} cookie: {}", URL_COOKIE, err);
        }
        self.navigator.redirect(LOGIN_PAGE);
    }
}

impl<C: CookieStore, N: Navigator> Drop for LogoutGuard<'_, C, N> {
    fn drop(&mut self) {
        self.clear();
    }
}
