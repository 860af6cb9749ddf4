//! Shared HTTP client construction policy.
//!
//! One client is built at startup and cloned into every collection client and
//! the media proxy so they share a connection pool. Per-request timeouts are
//! applied by the callers; the client only carries the connect timeout.

use std::any::Any;
use std::panic::{RefUnwindSafe, UnwindSafe, catch_unwind, set_hook, take_hook};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use thiserror::Error;
use tracing::warn;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent for backend and media requests.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{}/{version}", env!("CARGO_PKG_NAME"))
}

/// Errors from building the shared HTTP client.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The builder rejected the configuration.
    #[error("HTTP client configuration rejected: {0}")]
    Build(#[source] reqwest::Error),

    /// The builder panicked both with and without the system proxy lookup.
    #[error("HTTP client builder panicked while applying env-proxy fallback")]
    BuilderPanicked,
}

/// Builds the shared HTTP client.
///
/// # Errors
///
/// Returns [`HttpClientError::Build`] when the builder rejects the
/// configuration (for example, when no TLS backend can be initialised), and
/// [`HttpClientError::BuilderPanicked`] when even the env-proxy fallback
/// builder panics.
pub fn build_http_client() -> Result<Client, HttpClientError> {
    build_with(|disable_system_proxy_lookup| {
        let builder = base_builder();
        if disable_system_proxy_lookup {
            apply_env_proxy_fallback(builder.no_proxy())
        } else {
            builder
        }
    })
}

fn build_with<F>(make_builder: F) -> Result<Client, HttpClientError>
where
    F: Fn(bool) -> ClientBuilder + RefUnwindSafe,
{
    match try_build_client(&make_builder, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed environments panic when querying system proxy
            // settings. The fallback keeps env-proxy support without the lookup.
            warn!(
                "HTTP client builder panicked while loading system proxy settings; retrying with env-proxy fallback"
            );
            match try_build_client(&make_builder, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Build(error)) => Err(HttpClientError::Build(error)),
                Err(BuildClientFailure::Panic) => Err(HttpClientError::BuilderPanicked),
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(HttpClientError::Build(error)),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

fn try_build_client<F>(
    make_builder: &F,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure>
where
    F: Fn(bool) -> ClientBuilder + RefUnwindSafe,
{
    catch_unwind_silent(move || {
        make_builder(disable_system_proxy_lookup)
            .build()
            .map_err(BuildClientFailure::Build)
    })
    .map_err(|_| BuildClientFailure::Panic)?
}

/// Runs `operation` with the panic hook silenced, so a recovered builder
/// panic does not print a backtrace to stderr.
fn catch_unwind_silent<F, T>(operation: F) -> Result<T, Box<dyn Any + Send + 'static>>
where
    F: FnOnce() -> T + UnwindSafe,
{
    let _hook_guard = PANIC_HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous_hook = take_hook();
    set_hook(Box::new(|_| {}));
    let outcome = catch_unwind(operation);
    set_hook(previous_hook);
    outcome
}

fn base_builder() -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(default_user_agent())
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"])
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
