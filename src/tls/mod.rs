#[cfg(feature = "tls-rustls")]
mod rustls_impl;

#[cfg(not(feature = "tls-rustls"))]
mod no_tls_impl;

#[cfg(feature = "tls-rustls")]
pub use rustls_impl::*;

#[cfg(not(feature = "tls-rustls"))]
pub use no_tls_impl::*;
