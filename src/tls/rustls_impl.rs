use std::convert::TryFrom;
use std::fmt;
use std::io;
use std::io::prelude::*;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use webpki_roots::TLS_SERVER_ROOTS;

use crate::{ErrorKind, Result};

pub struct TlsHandshaker {
    config: Option<Arc<ClientConfig>>,
}

impl TlsHandshaker {
    pub fn new() -> TlsHandshaker {
        TlsHandshaker { config: None }
    }

    fn client_config(&mut self) -> Result<Arc<ClientConfig>> {
        if let Some(config) = &self.config {
            return Ok(Arc::clone(config));
        }

        let mut root_store = RootCertStore::empty();
        root_store.extend(TLS_SERVER_ROOTS.iter().cloned());

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = Arc::new(
            ClientConfig::builder_with_provider(provider)
                .with_safe_default_protocol_versions()?
                .with_root_certificates(root_store)
                .with_no_client_auth(),
        );

        self.config = Some(Arc::clone(&config));
        Ok(config)
    }

    pub fn handshake<S>(&mut self, domain: &str, mut stream: S) -> Result<TlsStream<S>>
    where
        S: Read + Write,
    {
        let server_name =
            ServerName::try_from(domain.to_owned()).map_err(|_| ErrorKind::InvalidDnsName(domain.to_owned()))?;
        let config = self.client_config()?;
        let mut conn = ClientConnection::new(config, server_name)?;

        while conn.is_handshaking() {
            conn.complete_io(&mut stream)?;
        }

        debug!("TLS handshake with {} complete", domain);

        Ok(TlsStream {
            inner: StreamOwned::new(conn, stream),
        })
    }
}

pub struct TlsStream<S>
where
    S: Read + Write,
{
    inner: StreamOwned<ClientConnection, S>,
}

impl<S> Read for TlsStream<S>
where
    S: Read + Write,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            // A missing close_notify is EOF here; body framing detects truncation.
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("peer closed the TLS session without close_notify");
                Ok(0)
            }
            res => res,
        }
    }
}

impl<S> Write for TlsStream<S>
where
    S: Read + Write,
{
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<S> fmt::Debug for TlsStream<S>
where
    S: Read + Write,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TlsStream[rustls]")
    }
}

#[test]
fn test_handshake_rejects_invalid_dns_name() {
    let mut handshaker = TlsHandshaker::new();
    let err = handshaker
        .handshake("not a host name", io::Cursor::new(Vec::new()))
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidDnsName(name) if name == "not a host name"));
}
