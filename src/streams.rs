#[cfg(test)]
use std::io::Cursor;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::mpsc;
use std::thread;

use url::{Host, Url};

use crate::happy;
use crate::request::BaseSettings;
use crate::tls::{TlsHandshaker, TlsStream};
use crate::{ErrorKind, Result};

pub struct ConnectInfo<'a> {
    pub url: &'a Url,
    pub base_settings: &'a BaseSettings,
}

/// The connection a single request/response exchange runs over.
///
/// The socket lives exactly as long as this value: the response body reader owns it,
/// and dropping the response (or an error unwinding past it) shuts it down.
#[derive(Debug)]
pub enum BaseStream {
    Plain {
        stream: TcpStream,
        timeout: Option<mpsc::Sender<()>>,
    },
    Tls {
        stream: Box<TlsStream<TcpStream>>,
        timeout: Option<mpsc::Sender<()>>,
    },
    #[cfg(test)]
    Mock(Cursor<Vec<u8>>),
}

impl BaseStream {
    pub fn connect(info: &ConnectInfo) -> Result<BaseStream> {
        let host = info.url.host().ok_or(ErrorKind::InvalidUrlHost)?;
        let port = info.url.port_or_known_default().ok_or(ErrorKind::InvalidUrlPort)?;

        debug!("trying to connect to {}:{}", host, port);

        match info.url.scheme() {
            "http" => BaseStream::connect_tcp(&host, port, info).map(|(stream, timeout)| BaseStream::Plain { stream, timeout }),
            "https" => BaseStream::connect_tls(&host, port, info),
            _ => Err(ErrorKind::InvalidBaseUrl.into()),
        }
    }

    fn connect_tcp(host: &Host<&str>, port: u16, info: &ConnectInfo) -> Result<(TcpStream, Option<mpsc::Sender<()>>)> {
        let stream = match host {
            Host::Domain(domain) => happy::connect((*domain, port), info.base_settings.connect_timeout)?,
            Host::Ipv4(ip) => happy::connect((*ip, port), info.base_settings.connect_timeout)?,
            Host::Ipv6(ip) => happy::connect((*ip, port), info.base_settings.connect_timeout)?,
        };
        stream.set_read_timeout(Some(info.base_settings.read_timeout))?;

        let timeout = info
            .base_settings
            .timeout
            .map(|timeout| -> Result<mpsc::Sender<()>> {
                let stream = stream.try_clone()?;
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    // The sender is dropped when the exchange finishes, which disconnects
                    // the channel and lets this thread exit without touching the socket.
                    if let Err(mpsc::RecvTimeoutError::Timeout) = rx.recv_timeout(timeout) {
                        debug!("request timed out, shutting down the socket");
                        let _ = stream.shutdown(Shutdown::Both);
                    }
                });
                Ok(tx)
            })
            .transpose()?;

        Ok((stream, timeout))
    }

    fn connect_tls(host: &Host<&str>, port: u16, info: &ConnectInfo) -> Result<BaseStream> {
        let (stream, timeout) = BaseStream::connect_tcp(host, port, info)?;
        let mut handshaker = TlsHandshaker::new();
        let stream = handshaker.handshake(&host.to_string(), stream)?;
        Ok(BaseStream::Tls {
            stream: Box::new(stream),
            timeout,
        })
    }

    #[cfg(test)]
    pub fn mock(bytes: Vec<u8>) -> BaseStream {
        BaseStream::Mock(Cursor::new(bytes))
    }
}

impl Read for BaseStream {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BaseStream::Plain { stream, timeout } => read_timeout(stream, buf, timeout),
            BaseStream::Tls { stream, timeout } => read_timeout(stream, buf, timeout),
            #[cfg(test)]
            BaseStream::Mock(s) => s.read(buf),
        }
    }
}

impl Write for BaseStream {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            BaseStream::Plain { stream, .. } => stream.write(buf),
            BaseStream::Tls { stream, .. } => stream.write(buf),
            #[cfg(test)]
            BaseStream::Mock(_) => Ok(buf.len()),
        }
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        match self {
            BaseStream::Plain { stream, .. } => stream.flush(),
            BaseStream::Tls { stream, .. } => stream.flush(),
            #[cfg(test)]
            BaseStream::Mock(_) => Ok(()),
        }
    }
}

impl Drop for BaseStream {
    fn drop(&mut self) {
        if let BaseStream::Plain { stream, .. } = self {
            debug!("closing connection");
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

/// A read returning 0 bytes on a connection guarded by a watchdog means either EOF or that the
/// watchdog fired and shut the socket down. The send fails only in the second case.
fn read_timeout(stream: &mut impl Read, buf: &mut [u8], timeout: &Option<mpsc::Sender<()>>) -> io::Result<usize> {
    let read = stream.read(buf)?;

    if let Some(timeout) = timeout {
        if read == 0 && !buf.is_empty() && timeout.send(()).is_err() {
            return Err(io::ErrorKind::TimedOut.into());
        }
    }

    Ok(read)
}
