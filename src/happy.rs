use std::io;
use std::iter::FusedIterator;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
const RACE_DELAY: Duration = Duration::from_millis(200);

/// Connect to the first reachable address among the ones `addrs` resolves to.
///
/// This is a basic form of happy eyeballs (RFC 8305): IPv6 and IPv4 addresses are
/// alternated, a new attempt starts every 200ms while earlier ones are still pending,
/// and the first socket to connect wins. The losing attempts run to completion on
/// their own threads and their sockets are dropped.
///
/// If the timeout is not provided, a default timeout of 10 seconds is used for every attempt.
pub fn connect<A>(addrs: A, timeout: impl Into<Option<Duration>>) -> io::Result<TcpStream>
where
    A: ToSocketAddrs,
{
    let timeout = timeout.into().unwrap_or(DEFAULT_CONNECTION_TIMEOUT);
    let addrs: Vec<SocketAddr> = addrs.to_socket_addrs()?.collect();

    if let [addr] = &addrs[..] {
        debug!("DNS returned only one address, using fast path");
        return TcpStream::connect_timeout(addr, timeout);
    }

    let ipv6 = addrs.iter().filter(|a| a.is_ipv6()).copied();
    let ipv4 = addrs.iter().filter(|a| a.is_ipv4()).copied();

    let start = Instant::now();
    let (tx, rx) = channel();
    let mut race = Race::default();

    for addr in interleave(ipv6, ipv4) {
        let tx = tx.clone();
        thread::spawn(move || {
            debug!("trying to connect to {}", addr);
            let _ = tx.send(TcpStream::connect_timeout(&addr, timeout));
        });

        match rx.recv_timeout(RACE_DELAY) {
            Ok(attempt) => {
                if let Some(sock) = race.record(attempt) {
                    debug!("connected to {}, took {}ms", addr, start.elapsed().as_millis());
                    return Ok(sock);
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => unreachable!(),
        }
    }

    // Every attempt thread holds a clone of the sender; dropping ours lets the
    // channel disconnect once the last pending attempt reports back.
    drop(tx);

    if let Some(sock) = race.drain(rx) {
        debug!("connected, took {}ms", start.elapsed().as_millis());
        return Ok(sock);
    }

    debug!(
        "could not connect to any address, took {}ms",
        start.elapsed().as_millis()
    );

    Err(race
        .first_err
        .unwrap_or_else(|| io::ErrorKind::ConnectionRefused.into()))
}

#[derive(Default)]
struct Race {
    first_err: Option<io::Error>,
}

impl Race {
    fn record(&mut self, attempt: io::Result<TcpStream>) -> Option<TcpStream> {
        match attempt {
            Ok(sock) => Some(sock),
            Err(err) => {
                debug!("connection error: {}", err);
                if self.first_err.is_none() {
                    self.first_err = Some(err);
                }
                None
            }
        }
    }

    fn drain(&mut self, rx: Receiver<io::Result<TcpStream>>) -> Option<TcpStream> {
        rx.into_iter().find_map(|attempt| self.record(attempt))
    }
}

fn interleave<T, A, B>(mut left: A, mut right: B) -> impl Iterator<Item = T>
where
    A: FusedIterator<Item = T>,
    B: FusedIterator<Item = T>,
{
    let mut pending = None;

    std::iter::from_fn(move || {
        if let Some(item) = pending.take() {
            return Some(item);
        }

        match (left.next(), right.next()) {
            (Some(a), Some(b)) => {
                pending = Some(b);
                Some(a)
            }
            (a, b) => a.or(b),
        }
    })
}

#[test]
fn test_interleave_even() {
    let x: Vec<u32> = interleave(vec![1, 2, 3].into_iter(), vec![4, 5, 6].into_iter()).collect();
    assert_eq!(&x[..], &[1, 4, 2, 5, 3, 6][..]);
}

#[test]
fn test_interleave_left_longer() {
    let x: Vec<u32> = interleave(vec![1, 2, 3, 100, 101].into_iter(), vec![4, 5, 6].into_iter()).collect();
    assert_eq!(&x[..], &[1, 4, 2, 5, 3, 6, 100, 101][..]);
}

#[test]
fn test_interleave_right_longer() {
    let x: Vec<u32> = interleave(vec![1, 2, 3].into_iter(), vec![4, 5, 6, 100, 101].into_iter()).collect();
    assert_eq!(&x[..], &[1, 4, 2, 5, 3, 6, 100, 101][..]);
}

#[test]
fn test_connect_refused_single_address() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = connect(addr, Duration::from_secs(1)).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
}
