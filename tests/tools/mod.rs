#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Read the request head and return its request target.
fn read_target(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
            break;
        }
    }

    request_line.split(' ').nth(1).unwrap_or("/").to_owned()
}

/// Start a server on an ephemeral port that answers every connection with `handler(target)` and
/// then closes the connection. Returns the port.
pub fn start_server<F>(handler: F) -> u16
where
    F: Fn(&str) -> Vec<u8> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(_) => continue,
            };
            let target = read_target(&stream);
            let _ = stream.write_all(&handler(&target));
        }
    });

    port
}

/// Start a server that answers every request with the same bytes.
pub fn start_canned_server(response: &'static [u8]) -> u16 {
    start_server(move |_| response.to_vec())
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
