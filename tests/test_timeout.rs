use std::io;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

#[test]
fn request_fails_due_to_read_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let thread = thread::spawn(move || {
        let _stream = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(500));
    });

    let result = statfetch::get(format!("http://127.0.0.1:{}", port))
        .read_timeout(Duration::from_millis(100))
        .send();

    match result {
        Err(err) => match err.kind() {
            statfetch::ErrorKind::Io(err) => match err.kind() {
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => (),
                err => panic!("Unexpected I/O error: {:?}", err),
            },
            err => panic!("Unexpected error: {:?}", err),
        },
        Ok(resp) => panic!("Unexpected response: {:?}", resp),
    }

    thread.join().unwrap();
}

#[test]
fn request_fails_due_to_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let thread = thread::spawn(move || {
        let _stream = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(500));
    });

    let result = statfetch::get(format!("http://127.0.0.1:{}", port))
        .timeout(Duration::from_millis(100))
        .send();

    match result {
        Err(err) => match err.kind() {
            statfetch::ErrorKind::Io(err) => match err.kind() {
                io::ErrorKind::TimedOut => (),
                err => panic!("Unexpected I/O error: {:?}", err),
            },
            err => panic!("Unexpected error: {:?}", err),
        },
        Ok(resp) => panic!("Unexpected response: {:?}", resp),
    }

    thread.join().unwrap();
}

#[test]
fn connect_fails_on_closed_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = statfetch::get(format!("http://127.0.0.1:{}", port))
        .connect_timeout(Duration::from_millis(500))
        .send();

    match result {
        Err(err) => match err.kind() {
            statfetch::ErrorKind::Io(_) => (),
            err => panic!("Unexpected error: {:?}", err),
        },
        Ok(resp) => panic!("Unexpected response: {:?}", resp),
    }
}
