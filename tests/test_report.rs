mod tools;

use statfetch::{report, ErrorKind, HttpFetcher};

fn run(url: &str) -> (statfetch::Result, String) {
    let mut out = Vec::new();
    let res = report(&HttpFetcher, url, &mut out);
    (res, String::from_utf8(out).unwrap())
}

#[test]
fn test_report_json_body() {
    let port = tools::start_canned_server(
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 18\r\n\r\n{\"value\":[1,2,3]}\n",
    );
    let url = format!("http://127.0.0.1:{}/data?geo=NL&geo=DE", port);

    let (res, out) = run(&url);
    res.unwrap();
    assert_eq!(
        out,
        format!("{}\nRequest returned 200 : 'OK'\n{{'value': [1, 2, 3]}}\n", url)
    );
}

#[test]
fn test_report_chunked_body() {
    let port = tools::start_canned_server(
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n6\r\n{\"a\": \r\n5\r\nnull}\r\n0\r\n\r\n",
    );
    let url = format!("http://127.0.0.1:{}/", port);

    let (res, out) = run(&url);
    res.unwrap();
    assert!(out.ends_with("Request returned 200 : 'OK'\n{'a': None}\n"));
}

#[test]
fn test_report_body_read_until_close() {
    let port = tools::start_canned_server(b"HTTP/1.1 200 OK\r\n\r\n[\"x\", 1.0]");
    let url = format!("http://127.0.0.1:{}/", port);

    let (res, out) = run(&url);
    res.unwrap();
    assert!(out.ends_with("['x', 1.0]\n"));
}

#[test]
fn test_report_not_found_with_text_body() {
    let port = tools::start_canned_server(b"HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\n\r\noops");
    let url = format!("http://127.0.0.1:{}/missing", port);

    let (res, out) = run(&url);
    assert!(matches!(res.unwrap_err().kind(), ErrorKind::Json(_)));
    assert_eq!(out, format!("{}\nRequest returned 404 : 'Not Found'\n", url));
}

#[test]
fn test_report_missing_reason() {
    let port = tools::start_canned_server(b"HTTP/1.1 200\r\nContent-Length: 2\r\n\r\n{}");
    let url = format!("http://127.0.0.1:{}/", port);

    let (res, out) = run(&url);
    res.unwrap();
    assert_eq!(out, format!("{}\nRequest returned 200 : ''\n{{}}\n", url));
}

#[test]
fn test_report_connection_refused() {
    let url = format!("http://127.0.0.1:{}/", tools::closed_port());

    let (res, out) = run(&url);
    assert!(matches!(res.unwrap_err().kind(), ErrorKind::Io(_)));
    assert_eq!(out, format!("{}\n", url));
}

#[test]
fn test_report_twice_is_identical() {
    let port = tools::start_canned_server(
        b"HTTP/1.1 200 OK\r\nContent-Length: 28\r\n\r\n{\"b\": [2.5, true], \"a\": \"s\"}",
    );
    let url = format!("http://127.0.0.1:{}/", port);

    let (first, first_out) = run(&url);
    let (second, second_out) = run(&url);
    first.unwrap();
    second.unwrap();
    assert_eq!(first_out, second_out);
    assert!(first_out.ends_with("{'a': 's', 'b': [2.5, True]}\n"));
}
