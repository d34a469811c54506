use std::io;

use statfetch::{gdp_query_url, report, HttpFetcher};

fn main() -> statfetch::Result {
    env_logger::init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    report(&HttpFetcher, gdp_query_url(), &mut out)
}
