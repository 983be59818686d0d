//! Blocking HTTP over libcurl: buffered GET/POST and streaming GET to a file.

use curl::easy::{Easy, List};
use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

use super::StoreError;

fn configure(easy: &mut Easy, url: &str, headers: &[String]) -> Result<(), StoreError> {
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(30))?;
    // Abort stalled transfers instead of hanging the CI job.
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    if !headers.is_empty() {
        let mut list = List::new();
        for h in headers {
            list.append(h)?;
        }
        easy.http_headers(list)?;
    }
    Ok(())
}

fn check_status(easy: &mut Easy, url: &str) -> Result<(), StoreError> {
    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(StoreError::Http {
            status,
            url: url.to_string(),
        });
    }
    Ok(())
}

/// GET (or POST `form_body`) and return the whole response body.
pub(crate) fn fetch_bytes(
    url: &str,
    headers: &[String],
    form_body: Option<&str>,
) -> Result<Vec<u8>, StoreError> {
    let mut easy = Easy::new();
    configure(&mut easy, url, headers)?;
    easy.timeout(Duration::from_secs(120))?;
    if let Some(body) = form_body {
        easy.post(true)?;
        easy.post_fields_copy(body.as_bytes())?;
    }

    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    if let Err(e) = check_status(&mut easy, url) {
        tracing::debug!(
            "error body from {}: {}",
            url,
            String::from_utf8_lossy(&body[..body.len().min(512)])
        );
        return Err(e);
    }
    Ok(body)
}

/// GET `url` and stream the body into `file`. Returns bytes written.
pub(crate) fn fetch_to_file(url: &str, headers: &[String], file: &mut File) -> Result<u64, StoreError> {
    let mut easy = Easy::new();
    configure(&mut easy, url, headers)?;

    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(StoreError::Io(e));
    }
    performed?;
    check_status(&mut easy, url)?;
    file.flush()?;
    Ok(written)
}
