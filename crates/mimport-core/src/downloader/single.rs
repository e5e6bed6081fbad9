//! Single-stream HTTP GET into a temp file, promoted by rename on success.

use std::io::{self, Write};
use std::path::Path;

use super::FetchOptions;
use crate::retry::FetchError;
use crate::storage::{temp_path, TempFileWriter};

const USER_AGENT: &str = concat!("mimport/", env!("CARGO_PKG_VERSION"));

/// One download attempt. On success the body is at `dest` and the byte count
/// is returned. On failure the temp file is removed and `dest` is untouched.
pub(super) fn fetch_once(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let tmp = temp_path(dest, &opts.temp_suffix);
    let mut writer = TempFileWriter::create(&tmp)?;
    match get_into(url, &mut writer, opts) {
        Ok(()) => {
            let written = writer.bytes_written();
            writer.finalize(dest)?;
            Ok(written)
        }
        Err(e) => {
            writer.discard();
            Err(e)
        }
    }
}

fn get_into(url: &str, writer: &mut TempFileWriter, opts: &FetchOptions) -> Result<(), FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(opts.timeout)?;
    // Stall timeout: fail when not a single byte arrives for a whole window.
    easy.low_speed_limit(1)?;
    easy.low_speed_time(opts.timeout)?;
    if let Some(total) = opts.transfer_timeout {
        easy.timeout(total)?;
    }

    let mut write_error: Option<io::Error> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match writer.write_all(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_error {
        return Err(FetchError::Storage(e));
    }
    performed?;

    // 0 means the scheme has no status line (file://).
    let code = easy.response_code()?;
    if code != 0 && !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(())
}
