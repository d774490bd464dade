//! Detail route opener

use std::process::Command;

use eiga_core::prelude::*;

pub(super) fn spawn_open_detail(url: String, browser: String) {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = open_url_in_browser(&url, &browser) {
            warn!("Failed to open {}: {}", url, e);
        }
    });
}

/// Open `url` with `browser`, or the platform opener when `browser` is empty
pub(crate) fn open_url_in_browser(url: &str, browser: &str) -> std::io::Result<()> {
    if !browser.is_empty() {
        Command::new(browser).arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd").args(["/C", "start", "", url]).spawn()?;
        return Ok(());
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no browser opener available for this platform",
        ));
    }

    #[allow(unreachable_code)]
    Ok(())
}
