//! Input device resolution and validation.
//!
//! Devices are selected in the config file by numeric index (as printed by
//! `tandem list-devices`), by exact name, or as "default" for the system
//! default input. Both channels must resolve to an input-capable device
//! before a session is allowed to start.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Resolves a device selector to a cpal input device.
///
/// # Arguments
/// * `selector` - "default", a numeric index (0, 1, 2, ...), or a device name
///
/// # Errors
/// - If the selector is empty
/// - If no device with the given index or name exists
pub fn resolve(selector: &str) -> Result<cpal::Device> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(anyhow!("No input device selected"));
    }

    suppress_alsa_warnings(|| {
        let host = cpal::default_host();

        if selector == "default" {
            return host
                .default_input_device()
                .ok_or_else(|| anyhow!("No default audio input device available"));
        }

        // Numeric index first, matching the IDs printed by `tandem list-devices`
        if let Ok(index) = selector.parse::<usize>() {
            let devices: Vec<_> = host
                .input_devices()
                .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
                .collect();

            return devices.into_iter().nth(index).ok_or_else(|| {
                anyhow!("Device index {index} is out of range. Use 'tandem list-devices' to see available devices.")
            });
        }

        let devices = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?;

        for device in devices {
            if let Ok(name) = device.name() {
                if name == selector {
                    return Ok(device);
                }
            }
        }

        Err(anyhow!(
            "Audio input device '{selector}' not found. Use 'tandem list-devices' to see available devices."
        ))
    })
}

/// Resolves a selector and verifies the device can actually capture audio.
///
/// Returns the device name for logging. A device with no usable input
/// configuration (zero input channels) is rejected here, before any capture
/// thread is spawned.
///
/// # Errors
/// - If resolution fails (see [`resolve`])
/// - If the device reports no input configuration
pub fn validate_input(selector: &str) -> Result<String> {
    let device = resolve(selector)?;
    let name = device.name().unwrap_or_else(|_| "Unknown device".to_string());

    let config = device.default_input_config().map_err(|e| {
        anyhow!("Device '{name}' cannot capture audio (no input configuration): {e}")
    })?;

    if config.channels() == 0 {
        return Err(anyhow!("Device '{name}' reports zero input channels"));
    }

    tracing::debug!(
        "Validated input device '{}': {}Hz, {} channels, {:?}",
        name,
        config.sample_rate().0,
        config.channels(),
        config.sample_format()
    );

    Ok(name)
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
pub fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    // Open /dev/null for writing
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    // Save the current stderr file descriptor
    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    // Redirect stderr to /dev/null
    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    // Execute the closure
    let result = f();

    // Restore the original stderr
    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
pub fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selector_is_rejected_without_touching_the_host() {
        assert!(resolve("").is_err());
        assert!(resolve("   ").is_err());
    }
}
