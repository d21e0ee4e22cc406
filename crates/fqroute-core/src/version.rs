// Firmware version gate.
//
// Domain routing (`object-group fqdn` + `dns-proxy route`) first shipped
// in firmware 5.0.1. The gate runs before any state fetch or planning,
// so an unsupported device sees no I/O at all.
//
// Firmware strings are dotted numeric components ("5.1.0", "4.3.6.2"),
// not semver -- comparison is numeric per component, missing trailing
// components count as zero.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Minimum firmware release supporting domain routing.
pub const MIN_FIRMWARE: &str = "5.0.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersion {
    components: Vec<u64>,
    raw: String,
}

impl FromStr for FirmwareVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::NotAuthenticated);
        }
        let components = trimmed
            .split('.')
            .map(|part| {
                // Tolerate suffixed components like "1-beta": compare on
                // the leading digits only.
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse::<u64>().map_err(|_| CoreError::Config {
                    message: format!("unparseable firmware version '{trimmed}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            components,
            raw: trimmed.to_owned(),
        })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for FirmwareVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for FirmwareVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Check the cached device firmware against [`MIN_FIRMWARE`].
///
/// `None` or an empty string means no version was cached during
/// authentication -- treated as fatal, no device I/O is attempted.
pub fn check(cached: Option<&str>) -> Result<(), CoreError> {
    let raw = cached.ok_or(CoreError::NotAuthenticated)?;
    let current: FirmwareVersion = raw.parse()?;
    let minimum: FirmwareVersion = MIN_FIRMWARE
        .parse()
        .expect("MIN_FIRMWARE is a valid version literal");

    if current < minimum {
        return Err(CoreError::UnsupportedFirmware {
            current: current.to_string(),
            required: MIN_FIRMWARE.into(),
        });
    }
    Ok(())
}
