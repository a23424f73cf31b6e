//! Default values applied when the configuration file omits a setting.

use std::net::{IpAddr, Ipv4Addr};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "RESCAN_CONFIG";
/// Configuration file used when no path is supplied.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
/// Listen address for the HTTP host.
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
/// Listen port for the HTTP host.
pub const DEFAULT_PORT: u16 = 3030;
/// Log filter used when neither the file nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Name given to a Tdarr trigger without an explicit name.
pub const DEFAULT_TDARR_NAME: &str = "tdarr";
