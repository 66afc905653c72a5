//! `server.properties` reader.

use std::fs;
use std::io;
use std::path::Path;

use mcctl_core::domain::ServerProperties;

/// File name inside the server directory.
pub const PROPERTIES_FILE: &str = "server.properties";

/// Read `server.properties` from `server_dir`. `Ok(None)` if it does not exist.
pub fn read_server_properties(server_dir: &Path) -> io::Result<Option<ServerProperties>> {
    match fs::read(server_dir.join(PROPERTIES_FILE)) {
        Ok(bytes) => Ok(Some(ServerProperties::parse(&String::from_utf8_lossy(&bytes)))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
