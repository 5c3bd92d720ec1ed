#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// An empty config file so the user's own configuration never leaks in.
fn empty_config() -> &'static Path {
    static CONFIG_DIR: OnceLock<(TempDir, std::path::PathBuf)> = OnceLock::new();
    let (_, path) = CONFIG_DIR.get_or_init(|| {
        let dir = tempfile::tempdir().expect("failed to create config dir for tests");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").expect("failed to write empty config");
        (dir, path)
    });
    path
}

/// Create a configured `excerpt` command suitable for integration tests.
#[allow(dead_code)]
pub fn excerpt_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("excerpt"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("EXCERPT_CONFIG", empty_config());
    cmd.env_remove("EXCERPT_FETCH_TIMEOUT_SECS");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// `excerpt` with a specific config file.
#[allow(dead_code)]
pub fn excerpt_cmd_with_config(config: &Path) -> Command {
    let mut cmd = excerpt_cmd();
    cmd.env("EXCERPT_CONFIG", config);
    cmd
}

/// Five-line NED module used across tests.
#[allow(dead_code)]
pub const WIRELESS_NED: &str = "\
package inet.tutorials.wireless;

// A wireless network
network WirelessA
{
    parameters:
        @display(\"bgb=650,500\");
    submodules:
        hostA: WirelessHost;
        hostB: WirelessHost;
}
";
