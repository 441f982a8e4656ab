//! Opening rendered files with the platform viewer

use crate::warn;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Open each file in the background; failures are only warned about
pub fn open_files(paths: &[PathBuf]) {
    for path in paths {
        let spawned = viewer_command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            warn!("Could not open {}: {}", path.display(), e);
        }
    }
}
