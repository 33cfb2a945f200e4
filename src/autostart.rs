// Start-on-login entry, kept outside the sampler.
// On Linux desktops this is an XDG autostart entry: <config_dir>/autostart/<app>.desktop.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DESKTOP_FILE_NAME: &str = "speedometer.desktop";

/// Narrow capability the UI layer calls to manage start-on-login.
pub trait Autostart {
    fn enable(&self) -> anyhow::Result<()>;
    fn disable(&self) -> anyhow::Result<()>;
    fn is_enabled(&self) -> bool;
}

pub struct XdgAutostart {
    autostart_dir: PathBuf,
    exec_path: PathBuf,
}

impl XdgAutostart {
    pub fn new(config_dir: impl AsRef<Path>, exec_path: impl Into<PathBuf>) -> Self {
        Self {
            autostart_dir: config_dir.as_ref().join("autostart"),
            exec_path: exec_path.into(),
        }
    }

    /// `$XDG_CONFIG_HOME`, else `$HOME/.config`, with the running executable as target.
    pub fn from_env() -> anyhow::Result<Self> {
        let config_dir = match std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = std::env::var_os("HOME").context("neither XDG_CONFIG_HOME nor HOME is set")?;
                PathBuf::from(home).join(".config")
            }
        };
        let exec_path = std::env::current_exe().context("resolve current executable")?;
        Ok(Self::new(config_dir, exec_path))
    }

    pub fn entry_path(&self) -> PathBuf {
        self.autostart_dir.join(DESKTOP_FILE_NAME)
    }

    fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\nType=Application\nName=SpeedoMeter\nComment=Network speed monitor\nExec=\"{}\"\nTerminal=false\nX-GNOME-Autostart-enabled=true\n",
            self.exec_path.display()
        )
    }
}

impl Autostart for XdgAutostart {
    fn enable(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.exec_path.exists(),
            "executable not found: {}",
            self.exec_path.display()
        );
        std::fs::create_dir_all(&self.autostart_dir)
            .with_context(|| format!("create {}", self.autostart_dir.display()))?;
        let path = self.entry_path();
        std::fs::write(&path, self.desktop_entry())
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "autostart enabled");
        Ok(())
    }

    fn disable(&self) -> anyhow::Result<()> {
        let path = self.entry_path();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "autostart disabled");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "autostart entry already absent");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }

    fn is_enabled(&self) -> bool {
        self.entry_path().is_file()
    }
}
