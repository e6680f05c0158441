//! Shared test fixtures: a minimal text-format body and scratch folders.

#![allow(dead_code)]

use sphio_core::{IoEnvironment, ParticleBody};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub type CallLog = Rc<RefCell<Vec<String>>>;

/// A body whose state is a list of numbers, stored one per line.
/// Uses the default `xml` extensions for restart and reload files and
/// refuses any path whose extension is not the one it declared.
pub struct TextBody {
    pub name: String,
    pub state: Vec<f64>,
    pub fail_restart_write: bool,
    pub fail_recording_write: bool,
    pub log: CallLog,
}

impl TextBody {
    pub fn new(name: &str, state: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            state: state.to_vec(),
            fail_restart_write: false,
            fail_recording_write: false,
            log: CallLog::default(),
        }
    }

    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = log.clone();
        self
    }

    fn write_state(&self, path: &Path, ext: &str) -> anyhow::Result<()> {
        expect_extension(path, ext)?;
        let text: String = self.state.iter().map(|v| format!("{v:.17e}\n")).collect();
        std::fs::write(path, text)?;
        Ok(())
    }

    fn read_state(&mut self, path: &Path, ext: &str) -> anyhow::Result<()> {
        expect_extension(path, ext)?;
        let text = std::fs::read_to_string(path)?;
        self.state = text
            .lines()
            .map(|l| l.trim().parse::<f64>())
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn note(&self, what: &str) {
        self.log.borrow_mut().push(format!("{what}:{}", self.name));
    }
}

impl ParticleBody for TextBody {
    fn name(&self) -> &str {
        &self.name
    }

    fn recording_extension(&self) -> &str {
        "vtp"
    }

    fn write_for_recording(&self, path: &Path) -> anyhow::Result<()> {
        self.note("record");
        if self.fail_recording_write {
            anyhow::bail!("renderer unavailable");
        }
        self.write_state(path, self.recording_extension())
    }

    fn write_for_restart(&self, path: &Path) -> anyhow::Result<()> {
        self.note("write_restart");
        if self.fail_restart_write {
            anyhow::bail!("disk full");
        }
        self.write_state(path, self.restart_extension())
    }

    fn read_for_restart(&mut self, path: &Path) -> anyhow::Result<()> {
        self.note("read_restart");
        let ext = self.restart_extension().to_string();
        self.read_state(path, &ext)
    }

    fn write_for_reload(&self, path: &Path) -> anyhow::Result<()> {
        self.note("write_reload");
        self.write_state(path, self.reload_extension())
    }

    fn read_for_reload(&mut self, path: &Path) -> anyhow::Result<()> {
        self.note("read_reload");
        let ext = self.reload_extension().to_string();
        self.read_state(path, &ext)
    }
}

fn expect_extension(path: &Path, ext: &str) -> anyhow::Result<()> {
    let actual = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    anyhow::ensure!(actual == ext, "unknown format extension {actual:?} on {}", path.display());
    Ok(())
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A scratch root with the three conventional folders and token width 6.
pub fn scratch_env() -> (tempfile::TempDir, IoEnvironment) {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let env = IoEnvironment::prepare(dir.path())
        .expect("prepare folders")
        .with_token_width(6);
    (dir, env)
}

pub fn file_names(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(folder)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
