//! Save a text file for each step of a solution

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::puzzle::render::render_candidates;
use crate::puzzle::PuzzleView;
use crate::solve::Step;

static STEP_EXTENSION: &str = "txt";

pub(crate) struct StepWriter {
    index: u32,
    path: PathBuf,
}

impl StepWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { index: 1, path }
    }

    pub fn write_step<P: PuzzleView>(&mut self, step: &Step<P>) -> Result<()> {
        let mut path = self.path.clone();
        path.push(format!(
            "{:02}_{}.{}",
            self.index,
            file_stem(step.strategy),
            STEP_EXTENSION
        ));
        self.write(&path, step)?;
        self.index += 1;
        Ok(())
    }

    fn write<P: PuzzleView>(&self, path: &Path, step: &Step<P>) -> Result<()> {
        debug!("writing step: {}", path.display());
        fs::create_dir_all(&self.path)
            .with_context(|| format!("Error creating step directory {}", self.path.display()))?;
        let mut text = String::new();
        writeln!(text, "{}", step.strategy)?;
        if !step.report.explanation.is_empty() {
            writeln!(text, "{}", step.report.explanation)?;
        }
        writeln!(text, "changes: {}", step.changes.iter().join(", "))?;
        for highlight in &step.report.highlights {
            writeln!(text, "  {}", highlight)?;
        }
        writeln!(text)?;
        writeln!(text, "{}", render_candidates(&step.after))?;
        fs::write(path, text)
            .with_context(|| format!("Error saving step to {}", path.display()))?;
        Ok(())
    }
}

fn file_stem(strategy: &str) -> String {
    strategy
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .join("_")
}
