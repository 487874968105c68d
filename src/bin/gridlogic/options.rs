use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use gridlogic::puzzle::Family;

#[derive(Clone, Debug)]
pub(crate) struct Options {
    source: Source,
    family: Family,
    save_steps: Option<PathBuf>,
    max_difficulty: Option<u32>,
    history: bool,
}

impl Options {
    pub fn from_args() -> Result<Self> {
        Self::from_arg_matches(&clap_app().get_matches())
    }

    fn from_arg_matches(matches: &ArgMatches<'_>) -> Result<Self> {
        let source = if let Some(path) = matches.value_of("input") {
            Source::File(path.into())
        } else if let Some(puzzle) = matches.value_of("puzzle") {
            Source::Text(puzzle.to_owned())
        } else {
            return Err(anyhow!("no puzzle given"));
        };
        let family = match matches.value_of("family") {
            Some(s) => s.parse().map_err(|e: String| anyhow!(e))?,
            None => Family::Sudoku,
        };
        let max_difficulty = matches
            .value_of("max_difficulty")
            .map(|s| {
                s.parse::<u32>()
                    .with_context(|| format!("invalid max difficulty: {}", s))
            })
            .transpose()?;
        Ok(Self {
            source,
            family,
            save_steps: matches.value_of("save_steps").map(PathBuf::from),
            max_difficulty,
            history: matches.is_present("history"),
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn save_steps(&self) -> Option<&Path> {
        self.save_steps.as_deref()
    }

    pub fn max_difficulty(&self) -> Option<u32> {
        self.max_difficulty
    }

    pub fn history(&self) -> bool {
        self.history
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Source {
    File(PathBuf),
    Text(String),
}

fn clap_app() -> clap::App<'static, 'static> {
    use clap::{App, AppSettings, Arg, ArgGroup};

    App::new("gridlogic")
        .author("Cameron Steffen <cam.steffen94@gmail.com>")
        .about("Solve grid logic puzzles step by step")
        .setting(AppSettings::ArgRequiredElseHelp)
        .group(
            ArgGroup::with_name("source")
                .args(&["input", "puzzle"])
                .required(true),
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .value_name("PATH")
                .help("read a puzzle from a file")
                .display_order(1),
        )
        .arg(
            Arg::with_name("puzzle")
                .value_name("PUZZLE")
                .help("a puzzle, one character per cell, '.' or '0' for blanks")
                .index(1),
        )
        .arg(
            Arg::with_name("family")
                .short("f")
                .long("family")
                .takes_value(true)
                .possible_values(&["sudoku", "latin"])
                .default_value("sudoku")
                .help("the rules of the puzzle"),
        )
        .arg(
            Arg::with_name("save_steps")
                .long("save-steps")
                .takes_value(true)
                .value_name("PATH")
                .help("write every step to a directory"),
        )
        .arg(
            Arg::with_name("max_difficulty")
                .short("d")
                .long("max-difficulty")
                .takes_value(true)
                .value_name("N")
                .help("skip strategies harder than N"),
        )
        .arg(
            Arg::with_name("history")
                .long("history")
                .help("print every step taken"),
        )
}
