/*  Copyright (C) 2023 by the compdb authors
    This file is part of compdb.

    compdb is a tool to generate compilation database for legacy C++ trees.

    compdb is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    compdb is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{arg, ArgAction, command};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use crate::compilation::{Compilation, Entry};
use crate::configuration::Configuration;

mod compilation;
mod configuration;
mod output;
mod paths;
mod rename;
mod sources;
mod walk;

fn main() -> Result<()> {
    let arguments = Arguments::parse();
    let application = Application::configure(arguments)?;
    application.run()?;

    Ok(())
}

#[derive(Debug, PartialEq)]
struct Arguments {
    config: Option<String>,
    output: Option<String>,
    verbose: u8,
}

impl Arguments {
    fn parse() -> Self {
        let matches = command!()
            .args(&[
                arg!(-c --config <FILE> "Path of the config file"),
                arg!(-o --output <FILE> "Path of the result file [default: compile_commands.json]"),
                arg!(-v --verbose ... "Sets the level of verbosity")
                    .action(ArgAction::Count),
            ])
            .get_matches();

        Arguments {
            config: matches.get_one::<String>("config")
                .map(String::to_string),
            output: matches.get_one::<String>("output")
                .map(String::to_string),
            verbose: matches.get_count("verbose"),
        }
    }

    fn prepare_logging(&self) -> Result<()> {
        let level = match &self.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let mut logger = SimpleLogger::new()
            .with_level(level);
        if level <= LevelFilter::Debug {
            logger = logger.with_local_timestamps()
        }
        logger.init()?;

        Ok(())
    }

    fn configuration(&self) -> Result<Configuration> {
        let mut configuration = match self.config.as_deref() {
            Some(file) =>
                configuration::io::from_file(Path::new(file))
                    .with_context(|| format!("Failed to read configuration from file: {}", file))?,
            None =>
                Configuration::default(),
        };
        if let Some(output) = &self.output {
            configuration.output = PathBuf::from(output);
        }
        Ok(configuration)
    }
}

#[derive(Debug, PartialEq)]
struct Application {
    configuration: Configuration,
}

impl Application {
    fn configure(arguments: Arguments) -> Result<Self> {
        arguments.prepare_logging()?;

        let configuration = arguments.configuration()?;
        log::debug!("{:?}", configuration);

        Ok(Application { configuration })
    }

    fn run(self) -> Result<()> {
        let root = std::env::current_dir()
            .context("Failed to get the current directory")?;

        let count = generate(&self.configuration, &root)?;
        log::info!("Written {} entries into {:?}", count, self.configuration.output);

        Ok(())
    }
}

/// Runs the whole pipeline, relative paths of the configuration are taken
/// from the given root directory. Returns the number of entries written.
///
/// Source files are renamed on disk while this runs. When it fails midway,
/// the files renamed until then stay renamed.
fn generate(configuration: &Configuration, root: &Path) -> Result<usize> {
    let working_dir = paths::into_abspath(&configuration.working_directory, root)?;
    fs::create_dir_all(&working_dir)
        .with_context(|| format!("Failed to create directory: {:?}", working_dir))?;

    let mut entries: Vec<Entry> = vec![];
    for source_root in &configuration.source_roots {
        let source_root = paths::into_abspath(source_root, root)?;
        log::info!("Scanning {:?}", source_root);

        let files = collect_files(&source_root)?;
        let renames = rename::rename_all(files)
            .with_context(|| format!("Failed to rename files in: {:?}", source_root))?;
        log::info!("Renamed {} files in {:?}",
            renames.iter().filter(|rename| rename.is_effective()).count(),
            source_root);

        for source in renames.into_iter().map(|rename| rename.to) {
            if !sources::is_translation_unit(&source) {
                log::debug!("Skipping {:?}", source);
                continue;
            }
            let compilation = Compilation {
                working_dir: &working_dir,
                compiler: &configuration.compiler_path,
                standard: &configuration.language_standard,
                source_root: &source_root,
                source: &source,
            };
            let entry: Entry = compilation.try_into()
                .with_context(|| format!("Failed to create entry for: {:?}", source))?;
            log::debug!("{:?}", entry);
            entries.push(entry);
        }
    }

    let output = paths::into_abspath(&configuration.output, root)?;
    output::write(&output, &entries)
        .with_context(|| format!("Failed to write file: {:?}", output))?;

    Ok(entries.len())
}

// The files of the source root which are not excluded from the process.
fn collect_files(source_root: &Path) -> Result<Vec<PathBuf>> {
    let mut result = vec![];
    for file in walk::files(source_root)? {
        let file = file.with_context(|| format!("Failed to list files in: {:?}", source_root))?;
        if sources::is_excluded(&file) {
            log::debug!("Excluding {:?}", file);
        } else {
            result.push(file);
        }
    }
    Ok(result)
}
