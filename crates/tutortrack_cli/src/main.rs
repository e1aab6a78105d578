//! Interactive shell for TutorTrack.
//!
//! # Responsibility
//! - Build the app context from CLI flags and load stored data.
//! - Read one command per line from stdin and print its feedback.
//! - Render the visible student list whenever the filtered view changes.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tutortrack_core::config::DEFAULT_CONFIG_FILE;
use tutortrack_core::{AppContext, LogicManager, Student};

#[derive(Debug, Parser)]
#[command(name = "tutortrack", version, about = "Track students, tutorials and assignments")]
struct Args {
    /// Directory holding data files, preferences and logs.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Config file; relative paths resolve against the data directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured log level.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = std::path::absolute(&args.data_dir)
        .with_context(|| format!("invalid data directory `{}`", args.data_dir.display()))?;
    let config_path = match &args.config {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => data_dir.join(path),
        None => data_dir.join(DEFAULT_CONFIG_FILE),
    };

    let context = AppContext::new(&config_path, &data_dir, args.log_level.as_deref())
        .context("failed to start tutortrack")?;
    let mut logic = LogicManager::from_context(&context);

    let stdout = io::stdout();
    logic.model_mut().subscribe(|students| {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", render_students(students));
    });

    {
        let mut out = stdout.lock();
        writeln!(out, "{}", render_students(logic.model().filtered_student_list()))?;
        writeln!(out, "Type `help` for the list of commands.")?;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = logic.execute(&line);
        let mut out = stdout.lock();
        match outcome {
            Ok(result) => {
                writeln!(out, "{}", result.feedback)?;
                if result.exit {
                    break;
                }
            }
            Err(err) => writeln!(out, "Error: {err}")?,
        }
        out.flush()?;
    }

    if let Err(err) = logic.save_user_prefs() {
        warn!(
            "event=app_stop module=cli status=error error_code=prefs_save_failed error={}",
            err
        );
    }
    info!("event=app_stop module=cli status=ok");
    if let Some(logging) = context.logging() {
        logging.flush();
    }
    Ok(())
}

fn render_students(students: &[Student]) -> String {
    if students.is_empty() {
        return "(no students to show)".to_string();
    }
    students
        .iter()
        .enumerate()
        .map(|(index, student)| format!("{:>3}. {student}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
