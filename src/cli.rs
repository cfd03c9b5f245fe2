// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::core::{ScreeningService, ServiceClient};
use crate::session::Session;
use crate::staging::RawFile;
use crate::view::{TerminalView, View};

#[derive(Parser)]
#[command(name = "resume-shortlist")]
#[command(about = "Rank resumes against a job description and export the shortlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML configuration file (default: ./shortlist.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the scoring service
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// Directory receiving shortlisted_candidates.csv
    #[arg(long, global = true)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank a set of resumes once and print the shortlist
    Screen {
        /// Job description text
        #[arg(long, conflicts_with = "job_file")]
        job: Option<String>,
        /// Read the job description from a file
        #[arg(long)]
        job_file: Option<PathBuf>,
        /// Also export the shortlist as CSV
        #[arg(long)]
        export: bool,
        /// Resume files (pdf, docx, doc)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Interactive session reading commands from stdin
    Shell,
}

impl Cli {
    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::load(self.config.as_deref())?;
        if let Some(url) = &self.service_url {
            config.service_url = url.clone();
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = dir.clone();
        }
        config.resolve_paths()?;
        Ok(config)
    }
}

pub async fn handle_command(cli: Cli, config: ClientConfig) -> Result<()> {
    let client = ServiceClient::from_config(&config)?;
    let mut session = Session::new(client, TerminalView::stdout(), &config);

    match cli.command {
        Command::Screen {
            job,
            job_file,
            export,
            files,
        } => {
            let job_description = match (job, job_file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read job description: {}", path.display()))?,
                (None, None) => String::new(),
            };

            let files = read_files(&files, session.view_mut()).await;
            session.add_files(files)?;
            session.set_job_description(&job_description);
            session.submit().await?;

            if export {
                session.export().await?;
            }
            Ok(())
        }
        Command::Shell => run_shell(&mut session).await,
    }
}

/// Read every path; unreadable ones are reported and skipped.
async fn read_files<V: View + ?Sized>(paths: &[PathBuf], view: &mut V) -> Vec<RawFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match RawFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("{:#}", e);
                view.alert(&format!("Could not read {}", path.display()));
            }
        }
    }
    files
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Vec<PathBuf>),
    /// 1-based, as listed
    Remove(usize),
    List,
    Job(String),
    Submit,
    Export,
    Reset,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((line, ""));

        match verb {
            "add" if rest.is_empty() => Err("usage: add <file>...".to_string()),
            "add" => Ok(ShellCommand::Add(
                rest.split_whitespace().map(PathBuf::from).collect(),
            )),
            "remove" | "rm" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(ShellCommand::Remove(n)),
                _ => Err("usage: remove <number>".to_string()),
            },
            "list" | "ls" => Ok(ShellCommand::List),
            "job" => Ok(ShellCommand::Job(rest.to_string())),
            "submit" => Ok(ShellCommand::Submit),
            "export" => Ok(ShellCommand::Export),
            "reset" | "new" => Ok(ShellCommand::Reset),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("unknown command: {} (try help)", other)),
        }
    }
}

const SHELL_HELP: &str = "\
Commands:
  add <file>...   stage resume files (pdf, docx, doc)
  remove <n>      unstage file number n
  list            show staged files
  job <text>      set the job description
  submit          rank staged resumes against the job description
  export          save the shortlist as shortlisted_candidates.csv
  reset           start a new search
  quit            leave";

async fn run_shell<S, V>(session: &mut Session<S, V>) -> Result<()>
where
    S: ScreeningService,
    V: View,
{
    session.view_mut().notify(SHELL_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                session.view_mut().alert(&message);
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        // Failures were already shown by the view; the shell keeps going.
        let outcome = match command {
            ShellCommand::Add(paths) => {
                let files = read_files(&paths, session.view_mut()).await;
                session.add_files(files).map(|_| ())
            }
            ShellCommand::Remove(n) => session.remove_file(n - 1).map(|_| ()),
            ShellCommand::List => {
                let staged = session.staged();
                session.view_mut().render_staged(&staged);
                Ok(())
            }
            ShellCommand::Job(text) => {
                session.set_job_description(&text);
                Ok(())
            }
            ShellCommand::Submit => session.submit().await.map(|_| ()),
            ShellCommand::Export => session.export().await.map(|_| ()),
            ShellCommand::Reset => session.reset(),
            ShellCommand::Help => {
                session.view_mut().notify(SHELL_HELP);
                Ok(())
            }
            ShellCommand::Quit => break,
        };

        if let Err(e) = outcome {
            debug!("Command failed: {}", e);
        }
    }

    info!("Shell closed");
    Ok(())
}
