//! # CLI Module
//!
//! Command-line interface for the media organizer.
//!
//! ## Usage
//! ```bash
//! # Organize an SD card into the library
//! organize /Volumes/SDCARD/DCIM ~/Pictures/Library
//!
//! # See what would happen
//! organize --dry-run ~/Downloads/phone ~/Pictures/Library
//!
//! # Ask instead of aborting when photos lack GPS
//! organize --no-enforce-gps ~/Downloads/phone ~/Pictures/Library
//! ```

mod prompt;
mod render;

use clap::error::ErrorKind;
use clap::Parser;
use console::Term;
use crossbeam_channel::{never, select, unbounded, Receiver};
use media_organizer::core::metadata::MetadataProviders;
use media_organizer::core::organize::{CopyFailurePolicy, RunConfig};
use media_organizer::core::pipeline::Pipeline;
use media_organizer::core::ConfirmPrompt;
use media_organizer::error::ArgumentError;
use media_organizer::events::{EventChannel, EventReceiver};
use media_organizer::Result;
use prompt::{PromptRequest, RelayPrompt, TermPrompt};
use render::Renderer;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

/// Organize photos and movies into year folders named by capture time
#[derive(Parser, Debug)]
#[command(name = "organize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to read media from
    src: PathBuf,

    /// Directory to organize into; files land in <DST>/<year>/
    dst: PathBuf,

    /// Run verbosely
    #[arg(short, long)]
    verbose: bool,

    /// Run the whole program but do not change any file. Implies --verbose
    #[arg(long)]
    dry_run: bool,

    /// Abort if any photo misses GPS data [default]
    #[arg(long, overrides_with = "no_enforce_gps")]
    enforce_gps: bool,

    /// Ask whether to continue when photos miss GPS data
    #[arg(long, overrides_with = "enforce_gps")]
    no_enforce_gps: bool,

    /// Report files that fail to copy and carry on instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Read metadata one file at a time
    #[arg(long)]
    sequential: bool,

    /// exiftool binary used for movie metadata
    #[arg(long, value_name = "PATH", default_value = "exiftool")]
    exiftool: PathBuf,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            verbose: self.verbose,
            dry_run: self.dry_run,
            enforce_gps: !self.no_enforce_gps,
            copy_failure: if self.keep_going {
                CopyFailurePolicy::Continue
            } else {
                CopyFailurePolicy::Abort
            },
            parallel_metadata: !self.sequential,
        }
    }
}

/// Run the CLI
pub fn run() -> ExitCode {
    media_organizer::init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let term = Term::stdout();
    match organize(&cli, &term) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            render::print_error(&Term::stderr(), &e);
            ExitCode::FAILURE
        }
    }
}

fn organize(cli: &Cli, term: &Term) -> Result<()> {
    let config = cli.run_config();
    prepare_paths(cli, &config, term, &mut TermPrompt::new(term.clone()))?;

    let pipeline = Pipeline::builder()
        .source(&cli.src)
        .destination(&cli.dst)
        .run_config(config.clone())
        .providers(MetadataProviders::with_exiftool(&cli.exiftool))
        .build();

    let (sender, receiver) = EventChannel::new();
    let (prompt_sender, prompt_receiver) = unbounded();

    let worker = thread::spawn(move || {
        let mut prompt = RelayPrompt::new(prompt_sender);
        pipeline.run_with_events(&sender, &mut prompt)
    });

    let mut renderer = Renderer::new(term.clone(), config.is_verbose());
    relay(&receiver, prompt_receiver, &mut renderer, term);
    renderer.finish_progress();

    let result = worker
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
    tracing::debug!(copied = result.files_copied, "done");
    Ok(())
}

/// Validate `src` and `dst`, offering to create a missing `dst`
fn prepare_paths(
    cli: &Cli,
    config: &RunConfig,
    term: &Term,
    prompt: &mut dyn ConfirmPrompt,
) -> std::result::Result<(), ArgumentError> {
    if !cli.src.is_dir() {
        return Err(ArgumentError::SourceNotDirectory {
            path: cli.src.clone(),
        });
    }

    if cli.dst.is_dir() {
        return Ok(());
    }
    if cli.dst.exists() {
        return Err(ArgumentError::DestinationNotDirectory {
            path: cli.dst.clone(),
        });
    }

    let question = format!("{} does not exist. Create it?", cli.dst.display());
    if !prompt.confirm(&question, true) {
        return Err(ArgumentError::DestinationDeclined {
            path: cli.dst.clone(),
        });
    }

    if config.is_verbose() {
        term.write_line(&format!("mkdir -p {}", cli.dst.display())).ok();
    }
    if config.dry_run {
        return Ok(());
    }

    fs::create_dir_all(&cli.dst).map_err(|source| ArgumentError::CreateDestination {
        path: cli.dst.clone(),
        source,
    })
}

/// Render events until the pipeline hangs up, answering its questions on
/// this thread after everything it said before asking.
fn relay(
    events: &EventReceiver,
    prompts: Receiver<PromptRequest>,
    renderer: &mut Renderer,
    term: &Term,
) {
    let idle = never();
    let mut prompts = Some(prompts);
    loop {
        let mut prompts_closed = false;
        select! {
            recv(events.as_receiver()) -> event => match event {
                Ok(event) => renderer.handle(&event),
                Err(_) => break,
            },
            recv(prompts.as_ref().unwrap_or(&idle)) -> request => match request {
                Ok(request) => {
                    while let Some(event) = events.try_recv() {
                        renderer.handle(&event);
                    }
                    renderer.finish_progress();
                    let answer = prompt::ask(term, &request.question, request.default);
                    let _ = request.reply.send(answer);
                }
                Err(_) => prompts_closed = true,
            },
        }
        if prompts_closed {
            prompts = None;
        }
    }
}
