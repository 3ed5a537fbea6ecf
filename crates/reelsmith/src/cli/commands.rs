//! CLI command definitions.

use clap::{Parser, Subcommand};
use reelsmith::StylePreset;
use std::path::PathBuf;

/// Reelsmith - turn a story bible into episode architecture and storyboard prompts
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(about = "Turn a story bible into episode architecture and storyboard prompts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Export spans to stdout through OpenTelemetry
    #[arg(long, global = true)]
    pub telemetry: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON array of recorded model replies, consumed in order.
    /// Without it every stage runs its algorithmic or template path.
    #[arg(long, global = true)]
    pub replay: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recover JSON from a malformed model reply
    Repair {
        /// File holding the raw reply
        input: PathBuf,
    },

    /// Recover and normalize a story bible from extraction replies.
    /// Several replies are treated as chunks of one story and merged.
    Bible {
        /// Files holding the raw replies, in story order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Title of the merged bible (defaults to the first chunk's title)
        #[arg(long)]
        title: Option<String>,

        /// Write the job state here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a story bible's events partition into episodes
    Schedule {
        /// Job state JSON holding a story bible
        job: PathBuf,

        /// Episode count (derived from the bible when omitted)
        #[arg(long)]
        episodes: Option<u32>,
    },

    /// Generate the episode architecture of a job
    Architect {
        /// Job state JSON holding a story bible
        job: PathBuf,

        /// Episode count (derived from the bible when omitted)
        #[arg(long)]
        episodes: Option<u32>,

        /// Write the job state here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Adjust one episode of a job's architecture
    Refine {
        /// Job state JSON holding a story bible and architecture
        job: PathBuf,

        /// Episode number
        #[arg(long)]
        episode: u32,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New logline
        #[arg(long)]
        logline: Option<String>,

        /// Replacement event ids, comma separated
        #[arg(long, value_delimiter = ',')]
        events: Option<Vec<String>>,

        /// Free-text instruction for a model rework of the episode
        #[arg(long)]
        instruction: Option<String>,

        /// Write the job state here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Design reference sheets for a job's characters, locations and props
    Assets {
        /// Job state JSON holding a story bible
        job: PathBuf,

        /// Visual style preset of the sheets
        #[arg(long)]
        style: Option<StylePreset>,

        /// Write the job state here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Storyboard every scripted episode of a job.
    /// A job with an architecture but no script gets placeholder scripts.
    Storyboard {
        /// Job state JSON holding a script or an architecture
        job: PathBuf,

        /// Visual style preset
        #[arg(long)]
        style: Option<StylePreset>,

        /// Longest clip allowed, in seconds
        #[arg(long)]
        max_clip_duration: Option<u32>,

        /// One model call per clip instead of one per episode
        #[arg(long)]
        per_clip: bool,

        /// Write the job state here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether narration fits a clip
    SpeechRate {
        /// Narration text
        text: String,

        /// Clip length in seconds
        #[arg(long)]
        duration: u32,
    },
}
