// Copyright 2026 Docsim Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    name = "docsim",
    version,
    about = "Multi-metric document and proposal similarity"
)]
pub struct Cli {
    /// Config file (defaults to the global docsim.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score two documents under one metric
    Score(ScoreArgs),

    /// Compare two documents under every metric
    Compare(CompareArgs),

    /// Rank candidate documents against a target
    Rank(RankArgs),

    /// Write the default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// First document
    pub left: PathBuf,

    /// Second document
    pub right: PathBuf,

    /// cosine, jaccard, semantic or structural (defaults to config)
    #[arg(long)]
    pub metric: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First document
    pub left: PathBuf,

    /// Second document
    pub right: PathBuf,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    /// Document to find matches for
    pub target: PathBuf,

    /// Candidate files or directories
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Minimum score (defaults to config)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// cosine, jaccard, semantic or structural (defaults to config)
    #[arg(long)]
    pub metric: Option<String>,

    /// Glob to include
    #[arg(long)]
    pub glob: Option<String>,

    /// Ignore globs
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}
