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

mod cli;
mod output;

use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use docsim::Metric;
use docsim::SimilarityEngine;
use docsim::SimilarityError;
use docsim::config;
use docsim::config::Config;
use docsim::ingest;
use docsim::model::MetricOutcome;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::cli::CompareArgs;
use crate::cli::RankArgs;
use crate::cli::ScoreArgs;
use crate::output::JsonResponse;
use crate::output::ScoreOut;
use crate::output::StatsOut;
use crate::output::print_json;

const LOG_ENV: &str = "DOCSIM_LOG";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init { force } => cmd_init(config_path, force),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "docsim", &mut std::io::stdout());
            Ok(())
        }
        Commands::Score(args) => {
            let json = args.json;
            handle_result(cmd_score(config_path, args), json)
        }
        Commands::Compare(args) => {
            let json = args.json;
            handle_result(cmd_compare(config_path, args), json)
        }
        Commands::Rank(args) => {
            let json = args.json;
            handle_result(cmd_rank(config_path, args), json)
        }
    }
}

fn handle_result(result: Result<()>, json: bool) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            if json {
                let resp = JsonResponse::error(error_code(&err), &err.to_string());
                print_json(&resp)?;
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<SimilarityError>() {
        Some(SimilarityError::InvalidMetric(_)) => "invalid_metric",
        Some(SimilarityError::Cache(_)) => "cache_error",
        None => "error",
    }
}

fn load(config_path: Option<&Path>) -> Result<Config> {
    let config = config::load_config(config_path)?;
    init_logging(&config.log_level);
    Ok(config)
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_metric(flag: Option<&str>, config: &Config) -> Result<Metric> {
    match flag {
        Some(name) => Ok(name.parse::<Metric>()?),
        None => Ok(config.metric),
    }
}

fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => config::global_config_path()
            .ok_or_else(|| anyhow::anyhow!("unable to find config directory"))?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    config::write_config(&path, &Config::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_score(config_path: Option<&Path>, args: ScoreArgs) -> Result<()> {
    let config = load(config_path)?;
    let metric = resolve_metric(args.metric.as_deref(), &config)?;
    let started = Instant::now();
    let left = ingest::load_document(&args.left, &config)?;
    let right = ingest::load_document(&args.right, &config)?;

    let engine = SimilarityEngine::from_config(&config);
    let score = engine.score(&left, &right, metric)?;

    if args.json {
        let resp = JsonResponse::ok()
            .with_query(Some(metric.as_label()), None, None)
            .with_score(ScoreOut {
                left: left.display_name().to_string(),
                right: right.display_name().to_string(),
                metric: metric.as_label().to_string(),
                score,
            })
            .with_stats(StatsOut {
                took_ms: started.elapsed().as_millis() as i64,
                candidates: 1,
                total_hits: 1,
                cache: engine.cache().name().to_string(),
                cache_entries: engine.cache_len()? as i64,
            });
        print_json(&resp)?;
    } else {
        println!("{}: {:.4}", metric, score);
    }
    Ok(())
}

fn cmd_compare(config_path: Option<&Path>, args: CompareArgs) -> Result<()> {
    let config = load(config_path)?;
    let started = Instant::now();
    let left = ingest::load_document(&args.left, &config)?;
    let right = ingest::load_document(&args.right, &config)?;

    let engine = SimilarityEngine::from_config(&config);
    let result = engine.compare_all(&left, &right);

    if args.json {
        let warnings = result
            .failed()
            .into_iter()
            .map(|metric| format!("{metric} similarity failed and was scored 0"))
            .collect();
        let resp = JsonResponse::ok()
            .with_comparison(result.to_json())
            .with_stats(StatsOut {
                took_ms: started.elapsed().as_millis() as i64,
                candidates: 1,
                total_hits: 1,
                cache: engine.cache().name().to_string(),
                cache_entries: engine.cache_len()? as i64,
            })
            .with_warnings(warnings);
        print_json(&resp)?;
    } else {
        for metric in Metric::ALL {
            match result.outcome(metric) {
                MetricOutcome::Scored(score) => println!("{:<12}{:.4}", metric, score),
                MetricOutcome::Failed(reason) => {
                    println!("{:<12}{:.4} (failed: {reason})", metric, 0.0)
                }
            }
        }
        println!("{:<12}{:.4}", "overall", result.overall);
    }
    Ok(())
}

fn cmd_rank(config_path: Option<&Path>, args: RankArgs) -> Result<()> {
    let config = load(config_path)?;
    let metric = resolve_metric(args.metric.as_deref(), &config)?;
    let threshold = args.threshold.unwrap_or(config.threshold);
    if !(0.0..=1.0).contains(&threshold) {
        anyhow::bail!("threshold {threshold} must be within [0, 1]");
    }
    let started = Instant::now();

    let target = ingest::load_document(&args.target, &config)?;
    let opts = ingest::LoadOptions {
        glob: args.glob,
        ignore: args.ignore,
    };
    let mut report = ingest::load_documents(args.paths, &opts, &config)?;
    let target_path = canonical(&args.target);
    report.documents.retain(|doc| {
        doc.file_path
            .as_deref()
            .map(|p| canonical(Path::new(p)) != target_path)
            .unwrap_or(true)
    });

    let engine = SimilarityEngine::from_config(&config);
    let ranked = engine.rank(&target, &report.documents, threshold, metric)?;

    if args.json {
        let resp = JsonResponse::ok()
            .with_query(
                Some(metric.as_label()),
                Some(threshold),
                Some(target.display_name()),
            )
            .with_results(ranked.iter().map(|m| m.to_json()).collect())
            .with_stats(StatsOut {
                took_ms: started.elapsed().as_millis() as i64,
                candidates: report.documents.len() as i64,
                total_hits: ranked.len() as i64,
                cache: engine.cache().name().to_string(),
                cache_entries: engine.cache_len()? as i64,
            })
            .with_warnings(report.warnings);
        print_json(&resp)?;
    } else {
        for item in &ranked {
            println!("{:.4}  {}", item.score, item.document.display_name());
        }
        if ranked.is_empty() {
            println!("No documents scored at or above {threshold}");
        }
        for warn in report.warnings {
            eprintln!("warning: {warn}");
        }
    }
    Ok(())
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
