// src/main.rs

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use coach::api::{CoachClient, ExplainLevel, Mode};
use coach::config::CONFIG;
use coach::form::{FormClient, FormInput, SubmitStatus};
use coach::history::{HistoryStore, MemoryHistoryStore, SqliteHistoryStore};
use coach::share::{decode_share_state, encode_share_url, ShareState};

#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "Compare two options through the Decision Coach service", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a decision and print the verdict
    Ask {
        /// The dilemma you are facing
        #[arg(long, default_value = "")]
        decision: String,

        /// First alternative
        #[arg(long, default_value = "")]
        option_a: String,

        /// Second alternative
        #[arg(long, default_value = "")]
        option_b: String,

        /// Extra context for the service
        #[arg(long)]
        context: Option<String>,

        /// Criterion line, `label[:-]weight` or bare label (repeatable)
        #[arg(long = "criterion")]
        criteria: Vec<String>,

        /// Free-text framing instead of the structured fields
        #[arg(long)]
        prompt: Option<String>,

        #[arg(long, value_enum)]
        mode: Option<Mode>,

        #[arg(long, value_enum)]
        explain: Option<ExplainLevel>,

        /// Skip recording this submission
        #[arg(long, default_value_t = false)]
        no_history: bool,
    },

    /// List or clear recorded decisions
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,

        /// Maximum entries to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Encode or decode shareable links
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Delete all recorded decisions
    Clear,
}

#[derive(Subcommand)]
enum ShareAction {
    /// Build a link that prefills the form for someone else
    Encode {
        #[arg(long)]
        prompt: String,

        #[arg(long, value_enum)]
        mode: Option<Mode>,

        #[arg(long, value_enum)]
        explain: Option<ExplainLevel>,
    },
    /// Unpack a link (or bare blob) and show the prefilled fields
    Decode { link: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before any async work runs
    if cli.debug || CONFIG.is_debug() {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt().init();
    }

    match cli.command {
        Command::Ask {
            decision,
            option_a,
            option_b,
            context,
            criteria,
            prompt,
            mode,
            explain,
            no_history,
        } => {
            let history = open_history(no_history).await;

            let mut form = FormClient::new(CoachClient::new(), history);
            form.input = FormInput {
                decision,
                option_a,
                option_b,
                user_context: context.unwrap_or_default(),
                criteria_text: criteria.join("\n"),
                prompt,
                mode,
                explain,
            };

            info!(endpoint = %CONFIG.endpoint, "submitting");
            form.submit().await;

            match form.status() {
                SubmitStatus::Success(output) => {
                    print_output(output);
                    Ok(())
                }
                SubmitStatus::Failed(_, message) => Err(anyhow!("{message}")),
                // submit() always lands in Success or Failed
                other => Err(anyhow!("unexpected form state: {other:?}")),
            }
        }

        Command::History { action, limit } => {
            let store =
                SqliteHistoryStore::open(&CONFIG.history_db, CONFIG.history_cap).await?;

            match action {
                Some(HistoryAction::Clear) => {
                    store.clear().await?;
                    println!("History cleared.");
                }
                None => {
                    let entries = store.load().await?;
                    if entries.is_empty() {
                        println!("No recorded decisions yet.");
                    }
                    for entry in entries.iter().take(limit) {
                        println!(
                            "{}  [{}]  {}  — {}",
                            entry.timestamp.format("%Y-%m-%d %H:%M"),
                            entry.recommendation.as_str(),
                            entry.decision,
                            entry.summary
                        );
                    }
                }
            }
            Ok(())
        }

        Command::Share { action } => {
            match action {
                ShareAction::Encode { prompt, mode, explain } => {
                    let state = ShareState { mode, explain, prompt };
                    println!("{}", encode_share_url(&CONFIG.share_base_url, &state)?);
                }
                ShareAction::Decode { link } => {
                    let state = decode_share_state(&link)?;
                    println!("prompt:  {}", state.prompt);
                    if let Some(mode) = state.mode {
                        println!("mode:    {:?}", mode);
                    }
                    if let Some(explain) = state.explain {
                        println!("explain: {:?}", explain);
                    }
                }
            }
            Ok(())
        }
    }
}

async fn open_history(no_history: bool) -> Arc<dyn HistoryStore> {
    if no_history || !CONFIG.history_enabled {
        return Arc::new(MemoryHistoryStore::new(CONFIG.history_cap));
    }

    match SqliteHistoryStore::open(&CONFIG.history_db, CONFIG.history_cap).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!("history database unavailable ({e}); continuing without persistence");
            Arc::new(MemoryHistoryStore::new(CONFIG.history_cap))
        }
    }
}

fn print_output(output: &coach::api::DecisionOutput) {
    println!("Recommendation: {}", output.recommendation.as_str());
    if !output.one_line_summary.is_empty() {
        println!("{}", output.one_line_summary);
    }
    println!();
    println!("Scores: A {:.0} / B {:.0}", output.scores.a, output.scores.b);
    if let Some(score) = output.decision_score {
        println!("Decision score: {score:.0}");
    }
    if let Some(confidence) = output.confidence {
        println!("Confidence: {}", confidence.as_str());
    }

    if !output.score_breakdown.is_empty() {
        println!("\nBreakdown:");
        for row in &output.score_breakdown {
            let weight = row
                .weight
                .map(|w| format!(" (w{w:.1})"))
                .unwrap_or_default();
            println!(
                "  {}{}: A {:.1} / B {:.1} — {}",
                row.criterion, weight, row.a_score, row.b_score, row.why
            );
        }
    }

    if !output.tradeoffs.is_empty() {
        println!("\nTradeoffs:");
        for t in &output.tradeoffs {
            println!("  - {t}");
        }
    }

    if !output.risks.a.is_empty() || !output.risks.b.is_empty() {
        println!("\nRisks:");
        for r in &output.risks.a {
            println!("  A: {r}");
        }
        for r in &output.risks.b {
            println!("  B: {r}");
        }
    }

    if !output.what_would_change_my_mind.is_empty() {
        println!("\nWhat would change my mind:");
        for w in &output.what_would_change_my_mind {
            println!("  - {w}");
        }
    }

    if !output.follow_up_questions.is_empty() {
        println!("\nFollow-up questions:");
        for q in &output.follow_up_questions {
            println!("  - {q}");
        }
    }
}
