//! Replay a recorded data stream, rebuilding the view after every line.
//!
//! One [`MessageInteraction`] lives for the whole replay and follows the
//! message identity, so a mid-stream `f:` line resets it the way a client
//! resets its per-message state.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use knowmore_core::interaction::MessageInteraction;
use knowmore_core::stream::StreamAccumulator;
use knowmore_core::{Config, MessageViewModel, ViewModelBuilder};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::pretty;

/// Options for a single replay run.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub frame_delay: Duration,
    pub print_frames: bool,
    pub copy_feedback: Duration,
}

impl ReplayOptions {
    pub fn from_config(config: &Config, delay_ms: Option<u64>, final_only: bool) -> Self {
        Self {
            frame_delay: Duration::from_millis(delay_ms.unwrap_or(config.replay.frame_delay_ms)),
            print_frames: config.replay.print_frames && !final_only,
            copy_feedback: config.copy_feedback(),
        }
    }
}

/// Outcome of a replay.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub view: MessageViewModel,
    pub frames: usize,
    pub skipped_lines: usize,
    pub accumulator: StreamAccumulator,
    pub interaction: MessageInteraction,
}

/// Replay from a file path, or stdin when the path is `-`.
pub async fn replay_input(
    input: &str,
    builder: &ViewModelBuilder,
    options: &ReplayOptions,
) -> Result<ReplayOutcome> {
    if input == "-" {
        replay_reader(tokio::io::stdin(), builder, options).await
    } else {
        let path = Path::new(input);
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open stream file {}", path.display()))?;
        replay_reader(file, builder, options).await
    }
}

/// Apply every line of `reader`, printing a frame summary after each mutation.
pub async fn replay_reader<R>(
    reader: R,
    builder: &ViewModelBuilder,
    options: &ReplayOptions,
) -> Result<ReplayOutcome>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut accumulator = StreamAccumulator::default();
    let mut interaction =
        MessageInteraction::new(accumulator.message().id.clone(), options.copy_feedback);
    let mut frames = 0;
    let mut skipped_lines = 0;
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match accumulator.apply_line(&line) {
            Ok(effect) if effect.is_mutation() => {
                frames += 1;
                let message_id = &accumulator.message().id;
                if interaction.sync_identity(message_id) {
                    tracing::debug!(%message_id, "Message identity changed, interaction reset");
                }
                if options.print_frames {
                    let view = builder.build(accumulator.message());
                    pretty::print_frame(accumulator.revision(), &view);
                }
                if !options.frame_delay.is_zero() {
                    tokio::time::sleep(options.frame_delay).await;
                }
            }
            Ok(_) => {}
            Err(err) => {
                skipped_lines += 1;
                tracing::warn!(line = line_no, error = %err, "Skipping stream line");
            }
        }
    }

    let view = builder.build(accumulator.message());
    Ok(ReplayOutcome {
        view,
        frames,
        skipped_lines,
        accumulator,
        interaction,
    })
}
