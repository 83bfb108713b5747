//! Tax Mate terminal entry point
//!
//! Renders the dialogue transcript on stdout and feeds stdin lines back into
//! the controller. Logs go to stderr.

mod input;
mod render;

use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use taxmate_agent::DialogueController;
use taxmate_config::{load_settings, Settings};
use taxmate_core::MessageId;

use crate::input::Command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env} > config/default > defaults
    let env = std::env::var("TAXMATE_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };

    init_tracing(&settings);

    tracing::info!(
        environment = ?settings.environment,
        config_env = env.as_deref().unwrap_or("default"),
        matching = ?settings.dialogue.source_matching,
        "Starting Tax Mate v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut controller =
        DialogueController::from_settings(&settings).context("failed to build dialogue")?;

    println!("{}\n", render::BANNER);
    tokio::time::sleep(Duration::from_millis(settings.dialogue.intro_delay_ms)).await;
    controller.start();

    let mut screen = Screen::default();
    screen.flush(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let offered = controller
            .transcript()
            .last()
            .and_then(|m| m.options())
            .map(<[String]>::to_vec);

        let command = match input::parse(&line, offered.as_deref()) {
            Ok(command) => command,
            Err(e) => {
                println!("  {}", e);
                continue;
            },
        };

        match command {
            Command::Text(text) => {
                controller.submit(&text);
            },
            Command::Option(option) => {
                controller.select_option(&option);
            },
            Command::Like(index) => {
                give_feedback(&mut controller, index, true);
                continue;
            },
            Command::Dislike(index) => {
                give_feedback(&mut controller, index, false);
                continue;
            },
            Command::Restart => {
                controller.restart();
                controller.start();
            },
            Command::Transcript => {
                let json = serde_json::to_string_pretty(controller.transcript())?;
                println!("{}", json);
                continue;
            },
            Command::Quit => break,
        }

        screen.flush(&controller);
    }

    tracing::info!(
        messages = controller.transcript().len(),
        step = %controller.step(),
        "Session ended"
    );
    Ok(())
}

fn give_feedback(controller: &mut DialogueController, index: usize, like: bool) {
    let Some(id) = message_at(controller, index) else {
        println!("  No message #{}", index);
        return;
    };
    if let Some(feedback) = controller.feedback(id) {
        let count = if like { feedback.like() } else { feedback.dislike() };
        println!("  Thanks for the feedback ({})", count);
    }
}

fn message_at(controller: &DialogueController, index: usize) -> Option<MessageId> {
    controller
        .transcript()
        .as_slice()
        .get(index.checked_sub(1)?)
        .map(|m| m.id())
}

/// Tracks which messages have already been printed
#[derive(Default)]
struct Screen {
    first: Option<MessageId>,
    printed: usize,
}

impl Screen {
    fn flush(&mut self, controller: &DialogueController) {
        let messages = controller.transcript().as_slice();
        let first = messages.first().map(|m| m.id());
        if first != self.first {
            // Transcript was reset
            self.first = first;
            self.printed = 0;
        }

        for (offset, message) in messages.iter().enumerate().skip(self.printed) {
            print!("{}", render::message(offset + 1, message));
        }
        self.printed = messages.len();
    }
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("taxmate={}", level.to_ascii_lowercase()).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
