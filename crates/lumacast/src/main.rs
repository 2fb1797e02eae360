//! Lumacast - video-driven Art-Net lighting
//!
//! Loads a settings file, builds the Art-Net consumer and feeds it frames from
//! the built-in test pattern until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lumacast_artnet::frame::VideoField;
use lumacast_artnet::{ArtNetConsumer, Configuration, FrameConsumer};
use tracing::info;

mod logging_setup;
mod pattern;
mod settings;

use pattern::TestPattern;
use settings::AppSettings;

#[derive(Parser, Debug)]
#[command(name = "lumacast", version, about = "Drive Art-Net fixtures from video frames")]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, default_value = "lumacast.toml")]
    config: PathBuf,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration: Option<f64>,

    /// Validate the settings, print the resolved fixture layout and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = AppSettings::load(&cli.config)?;
    let _log_guard = logging_setup::init(&settings.logging)?;

    let config = Configuration::from_settings(&settings.artnet)
        .context("Invalid Art-Net configuration")?;
    let mut consumer = ArtNetConsumer::new(config).context("Failed to create Art-Net consumer")?;

    if cli.check {
        print_layout(&consumer)?;
        return Ok(());
    }

    let mut pattern = TestPattern::new(&settings.pattern);
    consumer
        .initialize(&settings.pattern.format_desc(), settings.pattern.channel)
        .context("Failed to start Art-Net output")?;

    info!("Streaming {} (Ctrl-C to stop)", consumer.print());

    let mut ticker = tokio::time::interval(pattern.frame_interval());
    let shutdown = shutdown_signal(cli.duration.map(Duration::from_secs_f64));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                consumer.send(VideoField::Progressive, pattern.next_frame()).await;
            }
        }
    }

    info!("Shutting down");
    consumer.stop();

    Ok(())
}

/// Resolves on Ctrl-C, or after `duration` if one is given.
async fn shutdown_signal(duration: Option<Duration>) {
    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = interrupt => {}
        _ = deadline => {}
    }
}

fn print_layout(consumer: &ArtNetConsumer) -> Result<()> {
    let state = consumer.state().to_json()?;
    println!("{}", state);

    for (index, sender) in consumer.computed_senders().iter().enumerate() {
        println!(
            "sender #{} -> {} universe {}",
            index, sender.endpoint, sender.universe
        );
        for fixture in &sender.fixtures {
            let (min, max) = fixture.rectangle.bounds();
            println!(
                "  {:<6} channel {:>3}  area ({:.0}, {:.0})-({:.0}, {:.0})",
                fixture.fixture_type.to_string(),
                fixture.address + 1,
                min.x,
                min.y,
                max.x,
                max.y
            );
        }
    }

    Ok(())
}
