use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rusty_jukebox::config::BotConfig;
use rusty_jukebox::player::MusicManager;
use rusty_jukebox::{CommandResult, Context, Data, Error};

#[poise::command(slash_command, prefix_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

/// Log anything a command did not handle itself and tell the user.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command '{}': {}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {}", error)).await {
                warn!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rusty_jukebox=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env()?;
    info!("Loaded configuration, player settings: {:?}", config.player);

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    // Create a vector to hold our commands
    let mut commands = vec![
        // Default commands
        register(),
        help(),
    ];

    // Handle Music feature
    #[cfg(feature = "music")]
    {
        use rusty_jukebox::commands::music::{
            clear::*, join::*, leave::*, loop_track::*, now::*, pause::*, play::*, queue::*,
            remove::*, shuffle::*, skip::*, stop::*, volume::*,
        };

        // Add music commands
        commands.extend(vec![
            join(),
            summon(),
            leave(),
            play(),
            now(),
            queue(),
            skip(),
            forceskip(),
            stop(),
            clear(),
            shuffle(),
            remove(),
            volume(),
            loop_track(),
            pause(),
            resume(),
        ]);
    }

    let music = Arc::new(MusicManager::new(config.player.clone()));
    let setup_music = Arc::clone(&music);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data::new(setup_music))
            })
        });

    let client_builder =
        ClientBuilder::new(&config.discord_token, intents).framework(framework.build());

    // Create and run client
    build_and_start_client(client_builder, music).await
}

async fn build_and_start_client(
    client_builder: ClientBuilder,
    music: Arc<MusicManager>,
) -> Result<(), Error> {
    #[cfg(feature = "music")]
    let mut client = {
        use songbird::SerenityInit;

        client_builder.register_songbird().await?
    };

    #[cfg(not(feature = "music"))]
    let mut client = client_builder.await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Shutting down...");
        music.shutdown().await;
        shard_manager.shutdown_all().await;
    });

    client.start().await.map_err(Into::into)
}
