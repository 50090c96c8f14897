use pawmatch_client::shell::{self, Command};
use pawmatch_client::{App, Settings};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting PawMatch shell against {}", settings.api.base_url);

    let app = App::new(settings)?;
    match app.initialize().await {
        Ok(true) => info!("Session restored"),
        Ok(false) => info!("Not signed in"),
        Err(e) => error!("Failed to restore session: {}", e),
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(b"pawmatch> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let output = match Command::parse(&line) {
            Ok(None) => String::new(),
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => match shell::execute(&app, command).await {
                Ok(text) => text,
                Err(e) => format!("Error: {}", e),
            },
            Err(e) => e.to_string(),
        };

        // Background refills report failures as notifications
        app.matching().settle().await;
        for notification in app.notifications().active() {
            stdout
                .write_all(format!("[{:?}] {}\n", notification.kind, notification.message).as_bytes())
                .await?;
            app.notifications().remove(notification.id);
        }

        if !output.is_empty() {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(b"pawmatch> ").await?;
        stdout.flush().await?;
    }

    info!("Shutting down");
    Ok(())
}
