//! Initialize command.

use console::style;

use crate::config::Settings;
use crate::repository::util::redact_url_password;

/// Initialize the data directory and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let ctx = settings.create_db_context()?;
    ctx.test_connection().await?;
    ctx.init_schema().await?;

    println!(
        "  {} Database ready at {}",
        style("✓").green(),
        redact_url_password(&settings.database_url())
    );
    println!(
        "  {} Uploads stored in {}",
        style("✓").green(),
        settings.uploads_dir.display()
    );

    if settings.analysis.api_key.is_none() {
        println!(
            "{} No analysis API key set (OPENROUTER_API_KEY)",
            style("!").yellow()
        );
        println!("  Requests will be sent without an Authorization header");
    }

    println!(
        "{} Initialized Codex in {}",
        style("✓").green(),
        settings.data_dir.display()
    );

    Ok(())
}
