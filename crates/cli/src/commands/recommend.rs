use shopfront_core::config::{AppConfig, LoadOptions};

use crate::commands::{open_storefront, render_products, session_context, CommandResult};

pub fn run(session: &str, limit: Option<usize>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    let limit = limit.unwrap_or(config.recommendations.personalized_limit);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let storefront = open_storefront(&config).await?;
        let ctx = session_context(&storefront.pool, session).await;
        let picks = storefront.engine.personalized(&ctx, limit);
        storefront.pool.close().await;
        Ok::<_, crate::commands::CommandFailure>(picks)
    });

    match result {
        Ok(picks) if picks.is_empty() => CommandResult::success(
            "recommend",
            format!("no recommendations available for session {session}"),
        ),
        Ok(picks) => CommandResult::success(
            "recommend",
            format!("top picks for session {session}:\n{}", render_products(&picks)),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("recommend", error_class, message, exit_code)
        }
    }
}
