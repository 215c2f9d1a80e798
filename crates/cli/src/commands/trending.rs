use std::collections::HashSet;

use shopfront_core::config::{AppConfig, LoadOptions};
use shopfront_core::ProductId;

use crate::commands::{open_storefront, render_products, CommandResult};

pub fn run(limit: Option<usize>, exclude: &[i64]) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "trending",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    let limit = limit.unwrap_or(config.recommendations.personalized_limit);
    let excluded: HashSet<ProductId> = exclude.iter().copied().map(ProductId).collect();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "trending",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let storefront = open_storefront(&config).await?;
        let picks = storefront.engine.trending(limit, &excluded);
        storefront.pool.close().await;
        Ok::<_, crate::commands::CommandFailure>(picks)
    });

    match result {
        Ok(picks) if picks.is_empty() => {
            CommandResult::success("trending", "no in-stock products to rank")
        }
        Ok(picks) => CommandResult::success(
            "trending",
            format!("trending now:\n{}", render_products(&picks)),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("trending", error_class, message, exit_code)
        }
    }
}
