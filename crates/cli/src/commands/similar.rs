use shopfront_core::config::{AppConfig, LoadOptions};
use shopfront_core::ProductId;
use shopfront_db::repositories::{BrowsingHistoryRepository, SqlBrowsingHistoryRepository};

use crate::commands::{open_storefront, render_products, session_context, CommandResult};

pub fn run(product_id: i64, session: &str, limit: Option<usize>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "similar",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    let limit = limit.unwrap_or(config.recommendations.similar_limit);
    let source = ProductId(product_id);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "similar",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let storefront = open_storefront(&config).await?;
        let mut ctx = session_context(&storefront.pool, session).await;

        let source_name = storefront
            .engine
            .product(source)
            .map(|product| product.name.clone())
            .unwrap_or_else(|| format!("product {source} (not in catalog)"));

        let picks = storefront.engine.similar_products(&mut ctx, source, limit);

        // The lookup counts as a view of the source product.
        SqlBrowsingHistoryRepository::new(storefront.pool.clone())
            .save(session, &ctx.history)
            .await
            .map_err(|error| ("history_write", error.to_string(), 6u8))?;

        storefront.pool.close().await;
        Ok::<_, crate::commands::CommandFailure>((source_name, picks))
    });

    match result {
        Ok((source_name, picks)) if picks.is_empty() => CommandResult::success(
            "similar",
            format!("no similar products available for {source_name}"),
        ),
        Ok((source_name, picks)) => CommandResult::success(
            "similar",
            format!("products similar to {source_name}:\n{}", render_products(&picks)),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("similar", error_class, message, exit_code)
        }
    }
}
