use nutridash_config::Config;
use nutridash_core::Catalogue;
use nutridash_listener::endpoint_url;
use nutridash_store::FoodStore;
use tracing::info;

/// Strategy for displaying configuration information.
///
/// Prints the server address, database URL with a connectivity check,
/// listener settings and extraction patterns.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;

        println!("=== nutridash Configuration ===\n");

        println!("Server:");
        println!("  Address: {}", config.server.address());
        println!();

        println!("Database:");
        if config.database.is_enabled() {
            println!("  URL: {}", mask_database_url(&config.database.url));

            info!("Testing database connection");
            match FoodStore::connect(&config.database.url).await {
                Ok(store) => {
                    println!("  Status: Connected");
                    match store.list_foods().await {
                        Ok(foods) => println!("  Food Items: {}", foods.len()),
                        Err(e) => println!("  Food Items: unavailable ({e})"),
                    }
                }
                Err(e) => {
                    println!("  Status: Connection failed");
                    println!("  Error: {e}");
                }
            }
        } else {
            println!("  (disabled)");
        }
        println!();

        println!("Listener:");
        println!("  Enabled: {}", config.listener.enabled);
        match endpoint_url(&config.listener.root_url) {
            Ok(url) => println!("  Endpoint: {url}"),
            Err(e) => println!("  Endpoint: invalid ({e})"),
        }
        println!(
            "  Reconnect Delay: {}s",
            config.listener.reconnect_delay_secs
        );
        println!("  Probe: {}", config.listener.probe);
        if config.listener.record_capacity == 0 {
            println!("  Record Capacity: unbounded");
        } else {
            println!("  Record Capacity: {}", config.listener.record_capacity);
        }
        println!();

        println!("Extraction:");
        println!("  Food Pattern: {}", config.extraction.food_pattern);
        println!("  Calorie Pattern: {}", config.extraction.calorie_pattern);
        println!();

        let catalogue = Catalogue::builtin()?;
        let totals = catalogue.totals();
        println!("Catalogue:");
        println!("  Foods: {}", catalogue.len());
        println!(
            "  Totals: {} kcal, {}g protein, {}g carbs",
            totals.calories, totals.protein, totals.carbs
        );

        Ok(())
    }
}

fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let Some((credentials, after_at)) = rest.split_once('@') else {
        return url.to_string();
    };

    let Some((username, _password)) = credentials.split_once(':') else {
        return url.to_string();
    };

    format!("{scheme}://{username}:***@{after_at}")
}
