use nutridash_config::Config;
use nutridash_core::Catalogue;
use nutridash_store::FoodStore;

/// Strategy for loading the built-in catalogue into the database.
#[derive(Debug, Clone, Copy)]
pub struct SeedStrategy;

impl super::CommandStrategy for SeedStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        if !config.database.is_enabled() {
            anyhow::bail!("database.url is empty, nothing to seed");
        }

        let catalogue = Catalogue::builtin()?;
        let store = FoodStore::connect(&config.database.url).await?;
        let inserted = store.seed_from_catalogue(&catalogue).await?;

        if inserted == 0 {
            println!("Database already has food items, nothing inserted");
        } else {
            println!("Inserted {inserted} food items with meal logs");
        }

        let stats = store.nutrition_stats().await?;
        println!(
            "Totals: {} kcal, {}g protein, {}g carbs, {}g fat, {}g fiber",
            stats.total_calories,
            stats.total_protein,
            stats.total_carbs,
            stats.total_fat,
            stats.total_fiber
        );
        Ok(())
    }
}
