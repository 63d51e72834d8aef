//! Seed the database with demo catalog data.

use alto_core::Price;
use alto_server::models::{NewProduct, NewVariation};
use alto_server::storage::{PgStorage, Storage, postgres::create_pool};

use super::{CliError, database_url};

/// Insert a small demo catalog.
///
/// Safe to re-run; products are inserted fresh each time, so repeated runs
/// duplicate the catalog.
pub async fn run() -> Result<(), CliError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let storage = PgStorage::new(pool);

    let products = [
        (
            NewProduct {
                name: "Lampe Dune".to_owned(),
                color: "terracotta".to_owned(),
                description: "Table lamp with a ribbed ceramic base.".to_owned(),
                price: Price::from_cents(11_900),
                stock: 12,
                image_url: None,
            },
            vec![
                NewVariation {
                    color: "sable".to_owned(),
                    price: None,
                    stock: 8,
                    image_url: None,
                },
                NewVariation {
                    color: "noir".to_owned(),
                    price: Some(Price::from_cents(12_900)),
                    stock: 4,
                    image_url: None,
                },
            ],
        ),
        (
            NewProduct {
                name: "Applique Galet".to_owned(),
                color: "blanc".to_owned(),
                description: "Wall light in matte plaster.".to_owned(),
                price: Price::from_cents(8_900),
                stock: 20,
                image_url: None,
            },
            vec![],
        ),
        (
            NewProduct {
                name: "Tabouret Brume".to_owned(),
                color: "chene".to_owned(),
                description: "Low stool in solid oak.".to_owned(),
                price: Price::from_cents(14_500),
                stock: 6,
                image_url: None,
            },
            vec![NewVariation {
                color: "noyer".to_owned(),
                price: Some(Price::from_cents(15_900)),
                stock: 3,
                image_url: None,
            }],
        ),
    ];

    for (product, variations) in products {
        let created = storage.create_product(product).await?;
        tracing::info!("Seeded product {} (id {})", created.name, created.id);
        for variation in variations {
            storage.create_variation(created.id, variation).await?;
        }
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
