use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use crate::domain::session::Item;
use crate::error::AppError;

/// Source of the priced object a game is played over.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_random_item(&self) -> Result<Item, AppError>;
}

/// Product record as served by the catalog API.
#[derive(Debug, Deserialize)]
struct CatalogProduct {
    title: String,
    image: String,
    price: f64,
}

/// Fetches the full product list from a fakestore-shaped catalog and picks
/// one uniformly at random.
pub struct HttpItemSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpItemSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ItemSource for HttpItemSource {
    async fn fetch_random_item(&self) -> Result<Item, AppError> {
        let url = format!("{}/products", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::upstream(format!(
                "item catalog returned {}",
                response.status()
            )));
        }

        let products: Vec<CatalogProduct> = response.json().await?;
        if products.is_empty() {
            return Err(AppError::upstream("item catalog returned no products"));
        }

        let pick = rand::rng().random_range(0..products.len());
        let product = &products[pick];
        debug!(name = %product.title, price = product.price, "picked catalog item");

        Ok(Item {
            name: product.title.clone(),
            image_url: product.image.clone(),
            price: product.price,
        })
    }
}
