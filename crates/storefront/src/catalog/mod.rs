//! Product catalog.
//!
//! # Architecture
//!
//! - The catalog is read once, from a local JSON file or an HTTP(S) URL
//! - The parsed product list is cached via `moka` for the catalog's lifetime;
//!   concurrent first callers share a single fetch and failures are not
//!   cached, so a later call retries
//! - Every lookup after the first fetch (search, add-to-cart price
//!   resolution) works from the cached list
//!
//! The cart never mutates catalog data. Prices here are in the catalog's
//! source currency; converting them is the caller's job, once, when an item
//! is added.
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_shop_storefront::catalog::{Catalog, CatalogSource, ProductQuery};
//!
//! let catalog = Catalog::new(CatalogSource::parse("data/products.json")?);
//! let phones = catalog
//!     .search(&ProductQuery::text("phone"), &currency)
//!     .await?;
//! ```

mod search;

pub use search::{ProductQuery, SortOrder, search};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use moka::future::Cache;
use pocket_shop_core::{AddItemRequest, DisplayCurrency, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Errors that can occur when loading the catalog.
///
/// Cloneable so a single failed fetch can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {message}")]
    Io { path: String, message: String },

    /// The HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("catalog request returned status {0}")]
    Status(u16),

    /// The catalog body is not a valid product list.
    #[error("JSON parse error: {0}")]
    Parse(String),

    /// The catalog location is neither a path nor a valid URL.
    #[error("invalid catalog location: {0}")]
    InvalidSource(String),
}

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Price in the catalog's source currency.
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Short name when the catalog has one, otherwise the full name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// First image, used as the cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Price converted into whole display-currency units.
    #[must_use]
    pub fn display_price(&self, currency: &DisplayCurrency) -> Option<u64> {
        currency.convert(self.price)
    }

    /// Build an add-to-cart request, converting the price once.
    ///
    /// Returns `None` when the price cannot be converted.
    #[must_use]
    pub fn to_add_request(
        &self,
        currency: &DisplayCurrency,
        quantity: Option<u32>,
    ) -> Option<AddItemRequest> {
        let price = self.display_price(currency)?;
        let mut request = AddItemRequest::new(self.id.clone())
            .with_name(self.name.clone())
            .with_price(price);
        if let Some(image) = self.primary_image() {
            request = request.with_image(image);
        }
        request.quantity = quantity;
        Some(request)
    }
}

/// Where the catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A JSON file on disk.
    File(PathBuf),
    /// A JSON document served over HTTP(S).
    Http(Url),
    /// A product list already in memory.
    Static(Arc<Vec<Product>>),
}

impl CatalogSource {
    /// Interpret `location` as a URL when it has an `http`/`https` scheme,
    /// otherwise as a file path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSource`] for an empty location or a
    /// malformed URL.
    pub fn parse(location: &str) -> Result<Self, CatalogError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(CatalogError::InvalidSource("empty location".to_string()));
        }
        if location.starts_with("http://") || location.starts_with("https://") {
            return Url::parse(location)
                .map(Self::Http)
                .map_err(|e| CatalogError::InvalidSource(e.to_string()));
        }
        Ok(Self::File(PathBuf::from(location)))
    }
}

/// Catalog documents are either a bare product array or an object with a
/// `products` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl CatalogDocument {
    fn into_products(self) -> Vec<Product> {
        match self {
            Self::List(products) | Self::Wrapped { products } => products,
        }
    }
}

/// Cache key for catalog data.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
}

// =============================================================================
// Catalog
// =============================================================================

/// Read-only, cached access to the product catalog.
///
/// Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    source: CatalogSource,
    client: reqwest::Client,
    cache: Cache<CacheKey, Arc<Vec<Product>>>,
    fetches: AtomicUsize,
}

impl Catalog {
    /// Create a catalog reading from `source`. Nothing is fetched until the
    /// first lookup.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                source,
                client: reqwest::Client::new(),
                cache: Cache::builder().max_capacity(1).build(),
                fetches: AtomicUsize::new(0),
            }),
        }
    }

    /// A catalog over an in-memory product list.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self::new(CatalogSource::Static(Arc::new(products)))
    }

    /// Where this catalog reads from.
    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.inner.source
    }

    /// How many times the source has actually been read.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::Relaxed)
    }

    /// All products, fetched on first use and cached afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed. Failures are
    /// not cached.
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        self.inner
            .cache
            .try_get_with(CacheKey::Products, self.fetch())
            .await
            .map_err(|e| (*e).clone())
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn find(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(products.iter().find(|p| &p.id == id).cloned())
    }

    /// Filter and sort the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn search(
        &self,
        query: &ProductQuery,
        currency: &DisplayCurrency,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(search(&products, query, currency))
    }

    #[instrument(skip(self), fields(source = ?self.inner.source))]
    async fn fetch(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        self.inner.fetches.fetch_add(1, Ordering::Relaxed);

        let body = match &self.inner.source {
            CatalogSource::Static(products) => return Ok(Arc::clone(products)),
            CatalogSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| CatalogError::Io {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?
            }
            CatalogSource::Http(url) => self.fetch_http(url).await?,
        };

        let document: CatalogDocument =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let products = document.into_products();
        tracing::info!(count = products.len(), "Catalog loaded");
        Ok(Arc::new(products))
    }

    async fn fetch_http(&self, url: &Url) -> Result<String, CatalogError> {
        let response = self
            .inner
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, url = %url, "Catalog request failed");
            return Err(CatalogError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("source", &self.inner.source)
            .field("fetches", &self.fetch_count())
            .finish_non_exhaustive()
    }
}
