//! Navigation Shell: which screen is showing.
//!
//! `go` never validates ids; resolution against the catalog happens when
//! the screen is rendered, and an unknown id renders a not-found
//! placeholder.

use harvest_home_core::{Farm, Product};
use serde::Serialize;

use super::cart::CartStore;
use super::catalog::{BrowseFilter, CatalogStore, SortKey};
use super::checkout::CheckoutSummary;
use super::session::SessionEvent;
use crate::models::View;

/// A view resolved against the current catalog and cart.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", rename_all = "kebab-case")]
pub enum Screen {
    Home {
        farms: Vec<Farm>,
        featured: Vec<Product>,
    },
    Browse {
        products: Vec<Product>,
    },
    Farms {
        farms: Vec<Farm>,
    },
    Farm {
        farm: Farm,
        products: Vec<Product>,
    },
    Product {
        product: Product,
        /// May be absent without being an error.
        farm: Option<Farm>,
    },
    Checkout {
        summary: CheckoutSummary,
    },
    RecipeAssistant,
    NotFound {
        message: String,
    },
}

#[derive(Debug, Default)]
pub struct NavigationShell {
    view: View,
}

impl NavigationShell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current(&self) -> View {
        self.view
    }

    /// Replace the current view unconditionally.
    pub fn go(&mut self, view: View) {
        tracing::debug!(?view, "Navigating");
        self.view = view;
    }

    /// React to session transitions. Signing in always lands on home.
    pub fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SignedIn | SessionEvent::SignedOut => self.view = View::Home,
        }
    }

    /// Resolve the current view.
    #[must_use]
    pub fn resolve(&self, catalog: &CatalogStore, cart: &CartStore) -> Screen {
        match self.view {
            View::Home => Screen::Home {
                farms: catalog.farms().to_vec(),
                featured: catalog.featured().to_vec(),
            },
            View::Browse => Screen::Browse {
                products: catalog
                    .browse(BrowseFilter::All, SortKey::default())
                    .into_iter()
                    .cloned()
                    .collect(),
            },
            View::Farms => Screen::Farms {
                farms: catalog.farms().to_vec(),
            },
            View::Farm(id) => match catalog.farm(id) {
                Some(farm) => Screen::Farm {
                    farm: farm.clone(),
                    products: catalog.products_of_farm(id).cloned().collect(),
                },
                None => Screen::NotFound {
                    message: "Farm not found".to_string(),
                },
            },
            View::Product(id) => match catalog.product(id) {
                Some(product) => Screen::Product {
                    product: product.clone(),
                    farm: catalog.farm(product.farm_id).cloned(),
                },
                None => Screen::NotFound {
                    message: "Product not found".to_string(),
                },
            },
            View::Checkout => Screen::Checkout {
                summary: CheckoutSummary::of(cart),
            },
            View::RecipeAssistant => Screen::RecipeAssistant,
        }
    }
}
