//! Image substitutions applied to remotely loaded catalog rows.
//!
//! The hosted tables carry placeholder imagery for some entries. These
//! tables replace it after fetch; a remote value is kept when nothing
//! matches.

use harvest_home_core::{Farm, Product};

/// Product image replacements, keyed by exact product name.
const PRODUCT_IMAGES: &[(&str, &str)] = &[
    (
        "Heirloom Tomatoes",
        "https://images.unsplash.com/photo-1615485925575-b0354a73752d?q=80&w=800&auto=format&fit=crop",
    ),
    (
        "Rainbow Carrots",
        "https://images.unsplash.com/photo-1585375108879-e2ab463df32a?q=80&w=800&auto=format&fit=crop",
    ),
    (
        "Organic Strawberries",
        "https://images.unsplash.com/photo-1601004890684-d8cbf643f5f2?q=80&w=800&auto=format&fit=crop",
    ),
    (
        "Artisanal Cheddar Cheese",
        "https://images.unsplash.com/photo-1618164436241-44752046d609?q=80&w=800&auto=format&fit=crop",
    ),
    (
        "Artisanal Sourdough",
        "https://images.unsplash.com/photo-1589988832945-8145a57a0528?q=80&w=800&auto=format&fit=crop",
    ),
    (
        "Pasture-Raised Eggs",
        "https://images.unsplash.com/photo-1598965675045-a1df16f27d49?q=80&w=800&auto=format&fit=crop",
    ),
    (
        "Wildflower Honey",
        "https://images.unsplash.com/photo-1558642452-9d2a7deb7f62?q=80&w=800&auto=format&fit=crop",
    ),
    (
        "Gala Apples",
        "https://images.unsplash.com/photo-1579613832125-5d34a13ffe2a?q=80&w=800&auto=format&fit=crop",
    ),
];

/// Display identity for the first farms in id order.
struct FarmOverride {
    name: &'static str,
    location: &'static str,
    image_url: &'static str,
    cover_image_url: &'static str,
}

const FARM_OVERRIDES: &[FarmOverride] = &[
    FarmOverride {
        name: "Golden Valley Acres",
        location: "California, USA",
        image_url: "https://images.unsplash.com/photo-1560493676-04071c5f467b?q=80&w=800&auto=format&fit=crop",
        cover_image_url: "https://images.unsplash.com/photo-1425913502235-e41249b65846?q=80&w=1600&auto=format&fit=crop",
    },
    FarmOverride {
        name: "Toscana Fields",
        location: "Tuscany, Italy",
        image_url: "https://images.unsplash.com/photo-1536858974309-96399a19d849?q=80&w=800&auto=format&fit=crop",
        cover_image_url: "https://images.unsplash.com/photo-1506012787146-f92b2d7d6d96?q=80&w=1600&auto=format&fit=crop",
    },
    FarmOverride {
        name: "Serra do Mar Coffee",
        location: "Minas Gerais, Brazil",
        image_url: "https://images.unsplash.com/photo-1447933601403-0c6688de566e?q=80&w=800&auto=format&fit=crop",
        cover_image_url: "https://images.unsplash.com/photo-1511920183353-3c9c9b062c1d?q=80&w=1600&auto=format&fit=crop",
    },
];

/// Replace product images whose name has a substitution.
pub fn apply_product_images(products: &mut [Product]) {
    for product in products {
        if let Some((_, url)) = PRODUCT_IMAGES.iter().find(|(name, _)| *name == product.name) {
            product.image_url = (*url).to_string();
        }
    }
}

/// Rebrand the leading farms. Farms beyond the override table are left
/// untouched, as are story and certifications.
pub fn apply_farm_overrides(farms: &mut [Farm]) {
    for (farm, over) in farms.iter_mut().zip(FARM_OVERRIDES) {
        farm.name = over.name.to_string();
        farm.location = over.location.to_string();
        farm.image_url = over.image_url.to_string();
        farm.cover_image_url = over.cover_image_url.to_string();
    }
}
