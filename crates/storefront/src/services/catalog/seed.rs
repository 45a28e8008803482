//! Bundled catalog for offline and demo operation.

use async_trait::async_trait;
use harvest_home_core::{Category, Farm, FarmId, Price, Product, ProductId};

use super::{CatalogError, CatalogSource};

/// Serves the bundled farms and products. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedCatalog;

#[async_trait]
impl CatalogSource for SeedCatalog {
    async fn fetch_farms(&self) -> Result<Vec<Farm>, CatalogError> {
        Ok(farms())
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(products())
    }
}

fn farm(
    id: i32,
    name: &str,
    location: &str,
    story: &str,
    certifications: &[&str],
    image_url: &str,
    cover_image_url: &str,
) -> Farm {
    Farm {
        id: FarmId::new(id),
        name: name.to_string(),
        location: location.to_string(),
        story: story.to_string(),
        certifications: certifications.iter().map(ToString::to_string).collect(),
        image_url: image_url.to_string(),
        cover_image_url: cover_image_url.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: i32,
    name: &str,
    description: &str,
    cents: u32,
    unit: &str,
    farm_id: i32,
    category: Category,
    image_url: &str,
    stock: u32,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Price::from_cents(cents),
        unit: unit.to_string(),
        farm_id: FarmId::new(farm_id),
        category,
        image_url: image_url.to_string(),
        stock,
    }
}

/// The bundled farms, in display order.
#[must_use]
pub fn farms() -> Vec<Farm> {
    vec![
        farm(
            1,
            "Golden Valley Acres",
            "California, USA",
            "Family-owned sustainable farm providing the freshest seasonal produce since 1985. We believe in regenerative agriculture and treating the land with respect.",
            &["Organic", "Non-GMO"],
            "https://images.unsplash.com/photo-1500937386664-56d1dfef3854?q=80&w=1470&auto=format&fit=crop",
            "https://images.unsplash.com/photo-1495107334309-fcf20504a5ab?q=80&w=2070&auto=format&fit=crop",
        ),
        farm(
            2,
            "Toscana Fields",
            "Tuscany, Italy",
            "Bringing the authentic taste of Italy to your table. Our heritage grains and heirloom vegetables are grown using methods passed down through generations.",
            &["DOP", "Organic"],
            "https://images.unsplash.com/photo-1516253593875-bd7ba052fbc5?q=80&w=1470&auto=format&fit=crop",
            "https://images.unsplash.com/photo-1500382017468-9049fed747ef?q=80&w=1632&auto=format&fit=crop",
        ),
        farm(
            3,
            "Serra do Mar Coffee",
            "Minas Gerais, Brazil",
            "High-altitude coffee beans grown with passion. We prioritize fair trade practices and support our local community of harvesters.",
            &["Fair Trade", "Rainforest Alliance"],
            "https://images.unsplash.com/photo-1524350876685-274059332603?q=80&w=1470&auto=format&fit=crop",
            "https://images.unsplash.com/photo-1447933601403-0c6688de566e?q=80&w=1922&auto=format&fit=crop",
        ),
    ]
}

/// The bundled products, in display order.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        product(
            101,
            "Heirloom Tomatoes",
            "Juicy, colorful, and bursting with flavor. These tomatoes are vine-ripened and perfect for salads, sandwiches, or just eating with a little sea salt.",
            499,
            "lb",
            1,
            Category::Vegetable,
            "https://images.unsplash.com/photo-1592924357228-91a4daadcfea?q=80&w=1000&auto=format&fit=crop",
            50,
        ),
        product(
            102,
            "Rainbow Carrots",
            "Crunchy and sweet carrots in a variety of vibrant colors. High in beta-carotene and antioxidants.",
            349,
            "bunch",
            1,
            Category::Vegetable,
            "https://images.unsplash.com/photo-1447175008436-812394212f22?q=80&w=1000&auto=format&fit=crop",
            30,
        ),
        product(
            104,
            "Organic Spinach",
            "Tender, dark green leaves packed with iron and vitamins. Perfect for salads or sautéing.",
            399,
            "bag",
            1,
            Category::Vegetable,
            "https://images.unsplash.com/photo-1576045057995-568f588f82fb?q=80&w=1000&auto=format&fit=crop",
            40,
        ),
        product(
            105,
            "Red Bell Peppers",
            "Sweet and crisp red peppers, excellent for roasting or eating raw.",
            199,
            "each",
            1,
            Category::Vegetable,
            "https://images.unsplash.com/photo-1563565375-f3fdf5bcd374?q=80&w=1000&auto=format&fit=crop",
            60,
        ),
        product(
            106,
            "Sweet Potatoes",
            "Rich, orange-fleshed sweet potatoes. A comforting staple for any meal.",
            149,
            "lb",
            1,
            Category::Vegetable,
            "https://images.unsplash.com/photo-1596097635121-14b63b7a0c19?q=80&w=1000&auto=format&fit=crop",
            75,
        ),
        product(
            107,
            "English Cucumbers",
            "Crisp, thin-skinned cucumbers. Refreshing and seedless.",
            249,
            "each",
            1,
            Category::Vegetable,
            "https://images.unsplash.com/photo-1604543506240-422204c4418f?q=80&w=1000&auto=format&fit=crop",
            45,
        ),
        product(
            103,
            "Organic Strawberries",
            "Sweet, sun-ripened strawberries picked at the peak of freshness. No synthetic pesticides or fertilizers.",
            699,
            "lb",
            1,
            Category::Fruit,
            "https://images.unsplash.com/photo-1464965911861-746a04b4b0be?q=80&w=1000&auto=format&fit=crop",
            40,
        ),
        product(
            302,
            "Gala Apples",
            "Crisp and sweet with a mild flavor. Great for snacking, baking, or salads.",
            299,
            "lb",
            3,
            Category::Fruit,
            "https://images.unsplash.com/photo-1560806887-1e4cd0b6cbd6?q=80&w=1000&auto=format&fit=crop",
            100,
        ),
        product(
            108,
            "Fresh Blueberries",
            "Plump and juicy blueberries, full of antioxidants.",
            599,
            "pint",
            1,
            Category::Fruit,
            "https://images.unsplash.com/photo-1498557850523-fd3d118b962e?q=80&w=1000&auto=format&fit=crop",
            55,
        ),
        product(
            109,
            "Juicy Peaches",
            "Fragrant and soft peaches with a honey-like sweetness.",
            349,
            "lb",
            1,
            Category::Fruit,
            "https://images.unsplash.com/photo-1595123550441-d377e017de6a?q=80&w=1000&auto=format&fit=crop",
            35,
        ),
        product(
            110,
            "Hass Avocados",
            "Creamy and rich avocados, perfect for guacamole or toast.",
            199,
            "each",
            1,
            Category::Fruit,
            "https://images.unsplash.com/photo-1601039641847-7857b994d704?q=80&w=1000&auto=format&fit=crop",
            65,
        ),
        product(
            111,
            "Organic Lemons",
            "Bright and zesty lemons to add a pop of acid to your dishes.",
            99,
            "each",
            1,
            Category::Fruit,
            "https://images.unsplash.com/photo-1595855709915-39317bd63b84?q=80&w=1000&auto=format&fit=crop",
            80,
        ),
        product(
            112,
            "Watermelon",
            "Sweet and refreshing summer treat.",
            600,
            "each",
            3,
            Category::Fruit,
            "https://images.unsplash.com/photo-1587049352846-4a222e784d38?q=80&w=1000&auto=format&fit=crop",
            20,
        ),
        product(
            201,
            "Artisanal Cheddar Cheese",
            "Aged for 18 months, this sharp cheddar is rich, nutty, and has a delightful crystalline texture.",
            1250,
            "block",
            2,
            Category::Dairy,
            "https://images.unsplash.com/photo-1486297678162-eb2a19b0a32d?q=80&w=1000&auto=format&fit=crop",
            20,
        ),
        product(
            203,
            "Pasture-Raised Eggs",
            "Golden yolks from happy hens that roam free on the pasture. Rich in Omega-3s.",
            750,
            "dozen",
            2,
            Category::Dairy,
            "https://images.unsplash.com/photo-1582722872445-44dc5f7e3c8f?q=80&w=1000&auto=format&fit=crop",
            60,
        ),
        product(
            204,
            "Fresh Goat Cheese",
            "Tangy and creamy goat cheese, rolled in fresh herbs.",
            899,
            "log",
            2,
            Category::Dairy,
            "https://images.unsplash.com/photo-1452195100486-9cc805987862?q=80&w=1000&auto=format&fit=crop",
            25,
        ),
        product(
            205,
            "Whole Milk",
            "Creamy, non-homogenized milk from grass-fed cows.",
            549,
            "gallon",
            2,
            Category::Dairy,
            "https://images.unsplash.com/photo-1550583724-b2692b85b150?q=80&w=1000&auto=format&fit=crop",
            40,
        ),
        product(
            206,
            "Greek Yogurt",
            "Thick and protein-rich yogurt made with traditional methods.",
            649,
            "jar",
            2,
            Category::Dairy,
            "https://images.unsplash.com/photo-1488477181946-6428a0291777?q=80&w=1000&auto=format&fit=crop",
            35,
        ),
        product(
            207,
            "Salted Butter",
            "Hand-churned butter with a sprinkle of sea salt.",
            800,
            "block",
            2,
            Category::Dairy,
            "https://images.unsplash.com/photo-1589985270826-4b7bb135bc9d?q=80&w=1000",
            30,
        ),
        product(
            202,
            "Artisanal Sourdough",
            "Crusty on the outside, soft and tangy on the inside. Made with natural leaven and organic flour.",
            800,
            "loaf",
            2,
            Category::Bakery,
            "https://images.unsplash.com/photo-1585476992467-32ea55406c35?q=80&w=1000&auto=format&fit=crop",
            15,
        ),
        product(
            208,
            "French Baguette",
            "Traditional long loaf with a crisp crust and airy crumb.",
            350,
            "loaf",
            2,
            Category::Bakery,
            "https://images.unsplash.com/photo-1597079910443-60c43fc4f718?q=80&w=1000&auto=format&fit=crop",
            40,
        ),
        product(
            209,
            "Butter Croissants",
            "Flaky, buttery pastries baked fresh every morning.",
            300,
            "each",
            2,
            Category::Bakery,
            "https://images.unsplash.com/photo-1555507036-ab1f40388085?q=80&w=1000",
            50,
        ),
        product(
            210,
            "Chocolate Chip Cookies",
            "Chewy cookies loaded with dark chocolate chunks.",
            200,
            "each",
            2,
            Category::Bakery,
            "https://images.unsplash.com/photo-1499636138143-bd630f5cf388?q=80&w=1000&auto=format&fit=crop",
            60,
        ),
        product(
            301,
            "Wildflower Honey",
            "Pure, raw honey gathered from diverse wildflowers. Unfiltered and full of natural enzymes.",
            1500,
            "jar",
            3,
            Category::Artisanal,
            "https://images.unsplash.com/photo-1558642452-9d2a7deb7f62?q=80&w=1000",
            25,
        ),
        product(
            211,
            "Extra Virgin Olive Oil",
            "Cold-pressed from hand-picked Tuscan olives.",
            2499,
            "bottle",
            2,
            Category::Artisanal,
            "https://images.unsplash.com/photo-1474979266404-7eaacbcd87c5?q=80&w=1000&auto=format&fit=crop",
            40,
        ),
        product(
            113,
            "Strawberry Jam",
            "Homemade jam with chunks of organic strawberries.",
            850,
            "jar",
            1,
            Category::Artisanal,
            "https://images.unsplash.com/photo-1600180489670-4966779427b0?q=80&w=1000&auto=format&fit=crop",
            35,
        ),
        product(
            303,
            "Maple Granola",
            "Crunchy baked oats with maple syrup and nuts.",
            999,
            "bag",
            3,
            Category::Artisanal,
            "https://images.unsplash.com/photo-1517093710776-80db61b29a28?q=80&w=1000&auto=format&fit=crop",
            30,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_unique() {
        let farm_ids: HashSet<_> = farms().iter().map(|f| f.id).collect();
        assert_eq!(farm_ids.len(), farms().len());

        let product_ids: HashSet<_> = products().iter().map(|p| p.id).collect();
        assert_eq!(product_ids.len(), products().len());
    }

    #[test]
    fn test_every_product_has_a_farm() {
        let farm_ids: HashSet<_> = farms().iter().map(|f| f.id).collect();
        for product in products() {
            assert!(farm_ids.contains(&product.farm_id), "{}", product.name);
        }
    }

    #[test]
    fn test_seed_prices() {
        let products = products();
        let tomatoes = products.iter().find(|p| p.id == ProductId::new(101));
        assert_eq!(tomatoes.map(|p| p.price.to_string()).as_deref(), Some("$4.99"));
        let honey = products.iter().find(|p| p.id == ProductId::new(301));
        assert_eq!(honey.map(|p| p.price.to_string()).as_deref(), Some("$15.00"));
    }
}
