use serde::Serialize;

use crate::catalog::Product;

pub const STATIC_ROOT: &str = "/static/";
pub const IMAGE_ROOT: &str = "/static/images/";
const MISSING: &str = "N/A";

/// Display record sent to the chat page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub name: String,
    pub price: i64,
    pub size: String,
    pub style: String,
    pub gender: String,
    pub category: String,
    pub colour: String,
    pub image: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let text = |value: Option<&str>| value.unwrap_or(MISSING).to_string();

        Self {
            name: product.name.clone(),
            // truncation toward zero, unpriced rows show 0
            price: product.price.map_or(0, |price| price as i64),
            size: text(product.size.as_deref()),
            style: text(product.style.as_deref()),
            gender: text(product.gender.as_ref().map(|gender| gender.as_str())),
            category: text(product.category.as_deref()),
            colour: text(product.colour.as_deref()),
            image: image_path(&product.name, product.image_path.as_deref()),
        }
    }
}

pub fn format_products(products: &[&Product]) -> Vec<ProductCard> {
    products.iter().map(|product| ProductCard::from(*product)).collect()
}

pub fn image_path(name: &str, source: Option<&str>) -> String {
    let source = source.map(str::trim).unwrap_or_default();
    if source.is_empty() || source.eq_ignore_ascii_case("nan") {
        let slug = name.to_lowercase().replace(' ', "-");
        format!("{IMAGE_ROOT}{slug}.jpg")
    } else if !source.starts_with(STATIC_ROOT) {
        format!("{IMAGE_ROOT}{source}")
    } else {
        source.to_string()
    }
}
