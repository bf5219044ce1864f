mod loader;

use std::fmt::{Display, Formatter};

pub use loader::load_csv;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gender {
    Women,
    Men,
    Other(String),
}

impl Gender {
    pub fn parse(value: &str) -> Self {
        match value {
            "Women" => Self::Women,
            "Men" => Self::Men,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Women => "Women",
            Self::Men => "Men",
            Self::Other(value) => value,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog row after cleaning.
///
/// `price` is `None` when the source value was not numeric; such rows never
/// pass a price ceiling and sort after every priced row.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub price: Option<f64>,
    pub in_stock: bool,
    pub gender: Option<Gender>,
    pub category: Option<String>,
    pub style: Option<String>,
    pub colour: Option<String>,
    pub size: Option<String>,
    pub image_path: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: None,
            in_stock: false,
            gender: None,
            category: None,
            style: None,
            colour: None,
            size: None,
            image_path: None,
        }
    }

    pub fn is_category(&self, wanted: &[&str]) -> bool {
        self.category
            .as_deref()
            .is_some_and(|category| wanted.contains(&category))
    }

    pub fn is_style(&self, wanted: &[&str]) -> bool {
        self.style
            .as_deref()
            .is_some_and(|style| wanted.contains(&style))
    }

    pub fn colour_contains_any(&self, colours: &[&str]) -> bool {
        let Some(colour) = self.colour.as_deref() else {
            return false;
        };
        let colour = colour.to_lowercase();
        colours.iter().any(|wanted| colour.contains(wanted))
    }

    pub fn price_label(&self) -> String {
        format_price(self.price)
    }
}

/// Renders a price the way replies quote it: whole amounts without decimals.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(value) => format!("{value:.2}"),
        None => "unknown".to_string(),
    }
}

/// Immutable product table shared by every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn in_stock(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|product| product.in_stock)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
