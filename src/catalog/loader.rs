use anyhow::{Result, anyhow};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use super::{Catalog, Gender, Product};

const NAME_COLUMN: &str = "product name";
const PRICE_COLUMN: &str = "price";
const STOCK_COLUMN: &str = "in stock";
const IN_STOCK_VALUE: &str = "Yes";

struct Columns {
    name: usize,
    price: usize,
    in_stock: usize,
    gender: Option<usize>,
    category: Option<usize>,
    style: Option<usize>,
    colour: Option<usize>,
    size: Option<usize>,
    image_path: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> std::result::Result<Self, String> {
        let names: Vec<String> = headers
            .iter()
            .map(|header| header.trim().to_lowercase())
            .collect();
        let find = |wanted: &str| names.iter().position(|name| name == wanted);
        let require = |wanted: &str| {
            find(wanted).ok_or_else(|| format!("missing required column '{wanted}'"))
        };

        Ok(Self {
            name: require(NAME_COLUMN)?,
            price: require(PRICE_COLUMN)?,
            in_stock: require(STOCK_COLUMN)?,
            gender: find("gender"),
            category: find("category"),
            style: find("style"),
            colour: find("colour").or_else(|| find("color")),
            size: find("size"),
            image_path: find("image path"),
        })
    }
}

pub fn load_csv(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).map_err(|err| {
        anyhow!(
            "Failed to load catalog {}: unable to open file: {err}",
            path.display()
        )
    })?;
    let catalog = read_catalog(file)
        .map_err(|err| anyhow!("Failed to load catalog {}: {err}", path.display()))?;

    info!(
        path = %path.display(),
        products = catalog.len(),
        in_stock = catalog.in_stock().count(),
        "catalog loaded"
    );
    Ok(catalog)
}

pub(super) fn read_catalog<R: Read>(reader: R) -> std::result::Result<Catalog, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().map_err(|err| err.to_string())?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut products = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| err.to_string())?;
        match product_from_record(&record, &columns) {
            Some(product) => products.push(product),
            // header is line 1
            None => warn!(line = index + 2, "skipping catalog row without a product name"),
        }
    }

    Ok(Catalog::from_products(products))
}

fn product_from_record(record: &csv::StringRecord, columns: &Columns) -> Option<Product> {
    let cell = |index: Option<usize>| {
        index
            .and_then(|index| record.get(index))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    };

    let name = cell(Some(columns.name))?;
    Some(Product {
        name,
        price: cell(Some(columns.price)).and_then(|raw| coerce_price(&raw)),
        in_stock: cell(Some(columns.in_stock)).as_deref() == Some(IN_STOCK_VALUE),
        gender: cell(columns.gender).map(|raw| Gender::parse(&raw)),
        category: cell(columns.category),
        style: cell(columns.style),
        colour: cell(columns.colour),
        size: cell(columns.size),
        image_path: cell(columns.image_path),
    })
}

fn coerce_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}
