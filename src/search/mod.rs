//! Progressive filtering of the catalog against a free-text query.
//!
//! Stages run in a fixed order (stock, gender, category, style, price,
//! colour) and each one only ever narrows the view it receives. The colour
//! stage is the exception to "always commit": it is dropped when it would
//! leave nothing, so a colour word never wipes out an otherwise good result.

pub mod intent;

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use tracing::{debug, info};

use crate::catalog::{Catalog, Gender, Product};
pub use intent::{QueryIntent, normalize_query};

/// A filter that actually constrained the result, kept for logging and as
/// generator context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedFilter {
    Gender(Gender),
    Categories(Vec<&'static str>),
    Styles(Vec<&'static str>),
    MaxPrice(u64),
    Colours(Vec<&'static str>),
}

impl Display for AppliedFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gender(gender) => write!(f, "{gender}'s"),
            Self::Categories(values) => write!(f, "Categories: {}", values.join(", ")),
            Self::Styles(values) => write!(f, "Styles: {}", values.join(", ")),
            Self::MaxPrice(max) => write!(f, "Under ₹{max}"),
            Self::Colours(values) => write!(f, "Colors: {}", values.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<'a> {
    pub products: Vec<&'a Product>,
    pub applied_filters: Vec<AppliedFilter>,
    pub normalized_query: String,
}

impl SearchOutcome<'_> {
    pub fn filter_descriptions(&self) -> Vec<String> {
        self.applied_filters
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

type View<'a> = Vec<&'a Product>;

pub fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchOutcome<'a> {
    let normalized_query = normalize_query(query);
    let intent = QueryIntent::detect(&normalized_query);
    let mut applied_filters = Vec::new();

    let mut view: View<'a> = catalog.in_stock().collect();
    debug!(remaining = view.len(), "stock gate");

    if let Some(gender) = intent.gender {
        view = filter_gender(view, &gender);
        debug!(remaining = view.len(), %gender, "gender filter");
        applied_filters.push(AppliedFilter::Gender(gender));
    }

    if !intent.categories.is_empty() {
        view = filter_categories(view, &intent.categories);
        debug!(remaining = view.len(), categories = ?intent.categories, "category filter");
        applied_filters.push(AppliedFilter::Categories(intent.categories));
    }

    if !intent.styles.is_empty() {
        view = filter_styles(view, &intent.styles);
        debug!(remaining = view.len(), styles = ?intent.styles, "style filter");
        applied_filters.push(AppliedFilter::Styles(intent.styles));
    }

    if let Some(max_price) = intent.max_price {
        view = filter_max_price(view, max_price);
        debug!(remaining = view.len(), max_price, "price filter");
        applied_filters.push(AppliedFilter::MaxPrice(max_price));
    }

    if !intent.colours.is_empty() {
        match filter_colours(&view, &intent.colours) {
            Some(narrowed) => {
                view = narrowed;
                debug!(remaining = view.len(), colours = ?intent.colours, "colour filter");
                applied_filters.push(AppliedFilter::Colours(intent.colours));
            }
            None => debug!(colours = ?intent.colours, "colour filter skipped, no match"),
        }
    }

    sort_by_price(&mut view);

    info!(
        query = %normalized_query,
        results = view.len(),
        filters = ?applied_filters.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "search finished"
    );

    SearchOutcome {
        products: view,
        applied_filters,
        normalized_query,
    }
}

pub fn filter_gender<'a>(view: View<'a>, gender: &Gender) -> View<'a> {
    view.into_iter()
        .filter(|product| product.gender.as_ref() == Some(gender))
        .collect()
}

pub fn filter_categories<'a>(view: View<'a>, categories: &[&str]) -> View<'a> {
    view.into_iter()
        .filter(|product| product.is_category(categories))
        .collect()
}

pub fn filter_styles<'a>(view: View<'a>, styles: &[&str]) -> View<'a> {
    view.into_iter()
        .filter(|product| product.is_style(styles))
        .collect()
}

pub fn filter_max_price(view: View<'_>, max_price: u64) -> View<'_> {
    let ceiling = max_price as f64;
    view.into_iter()
        .filter(|product| product.price.is_some_and(|price| price <= ceiling))
        .collect()
}

/// Returns `None` when no product carries any of the colours, leaving the
/// caller's view untouched.
pub fn filter_colours<'a>(view: &[&'a Product], colours: &[&str]) -> Option<View<'a>> {
    let narrowed: View<'a> = view
        .iter()
        .copied()
        .filter(|product| product.colour_contains_any(colours))
        .collect();
    (!narrowed.is_empty()).then_some(narrowed)
}

/// Stable ascending sort; unpriced products go last in their original order.
pub fn sort_by_price(view: &mut View<'_>) {
    view.sort_by(|a, b| match (a.price, b.price) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::{AppliedFilter, search};
    use crate::catalog::{Catalog, Gender, Product};
    use proptest::prelude::*;

    fn product(
        name: &str,
        gender: Gender,
        category: &str,
        style: &str,
        colour: &str,
        price: Option<f64>,
    ) -> Product {
        Product {
            name: name.to_string(),
            price,
            in_stock: true,
            gender: Some(gender),
            category: Some(category.to_string()),
            style: Some(style.to_string()),
            colour: Some(colour.to_string()),
            size: Some("M".to_string()),
            image_path: None,
        }
    }

    fn names<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    fn sample_catalog() -> Catalog {
        let mut sold_out = product(
            "Women Kurti Sold Out",
            Gender::Women,
            "Kurti",
            "Ethnic",
            "Red",
            Some(100.0),
        );
        sold_out.in_stock = false;

        Catalog::from_products(vec![
            product("Women Kurti 1", Gender::Women, "Kurti", "Ethnic", "Red", Some(800.0)),
            product("Men Kurti 2", Gender::Men, "Kurti", "Ethnic", "White", Some(500.0)),
            product("Women Hoodie 3", Gender::Women, "Hoodie", "Casual", "Yellow", Some(1669.0)),
            product("Men Hoodie 4", Gender::Men, "Hoodie", "Sportswear", "Black", Some(950.0)),
            product("Women Dress 5", Gender::Women, "Dress", "Party Wear", "Navy Blue", Some(1200.0)),
            product("Women Dress 6", Gender::Women, "Dress", "Party Wear", "Pink", None),
            sold_out,
        ])
    }

    #[test]
    fn women_kurti_under_price_keeps_only_matching_item() {
        let catalog = Catalog::from_products(vec![
            product("Women Kurti 1", Gender::Women, "Kurti", "Ethnic", "Red", Some(800.0)),
            product("Men Kurti 2", Gender::Men, "Kurti", "Ethnic", "White", Some(500.0)),
        ]);

        let outcome = search(&catalog, "women kurti under 1000");
        assert_eq!(names(&outcome.products), vec!["Women Kurti 1"]);
        assert_eq!(
            outcome.filter_descriptions(),
            vec!["Women's", "Categories: Kurti", "Under ₹1000"]
        );
    }

    #[test]
    fn cheap_hoodie_applies_budget_ceiling_and_category() {
        let catalog = sample_catalog();
        let outcome = search(&catalog, "cheap hoodie");
        assert_eq!(names(&outcome.products), vec!["Men Hoodie 4"]);
        assert_eq!(
            outcome.applied_filters,
            vec![
                AppliedFilter::Categories(vec!["Hoodie"]),
                AppliedFilter::MaxPrice(1000)
            ]
        );
    }

    #[test]
    fn unknown_category_yields_empty_result() {
        let catalog = sample_catalog();
        let outcome = search(&catalog, "women heels under 50");
        assert!(outcome.products.is_empty());
    }

    #[test]
    fn colour_matches_substring_of_colour_field() {
        let catalog = sample_catalog();
        let outcome = search(&catalog, "blue dress party");
        assert_eq!(names(&outcome.products), vec!["Women Dress 5"]);
        assert!(outcome
            .applied_filters
            .contains(&AppliedFilter::Colours(vec!["blue"])));
    }

    #[test]
    fn colour_filter_rolls_back_when_it_would_empty_the_result() {
        let catalog = sample_catalog();
        let outcome = search(&catalog, "green kurti");
        assert_eq!(names(&outcome.products), vec!["Men Kurti 2", "Women Kurti 1"]);
        assert_eq!(
            outcome.applied_filters,
            vec![AppliedFilter::Categories(vec!["Kurti"])]
        );
    }

    #[test]
    fn unpriced_products_sort_last() {
        let catalog = sample_catalog();
        let outcome = search(&catalog, "women dress");
        assert_eq!(names(&outcome.products), vec!["Women Dress 5", "Women Dress 6"]);
    }

    #[test]
    fn plain_query_returns_every_in_stock_product_by_price() {
        let catalog = sample_catalog();
        let outcome = search(&catalog, "  Show Me Something  ");
        assert_eq!(outcome.normalized_query, "show me something");
        assert!(outcome.applied_filters.is_empty());
        assert_eq!(
            names(&outcome.products),
            vec![
                "Men Kurti 2",
                "Women Kurti 1",
                "Men Hoodie 4",
                "Women Dress 5",
                "Women Hoodie 3",
                "Women Dress 6"
            ]
        );
    }

    #[test]
    fn search_does_not_touch_the_catalog() {
        let catalog = sample_catalog();
        let before = catalog.clone();
        let _ = search(&catalog, "women red kurti under 900");
        assert_eq!(catalog, before);
    }

    const QUERY_WORDS: &[&str] = &[
        "women", "men", "guys", "kurti", "hoodie", "dress", "top", "party", "casual", "sport",
        "red", "blue", "black", "pink", "cheap", "under 900", "below 1300", "show", "me",
    ];

    fn arb_query() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(QUERY_WORDS), 0..6)
            .prop_map(|words| words.join(" "))
    }

    proptest! {
        #[test]
        fn results_respect_every_detected_constraint(query in arb_query()) {
            let catalog = sample_catalog();
            let outcome = search(&catalog, &query);
            let intent = super::QueryIntent::detect(&outcome.normalized_query);

            for product in &outcome.products {
                prop_assert!(product.in_stock);
                if let Some(gender) = &intent.gender {
                    prop_assert_eq!(product.gender.as_ref(), Some(gender));
                }
                if let Some(max_price) = intent.max_price {
                    prop_assert!(product.price.is_some_and(|p| p <= max_price as f64));
                }
            }

            let prices: Vec<_> = outcome.products.iter().map(|p| p.price).collect();
            for pair in prices.windows(2) {
                match (pair[0], pair[1]) {
                    (Some(a), Some(b)) => prop_assert!(a <= b),
                    (None, Some(_)) => prop_assert!(false, "unpriced product sorted first"),
                    _ => {}
                }
            }
        }

        #[test]
        fn colour_words_never_empty_a_non_empty_result(query in arb_query()) {
            let catalog = sample_catalog();
            let with_colour = search(&catalog, &format!("{query} green"));
            let without_colour = search(&catalog, &query);
            if !without_colour.products.is_empty() && !query.contains("red")
                && !query.contains("blue") && !query.contains("black") && !query.contains("pink")
            {
                prop_assert_eq!(with_colour.products, without_colour.products);
            }
        }

        #[test]
        fn search_is_idempotent(query in arb_query()) {
            let catalog = sample_catalog();
            prop_assert_eq!(search(&catalog, &query), search(&catalog, &query));
        }
    }
}
