use crate::catalog::{Catalog, Product};
use crate::search::SearchOutcome;
use crate::search::intent::detect_gender;

const MATCHES_SHOWN: usize = 2;

/// What the generator is asked to say, and which products go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition<'a> {
    pub prompt: String,
    pub products: Vec<&'a Product>,
    pub kind: CompositionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    Matches,
    Suggestion,
    NoSuggestion,
}

pub struct ResponseComposer<'a> {
    catalog: &'a Catalog,
}

impl<'a> ResponseComposer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn compose(&self, original_query: &str, outcome: &SearchOutcome<'a>) -> Composition<'a> {
        if outcome.products.is_empty() {
            return self.compose_fallback(original_query, &outcome.normalized_query);
        }

        let products: Vec<&'a Product> =
            outcome.products.iter().copied().take(MATCHES_SHOWN).collect();
        let product_lines = products
            .iter()
            .map(|product| match_line(product))
            .collect::<Vec<_>>()
            .join("\n");
        let filters = if outcome.applied_filters.is_empty() {
            "general search".to_string()
        } else {
            outcome.filter_descriptions().join(", ")
        };

        let prompt = format!(
            "User asked: \"{original_query}\"\n\
             Filters applied: {filters}\n\
             Found these matches:\n\
             {product_lines}\n\
             \n\
             Write a SHORT response (max 30 words):\n\
             - Mention 1-2 specific products with prices\n\
             - Be friendly but brief\n\
             - Example: \"Perfect! Try our Women Jeans 30 in orange for ₹883 and Women Hoodie 15 in yellow at ₹1669 😊\"\n"
        );

        Composition {
            prompt,
            products,
            kind: CompositionKind::Matches,
        }
    }

    /// Offers the first in-stock product for the detected gender, ignoring
    /// every other constraint of the query.
    fn compose_fallback(&self, original_query: &str, normalized_query: &str) -> Composition<'a> {
        let gender = detect_gender(normalized_query);
        let suggestion = self
            .catalog
            .in_stock()
            .find(|product| gender.is_none() || product.gender == gender);

        let Some(product) = suggestion else {
            let prompt = format!(
                "User searched: \"{original_query}\"\n\
                 No exact matches found and no alternative is available.\n\
                 \n\
                 Write a SHORT response (max 25 words):\n\
                 - Say we don't have that specific item\n\
                 - Invite them to try a different search\n\
                 - Do not name any product or price\n\
                 - Stay positive\n"
            );
            return Composition {
                prompt,
                products: Vec::new(),
                kind: CompositionKind::NoSuggestion,
            };
        };

        let prompt = format!(
            "User searched: \"{original_query}\"\n\
             No exact matches found.\n\
             \n\
             Alternative: {} - ₹{}\n\
             \n\
             Write a SHORT response (max 25 words):\n\
             - Say we don't have that specific item\n\
             - Suggest the alternative\n\
             - Stay positive\n\
             - Example: \"We don't have that right now, but check out [product name] for ₹[price]!\"\n",
            product.name,
            product.price_label()
        );

        Composition {
            prompt,
            products: vec![product],
            kind: CompositionKind::Suggestion,
        }
    }
}

fn match_line(product: &Product) -> String {
    format!(
        "{} - ₹{} ({}, {})",
        product.name,
        product.price_label(),
        product.category.as_deref().unwrap_or("N/A"),
        product.colour.as_deref().unwrap_or("N/A")
    )
}

#[cfg(test)]
mod tests {
    use super::{CompositionKind, ResponseComposer};
    use crate::catalog::{Catalog, Gender, Product};
    use crate::search::{SearchOutcome, search};

    fn stocked(name: &str, gender: Gender, category: &str, colour: &str, price: f64) -> Product {
        let mut product = Product::new(name);
        product.in_stock = true;
        product.gender = Some(gender);
        product.category = Some(category.to_string());
        product.colour = Some(colour.to_string());
        product.price = Some(price);
        product
    }

    fn catalog() -> Catalog {
        let mut hidden = stocked("Women Top 0", Gender::Women, "Top", "Red", 10.0);
        hidden.in_stock = false;
        Catalog::from_products(vec![
            stocked("Men Jeans 7", Gender::Men, "Jeans", "Blue", 1100.0),
            hidden,
            stocked("Women Jeans 30", Gender::Women, "Jeans", "Orange", 883.0),
            stocked("Women Hoodie 15", Gender::Women, "Hoodie", "Yellow", 1669.0),
            stocked("Women Top 25", Gender::Women, "Top", "Black", 999.0),
        ])
    }

    fn empty_outcome(query: &str) -> SearchOutcome<'static> {
        SearchOutcome {
            products: Vec::new(),
            applied_filters: Vec::new(),
            normalized_query: query.to_lowercase(),
        }
    }

    #[test]
    fn matches_prompt_lists_top_two_products() {
        let catalog = catalog();
        let outcome = search(&catalog, "Women jeans or hoodie or top");
        let composition = ResponseComposer::new(&catalog).compose("Women jeans or hoodie or top", &outcome);

        assert_eq!(composition.kind, CompositionKind::Matches);
        let names: Vec<_> = composition.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Women Jeans 30", "Women Top 25"]);
        insta::assert_snapshot!(composition.prompt.trim_end(), @r#"
        User asked: "Women jeans or hoodie or top"
        Filters applied: Women's, Categories: Hoodie, Top, Jeans
        Found these matches:
        Women Jeans 30 - ₹883 (Jeans, Orange)
        Women Top 25 - ₹999 (Top, Black)

        Write a SHORT response (max 30 words):
        - Mention 1-2 specific products with prices
        - Be friendly but brief
        - Example: "Perfect! Try our Women Jeans 30 in orange for ₹883 and Women Hoodie 15 in yellow at ₹1669 😊"
        "#);
    }

    #[test]
    fn matches_prompt_names_general_search_without_filters() {
        let catalog = catalog();
        let outcome = search(&catalog, "anything nice");
        let composition = ResponseComposer::new(&catalog).compose("anything nice", &outcome);
        assert!(composition.prompt.contains("Filters applied: general search"));
        assert_eq!(composition.products.len(), 2);
    }

    #[test]
    fn fallback_suggests_first_in_stock_product_for_detected_gender() {
        let catalog = catalog();
        let composition =
            ResponseComposer::new(&catalog).compose("women heels", &empty_outcome("women heels"));

        assert_eq!(composition.kind, CompositionKind::Suggestion);
        let names: Vec<_> = composition.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Women Jeans 30"], "catalog order, out of stock skipped");
        assert!(composition.prompt.contains("Alternative: Women Jeans 30 - ₹883"));
        assert!(composition.prompt.contains("max 25 words"));
    }

    #[test]
    fn fallback_without_gender_takes_first_in_stock_product() {
        let catalog = catalog();
        let composition =
            ResponseComposer::new(&catalog).compose("heels", &empty_outcome("heels"));
        assert_eq!(composition.products[0].name, "Men Jeans 7");
    }

    #[test]
    fn fallback_without_candidate_makes_no_product_claim() {
        let catalog = Catalog::from_products(vec![stocked(
            "Men Jeans 7",
            Gender::Men,
            "Jeans",
            "Blue",
            1100.0,
        )]);
        let composition = ResponseComposer::new(&catalog)
            .compose("ladies heels", &empty_outcome("ladies heels"));

        assert_eq!(composition.kind, CompositionKind::NoSuggestion);
        assert!(composition.products.is_empty());
        assert!(!composition.prompt.contains("Men Jeans 7"));
        assert!(composition.prompt.contains("Do not name any product or price"));
    }
}
