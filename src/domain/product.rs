use serde::{Deserialize, Serialize};

/// Category assigned to menu items submitted without one.
pub const FALLBACK_CATEGORY: &str = "Autres";

/// Represents a menu item.
///
/// Cart and order lines hold a copy of the product as it was when added,
/// so later edits to the catalog never rewrite past orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            desc: None,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn category_or_fallback(&self) -> &str {
        self.category.as_deref().unwrap_or(FALLBACK_CATEGORY)
    }
}

/// Params for creating a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCreate {
    pub title: String,
    pub price: f64,
    pub desc: Option<String>,
    pub category: Option<String>,
}

/// Params for updating an existing product. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub desc: Option<Option<String>>,
    pub category: Option<Option<String>>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(desc) = self.desc {
            product.desc = desc;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
    }
}

/// Raw menu form input, as typed by an operator.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub title: String,
    pub price: String,
    pub category: String,
    pub desc: String,
}

impl ProductDraft {
    /// Returns `None` when the title or price is missing or the price does not parse.
    pub fn to_create(&self) -> Option<ProductCreate> {
        let title = non_empty(&self.title)?;
        let price = parse_price(&self.price)?;
        Some(ProductCreate {
            title,
            price,
            desc: non_empty(&self.desc),
            category: Some(self.category_or_fallback()),
        })
    }

    /// Edit form: every field is overwritten, the title must stay non-blank and
    /// the price must still parse.
    pub fn to_patch(&self) -> Option<ProductPatch> {
        let title = non_empty(&self.title)?;
        let price = parse_price(&self.price)?;
        Some(ProductPatch {
            title: Some(title),
            price: Some(price),
            desc: Some(non_empty(&self.desc)),
            category: Some(Some(self.category_or_fallback())),
        })
    }

    fn category_or_fallback(&self) -> String {
        non_empty(&self.category).unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
    }
}

/// Parses a price typed in a form. Accepts a decimal comma.
pub fn parse_price(text: &str) -> Option<f64> {
    let price: f64 = text.trim().replace(',', ".").parse().ok()?;
    (price.is_finite() && price >= 0.0).then_some(price)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Catalog served when nothing has been persisted yet.
pub fn default_menu() -> Vec<Product> {
    vec![
        Product::new("p-classic", "Burger Classique", 9.5)
            .with_category("Burgers")
            .with_desc("Boeuf, cheddar, salade, tomate, sauce maison"),
        Product::new("p-chevre", "Burger Chèvre Miel", 11.0)
            .with_category("Burgers")
            .with_desc("Chèvre, miel, oignons confits"),
        Product::new("p-wrap", "Wrap Poulet", 8.0)
            .with_category("Wraps")
            .with_desc("Poulet grillé, crudités, sauce yaourt"),
        Product::new("p-frites", "Menu Burger + Frites", 13.5)
            .with_category("Menus")
            .with_desc("Burger Classique, frites maison, boisson"),
        Product::new("p-cola", "Soda 33cl", 2.5).with_category("Boissons"),
        Product::new("p-brownie", "Brownie", 3.5).with_category("Desserts"),
    ]
}

/// Menu listing: sorted by category then title, filtered by a case-insensitive query
/// over title, description and category.
pub fn search_menu<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.to_lowercase();
    let mut list: Vec<&Product> = products
        .iter()
        .filter(|p| {
            let haystack = format!(
                "{} {} {}",
                p.title,
                p.desc.as_deref().unwrap_or_default(),
                p.category.as_deref().unwrap_or_default()
            );
            haystack.to_lowercase().contains(&needle)
        })
        .collect();
    list.sort_by(|a, b| {
        a.category
            .as_deref()
            .unwrap_or_default()
            .cmp(b.category.as_deref().unwrap_or_default())
            .then_with(|| a.title.cmp(&b.title))
    });
    list
}

/// Distinct categories in first-seen order.
pub fn menu_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        let category = product.category_or_fallback();
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }
    categories
}
