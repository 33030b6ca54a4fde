use storefront_catalog::{CategoryListing, ProductSummary};

use super::html::{attr, escape};

pub fn product_card(product: &ProductSummary) -> String {
    let image = product
        .thumbnail
        .as_deref()
        .map(|src| format!("<img{}{} />", attr("src", src), attr("alt", &product.name)))
        .unwrap_or_default();
    format!(
        "<li class=\"product-card\"><a{}>{image}<h2>{}</h2><p class=\"price\">{}</p></a></li>",
        attr("href", &format!("/products/{}", product.id)),
        escape(&product.name),
        escape(&product.price.to_string()),
    )
}

pub fn product_grid(products: &[ProductSummary]) -> String {
    if products.is_empty() {
        return "<p class=\"empty\">No products yet.</p>".to_string();
    }
    let cards: String = products.iter().map(product_card).collect();
    format!("<ul class=\"product-grid\">{cards}</ul>")
}

pub fn index_page(products: &[ProductSummary]) -> String {
    format!("<h1>Products</h1>{}", product_grid(products))
}

pub fn category_page(listing: &CategoryListing) -> String {
    format!(
        "<h1>{}</h1><p><a href=\"/\">All products</a></p>{}",
        escape(&listing.category.name),
        product_grid(&listing.products)
    )
}
