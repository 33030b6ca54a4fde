use storefront_catalog::NormalizedProduct;

use crate::config::SiteSettings;

use super::html::{attr, escape};

/// Image carousel: one slide per image, with anchor navigation.
pub fn carousel(product: &NormalizedProduct) -> String {
    let slides: Vec<&str> = product.gallery().collect();
    if slides.is_empty() {
        return "<div class=\"carousel carousel-empty\"></div>".to_string();
    }

    let mut html = String::from("<div class=\"carousel\">");
    for (i, src) in slides.iter().enumerate() {
        html.push_str(&format!(
            "<figure class=\"carousel-slide\" id=\"slide-{i}\"><img{}{} /></figure>",
            attr("src", src),
            attr("alt", &product.name),
        ));
    }
    if slides.len() > 1 {
        html.push_str("<nav class=\"carousel-nav\">");
        for i in 0..slides.len() {
            html.push_str(&format!("<a href=\"#slide-{i}\">{}</a>", i + 1));
        }
        html.push_str("</nav>");
    }
    html.push_str("</div>");
    html
}

/// Category tags, each linking to the filtered listing.
pub fn category_tags(product: &NormalizedProduct) -> String {
    if product.categories.is_empty() {
        return String::new();
    }
    let items: String = product
        .categories
        .iter()
        .map(|c| {
            format!(
                "<li><a class=\"tag\"{}>{}</a></li>",
                attr("href", &format!("/categories/{}", c.id)),
                escape(&c.name)
            )
        })
        .collect();
    format!("<ul class=\"tags\">{items}</ul>")
}

/// Add-to-cart trigger. The external widget reads the `data-item-*` attributes.
pub fn add_to_cart(product: &NormalizedProduct, site: &SiteSettings) -> String {
    let url = site.absolute(&format!("/products/{}", product.id));
    let image = product.thumbnail.as_deref().unwrap_or_default();
    format!(
        "<button class=\"snipcart-add-item\"{}{}{}{}{}>Add to cart</button>",
        attr("data-item-id", product.id.as_str()),
        attr("data-item-price", &product.price.to_decimal_string()),
        attr("data-item-url", &url),
        attr("data-item-image", image),
        attr("data-item-name", &product.name),
    )
}

/// Product detail page body.
pub fn product_page(product: &NormalizedProduct, site: &SiteSettings) -> String {
    format!(
        "<article class=\"product\">{}\
         <div class=\"product-info\"><h1>{}</h1><p class=\"price\">{}</p>\
         <div class=\"description\">{}</div>{}{}</div></article>",
        carousel(product),
        escape(&product.name),
        escape(&product.price.to_string()),
        product.description,
        category_tags(product),
        add_to_cart(product, site),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::CategoryTag;
    use storefront_core::{CategoryId, Price, ProductId};

    fn product() -> NormalizedProduct {
        NormalizedProduct {
            id: ProductId::new("p1").unwrap(),
            name: "Runner \"X\"".to_string(),
            price: Price::from_minor_units(8999),
            description: "<p>Light <em>fast</em></p>".to_string(),
            date_created: None,
            date_updated: None,
            image: Some("https://cms/assets/img1".to_string()),
            thumbnail: Some("https://cms/assets/img1?width=200&height=200&fit=inside".to_string()),
            images: vec!["https://cms/assets/img2".to_string()],
            categories: vec![CategoryTag {
                id: CategoryId::new("c1").unwrap(),
                name: "Shoes & Boots".to_string(),
            }],
        }
    }

    fn site() -> SiteSettings {
        SiteSettings {
            name: "Shop".to_string(),
            public_url: "https://shop.example.com".to_string(),
            cart_api_key: None,
        }
    }

    #[test]
    fn cart_button_carries_widget_attributes() {
        let html = add_to_cart(&product(), &site());
        assert!(html.contains("data-item-id=\"p1\""));
        assert!(html.contains("data-item-price=\"89.99\""));
        assert!(html.contains("data-item-url=\"https://shop.example.com/products/p1\""));
        assert!(html.contains(
            "data-item-image=\"https://cms/assets/img1?width=200&amp;height=200&amp;fit=inside\""
        ));
        assert!(html.contains("data-item-name=\"Runner &quot;X&quot;\""));
    }

    #[test]
    fn page_renders_description_as_is_and_escapes_the_rest() {
        let html = product_page(&product(), &site());
        assert!(html.contains("<div class=\"description\"><p>Light <em>fast</em></p></div>"));
        assert!(html.contains("<h1>Runner &quot;X&quot;</h1>"));
        assert!(html.contains("<p class=\"price\">$89.99</p>"));
        assert!(html.contains("href=\"/categories/c1\">Shoes &amp; Boots</a>"));
        assert_eq!(html.matches("carousel-slide").count(), 2);
        assert!(html.contains("href=\"#slide-1\""));
    }

    #[test]
    fn no_images_no_tags() {
        let mut p = product();
        p.image = None;
        p.thumbnail = None;
        p.images.clear();
        p.categories.clear();

        let html = product_page(&p, &site());
        assert!(html.contains("carousel-empty"));
        assert!(!html.contains("class=\"tags\""));
        assert!(html.contains("data-item-image=\"\""));
    }
}
