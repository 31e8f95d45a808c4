//! Cart fragment templates.
//!
//! Each bound surface gets one fragment: the badge count, the line-item
//! list, and the formatted total. Fragments are HTML-escaped by askama.

use askama::Template;
use pocket_shop_core::{Cart, DisplayCurrency, LineItem};

/// Line item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub count: u64,
}

impl CartView {
    /// Build display data for `cart`, formatting prices in `currency`.
    #[must_use]
    pub fn new(cart: &Cart, currency: &DisplayCurrency) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            total: currency.format(cart.total()),
            count: cart.count(),
        }
    }
}

impl CartItemView {
    fn new(item: &LineItem, currency: &DisplayCurrency) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: currency.format(item.unit_price),
            line_price: currency.format(item.line_total()),
        }
    }
}

/// Cart count badge fragment.
#[derive(Template)]
#[template(source = "{{ count }}", ext = "html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Cart line-item list fragment.
///
/// An empty cart renders a placeholder paragraph instead of an empty list.
#[derive(Template)]
#[template(
    source = r#"{% if cart.items.is_empty() %}<p class="cart-empty">Your cart is empty.</p>{% else %}<ul class="cart-lines">{% for item in cart.items %}<li class="cart-line" data-id="{{ item.id }}">{% if !item.image.is_empty() %}<img src="{{ item.image }}" alt="{{ item.name }}">{% endif %}<span class="cart-line-name">{{ item.name }}</span><span class="cart-line-price">{{ item.price }}</span><button class="cart-qty" data-action="decrement" data-id="{{ item.id }}">-</button><span class="cart-line-qty">{{ item.quantity }}</span><button class="cart-qty" data-action="increment" data-id="{{ item.id }}">+</button><span class="cart-line-total">{{ item.line_price }}</span><button class="cart-remove" data-id="{{ item.id }}">Remove</button></li>{% endfor %}</ul>{% endif %}"#,
    ext = "html"
)]
pub struct CartItemsTemplate<'a> {
    pub cart: &'a CartView,
}

/// Cart total fragment.
#[derive(Template)]
#[template(source = "{{ total }}", ext = "html")]
pub struct CartTotalTemplate<'a> {
    pub total: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_shop_core::{AddItemRequest, ProductId};

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(
            AddItemRequest::new(ProductId::from(1))
                .with_name("Tea & Biscuits")
                .with_price(1200)
                .with_image("/img/tea.jpg")
                .with_quantity(2),
        );
        cart
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let view = CartView::new(&sample_cart(), &DisplayCurrency::default());
        assert_eq!(view.total, "$2,400");
        assert_eq!(view.count, 2);
        let item = view.items.first().unwrap();
        assert_eq!(item.price, "$1,200");
        assert_eq!(item.line_price, "$2,400");
    }

    #[test]
    fn test_items_template_escapes_names() {
        let view = CartView::new(&sample_cart(), &DisplayCurrency::default());
        let html = CartItemsTemplate { cart: &view }.render().unwrap();
        assert!(html.contains("Tea &#38; Biscuits") || html.contains("Tea &amp; Biscuits"));
        assert!(html.contains(r#"data-id="1""#));
        assert!(!html.contains("cart-empty"));
    }

    #[test]
    fn test_items_template_empty_placeholder() {
        let view = CartView::new(&Cart::new(), &DisplayCurrency::default());
        let html = CartItemsTemplate { cart: &view }.render().unwrap();
        assert!(html.contains("cart-empty"));
        assert!(!html.contains("<ul"));
    }

    #[test]
    fn test_count_and_total_templates() {
        assert_eq!(CartCountTemplate { count: 3 }.render().unwrap(), "3");
        assert_eq!(CartTotalTemplate { total: "$0" }.render().unwrap(), "$0");
    }
}
