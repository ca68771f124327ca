//! Menu and category catalog read models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tadka_core::{CategoryId, MenuItemId};

/// Category reference embedded in a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: CategoryId,
    /// Display ordering within the menu.
    pub order: i32,
}

/// A single orderable menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub is_delivery: bool,
    pub category: CategoryRef,
    /// Unit price in euros.
    pub price: Decimal,
}

/// A menu category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
    pub is_delivery: bool,
    /// Display ordering.
    pub order: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_wire_shape() {
        let item = MenuItem {
            id: MenuItemId::generate(),
            name: "Butter Chicken".to_owned(),
            description: "Creamy tomato curry".to_owned(),
            image_url: "https://cdn.example.com/butter-chicken.jpg".to_owned(),
            is_delivery: true,
            category: CategoryRef {
                id: CategoryId::generate(),
                order: 2,
            },
            price: Decimal::new(1290, 2),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["imageURL"], "https://cdn.example.com/butter-chicken.jpg");
        assert_eq!(json["isDelivery"], true);
        assert_eq!(json["category"]["order"], 2);
        assert_eq!(json["price"], 12.9);
    }
}
