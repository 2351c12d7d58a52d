//! Order request bodies sent to the lessons backend.

use serde::{Deserialize, Serialize};

use crate::types::{CustomerName, LessonId, PhoneNumber};

/// An order as posted to `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub items: Vec<OrderItem>,
}

/// One ordered lesson and how many spaces of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub lesson_id: LessonId,
    pub quantity: u32,
}

/// Body of `PUT /lessons/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacesUpdate {
    pub spaces: u32,
}

impl Order {
    /// Total number of spaces across all items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_wire_shape() {
        let order = Order {
            name: CustomerName::parse(" John Doe ").unwrap(),
            phone: PhoneNumber::parse("5551234").unwrap(),
            items: vec![
                OrderItem {
                    lesson_id: LessonId::new("A"),
                    quantity: 2,
                },
                OrderItem {
                    lesson_id: LessonId::new("C"),
                    quantity: 1,
                },
            ],
        };

        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({
                "name": "John Doe",
                "phone": "5551234",
                "items": [
                    {"lessonId": "A", "quantity": 2},
                    {"lessonId": "C", "quantity": 1}
                ]
            })
        );
        assert_eq!(order.total_quantity(), 3);
    }

    #[test]
    fn test_spaces_update_shape() {
        assert_eq!(
            serde_json::to_value(SpacesUpdate { spaces: 4 }).unwrap(),
            json!({"spaces": 4})
        );
    }
}
