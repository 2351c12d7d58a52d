//! `order` - reserve lessons and submit them in one step.

use std::str::FromStr;

use tracing::{info, instrument};

use lesson_shop_core::LessonId;
use lesson_shop_storefront::{HttpLessonsApi, Result, ShopConfig, ShopError, Storefront};

use crate::render;

/// One `--lesson ID[:QUANTITY]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    pub lesson_id: LessonId,
    pub quantity: u32,
}

impl FromStr for LessonRequest {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (id, quantity) = match s.split_once(':') {
            Some((id, quantity)) => {
                let quantity = quantity
                    .parse::<u32>()
                    .map_err(|_| format!("invalid quantity '{quantity}' in '{s}'"))?;
                (id, quantity)
            }
            None => (s, 1),
        };

        let id = id.trim();
        if id.is_empty() {
            return Err(format!("missing lesson id in '{s}'"));
        }
        if quantity == 0 {
            return Err(format!("quantity must be at least 1 in '{s}'"));
        }

        Ok(Self {
            lesson_id: LessonId::new(id),
            quantity,
        })
    }
}

/// Load the catalog, reserve every requested space and submit the order.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched, a lesson is unknown or
/// short of spaces, the customer details are invalid, or the backend rejects
/// the order.
#[instrument(skip_all, fields(lessons = requests.len()))]
pub async fn place(
    config: &ShopConfig,
    name: &str,
    phone: &str,
    requests: &[LessonRequest],
) -> Result<()> {
    let mut store = Storefront::new(HttpLessonsApi::new(config)?);
    store.load().await?;

    for request in requests {
        reserve(&mut store, request)?;
    }

    store.set_checkout(name, phone);
    let outcome = store.submit_order().await?;
    render::order_outcome(&outcome);

    if !outcome.is_submitted() {
        return Err(ShopError::OrderFailed);
    }

    info!(gaps = outcome.reconciliation_gaps.len(), "Order placed");
    Ok(())
}

/// Reserve `request.quantity` spaces, checking availability up front so a
/// short lesson reserves nothing.
fn reserve(store: &mut Storefront<HttpLessonsApi>, request: &LessonRequest) -> Result<()> {
    let available = store
        .lessons()
        .iter()
        .find(|lesson| lesson.id == request.lesson_id)
        .map(|lesson| lesson.spaces)
        .ok_or_else(|| ShopError::UnknownLesson(request.lesson_id.to_string()))?;

    if available < request.quantity {
        return Err(ShopError::NotEnoughSpaces {
            lesson_id: request.lesson_id.to_string(),
            available,
        });
    }

    for _ in 0..request.quantity {
        store.add_to_cart(&request.lesson_id);
    }
    Ok(())
}
