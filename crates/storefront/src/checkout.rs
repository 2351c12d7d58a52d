//! Checkout: order validation, submission, and post-order space
//! reconciliation.
//!
//! # Flow
//!
//! 1. Validate the cart and the customer fields. Nothing is sent unless the
//!    cart is non-empty and both fields pass.
//! 2. Post the order once. A failure here is final and leaves the cart and
//!    the catalog untouched.
//! 3. Push each ordered lesson's locally reduced `spaces` back to the
//!    backend, one lesson at a time. A 404 means the lesson's id went stale;
//!    the catalog is re-fetched and the lesson is found again by subject,
//!    location and price. Failures in this step never undo the order.
//! 4. Clear the cart.

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use lesson_shop_core::{
    CustomerName, CustomerNameError, Lesson, LessonId, Order, PhoneNumber, PhoneNumberError,
};

use crate::api::{ApiError, LessonsApi};
use crate::cart::Cart;

/// Message shown after the backend accepted the order.
pub const ORDER_SUBMITTED_MESSAGE: &str = "Order submitted!";

/// Message shown when the backend rejected the order.
pub const ORDER_FAILED_MESSAGE: &str = "Order failed. Please try again.";

/// Why an order could not be built. No request is made in any of these cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invalid name: {0}")]
    InvalidName(#[from] CustomerNameError),
    #[error("Invalid phone: {0}")]
    InvalidPhone(#[from] PhoneNumberError),
}

/// Raw checkout fields as typed by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
}

impl CheckoutForm {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    #[must_use]
    pub fn valid_name(&self) -> bool {
        CustomerName::parse(&self.name).is_ok()
    }

    #[must_use]
    pub fn valid_phone(&self) -> bool {
        PhoneNumber::parse(&self.phone).is_ok()
    }

    /// Build the order for `cart`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart is empty or a field is invalid.
    pub fn build_order(&self, cart: &Cart) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Order {
            name: CustomerName::parse(&self.name)?,
            phone: PhoneNumber::parse(&self.phone)?,
            items: cart.order_items(),
        })
    }
}

/// Whether the backend accepted the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Submitted,
    Failed,
}

/// A lesson whose remote `spaces` could not be brought in line after a
/// successful order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationGap {
    /// The ordered lesson is no longer in the local catalog.
    #[error("lesson {lesson_id} is not in the local catalog")]
    MissingLocally { lesson_id: LessonId },
    /// The lesson's id went stale and no lesson with the same subject,
    /// location and price exists remotely.
    #[error("lesson {lesson_id} no longer exists and has no match")]
    StaleUnmatched { lesson_id: LessonId },
    /// The update request failed for another reason.
    #[error("updating lesson {lesson_id} failed: {reason}")]
    UpdateFailed { lesson_id: LessonId, reason: String },
}

/// Result of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    pub status: OrderStatus,
    /// Message for the shopper.
    pub message: String,
    /// Lessons whose remote spaces may now disagree with what was ordered.
    /// Always empty for failed orders.
    pub reconciliation_gaps: Vec<ReconciliationGap>,
}

impl OrderOutcome {
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self.status, OrderStatus::Submitted)
    }
}

/// Validate, submit, reconcile, and clear the cart on success.
///
/// `catalog` supplies the local `spaces` to push back for each ordered lesson.
///
/// # Errors
///
/// Returns a [`CheckoutError`] without contacting the backend if the order
/// cannot be built. Backend failures are reported through [`OrderOutcome`].
#[instrument(skip_all, fields(lines = cart.lines().len()))]
pub async fn submit_order<A: LessonsApi>(
    api: &A,
    cart: &mut Cart,
    catalog: &[Lesson],
    form: &CheckoutForm,
) -> Result<OrderOutcome, CheckoutError> {
    let order = form.build_order(cart)?;

    if let Err(e) = api.create_order(&order).await {
        error!(error = %e, "Order submission failed");
        return Ok(OrderOutcome {
            status: OrderStatus::Failed,
            message: ORDER_FAILED_MESSAGE.to_string(),
            reconciliation_gaps: Vec::new(),
        });
    }

    info!(spaces = order.total_quantity(), "Order submitted");

    let reconciliation_gaps = reconcile_spaces(api, catalog, &order).await;
    cart.clear();

    Ok(OrderOutcome {
        status: OrderStatus::Submitted,
        message: ORDER_SUBMITTED_MESSAGE.to_string(),
        reconciliation_gaps,
    })
}

/// Push local `spaces` for every ordered lesson, in order, one at a time.
async fn reconcile_spaces<A: LessonsApi>(
    api: &A,
    catalog: &[Lesson],
    order: &Order,
) -> Vec<ReconciliationGap> {
    let mut gaps = Vec::new();

    for item in &order.items {
        let Some(lesson) = catalog.iter().find(|lesson| lesson.id == item.lesson_id) else {
            gaps.push(ReconciliationGap::MissingLocally {
                lesson_id: item.lesson_id.clone(),
            });
            continue;
        };

        let result = match api.update_spaces(&lesson.id, lesson.spaces).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => recover_stale_lesson(api, lesson).await,
            Err(e) => Err(update_failed(&lesson.id, &e)),
        };

        match result {
            Ok(()) => debug!(lesson_id = %lesson.id, spaces = lesson.spaces, "Spaces reconciled"),
            Err(gap) => gaps.push(gap),
        }
    }

    for gap in &gaps {
        warn!(%gap, "Remote spaces not reconciled");
    }

    gaps
}

/// Find `stale` again by subject, location and price, then write the local
/// `spaces` value to the id the backend uses now.
#[instrument(skip_all, fields(stale_id = %stale.id))]
async fn recover_stale_lesson<A: LessonsApi>(
    api: &A,
    stale: &Lesson,
) -> Result<(), ReconciliationGap> {
    let remote = api
        .list_lessons()
        .await
        .map_err(|e| update_failed(&stale.id, &e))?;

    let Some(current) = remote
        .iter()
        .find(|lesson| lesson.same_listing(&stale.subject, &stale.location, stale.price))
    else {
        return Err(ReconciliationGap::StaleUnmatched {
            lesson_id: stale.id.clone(),
        });
    };

    debug!(new_id = %current.id, "Found stale lesson under a new id");

    api.update_spaces(&current.id, stale.spaces)
        .await
        .map_err(|e| update_failed(&current.id, &e))
}

fn update_failed(lesson_id: &LessonId, e: &ApiError) -> ReconciliationGap {
    ReconciliationGap::UpdateFailed {
        lesson_id: lesson_id.clone(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use lesson_shop_core::Price;

    use super::*;

    /// Recorded backend call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Order(Order),
        Update(String, u32),
    }

    /// In-memory backend with scripted responses.
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<Call>>,
        remote: Mutex<Vec<Lesson>>,
        reject_order: bool,
        missing_ids: Vec<String>,
        failing_ids: Vec<String>,
        list_responses: Mutex<VecDeque<Vec<Lesson>>>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl LessonsApi for FakeApi {
        async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError> {
            self.record(Call::List);
            let scripted = self.list_responses.lock().unwrap().pop_front();
            Ok(scripted.unwrap_or_else(|| self.remote.lock().unwrap().clone()))
        }

        async fn search_lessons(&self, _query: &str) -> Result<Vec<Lesson>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_order(&self, order: &Order) -> Result<(), ApiError> {
            self.record(Call::Order(order.clone()));
            if self.reject_order {
                return Err(ApiError::Api {
                    status: 500,
                    message: "down".to_string(),
                });
            }
            Ok(())
        }

        async fn update_spaces(&self, id: &LessonId, spaces: u32) -> Result<(), ApiError> {
            self.record(Call::Update(id.to_string(), spaces));
            if self.missing_ids.iter().any(|m| m == id.as_str()) {
                return Err(ApiError::NotFound(id.to_string()));
            }
            if self.failing_ids.iter().any(|m| m == id.as_str()) {
                return Err(ApiError::Api {
                    status: 503,
                    message: "busy".to_string(),
                });
            }
            Ok(())
        }
    }

    fn lesson(id: &str, subject: &str, spaces: u32) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            subject: subject.to_string(),
            location: "London".to_string(),
            price: Price::from_units(100),
            spaces,
        }
    }

    fn cart_with(catalog: &mut [Lesson], reservations: &[usize]) -> Cart {
        let mut cart = Cart::new();
        for &idx in reservations {
            assert!(cart.reserve(&mut catalog[idx]));
        }
        cart
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm::new("John Doe", "5551234")
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_calls() {
        let api = FakeApi::default();
        let mut cart = Cart::new();

        let result = submit_order(&api, &mut cart, &[], &valid_form()).await;

        assert_eq!(result, Err(CheckoutError::EmptyCart));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_fields_make_no_calls() {
        let api = FakeApi::default();
        let mut catalog = vec![lesson("A", "Math", 3)];
        let mut cart = cart_with(&mut catalog, &[0]);

        let bad_name = CheckoutForm::new("John123", "5551234");
        let result = submit_order(&api, &mut cart, &catalog, &bad_name).await;
        assert!(matches!(result, Err(CheckoutError::InvalidName(_))));

        let bad_phone = CheckoutForm::new("John Doe", "555-1234");
        let result = submit_order(&api, &mut cart, &catalog, &bad_phone).await;
        assert!(matches!(result, Err(CheckoutError::InvalidPhone(_))));

        assert!(api.calls().is_empty());
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_successful_order_updates_spaces_and_clears_cart() {
        let api = FakeApi::default();
        let mut catalog = vec![lesson("A", "Math", 3), lesson("B", "Art", 5)];
        let mut cart = cart_with(&mut catalog, &[0, 1, 0]);

        let outcome = submit_order(&api, &mut cart, &catalog, &CheckoutForm::new(" Jane ", "123"))
            .await
            .unwrap();

        assert!(outcome.is_submitted());
        assert_eq!(outcome.message, ORDER_SUBMITTED_MESSAGE);
        assert!(outcome.reconciliation_gaps.is_empty());
        assert!(cart.is_empty());

        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        let Call::Order(order) = &calls[0] else {
            panic!("expected order first, got {calls:?}");
        };
        assert_eq!(order.name.as_str(), "Jane");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(calls[1], Call::Update("A".to_string(), 1));
        assert_eq!(calls[2], Call::Update("B".to_string(), 4));
    }

    #[tokio::test]
    async fn test_failed_order_leaves_state_untouched() {
        let api = FakeApi {
            reject_order: true,
            ..FakeApi::default()
        };
        let mut catalog = vec![lesson("A", "Math", 3)];
        let mut cart = cart_with(&mut catalog, &[0]);
        let cart_before = cart.clone();

        let outcome = submit_order(&api, &mut cart, &catalog, &valid_form())
            .await
            .unwrap();

        assert_eq!(outcome.status, OrderStatus::Failed);
        assert_eq!(outcome.message, ORDER_FAILED_MESSAGE);
        assert_eq!(cart, cart_before);
        assert_eq!(catalog[0].spaces, 2);
        // One order attempt, no retry, no updates
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_id_is_recovered_under_new_id() {
        let api = FakeApi {
            missing_ids: vec!["A".to_string()],
            ..FakeApi::default()
        };
        api.remote
            .lock()
            .unwrap()
            .extend([lesson("Z", "Art", 9), lesson("B", "Math", 3)]);

        let mut catalog = vec![lesson("A", "Math", 3)];
        let mut cart = cart_with(&mut catalog, &[0]);

        let outcome = submit_order(&api, &mut cart, &catalog, &valid_form())
            .await
            .unwrap();

        assert!(outcome.is_submitted());
        assert!(outcome.reconciliation_gaps.is_empty());

        let calls = api.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[1], Call::Update("A".to_string(), 2));
        assert_eq!(calls[2], Call::List);
        assert_eq!(calls[3], Call::Update("B".to_string(), 2));
    }

    #[tokio::test]
    async fn test_stale_id_without_match_is_abandoned() {
        let api = FakeApi {
            missing_ids: vec!["A".to_string()],
            ..FakeApi::default()
        };
        api.list_responses
            .lock()
            .unwrap()
            .push_back(vec![lesson("Q", "Music", 4)]);

        let mut catalog = vec![lesson("A", "Math", 3)];
        let mut cart = cart_with(&mut catalog, &[0]);

        let outcome = submit_order(&api, &mut cart, &catalog, &valid_form())
            .await
            .unwrap();

        assert!(outcome.is_submitted());
        assert_eq!(outcome.message, ORDER_SUBMITTED_MESSAGE);
        assert_eq!(
            outcome.reconciliation_gaps,
            vec![ReconciliationGap::StaleUnmatched {
                lesson_id: LessonId::new("A")
            }]
        );
        assert!(cart.is_empty());
        // No further update after the failed match
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_local_lesson_is_skipped() {
        let api = FakeApi::default();
        let mut catalog = vec![lesson("A", "Math", 3), lesson("B", "Art", 2)];
        let mut cart = cart_with(&mut catalog, &[0, 1]);

        // Catalog refreshed by a search that only returned B
        let refreshed = vec![catalog[1].clone()];
        let outcome = submit_order(&api, &mut cart, &refreshed, &valid_form())
            .await
            .unwrap();

        assert_eq!(
            outcome.reconciliation_gaps,
            vec![ReconciliationGap::MissingLocally {
                lesson_id: LessonId::new("A")
            }]
        );
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], Call::Update("B".to_string(), 1));
    }

    #[tokio::test]
    async fn test_other_update_failures_are_not_retried() {
        let api = FakeApi {
            failing_ids: vec!["A".to_string()],
            ..FakeApi::default()
        };
        let mut catalog = vec![lesson("A", "Math", 3), lesson("B", "Art", 2)];
        let mut cart = cart_with(&mut catalog, &[0, 1]);

        let outcome = submit_order(&api, &mut cart, &catalog, &valid_form())
            .await
            .unwrap();

        assert!(outcome.is_submitted());
        assert_eq!(outcome.message, ORDER_SUBMITTED_MESSAGE);
        assert!(matches!(
            outcome.reconciliation_gaps.as_slice(),
            [ReconciliationGap::UpdateFailed { .. }]
        ));

        let updates: HashMap<String, u32> = api
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update(id, spaces) => Some((id, spaces)),
                _ => None,
            })
            .collect();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates["B"], 1);
    }

    #[test]
    fn test_form_validity() {
        assert!(CheckoutForm::new("John Doe", "5551234").valid_name());
        assert!(!CheckoutForm::new("John123", "5551234").valid_name());
        assert!(CheckoutForm::new("John Doe", "5551234").valid_phone());
        assert!(!CheckoutForm::new("John Doe", "555-1234").valid_phone());
    }
}
