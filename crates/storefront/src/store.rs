//! Storefront session state.
//!
//! [`Storefront`] owns everything the shopper can change: the catalog as last
//! fetched, the cart, sort and search settings, the checkout form and the
//! last order message. Front ends mutate it through its methods and render
//! the immutable [`StorefrontView`] returned by [`Storefront::view`].
//!
//! # Catalog fetches
//!
//! Each fetch takes a [`FetchTicket`] before the request goes out. A response
//! is applied only if no newer fetch has started since, so a slow response
//! for an old query never replaces the results of a newer one.

use tracing::{debug, instrument, warn};

use lesson_shop_core::{Lesson, LessonId, Price};

use crate::api::{ApiError, LessonsApi, fetch_catalog};
use crate::cart::{Cart, CartLine};
use crate::catalog::{SortOrder, visible_lessons};
use crate::checkout::{self, CheckoutError, CheckoutForm, OrderOutcome};

/// Sequence number of one catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Everything a front end needs to draw the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontView {
    /// Catalog after the local filter and the sort.
    pub lessons: Vec<Lesson>,
    pub cart: Vec<CartLine>,
    pub cart_count: u32,
    pub cart_total: Price,
    pub show_cart: bool,
    pub sort: SortOrder,
    pub search_query: String,
    pub valid_name: bool,
    pub valid_phone: bool,
    pub can_checkout: bool,
    pub order_message: String,
}

/// Storefront state bound to one lessons backend.
#[derive(Debug)]
pub struct Storefront<A> {
    api: A,
    lessons: Vec<Lesson>,
    cart: Cart,
    show_cart: bool,
    sort: SortOrder,
    search_query: String,
    checkout: CheckoutForm,
    order_message: String,
    latest_fetch: u64,
}

impl<A: LessonsApi> Storefront<A> {
    /// Create an empty storefront. Call [`Storefront::load`] to fill the catalog.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            lessons: Vec::new(),
            cart: Cart::new(),
            show_cart: false,
            sort: SortOrder::default(),
            search_query: String::new(),
            checkout: CheckoutForm::default(),
            order_message: String::new(),
            latest_fetch: 0,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The catalog as last fetched, unfiltered and unsorted.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] if the catalog could not be fetched; the
    /// previous catalog is kept.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let ticket = self.begin_fetch();
        let lessons = self.api.list_lessons().await?;
        self.apply_fetch(ticket, Ok(lessons));
        Ok(())
    }

    /// Replace the catalog with what the backend has for `query`.
    ///
    /// An empty query reloads the full catalog. On failure the previous
    /// catalog stays. Returns whether the catalog was replaced.
    #[instrument(skip(self))]
    pub async fn run_search(&mut self, query: &str) -> bool {
        let ticket = self.begin_fetch();
        let result = fetch_catalog(&self.api, query).await;
        self.apply_fetch(ticket, result)
    }

    /// Register a catalog fetch that is about to be sent.
    pub const fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch += 1;
        FetchTicket(self.latest_fetch)
    }

    /// Apply the response of the fetch identified by `ticket`.
    ///
    /// Responses to superseded fetches and failed fetches leave the catalog
    /// as it is. Returns whether the catalog was replaced.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Lesson>, ApiError>,
    ) -> bool {
        if ticket.0 < self.latest_fetch {
            debug!(
                ticket = ticket.0,
                latest = self.latest_fetch,
                "Discarding superseded catalog response"
            );
            return false;
        }

        match result {
            Ok(lessons) => {
                debug!(count = lessons.len(), "Catalog replaced");
                self.lessons = lessons;
                true
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed, keeping previous results");
                false
            }
        }
    }

    pub const fn toggle_cart(&mut self) {
        self.show_cart = !self.show_cart;
    }

    /// Reserve one space of the lesson. Returns `false` if the lesson is not
    /// in the catalog or has no spaces left.
    pub fn add_to_cart(&mut self, lesson_id: &LessonId) -> bool {
        self.lessons
            .iter_mut()
            .find(|lesson| &lesson.id == lesson_id)
            .is_some_and(|lesson| self.cart.reserve(lesson))
    }

    /// Give back one reserved space. Returns `false` if the cart has no line
    /// for the lesson.
    pub fn remove_from_cart(&mut self, lesson_id: &LessonId) -> bool {
        self.cart.release(lesson_id, &mut self.lessons)
    }

    pub const fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Set the local filter text. Does not contact the backend; pair it with
    /// a debounced [`Storefront::run_search`].
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_checkout(&mut self, name: impl Into<String>, phone: impl Into<String>) {
        self.checkout = CheckoutForm::new(name, phone);
    }

    /// Submit the cart as an order.
    ///
    /// On success the cart is emptied and closed. The order message is set
    /// for both success and failure.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] and changes nothing if the cart is empty or
    /// the checkout fields are invalid.
    pub async fn submit_order(&mut self) -> Result<OrderOutcome, CheckoutError> {
        let outcome =
            checkout::submit_order(&self.api, &mut self.cart, &self.lessons, &self.checkout)
                .await?;

        if outcome.is_submitted() {
            self.show_cart = false;
        }
        self.order_message.clone_from(&outcome.message);

        Ok(outcome)
    }

    /// Snapshot of everything derived from the current state.
    #[must_use]
    pub fn view(&self) -> StorefrontView {
        let valid_name = self.checkout.valid_name();
        let valid_phone = self.checkout.valid_phone();

        StorefrontView {
            lessons: visible_lessons(&self.lessons, &self.search_query, self.sort),
            cart: self.cart.lines().to_vec(),
            cart_count: self.cart.item_count(),
            cart_total: self.cart.total(),
            show_cart: self.show_cart,
            sort: self.sort,
            search_query: self.search_query.clone(),
            valid_name,
            valid_phone,
            can_checkout: !self.cart.is_empty() && valid_name && valid_phone,
            order_message: self.order_message.clone(),
        }
    }
}
