//! # Orders
//!
//! Order records placed from the customer site and worked by staff.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Fulfillment (kitchen)                                                  │
//! │                                                                         │
//! │    Pending ──► Preparing ──► Served                                     │
//! │                                                                         │
//! │  Payment (cashier), independent of fulfillment                          │
//! │                                                                         │
//! │    Pending ──► Paid                                                     │
//! │                                                                         │
//! │  Forward only, one step at a time. Re-applying the current status is    │
//! │  accepted and changes nothing.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Each [`OrderItem`] freezes the item name, the variant label and the unit
//! price at the moment the order is placed. Later menu edits do not change
//! what the guest was charged.
//!
//! ## One Currency Per Order
//! Menu prices may be listed in either currency. [`Order::build`] converts
//! every line into [`OrderPricing::currency`] at the configured rate before
//! anything is summed, and the order records that currency. Subtotal, tax,
//! tip and total are all in it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::currency::{convert, Currency, ExchangeRate};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{MenuItem, TaxRate};
use crate::validation::{validate_quantity, validate_table_label, validate_tip};

// =============================================================================
// Status Enums
// =============================================================================

/// Kitchen-side progress of an order.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Served,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Served => "served",
        }
    }

    fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Served),
            OrderStatus::Served => None,
        }
    }

    /// Moves to `to` if the lifecycle allows it.
    pub fn transition(self, to: OrderStatus) -> CoreResult<OrderStatus> {
        if to == self || self.next() == Some(to) {
            Ok(to)
        } else {
            Err(CoreError::InvalidStatusTransition {
                kind: "order",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "served" => Ok(OrderStatus::Served),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["pending".into(), "preparing".into(), "served".into()],
            }),
        }
    }
}

/// Cashier-side state of an order.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }

    /// Moves to `to` if allowed. Paid is final.
    pub fn transition(self, to: PaymentStatus) -> CoreResult<PaymentStatus> {
        match (self, to) {
            (a, b) if a == b => Ok(b),
            (PaymentStatus::Pending, PaymentStatus::Paid) => Ok(PaymentStatus::Paid),
            _ => Err(CoreError::InvalidStatusTransition {
                kind: "payment",
                from: self.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_status".to_string(),
                allowed: vec!["pending".into(), "paid".into()],
            }),
        }
    }
}

// =============================================================================
// Order Records
// =============================================================================

/// A line of a placed order (frozen snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    /// Item name at time of order.
    pub name_snapshot: String,
    /// Variant label at time of order, if one was chosen.
    pub variant_label: Option<String>,
    /// Unit price converted into the order currency.
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub table_label: Option<String>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Currency of every amount on the order and its lines.
    pub currency: Currency,
    pub subtotal: Money,
    pub tax: Money,
    pub tip: Money,
    pub total: Money,
    pub items: Vec<OrderItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Order totals. `total = subtotal + tax + tip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub tip: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Tax is charged on the subtotal only, never on the tip.
    ///
    /// Fails with [`CoreError::AmountOverflow`] when a sum leaves the
    /// `Money` range.
    pub fn compute(items: &[OrderItem], tax_rate: TaxRate, tip: Money) -> CoreResult<Self> {
        let subtotal = items
            .iter()
            .try_fold(Money::zero(), |acc, i| acc.checked_add(i.line_total))
            .ok_or(CoreError::AmountOverflow { field: "subtotal" })?;
        let tax = subtotal.calculate_tax(tax_rate);
        let total = subtotal
            .checked_add(tax)
            .and_then(|t| t.checked_add(tip))
            .ok_or(CoreError::AmountOverflow { field: "total" })?;

        Ok(OrderTotals {
            subtotal,
            tax,
            tip,
            total,
        })
    }
}

/// How submitted orders are priced: tax, the settlement currency and the
/// rate used to bring other-currency lines into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPricing {
    pub tax_rate: TaxRate,
    pub currency: Currency,
    pub exchange_rate: ExchangeRate,
}

impl OrderPricing {
    /// Settles in the canonical currency at the default rate.
    pub fn new(tax_rate: TaxRate) -> Self {
        OrderPricing {
            tax_rate,
            currency: Currency::default(),
            exchange_rate: ExchangeRate::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_exchange_rate(mut self, rate: ExchangeRate) -> Self {
        self.exchange_rate = rate;
        self
    }
}

impl Default for OrderPricing {
    fn default() -> Self {
        OrderPricing::new(TaxRate::zero())
    }
}

// =============================================================================
// Order Requests
// =============================================================================

/// One requested line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub menu_item_id: String,
    #[serde(default)]
    pub variant_label: Option<String>,
    pub quantity: i64,
}

/// Order as submitted by the customer site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewOrder {
    #[serde(default)]
    pub table_label: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tip: Money,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Prices a submitted order against the current menu.
    ///
    /// Lines are priced at the variant's price when a label is given, else
    /// at the item's effective price, then converted into the pricing
    /// currency. Promotions are not applied here. The tip is taken as
    /// already being in the pricing currency.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyOrder`] when there are no lines
    /// - [`CoreError::MenuItemNotFound`] / [`CoreError::VariantNotFound`]
    /// - [`CoreError::ItemUnavailable`] for items switched off
    /// - [`CoreError::AmountOverflow`] when a line or total leaves the `Money` range
    /// - validation errors for quantity, tip and table label
    pub fn build(
        request: NewOrder,
        menu: &[MenuItem],
        pricing: OrderPricing,
        now: DateTime<Utc>,
    ) -> CoreResult<Order> {
        if request.lines.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        validate_tip(request.tip.minor())?;
        if let Some(label) = &request.table_label {
            validate_table_label(label)?;
        }

        let order_id = Uuid::new_v4().to_string();
        let mut items = Vec::with_capacity(request.lines.len());

        for line in &request.lines {
            validate_quantity(line.quantity)?;

            let menu_item = menu
                .iter()
                .find(|m| m.id == line.menu_item_id)
                .ok_or_else(|| CoreError::MenuItemNotFound(line.menu_item_id.clone()))?;

            if !menu_item.is_available {
                return Err(CoreError::ItemUnavailable(menu_item.id.clone()));
            }

            let (list_price, list_currency) = match &line.variant_label {
                Some(label) => {
                    let variant = menu_item.variant(label).ok_or_else(|| {
                        CoreError::VariantNotFound {
                            item_id: menu_item.id.clone(),
                            label: label.clone(),
                        }
                    })?;
                    (variant.price, variant.currency.unwrap_or(menu_item.currency))
                }
                None => (menu_item.effective_price(), menu_item.effective_currency()),
            };

            let unit_price = convert(
                list_price,
                list_currency,
                pricing.currency,
                pricing.exchange_rate,
            );
            let line_total = unit_price
                .checked_multiply_quantity(line.quantity)
                .ok_or(CoreError::AmountOverflow { field: "line total" })?;

            items.push(OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                menu_item_id: menu_item.id.clone(),
                name_snapshot: menu_item.name.clone(),
                variant_label: line.variant_label.clone(),
                unit_price,
                quantity: line.quantity,
                line_total,
            });
        }

        let totals = OrderTotals::compute(&items, pricing.tax_rate, request.tip)?;

        Ok(Order {
            id: order_id,
            table_label: request.table_label.map(|t| t.trim().to_string()),
            customer_name: request.customer_name,
            notes: request.notes,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            currency: pricing.currency,
            subtotal: totals.subtotal,
            tax: totals.tax,
            tip: totals.tip,
            total: totals.total,
            items,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            tip: self.tip,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variant;

    fn menu() -> Vec<MenuItem> {
        let hummus = MenuItem::new("hummus", "Hummus", Money::from_minor(550));
        let mut wine = MenuItem::new("wine", "House Red", Money::from_minor(900));
        wine.variants = vec![
            Variant::new("Glass", Money::from_minor(700)),
            Variant::new("Bottle", Money::from_minor(2800)),
        ];
        let mut off = MenuItem::new("off", "Lobster", Money::from_minor(5000));
        off.is_available = false;
        vec![hummus, wine, off]
    }

    fn line(id: &str, variant: Option<&str>, qty: i64) -> OrderLine {
        OrderLine {
            menu_item_id: id.to_string(),
            variant_label: variant.map(str::to_string),
            quantity: qty,
        }
    }

    fn request(lines: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            table_label: Some(" T7 ".into()),
            customer_name: None,
            notes: None,
            tip: Money::from_minor(200),
            lines,
        }
    }

    #[test]
    fn test_build_prices_lines_from_menu() {
        let order = Order::build(
            request(vec![
                line("hummus", None, 2),
                line("wine", Some("Bottle"), 1),
                line("wine", None, 1),
            ]),
            &menu(),
            OrderPricing::new(TaxRate::from_bps(1100)),
            Utc::now(),
        )
        .unwrap();

        // 550×2 + 2800 + 700 (first variant)
        assert_eq!(order.subtotal.minor(), 4600);
        assert_eq!(order.tax.minor(), 506);
        assert_eq!(order.total.minor(), 4600 + 506 + 200);
        assert_eq!(order.items[1].variant_label.as_deref(), Some("Bottle"));
        assert_eq!(order.table_label.as_deref(), Some("T7"));
        assert!(order.items.iter().all(|i| i.order_id == order.id));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_build_rejects_bad_lines() {
        let m = menu();
        let now = Utc::now();
        let rate = OrderPricing::default();

        assert!(matches!(
            Order::build(request(vec![]), &m, rate, now),
            Err(CoreError::EmptyOrder)
        ));
        assert!(matches!(
            Order::build(request(vec![line("ghost", None, 1)]), &m, rate, now),
            Err(CoreError::MenuItemNotFound(_))
        ));
        assert!(matches!(
            Order::build(request(vec![line("wine", Some("Magnum"), 1)]), &m, rate, now),
            Err(CoreError::VariantNotFound { .. })
        ));
        assert!(matches!(
            Order::build(request(vec![line("off", None, 1)]), &m, rate, now),
            Err(CoreError::ItemUnavailable(_))
        ));
        assert!(Order::build(request(vec![line("hummus", None, 0)]), &m, rate, now).is_err());
    }

    #[test]
    fn test_totals_exclude_tip_from_tax() {
        let items = vec![OrderItem {
            id: "i".into(),
            order_id: "o".into(),
            menu_item_id: "m".into(),
            name_snapshot: "Dish".into(),
            variant_label: None,
            unit_price: Money::from_minor(1000),
            quantity: 1,
            line_total: Money::from_minor(1000),
        }];
        let totals =
            OrderTotals::compute(&items, TaxRate::from_bps(1000), Money::from_minor(500)).unwrap();
        assert_eq!(totals.tax.minor(), 100);
        assert_eq!(totals.total.minor(), 1600);
    }

    fn cafe_menu() -> Vec<MenuItem> {
        let hummus = MenuItem::new("hummus", "Hummus", Money::from_minor(550));
        let mut coffee = MenuItem::new("coffee", "Turkish Coffee", Money::from_minor(150_000));
        coffee.currency = Currency::Lbp;
        let mut juice = MenuItem::new("juice", "Lemonade", Money::from_minor(400));
        juice.variants = vec![
            Variant::new("Cup", Money::from_minor(400)),
            Variant::new("Jug", Money::from_minor(900_000)).with_currency(Currency::Lbp),
        ];
        vec![hummus, coffee, juice]
    }

    #[test]
    fn test_build_converts_lines_into_order_currency() {
        let pricing = OrderPricing::new(TaxRate::from_bps(1000))
            .with_exchange_rate(ExchangeRate::new(90_000).unwrap());
        let order = Order::build(
            request(vec![line("hummus", None, 1), line("coffee", None, 2)]),
            &cafe_menu(),
            pricing,
            Utc::now(),
        )
        .unwrap();

        // 150,000 L.L. at 90,000 = $1.666… → 167 cents
        assert_eq!(order.currency, Currency::Usd);
        assert_eq!(order.items[1].unit_price.minor(), 167);
        assert_eq!(order.items[1].line_total.minor(), 334);
        assert_eq!(order.subtotal.minor(), 550 + 334);
        assert_eq!(order.tax.minor(), 88);
        assert_eq!(order.total.minor(), 884 + 88 + 200);
    }

    #[test]
    fn test_build_settles_in_weak_currency() {
        let pricing = OrderPricing::default()
            .with_currency(Currency::Lbp)
            .with_exchange_rate(ExchangeRate::new(90_000).unwrap());
        let mut req = request(vec![line("hummus", None, 1), line("coffee", None, 1)]);
        req.tip = Money::from_minor(10_000);

        let order = Order::build(req, &cafe_menu(), pricing, Utc::now()).unwrap();

        assert_eq!(order.currency, Currency::Lbp);
        assert_eq!(order.items[0].unit_price.minor(), 495_000);
        assert_eq!(order.items[1].unit_price.minor(), 150_000);
        assert_eq!(order.subtotal.minor(), 645_000);
        assert_eq!(order.total.minor(), 655_000);
    }

    #[test]
    fn test_build_uses_variant_currency_override() {
        let pricing =
            OrderPricing::default().with_exchange_rate(ExchangeRate::new(90_000).unwrap());
        let order = Order::build(
            request(vec![line("juice", Some("Jug"), 1), line("juice", Some("Cup"), 1)]),
            &cafe_menu(),
            pricing,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.items[0].unit_price.minor(), 1000);
        assert_eq!(order.items[1].unit_price.minor(), 400);
        assert_eq!(order.subtotal.minor(), 1400);
    }

    #[test]
    fn test_build_rejects_oversized_tip_without_panicking() {
        let mut req = request(vec![line("hummus", None, 1)]);
        req.tip = Money::from_minor(i64::MAX);

        let result = Order::build(req, &menu(), OrderPricing::default(), Utc::now());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_build_reports_amount_overflow() {
        let m = vec![MenuItem::new(
            "lamb",
            "Whole Lamb",
            Money::from_minor(i64::MAX / 2),
        )];
        let now = Utc::now();

        let err = Order::build(
            request(vec![line("lamb", None, 3)]),
            &m,
            OrderPricing::default(),
            now,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { field: "line total" }));

        let err = Order::build(
            request(vec![line("lamb", None, 2), line("lamb", None, 1)]),
            &m,
            OrderPricing::default(),
            now,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { field: "subtotal" }));

        let err = Order::build(
            request(vec![line("lamb", None, 2)]),
            &m,
            OrderPricing::new(TaxRate::from_bps(1000)),
            now,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { field: "total" }));
    }

    #[test]
    fn test_order_status_transitions() {
        use OrderStatus::*;
        assert_eq!(Pending.transition(Preparing).unwrap(), Preparing);
        assert_eq!(Preparing.transition(Served).unwrap(), Served);
        assert_eq!(Served.transition(Served).unwrap(), Served);
        assert!(Pending.transition(Served).is_err());
        assert!(Served.transition(Preparing).is_err());
    }

    #[test]
    fn test_payment_status_transitions() {
        assert!(PaymentStatus::Pending.transition(PaymentStatus::Paid).is_ok());
        let err = PaymentStatus::Paid
            .transition(PaymentStatus::Pending)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot move payment status from paid to pending");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("served".parse::<OrderStatus>().unwrap(), OrderStatus::Served);
        assert!("done".parse::<OrderStatus>().is_err());
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
    }
}
