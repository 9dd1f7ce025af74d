//! Property tests for order request validation.

use assistant_core::{validate, OrderType, Side, ValidationError};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn non_positive_decimal() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..=0, 0u32..8).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn positive_decimal() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000, 0u32..8).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn any_price() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((-1_000_000i64..1_000_000, 0u32..4).prop_map(|(m, s)| Decimal::new(m, s)))
}

fn side_input() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["BUY", "buy", "Sell", "SELL"])
}

fn type_input() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["MARKET", "market", "LIMIT", "Limit"])
}

proptest! {
    #[test]
    fn non_positive_quantity_is_always_rejected(
        quantity in non_positive_decimal(),
        side in side_input(),
        order_type in type_input(),
        price in any_price(),
    ) {
        let result = validate("BTCUSDT", side, order_type, quantity, price);
        prop_assert_eq!(result, Err(ValidationError::InvalidQuantity(quantity)));
    }

    #[test]
    fn limit_without_positive_price_is_rejected(
        quantity in positive_decimal(),
        price in prop::option::of(non_positive_decimal()),
    ) {
        let result = validate("ETHUSDT", "SELL", "LIMIT", quantity, price);
        match price {
            None => prop_assert_eq!(result, Err(ValidationError::MissingPrice)),
            Some(p) => prop_assert_eq!(result, Err(ValidationError::InvalidPrice(p))),
        }
    }

    #[test]
    fn market_price_is_ignored(
        quantity in positive_decimal(),
        price in any_price(),
    ) {
        let order = validate("btcusdt", "buy", "market", quantity, price).unwrap();
        prop_assert_eq!(order.symbol(), "BTCUSDT");
        prop_assert_eq!(order.side(), Side::Buy);
        prop_assert_eq!(order.order_type(), OrderType::Market);
        prop_assert_eq!(order.quantity(), quantity);
        prop_assert_eq!(order.price(), None);
    }

    #[test]
    fn valid_limit_keeps_price(
        quantity in positive_decimal(),
        price in positive_decimal(),
    ) {
        let order = validate("ethusdt", "sell", "limit", quantity, Some(price)).unwrap();
        prop_assert_eq!(order.price(), Some(price));
        prop_assert_eq!(order.quantity(), quantity);
    }
}
