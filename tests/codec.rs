//! Property tests of the `depth_order[]` text codec through the public API.

#![allow(clippy::unwrap_used)]

use market_info_storage::domain::value_objects::{DepthOrder, OrderBook};
use market_info_storage::infrastructure::persistence::codec::{decode, encode_literal};
use proptest::prelude::*;

fn depth_order() -> impl Strategy<Value = DepthOrder> {
    (0.0f64..1e9, 0.0f64..1e9).prop_map(|(price, base_qty)| DepthOrder::new(price, base_qty))
}

proptest! {
    #[test]
    fn stored_book_decodes_to_saved_halves(
        bids in prop::collection::vec(depth_order(), 0..20),
        asks in prop::collection::vec(depth_order(), 0..20),
    ) {
        let stored_bids = encode_literal(&bids);
        let stored_asks = encode_literal(&asks);

        let book = OrderBook::new(decode(&stored_bids).unwrap(), decode(&stored_asks).unwrap());

        prop_assert_eq!(book.bids(), bids.as_slice());
        prop_assert_eq!(book.asks(), asks.as_slice());
    }
}

#[test]
fn decodes_postgres_output() {
    let orders = decode(r#"{"(0.010782342,24)","(0.010765101,11.5)"}"#).unwrap();
    assert_eq!(
        orders,
        vec![
            DepthOrder::new(0.010782342, 24.0),
            DepthOrder::new(0.010765101, 11.5),
        ]
    );
}

#[test]
fn rejects_null_field() {
    assert!(decode(r#"{"(,24)"}"#).is_err());
}
