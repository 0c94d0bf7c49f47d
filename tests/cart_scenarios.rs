//! End-to-end cart scenarios over the listing fixtures in `tests/fixtures`.
//!
//! Listings used:
//!
//! - `101`: £100, 2 units
//! - `plot-7`: £50, single unit (no `units` field)
//! - `205`: £12.50, 4 units

use rust_decimal::Decimal;
use serde_json::Value;
use testresult::TestResult;

use vigilo_cart::prelude::*;

fn listings() -> Result<Vec<Property>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/listings.json"
    ))?;

    Ok(serde_json::from_str(&json)?)
}

fn listing(id: impl Into<PropertyId>) -> Result<Property, Box<dyn std::error::Error>> {
    let id = id.into();

    listings()?
        .into_iter()
        .find(|property| property.id == id)
        .ok_or_else(|| format!("no fixture listing {id}").into())
}

fn open(store: &mut MemoryStore) -> Result<Cart<&mut MemoryStore>, PersistenceError> {
    Cart::open(CartReducer::default(), CartPersistence::new(store))
}

#[test]
fn checkout_with_coupon() -> TestResult {
    let mut store = MemoryStore::new();
    let mut cart = open(&mut store)?;

    cart.add_to_cart(listing(101)?)?;
    cart.add_to_cart(listing(101)?)?;
    cart.add_to_cart(listing("plot-7")?)?;

    assert_eq!(cart.subtotal()?, Decimal::from(250));
    assert_eq!(cart.total()?, Decimal::from(250));

    assert!(cart.apply_coupon("vigilo10")?);

    assert_eq!(cart.total()?, Decimal::from(225));
    assert_eq!(cart.total_items(), 3);

    Ok(())
}

#[test]
fn quantities_stay_within_available_units() -> TestResult {
    let mut store = MemoryStore::new();
    let mut cart = open(&mut store)?;

    for _ in 0..6 {
        cart.add_to_cart(listing(205)?)?;
    }

    cart.add_to_cart(listing("plot-7")?)?;
    cart.increment_quantity("plot-7")?;

    assert_eq!(cart.line(&PropertyId::from(205)).map(|l| l.quantity), Some(4));
    assert_eq!(
        cart.line(&PropertyId::from("plot-7")).map(|l| l.max_units),
        Some(1)
    );
    assert_eq!(cart.total_items(), 5);

    for line in cart.items() {
        assert!(line.quantity >= 1 && line.quantity <= line.max_units);
    }

    Ok(())
}

#[test]
fn decrement_to_zero_drops_the_line() -> TestResult {
    let mut store = MemoryStore::new();
    let mut cart = open(&mut store)?;

    cart.add_to_cart(listing(101)?)?;
    cart.decrement_quantity(101)?;
    cart.decrement_quantity(101)?;

    assert!(!cart.is_in_cart(&PropertyId::from(101)));
    assert_eq!(cart.total_items(), 0);

    Ok(())
}

#[test]
fn unknown_ids_leave_the_cart_alone() -> TestResult {
    let mut store = MemoryStore::new();
    let mut cart = open(&mut store)?;

    cart.add_to_cart(listing(101)?)?;

    let before = cart.state().clone();

    cart.increment_quantity(999)?;
    cart.decrement_quantity(999)?;
    cart.remove_from_cart("101")?;

    assert_eq!(cart.state(), &before);

    Ok(())
}

#[test]
fn favorites_are_independent_of_the_cart() -> TestResult {
    let mut store = MemoryStore::new();
    let mut cart = open(&mut store)?;
    let plot = PropertyId::from("plot-7");

    cart.toggle_favorite(listing("plot-7")?)?;
    cart.add_to_cart(listing("plot-7")?)?;

    assert!(cart.is_favorite(&plot));
    assert!(cart.is_in_cart(&plot));

    cart.remove_from_cart("plot-7")?;

    assert!(cart.is_favorite(&plot));

    cart.toggle_favorite(listing("plot-7")?)?;

    assert!(!cart.is_favorite(&plot));

    Ok(())
}

#[test]
fn state_survives_a_restart() -> TestResult {
    let mut store = MemoryStore::new();

    {
        let mut cart = open(&mut store)?;

        cart.add_to_cart(listing(205)?)?;
        cart.add_to_cart(listing(205)?)?;
        cart.toggle_favorite(listing(101)?)?;
        cart.apply_coupon("VIGILO10")?;
    }

    let cart = open(&mut store)?;

    assert_eq!(cart.line(&PropertyId::from(205)).map(|l| l.quantity), Some(2));
    assert_eq!(cart.coupon(), Some("VIGILO10"));
    assert_eq!(cart.saved_for_later().len(), 1);
    assert_eq!(cart.total()?, Decimal::new(225, 1));

    Ok(())
}

#[test]
fn listing_details_are_written_back_unchanged() -> TestResult {
    let mut store = MemoryStore::new();

    {
        let mut cart = open(&mut store)?;

        cart.add_to_cart(listing(101)?)?;
    }

    let raw = store
        .get(DEFAULT_STORAGE_KEY)?
        .ok_or("cart was not stored")?;
    let document: Value = serde_json::from_str(&raw)?;

    let line = document
        .get("items")
        .and_then(|items| items.get(0))
        .ok_or("no stored line")?;

    assert_eq!(line.get("maxUnits"), Some(&Value::from(2)));
    assert_eq!(line.get("quantity"), Some(&Value::from(1)));
    assert_eq!(
        line.pointer("/location/area").and_then(Value::as_str),
        Some("Lekki")
    );
    assert_eq!(
        line.get("images").and_then(Value::as_array).map(Vec::len),
        Some(2)
    );

    Ok(())
}

#[test]
fn clear_cart_resets_everything() -> TestResult {
    let mut store = MemoryStore::new();
    let mut cart = open(&mut store)?;

    cart.add_to_cart(listing(101)?)?;
    cart.toggle_favorite(listing(205)?)?;
    cart.apply_coupon("vigilo10")?;
    cart.clear_cart()?;

    assert_eq!(cart.state(), &CartState::default());
    assert_eq!(cart.total()?, Decimal::ZERO);

    Ok(())
}

#[test]
fn listing_with_its_own_quantity_field_survives_a_restart() -> TestResult {
    let mut store = MemoryStore::new();
    let listing = Property::new(1, Decimal::from(10))
        .with_units(3)
        .with_detail("quantity", 7)
        .with_detail("maxUnits", 40);

    {
        let mut cart = open(&mut store)?;

        cart.add_to_cart(listing.clone())?;
        cart.add_to_cart(listing)?;
    }

    let cart = open(&mut store)?;

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.line(&PropertyId::from(1)).map(|l| l.quantity), Some(2));
    assert_eq!(cart.line(&PropertyId::from(1)).map(|l| l.max_units), Some(3));

    Ok(())
}

#[test]
fn prices_too_large_to_total_never_panic() -> TestResult {
    let mut store = MemoryStore::new();
    let mut cart = open(&mut store)?;
    let price: Decimal = "50000000000000000000000000000".parse()?;
    let listing = Property::new(1, price).with_units(5);

    cart.add_to_cart(listing.clone())?;
    cart.add_to_cart(listing)?;

    assert_eq!(cart.line(&PropertyId::from(1)).map(|l| l.quantity), Some(1));
    assert_eq!(cart.subtotal()?, price);
    assert_eq!(cart.total_items(), 1);

    Ok(())
}
