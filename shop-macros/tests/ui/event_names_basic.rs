use shop_domain::eventing::Matcher;
use shop_macros::event_names;
use std::str::FromStr;

#[event_names]
enum CartEvent {
    #[event(name = "cart:added")]
    Added,
    #[event(name = "cart:removed")]
    Removed,
    Cleared,
}

fn main() {
    assert_eq!(CartEvent::Added.as_str(), "cart:added");
    assert_eq!(CartEvent::Cleared.as_str(), "CartEvent.Cleared");
    assert_eq!(CartEvent::ALL.len(), 3);
    assert_eq!(CartEvent::Removed.to_string(), "cart:removed");

    // Copy/Eq/Hash 已派生
    let ev = CartEvent::Added;
    let copied = ev;
    assert_eq!(ev, copied);

    assert_eq!(CartEvent::from_str("cart:removed").unwrap(), CartEvent::Removed);
    assert!(CartEvent::from_str("cart:unknown").is_err());

    let matcher: Matcher = CartEvent::Added.into();
    assert!(matcher.matches("cart:added"));
    assert!(!matcher.matches("cart:removed"));
}
