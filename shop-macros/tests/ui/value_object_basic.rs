use shop_macros::value_object;

#[value_object]
struct Amount {
    value: u64,
}

#[value_object(default = false)]
struct Sku(String);

#[value_object(ord = true)]
enum Level {
    #[default]
    Low,
    High,
}

fn main() {
    // 默认派生 Debug/Default/Clone/PartialEq
    let a = Amount::default();
    let _ = format!("{:?}", a.clone());
    let _eq = a == Amount { value: 0 };

    // default = false 时仍可构造与比较
    let _ = Sku("a1".into()) == Sku("a1".into());

    // ord = true 追加 PartialOrd/Ord/Hash
    assert!(Level::Low < Level::High);
    let mut set = std::collections::BTreeSet::new();
    set.insert(Level::default());
}
