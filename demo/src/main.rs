use shop_application::logging::init_logging;
use shop_application::{InMemoryShopApi, ShopConfig, Storefront};
use shop_domain::model::ProductItem;
use shop_domain::value_object::{OrderField, Price};
use std::sync::Arc;

fn sample_catalog() -> Vec<ProductItem> {
    vec![
        ProductItem::builder()
            .id("854cef69-976d-4c2a-a18c-2aa45046c390")
            .title("+1 час в сутках")
            .category("софт-скил")
            .description("Если планируете решать задачи в тренажёре, берите два.")
            .image("/5_Dots.svg")
            .price(Price::new(750))
            .build(),
        ProductItem::builder()
            .id("c101ab44-ed99-4a54-990d-47aa2bb4e7d9")
            .title("HEX-леденец")
            .category("другое")
            .description("Лизните этот леденец, чтобы мгновенно запоминать и узнавать любой цветовой код CSS.")
            .image("/Shell.svg")
            .price(Price::new(1450))
            .build(),
        ProductItem::builder()
            .id("b06cde61-912f-4663-9751-09956c0eed67")
            .title("Мамка-таймер")
            .category("софт-скил")
            .description("Будет стоять над душой и не давать прокрастинировать.")
            .image("/Asterisk_2.svg")
            .build(),
    ]
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = ShopConfig::from_env();
    tracing::info!(api = %config.api_url(), cdn = %config.cdn_url(), "starting storefront");

    let api = Arc::new(InMemoryShopApi::from_config(&config, sample_catalog()));
    let shop = Storefront::new(config, api)?;

    let loaded = shop.load_catalog().await?;
    println!("catalog: {loaded} items");
    for card in shop.page().catalog {
        println!("  [{}] {} - {}", card.tone, card.title, card.price_label);
    }

    let ids: Vec<String> = shop.app_state().catalog().into_iter().map(|it| it.id).collect();
    for id in &ids {
        shop.select_card(id)?;
        match shop.add_to_basket(id) {
            Ok(()) => println!("added {id}"),
            Err(err) => println!("skipped {id}: {err}"),
        }
        shop.close_modal()?;
    }

    shop.open_basket()?;
    let basket = shop.basket_view();
    println!("basket: {} items, {}", basket.items.len(), basket.total_label);

    shop.open_order()?;
    shop.input("order", OrderField::Payment, "card")?;
    shop.input("order", OrderField::Address, "Spb Vosstania 1")?;
    shop.submit_order()?;
    shop.input("contacts", OrderField::Email, "test@test.ru")?;
    shop.input("contacts", OrderField::Phone, "+71234567890")?;
    shop.submit_contacts()?;

    let result = shop.checkout().await?;
    println!("order {}: {} synapses", result.id, result.total);
    println!("counter after checkout: {}", shop.page().counter);

    shop.close_modal()?;
    shop.shutdown();
    Ok(())
}
